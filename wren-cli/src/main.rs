//! wren CLI
//!
//! A headless front end for testing and debugging: loads a document
//! through the full pipeline and dumps the tree, style counts, and the
//! display list.

use std::collections::HashSet;
use std::env;
use std::fs;

use anyhow::{Context, Result, bail};
use owo_colors::OwoColorize;
use wren_browser::{HttpFetcher, Page, load_page, render_html};
use wren_common::url::Url;
use wren_css::ApproximateMeasurer;
use wren_html::print_tree;

struct Options {
    source: String,
    width: f32,
    json: bool,
}

fn main() -> Result<()> {
    let options = parse_args()?;
    let visited = HashSet::new();
    let measurer = ApproximateMeasurer;

    let page: Page = if options.source.starts_with("http://")
        || options.source.starts_with("https://")
    {
        let url = Url::parse(&options.source)?;
        load_page(&url, &HttpFetcher, &measurer, &visited, options.width)?
    } else {
        let html = fs::read_to_string(&options.source)
            .with_context(|| format!("failed to read '{}'", options.source))?;
        render_html(&html, None, &HttpFetcher, &measurer, &visited, options.width)
    };

    if options.json {
        println!("{}", serde_json::to_string_pretty(&page.display_list)?);
        return Ok(());
    }

    println!("{}", "=== Document ===".cyan());
    println!("title: {}", page.title);
    print_tree(&page.dom, page.dom.root(), 0);

    println!();
    println!("{}", "=== Styles ===".cyan());
    println!("{} styled nodes", page.styles.len());

    println!();
    let heading = format!("=== Display list ({} commands) ===", page.display_list.len());
    println!("{}", heading.cyan());
    for command in page.display_list.commands() {
        println!("{command}");
    }

    Ok(())
}

fn parse_args() -> Result<Options> {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut source = None;
    let mut width = 800.0_f32;
    let mut json = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => json = true,
            "--width" => {
                width = iter
                    .next()
                    .context("--width requires a value")?
                    .parse()
                    .context("--width requires a number")?;
            }
            other if other.starts_with("--") => bail!("unknown option '{other}'"),
            other => source = Some(other.to_string()),
        }
    }

    let Some(source) = source else {
        eprintln!("Usage: wren-cli <file.html | url> [--width N] [--json]");
        std::process::exit(1);
    };

    Ok(Options {
        source,
        width,
        json,
    })
}
