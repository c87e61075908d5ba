//! Integration tests for the paint-tree builder.

use std::collections::HashSet;

use wren_css::{
    ApproximateMeasurer, CssParser, DisplayList, DrawCommand, HSTEP, LayoutTree, StyleContext,
    VSTEP, default_rules, paint_tree, resolve_styles,
};
use wren_html::parse;

fn render(html: &str, css: &str, viewport_width: f32) -> DisplayList {
    let tree = parse(html);
    let mut rules = default_rules();
    rules.extend(CssParser::new(css).parse());
    let visited = HashSet::new();
    let styles = resolve_styles(
        &tree,
        &rules,
        &StyleContext {
            visited: &visited,
            base: None,
        },
    );
    let layout = LayoutTree::layout(&tree, &styles, viewport_width, &ApproximateMeasurer);
    paint_tree(&layout, &tree, &styles)
}

fn texts(list: &DisplayList) -> Vec<(String, String)> {
    list.commands()
        .iter()
        .filter_map(|cmd| match cmd {
            DrawCommand::Text { text, color, .. } => Some((text.clone(), color.clone())),
            _ => None,
        })
        .collect()
}

fn rects(list: &DisplayList) -> Vec<(String, f32, f32)> {
    list.commands()
        .iter()
        .filter_map(|cmd| match cmd {
            DrawCommand::Rect { rect, color } => Some((color.clone(), rect.top, rect.bottom)),
            _ => None,
        })
        .collect()
}

#[test]
fn words_paint_in_document_order() {
    let list = render("<body><p>one two</p><p>three</p></body>", "", 800.0);
    let words: Vec<String> = texts(&list).into_iter().map(|(t, _)| t).collect();
    assert_eq!(words, vec!["one", "two", "three"]);
}

#[test]
fn text_color_comes_from_the_resolved_style() {
    let list = render("<body><p>plain <a href=\"x\">linked</a></p></body>", "", 800.0);
    let texts = texts(&list);
    assert_eq!(texts[0], ("plain".to_string(), "black".to_string()));
    // The default sheet colors anchors blue.
    assert_eq!(texts[1], ("linked".to_string(), "blue".to_string()));
}

#[test]
fn background_paints_before_the_content_above_it() {
    let list = render(
        "<body><p>hi</p></body>",
        "body { background-color: lightgray; }",
        800.0,
    );
    let commands = list.commands();
    let rect_index = commands
        .iter()
        .position(|c| matches!(c, DrawCommand::Rect { color, .. } if color == "lightgray"))
        .expect("background rect missing");
    let text_index = commands
        .iter()
        .position(|c| matches!(c, DrawCommand::Text { .. }))
        .expect("text missing");
    assert!(rect_index < text_index);
}

#[test]
fn function_valued_backgrounds_are_skipped() {
    for value in ["rgb(1, 2, 3)", "rgba(1, 2, 3, 0.5)", "hsl(90, 10%, 10%)"] {
        let list = render(
            "<body><p>hi</p></body>",
            &format!("body {{ background-color: {value}; }}"),
            800.0,
        );
        assert!(
            rects(&list).is_empty(),
            "expected no rect for {value}"
        );
    }
}

#[test]
fn pre_paints_a_gray_backdrop() {
    let list = render("<body><pre>code here</pre></body>", "", 800.0);
    let rects = rects(&list);
    assert_eq!(rects.len(), 1);
    assert_eq!(rects[0].0, "gray");
}

#[test]
fn list_items_paint_bullets() {
    let list = render("<body><ul><li>one</li><li>two</li></ul></body>", "", 800.0);
    let bullets: Vec<_> = list
        .commands()
        .iter()
        .filter_map(|cmd| match cmd {
            DrawCommand::Rect { rect, color } if color == "black" => Some(*rect),
            _ => None,
        })
        .collect();
    assert_eq!(bullets.len(), 2);
    for bullet in bullets {
        // A 4px square, one HSTEP left of the indented item.
        assert!((bullet.right - bullet.left - 4.0).abs() < 1e-3);
        assert!((bullet.bottom - bullet.top - 4.0).abs() < 1e-3);
        assert!((bullet.left - (HSTEP + 2.0 * HSTEP - HSTEP)).abs() < 1e-3);
    }
}

#[test]
fn toc_nav_paints_a_header_bar_and_label() {
    let list = render(
        r#"<body><nav id="toc"><p>entries</p></nav></body>"#,
        "",
        800.0,
    );
    let commands = list.commands();

    let header = commands
        .iter()
        .find_map(|cmd| match cmd {
            DrawCommand::Rect { rect, color } if color == "gray" => Some(*rect),
            _ => None,
        })
        .expect("header bar missing");
    // The bar sits in the reserved strip above the nav box: the nav was
    // pushed down to VSTEP + 25, so the bar spans VSTEP..VSTEP + 25.
    assert!((header.top - VSTEP).abs() < 1e-3);
    assert!((header.bottom - (VSTEP + 25.0)).abs() < 1e-3);

    let label = texts(&list)
        .into_iter()
        .find(|(text, _)| text == "Table of Contents")
        .expect("label missing");
    assert_eq!(label.1, "black");
}

#[test]
fn every_command_exposes_vertical_bounds() {
    let list = render(
        "<body><pre>x</pre><p>words to paint</p></body>",
        "",
        800.0,
    );
    for cmd in list.commands() {
        assert!(cmd.bottom() >= cmd.top());
    }
}

#[test]
fn visible_culls_by_vertical_extent() {
    // A tall page: many wrapped lines.
    let body = "word ".repeat(300);
    let list = render(&format!("<body><p>{body}</p></body>"), "", 200.0);
    let total = list.len();
    let visible: Vec<_> = list.visible(0.0, 100.0).collect();
    assert!(!visible.is_empty());
    assert!(visible.len() < total);
    for cmd in &visible {
        assert!(cmd.top() <= 100.0);
        assert!(cmd.bottom() >= 0.0);
    }

    // Scrolled far past the end: nothing is visible.
    let doc_bottom = list
        .commands()
        .iter()
        .fold(0.0_f32, |acc, cmd| acc.max(cmd.bottom()));
    assert_eq!(list.visible(doc_bottom + 10.0, 100.0).count(), 0);
}

#[test]
fn full_pipeline_is_idempotent() {
    let html = r##"<body>
        <nav id="toc"><a href="#one">One</a></nav>
        <h1 id="one">Heading</h1>
        <p class="big" style="color:teal">styled paragraph text</p>
        <ul><li>first</li><li>second</li></ul>
        <pre>preformatted</pre>
    </body>"##;
    let css = ".big { font-size: 125%; } p { color: navy; }";

    let first = render(html, css, 640.0);
    let second = render(html, css, 640.0);
    assert_eq!(first, second);
}
