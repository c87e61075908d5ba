//! Document loading and rendering pipeline for the wren renderer.
//!
//! # Scope
//!
//! This crate ties the pipeline stages together:
//! - **Document loading**: fetch markup through an injectable [`Fetcher`]
//! - **Stylesheet collection**: the default sheet, then each linked
//!   sheet in document order; a sheet that fails to load contributes
//!   nothing and the document still renders
//! - **Style, layout, paint**: producing a [`Page`] with the display
//!   list an external render surface executes
//! - **Hit testing**: from a document-coordinate point to the nearest
//!   enclosing anchor target, for an embedding UI's click handling
//! - **Text measurement**: a fontdue-backed [`TextMeasurer`] over
//!   caller-provided font bytes
//!
//! Everything stateful lives with the embedder: scrolling, history,
//! windows, the visited-link set, and actual pixel output are not this
//! crate's business.

/// Fontdue-backed text measurement.
pub mod measure;

pub use measure::{FontdueMeasurer, MeasureError};

pub use wren_common as common;
pub use wren_css as css;
pub use wren_dom as dom;
pub use wren_html as html;

use std::collections::{HashMap, HashSet};

use wren_common::net::FetchError;
use wren_common::url::Url;
use wren_common::warning::warn_once;
use wren_css::{
    ComputedStyle, CssParser, DisplayList, LayoutTree, StyleContext, TextMeasurer, default_rules,
    paint_tree, resolve_styles, stylesheet_links,
};
use wren_dom::{DomTree, NodeId};

/// Content retrieval boundary: network, file, and cache concerns live
/// behind this.
pub trait Fetcher {
    /// Fetch the resource and return its body as text.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] when the resource cannot be retrieved.
    fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}

/// A [`Fetcher`] over blocking HTTP.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpFetcher;

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        wren_common::net::fetch_text(&url.to_string())
    }
}

/// What a click at some point would activate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickTarget {
    /// A link to another document, already resolved against the page URL.
    Link(Url),
    /// A same-document fragment target (the href's `#` stripped).
    Fragment(String),
}

/// A fully loaded and rendered document.
pub struct Page {
    /// The page URL, when the page was loaded from one.
    pub url: Option<Url>,
    /// The parsed document tree.
    pub dom: DomTree,
    /// Computed styles per node.
    pub styles: HashMap<NodeId, ComputedStyle>,
    /// The laid-out box tree.
    pub layout: LayoutTree,
    /// The flat draw-command list for the render surface.
    pub display_list: DisplayList,
    /// The document title, or `Untitled`.
    pub title: String,
}

/// Load and render a document from a URL.
///
/// # Errors
///
/// Returns a [`FetchError`] only when the document itself cannot be
/// fetched. Stylesheet fetch failures are tolerated: the page renders
/// with whatever rules it has.
pub fn load_page(
    url: &Url,
    fetcher: &dyn Fetcher,
    measurer: &dyn TextMeasurer,
    visited: &HashSet<String>,
    viewport_width: f32,
) -> Result<Page, FetchError> {
    // Warning deduplication is per page load.
    wren_common::warning::clear_warnings();
    let html = fetcher.fetch(url)?;
    Ok(render_html(
        &html,
        Some(url),
        fetcher,
        measurer,
        visited,
        viewport_width,
    ))
}

/// Render markup you already have.
///
/// Without a base URL, linked stylesheets cannot be resolved and are
/// skipped (with a warning), and visited-link recoloring is off.
pub fn render_html(
    html: &str,
    base: Option<&Url>,
    fetcher: &dyn Fetcher,
    measurer: &dyn TextMeasurer,
    visited: &HashSet<String>,
    viewport_width: f32,
) -> Page {
    let dom = wren_html::parse(html);

    let mut rules = default_rules();
    for href in stylesheet_links(&dom) {
        let Some(base) = base else {
            warn_once("CSS", &format!("skipping stylesheet '{href}': no base URL"));
            continue;
        };
        let sheet_url = match base.resolve(&href) {
            Ok(url) => url,
            Err(e) => {
                warn_once("CSS", &format!("skipping stylesheet '{href}': {e}"));
                continue;
            }
        };
        match fetcher.fetch(&sheet_url) {
            Ok(text) => rules.extend(CssParser::new(&text).parse()),
            // A missing sheet is an empty sheet; the page still renders.
            Err(e) => warn_once("CSS", &format!("failed to load stylesheet '{href}': {e}")),
        }
    }

    let styles = resolve_styles(&dom, &rules, &StyleContext { visited, base });
    let layout = LayoutTree::layout(&dom, &styles, viewport_width, measurer);
    let display_list = paint_tree(&layout, &dom, &styles);
    let title = document_title(&dom);

    Page {
        url: base.cloned(),
        dom,
        styles,
        layout,
        display_list,
        title,
    }
}

impl Page {
    /// Re-run layout and paint against a new viewport width.
    ///
    /// Styles are untouched: a resize changes geometry, not the cascade.
    pub fn relayout(&mut self, viewport_width: f32, measurer: &dyn TextMeasurer) {
        self.layout = LayoutTree::layout(&self.dom, &self.styles, viewport_width, measurer);
        self.display_list = paint_tree(&self.layout, &self.dom, &self.styles);
    }

    /// The click target at a document-coordinate point, if any: the
    /// innermost box there, then the nearest enclosing anchor with an
    /// href.
    #[must_use]
    pub fn link_at(&self, x: f32, y: f32) -> Option<ClickTarget> {
        let hit = self.layout.hit_test(x, y)?;
        let mut current = self.layout.get(hit)?.dom;
        while let Some(id) = current {
            if let Some(element) = self.dom.as_element(id)
                && element.tag_name == "a"
                && let Some(href) = element.attrs.get("href")
            {
                if let Some(fragment) = href.strip_prefix('#') {
                    return Some(ClickTarget::Fragment(fragment.to_string()));
                }
                let base = self.url.as_ref()?;
                return base.resolve(href).ok().map(ClickTarget::Link);
            }
            current = self.dom.parent(id);
        }
        None
    }

    /// The vertical position of the element with the given id, for
    /// same-document fragment scrolling.
    #[must_use]
    pub fn fragment_position(&self, fragment: &str) -> Option<f32> {
        let target = self.dom.iter_all().find(|&id| {
            self.dom
                .as_element(id)
                .is_some_and(|e| e.id() == Some(fragment))
        })?;
        let layout_box = self.layout.find_by_dom(target)?;
        Some(self.layout.get(layout_box)?.y)
    }
}

/// The text of the first `title` element, or `Untitled`.
fn document_title(dom: &DomTree) -> String {
    let title = dom
        .iter_all()
        .find(|&id| dom.as_element(id).is_some_and(|e| e.tag_name == "title"));
    let text: String = title
        .map(|id| {
            dom.children(id)
                .iter()
                .filter_map(|&child| dom.as_text(child))
                .collect()
        })
        .unwrap_or_default();
    let text = text.trim();
    if text.is_empty() {
        "Untitled".to_string()
    } else {
        text.to_string()
    }
}
