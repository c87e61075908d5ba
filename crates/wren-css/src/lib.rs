//! Stylesheet parsing, cascade, layout, and painting for the wren renderer.
//!
//! # Scope
//!
//! This crate implements:
//! - **Stylesheet Parser**: a recursive-descent parser over CSS-like text
//!   with per-rule and per-declaration error recovery and parse-time
//!   shorthand expansion (`font`, `margin`, `padding`).
//! - **Selectors**: tag, class, and descendant-chain selectors with
//!   numeric priorities and an O(components + tree depth) matcher.
//! - **Cascade / Style Resolution**: a single top-down pass merging
//!   inheritance, matched rules by priority, inline style, percentage
//!   font sizes, and visited-link recoloring into per-node property maps.
//! - **Layout Engine**: a two-mode (block / inline) box tree with text
//!   measurement, word-level line breaking, and baseline alignment.
//! - **Paint Tree Builder**: a pre-order walk collecting each box's draw
//!   commands into one flat, ordered display list.
//!
//! # Not implemented
//!
//! - Id, attribute, pseudo-class, or combinator selectors beyond the
//!   descendant chain
//! - Cascade origins beyond one default sheet, author rules, and inline
//!   style
//! - Length units other than `px` (and `%` for font-size)
//! - Floats, margins/padding in layout, and z-ordering beyond document
//!   order

/// Cascade and style computation.
pub mod cascade;
/// The built-in default stylesheet.
pub mod defaults;
/// Font descriptors, text measurement, and the metrics cache.
pub mod fonts;
/// Box-tree layout.
pub mod layout;
/// Display list and paint-tree construction.
pub mod paint;
/// Stylesheet parsing.
pub mod parser;
/// Selector representation and matching.
pub mod selector;
/// Computed style storage.
pub mod style;

pub use cascade::{StyleContext, VISITED_LINK_COLOR, resolve_styles};
pub use defaults::{DEFAULT_STYLE_SHEET, default_rules};
pub use fonts::{
    ApproximateMeasurer, FontCache, FontDescriptor, FontMetrics, FontSlant, FontWeight,
    TextMeasurer,
};
pub use layout::{
    HSTEP, LayoutId, LayoutKind, LayoutMode, LayoutNode, LayoutTree, VSTEP, layout_mode,
};
pub use paint::{DisplayList, DrawCommand, Rect, paint_tree};
pub use parser::{CssParser, Declaration, DeclarationMap, Rule};
pub use selector::{Selector, SimpleSelector};
pub use style::{ComputedStyle, DEFAULT_FONT_SIZE_PX, INHERITED_PROPERTIES};

use wren_dom::DomTree;

/// Collect the hrefs of all external stylesheet links, in document order.
///
/// A link element counts when its `rel` attribute contains the token
/// `stylesheet` (ASCII case-insensitive) and it carries a non-empty
/// `href`. Document order matters: rules from these sheets concatenate in
/// linking order before the cascade runs.
#[must_use]
pub fn stylesheet_links(tree: &DomTree) -> Vec<String> {
    tree.iter_all()
        .filter_map(|id| {
            let element = tree.as_element(id)?;
            if element.tag_name != "link" {
                return None;
            }
            let rel = element.attrs.get("rel")?;
            if !rel
                .split_ascii_whitespace()
                .any(|token| token.eq_ignore_ascii_case("stylesheet"))
            {
                return None;
            }
            let href = element.attrs.get("href")?;
            if href.trim().is_empty() {
                return None;
            }
            Some(href.clone())
        })
        .collect()
}
