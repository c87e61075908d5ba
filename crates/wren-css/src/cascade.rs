//! Cascade and style computation.
//!
//! One top-down traversal resolves every node's style before any of its
//! children are visited, so inheritance reads finished parent values. Per
//! node the order is: inherit, cascade matched rules by priority, apply
//! inline style, resolve percentage font sizes, recolor visited links.

use std::collections::{HashMap, HashSet};

use wren_common::url::Url;
use wren_dom::{DomTree, NodeId, NodeType};

use crate::parser::{CssParser, Rule};
use crate::style::{ComputedStyle, DEFAULT_FONT_SIZE_PX, INHERITED_PROPERTIES};

/// Priority added by `!important`, dominating every selector and the
/// inline level.
pub const IMPORTANT_PRIORITY_BOOST: u32 = 10_000;

/// Priority of an inline `style` attribute declaration.
pub const INLINE_PRIORITY: u32 = 1_000;

/// The color applied to anchors whose target has been visited.
pub const VISITED_LINK_COLOR: &str = "purple";

/// Externally supplied state the resolver reads but never writes.
#[derive(Debug, Clone, Copy)]
pub struct StyleContext<'a> {
    /// Previously visited resource identifiers, in the canonical string
    /// form produced by [`Url::to_string`].
    pub visited: &'a HashSet<String>,
    /// The document URL anchor hrefs resolve against. With no base,
    /// visited-link recoloring is skipped.
    pub base: Option<&'a Url>,
}

/// The winning declaration for one property during the cascade.
struct CascadeEntry<'a> {
    priority: u32,
    value: &'a str,
}

/// Compute styles for the entire tree against an ordered rule list.
///
/// Returns a map from node to computed style. Element and Text nodes get
/// entries (Text inherits only); the Document node gets none.
#[must_use]
pub fn resolve_styles(
    tree: &DomTree,
    rules: &[Rule],
    ctx: &StyleContext<'_>,
) -> HashMap<NodeId, ComputedStyle> {
    let mut styles = HashMap::new();
    resolve_node(tree, tree.root(), rules, None, ctx, &mut styles);
    styles
}

fn resolve_node(
    tree: &DomTree,
    id: NodeId,
    rules: &[Rule],
    parent: Option<&ComputedStyle>,
    ctx: &StyleContext<'_>,
    styles: &mut HashMap<NodeId, ComputedStyle>,
) {
    let Some(node) = tree.get(id) else { return };

    if matches!(node.node_type, NodeType::Document) {
        for &child in tree.children(id) {
            resolve_node(tree, child, rules, parent, ctx, styles);
        }
        return;
    }

    let mut style = ComputedStyle::new();

    // 1. Inheritance: parent values (or root defaults) for the fixed set.
    for &(property, default) in INHERITED_PROPERTIES {
        let value = parent.and_then(|p| p.get(property)).unwrap_or(default);
        style.set(property, value);
    }

    // 2. Cascade: per property, the highest effective priority wins.
    // Candidates are scanned in stylesheet order and replaced only on a
    // strictly greater priority, so equal priorities keep the earliest
    // rule.
    let mut winners: HashMap<&str, CascadeEntry<'_>> = HashMap::new();
    for rule in rules {
        if !rule.selector.matches(tree, id) {
            continue;
        }
        let base_priority = rule.selector.priority();
        for (property, declaration) in &rule.declarations {
            let priority = base_priority
                + if declaration.important {
                    IMPORTANT_PRIORITY_BOOST
                } else {
                    0
                };
            match winners.get_mut(property.as_str()) {
                Some(entry) if priority <= entry.priority => {}
                Some(entry) => {
                    entry.priority = priority;
                    entry.value = &declaration.value;
                }
                None => {
                    let _ = winners.insert(
                        property.as_str(),
                        CascadeEntry {
                            priority,
                            value: &declaration.value,
                        },
                    );
                }
            }
        }
    }
    for (property, entry) in &winners {
        style.set(*property, entry.value);
    }

    // 3. Inline style: overrides a cascaded value only when its effective
    // priority beats the best the stylesheet achieved for that property;
    // a property the stylesheet never set is always taken.
    if let Some(element) = tree.as_element(id)
        && let Some(inline) = element.attrs.get("style")
    {
        let declarations = CssParser::new(&format!("{inline};")).parse_declarations();
        for (property, declaration) in &declarations {
            let priority = INLINE_PRIORITY
                + if declaration.important {
                    IMPORTANT_PRIORITY_BOOST
                } else {
                    0
                };
            match winners.get(property.as_str()) {
                Some(entry) if priority <= entry.priority => {}
                _ => style.set(property.as_str(), declaration.value.as_str()),
            }
        }
    }

    // 4. Percentage font sizes resolve against the parent's pixel size
    // and are rewritten as absolute pixels: layout never sees a percent.
    let percent = style
        .get("font-size")
        .and_then(|value| value.strip_suffix('%'))
        .map(str::to_string);
    if let Some(percent) = percent {
        let factor = percent.trim().parse::<f32>().unwrap_or(100.0) / 100.0;
        let parent_px = parent
            .and_then(ComputedStyle::font_size_px)
            .unwrap_or(DEFAULT_FONT_SIZE_PX);
        style.set("font-size", format!("{}px", (parent_px * factor) as i32));
    }

    // 5. Visited links.
    if let Some(element) = tree.as_element(id)
        && element.tag_name == "a"
        && let Some(href) = element.attrs.get("href")
        && let Some(base) = ctx.base
        && let Ok(resolved) = base.resolve(href)
        && ctx.visited.contains(&resolved.to_string())
    {
        style.set("color", VISITED_LINK_COLOR);
    }

    let _ = styles.insert(id, style.clone());

    for &child in tree.children(id) {
        resolve_node(tree, child, rules, Some(&style), ctx, styles);
    }
}
