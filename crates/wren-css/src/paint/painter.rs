//! Paint-tree construction from a layout tree.
//!
//! A pre-order walk: each box appends its own commands, then its children
//! follow in document order. Backgrounds therefore always precede the
//! content painted over them.

use std::collections::HashMap;

use wren_dom::{DomTree, ElementData, NodeId};

use crate::fonts::{FontDescriptor, FontSlant, FontWeight};
use crate::layout::{HSTEP, LayoutKind, LayoutNode, LayoutTree, TOC_HEADER_HEIGHT};
use crate::paint::display_list::{DisplayList, DrawCommand, Rect};
use crate::style::ComputedStyle;

/// Side length of the square bullet painted beside `li` boxes.
const BULLET_SIZE: f32 = 4.0;

/// Vertical inset of the table-of-contents label within its header bar.
const TOC_LABEL_INSET: f32 = 5.0;

/// Collect the draw commands of an entire layout tree, in painting order.
#[must_use]
pub fn paint_tree(
    layout: &LayoutTree,
    dom: &DomTree,
    styles: &HashMap<NodeId, ComputedStyle>,
) -> DisplayList {
    let mut list = DisplayList::new();
    for id in layout.in_document_order() {
        let Some(node) = layout.get(id) else { continue };
        match &node.kind {
            // The page frame and line boxes draw nothing themselves.
            LayoutKind::Document | LayoutKind::Line => {}
            LayoutKind::Block => paint_block(node, dom, styles, &mut list),
            LayoutKind::Text { word, font } => paint_word(node, word, *font, styles, &mut list),
        }
    }
    list
}

/// Block decorations: background fill, `pre` backdrop, the
/// table-of-contents header, and list bullets.
fn paint_block(
    node: &LayoutNode,
    dom: &DomTree,
    styles: &HashMap<NodeId, ComputedStyle>,
    list: &mut DisplayList,
) {
    let Some(dom_id) = node.dom else { return };
    let Some(element) = dom.as_element(dom_id) else {
        return;
    };
    let rect = Rect::new(node.x, node.y, node.x + node.width, node.y + node.height);

    if let Some(style) = styles.get(&dom_id) {
        let background = style.get("background-color").unwrap_or("transparent");
        // Function-valued colors (rgb/rgba/hsl) are unsupported by the
        // draw backend: treated as transparent.
        let background = if background.starts_with("rgb") || background.starts_with("hsl") {
            "transparent"
        } else {
            background
        };
        if background != "transparent" {
            list.push(DrawCommand::Rect {
                rect,
                color: background.to_string(),
            });
        }
    }

    if element.tag_name == "pre" {
        list.push(DrawCommand::Rect {
            rect,
            color: "gray".to_string(),
        });
    }

    if is_toc_nav(element) {
        let header_top = node.y - TOC_HEADER_HEIGHT;
        let header = Rect::new(
            node.x,
            header_top,
            node.x + node.width,
            header_top + TOC_HEADER_HEIGHT,
        );
        list.push(DrawCommand::Rect {
            rect: header,
            color: "gray".to_string(),
        });
        list.push(DrawCommand::Text {
            x: node.x + HSTEP,
            y: header_top + TOC_LABEL_INSET,
            text: "Table of Contents".to_string(),
            font: FontDescriptor {
                size: 16,
                weight: FontWeight::Bold,
                slant: FontSlant::Roman,
            },
            color: "black".to_string(),
            bounds: header,
        });
    }

    if element.tag_name == "li" {
        let bullet_x = node.x - HSTEP;
        list.push(DrawCommand::Rect {
            rect: Rect::new(
                bullet_x,
                node.y,
                bullet_x + BULLET_SIZE,
                node.y + BULLET_SIZE,
            ),
            color: "black".to_string(),
        });
    }
}

/// A word paints itself in its node's resolved color.
fn paint_word(
    node: &LayoutNode,
    word: &str,
    font: FontDescriptor,
    styles: &HashMap<NodeId, ComputedStyle>,
    list: &mut DisplayList,
) {
    let Some(dom_id) = node.dom else { return };
    let color = styles
        .get(&dom_id)
        .and_then(|style| style.get("color"))
        .unwrap_or("black")
        .to_string();
    list.push(DrawCommand::Text {
        x: node.x,
        y: node.y,
        text: word.to_string(),
        font,
        color,
        bounds: Rect::new(node.x, node.y, node.x + node.width, node.y + node.height),
    });
}

fn is_toc_nav(element: &ElementData) -> bool {
    element.tag_name == "nav" && element.id() == Some("toc")
}
