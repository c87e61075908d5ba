//! Box-tree layout.
//!
//! The layout tree parallels the document tree: one Document box at the
//! root, a Block box per laid-out node, and inside inline contexts a Line
//! box per line with a Text box per word. The whole tree is rebuilt from
//! scratch on every pass; geometry is written once during the pass and
//! read-only afterwards.
//!
//! Two arrangement modes exist. Block mode stacks children vertically as
//! full-width boxes. Inline mode flows words left to right against a
//! cursor, wrapping at word boundaries; a word is never split, even when
//! it is wider than the containing box.

use std::collections::HashMap;

use wren_dom::{DomTree, NodeId};

use crate::fonts::{FontCache, FontDescriptor, TextMeasurer};
use crate::style::ComputedStyle;

/// Horizontal page margin; also the unit for list indentation and the
/// table-of-contents label inset.
pub const HSTEP: f32 = 13.0;

/// Vertical page margin.
pub const VSTEP: f32 = 18.0;

/// Extra indent applied to `li` boxes.
pub const LIST_INDENT: f32 = 2.0 * HSTEP;

/// Height reserved above a `nav` with `id="toc"` for its header bar.
pub const TOC_HEADER_HEIGHT: f32 = 25.0;

/// Extra leading applied above and within line boxes.
const LEADING: f32 = 1.25;

#[cfg(feature = "layout-trace")]
macro_rules! trace {
    ($($arg:tt)*) => { eprintln!($($arg)*) };
}
#[cfg(not(feature = "layout-trace"))]
macro_rules! trace {
    ($($arg:tt)*) => {{}};
}

/// A type-safe index into the layout tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutId(pub usize);

impl LayoutId {
    /// The Document box is always at index 0.
    pub const DOCUMENT: LayoutId = LayoutId(0);
}

/// The kind of a layout box.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutKind {
    /// The page frame. Exactly one, at the root.
    Document,
    /// A block-level box wrapping one document node.
    Block,
    /// One line of an inline context.
    Line,
    /// One measured word on a line.
    Text {
        /// The word, as split from its text node.
        word: String,
        /// The font it was measured with.
        font: FontDescriptor,
    },
}

/// How an element arranges its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum LayoutMode {
    /// Children stack vertically as full-width boxes.
    Block,
    /// Content flows left to right, wrapping into lines.
    Inline,
}

/// One box in the layout tree.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    /// What kind of box this is.
    pub kind: LayoutKind,
    /// The document node this box was generated for. `None` only for the
    /// Document box.
    pub dom: Option<NodeId>,
    /// The containing box.
    pub parent: Option<LayoutId>,
    /// The preceding sibling, used for vertical stacking and for
    /// word-to-word horizontal chaining.
    pub previous: Option<LayoutId>,
    /// Child boxes in document order.
    pub children: Vec<LayoutId>,
    /// Left edge in document coordinates.
    pub x: f32,
    /// Top edge in document coordinates.
    pub y: f32,
    /// Box width.
    pub width: f32,
    /// Box height.
    pub height: f32,
}

impl LayoutNode {
    /// Whether the box contains the given document-coordinate point.
    #[must_use]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        self.x <= x && x < self.x + self.width && self.y <= y && y < self.y + self.height
    }
}

/// Shared, read-only inputs of one layout pass, plus its metrics cache.
struct LayoutPass<'a> {
    dom: &'a DomTree,
    styles: &'a HashMap<NodeId, ComputedStyle>,
    measurer: &'a dyn TextMeasurer,
    fonts: FontCache,
}

/// The arena of layout boxes produced by one pass.
#[derive(Debug)]
pub struct LayoutTree {
    nodes: Vec<LayoutNode>,
}

impl LayoutTree {
    /// Lay out a styled tree against a viewport width.
    ///
    /// Styles must cover every Element and Text node in the tree; layout
    /// on an unstyled tree is a caller bug and panics rather than guessing.
    #[must_use]
    pub fn layout(
        dom: &DomTree,
        styles: &HashMap<NodeId, ComputedStyle>,
        viewport_width: f32,
        measurer: &dyn TextMeasurer,
    ) -> Self {
        let mut tree = Self {
            nodes: vec![LayoutNode {
                kind: LayoutKind::Document,
                dom: None,
                parent: None,
                previous: None,
                children: Vec::new(),
                x: HSTEP,
                y: VSTEP,
                width: viewport_width - 2.0 * HSTEP,
                height: 0.0,
            }],
        };
        let mut pass = LayoutPass {
            dom,
            styles,
            measurer,
            fonts: FontCache::new(),
        };
        if let Some(root_element) = dom.document_element() {
            let child = tree.push(LayoutKind::Block, Some(root_element), LayoutId::DOCUMENT, None);
            tree.layout_block(child, &mut pass);
            tree.nodes[LayoutId::DOCUMENT.0].height = tree.nodes[child.0].height;
        }
        tree
    }

    /// The Document box.
    #[must_use]
    pub fn root(&self) -> LayoutId {
        LayoutId::DOCUMENT
    }

    /// Get a box by its ID.
    #[must_use]
    pub fn get(&self, id: LayoutId) -> Option<&LayoutNode> {
        self.nodes.get(id.0)
    }

    /// The children of a box, in document order.
    #[must_use]
    pub fn children(&self, id: LayoutId) -> &[LayoutId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// The number of boxes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree is empty (it never is; there is always a
    /// Document box).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over every box in document (pre-order) order.
    ///
    /// Uses an explicit work stack rather than recursion, so arbitrarily
    /// deep trees cannot exhaust the call stack.
    pub fn in_document_order(&self) -> DocumentOrderIterator<'_> {
        DocumentOrderIterator {
            tree: self,
            stack: vec![LayoutId::DOCUMENT],
        }
    }

    /// The innermost box containing the given document-coordinate point:
    /// the last containing box in document order.
    #[must_use]
    pub fn hit_test(&self, x: f32, y: f32) -> Option<LayoutId> {
        let mut hit = None;
        for id in self.in_document_order() {
            if self.nodes[id.0].contains(x, y) {
                hit = Some(id);
            }
        }
        hit
    }

    /// The first box generated for the given document node, in document
    /// order.
    #[must_use]
    pub fn find_by_dom(&self, dom_id: NodeId) -> Option<LayoutId> {
        self.in_document_order()
            .find(|id| self.nodes[id.0].dom == Some(dom_id))
    }

    fn push(
        &mut self,
        kind: LayoutKind,
        dom: Option<NodeId>,
        parent: LayoutId,
        previous: Option<LayoutId>,
    ) -> LayoutId {
        let id = LayoutId(self.nodes.len());
        self.nodes.push(LayoutNode {
            kind,
            dom,
            parent: Some(parent),
            previous,
            children: Vec::new(),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    fn layout_block(&mut self, id: LayoutId, pass: &mut LayoutPass<'_>) {
        let dom_id = self.nodes[id.0]
            .dom
            .expect("block boxes always wrap a document node");
        let parent = self.nodes[id.0]
            .parent
            .expect("block boxes always have a containing box");
        let (parent_x, parent_y, parent_width) = {
            let p = &self.nodes[parent.0];
            (p.x, p.y, p.width)
        };
        let element = pass.dom.as_element(dom_id);

        let mut x = parent_x;
        if element.is_some_and(|e| e.tag_name == "li") {
            x += LIST_INDENT;
        }

        let mut y = match self.nodes[id.0].previous {
            Some(prev) => self.nodes[prev.0].y + self.nodes[prev.0].height,
            None => parent_y,
        };
        if element.is_some_and(|e| e.tag_name == "nav" && e.id() == Some("toc")) {
            y += TOC_HEADER_HEIGHT;
        }

        let width = if element.is_some() {
            pass.styles
                .get(&dom_id)
                .and_then(|style| style.get("width"))
                .filter(|w| *w != "auto")
                .and_then(parse_px_dimension)
                .unwrap_or(parent_width)
        } else {
            parent_width
        };

        {
            let node = &mut self.nodes[id.0];
            node.x = x;
            node.y = y;
            node.width = width;
        }

        let mode = layout_mode(pass.dom, pass.styles, dom_id);
        trace!("{mode} box for {dom_id:?} at ({x}, {y}) width {width}");

        match mode {
            LayoutMode::Block => {
                let mut previous = None;
                let dom_children = pass.dom.children(dom_id).to_vec();
                for child in dom_children {
                    // head contributes no boxes at all.
                    if pass.dom.as_element(child).is_some_and(|e| e.tag_name == "head") {
                        continue;
                    }
                    let block = self.push(LayoutKind::Block, Some(child), id, previous);
                    previous = Some(block);
                }
                let children = self.nodes[id.0].children.clone();
                for child in children {
                    self.layout_block(child, pass);
                }
            }
            LayoutMode::Inline => {
                let mut cursor_x = 0.0;
                let _ = self.new_line(id);
                self.layout_inline_content(id, dom_id, &mut cursor_x, pass);
                let lines = self.nodes[id.0].children.clone();
                for line in lines {
                    self.layout_line(line, pass);
                }
            }
        }

        let height: f32 = self.nodes[id.0]
            .children
            .iter()
            .map(|child| self.nodes[child.0].height)
            .sum();
        self.nodes[id.0].height = height;
    }

    /// Open a fresh line box at the end of an inline block.
    fn new_line(&mut self, block: LayoutId) -> LayoutId {
        let previous = self.nodes[block.0].children.last().copied();
        let dom = self.nodes[block.0].dom;
        self.push(LayoutKind::Line, dom, block, previous)
    }

    /// Flow a node's text into the current block, recursing transparently
    /// through non-text descendants in document order.
    fn layout_inline_content(
        &mut self,
        block: LayoutId,
        node: NodeId,
        cursor_x: &mut f32,
        pass: &mut LayoutPass<'_>,
    ) {
        let dom = pass.dom;
        if let Some(text) = dom.as_text(node) {
            for word in text.split_whitespace() {
                self.place_word(block, node, word, cursor_x, pass);
            }
        } else {
            for &child in dom.children(node) {
                self.layout_inline_content(block, child, cursor_x, pass);
            }
        }
    }

    /// Append one word to the current line, opening a new line first when
    /// it would overflow the block. A word wider than the block still
    /// lands whole on its own line.
    fn place_word(
        &mut self,
        block: LayoutId,
        node: NodeId,
        word: &str,
        cursor_x: &mut f32,
        pass: &mut LayoutPass<'_>,
    ) {
        let style = pass
            .styles
            .get(&node)
            .expect("style resolution runs before layout");
        let font = FontDescriptor::from_style(style);
        let width = pass.measurer.measure(&font, word);

        if *cursor_x + width > self.nodes[block.0].width {
            let _ = self.new_line(block);
        }

        let line = *self.nodes[block.0]
            .children
            .last()
            .expect("inline blocks always have an open line");
        let previous = self.nodes[line.0].children.last().copied();
        let _ = self.push(
            LayoutKind::Text {
                word: word.to_string(),
                font,
            },
            Some(node),
            line,
            previous,
        );

        *cursor_x += width + pass.measurer.measure(&font, " ");
    }

    /// Position a line and its words, then align the words on a common
    /// baseline and derive the line height from the tallest metrics.
    fn layout_line(&mut self, id: LayoutId, pass: &mut LayoutPass<'_>) {
        let parent = self.nodes[id.0]
            .parent
            .expect("lines always live inside a block");
        let (parent_x, parent_y, parent_width) = {
            let p = &self.nodes[parent.0];
            (p.x, p.y, p.width)
        };
        let y = match self.nodes[id.0].previous {
            Some(prev) => self.nodes[prev.0].y + self.nodes[prev.0].height,
            None => parent_y,
        };
        {
            let node = &mut self.nodes[id.0];
            node.x = parent_x;
            node.y = y;
            node.width = parent_width;
        }

        let words = self.nodes[id.0].children.clone();
        for &word in &words {
            self.layout_word(word, pass);
        }

        if words.is_empty() {
            self.nodes[id.0].height = 0.0;
            return;
        }

        let mut max_ascent: f32 = 0.0;
        let mut max_descent: f32 = 0.0;
        for &word in &words {
            let font = self.word_font(word);
            let metrics = pass.fonts.metrics(pass.measurer, &font);
            max_ascent = max_ascent.max(metrics.ascent);
            max_descent = max_descent.max(metrics.descent);
        }

        let baseline = y + LEADING * max_ascent;
        for &word in &words {
            let font = self.word_font(word);
            let ascent = pass.fonts.metrics(pass.measurer, &font).ascent;
            self.nodes[word.0].y = baseline - ascent;
        }

        self.nodes[id.0].height = LEADING * (max_ascent + max_descent);
    }

    /// Measure one word and chain it after its predecessor on the line.
    fn layout_word(&mut self, id: LayoutId, pass: &mut LayoutPass<'_>) {
        let LayoutKind::Text { word, font } = &self.nodes[id.0].kind else {
            panic!("line children are always text boxes");
        };
        let (word, font) = (word.clone(), *font);

        let width = pass.measurer.measure(&font, &word);
        let x = match self.nodes[id.0].previous {
            Some(prev) => {
                // The separating space is measured with the previous
                // word's font.
                let space = pass.measurer.measure(&self.word_font(prev), " ");
                self.nodes[prev.0].x + self.nodes[prev.0].width + space
            }
            None => {
                let parent = self.nodes[id.0]
                    .parent
                    .expect("text boxes always live inside a line");
                self.nodes[parent.0].x
            }
        };
        let linespace = pass.fonts.metrics(pass.measurer, &font).linespace;

        let node = &mut self.nodes[id.0];
        node.x = x;
        node.width = width;
        // y is assigned by the line's baseline pass.
        node.height = linespace;
    }

    fn word_font(&self, id: LayoutId) -> FontDescriptor {
        match &self.nodes[id.0].kind {
            LayoutKind::Text { font, .. } => *font,
            _ => panic!("line children are always text boxes"),
        }
    }
}

/// Select the arrangement mode for a document node.
///
/// Text is always inline. An element with children is block as soon as
/// any child element resolved `display: block`, else inline. A childless
/// element is an empty block box.
#[must_use]
pub fn layout_mode(
    dom: &DomTree,
    styles: &HashMap<NodeId, ComputedStyle>,
    id: NodeId,
) -> LayoutMode {
    if dom.as_text(id).is_some() {
        return LayoutMode::Inline;
    }
    let children = dom.children(id);
    if children.is_empty() {
        return LayoutMode::Block;
    }
    let any_block_child = children.iter().any(|&child| {
        dom.as_element(child).is_some()
            && styles.get(&child).is_some_and(|s| s.display() == "block")
    });
    if any_block_child {
        LayoutMode::Block
    } else {
        LayoutMode::Inline
    }
}

/// Parse an explicit pixel dimension like `320px`, truncated to whole
/// pixels. Returns `None` for anything else, which falls back to the
/// containing width.
fn parse_px_dimension(value: &str) -> Option<f32> {
    value
        .replace("px", "")
        .trim()
        .parse::<f32>()
        .ok()
        .map(f32::trunc)
}

/// Pre-order iterator over layout boxes.
pub struct DocumentOrderIterator<'a> {
    tree: &'a LayoutTree,
    stack: Vec<LayoutId>,
}

impl Iterator for DocumentOrderIterator<'_> {
    type Item = LayoutId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        for &child in self.tree.children(id).iter().rev() {
            self.stack.push(child);
        }
        Some(id)
    }
}
