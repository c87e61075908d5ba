//! Tree construction from tokens.
//!
//! The builder keeps a stack of unfinished elements, seeded with a
//! synthetic `html` root. Every recovery rule ends with the same guarantee:
//! whatever the input, the output is one well-formed tree and no error is
//! ever raised.

use wren_common::warning::warn_once;
use wren_dom::{AttributesMap, DomTree, ElementData, NodeId, NodeType};

use crate::tokenizer::{Token, Tokenizer};

/// Void elements: appended childless, never pushed as unfinished frames.
///
/// [WHATWG § 13.1.2](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
/// "Void elements only have a start tag; end tags must not be specified
/// for void elements."
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Incremental tree builder over a token stream.
pub struct TreeBuilder {
    tree: DomTree,
    /// Stack of elements whose closing tag has not been seen yet,
    /// outermost first. Index 0 is always the synthetic root.
    unfinished: Vec<NodeId>,
}

impl TreeBuilder {
    /// Create a builder with the synthetic `html` root already open.
    #[must_use]
    pub fn new() -> Self {
        let mut tree = DomTree::new();
        let root = tree.alloc(NodeType::Element(ElementData {
            tag_name: "html".to_string(),
            attrs: AttributesMap::new(),
        }));
        Self {
            tree,
            unfinished: vec![root],
        }
    }

    /// Consume a token stream and return the finished tree.
    #[must_use]
    pub fn run(mut self, tokens: impl IntoIterator<Item = Token>) -> DomTree {
        for token in tokens {
            match token {
                Token::Text(text) => self.add_text(&text),
                Token::Tag(tag) => self.add_tag(&tag),
            }
        }
        self.finish()
    }

    /// Attach a text token to the innermost unfinished element.
    ///
    /// Whitespace-only text is inter-tag formatting, not content: dropped.
    fn add_text(&mut self, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        let parent = *self
            .unfinished
            .last()
            .expect("the unfinished stack always holds the root");
        let node = self.tree.alloc(NodeType::Text(text.to_string()));
        self.tree.append_child(parent, node);
    }

    /// Process a raw tag token.
    fn add_tag(&mut self, raw: &str) {
        let (tag, attrs) = parse_tag_text(raw);

        if tag.starts_with('!') {
            // Comments and doctypes contribute nothing to the tree.
            return;
        }

        if let Some(name) = tag.strip_prefix('/') {
            // A closing tag pops the innermost unfinished element,
            // whatever its name. An unbalanced close with only the root
            // left is ignored.
            if self.unfinished.len() == 1 {
                warn_once("HTML", &format!("ignoring unbalanced closing tag '</{name}>'"));
                return;
            }
            let node = self
                .unfinished
                .pop()
                .expect("checked above that the stack has more than the root");
            let parent = *self
                .unfinished
                .last()
                .expect("the unfinished stack always holds the root");
            self.tree.append_child(parent, node);
        } else if VOID_ELEMENTS.contains(&tag.as_str()) {
            let parent = *self
                .unfinished
                .last()
                .expect("the unfinished stack always holds the root");
            let node = self.tree.alloc(NodeType::Element(ElementData {
                tag_name: tag,
                attrs,
            }));
            self.tree.append_child(parent, node);
        } else {
            let node = self.tree.alloc(NodeType::Element(ElementData {
                tag_name: tag,
                attrs,
            }));
            self.unfinished.push(node);
        }
    }

    /// Close every still-unfinished element, innermost first, and return
    /// the tree with the root attached under the Document node.
    fn finish(mut self) -> DomTree {
        while self.unfinished.len() > 1 {
            let node = self
                .unfinished
                .pop()
                .expect("loop condition guarantees more than one entry");
            let parent = *self
                .unfinished
                .last()
                .expect("loop condition guarantees a remaining parent");
            self.tree.append_child(parent, node);
        }
        let root = self
            .unfinished
            .pop()
            .expect("the unfinished stack always holds the root");
        self.tree.append_child(NodeId::ROOT, root);
        self.tree
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a complete markup string into a tree.
#[must_use]
pub fn parse(markup: &str) -> DomTree {
    TreeBuilder::new().run(Tokenizer::new(markup))
}

/// Split raw tag text into a lowercased tag name and an attribute table.
///
/// Splitting happens on whitespace, except inside single- or double-quoted
/// values, which stay atomic even when they contain spaces. Attribute keys
/// are lowercased; values keep their case with surrounding quotes stripped.
/// A bare attribute maps to the empty string.
fn parse_tag_text(raw: &str) -> (String, AttributesMap) {
    let mut parts: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut quote_char: Option<char> = None;

    for c in raw.chars() {
        match c {
            '"' | '\'' => {
                match quote_char {
                    None => quote_char = Some(c),
                    Some(q) if q == c => quote_char = None,
                    Some(_) => {}
                }
                current.push(c);
            }
            c if c.is_whitespace() && quote_char.is_none() => {
                if !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        parts.push(current);
    }

    let Some((first, rest)) = parts.split_first() else {
        return (String::new(), AttributesMap::new());
    };

    let tag = first.to_lowercase();
    let mut attrs = AttributesMap::new();

    for pair in rest {
        match pair.split_once('=') {
            Some((key, value)) => {
                let _ = attrs.insert(key.to_lowercase(), strip_quotes(value).to_string());
            }
            None => {
                let _ = attrs.insert(pair.to_lowercase(), String::new());
            }
        }
    }

    (tag, attrs)
}

/// Strip one layer of matching surrounding quotes from an attribute value.
fn strip_quotes(value: &str) -> &str {
    let mut chars = value.chars();
    match (chars.next(), chars.next_back()) {
        (Some(open @ ('"' | '\'')), Some(close)) if open == close => {
            &value[1..value.len() - 1]
        }
        _ => value,
    }
}

/// Print a subtree to stdout with indentation, for debugging.
pub fn print_tree(tree: &DomTree, id: NodeId, depth: usize) {
    let Some(node) = tree.get(id) else { return };
    let pad = "  ".repeat(depth);
    match &node.node_type {
        NodeType::Document => println!("{pad}#document"),
        NodeType::Element(data) => {
            let mut attrs: Vec<String> = data
                .attrs
                .iter()
                .map(|(k, v)| format!(" {k}=\"{v}\""))
                .collect();
            attrs.sort();
            println!("{pad}<{}{}>", data.tag_name, attrs.join(""));
        }
        NodeType::Text(text) => println!("{pad}{text:?}"),
    }
    for &child in tree.children(id) {
        print_tree(tree, child, depth + 1);
    }
}
