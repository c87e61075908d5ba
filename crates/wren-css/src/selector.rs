//! Selector representation and matching.
//!
//! Two selector shapes exist: a simple selector (tag or class) and a
//! descendant chain of simple selectors. Priorities: tag = 1, class = 10,
//! chain = sum of its parts. These numbers feed the cascade's priority
//! arithmetic, so they are part of the crate's contract, not a detail.

use wren_dom::{DomTree, NodeId};

/// A single condition on one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// Matches elements by tag name. Priority 1.
    Tag(String),
    /// Matches elements whose `class` attribute (whitespace-split)
    /// contains the name. Priority 10.
    Class(String),
}

impl SimpleSelector {
    /// Parse one selector word: a leading `.` denotes a class selector,
    /// anything else a tag selector.
    #[must_use]
    pub fn parse(word: &str) -> Self {
        match word.strip_prefix('.') {
            Some(class) => Self::Class(class.to_string()),
            None => Self::Tag(word.to_string()),
        }
    }

    /// The selector's cascade priority.
    #[must_use]
    pub fn priority(&self) -> u32 {
        match self {
            Self::Tag(_) => 1,
            Self::Class(_) => 10,
        }
    }

    /// Whether this selector matches the given node. Text nodes never
    /// match.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, id: NodeId) -> bool {
        let Some(element) = tree.as_element(id) else {
            return false;
        };
        match self {
            Self::Tag(tag) => element.tag_name == *tag,
            Self::Class(class) => element.classes().any(|c| c == class),
        }
    }
}

/// A full selector as stored in a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// One simple selector.
    Simple(SimpleSelector),
    /// A descendant chain, outermost ancestor first. The last component
    /// is the subject: the element the rule applies to.
    Descendant(Vec<SimpleSelector>),
}

impl Selector {
    /// The selector's cascade priority: a chain sums its components.
    #[must_use]
    pub fn priority(&self) -> u32 {
        match self {
            Self::Simple(simple) => simple.priority(),
            Self::Descendant(parts) => parts.iter().map(SimpleSelector::priority).sum(),
        }
    }

    /// Whether this selector matches the given node.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, id: NodeId) -> bool {
        match self {
            Self::Simple(simple) => simple.matches(tree, id),
            Self::Descendant(parts) => {
                let mut comparisons = 0;
                matches_descendant(tree, id, parts, &mut comparisons)
            }
        }
    }
}

/// Descendant matching as one upward walk.
///
/// The last (most specific) component must match the candidate directly.
/// Then walk the ancestor chain once, advancing the next-component pointer
/// only on a match. Each ancestor is compared against exactly one
/// component, so the whole check costs O(components + depth) comparisons,
/// not the exponential cost of retrying every suffix at every ancestor.
fn matches_descendant(
    tree: &DomTree,
    id: NodeId,
    parts: &[SimpleSelector],
    comparisons: &mut usize,
) -> bool {
    let Some((subject, ancestors_right_to_left)) = parts.split_last() else {
        return false;
    };

    *comparisons += 1;
    if !subject.matches(tree, id) {
        return false;
    }

    let mut remaining = ancestors_right_to_left;
    let mut current = tree.parent(id);
    while let Some(node) = current {
        let Some(next) = remaining.last() else { break };
        *comparisons += 1;
        if next.matches(tree, node) {
            remaining = &remaining[..remaining.len() - 1];
        }
        current = tree.parent(node);
    }

    remaining.is_empty()
}
