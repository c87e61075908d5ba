//! Computed style storage.
//!
//! A computed style is a plain property-name-to-string map over the small
//! vocabulary this engine understands. By the time one exists, shorthand
//! keys are gone (expanded at parse time) and percentages are gone
//! (resolved during the cascade); layout reads final longhand values
//! only, and never mutates them.

use std::collections::HashMap;

/// The inherited properties and their root defaults.
///
/// Every node's style starts from its parent's values for exactly these
/// properties; a node without a parent starts from the defaults given
/// here. Everything else must come from a rule or inline style.
pub const INHERITED_PROPERTIES: &[(&str, &str)] = &[
    ("font-size", "16px"),
    ("font-style", "normal"),
    ("font-weight", "normal"),
    ("color", "black"),
    ("display", "inline"),
];

/// The fallback font size used when a parent size is missing or
/// unparsable.
pub const DEFAULT_FONT_SIZE_PX: f32 = 16.0;

/// The resolved style of one node.
///
/// Created fresh on every style pass and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComputedStyle {
    properties: HashMap<String, String>,
}

impl ComputedStyle {
    /// Create an empty style map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a property value.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<&str> {
        self.properties.get(property).map(String::as_str)
    }

    /// Set a property value, replacing any previous one.
    pub fn set(&mut self, property: impl Into<String>, value: impl Into<String>) {
        let _ = self.properties.insert(property.into(), value.into());
    }

    /// The node's display value, defaulting to `inline`.
    #[must_use]
    pub fn display(&self) -> &str {
        self.get("display").unwrap_or("inline")
    }

    /// The node's font size in pixels, if it is a well-formed `px` value.
    #[must_use]
    pub fn font_size_px(&self) -> Option<f32> {
        self.get("font-size")?
            .strip_suffix("px")?
            .trim()
            .parse()
            .ok()
    }

    /// Iterate over all (property, value) entries, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The number of properties set on this node.
    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether no properties are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}
