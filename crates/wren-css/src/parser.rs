//! Stylesheet parsing.
//!
//! A recursive-descent parser over CSS-like text. The grammar is a
//! sequence of `selector-chain { declaration* }` blocks; everything the
//! parser cannot make sense of is skipped, never reported: a malformed
//! declaration abandons only itself (skip to the next `;` or `}`), a
//! malformed selector abandons its whole rule (skip past the next `}`).
//! `parse` therefore succeeds on any input; a fully malformed sheet just
//! yields no rules.

use std::collections::HashMap;

use crate::selector::{Selector, SimpleSelector};

/// A single parsed declaration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// The raw value text, trimmed, with any `!important` removed.
    pub value: String,
    /// Whether the declaration carried `!important`.
    pub important: bool,
}

/// Property name (lowercased, longhand) to declaration.
///
/// Shorthands are expanded before storage, so consumers only ever see
/// longhand keys.
pub type DeclarationMap = HashMap<String, Declaration>;

/// A parsed rule: one selector with its declaration block.
///
/// Rules are immutable once parsed. A stylesheet is an ordered `Vec<Rule>`;
/// the order is a cascade tie-break, so it must be preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// The selector this rule applies through.
    pub selector: Selector,
    /// The rule's declarations, shorthand-expanded.
    pub declarations: DeclarationMap,
}

/// Internal parse failure. Never escapes [`CssParser::parse`]; it exists
/// so the productions can bail with `?` and let the recovery loops decide
/// how much input to abandon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
enum ParseError {
    #[error("expected a word at offset {at}")]
    ExpectedWord { at: usize },
    #[error("expected '{expected}' at offset {at}")]
    Expected { expected: char, at: usize },
}

/// Recursive-descent stylesheet parser.
pub struct CssParser {
    chars: Vec<char>,
    i: usize,
}

impl CssParser {
    /// Create a parser over the given stylesheet text.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            i: 0,
        }
    }

    /// Parse a whole stylesheet into an ordered rule list.
    ///
    /// Never fails: malformed rules are skipped via [`Self::ignore_until`].
    pub fn parse(&mut self) -> Vec<Rule> {
        let mut rules = Vec::new();
        while self.i < self.chars.len() {
            match self.rule() {
                Ok(rule) => rules.push(rule),
                Err(_) => match self.ignore_until(&['}']) {
                    Some('}') => {
                        self.i += 1;
                        self.whitespace();
                    }
                    _ => break,
                },
            }
        }
        rules
    }

    /// Parse a bare declaration body (no surrounding braces), as found in
    /// an inline `style` attribute.
    pub fn parse_declarations(&mut self) -> DeclarationMap {
        self.whitespace();
        self.body()
    }

    fn rule(&mut self) -> Result<Rule, ParseError> {
        self.whitespace();
        let selector = self.selector()?;
        self.literal('{')?;
        self.whitespace();
        let declarations = self.body();
        self.literal('}')?;
        Ok(Rule {
            selector,
            declarations,
        })
    }

    /// A whitespace-separated chain of simple selectors, up to `{`.
    fn selector(&mut self) -> Result<Selector, ParseError> {
        let mut parts = vec![SimpleSelector::parse(&self.word()?.to_lowercase())];
        self.whitespace();
        while self.peek().is_some_and(|c| c != '{') {
            let word = self.word()?;
            parts.push(SimpleSelector::parse(&word.to_lowercase()));
            self.whitespace();
        }
        if parts.len() == 1 {
            Ok(Selector::Simple(parts.remove(0)))
        } else {
            Ok(Selector::Descendant(parts))
        }
    }

    /// A declaration block body, up to (not including) the closing `}`.
    ///
    /// A failed declaration abandons only itself: skip to the next `;` and
    /// keep going, or stop at the block's `}`.
    fn body(&mut self) -> DeclarationMap {
        let mut declarations = DeclarationMap::new();
        while self.peek().is_some_and(|c| c != '}') {
            if self.declaration(&mut declarations).is_err() {
                match self.ignore_until(&[';', '}']) {
                    Some(';') => {
                        self.i += 1;
                        self.whitespace();
                    }
                    _ => break,
                }
            }
        }
        declarations
    }

    /// One `property : value ;` declaration, expanded into the map.
    fn declaration(&mut self, declarations: &mut DeclarationMap) -> Result<(), ParseError> {
        let (property, value, important) = self.pair()?;
        for (name, value) in expand_shorthand(&property, &value) {
            let _ = declarations.insert(name, Declaration { value, important });
        }
        self.whitespace();
        self.literal(';')?;
        self.whitespace();
        Ok(())
    }

    /// A `property : value` pair. The value is read verbatim until the
    /// next `;` or `}`, then split from its `!important` marker.
    fn pair(&mut self) -> Result<(String, String, bool), ParseError> {
        let property = self.word()?.to_lowercase();
        self.whitespace();
        self.literal(':')?;
        self.whitespace();

        let start = self.i;
        while self.peek().is_some_and(|c| c != ';' && c != '}') {
            self.i += 1;
        }
        let raw: String = self.chars[start..self.i].iter().collect();
        let (value, important) = split_important(raw.trim());
        Ok((property, value, important))
    }

    /// A word: alphanumerics plus the selector/value punctuation `#-.%`.
    fn word(&mut self) -> Result<String, ParseError> {
        let start = self.i;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || matches!(c, '#' | '-' | '.' | '%') {
                self.i += 1;
            } else {
                break;
            }
        }
        if self.i == start {
            return Err(ParseError::ExpectedWord { at: self.i });
        }
        Ok(self.chars[start..self.i].iter().collect())
    }

    fn literal(&mut self, expected: char) -> Result<(), ParseError> {
        if self.peek() == Some(expected) {
            self.i += 1;
            Ok(())
        } else {
            Err(ParseError::Expected {
                expected,
                at: self.i,
            })
        }
    }

    fn whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.i += 1;
        }
    }

    /// Skip forward to (not past) the first of `stops`, returning which
    /// one was found, or `None` at end of input.
    fn ignore_until(&mut self, stops: &[char]) -> Option<char> {
        while let Some(c) = self.peek() {
            if stops.contains(&c) {
                return Some(c);
            }
            self.i += 1;
        }
        None
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.i).copied()
    }
}

/// Strip a trailing `!important` (any casing, any spacing) from a value.
fn split_important(value: &str) -> (String, bool) {
    let trimmed = value.trim_end();
    let lower = trimmed.to_ascii_lowercase();
    if let Some(head) = lower.strip_suffix("important") {
        // ASCII lowercasing preserves byte offsets.
        let head = trimmed[..head.len()].trim_end();
        if let Some(before_bang) = head.strip_suffix('!') {
            return (before_bang.trim_end().to_string(), true);
        }
    }
    (trimmed.to_string(), false)
}

/// Expand a shorthand property into its longhands; anything that is not a
/// known shorthand passes through unchanged.
fn expand_shorthand(property: &str, value: &str) -> Vec<(String, String)> {
    match property {
        "font" => expand_font(value),
        "margin" | "padding" => expand_edges(property, value),
        _ => vec![(property.to_string(), value.to_string())],
    }
}

/// `font` expands into style/weight/size, but only when a recognizable
/// size token (one with a unit suffix) is present; otherwise the whole
/// shorthand is discarded.
fn expand_font(value: &str) -> Vec<(String, String)> {
    const SIZE_UNITS: &[&str] = &["px", "%", "em", "pt", "rem"];

    let mut style = "normal";
    let mut weight = "normal";
    let mut size = None;
    for part in value.split_whitespace() {
        if matches!(part, "italic" | "oblique" | "normal") {
            style = part;
        } else if matches!(part, "bold" | "bolder" | "lighter")
            || (!part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
        {
            weight = part;
        } else if SIZE_UNITS.iter().any(|unit| part.contains(unit)) {
            size = Some(part);
        }
    }

    match size {
        Some(size) => vec![
            ("font-style".to_string(), style.to_string()),
            ("font-weight".to_string(), weight.to_string()),
            ("font-size".to_string(), size.to_string()),
        ],
        None => Vec::new(),
    }
}

/// `margin`/`padding` expand with the standard edge rules: one value for
/// all sides; two as vertical, horizontal; three as top, horizontal,
/// bottom; four clockwise from the top. Any other count discards the
/// shorthand.
fn expand_edges(property: &str, value: &str) -> Vec<(String, String)> {
    let parts: Vec<&str> = value.split_whitespace().collect();
    let (top, right, bottom, left) = match parts.as_slice() {
        [all] => (*all, *all, *all, *all),
        [vertical, horizontal] => (*vertical, *horizontal, *vertical, *horizontal),
        [top, horizontal, bottom] => (*top, *horizontal, *bottom, *horizontal),
        [top, right, bottom, left] => (*top, *right, *bottom, *left),
        _ => return Vec::new(),
    };
    vec![
        (format!("{property}-top"), top.to_string()),
        (format!("{property}-right"), right.to_string()),
        (format!("{property}-bottom"), bottom.to_string()),
        (format!("{property}-left"), left.to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_important_variants() {
        assert_eq!(split_important("red"), ("red".to_string(), false));
        assert_eq!(split_important("red !important"), ("red".to_string(), true));
        assert_eq!(split_important("red!important"), ("red".to_string(), true));
        assert_eq!(
            split_important("red ! IMPORTANT"),
            ("red".to_string(), true)
        );
        // Only a trailing marker counts.
        assert_eq!(
            split_important("!important red"),
            ("!important red".to_string(), false)
        );
    }

    #[test]
    fn font_shorthand_requires_a_size() {
        assert!(expand_font("bold italic").is_empty());
        let expanded = expand_font("italic bold 16px");
        assert_eq!(expanded.len(), 3);
        assert!(expanded.contains(&("font-size".to_string(), "16px".to_string())));
    }
}
