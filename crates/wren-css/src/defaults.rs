//! The built-in default stylesheet.
//!
//! The single non-author cascade layer: it gives the handful of tags the
//! engine knows their expected rendering, so a document with no styles of
//! its own still gets block paragraphs, blue links, and bold headings.
//! Author rules append after these and override through higher selector
//! priority or `!important`; equal-priority ties keep the earliest rule,
//! by the cascade's stable ordering.

use crate::parser::{CssParser, Rule};

/// The default sheet source, compiled into the crate.
pub const DEFAULT_STYLE_SHEET: &str = "\
a { color: blue; }
i { font-style: italic; }
em { font-style: italic; }
b { font-weight: bold; }
strong { font-weight: bold; }
small { font-size: 90%; }
big { font-size: 110%; }
h1 { display: block; font-size: 200%; font-weight: bold; }
h2 { display: block; font-size: 150%; font-weight: bold; }
h3 { display: block; font-size: 120%; font-weight: bold; }
h4 { display: block; font-weight: bold; }
h5 { display: block; font-weight: bold; }
h6 { display: block; font-weight: bold; }
html { display: block; }
body { display: block; }
p { display: block; }
div { display: block; }
ul { display: block; }
ol { display: block; }
li { display: block; }
nav { display: block; }
main { display: block; }
header { display: block; }
footer { display: block; }
section { display: block; }
article { display: block; }
aside { display: block; }
blockquote { display: block; }
pre { display: block; }
";

/// Parse the default sheet into rules.
///
/// Called once per page load; author rules append after these.
#[must_use]
pub fn default_rules() -> Vec<Rule> {
    CssParser::new(DEFAULT_STYLE_SHEET).parse()
}
