//! Shared utilities for the wren rendering pipeline.
//!
//! This crate holds the pieces that several pipeline stages need but that
//! belong to none of them: URL parsing and relative-reference resolution,
//! blocking HTTP fetch helpers, and deduplicated warning output.

/// Blocking HTTP fetch helpers.
pub mod net;
/// URL parsing and relative-reference resolution.
pub mod url;
/// Deduplicated warning output.
pub mod warning;

pub use net::{FetchError, fetch_text};
pub use url::{Url, UrlError};
pub use warning::{clear_warnings, warn_once};
