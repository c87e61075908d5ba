//! URL parsing and relative-reference resolution.
//!
//! [URL Standard](https://url.spec.whatwg.org/)
//!
//! This is a deliberately small model: `http` and `https` URLs with a host,
//! an optional port, a path, and an optional fragment. It covers what the
//! pipeline needs (resolving stylesheet links and anchor hrefs against the
//! document URL), not the full URL Standard.

use std::fmt;

/// Errors produced while parsing or resolving a URL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UrlError {
    /// The URL has no `scheme://` separator.
    #[error("missing scheme in URL '{0}'")]
    MissingScheme(String),
    /// The scheme is not one this pipeline retrieves.
    #[error("unsupported scheme '{0}'")]
    UnsupportedScheme(String),
    /// The port component is not a number.
    #[error("invalid port in URL '{0}'")]
    InvalidPort(String),
}

/// A parsed absolute URL.
///
/// [URL Standard § 4.1](https://url.spec.whatwg.org/#url-representation)
/// "A URL is a struct that represents a universal identifier."
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Url {
    /// The scheme, either `http` or `https`.
    pub scheme: String,
    /// The host name.
    pub host: String,
    /// The port, defaulted from the scheme when absent.
    pub port: u16,
    /// The path, always beginning with `/`.
    pub path: String,
    /// The fragment, without its leading `#`.
    pub fragment: Option<String>,
}

impl Url {
    /// Parse an absolute `http`/`https` URL.
    ///
    /// # Errors
    ///
    /// Returns a [`UrlError`] when the scheme separator is missing, the
    /// scheme is not supported, or the port is not numeric.
    pub fn parse(text: &str) -> Result<Self, UrlError> {
        let Some((scheme, rest)) = text.split_once("://") else {
            return Err(UrlError::MissingScheme(text.to_string()));
        };

        if scheme != "http" && scheme != "https" {
            return Err(UrlError::UnsupportedScheme(scheme.to_string()));
        }

        let (rest, fragment) = match rest.split_once('#') {
            Some((before, frag)) => (before, Some(frag.to_string())),
            None => (rest, None),
        };

        // A bare authority gets the root path.
        let (authority, path) = match rest.split_once('/') {
            Some((authority, tail)) => (authority, format!("/{tail}")),
            None => (rest, "/".to_string()),
        };

        let (host, port) = match authority.split_once(':') {
            Some((host, port)) => {
                let port: u16 = port
                    .parse()
                    .map_err(|_| UrlError::InvalidPort(text.to_string()))?;
                (host.to_string(), port)
            }
            None => (authority.to_string(), default_port(scheme)),
        };

        Ok(Self {
            scheme: scheme.to_string(),
            host,
            port,
            path,
            fragment,
        })
    }

    /// Resolve a reference against this URL.
    ///
    /// [URL Standard § 4.4](https://url.spec.whatwg.org/#relative-url-string)
    ///
    /// Handles the forms the pipeline encounters:
    /// - absolute URLs (`https://example.org/a.css`),
    /// - scheme-relative references (`//example.org/a.css`),
    /// - host-relative references (`/a.css`),
    /// - directory-relative references (`a.css`, `../a.css`),
    /// - same-document fragments (`#section`).
    ///
    /// # Errors
    ///
    /// Returns a [`UrlError`] when the reference is absolute but malformed.
    pub fn resolve(&self, reference: &str) -> Result<Self, UrlError> {
        if let Some(fragment) = reference.strip_prefix('#') {
            let mut url = self.clone();
            url.fragment = Some(fragment.to_string());
            return Ok(url);
        }

        if reference.contains("://") {
            return Self::parse(reference);
        }

        if let Some(rest) = reference.strip_prefix("//") {
            return Self::parse(&format!("{}://{rest}", self.scheme));
        }

        let path = if reference.starts_with('/') {
            reference.to_string()
        } else {
            // Directory-relative: drop the last path segment, then collapse
            // any leading `../` segments against the remaining directory.
            let mut dir = match self.path.rsplit_once('/') {
                Some((dir, _)) => dir.to_string(),
                None => String::new(),
            };
            let mut reference = reference;
            while let Some(rest) = reference.strip_prefix("../") {
                reference = rest;
                if let Some((parent, _)) = dir.rsplit_once('/') {
                    dir = parent.to_string();
                }
            }
            format!("{dir}/{reference}")
        };

        let (path, fragment) = match path.split_once('#') {
            Some((path, frag)) => (path.to_string(), Some(frag.to_string())),
            None => (path, None),
        };

        Ok(Self {
            scheme: self.scheme.clone(),
            host: self.host.clone(),
            port: self.port,
            path,
            fragment,
        })
    }
}

impl fmt::Display for Url {
    /// Writes the canonical form, omitting the port when it is the scheme
    /// default so that equal URLs render identically (the visited-link set
    /// compares these strings).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.host)?;
        if self.port != default_port(&self.scheme) {
            write!(f, ":{}", self.port)?;
        }
        write!(f, "{}", self.path)?;
        if let Some(fragment) = &self.fragment {
            write!(f, "#{fragment}")?;
        }
        Ok(())
    }
}

fn default_port(scheme: &str) -> u16 {
    if scheme == "https" { 443 } else { 80 }
}
