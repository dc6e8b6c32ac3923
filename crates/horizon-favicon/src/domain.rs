//! Validated host names.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::error::{FaviconError, Result};

/// Longest host name accepted by [`DomainName::parse`].
const MAX_NAME_LEN: usize = 253;

/// One DNS label: alphanumerics and inner hyphens, 1 to 63 characters.
static LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?$").unwrap());

/// Top-level label: letters only, or an IDN in punycode.
static TOP_LEVEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[a-z]+|xn--[a-z0-9-]+)$").unwrap());

/// An immutable, dot-separated host name such as `www.example.com`.
///
/// Equality and hashing are by label sequence.
///
/// # Example
///
/// ```
/// use horizon_favicon::DomainName;
///
/// let name = DomainName::parse("a.b.example.com")?;
/// let parent = name.parent().unwrap();
/// assert_eq!(parent.to_string(), "b.example.com");
/// assert_eq!(parent.parent().unwrap().to_string(), "example.com");
/// assert!(parent.parent().unwrap().parent().is_none());
/// # Ok::<(), horizon_favicon::FaviconError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomainName {
    labels: Vec<String>,
}

impl DomainName {
    /// Parse and validate a host name.
    ///
    /// Requires at least two labels, each a valid DNS label in lower case,
    /// with an alphabetic (or `xn--` punycode) top-level label.
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = |reason| FaviconError::InvalidFormat {
            input: text.to_string(),
            reason,
        };

        if text.is_empty() {
            return Err(invalid("empty"));
        }
        if text.len() > MAX_NAME_LEN {
            return Err(invalid("longer than 253 characters"));
        }

        let labels: Vec<&str> = text.split('.').collect();
        if labels.len() < 2 {
            return Err(invalid("fewer than two labels"));
        }
        if let Some(label) = labels.iter().find(|label| !LABEL.is_match(label)) {
            return Err(if label.is_empty() {
                invalid("empty label")
            } else {
                invalid("label is not a valid DNS label")
            });
        }
        // Checked above: labels has at least two entries.
        let top = labels[labels.len() - 1];
        if !TOP_LEVEL.is_match(top) {
            return Err(invalid("top-level label must be alphabetic"));
        }

        Ok(Self {
            labels: labels.into_iter().map(str::to_string).collect(),
        })
    }

    /// Take the host of a URL, split on dots.
    ///
    /// The URL parser's own host validation is trusted; no hostname grammar
    /// is applied here. A trailing root dot is dropped.
    pub fn from_url(url: &Url) -> Result<Self> {
        let host = url
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or_else(|| FaviconError::MissingHost(url.to_string()))?;
        let host = host.strip_suffix('.').unwrap_or(host);
        Ok(Self {
            labels: host.split('.').map(str::to_string).collect(),
        })
    }

    /// The labels, left to right.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of labels.
    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    /// Drop the left-most label.
    ///
    /// Returns `None` once two or fewer labels remain: a registrable domain
    /// such as `example.com` is the floor.
    pub fn parent(&self) -> Option<DomainName> {
        if self.labels.len() <= 2 {
            return None;
        }
        Some(Self {
            labels: self.labels[1..].to_vec(),
        })
    }

    /// This name followed by each of its parents, longest first.
    pub fn ancestors(&self) -> impl Iterator<Item = DomainName> {
        std::iter::successors(Some(self.clone()), DomainName::parent)
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.labels.join("."))
    }
}

impl FromStr for DomainName {
    type Err = FaviconError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&Url> for DomainName {
    type Error = FaviconError;

    fn try_from(url: &Url) -> Result<Self> {
        Self::from_url(url)
    }
}
