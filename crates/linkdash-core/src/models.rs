//! Data models for linkdash
//!
//! Defines the `Link` record and the URL normalization rule shared by the
//! save form and tile navigation.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Scheme prepended to URLs that do not already start with `http`
const DEFAULT_SCHEME: &str = "https://";

/// Opaque link identifier
///
/// New links get a v4 UUID string, but any string found in storage is
/// accepted and kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkId(String);

impl LinkId {
    /// A fresh random ID
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for LinkId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for LinkId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A saved shortcut shown as a tile on the dashboard
///
/// Serialized as `{id, title, urlString}`; the field names are the on-disk
/// format and must not change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Link {
    /// Unique identifier, never reused
    pub id: LinkId,
    /// Display title
    pub title: String,
    /// Target URL, stored as entered after normalization
    #[serde(rename = "urlString")]
    pub url_string: String,
}

impl Link {
    /// Create a new link with a freshly generated ID
    pub fn new(title: impl Into<String>, url_string: impl Into<String>) -> Self {
        Self::with_id(LinkId::generate(), title, url_string)
    }

    /// Create a link with a specific ID (for loading from storage)
    pub fn with_id(
        id: impl Into<LinkId>,
        title: impl Into<String>,
        url_string: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url_string: url_string.into(),
        }
    }

    /// The URL to open when the tile is clicked
    ///
    /// Recomputed on every call so links stored before normalization
    /// existed still open correctly.
    pub fn target_url(&self) -> String {
        normalize_url(&self.url_string)
    }
}

/// Prefix `https://` to a URL unless it already begins with `http`
///
/// The check is an ASCII case-insensitive prefix match only: `HTTP://x.com`
/// is left alone and `httpbin.org` is treated as already having a scheme.
pub fn normalize_url(url: &str) -> String {
    let has_scheme = url
        .get(..4)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("http"));

    if has_scheme {
        url.to_string()
    } else {
        format!("{}{}", DEFAULT_SCHEME, url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_new() {
        let link = Link::new("Mail", "https://mail.example.com");
        assert_eq!(link.title, "Mail");
        assert_eq!(link.url_string, "https://mail.example.com");
    }

    #[test]
    fn test_link_new_generates_unique_ids() {
        let a = Link::new("A", "a.com");
        let b = Link::new("A", "a.com");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_link_with_id() {
        let id = LinkId::generate();
        let link = Link::with_id(id.clone(), "Docs", "docs.rs");
        assert_eq!(link.id, id);
        assert_eq!(link.url_string, "docs.rs");
    }

    #[test]
    fn test_generated_id_is_uuid() {
        let id = LinkId::generate();
        assert!(Uuid::parse_str(id.as_str()).is_ok());
    }

    #[test]
    fn test_non_uuid_id_deserializes() {
        let json = r#"{"id":"1700000000000","title":"Mail","urlString":"mail.example.com"}"#;
        let link: Link = serde_json::from_str(json).unwrap();
        assert_eq!(link.id.as_str(), "1700000000000");

        let back = serde_json::to_string(&link).unwrap();
        assert_eq!(back, json);
    }

    #[test]
    fn test_normalize_adds_scheme() {
        assert_eq!(normalize_url("example.com"), "https://example.com");
    }

    #[test]
    fn test_normalize_is_case_insensitive() {
        assert_eq!(normalize_url("HTTP://x.com"), "HTTP://x.com");
        assert_eq!(normalize_url("Https://x.com"), "Https://x.com");
        assert_eq!(normalize_url("http://x.com"), "http://x.com");
    }

    #[test]
    fn test_normalize_prefix_only() {
        // No scheme rewriting, only a prefix check
        assert_eq!(normalize_url("httpbin.org"), "httpbin.org");
        assert_eq!(normalize_url("ftp://files"), "https://ftp://files");
    }

    #[test]
    fn test_normalize_short_and_multibyte_input() {
        assert_eq!(normalize_url("ht"), "https://ht");
        assert_eq!(normalize_url("æøå.dk"), "https://æøå.dk");
    }

    #[test]
    fn test_target_url_recomputed() {
        let link = Link::new("Mail", "mail.example.com");
        assert_eq!(link.target_url(), "https://mail.example.com");
        assert_eq!(link.url_string, "mail.example.com");
    }

    #[test]
    fn test_link_serialization_field_names() {
        let link = Link::new("Mail", "https://mail.example.com");
        let json = serde_json::to_value(&link).unwrap();
        assert_eq!(json["title"], "Mail");
        assert_eq!(json["urlString"], "https://mail.example.com");
        assert_eq!(json["id"], link.id.to_string());

        let deserialized: Link = serde_json::from_value(json).unwrap();
        assert_eq!(link, deserialized);
    }
}
