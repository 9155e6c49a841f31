//! Fragment classification
//!
//! The URL fragment is an addressing scheme for where the initial diagram
//! comes from:
//!
//! - `#<key>` — a diagram saved in the local key-value store
//! - `#!<key>` — a snapshot in the remote store
//! - `#r=<iri>[;<iri>...]` — no snapshot; hydrate from these resources
//!
//! Anything else addresses nothing.

use serde::{Deserialize, Serialize};

/// Fragment prefix for remote snapshot keys
pub const CLOUD_PREFIX: &str = "!";
/// Fragment prefix for named resource lists
pub const RESOURCES_PREFIX: &str = "r=";
/// Separator between IRIs in a named resource list
pub const RESOURCE_SEPARATOR: char = ';';

/// An opaque external identifier for a domain entity
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceIri(String);

impl ResourceIri {
    pub fn new(iri: impl Into<String>) -> Self {
        Self(iri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ResourceIri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ResourceIri {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ResourceIri {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// What a URL fragment refers to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FragmentReference {
    LocalKey(String),
    CloudKey(String),
    NamedResources(Vec<ResourceIri>),
    None,
}

impl FragmentReference {
    /// Classify a fragment. A leading `#` is optional.
    ///
    /// Prefixed forms are tested before the generic local key, so `#!abc`
    /// is never read as the local key `!abc`.
    pub fn parse(fragment: &str) -> Self {
        let body = fragment.strip_prefix('#').unwrap_or(fragment);

        if let Some(key) = body.strip_prefix(CLOUD_PREFIX) {
            return if key.is_empty() {
                Self::None
            } else {
                Self::CloudKey(key.to_string())
            };
        }

        if let Some(list) = body.strip_prefix(RESOURCES_PREFIX) {
            let iris: Vec<ResourceIri> = list
                .split(RESOURCE_SEPARATOR)
                .filter(|s| !s.is_empty())
                .map(ResourceIri::from)
                .collect();
            return if iris.is_empty() {
                Self::None
            } else {
                Self::NamedResources(iris)
            };
        }

        if body.is_empty() {
            Self::None
        } else {
            Self::LocalKey(body.to_string())
        }
    }

    /// Classify the fragment of a full URL. A URL without a fragment, or one
    /// that does not parse, classifies as `None`.
    pub fn from_url(url: &str) -> Self {
        match reqwest::Url::parse(url) {
            Ok(parsed) => parsed.fragment().map(Self::parse).unwrap_or(Self::None),
            Err(_) => Self::None,
        }
    }

    /// Classify either a full URL or a bare fragment.
    ///
    /// Only an absolute URL goes through URL parsing. A bare fragment may
    /// itself hold `://` inside resource IRIs.
    pub fn from_location(location: &str) -> Self {
        if !location.starts_with('#') && location.contains("://") {
            if let Ok(parsed) = reqwest::Url::parse(location) {
                return parsed.fragment().map(Self::parse).unwrap_or(Self::None);
            }
        }
        Self::parse(location)
    }

    /// Encode back into `#...` form. `None` encodes as the empty string.
    pub fn to_fragment(&self) -> String {
        match self {
            Self::LocalKey(key) => format!("#{}", key),
            Self::CloudKey(key) => format!("#{}{}", CLOUD_PREFIX, key),
            Self::NamedResources(iris) => {
                let joined: Vec<&str> = iris.iter().map(ResourceIri::as_str).collect();
                format!(
                    "#{}{}",
                    RESOURCES_PREFIX,
                    joined.join(&RESOURCE_SEPARATOR.to_string())
                )
            }
            Self::None => String::new(),
        }
    }

    pub fn local_key(&self) -> Option<&str> {
        match self {
            Self::LocalKey(key) => Some(key),
            _ => None,
        }
    }

    pub fn cloud_key(&self) -> Option<&str> {
        match self {
            Self::CloudKey(key) => Some(key),
            _ => None,
        }
    }

    pub fn named_resources(&self) -> Option<&[ResourceIri]> {
        match self {
            Self::NamedResources(iris) => Some(iris),
            _ => None,
        }
    }
}

impl std::fmt::Display for FragmentReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LocalKey(key) => write!(f, "local key '{}'", key),
            Self::CloudKey(key) => write!(f, "cloud key '{}'", key),
            Self::NamedResources(iris) => write!(f, "{} named resource(s)", iris.len()),
            Self::None => write!(f, "nothing"),
        }
    }
}

/// True if a stored-key lookup miss should stay quiet: the key is really a
/// cloud or resource reference that reached the local store.
pub fn looks_prefixed(key: &str) -> bool {
    key.starts_with(CLOUD_PREFIX) || key.chars().nth(1) == Some('=')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iris(list: &[&str]) -> Vec<ResourceIri> {
        list.iter().map(|s| ResourceIri::from(*s)).collect()
    }

    #[test]
    fn local_key() {
        assert_eq!(
            FragmentReference::parse("#a1b2c3"),
            FragmentReference::LocalKey("a1b2c3".into())
        );
    }

    #[test]
    fn leading_hash_is_optional() {
        assert_eq!(
            FragmentReference::parse("a1b2c3"),
            FragmentReference::parse("#a1b2c3")
        );
    }

    #[test]
    fn cloud_key_beats_local_key() {
        assert_eq!(
            FragmentReference::parse("#!deadbeef"),
            FragmentReference::CloudKey("deadbeef".into())
        );
    }

    #[test]
    fn named_resources_beat_local_key() {
        assert_eq!(
            FragmentReference::parse("#r=ex:Alice;ex:Bob"),
            FragmentReference::NamedResources(iris(&["ex:Alice", "ex:Bob"]))
        );
    }

    #[test]
    fn single_named_resource() {
        assert_eq!(
            FragmentReference::parse("#r=http://example.org/a"),
            FragmentReference::NamedResources(iris(&["http://example.org/a"]))
        );
    }

    #[test]
    fn empty_and_bare_prefixes_are_none() {
        for fragment in ["", "#", "#!", "#r=", "#r=;;"] {
            assert_eq!(
                FragmentReference::parse(fragment),
                FragmentReference::None,
                "fragment {:?}",
                fragment
            );
        }
    }

    #[test]
    fn empty_segments_are_dropped() {
        assert_eq!(
            FragmentReference::parse("#r=ex:a;;ex:b;"),
            FragmentReference::NamedResources(iris(&["ex:a", "ex:b"]))
        );
    }

    #[test]
    fn bare_r_is_a_local_key() {
        assert_eq!(
            FragmentReference::parse("#r"),
            FragmentReference::LocalKey("r".into())
        );
        assert_eq!(
            FragmentReference::parse("#rx=1"),
            FragmentReference::LocalKey("rx=1".into())
        );
    }

    #[test]
    fn from_url_reads_the_fragment() {
        assert_eq!(
            FragmentReference::from_url("https://example.org/editor.html#!abc"),
            FragmentReference::CloudKey("abc".into())
        );
        assert_eq!(
            FragmentReference::from_url("https://example.org/editor.html"),
            FragmentReference::None
        );
        assert_eq!(FragmentReference::from_url("not a url"), FragmentReference::None);
    }

    #[test]
    fn from_location_accepts_both_forms() {
        assert_eq!(
            FragmentReference::from_location("https://example.org/#key1"),
            FragmentReference::LocalKey("key1".into())
        );
        assert_eq!(
            FragmentReference::from_location("#key1"),
            FragmentReference::LocalKey("key1".into())
        );
    }

    #[test]
    fn bare_fragment_with_http_iris_is_not_a_url() {
        let expected = FragmentReference::NamedResources(iris(&[
            "http://example.org/a",
            "http://example.org/b",
        ]));
        assert_eq!(
            FragmentReference::from_location("#r=http://example.org/a;http://example.org/b"),
            expected
        );
        assert_eq!(
            FragmentReference::from_location("r=http://example.org/a;http://example.org/b"),
            expected
        );
        assert_eq!(
            FragmentReference::from_location(
                "https://example.org/editor.html#r=http://example.org/a;http://example.org/b"
            ),
            expected
        );
    }

    #[test]
    fn encoding_inverts_parsing() {
        for fragment in ["#abc", "#!abc", "#r=ex:a;ex:b"] {
            assert_eq!(FragmentReference::parse(fragment).to_fragment(), fragment);
        }
        assert_eq!(FragmentReference::None.to_fragment(), "");
    }

    #[test]
    fn classification_is_total_and_deterministic() {
        let samples = ["#", "#!", "#!x", "#r", "#r=", "#r=x", "#x", "x", "!", "r=", "#=#"];
        for s in samples {
            let first = FragmentReference::parse(s);
            assert_eq!(first, FragmentReference::parse(s));
            let variants = [
                first.local_key().is_some(),
                first.cloud_key().is_some(),
                first.named_resources().is_some(),
                first == FragmentReference::None,
            ];
            assert_eq!(variants.iter().filter(|v| **v).count(), 1, "fragment {:?}", s);
        }
    }

    #[test]
    fn prefixed_keys_are_recognized() {
        assert!(looks_prefixed("!abc"));
        assert!(looks_prefixed("r=ex:a"));
        assert!(!looks_prefixed("abc"));
        assert!(!looks_prefixed("a"));
    }
}
