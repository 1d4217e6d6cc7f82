use std::fmt::Display;

/// Canonical request identity used for cache lookups
///
/// Holds the fully resolved request URL, including the fixed query parameters merged in by
/// the client, so two logically equal requests always map to the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey(String);

impl RequestKey {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RequestKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<url::Url> for RequestKey {
    fn from(url: url::Url) -> Self {
        Self(url.into())
    }
}
