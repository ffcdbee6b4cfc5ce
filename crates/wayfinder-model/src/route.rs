//! Route paths for matching
//!
//! Provides [`RoutePath`] for segment-wise comparison of in-app routes.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Normalized in-app route
///
/// Query strings, fragments, repeated and trailing slashes are dropped so
/// that `/messages/`, `/messages?tab=2` and `/messages` compare equal.
///
/// # Examples
/// - `/` → root (no segments)
/// - `/admin/users` → `["admin", "users"]`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoutePath(Vec<String>);

impl RoutePath {
    /// Root route `/`
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Get path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Root route
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Same as [`RoutePath::is_root`]
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.is_root()
    }

    /// Parent route (if not root)
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    /// Append a segment, returning new path
    #[inline]
    #[must_use]
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut new = self.clone();
        new.0.push(segment.into());
        new
    }

    /// Append every segment of `tail`
    #[must_use]
    pub fn join(&self, tail: &Self) -> Self {
        let mut new = self.clone();
        new.0.extend(tail.0.iter().cloned());
        new
    }

    /// Check if this route is a segment-wise prefix of another
    ///
    /// `/admin` is a prefix of `/admin/users` but not of `/administration`.
    #[inline]
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        if self.0.len() > other.0.len() {
            return false;
        }
        self.0 == other.0[..self.0.len()]
    }

    /// Strict prefix
    #[inline]
    #[must_use]
    pub fn is_ancestor_of(&self, other: &Self) -> bool {
        self.0.len() < other.0.len() && self.is_prefix_of(other)
    }

    /// Key for prefix tries: every segment terminated by `/`
    ///
    /// Root is `/`, `/a/b` is `/a/b/`. Terminating each segment makes string
    /// prefixes coincide with segment prefixes.
    #[must_use]
    pub fn trie_key(&self) -> String {
        let mut key = String::from("/");
        for segment in &self.0 {
            key.push_str(segment);
            key.push('/');
        }
        key
    }
}

impl Display for RoutePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.0.join("/"))
    }
}

impl FromStr for RoutePath {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if !trimmed.starts_with('/') || trimmed.starts_with("//") {
            return Err(ModelError::InvalidRoute(s.to_string()));
        }

        let path = trimmed
            .split(['?', '#'])
            .next()
            .unwrap_or_default();

        let segments = path
            .split('/')
            .filter(|seg| !seg.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self(segments))
    }
}

impl TryFrom<String> for RoutePath {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RoutePath> for String {
    fn from(route: RoutePath) -> Self {
        route.to_string()
    }
}
