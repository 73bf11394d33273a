//! Vertex identifiers.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Identifier of a vertex in a [`Dag`](crate::Dag).
///
/// Vertex IDs are human-readable strings like "build", "test", "deploy".
/// They order lexicographically, which fixes the order in which ready
/// vertices are produced during iteration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VertexId(String);

impl VertexId {
    /// Creates a new vertex ID from a string.
    ///
    /// # Examples
    ///
    /// ```
    /// use e3_collection::VertexId;
    ///
    /// let id = VertexId::new("build");
    /// assert_eq!(id.as_str(), "build");
    /// ```
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    /// Returns the vertex ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for VertexId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for VertexId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<&VertexId> for VertexId {
    fn from(id: &VertexId) -> Self {
        id.clone()
    }
}

impl AsRef<str> for VertexId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for VertexId {
    fn borrow(&self) -> &str {
        &self.0
    }
}
