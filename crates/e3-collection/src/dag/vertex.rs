//! Vertex declarations.

use super::VertexId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Declaration of a vertex: its ID, optional data, predecessors and tag.
///
/// Used both to insert vertices into a [`Dag`](crate::Dag) and as the
/// per-vertex entry of a serialized [`DagSpec`](crate::DagSpec).
///
/// # Example
///
/// ```rust
/// use e3_collection::{Dag, Vertex};
///
/// let mut dag = Dag::new();
/// dag.add_vertex(Vertex::new("fetch").with_data(1)).unwrap();
/// dag.add_vertex(Vertex::new("build").with_data(2).with_predecessors(["fetch"]))
///     .unwrap();
///
/// assert_eq!(dag.get("build"), Some(&2));
/// assert!(dag.predecessors("build").contains("fetch"));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vertex<T> {
    /// Vertex identifier.
    pub id: VertexId,
    /// Data attached to the vertex. `None` keeps existing data on update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Vertices that must be visited before this one.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub predecessors: BTreeSet<VertexId>,
    /// Optional tag, searched by context queries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<serde_json::Value>,
}

impl<T> Vertex<T> {
    /// Creates a vertex declaration with no data, predecessors or tag.
    pub fn new(id: impl Into<VertexId>) -> Self {
        Self {
            id: id.into(),
            data: None,
            predecessors: BTreeSet::new(),
            tag: None,
        }
    }

    /// Sets the vertex data.
    pub fn with_data(mut self, data: T) -> Self {
        self.data = Some(data);
        self
    }

    /// Adds predecessors.
    pub fn with_predecessors<I, P>(mut self, predecessors: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<VertexId>,
    {
        self.predecessors
            .extend(predecessors.into_iter().map(Into::into));
        self
    }

    /// Sets the tag.
    pub fn with_tag(mut self, tag: impl Into<serde_json::Value>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}
