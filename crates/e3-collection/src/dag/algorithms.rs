//! Graph algorithms over [`Dag`].
//!
//! Provides:
//! - Tag context lookup (nearest tagged ancestors or descendants)
//! - Graph reversal
//! - Merging two DAGs

use super::{Dag, VertexId};
use crate::Result;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

// ============================================================================
// Context query
// ============================================================================

/// Parameters of a [`Dag::context`] query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContextQuery {
    /// Ignore tags farther than this many edges away.
    pub max_distance: Option<usize>,
    /// Stop after this many tags have been found.
    pub max_element: Option<usize>,
    /// Follow successors instead of predecessors.
    pub reverse: bool,
}

impl ContextQuery {
    /// Creates an unbounded query following predecessors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum distance.
    pub fn with_max_distance(mut self, max_distance: usize) -> Self {
        self.max_distance = Some(max_distance);
        self
    }

    /// Sets the maximum number of results.
    pub fn with_max_element(mut self, max_element: usize) -> Self {
        self.max_element = Some(max_element);
        self
    }

    /// Follows successors instead of predecessors.
    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }
}

/// A tag found by [`Dag::context`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ContextEntry<'a> {
    /// Number of edges between the queried vertex and the tagged one.
    pub distance: usize,
    /// The tagged vertex.
    pub id: &'a VertexId,
    /// Its tag.
    pub tag: &'a serde_json::Value,
}

impl<T> Dag<T> {
    /// Finds the nearest tags around a vertex.
    ///
    /// If the vertex is tagged, only its own tag is returned (distance 0).
    /// Otherwise predecessors (or successors, see [`ContextQuery::reverse`])
    /// are explored one distance at a time: a tagged vertex is reported and
    /// its branch is not explored further; an untagged vertex is expanded.
    /// So for
    ///
    /// ```text
    ///         A*
    ///        / \
    ///       B   C*
    ///      / \   \
    ///     D   E*  F
    /// ```
    ///
    /// where starred vertices are tagged, the context of `D` is `A` at
    /// distance 2, the context of `F` is `C` at distance 1, and the reversed
    /// context of `B` is `E` at distance 1.
    ///
    /// Fails if the DAG does not pass [`Dag::check`].
    pub fn context(&self, id: &str, query: &ContextQuery) -> Result<Vec<ContextEntry<'_>>> {
        self.check()?;

        let next = |vid: &str| {
            if query.reverse {
                self.successors(vid)
            } else {
                self.predecessors(vid)
            }
        };

        if let Some((tagged, tag)) = self.tags.get_key_value(id) {
            return Ok(vec![ContextEntry {
                distance: 0,
                id: tagged,
                tag,
            }]);
        }

        let mut found = Vec::new();
        let mut visited: BTreeSet<&VertexId> = BTreeSet::new();
        let mut closure: BTreeSet<&VertexId> = next(id).iter().collect();
        let mut closure_len = closure.len();
        let mut distance = 0;

        loop {
            distance += 1;
            if query.max_distance.is_some_and(|max| distance > max) {
                return Ok(found);
            }

            let frontier: Vec<&VertexId> = closure.difference(&visited).copied().collect();
            for vertex in frontier {
                visited.insert(vertex);
                match self.tags.get(vertex.as_str()) {
                    Some(tag) => {
                        found.push(ContextEntry {
                            distance,
                            id: vertex,
                            tag,
                        });
                        if query.max_element == Some(found.len()) {
                            return Ok(found);
                        }
                    }
                    None => closure.extend(next(vertex.as_str())),
                }
            }

            if closure.len() == closure_len {
                break;
            }
            closure_len = closure.len();
        }
        Ok(found)
    }
}

// ============================================================================
// Reverse and merge
// ============================================================================

impl<T: Clone> Dag<T> {
    /// Builds the reverse DAG: same vertices, data and tags, every edge
    /// inverted.
    ///
    /// Fails if the DAG does not pass [`Dag::check`].
    pub fn reversed(&self) -> Result<Dag<T>> {
        self.check()?;

        let mut result = Dag::new();
        result.vertex_data = self.vertex_data.clone();
        result.tags = self.tags.clone();
        for id in self.vertex_ids() {
            result.replace_predecessors(id, self.successors(id.as_str()).clone());
        }

        result.check()?;
        debug!(vertices = result.len(), edges = result.edge_count(), "reversed dag");
        Ok(result)
    }

    /// Merges two DAGs.
    ///
    /// The result holds every vertex of both, with the union of their
    /// predecessors. Data and tags from `other` replace those of `self`
    /// when both define them.
    ///
    /// Fails if the merged graph has a cycle or a dangling predecessor.
    pub fn merge(&self, other: &Dag<T>) -> Result<Dag<T>> {
        let mut result = self.clone();

        for (id, data) in &other.vertex_data {
            let mut predecessors = result.predecessors(id.as_str()).clone();
            predecessors.extend(other.predecessors(id.as_str()).iter().cloned());

            let slot = result.vertex_data.entry(id.clone()).or_insert(None);
            if data.is_some() {
                slot.clone_from(data);
            }
            result.replace_predecessors(id, predecessors);
        }
        result
            .tags
            .extend(other.tags.iter().map(|(id, tag)| (id.clone(), tag.clone())));

        result.check()?;
        debug!(vertices = result.len(), edges = result.edge_count(), "merged dags");
        Ok(result)
    }
}

// ============================================================================
// Tests
// ============================================================================
