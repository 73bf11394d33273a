//! Core DAG type and its mutation API.

use super::{Vertex, VertexId};
use crate::{Error, Result};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::OnceLock;
use tracing::debug;

static NO_VERTICES: BTreeSet<VertexId> = BTreeSet::new();

/// Cached outcome of [`Dag::check`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Validity {
    Valid,
    Cycle,
    DanglingPredecessor(VertexId),
}

// ============================================================================
// Dag struct
// ============================================================================

/// A directed acyclic graph of vertices carrying optional data of type `T`.
///
/// Each vertex lists its predecessors: the vertices that must be visited
/// before it. The successor index is maintained alongside, and vertices may
/// carry a JSON tag used by [`Dag::context`].
///
/// Vertex IDs are kept in sorted maps so iteration, rendering and query
/// results are deterministic.
///
/// Checked updates ([`Dag::add_vertex`], [`Dag::update_vertex`]) keep the
/// graph valid. [`Dag::update_vertex_unchecked`] and
/// [`Dag::set_predecessors`] skip validation; [`Dag::check`] reports what
/// they may have broken.
#[derive(Clone, Debug)]
pub struct Dag<T> {
    pub(crate) vertex_data: BTreeMap<VertexId, Option<T>>,
    pub(crate) predecessors: BTreeMap<VertexId, BTreeSet<VertexId>>,
    pub(crate) successors: BTreeMap<VertexId, BTreeSet<VertexId>>,
    pub(crate) tags: BTreeMap<VertexId, serde_json::Value>,
    pub(crate) validity: OnceLock<Validity>,
}

impl<T> Dag<T> {
    /// Creates an empty DAG.
    pub fn new() -> Self {
        Self {
            vertex_data: BTreeMap::new(),
            predecessors: BTreeMap::new(),
            successors: BTreeMap::new(),
            tags: BTreeMap::new(),
            validity: OnceLock::new(),
        }
    }

    /// Returns the number of vertices.
    pub fn len(&self) -> usize {
        self.vertex_data.len()
    }

    /// Returns true if the DAG has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertex_data.is_empty()
    }

    /// Checks if a vertex exists.
    pub fn contains(&self, id: &str) -> bool {
        self.vertex_data.contains_key(id)
    }

    /// Gets the data of a vertex.
    ///
    /// Returns `None` both for unknown vertices and for vertices without data;
    /// use [`Dag::contains`] to tell them apart.
    pub fn get(&self, id: &str) -> Option<&T> {
        self.vertex_data.get(id).and_then(Option::as_ref)
    }

    /// Returns an iterator over all vertex IDs, in sorted order.
    pub fn vertex_ids(&self) -> impl Iterator<Item = &VertexId> {
        self.vertex_data.keys()
    }

    /// Returns an iterator over all vertices and their data, in sorted order.
    pub fn vertices(&self) -> impl Iterator<Item = (&VertexId, Option<&T>)> {
        self.vertex_data.iter().map(|(id, data)| (id, data.as_ref()))
    }

    /// Returns an iterator over `(vertex, predecessors)` pairs.
    pub fn vertex_predecessors(&self) -> impl Iterator<Item = (&VertexId, &BTreeSet<VertexId>)> {
        self.predecessors.iter()
    }

    /// Gets the predecessors of a vertex (empty for unknown vertices).
    pub fn predecessors(&self, id: &str) -> &BTreeSet<VertexId> {
        self.predecessors.get(id).unwrap_or(&NO_VERTICES)
    }

    /// Gets the successors of a vertex (empty for unknown vertices).
    pub fn successors(&self, id: &str) -> &BTreeSet<VertexId> {
        self.successors.get(id).unwrap_or(&NO_VERTICES)
    }

    /// Returns the number of edges.
    pub fn edge_count(&self) -> usize {
        self.predecessors.values().map(BTreeSet::len).sum()
    }

    /// Returns the stored ID for `id`, borrowed from the DAG.
    pub(crate) fn resolve(&self, id: &str) -> Option<&VertexId> {
        self.vertex_data.get_key_value(id).map(|(key, _)| key)
    }

    // ========================================================================
    // Tags
    // ========================================================================

    /// Tags a vertex, replacing any previous tag.
    ///
    /// The vertex does not need to exist yet.
    pub fn add_tag(&mut self, id: impl Into<VertexId>, tag: impl Into<serde_json::Value>) {
        self.tags.insert(id.into(), tag.into());
    }

    /// Gets the tag of a vertex.
    pub fn tag(&self, id: &str) -> Option<&serde_json::Value> {
        self.tags.get(id)
    }

    /// Returns an iterator over all tags.
    pub fn tags(&self) -> impl Iterator<Item = (&VertexId, &serde_json::Value)> {
        self.tags.iter()
    }

    // ========================================================================
    // Mutation API
    // ========================================================================

    /// Adds a new vertex.
    ///
    /// Fails with [`Error::VertexExists`] if the vertex is already present,
    /// and otherwise behaves like [`Dag::update_vertex`].
    pub fn add_vertex(&mut self, vertex: Vertex<T>) -> Result<()> {
        if self.contains(vertex.id.as_str()) {
            return Err(Error::VertexExists { id: vertex.id });
        }
        self.update_vertex(vertex)
    }

    /// Adds or updates a vertex, keeping the graph acyclic.
    ///
    /// For an existing vertex, the given predecessors are added to the
    /// current ones and the data is replaced only if `vertex.data` is set.
    ///
    /// Fails with [`Error::UnknownPredecessors`] if a predecessor is not a
    /// vertex, and with [`Error::CycleIntroduced`] if the new edges would
    /// close a cycle or if updating an existing vertex leaves a graph that
    /// fails [`Dag::check`]. On failure the DAG is left unchanged.
    pub fn update_vertex(&mut self, vertex: Vertex<T>) -> Result<()> {
        let missing: Vec<VertexId> = vertex
            .predecessors
            .iter()
            .filter(|p| !self.contains(p.as_str()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            debug!(vertex = %vertex.id, missing = missing.len(), "rejected unknown predecessors");
            return Err(Error::UnknownPredecessors {
                id: vertex.id,
                missing,
            });
        }

        let added: Vec<&VertexId> = vertex
            .predecessors
            .difference(self.predecessors(vertex.id.as_str()))
            .collect();
        if self.reaches(&added, &vertex.id) {
            debug!(vertex = %vertex.id, "rejected update closing a cycle");
            return Err(Error::CycleIntroduced { id: vertex.id });
        }

        // An existing vertex must leave the whole graph valid, even if it was
        // already broken by unchecked updates.
        if self.contains(vertex.id.as_str()) {
            let previous = self.predecessors(vertex.id.as_str()).clone();
            let mut merged = previous.clone();
            merged.extend(vertex.predecessors.iter().cloned());
            self.replace_predecessors(&vertex.id, merged);

            if self.check().is_err() {
                self.replace_predecessors(&vertex.id, previous);
                debug!(vertex = %vertex.id, "rejected update on invalid graph");
                return Err(Error::CycleIntroduced { id: vertex.id });
            }
        }

        self.apply(vertex);
        Ok(())
    }

    /// Adds or updates a vertex without any validation.
    ///
    /// Predecessors may name vertices that do not exist and may close
    /// cycles; [`Dag::check`] reports both afterwards.
    pub fn update_vertex_unchecked(&mut self, vertex: Vertex<T>) {
        self.apply(vertex);
    }

    /// Replaces the predecessors of an existing vertex, without validation.
    pub fn set_predecessors<I, P>(&mut self, id: &str, predecessors: I) -> Result<()>
    where
        I: IntoIterator<Item = P>,
        P: Into<VertexId>,
    {
        let id = self.resolve(id).cloned().ok_or_else(|| Error::not_found(id))?;
        let predecessors = predecessors.into_iter().map(Into::into).collect();
        self.replace_predecessors(&id, predecessors);
        Ok(())
    }

    fn apply(&mut self, vertex: Vertex<T>) {
        let Vertex {
            id,
            data,
            predecessors,
            tag,
        } = vertex;

        match self.vertex_data.get_mut(id.as_str()) {
            None => {
                debug!(vertex = %id, predecessors = predecessors.len(), "adding vertex");
                self.vertex_data.insert(id.clone(), data);
                self.replace_predecessors(&id, predecessors);
            }
            Some(current) => {
                if data.is_some() {
                    *current = data;
                }
                let mut merged = self.predecessors(id.as_str()).clone();
                merged.extend(predecessors);
                debug!(vertex = %id, predecessors = merged.len(), "updating vertex");
                self.replace_predecessors(&id, merged);
            }
        }

        if let Some(tag) = tag {
            self.tags.insert(id, tag);
        }
    }

    /// Replaces predecessors and keeps the successor index in sync.
    pub(crate) fn replace_predecessors(&mut self, id: &VertexId, predecessors: BTreeSet<VertexId>) {
        let previous = self
            .predecessors
            .insert(id.clone(), predecessors)
            .unwrap_or_default();

        for p in &previous {
            if let Some(succ) = self.successors.get_mut(p) {
                succ.remove(id);
                if succ.is_empty() {
                    self.successors.remove(p);
                }
            }
        }
        for p in self.predecessors(id.as_str()).clone() {
            self.successors.entry(p).or_default().insert(id.clone());
        }

        self.validity = OnceLock::new();
    }

    /// Returns true if `target` is one of `from` or one of their ancestors.
    fn reaches(&self, from: &[&VertexId], target: &VertexId) -> bool {
        let mut seen: BTreeSet<&VertexId> = BTreeSet::new();
        let mut queue: VecDeque<&VertexId> = from.iter().copied().collect();

        while let Some(current) = queue.pop_front() {
            if current == target {
                return true;
            }
            if seen.insert(current) {
                queue.extend(self.predecessors(current.as_str()));
            }
        }
        false
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Checks that every predecessor is a vertex and that there is no cycle.
    ///
    /// The outcome is cached until the next mutation.
    pub fn check(&self) -> Result<()> {
        match self.validity.get_or_init(|| self.compute_validity()) {
            Validity::Valid => Ok(()),
            Validity::Cycle => Err(Error::CycleDetected),
            Validity::DanglingPredecessor(id) => {
                Err(Error::InvalidPredecessors { id: id.clone() })
            }
        }
    }

    fn compute_validity(&self) -> Validity {
        for (id, preds) in &self.predecessors {
            if preds.iter().any(|p| !self.contains(p.as_str())) {
                return Validity::DanglingPredecessor(id.clone());
            }
        }
        if self.iter().any(|visit| visit.is_err()) {
            debug!(vertices = self.len(), "cycle detected");
            return Validity::Cycle;
        }
        Validity::Valid
    }

    /// Gets the transitive predecessors of a vertex.
    ///
    /// Fails if the DAG does not pass [`Dag::check`]. Unknown vertices have
    /// an empty closure.
    pub fn closure(&self, id: &str) -> Result<BTreeSet<VertexId>> {
        self.check()?;

        let mut closure: BTreeSet<VertexId> = BTreeSet::new();
        let mut queue: VecDeque<&VertexId> = self.predecessors(id).iter().collect();

        while let Some(current) = queue.pop_front() {
            if closure.insert(current.clone()) {
                queue.extend(self.predecessors(current.as_str()));
            }
        }
        Ok(closure)
    }
}

impl<T> Default for Dag<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
