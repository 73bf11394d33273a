//! Topological iteration.

use super::{Dag, VertexId};
use crate::{Error, Result};
use std::collections::{BTreeMap, BTreeSet};

/// A vertex produced by iteration: its ID, data and predecessors.
#[derive(Debug)]
pub struct Visit<'a, T> {
    /// Vertex ID.
    pub id: &'a VertexId,
    /// Vertex data, if any.
    pub data: Option<&'a T>,
    /// Predecessors of the vertex, all visited before it.
    pub predecessors: &'a BTreeSet<VertexId>,
}

impl<T> Clone for Visit<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Visit<'_, T> {}

impl<'a, T> Visit<'a, T> {
    pub(crate) fn of(dag: &'a Dag<T>, id: &'a VertexId) -> Self {
        Self {
            id,
            data: dag.get(id.as_str()),
            predecessors: dag.predecessors(id.as_str()),
        }
    }
}

/// Tracks how many predecessors of each vertex are still to be visited.
///
/// Shared by [`Iter`] and [`Scheduler`](crate::Scheduler).
#[derive(Debug)]
pub(crate) struct Frontier<'a> {
    /// Vertices with unvisited predecessors, and how many.
    pending: BTreeMap<&'a VertexId, usize>,
    /// Vertices whose predecessors have all been visited.
    ready: BTreeSet<&'a VertexId>,
}

impl<'a> Frontier<'a> {
    pub(crate) fn new<T>(dag: &'a Dag<T>) -> Self {
        let mut pending = BTreeMap::new();
        let mut ready = BTreeSet::new();
        for id in dag.vertex_ids() {
            match dag.predecessors(id.as_str()).len() {
                0 => {
                    ready.insert(id);
                }
                n => {
                    pending.insert(id, n);
                }
            }
        }
        Self { pending, ready }
    }

    pub(crate) fn pop_ready(&mut self) -> Option<&'a VertexId> {
        self.ready.pop_first()
    }

    pub(crate) fn has_ready(&self) -> bool {
        !self.ready.is_empty()
    }

    pub(crate) fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Marks `id` visited, moving successors with no unvisited predecessor
    /// to the ready set.
    pub(crate) fn release<T>(&mut self, dag: &'a Dag<T>, id: &VertexId) {
        for succ in dag.successors(id.as_str()) {
            if let Some(count) = self.pending.get_mut(succ) {
                *count -= 1;
                if *count == 0 {
                    self.pending.remove(succ);
                    self.ready.insert(succ);
                }
            }
        }
    }
}

/// Iterator over the vertices of a [`Dag`] in topological order.
///
/// Each vertex is produced after all its predecessors. Among vertices
/// ready at the same time, the smallest ID comes first. If some vertices
/// can never become ready (cycle or dangling predecessor), a single
/// [`Error::CycleDetected`] is produced and iteration stops.
#[derive(Debug)]
pub struct Iter<'a, T> {
    dag: &'a Dag<T>,
    frontier: Frontier<'a>,
    failed: bool,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(dag: &'a Dag<T>) -> Self {
        Self {
            dag,
            frontier: Frontier::new(dag),
            failed: false,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = Result<Visit<'a, T>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.frontier.pop_ready() {
            Some(id) => {
                self.frontier.release(self.dag, id);
                Some(Ok(Visit::of(self.dag, id)))
            }
            None if self.frontier.has_pending() => {
                self.failed = true;
                Some(Err(Error::CycleDetected))
            }
            None => None,
        }
    }
}

impl<T> Dag<T> {
    /// Iterates over vertices in topological order.
    ///
    /// Does not run [`Dag::check`]; a cycle surfaces as an `Err` item.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    /// Returns all vertex IDs in topological order.
    pub fn topological_order(&self) -> Result<Vec<&VertexId>> {
        self.iter().map(|visit| visit.map(|v| v.id)).collect()
    }
}

impl<'a, T> IntoIterator for &'a Dag<T> {
    type Item = Result<Visit<'a, T>>;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
