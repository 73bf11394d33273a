//! Busy-state iteration for parallel walks.
//!
//! A [`Scheduler`] hands out vertices like [`Iter`](crate::dag::Iter) does,
//! but a vertex handed out stays *busy* until the caller reports it done
//! with [`Scheduler::leave`]. Its successors only become ready then, which
//! lets several independent vertices be processed at the same time.

use super::iter::{Frontier, Visit};
use super::{Dag, VertexId};
use crate::{Error, Result};
use std::collections::BTreeMap;
use tracing::trace;

/// Progress of a vertex within a [`Scheduler`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VertexState {
    /// Not handed out yet.
    #[default]
    NotVisited,
    /// Handed out, waiting for [`Scheduler::leave`].
    Busy,
    /// Done; successors have been released.
    Visited,
}

/// Result of [`Scheduler::next_vertex`].
#[derive(Debug)]
pub enum Next<'a, T> {
    /// A vertex ready to be processed; it is now busy.
    Ready(Visit<'a, T>),
    /// No vertex is ready until a busy vertex is left.
    Waiting,
    /// Every vertex has been handed out.
    Finished,
}

/// Topological scheduler with a busy state.
#[derive(Debug)]
pub struct Scheduler<'a, T> {
    dag: &'a Dag<T>,
    frontier: Frontier<'a>,
    states: BTreeMap<&'a VertexId, VertexState>,
    busy: usize,
}

impl<'a, T> Scheduler<'a, T> {
    /// Creates a scheduler over all vertices of `dag`.
    pub fn new(dag: &'a Dag<T>) -> Self {
        Self {
            dag,
            frontier: Frontier::new(dag),
            states: dag
                .vertex_ids()
                .map(|id| (id, VertexState::NotVisited))
                .collect(),
            busy: 0,
        }
    }

    /// Hands out the next ready vertex and marks it busy.
    ///
    /// Fails with [`Error::CycleDetected`] when vertices remain but none is
    /// ready and none is busy: no call to `leave` can ever unblock them.
    pub fn next_vertex(&mut self) -> Result<Next<'a, T>> {
        if let Some(id) = self.frontier.pop_ready() {
            self.states.insert(id, VertexState::Busy);
            self.busy += 1;
            trace!(vertex = %id, busy = self.busy, "vertex busy");
            return Ok(Next::Ready(Visit::of(self.dag, id)));
        }
        if !self.frontier.has_pending() {
            return Ok(Next::Finished);
        }
        if self.busy == 0 {
            return Err(Error::CycleDetected);
        }
        Ok(Next::Waiting)
    }

    /// Hands out every vertex ready right now, marking them all busy.
    pub fn ready_batch(&mut self) -> Result<Vec<Visit<'a, T>>> {
        let mut batch = Vec::new();
        while self.frontier.has_ready() {
            if let Next::Ready(visit) = self.next_vertex()? {
                batch.push(visit);
            }
        }
        if batch.is_empty() && self.frontier.has_pending() && self.busy == 0 {
            return Err(Error::CycleDetected);
        }
        Ok(batch)
    }

    /// Marks a busy vertex visited and releases its successors.
    pub fn leave(&mut self, id: &str) -> Result<()> {
        let id = self
            .dag
            .resolve(id)
            .ok_or_else(|| Error::not_found(id))?;

        match self.states.get_mut(id) {
            Some(state) if *state == VertexState::Busy => *state = VertexState::Visited,
            _ => return Err(Error::NotBusy { id: id.clone() }),
        }
        self.busy -= 1;
        self.frontier.release(self.dag, id);
        trace!(vertex = %id, busy = self.busy, "vertex visited");
        Ok(())
    }

    /// Returns the state of a vertex, or `None` for unknown vertices.
    pub fn state(&self, id: &str) -> Option<VertexState> {
        let id = self.dag.resolve(id)?;
        self.states.get(id).copied()
    }

    /// Returns the number of busy vertices.
    pub fn busy_count(&self) -> usize {
        self.busy
    }

    /// Returns true once every vertex has been handed out and left.
    pub fn is_complete(&self) -> bool {
        self.busy == 0 && !self.frontier.has_ready() && !self.frontier.has_pending()
    }
}

impl<T> Dag<T> {
    /// Creates a busy-state [`Scheduler`] over this DAG.
    pub fn scheduler(&self) -> Scheduler<'_, T> {
        Scheduler::new(self)
    }

    /// Groups vertices into waves: every vertex of a wave only depends on
    /// vertices of earlier waves.
    pub fn waves(&self) -> Result<Vec<Vec<&VertexId>>> {
        let mut scheduler = self.scheduler();
        let mut waves = Vec::new();

        loop {
            let batch = scheduler.ready_batch()?;
            if batch.is_empty() {
                break;
            }
            let wave: Vec<&VertexId> = batch.iter().map(|visit| visit.id).collect();
            for id in &wave {
                scheduler.leave(id.as_str())?;
            }
            waves.push(wave);
        }
        Ok(waves)
    }
}
