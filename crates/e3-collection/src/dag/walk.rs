//! Parallel walk of a DAG on the tokio runtime.
//!
//! [`walk`] runs one job per vertex, never starting a vertex before all
//! its predecessors succeeded and never running more than
//! [`WalkOptions::max_concurrency`] jobs at once. When a job fails, every
//! vertex depending on it, directly or not, is skipped.

use super::{Dag, Next, VertexId};
use crate::{Error, Result};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::future::Future;
use std::num::NonZeroUsize;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Options for [`walk`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalkOptions {
    /// Maximum number of jobs running at the same time. Must be at least 1.
    pub max_concurrency: usize,
}

impl Default for WalkOptions {
    /// Defaults to the available parallelism of the host.
    fn default() -> Self {
        Self {
            max_concurrency: std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
        }
    }
}

impl WalkOptions {
    /// Sets the maximum number of concurrent jobs.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }
}

/// Outcome of a single vertex in a walk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome<R> {
    /// The job returned a value.
    Succeeded(R),
    /// The job returned an error or panicked.
    Failed(String),
    /// The job was not run because a predecessor did not succeed.
    Skipped {
        /// The failed vertex that caused the skip.
        failed_predecessor: VertexId,
    },
}

impl<R> Outcome<R> {
    /// Returns true for [`Outcome::Succeeded`].
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Succeeded(_))
    }
}

/// Outcomes of every vertex of a walk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalkReport<R> {
    /// Outcome per vertex.
    pub outcomes: BTreeMap<VertexId, Outcome<R>>,
    /// Order in which jobs completed (skipped vertices excluded).
    pub completion_order: Vec<VertexId>,
}

impl<R> WalkReport<R> {
    /// Returns true if every job succeeded.
    pub fn is_success(&self) -> bool {
        self.outcomes.values().all(Outcome::is_success)
    }

    /// Gets the outcome of a vertex.
    pub fn outcome(&self, id: &str) -> Option<&Outcome<R>> {
        self.outcomes.get(id)
    }

    /// Returns the IDs of failed vertices.
    pub fn failed(&self) -> Vec<&VertexId> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, Outcome::Failed(_)))
            .map(|(id, _)| id)
            .collect()
    }

    /// Returns the IDs of skipped vertices.
    pub fn skipped(&self) -> Vec<&VertexId> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, Outcome::Skipped { .. }))
            .map(|(id, _)| id)
            .collect()
    }
}

/// Runs `job` for every vertex of `dag`, respecting dependencies.
///
/// `job` receives the vertex ID and a clone of its data. Jobs are spawned
/// on the current tokio runtime.
///
/// Fails before running anything if the DAG does not pass [`Dag::check`]
/// or if `max_concurrency` is zero. Job failures do not fail the walk;
/// they are reported in the returned [`WalkReport`].
pub async fn walk<T, R, E, F, Fut>(
    dag: &Dag<T>,
    options: WalkOptions,
    job: F,
) -> Result<WalkReport<R>>
where
    T: Clone + Send + 'static,
    R: Send + 'static,
    E: fmt::Display + Send + 'static,
    F: Fn(VertexId, Option<T>) -> Fut,
    Fut: Future<Output = std::result::Result<R, E>> + Send + 'static,
{
    if options.max_concurrency == 0 {
        return Err(Error::config("max_concurrency must be at least 1"));
    }
    dag.check()?;
    info!(
        vertices = dag.len(),
        max_concurrency = options.max_concurrency,
        "starting walk"
    );

    let mut scheduler = dag.scheduler();
    let mut tasks: JoinSet<std::result::Result<R, E>> = JoinSet::new();
    let mut running: HashMap<tokio::task::Id, VertexId> = HashMap::new();
    // Vertex -> failed vertex that prevents it from running.
    let mut blocked: BTreeMap<VertexId, VertexId> = BTreeMap::new();
    let mut report = WalkReport {
        outcomes: BTreeMap::new(),
        completion_order: Vec::new(),
    };

    loop {
        while tasks.len() < options.max_concurrency {
            let visit = match scheduler.next_vertex()? {
                Next::Ready(visit) => visit,
                Next::Waiting | Next::Finished => break,
            };
            let id = visit.id.clone();

            let cause = visit
                .predecessors
                .iter()
                .find_map(|p| blocked.get(p).cloned());
            if let Some(cause) = cause {
                debug!(vertex = %id, failed = %cause, "skipping vertex");
                report.outcomes.insert(
                    id.clone(),
                    Outcome::Skipped {
                        failed_predecessor: cause.clone(),
                    },
                );
                blocked.insert(id.clone(), cause);
                scheduler.leave(id.as_str())?;
                continue;
            }

            debug!(vertex = %id, "spawning job");
            let handle = tasks.spawn(job(id.clone(), visit.data.cloned()));
            running.insert(handle.id(), id);
        }

        let Some(joined) = tasks.join_next_with_id().await else {
            break;
        };
        let (id, outcome) = match joined {
            Ok((task_id, Ok(value))) => (running.remove(&task_id), Outcome::Succeeded(value)),
            Ok((task_id, Err(e))) => (running.remove(&task_id), Outcome::Failed(e.to_string())),
            Err(e) => (
                running.remove(&e.id()),
                Outcome::Failed(format!("job did not complete: {e}")),
            ),
        };
        let Some(id) = id else {
            continue;
        };

        if let Outcome::Failed(message) = &outcome {
            warn!(vertex = %id, error = %message, "job failed");
            blocked.insert(id.clone(), id.clone());
        }
        report.completion_order.push(id.clone());
        report.outcomes.insert(id.clone(), outcome);
        scheduler.leave(id.as_str())?;
    }

    info!(
        succeeded = report.outcomes.values().filter(|o| o.is_success()).count(),
        failed = report.failed().len(),
        skipped = report.skipped().len(),
        "walk finished"
    );
    Ok(report)
}
