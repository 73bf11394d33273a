//! Directed acyclic graphs.
//!
//! - [`Dag`]: the graph itself, with checked and unchecked mutation
//! - [`Iter`]: topological iteration
//! - [`Scheduler`]: busy-state iteration for parallel processing
//! - [`walk()`]: parallel walk on the tokio runtime
//! - [`DagSpec`]: TOML/JSON descriptions

mod algorithms;
mod graph;
mod ids;
mod iter;
mod proptests;
mod render;
mod scheduler;
mod spec;
mod vertex;
pub mod walk;

pub use algorithms::{ContextEntry, ContextQuery};
pub use graph::Dag;
pub use ids::VertexId;
pub use iter::{Iter, Visit};
pub use scheduler::{Next, Scheduler, VertexState};
pub use spec::{DagSpec, SpecFormat};
pub use vertex::Vertex;
pub use walk::{Outcome, WalkOptions, WalkReport, walk};
