#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! e3 Collections
//!
//! Generic collections used by e3 tooling. The main one is [`Dag`], a
//! directed acyclic graph with topological iteration, a busy-state
//! scheduler for parallel walks, and tag context queries.

pub mod dag;
pub mod error;

// Re-exports for convenience
pub use dag::{
    ContextEntry, ContextQuery, Dag, DagSpec, Iter, Next, Outcome, Scheduler, SpecFormat, Vertex,
    VertexId, VertexState, Visit, WalkOptions, WalkReport, walk,
};
pub use error::{Error, Result};
