//! Error types for e3 collections.

use crate::dag::VertexId;

/// Errors that can occur while building, validating or walking a DAG.
///
/// All error variants are marked with `#[non_exhaustive]` to allow
/// adding new error types without breaking changes.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A vertex with this ID is already in the DAG
    #[error("Vertex already exists: {id}")]
    VertexExists {
        /// ID of the existing vertex
        id: VertexId,
    },

    /// A vertex was declared with predecessors that are not vertices
    #[error("Predecessors of {id} are not vertices: {}", join_ids(.missing))]
    UnknownPredecessors {
        /// Vertex being added or updated
        id: VertexId,
        /// Predecessor IDs that do not exist
        missing: Vec<VertexId>,
    },

    /// Updating a vertex would have introduced a cycle; the update was undone
    #[error("Cannot update vertex {id}: it would create a cycle")]
    CycleIntroduced {
        /// Vertex whose update was rejected
        id: VertexId,
    },

    /// A vertex references predecessors that are not vertices
    #[error("Invalid vertices in predecessors of {id}")]
    InvalidPredecessors {
        /// First vertex found with a dangling predecessor
        id: VertexId,
    },

    /// The graph contains at least one cycle
    #[error("Cycle detected")]
    CycleDetected,

    /// `leave` was called on a vertex the scheduler had not handed out
    #[error("Vertex is not busy: {id}")]
    NotBusy {
        /// Vertex that was not in busy state
        id: VertexId,
    },

    /// Vertex lookup failed
    #[error("Vertex not found: {id}")]
    VertexNotFound {
        /// Vertex ID that was not found
        id: VertexId,
    },

    /// I/O error while reading or writing a DAG description
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML description could not be parsed
    #[error("TOML parse error: {0}")]
    TomlDecode(#[from] toml::de::Error),

    /// TOML description could not be written
    #[error("TOML write error: {0}")]
    TomlEncode(#[from] toml::ser::Error),

    /// Invalid walk or loader configuration
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },
}

/// Convenience `Result` type alias for collection operations.
pub type Result<T> = std::result::Result<T, Error>;

fn join_ids(ids: &[VertexId]) -> String {
    ids.iter()
        .map(VertexId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

impl Error {
    /// Returns whether this error reports a cycle in the graph.
    pub fn is_cycle(&self) -> bool {
        matches!(self, Error::CycleDetected | Error::CycleIntroduced { .. })
    }

    /// Returns whether this error reports a structural problem of the graph
    /// (cycles, dangling predecessors, duplicate vertices).
    ///
    /// Structural errors are permanent: retrying the same operation on the
    /// same graph fails the same way.
    pub fn is_structural(&self) -> bool {
        match self {
            Error::VertexExists { .. } => true,
            Error::UnknownPredecessors { .. } => true,
            Error::CycleIntroduced { .. } => true,
            Error::InvalidPredecessors { .. } => true,
            Error::CycleDetected => true,
            Error::NotBusy { .. } => false,
            Error::VertexNotFound { .. } => false,
            Error::Io(_) => false,
            Error::Serialization(_) => false,
            Error::TomlDecode(_) => false,
            Error::TomlEncode(_) => false,
            Error::Config { .. } => false,
        }
    }

    /// Creates a vertex-not-found error.
    pub fn not_found(id: impl Into<VertexId>) -> Self {
        Error::VertexNotFound { id: id.into() }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }
}
