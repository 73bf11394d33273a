//! Serialized DAG descriptions.
//!
//! A [`DagSpec`] is a flat list of [`Vertex`] declarations, readable from
//! TOML or JSON:
//!
//! ```toml
//! [[vertices]]
//! id = "fetch"
//!
//! [[vertices]]
//! id = "build"
//! predecessors = ["fetch"]
//! data = { target = "x86_64" }
//! tag = "release"
//! ```
//!
//! Vertices may be listed in any order; predecessors are resolved once
//! every vertex of the description is known.

use super::{Dag, Vertex};
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Supported description formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpecFormat {
    /// TOML with a `[[vertices]]` array of tables.
    Toml,
    /// JSON object with a `vertices` array.
    Json,
}

impl SpecFormat {
    /// Guesses the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(SpecFormat::Toml),
            Some("json") => Ok(SpecFormat::Json),
            _ => Err(Error::config(format!(
                "Cannot infer DAG format of {} (expected .toml or .json)",
                path.display()
            ))),
        }
    }
}

impl std::str::FromStr for SpecFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "toml" => Ok(SpecFormat::Toml),
            "json" => Ok(SpecFormat::Json),
            other => Err(Error::config(format!("Unknown DAG format: {other}"))),
        }
    }
}

/// Serializable description of a DAG.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>"))]
pub struct DagSpec<T> {
    /// Vertex declarations.
    #[serde(default)]
    pub vertices: Vec<Vertex<T>>,
}

impl<T> Default for DagSpec<T> {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
        }
    }
}

impl<T: DeserializeOwned> DagSpec<T> {
    /// Parses a description in the given format.
    pub fn parse(input: &str, format: SpecFormat) -> Result<Self> {
        match format {
            SpecFormat::Toml => Ok(toml::from_str(input)?),
            SpecFormat::Json => Ok(serde_json::from_str(input)?),
        }
    }
}

impl<T: Serialize> DagSpec<T> {
    /// Renders the description in the given format.
    pub fn render(&self, format: SpecFormat) -> Result<String> {
        match format {
            SpecFormat::Toml => Ok(toml::to_string_pretty(self)?),
            SpecFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl<T> Dag<T> {
    /// Builds a DAG from a description.
    ///
    /// Duplicate vertices, unknown predecessors and cycles are errors.
    pub fn from_spec(spec: DagSpec<T>) -> Result<Self> {
        let mut dag = Dag::new();

        // Phase 1: declare every vertex so forward references resolve.
        for vertex in spec.vertices {
            if dag.contains(vertex.id.as_str()) {
                return Err(Error::VertexExists { id: vertex.id });
            }
            dag.update_vertex_unchecked(vertex);
        }

        // Phase 2: validate references and acyclicity.
        for (id, preds) in dag.vertex_predecessors() {
            let missing: Vec<_> = preds
                .iter()
                .filter(|p| !dag.contains(p.as_str()))
                .cloned()
                .collect();
            if !missing.is_empty() {
                return Err(Error::UnknownPredecessors {
                    id: id.clone(),
                    missing,
                });
            }
        }
        dag.check()?;

        debug!(vertices = dag.len(), edges = dag.edge_count(), "loaded dag");
        Ok(dag)
    }
}

impl<T: Clone> Dag<T> {
    /// Describes the DAG, listing vertices in topological order when the
    /// graph is valid and in ID order otherwise.
    pub fn to_spec(&self) -> DagSpec<T> {
        let ids = self
            .topological_order()
            .unwrap_or_else(|_| self.vertex_ids().collect());

        let vertices = ids
            .into_iter()
            .map(|id| Vertex {
                id: id.clone(),
                data: self.get(id.as_str()).cloned(),
                predecessors: self.predecessors(id.as_str()).clone(),
                tag: self.tag(id.as_str()).cloned(),
            })
            .collect();
        DagSpec { vertices }
    }
}

impl<T: DeserializeOwned> Dag<T> {
    /// Parses and builds a DAG from a description string.
    pub fn parse(input: &str, format: SpecFormat) -> Result<Self> {
        Self::from_spec(DagSpec::parse(input, format)?)
    }

    /// Loads a DAG from a `.toml` or `.json` description file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = SpecFormat::from_path(path)?;
        Self::load_as(path, format)
    }

    /// Loads a DAG from a description file in an explicit format.
    pub fn load_as(path: impl AsRef<Path>, format: SpecFormat) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), ?format, "loading dag");
        let input = std::fs::read_to_string(path)?;
        Self::parse(&input, format)
    }
}

impl<T: Clone + Serialize> Dag<T> {
    /// Writes the DAG description to a file, in the format given by its
    /// extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = SpecFormat::from_path(path)?;
        std::fs::write(path, self.to_spec().render(format)?)?;
        Ok(())
    }
}
