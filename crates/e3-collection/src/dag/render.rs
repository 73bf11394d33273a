//! Text and Graphviz renderings of a [`Dag`].

use super::{Dag, VertexId};
use crate::Result;
use std::fmt;

impl<T> Dag<T> {
    /// Returns a Graphviz `dot` representation of the graph.
    ///
    /// Edges point from a vertex to its predecessors, laid out left to right.
    /// Fails if the DAG does not pass [`Dag::check`].
    pub fn as_dot(&self) -> Result<String> {
        self.check()?;

        let mut lines = vec!["digraph G {".to_string(), "rankdir=\"LR\";".to_string()];
        lines.extend(self.vertex_ids().map(quoted));
        for (id, preds) in self.vertex_predecessors() {
            lines.extend(preds.iter().map(|p| format!("{} -> {}", quoted(id), quoted(p))));
        }
        lines.push("}".to_string());
        Ok(lines.join("\n"))
    }
}

/// Quotes an ID as a dot string, escaping `"` and `\`.
fn quoted(id: &VertexId) -> String {
    let mut out = String::with_capacity(id.as_str().len() + 2);
    out.push('"');
    for c in id.as_str().chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// One line per vertex: `id -> p1, p2`, or `id -> (none)` for roots.
impl<T> fmt::Display for Dag<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (id, preds)) in self.vertex_predecessors().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            if preds.is_empty() {
                write!(f, "{id} -> (none)")?;
            } else {
                let names: Vec<&str> = preds.iter().map(VertexId::as_str).collect();
                write!(f, "{id} -> {}", names.join(", "))?;
            }
        }
        Ok(())
    }
}
