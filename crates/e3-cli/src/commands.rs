//! Handlers for each `e3-dag` subcommand.
//!
//! Every handler returns the text to print on stdout.

use crate::cli::{ClosureArgs, Cli, Command, ContextArgs, Input, MergeArgs, TransformArgs};
use crate::config::Config;
use anyhow::{Context, Result, bail};
use e3_collection::{Dag, SpecFormat, VertexId};
use serde_json::Value;
use std::path::Path;
use tracing::info;

/// DAGs handled by the CLI carry arbitrary JSON data.
pub type JsonDag = Dag<Value>;

// ============================================================================
// Dispatch
// ============================================================================

/// Runs the parsed command.
pub fn run(cli: &Cli, config: &Config) -> Result<String> {
    let format = cli.format;
    match &cli.command {
        Command::Check(input) => cmd_check(input, format),
        Command::Order(input) => cmd_order(input, format),
        Command::Waves(input) => cmd_waves(input, format),
        Command::Dot(input) => Ok(load(&input.file, format)?.as_dot()?),
        Command::Show(input) => Ok(load(&input.file, format)?.to_string()),
        Command::Closure(args) => cmd_closure(args, format),
        Command::Context(args) => cmd_context(args, format, config),
        Command::Reverse(args) => cmd_reverse(args, format),
        Command::Merge(args) => cmd_merge(args, format),
    }
}

/// Loads a description file, using `format` when given and the file
/// extension otherwise.
pub fn load(path: &Path, format: Option<SpecFormat>) -> Result<JsonDag> {
    let dag = match format {
        Some(format) => Dag::load_as(path, format),
        None => Dag::load(path),
    };
    dag.with_context(|| format!("failed to load {}", path.display()))
}

fn require_vertex(dag: &JsonDag, vertex: &str) -> Result<()> {
    if !dag.contains(vertex) {
        bail!("unknown vertex: {vertex}");
    }
    Ok(())
}

fn join_lines<'a>(ids: impl IntoIterator<Item = &'a VertexId>) -> String {
    ids.into_iter()
        .map(VertexId::as_str)
        .collect::<Vec<_>>()
        .join("\n")
}

// ============================================================================
// Read-only commands
// ============================================================================

/// `check`: loading already validates, so report the graph size.
pub fn cmd_check(input: &Input, format: Option<SpecFormat>) -> Result<String> {
    let dag = load(&input.file, format)?;
    info!(file = %input.file.display(), "description is valid");
    Ok(format!(
        "ok: {} vertices, {} edges",
        dag.len(),
        dag.edge_count()
    ))
}

/// `order`: one vertex per line.
pub fn cmd_order(input: &Input, format: Option<SpecFormat>) -> Result<String> {
    let dag = load(&input.file, format)?;
    Ok(join_lines(dag.topological_order()?))
}

/// `waves`: one numbered line per wave.
pub fn cmd_waves(input: &Input, format: Option<SpecFormat>) -> Result<String> {
    let dag = load(&input.file, format)?;
    let lines: Vec<String> = dag
        .waves()?
        .iter()
        .enumerate()
        .map(|(i, wave)| {
            let ids: Vec<&str> = wave.iter().map(|id| id.as_str()).collect();
            format!("{}: {}", i + 1, ids.join(" "))
        })
        .collect();
    Ok(lines.join("\n"))
}

/// `closure`: ancestors of a vertex, sorted.
pub fn cmd_closure(args: &ClosureArgs, format: Option<SpecFormat>) -> Result<String> {
    let dag = load(&args.input.file, format)?;
    require_vertex(&dag, &args.vertex)?;
    Ok(join_lines(&dag.closure(&args.vertex)?))
}

/// `context`: `distance<TAB>vertex<TAB>tag` lines, or a JSON array.
pub fn cmd_context(
    args: &ContextArgs,
    format: Option<SpecFormat>,
    config: &Config,
) -> Result<String> {
    let dag = load(&args.input.file, format)?;
    require_vertex(&dag, &args.vertex)?;

    let query = config.context_query(args.max_distance, args.max_element, args.reverse);
    let entries = dag.context(&args.vertex, &query)?;

    if args.json {
        return Ok(serde_json::to_string_pretty(&entries)?);
    }
    let lines: Vec<String> = entries
        .iter()
        .map(|e| format!("{}\t{}\t{}", e.distance, e.id, e.tag))
        .collect();
    Ok(lines.join("\n"))
}

// ============================================================================
// Commands producing a description
// ============================================================================

/// `reverse`: the description with inverted edges.
pub fn cmd_reverse(args: &TransformArgs, format: Option<SpecFormat>) -> Result<String> {
    let dag = load(&args.input.file, format)?;
    emit(&dag.reversed()?, args, format)
}

/// `merge`: FILE and OTHER combined.
pub fn cmd_merge(args: &MergeArgs, format: Option<SpecFormat>) -> Result<String> {
    let dag = load(&args.transform.input.file, format)?;
    let other = load(&args.other, format)?;
    let merged = dag
        .merge(&other)
        .with_context(|| format!("cannot merge {}", args.other.display()))?;
    emit(&merged, &args.transform, format)
}

/// Writes `dag` to `--output`, or renders it in the input's format.
fn emit(dag: &JsonDag, args: &TransformArgs, format: Option<SpecFormat>) -> Result<String> {
    if let Some(output) = &args.output {
        dag.save(output)
            .with_context(|| format!("failed to write {}", output.display()))?;
        info!(file = %output.display(), vertices = dag.len(), "wrote description");
        return Ok(String::new());
    }

    let format = format
        .or_else(|| SpecFormat::from_path(&args.input.file).ok())
        .unwrap_or(SpecFormat::Toml);
    Ok(dag.to_spec().render(format)?)
}
