//! Command-line arguments, parsed with clap derive.

use clap::{Args, Parser, Subcommand};
use e3_collection::SpecFormat;
use std::path::PathBuf;

/// Inspect and transform DAG description files
#[derive(Parser, Debug)]
#[command(name = "e3-dag")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file
    #[arg(short, long, global = true, env = "E3_DAG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Description format (toml or json); inferred from the file extension
    /// when omitted
    #[arg(short, long, global = true, env = "E3_DAG_FORMAT")]
    pub format: Option<SpecFormat>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands of `e3-dag`.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a description: no unknown predecessors, no cycle
    Check(Input),
    /// Print vertices in topological order
    Order(Input),
    /// Print vertices grouped in waves that can run in parallel
    Waves(Input),
    /// Print the Graphviz dot representation
    Dot(Input),
    /// Print each vertex with its predecessors
    Show(Input),
    /// Print the transitive predecessors of a vertex
    Closure(ClosureArgs),
    /// Print the nearest tags around a vertex
    Context(ContextArgs),
    /// Print the description with every edge inverted
    Reverse(TransformArgs),
    /// Print the union of two descriptions
    Merge(MergeArgs),
}

/// A DAG description file.
#[derive(Args, Debug)]
pub struct Input {
    /// Description file (.toml or .json)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// Arguments of `closure`.
#[derive(Args, Debug)]
pub struct ClosureArgs {
    #[command(flatten)]
    pub input: Input,

    /// Vertex whose ancestors are listed
    pub vertex: String,
}

/// Arguments of `context`.
#[derive(Args, Debug)]
pub struct ContextArgs {
    #[command(flatten)]
    pub input: Input,

    /// Vertex to start from
    pub vertex: String,

    /// Ignore tags farther than N edges (overrides the config file)
    #[arg(long, value_name = "N")]
    pub max_distance: Option<usize>,

    /// Stop after N tags (overrides the config file)
    #[arg(long, value_name = "N")]
    pub max_element: Option<usize>,

    /// Follow successors instead of predecessors
    #[arg(long)]
    pub reverse: bool,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments of commands producing a new description.
#[derive(Args, Debug)]
pub struct TransformArgs {
    #[command(flatten)]
    pub input: Input,

    /// Write the result to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Arguments of `merge`.
#[derive(Args, Debug)]
pub struct MergeArgs {
    #[command(flatten)]
    pub transform: TransformArgs,

    /// Description merged into FILE; its data and tags win
    #[arg(value_name = "OTHER")]
    pub other: PathBuf,
}
