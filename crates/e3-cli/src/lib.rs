//! # e3-cli
//!
//! Library side of the `e3-dag` binary: argument parsing, configuration
//! and command handlers. Handlers return their output as a string so they
//! can be tested without capturing stdout.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod config;

pub use cli::{Cli, Command};
pub use config::Config;
