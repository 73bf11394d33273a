//! Optional TOML configuration file.
//!
//! ```toml
//! log_filter = "warn,e3=info"
//!
//! [context]
//! max_distance = 3
//! max_element = 5
//! ```
//!
//! Every key is optional. Command-line flags take precedence over the file,
//! and `RUST_LOG` takes precedence over `log_filter`.

use anyhow::{Context, Result};
use e3_collection::ContextQuery;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Filter used when neither `RUST_LOG` nor the config file set one.
pub const DEFAULT_LOG_FILTER: &str = "warn,e3=info";

/// Filter used with `--verbose`.
pub const VERBOSE_LOG_FILTER: &str = "warn,e3=debug";

/// Contents of the configuration file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// `tracing-subscriber` filter directives.
    pub log_filter: Option<String>,
    /// Defaults of the `context` command.
    pub context: ContextConfig,
}

/// `[context]` section.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContextConfig {
    /// Default `--max-distance`.
    pub max_distance: Option<usize>,
    /// Default `--max-element`.
    pub max_element: Option<usize>,
}

impl Config {
    /// Loads the configuration file, or returns the defaults when no path
    /// is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let input = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&input).with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Parses configuration from TOML text.
    pub fn parse(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Returns the log filter to use when `RUST_LOG` is not set.
    pub fn log_filter(&self, verbose: bool) -> &str {
        if verbose {
            VERBOSE_LOG_FILTER
        } else {
            self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
        }
    }

    /// Builds a context query, letting explicit flags override the file.
    pub fn context_query(
        &self,
        max_distance: Option<usize>,
        max_element: Option<usize>,
        reverse: bool,
    ) -> ContextQuery {
        let mut query = ContextQuery::new();
        if let Some(n) = max_distance.or(self.context.max_distance) {
            query = query.with_max_distance(n);
        }
        if let Some(n) = max_element.or(self.context.max_element) {
            query = query.with_max_element(n);
        }
        if reverse {
            query = query.reversed();
        }
        query
    }
}
