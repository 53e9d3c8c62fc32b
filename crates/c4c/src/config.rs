//! Configuration types for c4c compilation.
//!
//! All types implement [`serde::Deserialize`] and default every field, so a
//! partial (or empty) TOML file is a valid configuration.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`SourcesConfig`] - Where entry files and include targets are read from.
//! - [`OutputConfig`] - How compiled workspaces are written.
//!
//! # Example
//!
//! ```
//! # use c4c::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.sources().root().is_none());
//! assert!(config.output().pretty());
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Source lookup section.
    #[serde(default)]
    sources: SourcesConfig,

    /// Output section.
    #[serde(default)]
    output: OutputConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(sources: SourcesConfig, output: OutputConfig) -> Self {
        Self { sources, output }
    }

    /// Returns the source lookup configuration.
    pub fn sources(&self) -> &SourcesConfig {
        &self.sources
    }

    /// Returns the output configuration.
    pub fn output(&self) -> &OutputConfig {
        &self.output
    }
}

/// Where sources are resolved from.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourcesConfig {
    /// Directory that the entry file and relative `#include` targets are
    /// joined to. Unset means the entry file's directory.
    #[serde(default)]
    root: Option<PathBuf>,
}

impl SourcesConfig {
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }

    /// Returns the configured source root, if any.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }
}

/// How compiled workspaces are serialized.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Pretty-print JSON output.
    #[serde(default = "default_pretty")]
    pretty: bool,
}

impl OutputConfig {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Returns whether JSON output is pretty-printed.
    pub fn pretty(&self) -> bool {
        self.pretty
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: default_pretty(),
        }
    }
}

fn default_pretty() -> bool {
    true
}
