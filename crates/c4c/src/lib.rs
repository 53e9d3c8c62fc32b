//! c4c - a compiler for C4 architecture workspaces.
//!
//! Reads a workspace source file and everything it `#include`s from disk,
//! parses it into the entity model and serializes the result as JSON.

pub mod config;

mod error;
mod fs_loader;

pub use c4c_core::{identifier, model, position};
pub use c4c_parser::error::{Diagnostic, ErrorCode, Label, Severity, TokenAtError};

pub use error::C4cError;
pub use fs_loader::FsLoader;

use std::path::{Path, PathBuf};

use log::{debug, info, trace};

use c4c_core::model::Workspace;
use c4c_parser::{CachingProvider, ParseError, Parser, Provider};

use config::AppConfig;

/// Builder for compiling c4c workspaces.
///
/// # Examples
///
/// ```rust,no_run
/// use c4c::{WorkspaceCompiler, config::AppConfig};
///
/// let compiler = WorkspaceCompiler::new(AppConfig::default());
///
/// let workspace = compiler
///     .compile("architecture/main.c4")
///     .expect("Failed to compile");
///
/// let json = compiler.to_json(&workspace).expect("Failed to export");
/// println!("{json}");
/// ```
#[derive(Default)]
pub struct WorkspaceCompiler {
    config: AppConfig,
}

impl WorkspaceCompiler {
    /// Create a new compiler with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration this compiler was built with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Compile the single workspace declared in the file at `path`.
    ///
    /// Include targets are resolved against the configured source root, or
    /// against the directory of `path` when no root is configured.
    ///
    /// # Errors
    ///
    /// Returns [`C4cError::Parse`] for lexing, grammar, model and source
    /// loading failures, and [`C4cError::SourceRoot`] if the configured root
    /// is not a directory.
    pub fn compile(&self, path: impl AsRef<Path>) -> Result<Workspace, C4cError> {
        let (mut provider, entry) = self.open(path.as_ref())?;

        info!(file = entry; "Parsing workspace");
        let workspace = Parser::run(&entry, &mut provider)
            .map_err(|err| parse_error(err, &entry, &mut provider))?;

        info!(
            file = entry,
            files = provider.lexed_count();
            "Workspace compiled"
        );
        trace!(workspace:?; "Compiled workspace");
        Ok(workspace)
    }

    /// Compile every workspace declared in the file at `path`.
    ///
    /// # Errors
    ///
    /// See [`WorkspaceCompiler::compile`].
    pub fn compile_all(&self, path: impl AsRef<Path>) -> Result<Vec<Workspace>, C4cError> {
        let (mut provider, entry) = self.open(path.as_ref())?;

        info!(file = entry; "Parsing workspaces");
        let workspaces = Parser::run_all(&entry, &mut provider)
            .map_err(|err| parse_error(err, &entry, &mut provider))?;

        info!(file = entry, count = workspaces.len(); "Workspaces compiled");
        Ok(workspaces)
    }

    /// Serialize a compiled workspace to JSON.
    ///
    /// # Errors
    ///
    /// Returns [`C4cError::Export`] if serialization fails.
    pub fn to_json(&self, workspace: &Workspace) -> Result<String, C4cError> {
        info!(pretty = self.config.output().pretty(); "Exporting workspace");
        let json = if self.config.output().pretty() {
            serde_json::to_string_pretty(workspace)?
        } else {
            serde_json::to_string(workspace)?
        };
        debug!(bytes = json.len(); "Workspace exported");
        Ok(json)
    }

    /// Builds the provider for one compilation and the name the entry file
    /// is known by inside it.
    fn open(&self, path: &Path) -> Result<(CachingProvider<FsLoader>, String), C4cError> {
        let (root, entry) = match self.config.sources().root() {
            Some(root) => {
                if !root.is_dir() {
                    return Err(C4cError::SourceRoot(root.to_path_buf()));
                }
                let entry = path.strip_prefix(root).unwrap_or(path);
                (root.to_path_buf(), entry.to_path_buf())
            }
            None => split_entry(path),
        };

        debug!(root:? = root, entry:? = entry; "Resolved source root");
        let provider = CachingProvider::new(FsLoader::new(root));
        Ok((provider, entry.to_string_lossy().into_owned()))
    }
}

/// Splits `path` into its directory and file name.
fn split_entry(path: &Path) -> (PathBuf, PathBuf) {
    let root = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let entry = path
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| path.to_path_buf());
    (root, entry)
}

/// Attaches the text of the file the error points into.
fn parse_error(err: ParseError, entry: &str, provider: &mut dyn Provider) -> C4cError {
    let file = err
        .token_at_error()
        .map(|token| token.range().file().to_string())
        .unwrap_or_else(|| entry.to_string());
    let src = provider
        .source_for(&file)
        .map(|source| source.to_string())
        .unwrap_or_default();
    C4cError::new_parse_error(err, file, src)
}
