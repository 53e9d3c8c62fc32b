//! Reading sources from the filesystem.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::trace;

use c4c_parser::{SourceLoader, error::ProviderError};

/// A [`SourceLoader`] that joins every requested name to a root directory.
///
/// Absolute names are read as given.
#[derive(Debug, Clone)]
pub struct FsLoader {
    root: PathBuf,
}

impl FsLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl SourceLoader for FsLoader {
    fn load(&mut self, name: &str) -> Result<String, ProviderError> {
        let path = self.resolve(name);
        trace!(file = name, path:? = path; "Reading source");

        fs::read_to_string(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => ProviderError::NotFound(name.to_string()),
            _ => ProviderError::Io {
                name: name.to_string(),
                source,
            },
        })
    }
}
