//! Access to source text and token streams by file name.
//!
//! The parser never reads files itself. It asks a [`Provider`] for the
//! source of a name (to slice token text) and for a token stream over it
//! (for the entry file and every `#include`). [`CachingProvider`] lexes each
//! file at most once and hands out fresh streams over the cached tokens, so
//! including the same file twice never shares a cursor.

use std::{collections::HashMap, sync::Arc};

use log::debug;

use crate::{
    error::ProviderError,
    lexer,
    token_stream::{LexedSource, TokenStream},
};

/// Supplies sources and token streams to the parser.
pub trait Provider {
    /// The full text of `name`.
    fn source_for(&mut self, name: &str) -> Result<Arc<str>, ProviderError>;

    /// A new token stream over `name`, positioned at its first token.
    fn token_stream_for(&mut self, name: &str) -> Result<TokenStream, ProviderError>;
}

/// Loads raw source text. Implemented per storage backend.
pub trait SourceLoader {
    fn load(&mut self, name: &str) -> Result<String, ProviderError>;
}

/// Sources held in memory, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    sources: HashMap<String, String>,
}

impl MemoryLoader {
    pub fn with_source(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(name, text);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.sources.insert(name.into(), text.into());
    }
}

impl SourceLoader for MemoryLoader {
    fn load(&mut self, name: &str) -> Result<String, ProviderError> {
        self.sources
            .get(name)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(name.to_string()))
    }
}

/// A [`Provider`] that loads each source once and lexes it once.
///
/// # Examples
///
/// ```
/// use c4c_parser::{CachingProvider, MemoryLoader, Provider, TokenKind};
///
/// let mut provider =
///     CachingProvider::new(MemoryLoader::default().with_source("main.c4", "workspace"));
/// let mut stream = provider.token_stream_for("main.c4").unwrap();
/// assert!(stream.next_token().is(TokenKind::Keyword));
/// assert!(provider.source_for("missing.c4").is_err());
/// ```
#[derive(Debug)]
pub struct CachingProvider<L> {
    loader: L,
    sources: HashMap<String, Arc<str>>,
    lexed: HashMap<String, LexedSource>,
}

impl<L: SourceLoader> CachingProvider<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            sources: HashMap::new(),
            lexed: HashMap::new(),
        }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Number of distinct files lexed so far.
    pub fn lexed_count(&self) -> usize {
        self.lexed.len()
    }
}

impl<L: SourceLoader> Provider for CachingProvider<L> {
    fn source_for(&mut self, name: &str) -> Result<Arc<str>, ProviderError> {
        if let Some(source) = self.sources.get(name) {
            return Ok(Arc::clone(source));
        }

        let source: Arc<str> = self.loader.load(name)?.into();
        debug!(file = name, bytes = source.len(); "Loaded source");
        self.sources.insert(name.to_string(), Arc::clone(&source));
        Ok(source)
    }

    fn token_stream_for(&mut self, name: &str) -> Result<TokenStream, ProviderError> {
        if let Some(lexed) = self.lexed.get(name) {
            return Ok(lexed.token_stream());
        }

        let lexed = lexer::run(name, self)?;
        let stream = lexed.token_stream();
        self.lexed.insert(name.to_string(), lexed);
        Ok(stream)
    }
}
