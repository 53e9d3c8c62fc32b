//! Entity identifiers backed by a global string interner.
//!
//! This module provides [`IdentifierString`], the key type of every child
//! entity map and relationship endpoint.

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use serde::{Serialize, Serializer};
use string_interner::{DefaultStringInterner, DefaultSymbol};

use crate::error::ModelError;

/// Global string interner for identifier storage.
///
/// # Thread Safety
///
/// This uses `Mutex` for thread-safe access to the string interner.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn with_interner<R>(f: impl FnOnce(&mut DefaultStringInterner) -> R) -> R {
    let mut interner = INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .expect("Failed to acquire interner lock");
    f(&mut interner)
}

/// Punctuation allowed inside a declared identifier, but not at its edges.
const INNER_CHARACTERS: [char; 2] = ['-', '_'];

/// An interned entity identifier.
///
/// Identifiers written in source are restricted to ASCII letters, `_` and
/// `-`, and may not start or end with `-` or `_`. The lexer reads `.` as
/// part of an identifier token, but a dotted name is never a valid
/// identifier. Identifiers synthesized by the parser always start with `_`,
/// so they can never clash with a declared one.
///
/// # Examples
///
/// ```
/// use c4c_core::identifier::IdentifierString;
///
/// let id = IdentifierString::new("backend").unwrap();
/// assert_eq!(id, "backend");
///
/// assert!(IdentifierString::new("_anon").is_err());
///
/// let synthetic = IdentifierString::synthetic("container", 3, " Web App ");
/// assert_eq!(synthetic, "_container03_web_app");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdentifierString(DefaultSymbol);

impl IdentifierString {
    /// Validates and interns a declared identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidIdentifier`] if `text` is empty, holds a
    /// character outside `[A-Za-z_-]`, or starts or ends with `-` or `_`.
    pub fn new(text: &str) -> Result<Self, ModelError> {
        let valid_chars = text
            .chars()
            .all(|c| c.is_ascii_alphabetic() || INNER_CHARACTERS.contains(&c));
        let valid_edges = match (text.chars().next(), text.chars().last()) {
            (Some(first), Some(last)) => {
                !INNER_CHARACTERS.contains(&first) && !INNER_CHARACTERS.contains(&last)
            }
            _ => false,
        };

        if !valid_chars || !valid_edges {
            return Err(ModelError::InvalidIdentifier(text.to_string()));
        }
        Ok(Self::intern(text))
    }

    /// Builds a synthetic identifier `_{kind}{counter:02}_{slug}`.
    ///
    /// The slug is `fallback` trimmed of surrounding whitespace, with inner
    /// spaces replaced by underscores, lower-cased.
    pub fn synthetic(kind: &str, counter: usize, fallback: &str) -> Self {
        let slug = fallback.trim().replace(' ', "_").to_lowercase();
        Self::intern(&format!("_{kind}{counter:02}_{slug}"))
    }

    /// Returns `true` for identifiers built by [`IdentifierString::synthetic`].
    pub fn is_synthetic(&self) -> bool {
        self.with_str(|s| s.starts_with('_'))
    }

    /// Runs `f` with the resolved text of this identifier.
    pub fn with_str<R>(&self, f: impl FnOnce(&str) -> R) -> R {
        with_interner(|interner| {
            let text = interner
                .resolve(self.0)
                .expect("Symbol should exist in interner");
            f(text)
        })
    }

    fn intern(text: &str) -> Self {
        Self(with_interner(|interner| interner.get_or_intern(text)))
    }
}

impl fmt::Display for IdentifierString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with_str(|s| f.write_str(s))
    }
}

impl std::str::FromStr for IdentifierString {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl PartialEq<str> for IdentifierString {
    fn eq(&self, other: &str) -> bool {
        self.with_str(|s| s == other)
    }
}

impl PartialEq<&str> for IdentifierString {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl Serialize for IdentifierString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.with_str(|s| serializer.serialize_str(s))
    }
}
