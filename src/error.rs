// src/error.rs

//! Crate-wide error type and Result alias.

use thiserror::Error;

/// Errors surfaced by the recipe and shopping list stores.
///
/// The ingredient scaler never produces errors: malformed quantity
/// tokens degrade to unchanged text instead.
#[derive(Debug, Error)]
pub enum Error {
    /// A recipe or shopping list is absent, or an ingredient index is
    /// outside the list's current bounds.
    #[error("{0} not found")]
    NotFound(String),

    /// A caller-supplied value failed validation (empty title, update
    /// on a record without an id, malformed payload).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A stored JSON column could not be decoded.
    #[error("failed to parse stored data: {0}")]
    Parse(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// NotFound with a human-readable subject, e.g. `Error::not_found("Recipe 4")`.
    pub fn not_found(what: impl Into<String>) -> Self {
        Error::NotFound(what.into())
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
