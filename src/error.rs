//! Error types for catalog construction and recommendation requests.
//!
//! Loading and CLI plumbing report failures through `anyhow`; the variants
//! here are the ones callers need to tell apart. A [`CatalogError`] is fatal
//! at startup, a [`RequestError`] is the caller's fault. "No songs matched"
//! is neither: it is an empty, successful result.

use thiserror::Error;

/// The catalog cannot be served. Raised before any request is accepted.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("catalog is empty")]
    Empty,

    #[error("catalog is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("row {row}: tempo must be a positive number, got {value}")]
    InvalidTempo { row: usize, value: f64 },
}

/// A recommendation request is missing something it needs.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum RequestError {
    #[error("Mood is required")]
    MissingMood,

    #[error("Energy level is required")]
    MissingEnergy,

    #[error("result count must be at least 1")]
    ZeroResultCount,
}
