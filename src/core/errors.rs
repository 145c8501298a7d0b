// src/core/errors.rs

//! Defines the primary error type for the entire application.

use thiserror::Error;

/// The main error enum, representing all failures that propagate to the caller.
/// Per-endpoint transport failures are not errors of an invalidation call; they
/// are recorded as data in the [`BatchResult`](crate::core::outcome::BatchResult).
#[derive(Error, Debug)]
pub enum FlushError {
    #[error("Configuration Error: {0}")]
    Configuration(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalidation cancelled before any endpoint responded")]
    Cancelled,
}
