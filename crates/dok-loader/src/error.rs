/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for loading.

use thiserror::Error;

/// Errors that can occur while loading a template or reference target.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Nothing exists at the requested path.
    #[error("Not found: {path}")]
    NotFound { path: String },

    /// The target exists but could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The content could not be decoded.
    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },
}

impl LoadError {
    /// The path the failed load was issued for.
    pub fn path(&self) -> &str {
        match self {
            LoadError::NotFound { path }
            | LoadError::Io { path, .. }
            | LoadError::Parse { path, .. } => path,
        }
    }
}

/// Result type for load operations.
pub type LoadResult<T> = Result<T, LoadError>;
