// src/error.rs
//! Error types for osc-forge

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while handling an OS configuration
#[derive(Error, Debug)]
pub enum Error {
    /// The purpose discriminator did not match a known variant.
    /// Not retryable without an input change.
    #[error("unknown purpose: {purpose}")]
    UnknownPurpose { purpose: String },

    /// The file/unit-to-disk renderer failed (for example a referenced
    /// file content could not be resolved)
    #[error("failed to render disk script: {0}")]
    Render(String),

    /// The MemoryOne configuration could not be derived from the request
    #[error("failed to derive MemoryOne configuration: {0}")]
    MemoryConfig(String),

    /// A required script template failed to load at startup. Fatal: the
    /// actuator must not serve requests with a partial template store.
    #[error("failed to load script asset '{name}': {source}")]
    AssetLoad {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
