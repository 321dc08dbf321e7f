//! Error types for pathvector-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while loading a protocol mapping.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The protocol file could not be read (missing, permission denied, etc.).
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Raw bytes did not decode into a protocol mapping.
    #[error("failed to decode protocol mapping: {0}")]
    Decode(#[from] serde_json::Error),

    /// The protocol file was read but did not decode — includes file path.
    #[error("failed to parse protocols at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl RegistryError {
    /// `true` for malformed JSON or schema mismatches, `false` for I/O.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_) | Self::Parse { .. })
    }
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RegistryError {
    RegistryError::Io {
        path: path.into(),
        source,
    }
}
