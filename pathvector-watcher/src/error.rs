use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error surface for watcher setup and the foreground runtime.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("notify error: {0}")]
    Notify(#[from] notify::Error),

    #[error("registry error: {0}")]
    Registry(#[from] pathvector_core::RegistryError),

    #[error("runtime error: {0}")]
    Runtime(String),
}

/// Registration failures caused by the path itself surface as [`WatchError::Io`],
/// the same as for any other source.
pub(crate) fn registration_err(path: &Path, err: notify::Error) -> WatchError {
    match err.kind {
        notify::ErrorKind::PathNotFound => {
            io_err(path, std::io::Error::from(std::io::ErrorKind::NotFound))
        }
        notify::ErrorKind::Io(source) => io_err(path, source),
        kind => WatchError::Notify(notify::Error {
            kind,
            paths: err.paths,
        }),
    }
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> WatchError {
    WatchError::Io {
        path: path.into(),
        source,
    }
}
