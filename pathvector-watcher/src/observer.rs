//! Reload outcome reporting.

use std::path::Path;

use pathvector_core::RegistryError;

/// Receives the outcome of every reload the watcher performs.
///
/// Failures never stop the watcher; this is where they surface.
pub trait ReloadObserver: Send + Sync + 'static {
    fn reloaded(&self, _path: &Path, _generation: u64) {}

    fn reload_failed(&self, path: &Path, error: &RegistryError);
}

/// Logs reload outcomes through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ReloadObserver for TracingObserver {
    fn reloaded(&self, path: &Path, generation: u64) {
        tracing::info!(path = %path.display(), generation, "protocols reloaded");
    }

    fn reload_failed(&self, path: &Path, error: &RegistryError) {
        tracing::warn!(path = %path.display(), error = %error, "failed to update protocols");
    }
}
