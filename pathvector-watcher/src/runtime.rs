use std::path::{Path, PathBuf};
use std::sync::Arc;

use pathvector_core::{Registry, RegistryError};

use crate::error::{io_err, WatchError};
use crate::observer::{ReloadObserver, TracingObserver};
use crate::source::NotifySource;
use crate::watch::start_watching;

/// Logs reloads, then logs how each probe identifier resolves afterwards.
struct ProbeObserver {
    registry: Arc<Registry>,
    probes: Vec<String>,
}

impl ReloadObserver for ProbeObserver {
    fn reloaded(&self, path: &Path, generation: u64) {
        TracingObserver.reloaded(path, generation);
        for probe in &self.probes {
            let protocol = self.registry.get(probe);
            tracing::info!(
                identifier = %probe,
                name = %protocol.name,
                tags = ?protocol.tags,
                asn = protocol.asn,
                generation,
                "resolved probe",
            );
        }
    }

    fn reload_failed(&self, path: &Path, error: &RegistryError) {
        TracingObserver.reload_failed(path, error);
    }
}

/// Watch `path` in the foreground and block the current thread until ctrl-c.
pub fn start_blocking(path: &Path, probes: Vec<String>) -> Result<(), WatchError> {
    init_tracing();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| io_err("tokio-runtime", e))?;
    runtime.block_on(run(path.to_path_buf(), probes))
}

/// Watch `path` until ctrl-c or until the notification source closes.
pub async fn run(path: PathBuf, probes: Vec<String>) -> Result<(), WatchError> {
    let registry = Arc::new(Registry::new());
    let observer = Arc::new(ProbeObserver {
        registry: registry.clone(),
        probes,
    });

    let source = NotifySource::new()?;
    let handle = start_watching(registry, path, source, observer).await?;
    tracing::info!(path = %handle.path().display(), "watching protocols file");

    tokio::select! {
        _ = handle.stopped() => {
            tracing::warn!("notification source closed, watcher stopped");
        }
        signal = tokio::signal::ctrl_c() => {
            signal.map_err(|err| WatchError::Runtime(format!("ctrl-c handler failed: {err}")))?;
            tracing::info!("received ctrl-c, stopping watcher");
        }
    }

    handle.stop().await
}

/// Install the `tracing` subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}
