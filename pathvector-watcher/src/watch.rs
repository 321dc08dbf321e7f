//! Hot-reload adapter: keeps a [`Registry`] in step with a protocols file.
//!
//! [`start_watching`] loads the file once, registers it with a
//! [`NotificationSource`] and spawns one task that reloads the registry on
//! every write event. Reload failures go to the [`ReloadObserver`] and never
//! end the task; it stops when the source closes or the [`WatchHandle`] asks
//! it to.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use pathvector_core::Registry;

use crate::error::WatchError;
use crate::observer::ReloadObserver;
use crate::source::NotificationSource;

/// Lifecycle of a watcher task. There is no way back from `Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherState {
    Watching,
    Stopped,
}

/// Control handle for a running watcher task.
///
/// Dropping the handle stops the task at its next await point; use
/// [`WatchHandle::stop`] to stop it and wait for it to finish.
#[derive(Debug)]
pub struct WatchHandle {
    path: PathBuf,
    shutdown_tx: broadcast::Sender<()>,
    state_rx: watch::Receiver<WatcherState>,
    task: JoinHandle<()>,
}

impl WatchHandle {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> WatcherState {
        *self.state_rx.borrow()
    }

    /// Resolves once the task has stopped, e.g. after the source closed.
    pub async fn stopped(&self) {
        let mut state_rx = self.state_rx.clone();
        let _ = state_rx
            .wait_for(|state| *state == WatcherState::Stopped)
            .await;
    }

    /// Cancel the task and wait for it to exit. No reloads happen afterwards.
    pub async fn stop(self) -> Result<(), WatchError> {
        let _ = self.shutdown_tx.send(());
        self.task
            .await
            .map_err(|err| WatchError::Runtime(format!("watcher task join failure: {err}")))
    }
}

/// Load `path` into `registry`, then reload it on every write event from
/// `source` until the source closes or the returned handle stops it.
///
/// The initial load's failure is reported to `observer`, not returned.
/// Only a failure to register `path` with `source` is an error, and in that
/// case no task is spawned.
pub async fn start_watching<S: NotificationSource>(
    registry: Arc<Registry>,
    path: impl Into<PathBuf>,
    mut source: S,
    observer: Arc<dyn ReloadObserver>,
) -> Result<WatchHandle, WatchError> {
    let path = path.into();

    reload(&registry, &path, observer.as_ref()).await;
    source.register(&path)?;

    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);
    let (state_tx, state_rx) = watch::channel(WatcherState::Watching);

    let task = {
        let path = path.clone();
        tokio::spawn(watch_loop(
            registry,
            path,
            source,
            observer,
            shutdown_rx,
            state_tx,
        ))
    };

    Ok(WatchHandle {
        path,
        shutdown_tx,
        state_rx,
        task,
    })
}

async fn watch_loop<S: NotificationSource>(
    registry: Arc<Registry>,
    path: PathBuf,
    mut source: S,
    observer: Arc<dyn ReloadObserver>,
    mut shutdown_rx: broadcast::Receiver<()>,
    state_tx: watch::Sender<WatcherState>,
) {
    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => break,
            event = source.next_event() => {
                let Some(event) = event else { break };
                if !event.kind.is_write() {
                    tracing::trace!(path = %path.display(), kind = ?event.kind, "ignoring event");
                    continue;
                }
                reload(&registry, &path, observer.as_ref()).await;
            }
        }
    }

    state_tx.send_replace(WatcherState::Stopped);
    tracing::debug!(path = %path.display(), "protocol watcher stopped");
}

async fn reload(registry: &Arc<Registry>, path: &Path, observer: &dyn ReloadObserver) {
    let target = path.to_path_buf();
    let registry = Arc::clone(registry);
    let result = tokio::task::spawn_blocking(move || registry.load_file(&target)).await;

    match result {
        Ok(Ok(generation)) => observer.reloaded(path, generation),
        Ok(Err(err)) => observer.reload_failed(path, &err),
        Err(err) => {
            tracing::error!(path = %path.display(), error = %err, "protocol reload task failed");
        }
    }
}
