//! File-change notification sources.
//!
//! The watcher only needs two things from a source: register interest in a
//! path, and hand out change events until the stream closes. [`NotifySource`]
//! wires that to the OS via `notify`; [`ChannelSource`] is an in-process
//! source driven by a [`ChannelSender`].

use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};

use notify::event::ModifyKind;
use notify::{recommended_watcher, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::error::{io_err, registration_err, WatchError};

/// What happened to a watched path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileEventKind {
    /// File contents were written.
    Write,
    Create,
    Remove,
    Rename,
    Metadata,
    Other,
}

impl FileEventKind {
    pub fn is_write(self) -> bool {
        matches!(self, Self::Write)
    }
}

impl From<&EventKind> for FileEventKind {
    fn from(kind: &EventKind) -> Self {
        match kind {
            EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Any | ModifyKind::Other) => {
                Self::Write
            }
            EventKind::Modify(ModifyKind::Name(_)) => Self::Rename,
            EventKind::Modify(ModifyKind::Metadata(_)) => Self::Metadata,
            EventKind::Create(_) => Self::Create,
            EventKind::Remove(_) => Self::Remove,
            _ => Self::Other,
        }
    }
}

/// One change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEvent {
    pub kind: FileEventKind,
    pub paths: Vec<PathBuf>,
}

impl FileEvent {
    pub fn new(kind: FileEventKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            paths: vec![path.into()],
        }
    }

    pub fn write(path: impl Into<PathBuf>) -> Self {
        Self::new(FileEventKind::Write, path)
    }
}

impl From<Event> for FileEvent {
    fn from(event: Event) -> Self {
        Self {
            kind: FileEventKind::from(&event.kind),
            paths: event.paths,
        }
    }
}

/// A stream of change events for registered paths.
pub trait NotificationSource: Send + 'static {
    /// Start delivering events for `path`. Fails if the path cannot be watched.
    fn register(&mut self, path: &Path) -> Result<(), WatchError>;

    /// Next event, or `None` once the source is closed.
    fn next_event(&mut self) -> impl Future<Output = Option<FileEvent>> + Send;
}

// ---------------------------------------------------------------------------
// notify-backed source
// ---------------------------------------------------------------------------

/// OS file notifications via `notify`'s recommended backend.
pub struct NotifySource {
    watcher: RecommendedWatcher,
    events: mpsc::UnboundedReceiver<notify::Result<Event>>,
}

impl NotifySource {
    pub fn new() -> Result<Self, WatchError> {
        let (event_tx, events) = mpsc::unbounded_channel::<notify::Result<Event>>();
        let watcher = recommended_watcher(move |event| {
            let _ = event_tx.send(event);
        })?;
        Ok(Self { watcher, events })
    }
}

impl NotificationSource for NotifySource {
    fn register(&mut self, path: &Path) -> Result<(), WatchError> {
        self.watcher
            .watch(path, RecursiveMode::NonRecursive)
            .map_err(|e| registration_err(path, e))?;
        tracing::debug!(path = %path.display(), "watching protocols file");
        Ok(())
    }

    async fn next_event(&mut self) -> Option<FileEvent> {
        loop {
            match self.events.recv().await? {
                Ok(event) => return Some(FileEvent::from(event)),
                Err(err) => tracing::warn!(error = %err, "watcher event error"),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// in-process source
// ---------------------------------------------------------------------------

/// Create a connected [`ChannelSender`] / [`ChannelSource`] pair.
pub fn channel() -> (ChannelSender, ChannelSource) {
    let (tx, events) = mpsc::unbounded_channel();
    (
        ChannelSender { tx },
        ChannelSource {
            events,
            registered: Vec::new(),
        },
    )
}

/// Feeds events into a [`ChannelSource`]. The source closes once every
/// sender has been dropped.
#[derive(Debug, Clone)]
pub struct ChannelSender {
    tx: mpsc::UnboundedSender<FileEvent>,
}

impl ChannelSender {
    /// Queue `event`; `false` if the source is gone.
    pub fn send(&self, event: FileEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    /// Queue a [`FileEventKind::Write`] event for `path`.
    pub fn notify_write(&self, path: impl Into<PathBuf>) -> bool {
        self.send(FileEvent::write(path))
    }

    /// Consume this sender. The source reports closed once every clone has
    /// been dropped too.
    pub fn close(self) {}
}

/// Event source fed by [`ChannelSender`]s rather than the file system.
#[derive(Debug)]
pub struct ChannelSource {
    events: mpsc::UnboundedReceiver<FileEvent>,
    registered: Vec<PathBuf>,
}

impl ChannelSource {
    pub fn registered(&self) -> &[PathBuf] {
        &self.registered
    }
}

impl NotificationSource for ChannelSource {
    fn register(&mut self, path: &Path) -> Result<(), WatchError> {
        fs::metadata(path).map_err(|e| io_err(path, e))?;
        self.registered.push(path.to_path_buf());
        Ok(())
    }

    async fn next_event(&mut self) -> Option<FileEvent> {
        self.events.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, MetadataKind, RemoveKind, RenameMode};

    #[test]
    fn only_content_modifications_map_to_write() {
        let cases = [
            (EventKind::Modify(ModifyKind::Data(DataChange::Content)), FileEventKind::Write),
            (EventKind::Modify(ModifyKind::Any), FileEventKind::Write),
            (EventKind::Modify(ModifyKind::Name(RenameMode::To)), FileEventKind::Rename),
            (
                EventKind::Modify(ModifyKind::Metadata(MetadataKind::Permissions)),
                FileEventKind::Metadata,
            ),
            (EventKind::Create(CreateKind::File), FileEventKind::Create),
            (EventKind::Remove(RemoveKind::File), FileEventKind::Remove),
            (EventKind::Any, FileEventKind::Other),
        ];
        for (kind, expected) in cases {
            assert_eq!(FileEventKind::from(&kind), expected, "{kind:?}");
        }
    }

    #[test]
    fn channel_source_rejects_missing_paths() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (_tx, mut source) = channel();
        let err = source.register(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, WatchError::Io { .. }), "got: {err}");
        assert!(source.registered().is_empty());

        source.register(dir.path()).expect("register existing path");
        assert_eq!(source.registered(), [dir.path().to_path_buf()]);
    }

    #[tokio::test]
    async fn channel_source_closes_when_senders_drop() {
        let (tx, mut source) = channel();
        let second = tx.clone();
        assert!(tx.notify_write("/tmp/protocols.json"));
        tx.close();
        drop(second);

        assert_eq!(
            source.next_event().await,
            Some(FileEvent::write("/tmp/protocols.json"))
        );
        assert_eq!(source.next_event().await, None);
    }
}
