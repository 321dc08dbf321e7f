//! Keeps a [`pathvector_core::Registry`] in step with its protocols file.

mod error;
pub mod observer;
mod runtime;
pub mod source;
mod watch;

pub use error::WatchError;
pub use observer::{ReloadObserver, TracingObserver};
pub use runtime::{init_tracing, run, start_blocking};
pub use source::{
    channel, ChannelSender, ChannelSource, FileEvent, FileEventKind, NotificationSource,
    NotifySource,
};
pub use watch::{start_watching, WatchHandle, WatcherState};
