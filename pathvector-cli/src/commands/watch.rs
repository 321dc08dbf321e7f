//! `pathvector watch [<id>...]` — foreground hot reload.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use pathvector_watcher::start_blocking;

/// Arguments for `pathvector watch`.
#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Identifiers to resolve and log after every reload.
    pub probes: Vec<String>,
}

impl WatchArgs {
    pub fn run(self, file: &Path) -> Result<()> {
        start_blocking(file, self.probes)
            .with_context(|| format!("failed to watch '{}'", file.display()))
    }
}
