pub mod list;
pub mod lookup;
pub mod output;
pub mod watch;

use std::path::Path;

use anyhow::{Context, Result};

use pathvector_core::Registry;

/// Load `file` once into a fresh registry.
pub fn load_registry(file: &Path) -> Result<Registry> {
    let registry = Registry::new();
    registry
        .load_file(file)
        .with_context(|| format!("failed to load protocols from '{}'", file.display()))?;
    Ok(registry)
}
