//! `pathvector list` — resolve every identifier in the file.

use std::path::Path;

use anyhow::Result;
use clap::Args;

use super::{load_registry, output};

/// Arguments for `pathvector list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    pub fn run(self, file: &Path) -> Result<()> {
        let registry = load_registry(file)?;
        let resolved: Vec<_> = registry
            .identifiers()
            .into_iter()
            .map(|id| {
                let protocol = registry.get(&id);
                (id, protocol)
            })
            .collect();

        if self.json {
            return output::print_json(&resolved);
        }
        println!(
            "Pathvector v{} | {} | {} protocols",
            env!("CARGO_PKG_VERSION"),
            file.display(),
            resolved.len(),
        );
        output::print_table(resolved);
        Ok(())
    }
}
