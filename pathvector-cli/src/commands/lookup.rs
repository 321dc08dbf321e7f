//! `pathvector lookup <id>...` — resolve identifiers against the file.

use std::path::Path;

use anyhow::Result;
use clap::Args;

use super::{load_registry, output};

/// Arguments for `pathvector lookup`.
#[derive(Args, Debug)]
pub struct LookupArgs {
    /// Protocol identifiers, e.g. `eu_AS1234_v4`.
    #[arg(required = true)]
    pub identifiers: Vec<String>,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl LookupArgs {
    pub fn run(self, file: &Path) -> Result<()> {
        let registry = load_registry(file)?;
        let resolved: Vec<_> = self
            .identifiers
            .into_iter()
            .map(|id| {
                let protocol = registry.get(&id);
                (id, protocol)
            })
            .collect();

        if self.json {
            return output::print_json(&resolved);
        }
        output::print_table(resolved);
        Ok(())
    }
}
