//! Pathvector — protocol metadata lookups with live reload.
//!
//! # Usage
//!
//! ```text
//! pathvector [--file <path>] lookup <id>... [--json]
//! pathvector [--file <path>] list [--json]
//! pathvector [--file <path>] watch [<id>...]
//! ```

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{list::ListArgs, lookup::LookupArgs, watch::WatchArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "pathvector",
    version,
    about = "Look up protocol metadata from a live-reloaded JSON registry",
    long_about = None,
)]
struct Cli {
    /// Protocols JSON file.
    #[arg(
        long,
        short = 'f',
        global = true,
        env = "PATHVECTOR_PROTOCOLS",
        default_value = "protocols.json"
    )]
    file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve one or more protocol identifiers.
    Lookup(LookupArgs),

    /// Resolve every identifier in the protocols file.
    List(ListArgs),

    /// Watch the protocols file and log every reload until ctrl-c.
    Watch(WatchArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Lookup(args) => args.run(&cli.file),
        Commands::List(args) => args.run(&cli.file),
        Commands::Watch(args) => args.run(&cli.file),
    }
}
