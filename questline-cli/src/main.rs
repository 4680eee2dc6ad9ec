//! Questline — one-way task sync from a todo service into a gamified
//! habit tracker.
//!
//! # Usage
//!
//! ```text
//! questline sync -a <source-token> -u <dest-user> -t <dest-token> [-f <dir>]
//! questline status [-f <dir>] [--json]
//! ```
//!
//! Credentials may also come from `QUESTLINE_SOURCE_TOKEN`,
//! `QUESTLINE_DEST_USER`, and `QUESTLINE_DEST_TOKEN`.

mod clients;
mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{status::StatusArgs, sync::SyncArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "questline",
    version,
    about = "Mirror a todo list into a gamified habit tracker",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one reconciliation pass against both services.
    Sync(SyncArgs),

    /// Show the persisted task mapping and sync cursor.
    Status(StatusArgs),
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Sync(args) => args.run(),
        Commands::Status(args) => args.run(),
    }
}
