//! `questline sync` — run one reconciliation pass.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use questline_sync::{pipeline, AttributeMap, TaskAction, TaskFailure};

use crate::clients::{HabiticaClient, TodoistClient};
use crate::config::{self, Credentials};

/// Arguments for `questline sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Source service API token (falls back to $QUESTLINE_SOURCE_TOKEN).
    #[arg(short = 'a', long)]
    pub source_token: Option<String>,

    /// Destination service user id (falls back to $QUESTLINE_DEST_USER).
    #[arg(short = 'u', long)]
    pub dest_user: Option<String>,

    /// Destination service API token (falls back to $QUESTLINE_DEST_TOKEN).
    #[arg(short = 't', long)]
    pub dest_token: Option<String>,

    /// Directory to keep sync state under (defaults to your home directory).
    #[arg(short = 'f', long)]
    pub state_dir: Option<PathBuf>,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let credentials =
            Credentials::resolve(self.source_token, self.dest_user, self.dest_token)?;
        let home = config::state_home(self.state_dir)?;

        let mut source = TodoistClient::new(credentials.source_token);
        let labels = source
            .labels()
            .context("failed to list source labels")?;
        let attributes =
            AttributeMap::from_labels(labels.into_iter().map(|label| (label.name, label.id)));

        let mut destination = HabiticaClient::new(credentials.dest_user, credentials.dest_token);

        let report = pipeline::run(&home, &mut source, &mut destination, &attributes)
            .context("sync failed")?;
        print_report(&report.actions, &report.failures);
        Ok(())
    }
}

fn print_report(actions: &[TaskAction], failures: &[TaskFailure]) {
    if actions.is_empty() && failures.is_empty() {
        println!("✓ destination already in sync — nothing to do");
        return;
    }

    let created = actions
        .iter()
        .filter(|a| matches!(a, TaskAction::Created { .. }))
        .count();
    let updated = actions
        .iter()
        .filter(|a| matches!(a, TaskAction::Updated { .. }))
        .count();
    let deleted = actions
        .iter()
        .filter(|a| matches!(a, TaskAction::Deleted { .. }))
        .count();
    println!("✓ synced ({created} created, {updated} updated, {deleted} deleted)");

    for action in actions {
        match action {
            TaskAction::Created {
                source,
                destination,
            } => println!("  ✚  {source} → {destination}"),
            TaskAction::Updated {
                source,
                scored: Some(direction),
            } => println!("  ✎  {source} (scored {direction})"),
            TaskAction::Updated {
                source,
                scored: None,
            } => println!("  ✎  {source}"),
            TaskAction::Deleted { source, .. } => println!("  ✖  {source}"),
        }
    }

    for failure in failures {
        println!(
            "  {}  {} '{}' — {} failed: {}",
            "!".red().bold(),
            failure.id,
            failure.text,
            failure.stage,
            failure.error,
        );
    }
    if !failures.is_empty() {
        println!(
            "{}",
            format!(
                "{} task(s) failed; they are retried when the source next reports them",
                failures.len()
            )
            .yellow()
        );
    }
}
