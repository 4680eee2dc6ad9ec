//! `questline status` — inspect the persisted task mapping.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use questline_core::history;
use questline_core::types::{SyncHistory, TaskRecord};

use crate::config;

/// Arguments for `questline status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Directory sync state is kept under (defaults to your home directory).
    #[arg(short = 'f', long)]
    pub state_dir: Option<PathBuf>,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    pub fn run(self) -> Result<()> {
        let home = config::state_home(self.state_dir)?;
        let history = history::load_at(&home);

        if self.json {
            print_json(&history)?;
            return Ok(());
        }
        print_table(&history);
        Ok(())
    }
}

#[derive(Tabled)]
struct TaskTableRow {
    #[tabled(rename = "source id")]
    source: String,
    #[tabled(rename = "destination id")]
    destination: String,
    #[tabled(rename = "kind")]
    kind: String,
    #[tabled(rename = "completed")]
    completed: String,
    #[tabled(rename = "due")]
    due: String,
}

#[derive(Serialize)]
struct StatusJson {
    cursor: Option<String>,
    tasks: Vec<TaskJson>,
}

#[derive(Serialize)]
struct TaskJson {
    source_id: String,
    text: String,
    destination_id: Option<String>,
    kind: Option<String>,
    completed: Option<bool>,
    due_date: Option<String>,
}

fn sorted_records(history: &SyncHistory) -> Vec<&TaskRecord> {
    let mut records: Vec<&TaskRecord> = history.tasks.values().collect();
    records.sort_by(|a, b| a.source.id.0.cmp(&b.source.id.0));
    records
}

fn print_table(history: &SyncHistory) {
    println!(
        "questline v{} | {} mapped task(s) | cursor: {}",
        env!("CARGO_PKG_VERSION"),
        history.tasks.len(),
        history.cursor.as_deref().unwrap_or("(first run pending)"),
    );

    if history.tasks.is_empty() {
        println!("No tasks mapped yet. Run `questline sync` first.");
        return;
    }

    let rows: Vec<TaskTableRow> = sorted_records(history)
        .into_iter()
        .map(|record| {
            let reference = record.destination.as_ref();
            TaskTableRow {
                source: record.source.id.to_string(),
                destination: record
                    .destination_id()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| "—".to_string()),
                kind: reference
                    .map(|r| r.kind.to_string())
                    .unwrap_or_else(|| "—".to_string()),
                completed: match reference.and_then(|r| r.completed) {
                    Some(true) => "✓".to_string(),
                    Some(false) => "·".to_string(),
                    None => "—".to_string(),
                },
                due: reference
                    .and_then(|r| r.due_date)
                    .map(|due| due.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default(),
            }
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    let unmapped = history
        .tasks
        .values()
        .filter(|record| record.destination_id().is_none())
        .count();
    if unmapped > 0 {
        println!(
            "{}",
            format!("{unmapped} task(s) have no destination id and will be created on the next sync")
                .yellow()
        );
    }
}

fn print_json(history: &SyncHistory) -> Result<()> {
    let payload = StatusJson {
        cursor: history.cursor.clone(),
        tasks: sorted_records(history)
            .into_iter()
            .map(|record| {
                let reference = record.destination.as_ref();
                TaskJson {
                    source_id: record.source.id.to_string(),
                    text: record.source.text.clone(),
                    destination_id: record.destination_id().map(ToString::to_string),
                    kind: reference.map(|r| r.kind.to_string()),
                    completed: reference.and_then(|r| r.completed),
                    due_date: reference.and_then(|r| r.due_date).map(|due| due.to_rfc3339()),
                }
            })
            .collect(),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize status JSON")?
    );
    Ok(())
}
