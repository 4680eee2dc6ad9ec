//! Shared sync pipeline entrypoint used by the CLI.
//!
//! Load → reconcile → save. The history is saved exactly once per run, after
//! all mutations — including runs with per-task failures. Only a failed
//! source fetch skips the save, leaving the last-known-good cursor in place.

use std::path::Path;

use questline_core::history;

use crate::attributes::AttributeMap;
use crate::engine::{self, DestinationClient, SourceClient, TaskAction};
use crate::error::{SyncError, TaskFailure};

/// What a pipeline run did, for reporting.
#[derive(Debug)]
pub struct SyncReport {
    pub actions: Vec<TaskAction>,
    pub failures: Vec<TaskFailure>,
}

/// Run one full reconciliation pass with state rooted at `home`.
///
/// This is the canonical entrypoint for `questline sync`.
pub fn run(
    home: &Path,
    source: &mut dyn SourceClient,
    destination: &mut dyn DestinationClient,
    attributes: &AttributeMap,
) -> Result<SyncReport, SyncError> {
    let history = history::load_at(home);
    let outcome = engine::reconcile(history, source, destination, attributes)?;
    history::save_at(home, &outcome.history)?;
    Ok(SyncReport {
        actions: outcome.actions,
        failures: outcome.failures,
    })
}
