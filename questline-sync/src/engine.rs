//! Reconciliation driver — sequences remote mutations for changed tasks.
//!
//! ## Per-task protocol
//!
//! 1. Build the destination-shaped body (classifier + attribute map).
//! 2. Source task deleted → delete by recorded id (no call if none was ever
//!    recorded) and drop the record.
//! 3. Recorded usable id → run the completion state machine, score if
//!    required, then update; on success refresh the record.
//! 4. No usable id → create; on success store a fresh record.
//!
//! Mutations are issued strictly one at a time, in fetch order — the
//! destination service fails under concurrent writes from one account.
//! Per-task failures are collected and never stop the run; only the initial
//! source fetch is fatal.

use chrono::{DateTime, Utc};
use serde::Serialize;

use questline_core::types::{
    DestinationReference, DestinationTask, DestinationTaskId, SourceSnapshot, SourceTaskId,
    SyncHistory, TaskKind, TaskRecord,
};

use crate::attributes::AttributeMap;
use crate::detector;
use crate::error::{ClientError, MutationStage, SyncError, TaskFailure};
use crate::recurrence;
use crate::scoring::{self, ScoreDirection};

// ---------------------------------------------------------------------------
// Client seams
// ---------------------------------------------------------------------------

/// One page of source state: the items plus the cursor for the next call.
#[derive(Debug, Clone)]
pub struct SourceFetch {
    pub cursor: Option<String>,
    pub items: Vec<SourceSnapshot>,
}

/// Fetches the full or incremental set of source tasks.
pub trait SourceClient {
    /// Fetch everything changed since `cursor` (`None` means everything).
    fn fetch(&mut self, cursor: Option<&str>) -> Result<SourceFetch, ClientError>;
}

/// Mutates tasks on the destination service.
///
/// Implementations must treat deleting an already-missing task as success —
/// the source task simply outlived its destination counterpart.
pub trait DestinationClient {
    /// Create a task and return its destination identity. A response with no
    /// usable id must be reported as an error.
    fn create(&mut self, task: &DestinationTask) -> Result<DestinationTaskId, ClientError>;
    fn update(&mut self, id: &DestinationTaskId, task: &DestinationTask) -> Result<(), ClientError>;
    fn delete(&mut self, id: &DestinationTaskId) -> Result<(), ClientError>;
    fn score(&mut self, id: &DestinationTaskId, direction: ScoreDirection)
        -> Result<(), ClientError>;
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// A destination mutation applied for one source task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "action")]
pub enum TaskAction {
    Created {
        source: SourceTaskId,
        destination: DestinationTaskId,
    },
    Updated {
        source: SourceTaskId,
        #[serde(skip_serializing_if = "Option::is_none")]
        scored: Option<ScoreDirection>,
    },
    Deleted {
        source: SourceTaskId,
        destination: DestinationTaskId,
    },
}

/// Result of one reconciliation pass.
///
/// `history` carries whatever progress was made and must be persisted by the
/// caller even when `failures` is non-empty — the at-most-once-create
/// guarantee depends on the mapping surviving partial failures.
#[derive(Debug)]
pub struct SyncOutcome {
    pub history: SyncHistory,
    pub actions: Vec<TaskAction>,
    pub failures: Vec<TaskFailure>,
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Run one reconciliation pass.
///
/// Fetches the source, diffs against `history`, and replays the minimal
/// mutations onto the destination. The returned history reflects every
/// successful mutation; failed tasks keep their previous record (or none, for
/// a failed create) so a later run retries them.
pub fn reconcile(
    mut history: SyncHistory,
    source: &mut dyn SourceClient,
    destination: &mut dyn DestinationClient,
    attributes: &AttributeMap,
) -> Result<SyncOutcome, SyncError> {
    let fetch = source
        .fetch(history.cursor.as_deref())
        .map_err(SyncError::SourceFetch)?;
    history.cursor = fetch.cursor;

    let changed: Vec<SourceSnapshot> = detector::changed_tasks(&history, &fetch.items)
        .into_iter()
        .cloned()
        .collect();
    tracing::debug!(
        "{} of {} fetched task(s) need reconciling",
        changed.len(),
        fetch.items.len()
    );

    let now = Utc::now();
    let mut actions = Vec::new();
    let mut failures = Vec::new();

    for snapshot in &changed {
        match apply_one(&mut history, destination, attributes, snapshot, now) {
            Ok(Some(action)) => {
                tracing::info!("{}", describe(&action));
                actions.push(action);
            }
            Ok(None) => {
                tracing::debug!("task {} deleted before it was ever synced", snapshot.id);
            }
            Err(failure) => {
                tracing::warn!("{failure}");
                failures.push(failure);
            }
        }
    }

    Ok(SyncOutcome {
        history,
        actions,
        failures,
    })
}

/// Build the destination-shaped body for a source snapshot.
pub fn build_task(
    snapshot: &SourceSnapshot,
    attributes: &AttributeMap,
    now: DateTime<Utc>,
) -> DestinationTask {
    let recurrence = recurrence::classify(snapshot.recurrence_text.as_deref());
    DestinationTask {
        text: snapshot.text.clone(),
        kind: recurrence.kind,
        repeat: recurrence.repeat,
        completed: snapshot.completed,
        date: snapshot.due_date_utc,
        completed_at: snapshot.completed.then_some(now),
        attribute: attributes.attribute_for(&snapshot.labels),
    }
}

fn apply_one(
    history: &mut SyncHistory,
    destination: &mut dyn DestinationClient,
    attributes: &AttributeMap,
    snapshot: &SourceSnapshot,
    now: DateTime<Utc>,
) -> Result<Option<TaskAction>, TaskFailure> {
    if snapshot.deleted {
        let recorded_id = history
            .tasks
            .get(&snapshot.id)
            .and_then(TaskRecord::destination_id)
            .cloned();
        return match recorded_id {
            Some(id) => {
                destination
                    .delete(&id)
                    .map_err(|e| TaskFailure::new(snapshot, MutationStage::Delete, e))?;
                history.tasks.remove(&snapshot.id);
                Ok(Some(TaskAction::Deleted {
                    source: snapshot.id.clone(),
                    destination: id,
                }))
            }
            None => {
                // Never created on the destination; dropping the record is
                // all there is to do.
                history.tasks.remove(&snapshot.id);
                Ok(None)
            }
        };
    }

    let mut task = build_task(snapshot, attributes, now);
    let recorded = history
        .tasks
        .get(&snapshot.id)
        .and_then(|record| record.destination.clone());

    if let Some(reference) = recorded {
        if let Some(id) = reference.id.clone() {
            let scored = match scoring::plan_score(&mut task, &reference, now) {
                Some(direction) => {
                    destination
                        .score(&id, direction)
                        .map_err(|e| TaskFailure::new(snapshot, MutationStage::Score, e))?;
                    Some(direction)
                }
                None => None,
            };
            destination
                .update(&id, &task)
                .map_err(|e| TaskFailure::new(snapshot, MutationStage::Update, e))?;
            history
                .tasks
                .insert(snapshot.id.clone(), record_for(snapshot, &task, id));
            return Ok(Some(TaskAction::Updated {
                source: snapshot.id.clone(),
                scored,
            }));
        }
    }

    // First sync for this task, or a previous create never yielded an id.
    match destination.create(&task) {
        Ok(id) => {
            history
                .tasks
                .insert(snapshot.id.clone(), record_for(snapshot, &task, id.clone()));
            Ok(Some(TaskAction::Created {
                source: snapshot.id.clone(),
                destination: id,
            }))
        }
        Err(error) => {
            // A record without a usable destination identity must not
            // survive the run; the next observation retries the create.
            history.tasks.remove(&snapshot.id);
            Err(TaskFailure::new(snapshot, MutationStage::Create, error))
        }
    }
}

fn record_for(snapshot: &SourceSnapshot, task: &DestinationTask, id: DestinationTaskId) -> TaskRecord {
    TaskRecord {
        source: snapshot.clone(),
        destination: Some(DestinationReference {
            id: Some(id),
            kind: task.kind,
            completed: Some(task.completed),
            due_date: match task.kind {
                TaskKind::Recurring => task.date,
                TaskKind::Single => None,
            },
        }),
    }
}

fn describe(action: &TaskAction) -> String {
    match action {
        TaskAction::Created {
            source,
            destination,
        } => format!("created {source} as destination task {destination}"),
        TaskAction::Updated {
            source,
            scored: Some(direction),
        } => format!("updated {source} (scored {direction})"),
        TaskAction::Updated { source, scored: None } => format!("updated {source}"),
        TaskAction::Deleted {
            source,
            destination,
        } => format!("deleted destination task {destination} for {source}"),
    }
}
