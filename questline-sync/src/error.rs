//! Error types for questline-sync.

use std::fmt;

use thiserror::Error;

use questline_core::error::HistoryError;
use questline_core::types::{SourceSnapshot, SourceTaskId};

/// Error surfaced by a source or destination client implementation.
///
/// Client internals (HTTP status codes, wire parsing) are flattened to a
/// message here; the engine only needs to know that a call failed, never why.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct ClientError(pub String);

impl ClientError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Errors that abort an entire reconciliation run.
///
/// Per-task mutation failures are NOT here — they are collected as
/// [`TaskFailure`]s and never stop the run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The initial source fetch failed; nothing was mutated and the stored
    /// cursor is left untouched.
    #[error("source fetch failed: {0}")]
    SourceFetch(#[source] ClientError),

    /// The history store could not be written.
    #[error("history store error: {0}")]
    History(#[from] HistoryError),
}

/// Which remote mutation failed for a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationStage {
    Create,
    Update,
    Delete,
    Score,
}

impl fmt::Display for MutationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationStage::Create => write!(f, "create"),
            MutationStage::Update => write!(f, "update"),
            MutationStage::Delete => write!(f, "delete"),
            MutationStage::Score => write!(f, "score"),
        }
    }
}

/// An isolated per-task failure: recorded against the task, never fatal.
#[derive(Debug, Clone)]
pub struct TaskFailure {
    pub id: SourceTaskId,
    pub text: String,
    pub stage: MutationStage,
    pub error: ClientError,
}

impl TaskFailure {
    pub(crate) fn new(snapshot: &SourceSnapshot, stage: MutationStage, error: ClientError) -> Self {
        Self {
            id: snapshot.id.clone(),
            text: snapshot.text.clone(),
            stage,
            error,
        }
    }
}

impl fmt::Display for TaskFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task {} ({}) {} failed: {}", self.id, self.text, self.stage, self.error)
    }
}
