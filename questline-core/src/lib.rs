//! Questline core library — domain types, history persistence, errors.
//!
//! Public API surface:
//! - [`types`] — newtypes and domain structs shared by the engine and CLI
//! - [`error`] — [`HistoryError`]
//! - [`history`] — load / save of the persisted sync history
//!
//! The history file is the durable mapping between source task identities
//! and their destination counterparts; everything else in this crate exists
//! to describe its shape.

pub mod error;
pub mod history;
pub mod types;

pub use error::HistoryError;
pub use types::{
    Attribute, DestinationReference, DestinationTask, DestinationTaskId, LabelId, RepeatSchedule,
    SourceSnapshot, SourceTaskId, SyncHistory, TaskKind, TaskRecord,
};
