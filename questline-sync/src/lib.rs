//! # questline-sync
//!
//! One-way reconciliation engine between a source task list and a gamified
//! destination service.
//!
//! Call [`pipeline::run`] to execute a full pass (load history → reconcile →
//! save history), or [`engine::reconcile`] to drive the engine with an
//! explicit pre-loaded [`questline_core::SyncHistory`].

pub mod attributes;
pub mod detector;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod recurrence;
pub mod scoring;

pub use attributes::AttributeMap;
pub use engine::{
    reconcile, DestinationClient, SourceClient, SourceFetch, SyncOutcome, TaskAction,
};
pub use error::{ClientError, MutationStage, SyncError, TaskFailure};
pub use recurrence::{classify, Recurrence};
pub use scoring::ScoreDirection;
