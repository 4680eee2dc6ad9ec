//! HTTP clients for the two remote services.
//!
//! Wire payloads are parsed into typed structs at this boundary; anything
//! malformed becomes a [`questline_sync::ClientError`] instead of leaking
//! upward.

pub mod destination;
pub mod source;

pub use destination::HabiticaClient;
pub use source::{SourceLabel, TodoistClient};
