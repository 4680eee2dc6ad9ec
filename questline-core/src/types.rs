//! Domain types for the Questline sync history and task model.
//!
//! All types are serializable/deserializable via serde + serde_json; the
//! persisted history file is one JSON document rooted at [`SyncHistory`].

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed identifier for a task in the source service.
///
/// Stable for the task's lifetime; used as the key of the history map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceTaskId(pub String);

impl fmt::Display for SourceTaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for SourceTaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SourceTaskId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A strongly-typed identifier for a task in the destination service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DestinationTaskId(pub String);

impl fmt::Display for DestinationTaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for DestinationTaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DestinationTaskId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A strongly-typed identifier for a source-side label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LabelId(pub u64);

impl fmt::Display for LabelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for LabelId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Whether a destination task happens once or repeats on a weekday schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    #[default]
    Single,
    Recurring,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::Single => write!(f, "single"),
            TaskKind::Recurring => write!(f, "recurring"),
        }
    }
}

/// Destination character attribute a task can train.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Attribute {
    #[serde(rename = "str")]
    Strength,
    #[serde(rename = "int")]
    Intelligence,
    #[serde(rename = "con")]
    Constitution,
    #[serde(rename = "per")]
    Perception,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Strength => write!(f, "str"),
            Attribute::Intelligence => write!(f, "int"),
            Attribute::Constitution => write!(f, "con"),
            Attribute::Perception => write!(f, "per"),
        }
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// Per-weekday reset schedule for a recurring destination task.
///
/// Field names match the destination's wire keys so the struct serializes
/// directly into request bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RepeatSchedule {
    pub su: bool,
    pub m: bool,
    pub t: bool,
    pub w: bool,
    pub th: bool,
    pub f: bool,
    pub s: bool,
}

impl RepeatSchedule {
    /// Schedule firing on all seven days.
    pub fn everyday() -> Self {
        Self {
            su: true,
            m: true,
            t: true,
            w: true,
            th: true,
            f: true,
            s: true,
        }
    }
}

/// Last-seen state of a source task, captured wholesale at fetch time.
///
/// Used only for diffing against the next fetch; never partially updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSnapshot {
    pub id: SourceTaskId,
    pub text: String,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date_utc: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_text: Option<String>,
    #[serde(default)]
    pub labels: Vec<LabelId>,
    #[serde(default)]
    pub deleted: bool,
}

/// What the destination last told us about a synced task.
///
/// `id: None` can appear in histories written by older versions or after a
/// create that returned no identity; such a reference is unusable and the
/// task is treated as never-created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DestinationTaskId>,
    #[serde(default)]
    pub kind: TaskKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    /// Tracked only for recurring tasks, to detect due-date advancement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

/// One entry of the history map: the source snapshot last reconciled plus
/// the destination identity it maps to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub source: SourceSnapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<DestinationReference>,
}

impl TaskRecord {
    /// The usable destination id, if one was ever recorded.
    pub fn destination_id(&self) -> Option<&DestinationTaskId> {
        self.destination.as_ref().and_then(|d| d.id.as_ref())
    }
}

/// The persisted sync state: source cursor plus the task identity mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SyncHistory {
    /// Opaque token from the source service marking sync position; absent on
    /// first run (fetch everything).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[serde(default)]
    pub tasks: HashMap<SourceTaskId, TaskRecord>,
}

/// A task body shaped for the destination service, built from a
/// [`SourceSnapshot`] by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DestinationTask {
    pub text: String,
    pub kind: TaskKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat: Option<RepeatSchedule>,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<Attribute>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newtype_display() {
        assert_eq!(SourceTaskId::from("44444444").to_string(), "44444444");
        assert_eq!(DestinationTaskId::from("abc-123").to_string(), "abc-123");
        assert_eq!(LabelId::from(414253).to_string(), "414253");
    }

    #[test]
    fn newtype_equality() {
        let a = SourceTaskId::from("x");
        let b = SourceTaskId::from(String::from("x"));
        assert_eq!(a, b);
    }

    #[test]
    fn task_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&TaskKind::Recurring).unwrap(),
            "\"recurring\""
        );
        assert_eq!(serde_json::to_string(&TaskKind::Single).unwrap(), "\"single\"");
    }

    #[test]
    fn attribute_serializes_short_form() {
        assert_eq!(serde_json::to_string(&Attribute::Strength).unwrap(), "\"str\"");
        assert_eq!(
            serde_json::from_str::<Attribute>("\"per\"").unwrap(),
            Attribute::Perception
        );
    }

    #[test]
    fn repeat_schedule_uses_wire_keys() {
        let json = serde_json::to_value(RepeatSchedule::everyday()).unwrap();
        for key in ["su", "m", "t", "w", "th", "f", "s"] {
            assert_eq!(json[key], true, "missing weekday key {key}");
        }
    }

    #[test]
    fn destination_reference_without_id_is_unusable() {
        let record = TaskRecord {
            source: snapshot("1"),
            destination: Some(DestinationReference {
                id: None,
                kind: TaskKind::Single,
                completed: Some(true),
                due_date: None,
            }),
        };
        assert!(record.destination_id().is_none());
    }

    #[test]
    fn legacy_record_without_destination_parses() {
        let json = r#"{"source":{"id":"9","text":"water plants","completed":false}}"#;
        let record: TaskRecord = serde_json::from_str(json).unwrap();
        assert!(record.destination.is_none());
        assert_eq!(record.source.id, SourceTaskId::from("9"));
        assert!(record.source.labels.is_empty());
    }

    fn snapshot(id: &str) -> SourceSnapshot {
        SourceSnapshot {
            id: SourceTaskId::from(id),
            text: "task".to_string(),
            completed: false,
            due_date_utc: None,
            recurrence_text: None,
            labels: vec![],
            deleted: false,
        }
    }
}
