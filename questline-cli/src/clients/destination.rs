//! Habitica-style destination client.
//!
//! Standard v3 REST surface authenticated per request with `x-api-user` /
//! `x-api-key` headers. Deleting an already-missing task (HTTP 404) is
//! success: the source task simply outlived its destination counterpart.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use questline_core::types::{Attribute, DestinationTask, DestinationTaskId, RepeatSchedule, TaskKind};
use questline_sync::{ClientError, DestinationClient, ScoreDirection};

const DEFAULT_BASE_URL: &str = "https://habitica.com/api/v3";
const CLIENT_ID: &str = "questline";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking client for the destination task API.
pub struct HabiticaClient {
    agent: ureq::Agent,
    base_url: String,
    user: String,
    key: String,
}

impl HabiticaClient {
    pub fn new(user: impl Into<String>, key: impl Into<String>) -> Self {
        Self::with_base_url(user, key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(
        user: impl Into<String>,
        key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build(),
            base_url: base_url.into(),
            user: user.into(),
            key: key.into(),
        }
    }

    fn request(&self, method: &str, path: &str) -> ureq::Request {
        self.agent
            .request(method, &format!("{}{}", self.base_url, path))
            .set("x-api-user", &self.user)
            .set("x-api-key", &self.key)
            .set("x-client", CLIENT_ID)
    }
}

impl DestinationClient for HabiticaClient {
    fn create(&mut self, task: &DestinationTask) -> Result<DestinationTaskId, ClientError> {
        let envelope: TaskEnvelope = self
            .request("POST", "/tasks/user")
            .send_json(WireTask::from(task))
            .map_err(|err| ClientError::new(format!("create failed: {err}")))?
            .into_json()
            .map_err(|err| ClientError::new(format!("malformed create response: {err}")))?;
        envelope
            .task_id()
            .ok_or_else(|| ClientError::new("create response contained no task id"))
    }

    fn update(&mut self, id: &DestinationTaskId, task: &DestinationTask) -> Result<(), ClientError> {
        self.request("PUT", &format!("/tasks/{id}"))
            .send_json(WireTask::from(task))
            .map_err(|err| ClientError::new(format!("update of {id} failed: {err}")))?;
        Ok(())
    }

    fn delete(&mut self, id: &DestinationTaskId) -> Result<(), ClientError> {
        match self.request("DELETE", &format!("/tasks/{id}")).call() {
            Ok(_) => Ok(()),
            // Already gone upstream.
            Err(ureq::Error::Status(404, _)) => Ok(()),
            Err(err) => Err(ClientError::new(format!("delete of {id} failed: {err}"))),
        }
    }

    fn score(
        &mut self,
        id: &DestinationTaskId,
        direction: ScoreDirection,
    ) -> Result<(), ClientError> {
        self.request("POST", &format!("/tasks/{id}/score/{direction}"))
            .call()
            .map_err(|err| ClientError::new(format!("scoring {id} {direction} failed: {err}")))?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Request body in the destination's vocabulary: `type` is `todo`/`daily`,
/// the completion timestamp is `dateCompleted`.
#[derive(Debug, Serialize)]
struct WireTask<'a> {
    text: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    repeat: Option<&'a RepeatSchedule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<DateTime<Utc>>,
    #[serde(rename = "dateCompleted", skip_serializing_if = "Option::is_none")]
    completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    attribute: Option<Attribute>,
}

impl<'a> From<&'a DestinationTask> for WireTask<'a> {
    fn from(task: &'a DestinationTask) -> Self {
        Self {
            text: &task.text,
            kind: match task.kind {
                TaskKind::Single => "todo",
                TaskKind::Recurring => "daily",
            },
            completed: task.completed,
            repeat: task.repeat.as_ref(),
            date: task.date,
            completed_at: task.completed_at,
            attribute: task.attribute,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TaskEnvelope {
    #[serde(default)]
    data: Option<TaskData>,
}

#[derive(Debug, Deserialize)]
struct TaskData {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "_id")]
    alt_id: Option<String>,
}

impl TaskEnvelope {
    fn task_id(self) -> Option<DestinationTaskId> {
        self.data
            .and_then(|data| data.id.or(data.alt_id))
            .filter(|id| !id.is_empty())
            .map(DestinationTaskId::from)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
