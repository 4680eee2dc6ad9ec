//! Todoist-style source client.
//!
//! One POST per call against the incremental sync endpoint: `sync_token`
//! carries the cursor (`*` on first run fetches everything), and the
//! response's `sync_token` becomes the cursor for the next run.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use questline_core::types::{LabelId, SourceSnapshot, SourceTaskId};
use questline_sync::{ClientError, SourceClient, SourceFetch};

const DEFAULT_BASE_URL: &str = "https://api.todoist.com/sync/v9";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking client for the source sync API.
pub struct TodoistClient {
    agent: ureq::Agent,
    base_url: String,
    token: String,
}

/// A label from the source's label listing, used to seed the attribute map.
#[derive(Debug, Clone)]
pub struct SourceLabel {
    pub id: LabelId,
    pub name: String,
}

impl TodoistClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build(),
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    /// List the account's labels (names + ids).
    pub fn labels(&mut self) -> Result<Vec<SourceLabel>, ClientError> {
        let response: LabelsResponse = self
            .agent
            .post(&format!("{}/sync", self.base_url))
            .send_form(&[
                ("token", self.token.as_str()),
                ("sync_token", "*"),
                ("resource_types", r#"["labels"]"#),
            ])
            .map_err(|err| ClientError::new(format!("label listing request failed: {err}")))?
            .into_json()
            .map_err(|err| ClientError::new(format!("malformed label listing response: {err}")))?;
        Ok(response
            .labels
            .into_iter()
            .map(|label| SourceLabel {
                id: LabelId::from(label.id),
                name: label.name,
            })
            .collect())
    }
}

impl SourceClient for TodoistClient {
    fn fetch(&mut self, cursor: Option<&str>) -> Result<SourceFetch, ClientError> {
        let response: SyncResponse = self
            .agent
            .post(&format!("{}/sync", self.base_url))
            .send_form(&[
                ("token", self.token.as_str()),
                ("sync_token", cursor.unwrap_or("*")),
                ("resource_types", r#"["items"]"#),
            ])
            .map_err(|err| ClientError::new(format!("source sync request failed: {err}")))?
            .into_json()
            .map_err(|err| ClientError::new(format!("malformed source sync response: {err}")))?;

        let mut items = Vec::with_capacity(response.items.len());
        for item in response.items {
            items.push(item.into_snapshot()?);
        }
        Ok(SourceFetch {
            cursor: response.sync_token,
            items,
        })
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SyncResponse {
    #[serde(default, deserialize_with = "opt_id_as_string")]
    sync_token: Option<String>,
    #[serde(default)]
    items: Vec<WireItem>,
}

#[derive(Debug, Deserialize)]
struct LabelsResponse {
    #[serde(default)]
    labels: Vec<WireLabel>,
}

#[derive(Debug, Deserialize)]
struct WireLabel {
    id: u64,
    name: String,
}

/// An item as the source wire reports it. Booleans arrive as `true/false` or
/// `0/1` depending on API generation; ids as numbers or strings.
#[derive(Debug, Deserialize)]
struct WireItem {
    #[serde(deserialize_with = "id_as_string")]
    id: String,
    content: String,
    #[serde(default, deserialize_with = "flag")]
    checked: bool,
    #[serde(default)]
    due_date_utc: Option<String>,
    #[serde(default)]
    date_string: Option<String>,
    #[serde(default)]
    labels: Vec<u64>,
    #[serde(default, deserialize_with = "flag")]
    is_deleted: bool,
}

impl WireItem {
    fn into_snapshot(self) -> Result<SourceSnapshot, ClientError> {
        let due_date_utc = match self.due_date_utc.as_deref() {
            Some("") | None => None,
            Some(raw) => Some(parse_due_date(raw)?),
        };
        Ok(SourceSnapshot {
            id: SourceTaskId::from(self.id),
            text: self.content,
            completed: self.checked,
            due_date_utc,
            recurrence_text: self.date_string.filter(|text| !text.is_empty()),
            labels: self.labels.into_iter().map(LabelId::from).collect(),
            deleted: self.is_deleted,
        })
    }
}

fn parse_due_date(raw: &str) -> Result<DateTime<Utc>, ClientError> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%a %d %b %Y %H:%M:%S %z"))
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|err| ClientError::new(format!("unparseable due date {raw:?}: {err}")))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(u64),
    Text(String),
}

impl From<NumberOrText> for String {
    fn from(value: NumberOrText) -> Self {
        match value {
            NumberOrText::Number(n) => n.to_string(),
            NumberOrText::Text(s) => s,
        }
    }
}

fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    NumberOrText::deserialize(deserializer).map(String::from)
}

fn opt_id_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<NumberOrText>::deserialize(deserializer)?.map(String::from))
}

fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Flag(bool),
        Number(u64),
    }
    Ok(match Raw::deserialize(deserializer)? {
        Raw::Flag(b) => b,
        Raw::Number(n) => n != 0,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
