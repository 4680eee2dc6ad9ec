//! History store — the persisted mapping between source and destination
//! task identities.
//!
//! Persists a [`SyncHistory`] JSON document at `<home>/.questline/history.json`.
//! Writes use an atomic `.tmp` + rename pattern; a missing or corrupt file
//! loads as an empty history so a damaged state file downgrades the next run
//! to first-run semantics instead of aborting it.
//!
//! # API pattern
//!
//! Every function has two forms:
//! - `fn_at(home: &Path, …)` — explicit home; used in tests with `TempDir`
//! - `fn(…)` — derives home from `dirs::home_dir()`, delegates to `_at`
//!
//! Tests must NEVER call the no-arg wrappers; always use `_at`.

use std::path::{Path, PathBuf};

use crate::error::{io_err, HistoryError};
use crate::types::SyncHistory;

/// Path to the history JSON, rooted at `home`.
///
/// `~/.questline/history.json`
pub fn history_path_at(home: &Path) -> PathBuf {
    home.join(".questline").join("history.json")
}

/// Load the persisted history.
///
/// Missing, unreadable, or unparseable files all yield the empty
/// `{tasks: {}}` shape. The at-most-once-create guarantee depends on the
/// mapping when it exists, but a corrupt file must never abort a run.
pub fn load_at(home: &Path) -> SyncHistory {
    let path = history_path_at(home);
    let Ok(contents) = std::fs::read_to_string(&path) else {
        return SyncHistory::default();
    };
    serde_json::from_str(&contents).unwrap_or_default()
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<SyncHistory, HistoryError> {
    Ok(load_at(&home()?))
}

/// Save the full history atomically, overwriting any prior content.
///
/// Writes to `<path>.tmp` then renames to `<path>`. Must be called exactly
/// once per run, after all mutations are applied — including runs where some
/// per-task mutation failed.
pub fn save_at(home: &Path, history: &SyncHistory) -> Result<(), HistoryError> {
    let path = history_path_at(home);
    let Some(dir) = path.parent() else {
        return Err(io_err(path, std::io::Error::other("invalid history path")));
    };

    std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;

    let json = serde_json::to_string_pretty(history)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, &json).map_err(|e| io_err(&tmp, e))?;
    std::fs::rename(&tmp, &path).map_err(|e| io_err(&path, e))?;
    Ok(())
}

/// `save_at` convenience wrapper.
pub fn save(history: &SyncHistory) -> Result<(), HistoryError> {
    save_at(&home()?, history)
}

fn home() -> Result<PathBuf, HistoryError> {
    dirs::home_dir().ok_or(HistoryError::HomeNotFound)
}
