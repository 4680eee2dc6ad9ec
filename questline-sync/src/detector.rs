//! Change detection — which fetched tasks need a destination mutation.
//!
//! A task is flagged when it has no prior record or when any synced field
//! differs from the stored snapshot. Everything else is excluded from
//! downstream processing entirely: no body building, no remote calls.

use std::collections::BTreeSet;

use questline_core::types::{LabelId, SourceSnapshot, SyncHistory};

/// Filter a fetch result down to the snapshots needing a destination
/// mutation, preserving fetch order.
pub fn changed_tasks<'a>(
    history: &SyncHistory,
    items: &'a [SourceSnapshot],
) -> Vec<&'a SourceSnapshot> {
    items
        .iter()
        .filter(|item| {
            let old = history.tasks.get(&item.id).map(|record| &record.source);
            needs_update(item, old)
        })
        .collect()
}

/// Whether a fetched snapshot differs from the stored one.
pub fn needs_update(new: &SourceSnapshot, old: Option<&SourceSnapshot>) -> bool {
    let Some(old) = old else {
        return true;
    };
    new.text != old.text
        || new.completed != old.completed
        || new.due_date_utc != old.due_date_utc
        || new.deleted != old.deleted
        || labels_differ(&new.labels, &old.labels)
}

/// Order-independent set comparison: same cardinality and same elements.
fn labels_differ(new: &[LabelId], old: &[LabelId]) -> bool {
    if new.len() != old.len() {
        return true;
    }
    let new_set: BTreeSet<&LabelId> = new.iter().collect();
    let old_set: BTreeSet<&LabelId> = old.iter().collect();
    new_set != old_set
}
