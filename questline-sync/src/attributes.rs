//! Label-to-attribute mapping.
//!
//! The source service tags tasks with labels; a handful of well-known label
//! names ("str", "mental", "soc", …) mark which destination character
//! attribute a task trains. The synonym table is fixed; the label *ids*
//! behind those names vary per account and are resolved from the source's
//! label listing at startup.

use questline_core::types::{Attribute, LabelId};

/// Fixed synonym table: each attribute and the label names that select it.
pub const ATTRIBUTE_SYNONYMS: [(Attribute, [&str; 4]); 4] = [
    (Attribute::Strength, ["str", "strength", "physical", "phy"]),
    (Attribute::Intelligence, ["int", "intelligence", "mental", "men"]),
    (Attribute::Constitution, ["con", "constitution", "social", "soc"]),
    (Attribute::Perception, ["per", "perception", "other", "oth"]),
];

/// Resolved mapping from label ids to attributes for one account.
///
/// The empty map (no labels known) maps every task to no attribute.
#[derive(Debug, Clone, Default)]
pub struct AttributeMap {
    categories: Vec<(Attribute, Vec<LabelId>)>,
}

impl AttributeMap {
    /// Build the map from a label listing of `(name, id)` pairs.
    ///
    /// Names are matched case-insensitively against the synonym table;
    /// labels with unrecognized names are ignored.
    pub fn from_labels<I>(labels: I) -> Self
    where
        I: IntoIterator<Item = (String, LabelId)>,
    {
        let mut categories: Vec<(Attribute, Vec<LabelId>)> = ATTRIBUTE_SYNONYMS
            .iter()
            .map(|(attribute, _)| (*attribute, Vec::new()))
            .collect();
        for (name, id) in labels {
            let name = name.to_ascii_lowercase();
            if let Some(slot) = ATTRIBUTE_SYNONYMS
                .iter()
                .position(|(_, synonyms)| synonyms.contains(&name.as_str()))
            {
                categories[slot].1.push(id);
            }
        }
        Self { categories }
    }

    /// The attribute selected by a task's labels, if any.
    ///
    /// Scans the task's labels in order; the first label known to any
    /// category wins, so a task carrying labels from two categories gets a
    /// deterministic answer.
    pub fn attribute_for(&self, labels: &[LabelId]) -> Option<Attribute> {
        for label in labels {
            for (attribute, ids) in &self.categories {
                if ids.contains(label) {
                    return Some(*attribute);
                }
            }
        }
        None
    }
}
