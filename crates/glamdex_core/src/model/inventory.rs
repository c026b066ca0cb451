//! Per-user inventory record.
//!
//! # Invariants
//! - Keys are item ids; values are the owned flag.
//! - Keys absent from the record mean "not owned".
//! - Keys for items missing from the current catalog are kept, never surfaced.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping of item id to owned flag for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InventoryRecord {
    entries: BTreeMap<String, bool>,
}

impl InventoryRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored flag, or `None` when the key was never written.
    pub fn get(&self, item_id: &str) -> Option<bool> {
        self.entries.get(item_id).copied()
    }

    /// Returns whether the item is owned; absent keys are unowned.
    pub fn is_owned(&self, item_id: &str) -> bool {
        self.get(item_id).unwrap_or(false)
    }

    /// Upserts one key.
    pub fn set(&mut self, item_id: impl Into<String>, owned: bool) {
        self.entries.insert(item_id.into(), owned);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ids flagged as owned, in key order.
    pub fn owned_ids(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, owned)| **owned)
            .map(|(id, _)| id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries.iter().map(|(id, owned)| (id.as_str(), *owned))
    }

    pub fn as_map(&self) -> &BTreeMap<String, bool> {
        &self.entries
    }

    pub fn into_map(self) -> BTreeMap<String, bool> {
        self.entries
    }
}

impl From<BTreeMap<String, bool>> for InventoryRecord {
    fn from(entries: BTreeMap<String, bool>) -> Self {
        Self { entries }
    }
}

impl FromIterator<(String, bool)> for InventoryRecord {
    fn from_iter<T: IntoIterator<Item = (String, bool)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::InventoryRecord;

    #[test]
    fn absent_keys_read_as_unowned() {
        let mut record = InventoryRecord::new();
        record.set("e1", true);
        record.set("l2", false);

        assert!(record.is_owned("e1"));
        assert!(!record.is_owned("l2"));
        assert!(!record.is_owned("missing"));
        assert_eq!(record.get("missing"), None);
        assert_eq!(record.owned_ids().collect::<Vec<_>>(), vec!["e1"]);
    }
}
