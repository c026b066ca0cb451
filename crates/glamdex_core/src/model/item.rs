//! Catalog item model.
//!
//! # Invariants
//! - `id` is unique within one catalog and never blank.
//! - `theme` is the label of the catalog group the item was listed under.

use serde::{Deserialize, Serialize};

/// Stable item identifier as it appears in the catalog document.
pub type ItemId = String;

/// One cosmetics item listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    /// Display name shown to users.
    pub name: String,
    /// Theme/category label the item belongs to.
    pub theme: String,
    /// Relative asset reference, e.g. `eyes/e1.png` or a bare `e1.png`.
    pub image: String,
}

impl Item {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        theme: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            theme: theme.into(),
            image: image.into(),
        }
    }
}
