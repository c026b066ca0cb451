//! Inventory use-cases and catalog-aware views.
//!
//! # Invariants
//! - Views list catalog items only; stored keys without a catalog item are
//!   counted as stale and never rendered.
//! - The service never validates item ids against the catalog on write.

use crate::catalog::Catalog;
use crate::model::inventory::InventoryRecord;
use crate::model::item::Item;
use crate::model::user::Email;
use crate::repo::error::PersistenceResult;
use crate::repo::inventory_repo::InventoryStore;
use log::{info, warn};
use std::collections::BTreeMap;

/// Owned flag for one catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemState<'c> {
    pub item: &'c Item,
    pub owned: bool,
}

/// Items of one theme with their owned flags, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeView<'c> {
    pub theme: &'c str,
    pub items: Vec<ItemState<'c>>,
}

/// Render-ready inventory for one user against one catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryView<'c> {
    pub themes: Vec<ThemeView<'c>>,
    /// Stored keys with no matching catalog item.
    pub stale_keys: usize,
}

impl<'c> InventoryView<'c> {
    /// Joins a record with the catalog.
    pub fn build(catalog: &'c Catalog, record: &InventoryRecord) -> Self {
        let themes = catalog
            .themes()
            .into_iter()
            .map(|theme| ThemeView {
                theme,
                items: catalog
                    .items(theme)
                    .iter()
                    .map(|item| ItemState {
                        item,
                        owned: record.is_owned(&item.id),
                    })
                    .collect(),
            })
            .collect();
        let stale_keys = record
            .iter()
            .filter(|(item_id, _)| !catalog.contains(item_id))
            .count();

        Self { themes, stale_keys }
    }

    pub fn owned_count(&self) -> usize {
        self.states().filter(|state| state.owned).count()
    }

    pub fn total(&self) -> usize {
        self.states().count()
    }

    pub fn states(&self) -> impl Iterator<Item = &ItemState<'c>> {
        self.themes.iter().flat_map(|theme| theme.items.iter())
    }
}

/// Storage-agnostic inventory operations.
pub struct InventoryService<S: InventoryStore> {
    store: S,
}

impl<S: InventoryStore> InventoryService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn get(&self, email: &Email) -> PersistenceResult<InventoryRecord> {
        self.store.get(email)
    }

    pub fn all(&self, email: &Email) -> PersistenceResult<BTreeMap<String, bool>> {
        self.store.all(email)
    }

    /// Writes one owned flag.
    ///
    /// # Side effects
    /// - Emits `inventory_set` logging events; item ids are logged, emails are not.
    pub fn set_owned(&self, email: &Email, item_id: &str, owned: bool) -> PersistenceResult<()> {
        match self.store.set_owned(email, item_id, owned) {
            Ok(()) => {
                info!("event=inventory_set module=inventory status=ok item_id={item_id} owned={owned}");
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event=inventory_set module=inventory status=error item_id={item_id} error_code={} error={}",
                    err.code(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Flips one owned flag and returns the new value.
    pub fn toggle(&self, email: &Email, item_id: &str) -> PersistenceResult<bool> {
        let owned = !self.store.get(email)?.is_owned(item_id);
        self.set_owned(email, item_id, owned)?;
        Ok(owned)
    }

    /// Reads the user's record and joins it with the catalog.
    pub fn snapshot<'c>(
        &self,
        email: &Email,
        catalog: &'c Catalog,
    ) -> PersistenceResult<InventoryView<'c>> {
        let record = self.store.get(email)?;
        Ok(InventoryView::build(catalog, &record))
    }
}
