//! Interactive inventory session for one signed-in user.
//!
//! # Invariants
//! - The displayed record only changes after the store accepted the write.
//! - On `PersistenceError` the displayed value stays at the last known-good
//!   value and the error is returned to the caller.

use crate::catalog::Catalog;
use crate::model::inventory::InventoryRecord;
use crate::model::user::User;
use crate::repo::error::PersistenceResult;
use crate::repo::inventory_repo::InventoryStore;
use crate::service::inventory_service::{InventoryService, InventoryView};

pub struct InventorySession<S: InventoryStore> {
    service: InventoryService<S>,
    user: User,
    displayed: InventoryRecord,
}

impl<S: InventoryStore> InventorySession<S> {
    /// Opens a session by reading the user's full record.
    pub fn open(store: S, user: User) -> PersistenceResult<Self> {
        let service = InventoryService::new(store);
        let displayed = service.get(&user.email)?;
        Ok(Self {
            service,
            user,
            displayed,
        })
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    /// Last known-good record.
    pub fn record(&self) -> &InventoryRecord {
        &self.displayed
    }

    pub fn is_owned(&self, item_id: &str) -> bool {
        self.displayed.is_owned(item_id)
    }

    /// Writes one flag, then updates the displayed record.
    pub fn set_owned(&mut self, item_id: &str, owned: bool) -> PersistenceResult<()> {
        self.service.set_owned(&self.user.email, item_id, owned)?;
        self.displayed.set(item_id, owned);
        Ok(())
    }

    /// Flips one displayed flag through the store; returns the new value.
    pub fn toggle(&mut self, item_id: &str) -> PersistenceResult<bool> {
        let owned = !self.displayed.is_owned(item_id);
        self.set_owned(item_id, owned)?;
        Ok(owned)
    }

    /// Un-owns every owned item, one write per key.
    ///
    /// Stops at the first failure; items cleared before it stay cleared.
    pub fn clear(&mut self) -> PersistenceResult<usize> {
        let owned: Vec<String> = self.displayed.owned_ids().map(str::to_string).collect();
        for item_id in &owned {
            self.set_owned(item_id, false)?;
        }
        Ok(owned.len())
    }

    /// Replaces the displayed record with the stored one.
    pub fn reload(&mut self) -> PersistenceResult<()> {
        self.displayed = self.service.get(&self.user.email)?;
        Ok(())
    }

    pub fn view<'c>(&self, catalog: &'c Catalog) -> InventoryView<'c> {
        InventoryView::build(catalog, &self.displayed)
    }
}
