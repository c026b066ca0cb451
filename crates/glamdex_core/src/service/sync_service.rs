//! Mirrors one user's inventory between two stores.
//!
//! # Invariants
//! - Only keys whose value differs are written, one `set_owned` per key.
//! - Keys present only in the target are left untouched.
//! - The first failed write aborts the run; earlier writes stay applied.

use crate::model::user::Email;
use crate::repo::error::PersistenceResult;
use crate::repo::inventory_repo::InventoryStore;
use log::info;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub copied: usize,
    pub unchanged: usize,
}

/// Copies every differing key of `email`'s record from `from` into `to`.
pub fn mirror<F, T>(from: &F, to: &T, email: &Email) -> PersistenceResult<SyncReport>
where
    F: InventoryStore + ?Sized,
    T: InventoryStore + ?Sized,
{
    let source = from.get(email)?;
    let target = to.get(email)?;
    let mut report = SyncReport::default();

    for (item_id, owned) in source.iter() {
        if target.get(item_id) == Some(owned) {
            report.unchanged += 1;
            continue;
        }
        to.set_owned(email, item_id, owned)?;
        report.copied += 1;
    }

    Ok(report)
}

/// Pull/push between a local and a remote store.
pub struct SyncService<L: InventoryStore, R: InventoryStore> {
    local: L,
    remote: R,
}

impl<L: InventoryStore, R: InventoryStore> SyncService<L, R> {
    pub fn new(local: L, remote: R) -> Self {
        Self { local, remote }
    }

    /// Remote → local.
    pub fn pull(&self, email: &Email) -> PersistenceResult<SyncReport> {
        let report = mirror(&self.remote, &self.local, email)?;
        info!(
            "event=inventory_sync module=sync status=ok direction=pull copied={} unchanged={}",
            report.copied, report.unchanged
        );
        Ok(report)
    }

    /// Local → remote.
    pub fn push(&self, email: &Email) -> PersistenceResult<SyncReport> {
        let report = mirror(&self.local, &self.remote, email)?;
        info!(
            "event=inventory_sync module=sync status=ok direction=push copied={} unchanged={}",
            report.copied, report.unchanged
        );
        Ok(report)
    }
}
