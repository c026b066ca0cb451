//! Inventory store contract and SQLite implementation.
//!
//! # Invariants
//! - `(email, item_id)` is unique; writes are single-row upserts.
//! - Read paths reject invalid persisted flags instead of masking them.

use crate::model::inventory::InventoryRecord;
use crate::model::user::Email;
use crate::repo::error::{PersistenceError, PersistenceResult};
use rusqlite::{params, Connection};
use std::collections::BTreeMap;

/// Per-user owned/unowned state, independent of the backing medium.
///
/// Presentation and services depend on this trait only, so the local and
/// remote backends are interchangeable.
pub trait InventoryStore {
    /// Returns the stored record, or an empty one for a user never written.
    fn get(&self, email: &Email) -> PersistenceResult<InventoryRecord>;

    /// Upserts one key of the user's record.
    fn set_owned(&self, email: &Email, item_id: &str, owned: bool) -> PersistenceResult<()>;

    /// Full snapshot of the user's record.
    fn all(&self, email: &Email) -> PersistenceResult<BTreeMap<String, bool>> {
        self.get(email).map(InventoryRecord::into_map)
    }
}

impl<S: InventoryStore + ?Sized> InventoryStore for &S {
    fn get(&self, email: &Email) -> PersistenceResult<InventoryRecord> {
        (**self).get(email)
    }

    fn set_owned(&self, email: &Email, item_id: &str, owned: bool) -> PersistenceResult<()> {
        (**self).set_owned(email, item_id, owned)
    }

    fn all(&self, email: &Email) -> PersistenceResult<BTreeMap<String, bool>> {
        (**self).all(email)
    }
}

/// SQLite-backed inventory store for single-process use.
#[derive(Clone, Copy)]
pub struct SqliteInventoryStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteInventoryStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl InventoryStore for SqliteInventoryStore<'_> {
    fn get(&self, email: &Email) -> PersistenceResult<InventoryRecord> {
        let mut stmt = self.conn.prepare(
            "SELECT item_id, owned
             FROM inventory
             WHERE email = ?1
             ORDER BY item_id ASC;",
        )?;
        let mut rows = stmt.query([email.as_str()])?;
        let mut record = InventoryRecord::new();

        while let Some(row) = rows.next()? {
            let item_id: String = row.get("item_id")?;
            let owned = match row.get::<_, i64>("owned")? {
                0 => false,
                1 => true,
                other => {
                    return Err(PersistenceError::InvalidData(format!(
                        "invalid owned value `{other}` in inventory.owned"
                    )));
                }
            };
            record.set(item_id, owned);
        }

        Ok(record)
    }

    fn set_owned(&self, email: &Email, item_id: &str, owned: bool) -> PersistenceResult<()> {
        self.conn.execute(
            "INSERT INTO inventory (email, item_id, owned)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (email, item_id) DO UPDATE SET
                owned = excluded.owned,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![email.as_str(), item_id, i64::from(owned)],
        )?;
        Ok(())
    }
}
