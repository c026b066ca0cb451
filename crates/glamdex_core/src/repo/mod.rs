//! Store contracts and the local SQLite implementations.
//!
//! # Responsibility
//! - Define the `InventoryStore` and `UserDirectory` capability traits shared
//!   by the local and remote backends.
//! - Keep SQL details out of service and presentation code.
//!
//! # Invariants
//! - Reading an unknown user's inventory yields an empty record, never an error.
//! - Every write touches exactly one key; a failed write leaves prior state intact.
//! - Stores do not validate item ids against the catalog.

pub mod error;
pub mod inventory_repo;
pub mod user_repo;
