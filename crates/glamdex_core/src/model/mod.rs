//! Domain model for catalog items, users and per-user inventory.
//!
//! # Responsibility
//! - Define the canonical data structures shared by catalog, store and service
//!   layers.
//!
//! # Invariants
//! - Items are immutable once the catalog is loaded.
//! - A user is identified by email; one user owns at most one inventory record.

pub mod inventory;
pub mod item;
pub mod user;
