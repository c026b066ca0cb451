//! Core of the Glamdex cosmetics inventory browser.
//!
//! Catalog loading, email-identified users, per-user owned/unowned inventory
//! over a local SQLite file or a remote document store, outfit assembly and
//! the interactive command language.

pub mod catalog;
pub mod command;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod outfit;
pub mod remote;
pub mod repo;
pub mod service;

pub use catalog::{
    load_catalog_from_path, AssetResolver, BlankItemQuery, Catalog, CatalogLoadError, ItemRef,
};
pub use config::{AppConfig, ConfigError, Credential, RemoteConfig, StoreSelection};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::inventory::InventoryRecord;
pub use model::item::{Item, ItemId};
pub use model::user::{Email, InvalidEmail, User};
pub use remote::{
    DocumentTransport, HttpDocumentTransport, MemoryDocumentTransport, RemoteInventoryStore,
};
pub use repo::error::{PersistenceError, PersistenceResult};
pub use repo::inventory_repo::{InventoryStore, SqliteInventoryStore};
pub use repo::user_repo::{SqliteUserDirectory, UserDirectory};
pub use service::identity_service::{IdentityError, IdentityResolver, Resolution};
pub use service::inventory_service::{InventoryService, InventoryView, ItemState, ThemeView};
pub use service::session::InventorySession;
pub use service::sync_service::{mirror, SyncReport, SyncService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
