//! Remote document-store backend.
//!
//! # Responsibility
//! - Store one JSON document per user under `{namespace}/{encoded email}`.
//! - Speak to the document store through the `DocumentTransport` seam so the
//!   HTTP client can be swapped for an in-process tree.
//!
//! # Invariants
//! - Inventory writes patch exactly one key of `{namespace}/{key}/inventory`.
//! - JSON `null` at a path means "absent".
//! - Credentials never appear in logs or error messages.

mod http;
mod keys;
mod memory;
mod store;

pub use http::HttpDocumentTransport;
pub use keys::{decode_key, encode_key};
pub use memory::MemoryDocumentTransport;
pub use store::RemoteInventoryStore;

use crate::repo::error::PersistenceResult;
use serde_json::Value;

/// Default top-level collection holding user documents.
pub const DEFAULT_NAMESPACE: &str = "users";

/// Read/write-by-path access to a JSON document tree.
pub trait DocumentTransport {
    /// Reads the subtree at `path`; `None` when absent.
    fn get_json(&self, path: &str) -> PersistenceResult<Option<Value>>;

    /// Replaces the subtree at `path`.
    fn put_json(&self, path: &str, document: &Value) -> PersistenceResult<()>;

    /// Merges the fields of `fields` (an object) into the subtree at `path`.
    fn patch_json(&self, path: &str, fields: &Value) -> PersistenceResult<()>;
}
