//! Inventory store and user directory over a remote document tree.

use super::keys::{decode_key, encode_key};
use super::{DocumentTransport, DEFAULT_NAMESPACE};
use crate::model::inventory::InventoryRecord;
use crate::model::user::{Email, User};
use crate::repo::error::{PersistenceError, PersistenceResult};
use crate::repo::inventory_repo::InventoryStore;
use crate::repo::user_repo::UserDirectory;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use uuid::Uuid;

/// Stored shape of one user document.
#[derive(Debug, Serialize, Deserialize)]
struct UserDocument {
    email: String,
    uid: Uuid,
    created_at_ms: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_login_ms: Option<i64>,
}

/// Remote backend keyed by `(email, namespace)`.
#[derive(Debug, Clone)]
pub struct RemoteInventoryStore<T> {
    transport: T,
    namespace: String,
}

impl<T: DocumentTransport> RemoteInventoryStore<T> {
    pub fn new(transport: T) -> Self {
        Self::with_namespace(transport, DEFAULT_NAMESPACE)
    }

    pub fn with_namespace(transport: T, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        let namespace = namespace.trim_matches('/').to_string();
        Self {
            transport,
            namespace,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn user_path(&self, email: &Email) -> String {
        format!("{}/{}", self.namespace, encode_key(email.as_str()))
    }

    fn inventory_path(&self, email: &Email) -> String {
        format!("{}/inventory", self.user_path(email))
    }
}

impl<T: DocumentTransport> InventoryStore for RemoteInventoryStore<T> {
    fn get(&self, email: &Email) -> PersistenceResult<InventoryRecord> {
        let Some(document) = self.transport.get_json(&self.inventory_path(email))? else {
            return Ok(InventoryRecord::new());
        };

        let mut record = InventoryRecord::new();
        match document {
            Value::Object(entries) => {
                for (key, value) in entries {
                    let item_id = decode_key(&key).ok_or_else(|| {
                        PersistenceError::InvalidData(format!("undecodable inventory key `{key}`"))
                    })?;
                    let owned = owned_flag(&item_id, &value)?;
                    record.set(item_id, owned);
                }
            }
            // Children keyed "0", "1", ... come back as an array; gaps are null.
            Value::Array(entries) => {
                for (index, value) in entries.iter().enumerate() {
                    if value.is_null() {
                        continue;
                    }
                    let item_id = index.to_string();
                    let owned = owned_flag(&item_id, value)?;
                    record.set(item_id, owned);
                }
            }
            _ => {
                return Err(PersistenceError::InvalidData(
                    "inventory document is not an object".to_string(),
                ))
            }
        }

        Ok(record)
    }

    fn set_owned(&self, email: &Email, item_id: &str, owned: bool) -> PersistenceResult<()> {
        let mut fields = Map::new();
        fields.insert(encode_key(item_id), Value::Bool(owned));
        self.transport
            .patch_json(&self.inventory_path(email), &Value::Object(fields))
    }
}

fn owned_flag(item_id: &str, value: &Value) -> PersistenceResult<bool> {
    value.as_bool().ok_or_else(|| {
        PersistenceError::InvalidData(format!("inventory value for `{item_id}` is not a boolean"))
    })
}

impl<T: DocumentTransport> UserDirectory for RemoteInventoryStore<T> {
    fn find_user(&self, email: &Email) -> PersistenceResult<Option<User>> {
        let Some(document) = self.transport.get_json(&self.user_path(email))? else {
            return Ok(None);
        };

        // A document holding only inventory keys has no identity yet.
        if document.get("uid").is_none() {
            return Ok(None);
        }

        let stored: UserDocument = serde_json::from_value(document)
            .map_err(|err| PersistenceError::InvalidData(format!("user document: {err}")))?;
        let stored_email = Email::parse(&stored.email).map_err(|_| {
            PersistenceError::InvalidData("user document has an invalid email".to_string())
        })?;

        Ok(Some(User {
            email: stored_email,
            uid: stored.uid,
            created_at_ms: stored.created_at_ms,
            last_login_ms: stored.last_login_ms,
        }))
    }

    fn insert_user(&self, user: &User) -> PersistenceResult<()> {
        if self.find_user(&user.email)?.is_some() {
            return Ok(());
        }

        let document = UserDocument {
            email: user.email.as_str().to_string(),
            uid: user.uid,
            created_at_ms: user.created_at_ms,
            last_login_ms: user.last_login_ms,
        };
        let fields = serde_json::to_value(&document)
            .map_err(|err| PersistenceError::InvalidData(format!("user document: {err}")))?;

        // Patch so an inventory written before registration survives.
        self.transport.patch_json(&self.user_path(&user.email), &fields)
    }

    fn record_login(&self, email: &Email, at_ms: i64) -> PersistenceResult<()> {
        self.transport
            .patch_json(&self.user_path(email), &json!({ "last_login_ms": at_ms }))
    }
}
