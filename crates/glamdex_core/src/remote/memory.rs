//! In-process document tree with switchable failure modes.

use super::DocumentTransport;
use crate::repo::error::{PersistenceError, PersistenceResult};
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// JSON document tree held in memory.
///
/// Clones share the same tree and switches.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentTransport {
    root: Arc<Mutex<Value>>,
    offline: Arc<AtomicBool>,
    read_only: Arc<AtomicBool>,
}

impl MemoryDocumentTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// While offline every call fails with `PersistenceError::Unreachable`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// While read-only every write fails with `PersistenceError::Rejected`.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    /// Copy of the whole tree.
    pub fn snapshot(&self) -> Value {
        self.root.lock().map(|root| root.clone()).unwrap_or(Value::Null)
    }

    fn check_reachable(&self) -> PersistenceResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(PersistenceError::Unreachable(
                "memory transport is offline".to_string(),
            ));
        }
        Ok(())
    }

    fn check_writable(&self) -> PersistenceResult<()> {
        self.check_reachable()?;
        if self.read_only.load(Ordering::SeqCst) {
            return Err(PersistenceError::Rejected {
                status: 403,
                message: "memory transport is read-only".to_string(),
            });
        }
        Ok(())
    }

    fn with_root<T>(&self, f: impl FnOnce(&mut Value) -> T) -> PersistenceResult<T> {
        let mut root = self
            .root
            .lock()
            .map_err(|_| PersistenceError::Unreachable("memory transport poisoned".to_string()))?;
        Ok(f(&mut root))
    }
}

impl DocumentTransport for MemoryDocumentTransport {
    fn get_json(&self, path: &str) -> PersistenceResult<Option<Value>> {
        self.check_reachable()?;
        self.with_root(|root| {
            let mut node: &Value = root;
            for segment in segments(path) {
                match node.get(segment) {
                    Some(child) => node = child,
                    None => return None,
                }
            }
            match node {
                Value::Null => None,
                other => Some(other.clone()),
            }
        })
    }

    fn put_json(&self, path: &str, document: &Value) -> PersistenceResult<()> {
        self.check_writable()?;
        self.with_root(|root| {
            *node_mut(root, path) = document.clone();
            prune_nulls(root);
        })
    }

    fn patch_json(&self, path: &str, fields: &Value) -> PersistenceResult<()> {
        self.check_writable()?;
        let Some(fields) = fields.as_object() else {
            return Err(PersistenceError::Rejected {
                status: 400,
                message: "patch body must be an object".to_string(),
            });
        };
        self.with_root(|root| {
            let node = node_mut(root, path);
            if let Value::Array(entries) = node {
                let children = array_children(entries);
                *node = Value::Object(children);
            }
            if !node.is_object() {
                *node = Value::Object(Map::new());
            }
            if let Value::Object(children) = node {
                for (key, value) in fields {
                    children.insert(key.clone(), value.clone());
                }
            }
            prune_nulls(root);
        })
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

fn node_mut<'tree>(root: &'tree mut Value, path: &str) -> &'tree mut Value {
    let mut node = root;
    for segment in segments(path) {
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        node = match node {
            Value::Object(children) => children.entry(segment.to_string()).or_insert(Value::Null),
            _ => unreachable!("node was just replaced with an object"),
        };
    }
    node
}

// Array elements are children keyed by their index.
fn array_children(entries: &[Value]) -> Map<String, Value> {
    entries
        .iter()
        .enumerate()
        .filter(|(_, value)| !value.is_null())
        .map(|(index, value)| (index.to_string(), value.clone()))
        .collect()
}

// Nulls and emptied objects disappear, as they do in the real store.
fn prune_nulls(node: &mut Value) {
    if let Value::Object(children) = node {
        for child in children.values_mut() {
            prune_nulls(child);
        }
        children.retain(|_, child| match child {
            Value::Null => false,
            Value::Object(grandchildren) => !grandchildren.is_empty(),
            _ => true,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryDocumentTransport;
    use crate::remote::DocumentTransport;
    use crate::repo::error::PersistenceError;
    use serde_json::json;

    #[test]
    fn put_then_get_nested_path() {
        let transport = MemoryDocumentTransport::new();
        transport
            .put_json("users/a/inventory", &json!({"e1": true}))
            .unwrap();

        assert_eq!(
            transport.get_json("users/a").unwrap(),
            Some(json!({"inventory": {"e1": true}}))
        );
        assert_eq!(transport.get_json("users/b").unwrap(), None);
    }

    #[test]
    fn patch_merges_and_null_deletes() {
        let transport = MemoryDocumentTransport::new();
        transport
            .patch_json("users/a/inventory", &json!({"e1": true, "l1": false}))
            .unwrap();
        transport
            .patch_json("users/a/inventory", &json!({"e1": null, "l2": true}))
            .unwrap();

        assert_eq!(
            transport.get_json("users/a/inventory").unwrap(),
            Some(json!({"l1": false, "l2": true}))
        );
    }

    #[test]
    fn patch_on_array_keeps_indexed_children() {
        let transport = MemoryDocumentTransport::new();
        transport
            .put_json("users/a/inventory", &json!([true, null, false]))
            .unwrap();
        transport
            .patch_json("users/a/inventory", &json!({"1": true}))
            .unwrap();

        assert_eq!(
            transport.get_json("users/a/inventory").unwrap(),
            Some(json!({"0": true, "1": true, "2": false}))
        );
    }

    #[test]
    fn offline_and_read_only_switches_fail_calls() {
        let transport = MemoryDocumentTransport::new();
        transport.set_read_only(true);
        let rejected = transport.put_json("x", &json!(1)).unwrap_err();
        assert!(matches!(rejected, PersistenceError::Rejected { status: 403, .. }));

        transport.set_offline(true);
        let unreachable = transport.get_json("x").unwrap_err();
        assert!(matches!(unreachable, PersistenceError::Unreachable(_)));
    }
}
