use glamdex_core::db::open_db_in_memory;
use glamdex_core::remote::encode_key;
use glamdex_core::{
    Email, InventoryStore, MemoryDocumentTransport, PersistenceError, RemoteInventoryStore,
    SqliteInventoryStore,
};
use serde_json::json;

fn email(value: &str) -> Email {
    Email::parse(value).unwrap()
}

fn assert_set_then_get_roundtrip(store: &impl InventoryStore) {
    let user = email("a@x.com");

    assert!(store.get(&user).unwrap().is_empty());

    store.set_owned(&user, "e1", true).unwrap();
    store.set_owned(&user, "l1", false).unwrap();

    let record = store.get(&user).unwrap();
    assert_eq!(record.get("e1"), Some(true));
    assert_eq!(record.get("l1"), Some(false));
    assert_eq!(record.get("n1"), None);
    assert!(!record.is_owned("n1"));
}

fn assert_last_write_wins(store: &impl InventoryStore) {
    let user = email("a@x.com");

    store.set_owned(&user, "e1", true).unwrap();
    store.set_owned(&user, "e1", false).unwrap();
    store.set_owned(&user, "e1", true).unwrap();

    assert_eq!(store.get(&user).unwrap().get("e1"), Some(true));
}

fn assert_single_key_writes(store: &impl InventoryStore) {
    let user = email("a@x.com");
    store.set_owned(&user, "e1", true).unwrap();
    store.set_owned(&user, "l1", true).unwrap();

    store.set_owned(&user, "e1", false).unwrap();

    let all = store.all(&user).unwrap();
    assert_eq!(all.get("e1"), Some(&false));
    assert_eq!(all.get("l1"), Some(&true));
    assert_eq!(all.len(), 2);
}

fn assert_users_are_isolated(store: &impl InventoryStore) {
    let first = email("a@x.com");
    let second = email("b@x.com");

    store.set_owned(&first, "e1", true).unwrap();

    assert!(store.get(&second).unwrap().is_empty());
}

#[test]
fn local_store_roundtrips_flags() {
    let conn = open_db_in_memory().unwrap();
    assert_set_then_get_roundtrip(&SqliteInventoryStore::new(&conn));
}

#[test]
fn local_store_last_write_wins() {
    let conn = open_db_in_memory().unwrap();
    assert_last_write_wins(&SqliteInventoryStore::new(&conn));
}

#[test]
fn local_store_writes_touch_one_key() {
    let conn = open_db_in_memory().unwrap();
    assert_single_key_writes(&SqliteInventoryStore::new(&conn));
}

#[test]
fn local_store_isolates_users() {
    let conn = open_db_in_memory().unwrap();
    assert_users_are_isolated(&SqliteInventoryStore::new(&conn));
}

#[test]
fn local_store_persists_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inventory.db");
    let user = email("a@x.com");

    {
        let conn = glamdex_core::db::open_db(&path).unwrap();
        SqliteInventoryStore::new(&conn)
            .set_owned(&user, "e1", true)
            .unwrap();
    }

    let conn = glamdex_core::db::open_db(&path).unwrap();
    let record = SqliteInventoryStore::new(&conn).get(&user).unwrap();
    assert_eq!(record.get("e1"), Some(true));
}

#[test]
fn remote_store_roundtrips_flags() {
    assert_set_then_get_roundtrip(&RemoteInventoryStore::new(MemoryDocumentTransport::new()));
}

#[test]
fn remote_store_last_write_wins() {
    assert_last_write_wins(&RemoteInventoryStore::new(MemoryDocumentTransport::new()));
}

#[test]
fn remote_store_writes_touch_one_key() {
    assert_single_key_writes(&RemoteInventoryStore::new(MemoryDocumentTransport::new()));
}

#[test]
fn remote_store_isolates_users() {
    assert_users_are_isolated(&RemoteInventoryStore::new(MemoryDocumentTransport::new()));
}

#[test]
fn remote_store_lays_out_documents_under_namespace() {
    let transport = MemoryDocumentTransport::new();
    let store = RemoteInventoryStore::with_namespace(transport.clone(), "/shop/");
    let user = email("a.b@x.com");

    store.set_owned(&user, "palette.v2", true).unwrap();

    assert_eq!(store.namespace(), "shop");
    let snapshot = transport.snapshot();
    let user_key = encode_key("a.b@x.com");
    assert_eq!(
        snapshot["shop"][user_key.as_str()]["inventory"][encode_key("palette.v2").as_str()],
        json!(true)
    );
    assert_eq!(
        store.get(&user).unwrap().get("palette.v2"),
        Some(true)
    );
}

#[test]
fn remote_store_failure_leaves_value_unchanged() {
    let transport = MemoryDocumentTransport::new();
    let store = RemoteInventoryStore::new(transport.clone());
    let user = email("a@x.com");
    store.set_owned(&user, "e1", false).unwrap();

    transport.set_offline(true);
    let err = store.set_owned(&user, "e1", true).unwrap_err();
    assert!(matches!(err, PersistenceError::Unreachable(_)));
    assert_eq!(err.code(), "store_unreachable");
    assert!(store.get(&user).is_err());

    transport.set_offline(false);
    assert_eq!(store.get(&user).unwrap().get("e1"), Some(false));
}

#[test]
fn remote_store_rejected_write_is_reported() {
    let transport = MemoryDocumentTransport::new();
    let store = RemoteInventoryStore::new(transport.clone());
    let user = email("a@x.com");

    transport.set_read_only(true);
    let err = store.set_owned(&user, "e1", true).unwrap_err();

    assert!(matches!(err, PersistenceError::Rejected { status: 403, .. }));
    assert!(store.get(&user).unwrap().is_empty());
}

#[test]
fn remote_store_reports_non_boolean_values_as_invalid_data() {
    use glamdex_core::DocumentTransport;

    let transport = MemoryDocumentTransport::new();
    let store = RemoteInventoryStore::new(transport.clone());
    let user = email("a@x.com");
    let path = format!("users/{}/inventory", encode_key(user.as_str()));
    transport.put_json(&path, &json!({"e1": "yes"})).unwrap();

    let err = store.get(&user).unwrap_err();
    assert!(matches!(err, PersistenceError::InvalidData(_)));
}

#[test]
fn items_outside_catalog_are_stored_and_listed() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteInventoryStore::new(&conn);
    let user = email("u@x.com");
    store.set_owned(&user, "e1", true).unwrap();

    store.set_owned(&user, "lipstick-01", true).unwrap();

    let all = store.all(&user).unwrap();
    assert_eq!(all.get("lipstick-01"), Some(&true));
    assert_eq!(all.get("e1"), Some(&true));
}

#[test]
fn remote_store_reads_index_keyed_inventory_returned_as_array() {
    use glamdex_core::DocumentTransport;

    let transport = MemoryDocumentTransport::new();
    let store = RemoteInventoryStore::new(transport.clone());
    let user = email("digits@x.com");
    let path = format!("users/{}/inventory", encode_key(user.as_str()));
    transport
        .put_json(&path, &json!([true, null, false]))
        .unwrap();

    let record = store.get(&user).unwrap();
    assert_eq!(record.get("0"), Some(true));
    assert_eq!(record.get("1"), None);
    assert_eq!(record.get("2"), Some(false));

    store.set_owned(&user, "1", true).unwrap();
    let record = store.get(&user).unwrap();
    assert_eq!(record.len(), 3);
    assert_eq!(record.get("1"), Some(true));
}
