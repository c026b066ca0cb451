use glamdex_core::command::{ExecutionError, Executor, Outcome, ParseError};
use glamdex_core::db::open_db_in_memory;
use glamdex_core::outfit::OutfitLibrary;
use glamdex_core::{
    AssetResolver, Catalog, Email, InventoryService, InventoryStore, MemoryDocumentTransport,
    RemoteInventoryStore, SqliteInventoryStore, SqliteUserDirectory,
};

const CATALOG: &str = r#"{
    "Eyes": [
        {"id": "e1", "name": "Mascara", "image": "eyes/e1.png"}
    ],
    "Lips": [
        {"id": "l1", "name": "Ruby Matte", "image": "l1.png"}
    ]
}"#;

const OUTFITS: &str = r#"[
    {"name": "Night Out", "theme": "Glam", "items": ["e1", "l1"], "colors": ["red"],
     "steps": ["Prime", "Apply"]}
]"#;

fn message(outcome: Result<Outcome, ExecutionError>) -> String {
    match outcome.unwrap() {
        Outcome::Message(text) => text,
        Outcome::Exit => panic!("unexpected exit"),
    }
}

#[test]
fn register_login_add_and_remove_items() {
    let catalog = Catalog::from_json_str(CATALOG).unwrap();
    let outfits = OutfitLibrary::default();
    let assets = AssetResolver::new("assets");
    let conn = open_db_in_memory().unwrap();
    let store = SqliteInventoryStore::new(&conn);
    let mut executor = Executor::new(
        &catalog,
        &outfits,
        &assets,
        store,
        SqliteUserDirectory::new(&conn),
    );

    assert_eq!(
        message(executor.run_line(r#"register "a@x.com""#)),
        "Registered a@x.com"
    );
    assert_eq!(
        message(executor.run_line(r#"REGISTER "a@x.com""#)),
        "Account a@x.com already exists"
    );
    assert_eq!(
        message(executor.run_line(r#"login "a@x.com""#)),
        "Logged in as a@x.com"
    );

    assert_eq!(
        message(executor.run_line(r#"add item "ruby matte""#)),
        "Added item: Ruby Matte"
    );
    assert_eq!(
        message(executor.run_line(r#"add item "l1""#)),
        "Item 'Ruby Matte' is already in inventory"
    );
    assert_eq!(
        message(executor.run_line(r#"add item "Glitter""#)),
        "Added item: glitter (not in catalog)"
    );

    let email = executor.session().unwrap().user().email.clone();
    let stored = store.get(&email).unwrap();
    assert_eq!(stored.get("l1"), Some(true));
    assert_eq!(stored.get("glitter"), Some(true));

    assert_eq!(
        message(executor.run_line(r#"remove item "l1""#)),
        "Removed item: Ruby Matte"
    );
    assert_eq!(
        message(executor.run_line(r#"remove item "l1""#)),
        "Item 'Ruby Matte' is not in inventory"
    );
    assert_eq!(
        message(executor.run_line("clear inventory")),
        "Inventory cleared (1 item(s))"
    );
    assert_eq!(store.get(&email).unwrap().owned_ids().count(), 0);
}

#[test]
fn inventory_commands_require_sign_in() {
    let catalog = Catalog::from_json_str(CATALOG).unwrap();
    let outfits = OutfitLibrary::default();
    let assets = AssetResolver::new("assets");
    let conn = open_db_in_memory().unwrap();
    let mut executor = Executor::new(
        &catalog,
        &outfits,
        &assets,
        SqliteInventoryStore::new(&conn),
        SqliteUserDirectory::new(&conn),
    );

    assert!(matches!(
        executor.run_line(r#"add item "e1""#),
        Err(ExecutionError::NotSignedIn)
    ));
    assert!(matches!(
        executor.run_line(r#"login "nobody@x.com""#),
        Err(ExecutionError::UnknownAccount(_))
    ));
    assert_eq!(message(executor.run_line("whoami")), "Not logged in");
    assert!(matches!(
        executor.run_line("add item"),
        Err(ExecutionError::Parse(_))
    ));
    assert_eq!(executor.run_line("exit").unwrap(), Outcome::Exit);
}

#[test]
fn listing_commands_mark_owned_items() {
    let catalog = Catalog::from_json_str(CATALOG).unwrap();
    let outfits = OutfitLibrary::default();
    let assets = AssetResolver::new("assets");
    let conn = open_db_in_memory().unwrap();
    let mut executor = Executor::new(
        &catalog,
        &outfits,
        &assets,
        SqliteInventoryStore::new(&conn),
        SqliteUserDirectory::new(&conn),
    );

    assert_eq!(
        message(executor.run_line("themes")),
        "Eyes (1 item(s))\nLips (1 item(s))"
    );
    executor.sign_in("a@x.com").unwrap();
    executor.run_line(r#"add item "e1""#).unwrap();

    assert_eq!(
        message(executor.run_line(r#"items "Eyes""#)),
        "[x] Mascara (e1) eyes/e1.png"
    );
    assert_eq!(
        message(executor.run_line(r#"items "Hair""#)),
        "No items in theme 'Hair'"
    );
}

#[test]
fn assemble_cosmetic_reports_exact_match() {
    let catalog = Catalog::from_json_str(CATALOG).unwrap();
    let outfits = OutfitLibrary::from_json_str(OUTFITS).unwrap();
    let assets = AssetResolver::new("assets");
    let conn = open_db_in_memory().unwrap();
    let mut executor = Executor::new(
        &catalog,
        &outfits,
        &assets,
        SqliteInventoryStore::new(&conn),
        SqliteUserDirectory::new(&conn),
    );
    executor.sign_in("a@x.com").unwrap();

    executor
        .run_line(r#"add item list "e1" "Ruby Matte""#)
        .unwrap();
    assert_eq!(
        message(executor.run_line(r#"apply theme "Glam""#)),
        "Theme applied: Glam"
    );
    assert_eq!(
        message(executor.run_line(r#"color palette "Red" "gold""#)),
        "Color palette set: red, gold"
    );

    let report = message(executor.run_line("assemble cosmetic"));
    assert!(report.starts_with("Assembled! Found 1 exact match(es)."));
    assert!(report.contains("Night Out | theme: Glam | colors: red"));
    assert!(report.contains("\n- Prime"));
}

#[test]
fn failed_remote_write_keeps_displayed_inventory() {
    let catalog = Catalog::from_json_str(CATALOG).unwrap();
    let outfits = OutfitLibrary::default();
    let assets = AssetResolver::new("assets");
    let transport = MemoryDocumentTransport::new();
    let store = RemoteInventoryStore::new(transport.clone());
    let mut executor = Executor::new(&catalog, &outfits, &assets, store.clone(), store);
    executor.sign_in("a@x.com").unwrap();

    transport.set_offline(true);
    let err = executor.run_line(r#"add item "e1""#).unwrap_err();

    assert!(matches!(err, ExecutionError::Persistence(_)));
    assert!(!executor.session().unwrap().is_owned("e1"));
}

#[test]
fn blank_item_arguments_are_rejected_without_writing() {
    let catalog = Catalog::from_json_str(CATALOG).unwrap();
    let outfits = OutfitLibrary::default();
    let assets = AssetResolver::new("assets");
    let conn = open_db_in_memory().unwrap();
    let store = SqliteInventoryStore::new(&conn);
    let mut executor = Executor::new(
        &catalog,
        &outfits,
        &assets,
        store,
        SqliteUserDirectory::new(&conn),
    );
    executor.sign_in("a@x.com").unwrap();

    for line in [r#"add item "  ""#, r#"add item list "e1" """#, r#"remove item "	""#] {
        let err = executor.run_line(line).unwrap_err();
        assert!(
            matches!(
                err,
                ExecutionError::Parse(ParseError::BlankArgument { .. })
            ),
            "line {line}"
        );
    }

    let email = executor.session().unwrap().user().email.clone();
    assert!(store.all(&email).unwrap().is_empty());
}

#[test]
fn shell_and_one_shot_writes_share_item_keys() {
    let catalog = Catalog::from_json_str(CATALOG).unwrap();
    let outfits = OutfitLibrary::default();
    let assets = AssetResolver::new("assets");
    let conn = open_db_in_memory().unwrap();
    let store = SqliteInventoryStore::new(&conn);
    let email = Email::parse("a@x.com").unwrap();

    let item = catalog.item_key(" Glitter Pot ").unwrap();
    InventoryService::new(store)
        .set_owned(&email, &item.id, true)
        .unwrap();

    let mut executor = Executor::new(
        &catalog,
        &outfits,
        &assets,
        store,
        SqliteUserDirectory::new(&conn),
    );
    executor.sign_in("a@x.com").unwrap();

    assert_eq!(
        message(executor.run_line(r#"remove item "Glitter Pot""#)),
        "Removed item: glitter pot"
    );
    assert_eq!(store.all(&email).unwrap().get("glitter pot"), Some(&false));
}

#[test]
fn guest_inventory_works_without_sign_in_and_is_not_saved() {
    let catalog = Catalog::from_json_str(CATALOG).unwrap();
    let outfits = OutfitLibrary::from_json_str(OUTFITS).unwrap();
    let assets = AssetResolver::new("assets");
    let conn = open_db_in_memory().unwrap();
    let store = SqliteInventoryStore::new(&conn);
    let mut executor = Executor::new(
        &catalog,
        &outfits,
        &assets,
        store,
        SqliteUserDirectory::new(&conn),
    )
    .with_guest_inventory();

    assert_eq!(
        message(executor.run_line("whoami")),
        "Not logged in (guest inventory, not saved)"
    );
    assert_eq!(
        message(executor.run_line(r#"add item list "e1" "l1""#)),
        "Added 2 item(s)"
    );
    assert_eq!(
        message(executor.run_line(r#"items "Eyes""#)),
        "[x] Mascara (e1) eyes/e1.png"
    );
    executor.run_line(r#"apply theme "glam""#).unwrap();
    assert!(message(executor.run_line("assemble cosmetic")).starts_with("Assembled!"));
    assert_eq!(
        message(executor.run_line("clear inventory")),
        "Inventory cleared (2 item(s))"
    );

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM inventory;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}
