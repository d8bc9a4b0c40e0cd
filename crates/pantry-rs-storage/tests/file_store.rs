use pantry_rs_storage::{FileKeyValueStore, KeyValueStore};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

#[test]
fn values_survive_reopen() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("storage.json");

    let store = FileKeyValueStore::open(&path).expect("open");
    store
        .set("ingredients", r#"["eggs","flour"]"#)
        .expect("set ingredients");
    store.set("recipe-rating-# Pancakes", "4").expect("set rating");
    drop(store);

    let reopened = FileKeyValueStore::open(&path).expect("reopen");
    assert_eq!(
        reopened.get("ingredients").expect("get").as_deref(),
        Some(r#"["eggs","flour"]"#)
    );
    assert_eq!(
        reopened
            .get("recipe-rating-# Pancakes")
            .expect("get")
            .as_deref(),
        Some("4")
    );
    assert!(!dir.path().join("nested").join("storage.json.tmp").exists());
}

#[test]
fn remove_persists_and_missing_key_is_ok() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("storage.json");

    let store = FileKeyValueStore::open(&path).expect("open");
    store.set("a", "1").expect("set");
    store.remove("a").expect("remove");
    store.remove("never-set").expect("remove missing");
    drop(store);

    let reopened = FileKeyValueStore::open(&path).expect("reopen");
    assert_eq!(reopened.get("a").expect("get"), None);
}

#[test]
fn file_holds_a_single_json_object() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("storage.json");
    let store = FileKeyValueStore::open(&path).expect("open");
    store.set("ingredients", "[]").expect("set");

    let contents = std::fs::read_to_string(&path).expect("read");
    let value: serde_json::Value = serde_json::from_str(&contents).expect("json");
    assert_eq!(value, serde_json::json!({ "ingredients": "[]" }));
}

#[test]
fn failed_write_leaves_previous_values() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("storage.json");
    let store = FileKeyValueStore::open(&path).expect("open");
    store.set("ingredients", r#"["eggs"]"#).expect("set");

    // A directory in the temp file's place makes every rewrite fail.
    std::fs::create_dir(dir.path().join("storage.json.tmp")).expect("block temp file");

    assert!(store.set("ingredients", r#"["salt"]"#).is_err());
    assert!(store.set("recipe-rating-# Soup", "2").is_err());
    assert!(store.remove("ingredients").is_err());

    assert_eq!(
        store.get("ingredients").expect("get").as_deref(),
        Some(r#"["eggs"]"#)
    );
    assert_eq!(store.get("recipe-rating-# Soup").expect("get"), None);
}
