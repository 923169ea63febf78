use super::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Doc {
    id: u64,
    name: String,
}

#[test]
fn test_save_and_load_roundtrip() {
    let tmp = tempfile::tempdir().unwrap();
    let store = DocumentStore::new(tmp.path()).unwrap();
    let docs = vec![
        Doc { id: 1, name: "a".into() },
        Doc { id: 2, name: "b".into() },
    ];
    store.save("things", &docs).unwrap();
    let back: Vec<Doc> = store.load("things");
    assert_eq!(back, docs);
}

#[test]
fn test_absent_collection_loads_empty() {
    let tmp = tempfile::tempdir().unwrap();
    let store = DocumentStore::new(tmp.path()).unwrap();
    let back: Vec<Doc> = store.load("nothing_here");
    assert!(back.is_empty());
}

#[test]
fn test_malformed_collection_degrades_to_empty() {
    let tmp = tempfile::tempdir().unwrap();
    let store = DocumentStore::new(tmp.path()).unwrap();
    std::fs::write(tmp.path().join("things.json"), b"{ not json [").unwrap();
    let back: Vec<Doc> = store.load("things");
    assert!(back.is_empty());
    // A well-formed document of the wrong shape also degrades
    std::fs::write(tmp.path().join("things.json"), b"{\"id\": 1}").unwrap();
    let back: Vec<Doc> = store.load("things");
    assert!(back.is_empty());
}

#[test]
fn test_save_replaces_whole_collection() {
    let tmp = tempfile::tempdir().unwrap();
    let store = DocumentStore::new(tmp.path()).unwrap();
    let first = vec![Doc { id: 1, name: "a".into() }, Doc { id: 2, name: "b".into() }];
    store.save("things", &first).unwrap();
    let second = vec![Doc { id: 3, name: "c".into() }];
    store.save("things", &second).unwrap();
    let back: Vec<Doc> = store.load("things");
    assert_eq!(back, second, "save must replace, not append");
    // No temp file left behind after a successful save
    assert!(!tmp.path().join("things.json.tmp").exists());
}

#[test]
fn test_collections_are_independent() {
    let tmp = tempfile::tempdir().unwrap();
    let store = DocumentStore::new(tmp.path()).unwrap();
    store.save("left", &[Doc { id: 1, name: "l".into() }]).unwrap();
    let right: Vec<Doc> = store.load("right");
    assert!(right.is_empty());
    let left: Vec<Doc> = store.load("left");
    assert_eq!(left.len(), 1);
}
