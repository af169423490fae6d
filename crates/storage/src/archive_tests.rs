use super::*;
use crate::InMemoryArchive;
use std::collections::HashSet;

fn values_archive() -> InMemoryArchive {
    InMemoryArchive::new("values", HashSet::from(["value".to_string()]))
}

#[test]
fn put_then_get_roundtrips() {
    let archive = values_archive();
    archive.put("v-1", serde_json::json!({"data_hash": "f00"})).unwrap();
    let loaded = archive.get("v-1").unwrap();
    assert_eq!(loaded, Some(serde_json::json!({"data_hash": "f00"})));
}

#[test]
fn get_missing_key_returns_none() {
    let archive = values_archive();
    assert_eq!(archive.get("missing").unwrap(), None);
}

#[test]
fn read_only_archive_rejects_writes() {
    let archive = values_archive().read_only();
    let err = archive.put("v-1", serde_json::json!(1)).unwrap_err();
    assert!(matches!(err, StorageError::ArchiveReadOnly { .. }));
}

#[test]
fn supported_item_types_are_reported() {
    let archive = values_archive();
    assert!(archive.supported_item_types().contains("value"));
}
