use super::*;
use kiara_core::{Manifest, ValueId};

fn manifest_ref() -> ManifestRef {
    ManifestRef::try_from(&Manifest::new("test.module")).unwrap()
}

#[test]
fn value_id_hash_is_deterministic() {
    let config = JobConfig {
        manifest_ref: manifest_ref(),
        inputs: BTreeMap::from([("a".to_string(), ValueId::new("v1"))]),
    };
    assert_eq!(config.value_id_hash(), config.value_id_hash());
}

#[test]
fn value_id_hash_changes_with_input_value_id() {
    let base = JobConfig {
        manifest_ref: manifest_ref(),
        inputs: BTreeMap::from([("a".to_string(), ValueId::new("v1"))]),
    };
    let changed = JobConfig {
        manifest_ref: manifest_ref(),
        inputs: BTreeMap::from([("a".to_string(), ValueId::new("v2"))]),
    };
    assert_ne!(base.value_id_hash(), changed.value_id_hash());
}

#[test]
fn value_id_hash_is_independent_of_input_insertion_order() {
    let first = JobConfig {
        manifest_ref: manifest_ref(),
        inputs: BTreeMap::from([
            ("a".to_string(), ValueId::new("v1")),
            ("b".to_string(), ValueId::new("v2")),
        ]),
    };
    let second = JobConfig {
        manifest_ref: manifest_ref(),
        inputs: BTreeMap::from([
            ("b".to_string(), ValueId::new("v2")),
            ("a".to_string(), ValueId::new("v1")),
        ]),
    };
    assert_eq!(first.value_id_hash(), second.value_id_hash());
}

#[test]
fn data_hash_hash_matches_across_distinct_value_ids_with_same_data_hash() {
    let shared_data_hash = BTreeMap::from([("a".to_string(), kiara_core::cid(&Structural::Str("x".to_string())))]);
    let first = JobConfig {
        manifest_ref: manifest_ref(),
        inputs: BTreeMap::from([("a".to_string(), ValueId::new("v1"))]),
    };
    let second = JobConfig {
        manifest_ref: manifest_ref(),
        inputs: BTreeMap::from([("a".to_string(), ValueId::new("v2"))]),
    };
    assert_eq!(
        first.data_hash_hash(&shared_data_hash),
        second.data_hash_hash(&shared_data_hash)
    );
    assert_ne!(first.value_id_hash(), second.value_id_hash());
}
