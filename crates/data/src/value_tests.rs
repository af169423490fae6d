use super::*;
use kiara_core::cid;
use kiara_core::hash::Structural;

fn schema() -> ValueSchema {
    ValueSchema::new("integer")
}

#[test]
fn equivalent_values_share_schema_and_data_hash() {
    let hash = cid(&Structural::Int(42));
    let a = Value {
        value_id: ValueId::new("v-1"),
        schema: schema(),
        status: ValueStatus::Set,
        data_hash: Some(hash.clone()),
        size: 8,
        pedigree: Pedigree::Orphan,
        data: Some(serde_json::json!(42)),
    };
    let b = Value {
        value_id: ValueId::new("v-2"),
        ..a.clone()
    };
    assert!(a.is_equivalent_to(&b));
}

#[test]
fn different_data_hash_is_not_equivalent() {
    let a = Value {
        value_id: ValueId::new("v-1"),
        schema: schema(),
        status: ValueStatus::Set,
        data_hash: Some(cid(&Structural::Int(1))),
        size: 8,
        pedigree: Pedigree::Orphan,
        data: Some(serde_json::json!(1)),
    };
    let b = Value {
        value_id: ValueId::new("v-2"),
        data_hash: Some(cid(&Structural::Int(2))),
        data: Some(serde_json::json!(2)),
        ..a.clone()
    };
    assert!(!a.is_equivalent_to(&b));
}

#[test]
fn has_data_is_true_for_set_and_default_only() {
    assert!(ValueStatus::Set.has_data());
    assert!(ValueStatus::Default.has_data());
    assert!(!ValueStatus::Unset.has_data());
    assert!(!ValueStatus::NotSet.has_data());
    assert!(!ValueStatus::None.has_data());
}

#[test]
fn value_status_serializes_snake_case() {
    let json = serde_json::to_string(&ValueStatus::NotSet).unwrap();
    assert_eq!(json, "\"not_set\"");
}
