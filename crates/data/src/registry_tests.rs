use super::*;
use kiara_bus::EventBus;
use kiara_core::KiaraContextId;
use kiara_storage::InMemoryArchive;
use kiara_types::builtin::register_builtins;
use std::collections::HashSet as StdHashSet;

fn registry() -> DataRegistry {
    let types = Arc::new(TypeRegistry::new());
    register_builtins(&types).unwrap();
    let archive = Arc::new(InMemoryArchive::new("values", StdHashSet::from(["value".to_string()])));
    let bus = Arc::new(EventBus::new(KiaraContextId::new("ctx-1")));
    let events = bus.register_producer("data-registry");
    DataRegistry::new(types, archive, events)
}

#[test]
fn registering_the_same_payload_twice_returns_the_same_value_id() {
    let registry = registry();
    let a = registry
        .register_data(serde_json::json!(42), ValueSchema::new("integer"), Pedigree::Orphan)
        .unwrap();
    let b = registry
        .register_data(serde_json::json!(42), ValueSchema::new("integer"), Pedigree::Orphan)
        .unwrap();
    assert_eq!(a.value_id, b.value_id);
}

#[test]
fn registering_different_payloads_yields_different_value_ids() {
    let registry = registry();
    let a = registry
        .register_data(serde_json::json!(1), ValueSchema::new("integer"), Pedigree::Orphan)
        .unwrap();
    let b = registry
        .register_data(serde_json::json!(2), ValueSchema::new("integer"), Pedigree::Orphan)
        .unwrap();
    assert_ne!(a.value_id, b.value_id);
}

#[test]
fn registering_a_payload_that_violates_schema_fails() {
    let registry = registry();
    let err = registry
        .register_data(serde_json::json!("not a bool"), ValueSchema::new("boolean"), Pedigree::Orphan)
        .unwrap_err();
    assert!(matches!(err, DataError::SchemaViolation { .. }));
}

#[test]
fn get_resolves_by_raw_value_id() {
    let registry = registry();
    let value = registry
        .register_data(serde_json::json!(true), ValueSchema::new("boolean"), Pedigree::Orphan)
        .unwrap();
    let fetched = registry.get(value.value_id.as_str()).unwrap();
    assert_eq!(fetched.value_id, value.value_id);
}

#[test]
fn get_unknown_id_or_alias_fails() {
    let registry = registry();
    assert!(registry.get("does-not-exist").is_err());
}

#[test]
fn orphan_values_cannot_be_stored_unless_marked_storable() {
    let registry = registry();
    let value = registry
        .register_data(serde_json::json!(7), ValueSchema::new("integer"), Pedigree::Orphan)
        .unwrap();

    let err = registry.store(&value.value_id, StdHashSet::new()).unwrap_err();
    assert!(matches!(err, DataError::OrphanNotStorable(_)));

    registry.mark_storable(&value.value_id);
    let persisted = registry.store(&value.value_id, StdHashSet::new()).unwrap();
    assert_eq!(persisted.value_id, value.value_id);
}

#[test]
fn storing_a_value_also_stores_its_pedigree_inputs() {
    let registry = registry();
    let input = registry
        .register_data(serde_json::json!(1), ValueSchema::new("integer"), Pedigree::Orphan)
        .unwrap();
    registry.mark_storable(&input.value_id);

    let mut inputs = std::collections::BTreeMap::new();
    inputs.insert("a".to_string(), input.value_id.clone());
    let manifest = kiara_core::Manifest::new("logic.identity");
    let output = registry
        .register_data(
            serde_json::json!(2),
            ValueSchema::new("integer"),
            Pedigree::Job {
                manifest: kiara_core::ManifestRef::try_from(&manifest).unwrap(),
                inputs,
                output_field: "y".to_string(),
            },
        )
        .unwrap();

    // Non-orphan values store without needing to be marked storable.
    let persisted = registry.store(&output.value_id, StdHashSet::new()).unwrap();
    assert_eq!(persisted.value_id, output.value_id);
}

#[test]
fn set_alias_then_find_aliases_roundtrips() {
    let registry = registry();
    let value = registry
        .register_data(serde_json::json!(1), ValueSchema::new("integer"), Pedigree::Orphan)
        .unwrap();
    registry.set_alias("dataset.main", value.value_id.clone()).unwrap();

    let aliases = registry.find_aliases(&value.value_id);
    assert!(aliases.contains("dataset.main"));

    let resolved = registry.get("dataset.main").unwrap();
    assert_eq!(resolved.value_id, value.value_id);
}

#[test]
fn set_alias_on_unknown_value_fails() {
    let registry = registry();
    let err = registry
        .set_alias("x", ValueId::new("nonexistent"))
        .unwrap_err();
    assert!(matches!(err, DataError::ValueNotFound(_)));
}

#[test]
fn resolve_pedigree_walks_ancestor_inputs() {
    let registry = registry();
    let a = registry
        .register_data(serde_json::json!(1), ValueSchema::new("integer"), Pedigree::Orphan)
        .unwrap();
    let b = registry
        .register_data(serde_json::json!(2), ValueSchema::new("integer"), Pedigree::Orphan)
        .unwrap();

    let mut inputs = std::collections::BTreeMap::new();
    inputs.insert("a".to_string(), a.value_id.clone());
    inputs.insert("b".to_string(), b.value_id.clone());
    let manifest = kiara_core::Manifest::new("logic.and");
    let output = registry
        .register_data(
            serde_json::json!(true),
            ValueSchema::new("boolean"),
            Pedigree::Job {
                manifest: kiara_core::ManifestRef::try_from(&manifest).unwrap(),
                inputs,
                output_field: "y".to_string(),
            },
        )
        .unwrap();

    let dag = registry.resolve_pedigree(&output.value_id).unwrap();
    let ids: StdHashSet<_> = dag.nodes.iter().map(|n| n.value_id.clone()).collect();
    assert!(ids.contains(&output.value_id));
    assert!(ids.contains(&a.value_id));
    assert!(ids.contains(&b.value_id));
    assert_eq!(dag.edges.len(), 2);
}

#[test]
fn alias_resolve_returns_historical_version() {
    let registry = registry();
    let v1 = registry
        .register_data(serde_json::json!(1), ValueSchema::new("integer"), Pedigree::Orphan)
        .unwrap();
    let v2 = registry
        .register_data(serde_json::json!(2), ValueSchema::new("integer"), Pedigree::Orphan)
        .unwrap();

    registry.set_alias("x", v1.value_id.clone()).unwrap();
    registry.set_alias("x", v2.value_id.clone()).unwrap();

    assert_eq!(registry.get("x").unwrap().value_id, v2.value_id);
    assert_eq!(registry.get("x@1").unwrap().value_id, v1.value_id);
}
