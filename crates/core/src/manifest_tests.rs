use super::*;

#[test]
fn manifest_hash_is_deterministic() {
    let a = Manifest::new("logic.and");
    let b = Manifest::new("logic.and");
    assert_eq!(a.manifest_hash().unwrap(), b.manifest_hash().unwrap());
}

#[test]
fn manifest_hash_distinguishes_config() {
    let a = Manifest::new("logic.and").with_config(serde_json::json!({"negate": false}));
    let b = Manifest::new("logic.and").with_config(serde_json::json!({"negate": true}));
    assert_ne!(a.manifest_hash().unwrap(), b.manifest_hash().unwrap());
}

#[test]
fn manifest_hash_distinguishes_module_type() {
    let a = Manifest::new("logic.and");
    let b = Manifest::new("logic.or");
    assert_ne!(a.manifest_hash().unwrap(), b.manifest_hash().unwrap());
}

#[test]
fn manifest_hash_rejects_floats_in_config() {
    let m = Manifest::new("logic.and").with_config(serde_json::json!({"threshold": 1.5}));
    assert!(m.manifest_hash().is_err());
}

#[test]
fn manifest_ref_carries_module_type_and_hash() {
    let manifest = Manifest::new("logic.not");
    let reference = ManifestRef::try_from(&manifest).unwrap();
    assert_eq!(reference.module_type, "logic.not");
    assert_eq!(reference.manifest_hash, manifest.manifest_hash().unwrap());
}

#[test]
fn manifest_ref_propagates_float_error() {
    let manifest = Manifest::new("logic.not").with_config(serde_json::json!({"x": 0.1}));
    assert!(ManifestRef::try_from(&manifest).is_err());
}
