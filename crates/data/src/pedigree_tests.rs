use super::*;
use kiara_core::{Cid, Manifest};

#[test]
fn orphan_has_no_input_value_ids() {
    assert!(Pedigree::Orphan.input_value_ids().is_empty());
    assert!(Pedigree::Orphan.is_orphan());
}

#[test]
fn job_pedigree_reports_its_input_value_ids() {
    let manifest = Manifest::new("logic.and");
    let manifest_ref = ManifestRef {
        module_type: manifest.module_type.clone(),
        manifest_hash: manifest.manifest_hash().unwrap(),
    };
    let mut inputs = BTreeMap::new();
    inputs.insert("a".to_string(), ValueId::new("v-1"));
    inputs.insert("b".to_string(), ValueId::new("v-2"));

    let pedigree = Pedigree::Job {
        manifest: manifest_ref,
        inputs,
        output_field: "y".to_string(),
    };

    assert!(!pedigree.is_orphan());
    let mut ids: Vec<String> = pedigree
        .input_value_ids()
        .into_iter()
        .map(|id| id.as_str().to_string())
        .collect();
    ids.sort();
    assert_eq!(ids, vec!["v-1".to_string(), "v-2".to_string()]);
}

#[test]
fn pedigree_serde_roundtrips() {
    let pedigree = Pedigree::Job {
        manifest: ManifestRef {
            module_type: "logic.not".to_string(),
            manifest_hash: Cid::from_raw("fdeadbeef"),
        },
        inputs: BTreeMap::new(),
        output_field: "y".to_string(),
    };
    let json = serde_json::to_string(&pedigree).unwrap();
    let parsed: Pedigree = serde_json::from_str(&json).unwrap();
    assert_eq!(pedigree, parsed);
}
