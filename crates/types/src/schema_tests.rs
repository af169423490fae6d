use super::*;

#[test]
fn two_schemas_are_equal_when_type_config_and_optionality_match() {
    let a = ValueSchema::new("integer");
    let b = ValueSchema::new("integer");
    assert_eq!(a, b);
}

#[test]
fn optional_flag_distinguishes_schemas() {
    let a = ValueSchema::new("integer");
    let b = ValueSchema::new("integer").optional();
    assert_ne!(a, b);
}

#[test]
fn config_distinguishes_schemas() {
    let a = ValueSchema::new("string").with_config(serde_json::json!({"max_len": 8}));
    let b = ValueSchema::new("string").with_config(serde_json::json!({"max_len": 16}));
    assert_ne!(a, b);
}

#[test]
fn deny_unknown_fields_rejects_typos() {
    let json = serde_json::json!({"type_nam": "integer"});
    let result: Result<ValueSchema, _> = serde_json::from_value(json);
    assert!(result.is_err());
}
