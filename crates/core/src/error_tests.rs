use super::*;

#[test]
fn with_detail_accumulates_entries() {
    let err = KiaraError::data("value not found")
        .with_detail("value_id", "abc123")
        .with_detail("field_name", "input_a");

    assert_eq!(err.kind(), ErrorKind::Data);
    assert_eq!(err.details().get("value_id").map(String::as_str), Some("abc123"));
    assert_eq!(
        err.details().get("field_name").map(String::as_str),
        Some("input_a")
    );
}

#[test]
fn display_includes_kind_and_message() {
    let err = KiaraError::configuration("missing comment in strict mode");
    let rendered = err.to_string();
    assert!(rendered.contains("configuration"));
    assert!(rendered.contains("missing comment in strict mode"));
}

#[test]
fn constructors_set_the_expected_kind() {
    assert_eq!(KiaraError::scheduling("x").kind(), ErrorKind::Scheduling);
    assert_eq!(KiaraError::storage("x").kind(), ErrorKind::Storage);
    assert_eq!(KiaraError::system("x").kind(), ErrorKind::System);
}
