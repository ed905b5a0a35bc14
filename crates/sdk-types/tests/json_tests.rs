use crate::ai_sdk_types::json::{first_json_object, is_parsable_json, parse_embedded_json_object};

#[test]
fn parsable_json_requires_a_complete_document() {
    assert!(is_parsable_json(r#"{"a":1}"#));
    assert!(is_parsable_json("42"));
    assert!(!is_parsable_json(r#"{"a":"#));
    assert!(!is_parsable_json(""));
    assert!(!is_parsable_json("   "));
}

#[test]
fn carve_out_finds_leftmost_object_with_one_nesting_level() {
    let text = r#"Sure! {"toolName":"lookup","toolData":{"q":1}} done"#;
    assert_eq!(
        first_json_object(text),
        Some(r#"{"toolName":"lookup","toolData":{"q":1}}"#)
    );
}

#[test]
fn carve_out_stops_at_brace_inside_string_literal() {
    let text = r#"{"a":"}"} tail"#;
    assert_eq!(first_json_object(text), Some(r#"{"a":"}"#));
    assert!(parse_embedded_json_object(text).is_none());
}

#[test]
fn carve_out_does_not_descend_two_levels() {
    let text = r#"{"a":{"b":{"c":1}}}"#;
    let found = first_json_object(text).unwrap();
    assert_eq!(found, r#"{"b":{"c":1}}"#);
}

#[test]
fn embedded_object_is_none_without_braces() {
    assert!(parse_embedded_json_object("plain answer").is_none());
}

#[test]
fn embedded_object_parses_first_candidate_only() {
    let v = parse_embedded_json_object(r#"x {"a":1} y {"b":2}"#).unwrap();
    assert_eq!(v["a"], 1);
    assert!(v.get("b").is_none());
}
