//! # Structured Response Parser Tests
//!
//! Verifies that documents are extracted from surrounding prose exactly as if
//! they had been decoded alone, and that absent or malformed documents are
//! reported as parse failures rather than errors.

use nl2sql::parser::{decode_or, extract_structured_block, parse_structured, ParseFailure};
use nl2sql::ValidationVerdict;
use serde_json::{json, Value};

const DOCUMENT: &str = r#"{"is_valid": true, "issues": [], "explanation": "Looks good."}"#;

#[test]
fn test_document_surrounded_by_prose_decodes_like_the_bare_document() {
    let reply = format!("Sure! Here is my assessment:\n```json\n{DOCUMENT}\n```\nLet me know.");

    let from_reply: Value = parse_structured(&reply).unwrap();
    let bare: Value = serde_json::from_str(DOCUMENT).unwrap();

    assert_eq!(from_reply, bare);
}

#[test]
fn test_decodes_into_typed_record() {
    let verdict: ValidationVerdict = parse_structured(DOCUMENT).unwrap();
    assert!(verdict.is_valid);
    assert!(verdict.issues.is_empty());
    assert_eq!(verdict.explanation, "Looks good.");
}

#[test]
fn test_span_runs_from_first_open_to_last_close_brace() {
    let reply = r#"first {"a": 1} then {"b": 2} done"#;
    assert_eq!(
        extract_structured_block(reply),
        Some(r#"{"a": 1} then {"b": 2}"#)
    );

    // The greedy span is not a single document, so decoding fails.
    let result: Result<Value, ParseFailure> = parse_structured(reply);
    assert!(matches!(result, Err(ParseFailure::Malformed(_))));
}

#[test]
fn test_nested_braces_are_kept_whole() {
    let reply = r#"Result: {"outer": {"inner": [1, 2]}} -- end"#;
    let value: Value = parse_structured(reply).unwrap();
    assert_eq!(value, json!({"outer": {"inner": [1, 2]}}));
}

#[test]
fn test_document_spanning_lines_is_found() {
    let reply = "Here:\n{\n  \"k\": \"v\"\n}\n";
    let value: Value = parse_structured(reply).unwrap();
    assert_eq!(value, json!({"k": "v"}));
}

#[test]
fn test_no_braces_is_a_parse_failure() {
    let result: Result<Value, ParseFailure> = parse_structured("I cannot answer that.");
    assert!(matches!(result, Err(ParseFailure::NoStructuredDocument)));
}

#[test]
fn test_closing_brace_before_opening_brace_is_a_parse_failure() {
    let result: Result<Value, ParseFailure> = parse_structured("} nothing here {");
    assert!(matches!(result, Err(ParseFailure::NoStructuredDocument)));
}

#[test]
fn test_malformed_content_is_a_parse_failure() {
    let result: Result<Value, ParseFailure> = parse_structured("{is_valid: yes}");
    assert!(matches!(result, Err(ParseFailure::Malformed(_))));
}

#[test]
fn test_missing_required_field_is_a_parse_failure() {
    let result: Result<ValidationVerdict, ParseFailure> =
        parse_structured(r#"{"issues": ["x"]}"#);
    assert!(matches!(result, Err(ParseFailure::Malformed(_))));
}

#[test]
fn test_decode_or_tags_the_fallback() {
    let decoded = decode_or("garbage", || json!({"fallback": true}));
    assert!(decoded.is_fallback());
    assert_eq!(decoded.into_record(), json!({"fallback": true}));

    let decoded = decode_or(r#"{"fallback": false}"#, || json!({"fallback": true}));
    assert!(!decoded.is_fallback());
    assert_eq!(decoded.record(), &json!({"fallback": false}));
}
