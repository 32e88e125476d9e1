//! # Prompt Generation Logic Tests
//!
//! This test suite validates the helpers in `nl2sql::prompts::core` that fill in
//! the stage templates and build the refinement feedback section.

use nl2sql::prompts::core::{get_feedback_instruction, render, Feedback};
use nl2sql::prompts::tasks::{SQL_GENERATION_USER_PROMPT, SQL_VALIDATION_USER_PROMPT};

// --- Tests for `render` ---

#[test]
fn test_render_fills_known_placeholders() {
    let rendered = render("Hello {name}, you asked: {prompt}", &[("name", "Ada"), ("prompt", "why?")]);
    assert_eq!(rendered, "Hello Ada, you asked: why?");
}

#[test]
fn test_render_leaves_unknown_placeholders() {
    assert_eq!(render("{known} {unknown}", &[("known", "x")]), "x {unknown}");
}

/// Values containing placeholder text must be inserted verbatim, not expanded.
#[test]
fn test_render_does_not_expand_inserted_values() {
    let rendered = render("{a} / {b}", &[("a", "{b}"), ("b", "B")]);
    assert_eq!(rendered, "{b} / B");
}

#[test]
fn test_validation_template_keeps_its_json_example() {
    let rendered = render(
        SQL_VALIDATION_USER_PROMPT,
        &[("schema_analysis", "S"), ("prompt", "P"), ("sql", "SELECT 1")],
    );
    assert!(rendered.contains("\"is_valid\": true/false"));
    assert!(rendered.contains("SELECT 1"));
    assert!(!rendered.contains("{sql}"));
}

// --- Tests for `get_feedback_instruction` ---

#[test]
fn test_no_feedback_renders_nothing() {
    assert_eq!(get_feedback_instruction(None), "");
    let rendered = render(
        SQL_GENERATION_USER_PROMPT,
        &[("schema_analysis", "S"), ("prompt", "P"), ("feedback", "")],
    );
    assert!(!rendered.contains("{feedback}"));
}

#[test]
fn test_feedback_includes_previous_sql_and_explanation() {
    let feedback = Feedback::new("SELECT * FROM users;", "Missing totals.");
    let instruction = get_feedback_instruction(Some(&feedback));
    assert!(instruction.contains("SELECT * FROM users;"));
    assert!(instruction.contains("Missing totals."));
}

#[test]
fn test_blank_explanation_gets_generic_feedback() {
    let feedback = Feedback::new("SELECT 1;", "   ");
    let instruction = get_feedback_instruction(Some(&feedback));
    assert!(instruction.contains("did not match the user's intent"));
}
