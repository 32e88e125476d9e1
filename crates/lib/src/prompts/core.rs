//! # Prompt Rendering Helpers

use crate::prompts::tasks::REFINEMENT_FEEDBACK_TEMPLATE;
use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Corrective context for regenerating a query after a failed round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub previous_sql: String,
    pub explanation: String,
}

impl Feedback {
    pub fn new(previous_sql: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self {
            previous_sql: previous_sql.into(),
            explanation: explanation.into(),
        }
    }
}

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{([a-z_]+)\}").expect("static regex is valid"))
}

/// Replaces every `{key}` placeholder in `template` with its value.
///
/// Substitution is a single pass, so values that themselves contain `{key}` text
/// are inserted verbatim. Unknown placeholders are left untouched.
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    placeholder_regex()
        .replace_all(template, |caps: &Captures| {
            let key = &caps[1];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Builds the feedback section of the generation prompt.
///
/// Returns an empty string for a first attempt. A blank explanation still yields
/// feedback, since the previous query is useful context on its own.
pub fn get_feedback_instruction(feedback: Option<&Feedback>) -> String {
    match feedback {
        Some(fb) => {
            let explanation = if fb.explanation.trim().is_empty() {
                "The predicted results did not match the user's intent."
            } else {
                fb.explanation.trim()
            };
            render(
                REFINEMENT_FEEDBACK_TEMPLATE,
                &[
                    ("previous_sql", fb.previous_sql.trim()),
                    ("explanation", explanation),
                ],
            )
        }
        None => String::new(),
    }
}
