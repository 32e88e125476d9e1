//! # Terminal Rendering
//!
//! Plain-text rendering of pipeline results for the terminal. Every function
//! returns a `String` so the output can be printed or inspected in tests.

use nl2sql::{GenerationReport, QueryHistoryEntry, RefinementOutcome, ResultPrediction};
use serde_json::Value;
use std::fmt::Write;

const MAX_CELL_WIDTH: usize = 40;

fn cell_text(value: &Value) -> String {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Null => "NULL".to_string(),
        other => other.to_string(),
    };
    if text.chars().count() > MAX_CELL_WIDTH {
        let truncated: String = text.chars().take(MAX_CELL_WIDTH - 1).collect();
        format!("{truncated}…")
    } else {
        text
    }
}

/// Renders the predicted rows as an aligned table.
pub fn render_table(results: &ResultPrediction) -> String {
    if results.columns.is_empty() {
        return "(no columns predicted)\n".to_string();
    }

    let rows: Vec<Vec<String>> = results
        .data
        .iter()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    let mut widths: Vec<usize> = results.columns.iter().map(|c| c.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let line = |cells: &[String]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{cell:<w$}", w = *w))
            .collect();
        format!("| {} |\n", padded.join(" | "))
    };
    let separator = format!(
        "|-{}-|\n",
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-|-")
    );

    let mut out = line(&results.columns);
    out.push_str(&separator);
    for row in &rows {
        out.push_str(&line(row));
    }
    out
}

/// Renders the full-pipeline outcome: final SQL, predicted results, and rounds.
pub fn render_outcome(outcome: &RefinementOutcome) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Generated SQL:\n{}\n", outcome.sql);

    if outcome.converged {
        let _ = writeln!(
            out,
            "✅ Predicted results match your request (iteration {}).",
            outcome.iterations
        );
    } else {
        let _ = writeln!(
            out,
            "⚠️  Predicted results still do not match your request after {} iterations.",
            outcome.iterations
        );
    }
    let _ = writeln!(out, "{}\n", outcome.results.explanation);

    let _ = writeln!(out, "Predicted results ({} rows):", outcome.results.row_count);
    out.push_str(&render_table(&outcome.results));

    if outcome.history.len() > 1 {
        let _ = writeln!(out, "\nRefinement history:");
        for record in &outcome.history {
            let verdict = if record.results.matches_user_intent {
                "match"
            } else {
                "no match"
            };
            let _ = writeln!(out, "  [{}] ({verdict}) {}", record.iteration, record.sql);
        }
    }
    out
}

/// Renders the non-refining pipeline's report.
pub fn render_report(report: &GenerationReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Generated SQL:\n{}\n", report.generated_sql);

    let verdict = &report.verdict;
    if verdict.is_valid {
        let _ = writeln!(out, "✅ SQL query is valid!");
    } else {
        let _ = writeln!(out, "❌ SQL query has issues:");
        for issue in &verdict.issues {
            let _ = writeln!(out, "- {issue}");
        }
        let _ = writeln!(out, "\nSuggested Fix:\n{}", report.final_sql);
    }
    if !verdict.explanation.is_empty() {
        let _ = writeln!(out, "{}", verdict.explanation);
    }
    out
}

/// Renders the session history, newest first.
pub fn render_history<'a>(entries: impl Iterator<Item = &'a QueryHistoryEntry>) -> String {
    let mut out = String::new();
    for entry in entries {
        let summary: String = entry.user_query.chars().take(50).collect();
        let _ = writeln!(out, "{} - {summary}", entry.formatted_timestamp());
        let _ = writeln!(out, "  {}", entry.sql);
    }
    if out.is_empty() {
        out.push_str("(no queries yet)\n");
    }
    out
}
