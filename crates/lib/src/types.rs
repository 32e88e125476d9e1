//! # Pipeline Records
//!
//! The typed records exchanged between the pipeline stages, the refinement loop
//! and the presentation layer.

use crate::constants::HISTORY_TIMESTAMP_FORMAT;
use chrono::{DateTime, Local};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::warn;

/// The analyzed form of a raw database schema.
///
/// Normally produced by the schema analyzer. It is read by every downstream stage
/// and replaced wholesale when the user supplies a new schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaDescription(String);

impl SchemaDescription {
    pub fn new(analysis: impl Into<String>) -> Self {
        Self(analysis.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchemaDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Models often send `null` for fields they consider empty.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// Accepts a number, a numeric string, or anything else as 0.
fn lenient_count<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let count = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().and_then(|n| usize::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    Ok(count.unwrap_or_default())
}

/// The validator's assessment of a candidate SQL statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationVerdict {
    pub is_valid: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub issues: Vec<String>,
    #[serde(default)]
    pub suggested_fix: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub explanation: String,
}

impl ValidationVerdict {
    /// Brings a decoded verdict in line with its invariants.
    ///
    /// A valid verdict carries no issues and no fix. An invalid verdict always
    /// carries at least one issue and a non-empty fix, falling back to `sql`.
    pub(crate) fn normalized(mut self, sql: &str) -> Self {
        if self.is_valid {
            self.issues.clear();
            self.suggested_fix = None;
            return self;
        }

        let fix_is_blank = self
            .suggested_fix
            .as_deref()
            .map_or(true, |fix| fix.trim().is_empty());
        if fix_is_blank {
            self.suggested_fix = Some(sql.to_string());
        }

        if self.issues.is_empty() {
            let issue = if self.explanation.trim().is_empty() {
                "Unspecified validation issue".to_string()
            } else {
                self.explanation.clone()
            };
            self.issues.push(issue);
        }
        self
    }

    /// The statement to carry forward: the original when valid, the fix otherwise.
    pub fn resolve(&self, sql: &str) -> String {
        match (&self.suggested_fix, self.is_valid) {
            (Some(fix), false) if !fix.trim().is_empty() => fix.clone(),
            _ => sql.to_string(),
        }
    }
}

/// An imagined result set for a SQL statement, with the model's judgement of
/// whether it answers the user's request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultPrediction {
    #[serde(default, deserialize_with = "null_as_default")]
    pub columns: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<Vec<Value>>,
    /// Recomputed from `data` on decode; any reported value is only a hint.
    #[serde(default, deserialize_with = "lenient_count")]
    pub row_count: usize,
    #[serde(default, deserialize_with = "null_as_default")]
    pub matches_user_intent: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub explanation: String,
    #[serde(default)]
    pub suggested_improved_query: Option<String>,
}

impl ResultPrediction {
    /// Aligns every row with `columns` and recomputes `row_count` from `data`.
    ///
    /// Short rows are padded with `null`, long rows are truncated. The reported
    /// row count is never trusted over the rows actually present.
    pub(crate) fn normalized(mut self) -> Self {
        let width = self.columns.len();
        for row in &mut self.data {
            if row.len() != width {
                row.resize(width, Value::Null);
            }
        }

        if self.row_count != self.data.len() {
            warn!(
                reported = self.row_count,
                actual = self.data.len(),
                "Predicted row_count disagrees with the rows returned; using the actual count."
            );
            self.row_count = self.data.len();
        }

        if self
            .suggested_improved_query
            .as_deref()
            .is_some_and(|q| q.trim().is_empty())
        {
            self.suggested_improved_query = None;
        }
        self
    }

    /// The improved query suggested by the predictor, if it is non-empty.
    pub fn improved_query(&self) -> Option<&str> {
        self.suggested_improved_query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
    }
}

/// One round of the refinement loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationRecord {
    pub iteration: usize,
    pub sql: String,
    pub results: ResultPrediction,
}

/// The result of processing one natural language request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinementOutcome {
    pub sql: String,
    pub results: ResultPrediction,
    pub iterations: usize,
    /// `true` iff the predicted results matched the user's intent within budget.
    #[serde(rename = "final")]
    pub converged: bool,
    pub history: Vec<IterationRecord>,
}

/// The result of the non-refining pipeline: generate, then validate once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub generated_sql: String,
    pub verdict: ValidationVerdict,
    pub final_sql: String,
}

/// A processed request kept in the session history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryHistoryEntry {
    pub user_query: String,
    pub sql: String,
    pub results: Option<ResultPrediction>,
    pub timestamp: DateTime<Local>,
}

impl QueryHistoryEntry {
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(HISTORY_TIMESTAMP_FORMAT).to_string()
    }
}

/// A reusable configuration for a specific AI provider instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// The type of provider ("gemini", "groq" or "local").
    pub provider: String,
    /// The API URL. Optional for providers where it can be derived.
    #[serde(default)]
    pub api_url: Option<String>,
    /// The API key, which can be null for local providers.
    #[serde(default)]
    pub api_key: Option<String>,
    pub model_name: String,
}
