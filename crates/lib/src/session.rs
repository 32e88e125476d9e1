//! # Session State
//!
//! A `Session` is the state a presentation layer keeps between user actions: the
//! raw schema as entered, its analysis, and the history of processed requests.
//! The assistant itself stays stateless; the session is passed to it explicitly.

use crate::{
    errors::PromptError,
    executor::SqlAssistant,
    types::{QueryHistoryEntry, RefinementOutcome, SchemaDescription},
    GenerationReport,
};
use chrono::Local;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct Session {
    raw_schema: String,
    schema: Option<SchemaDescription>,
    history: Vec<QueryHistoryEntry>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the raw schema text. The previous analysis is discarded, since it
    /// no longer describes the schema on record.
    pub fn set_raw_schema(&mut self, raw_schema: impl Into<String>) {
        self.raw_schema = raw_schema.into();
        self.schema = None;
    }

    pub fn raw_schema(&self) -> &str {
        &self.raw_schema
    }

    /// Analyzes the current raw schema, replacing any earlier analysis.
    ///
    /// On failure the session is left unchanged.
    pub async fn analyze(
        &mut self,
        assistant: &SqlAssistant,
    ) -> Result<&SchemaDescription, PromptError> {
        if self.raw_schema.trim().is_empty() {
            return Err(PromptError::EmptySchema);
        }
        let schema = assistant.analyze_schema(&self.raw_schema).await?;
        info!("[session] schema analyzed");
        Ok(self.schema.insert(schema))
    }

    /// The analyzed schema, or `SchemaNotAnalyzed` before `analyze` has succeeded.
    pub fn schema(&self) -> Result<&SchemaDescription, PromptError> {
        self.schema.as_ref().ok_or(PromptError::SchemaNotAnalyzed)
    }

    /// Runs the full pipeline for `user_query` and records it in the history.
    ///
    /// Nothing is recorded if the pipeline fails.
    pub async fn submit(
        &mut self,
        assistant: &SqlAssistant,
        user_query: &str,
    ) -> Result<RefinementOutcome, PromptError> {
        let schema = self.schema()?;
        let outcome = assistant.process_query(schema, user_query).await?;
        self.history.push(QueryHistoryEntry {
            user_query: user_query.trim().to_string(),
            sql: outcome.sql.clone(),
            results: Some(outcome.results.clone()),
            timestamp: Local::now(),
        });
        Ok(outcome)
    }

    /// Runs the non-refining pipeline for `user_query` and records it.
    pub async fn submit_simple(
        &mut self,
        assistant: &SqlAssistant,
        user_query: &str,
    ) -> Result<GenerationReport, PromptError> {
        let schema = self.schema()?;
        let report = assistant.generate_validated(schema, user_query).await?;
        self.history.push(QueryHistoryEntry {
            user_query: user_query.trim().to_string(),
            sql: report.final_sql.clone(),
            results: None,
            timestamp: Local::now(),
        });
        Ok(report)
    }

    /// The processed requests, newest first.
    pub fn history(&self) -> impl Iterator<Item = &QueryHistoryEntry> {
        self.history.iter().rev()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}
