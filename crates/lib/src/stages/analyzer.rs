use crate::{
    errors::PromptError,
    prompts::{
        core::render,
        tasks::{SCHEMA_ANALYSIS_SYSTEM_PROMPT, SCHEMA_ANALYSIS_USER_PROMPT},
    },
    providers::ai::AiProvider,
    types::SchemaDescription,
};
use tracing::{debug, info};

/// Turns a raw schema (DDL or a free-form description) into a [`SchemaDescription`].
#[derive(Debug, Clone)]
pub struct SchemaAnalyzer {
    ai_provider: Box<dyn AiProvider>,
}

impl SchemaAnalyzer {
    pub fn new(ai_provider: Box<dyn AiProvider>) -> Self {
        Self { ai_provider }
    }

    /// Analyzes `raw_schema` in a single call.
    ///
    /// Provider failures are returned as-is; analysis is a one-shot precondition
    /// for the rest of the pipeline and is never retried here.
    pub async fn analyze(&self, raw_schema: &str) -> Result<SchemaDescription, PromptError> {
        let raw_schema = raw_schema.trim();
        if raw_schema.is_empty() {
            return Err(PromptError::EmptySchema);
        }

        info!(schema_len = raw_schema.len(), "[analyze] analyzing schema");
        let user_prompt = render(SCHEMA_ANALYSIS_USER_PROMPT, &[("schema", raw_schema)]);
        debug!(user_prompt = %user_prompt, "--> Sending schema analysis prompt to AI Provider");

        let analysis = self
            .ai_provider
            .generate(SCHEMA_ANALYSIS_SYSTEM_PROMPT, &user_prompt)
            .await?;

        debug!("<-- Schema analysis from AI: {}", &analysis);
        Ok(SchemaDescription::new(analysis.trim()))
    }
}
