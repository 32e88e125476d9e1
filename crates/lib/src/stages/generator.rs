use crate::{
    errors::PromptError,
    prompts::{
        core::{get_feedback_instruction, render, Feedback},
        tasks::{SQL_GENERATION_SYSTEM_PROMPT, SQL_GENERATION_USER_PROMPT},
    },
    providers::ai::AiProvider,
    types::SchemaDescription,
};
use regex::Regex;
use tracing::{debug, info};

/// Turns a natural language request into a SQL statement.
#[derive(Debug, Clone)]
pub struct SqlGenerator {
    ai_provider: Box<dyn AiProvider>,
}

impl SqlGenerator {
    pub fn new(ai_provider: Box<dyn AiProvider>) -> Self {
        Self { ai_provider }
    }

    /// Generates SQL for `user_query`.
    ///
    /// With `feedback`, the previous attempt and the reason it fell short are
    /// included so the model can correct course.
    pub async fn generate(
        &self,
        schema: &SchemaDescription,
        user_query: &str,
        feedback: Option<&Feedback>,
    ) -> Result<String, PromptError> {
        let user_query = user_query.trim();
        if user_query.is_empty() {
            return Err(PromptError::EmptyQuery);
        }

        info!(
            refining = feedback.is_some(),
            "[generate] received prompt: {:?}", user_query
        );

        let feedback_instruction = get_feedback_instruction(feedback);
        let user_prompt = render(
            SQL_GENERATION_USER_PROMPT,
            &[
                ("schema_analysis", schema.as_str()),
                ("prompt", user_query),
                ("feedback", &feedback_instruction),
            ],
        );

        debug!(user_prompt = %user_prompt, "--> Sending generation prompt to AI Provider");

        let raw_response = self
            .ai_provider
            .generate(SQL_GENERATION_SYSTEM_PROMPT, &user_prompt)
            .await?;

        debug!("<-- Query from AI: {}", &raw_response);

        extract_sql(&raw_response)
    }
}

/// Takes the SQL out of a generation reply.
///
/// The whole reply is the statement, unless the model wrapped it in a markdown
/// code fence, in which case the fenced body is used.
pub fn extract_sql(raw_response: &str) -> Result<String, PromptError> {
    let re = Regex::new(r"```(?:sql|SQL|query)?\n?([\s\S]*?)```")?;
    let sql = re
        .captures(raw_response)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| raw_response.trim().to_string());
    Ok(sql)
}
