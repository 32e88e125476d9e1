use crate::{
    constants::VALIDATION_PARSE_FAILURE_ISSUE,
    errors::PromptError,
    parser::{decode_or, Decoded},
    prompts::{
        core::render,
        tasks::{SQL_VALIDATION_SYSTEM_PROMPT, SQL_VALIDATION_USER_PROMPT},
    },
    providers::ai::AiProvider,
    types::{SchemaDescription, ValidationVerdict},
};
use tracing::{debug, info, warn};

/// Checks a candidate SQL statement against the schema and the user's intent.
///
/// The verdict is advisory: callers decide whether to adopt `suggested_fix`.
#[derive(Debug, Clone)]
pub struct SqlValidator {
    ai_provider: Box<dyn AiProvider>,
}

impl SqlValidator {
    pub fn new(ai_provider: Box<dyn AiProvider>) -> Self {
        Self { ai_provider }
    }

    /// Validates `sql`.
    ///
    /// An undecodable reply yields [`fallback_verdict`]; only provider failures
    /// are returned as errors.
    pub async fn validate(
        &self,
        schema: &SchemaDescription,
        user_query: &str,
        sql: &str,
    ) -> Result<Decoded<ValidationVerdict>, PromptError> {
        info!("[validate] validating generated SQL");
        let user_prompt = render(
            SQL_VALIDATION_USER_PROMPT,
            &[
                ("schema_analysis", schema.as_str()),
                ("prompt", user_query.trim()),
                ("sql", sql),
            ],
        );

        debug!(user_prompt = %user_prompt, "--> Sending validation prompt to AI Provider");

        let raw_response = self
            .ai_provider
            .generate(SQL_VALIDATION_SYSTEM_PROMPT, &user_prompt)
            .await?;

        debug!("<-- Validation from AI: {}", &raw_response);

        let decoded = decode_or(&raw_response, || fallback_verdict(sql));
        if let Decoded::Fallback { reason, .. } = &decoded {
            warn!(%reason, "Validator reply could not be parsed; using fallback verdict.");
        }
        Ok(decoded.map(|verdict| verdict.normalized(sql)))
    }
}

/// The verdict used when the validator's reply cannot be decoded.
pub fn fallback_verdict(sql: &str) -> ValidationVerdict {
    ValidationVerdict {
        is_valid: false,
        issues: vec![VALIDATION_PARSE_FAILURE_ISSUE.to_string()],
        suggested_fix: Some(sql.to_string()),
        explanation:
            "The validator failed to produce a proper response. Please review the SQL manually."
                .to_string(),
    }
}
