use crate::{
    constants::PREDICTION_PARSE_FAILURE_CELL,
    errors::PromptError,
    parser::{decode_or, Decoded},
    prompts::{
        core::render,
        tasks::{RESULTS_PREVIEW_SYSTEM_PROMPT, RESULTS_PREVIEW_USER_PROMPT},
    },
    providers::ai::AiProvider,
    types::{ResultPrediction, SchemaDescription},
};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Predicts what a SQL statement would return, without executing it.
///
/// The model imagines a handful of plausible rows and judges whether they answer
/// the user's request. Nothing here touches a database.
#[derive(Debug, Clone)]
pub struct ResultsPredictor {
    ai_provider: Box<dyn AiProvider>,
}

impl ResultsPredictor {
    pub fn new(ai_provider: Box<dyn AiProvider>) -> Self {
        Self { ai_provider }
    }

    pub async fn predict(
        &self,
        schema: &SchemaDescription,
        user_query: &str,
        sql: &str,
    ) -> Result<Decoded<ResultPrediction>, PromptError> {
        info!("[predict] predicting results for SQL");
        let user_prompt = render(
            RESULTS_PREVIEW_USER_PROMPT,
            &[
                ("schema_analysis", schema.as_str()),
                ("prompt", user_query.trim()),
                ("sql", sql),
            ],
        );

        debug!(user_prompt = %user_prompt, "--> Sending preview prompt to AI Provider");

        let raw_response = self
            .ai_provider
            .generate(RESULTS_PREVIEW_SYSTEM_PROMPT, &user_prompt)
            .await?;

        debug!("<-- Preview from AI: {}", &raw_response);

        let decoded = decode_or(&raw_response, || fallback_prediction(sql));
        if let Decoded::Fallback { reason, .. } = &decoded {
            warn!(%reason, "Predictor reply could not be parsed; using fallback prediction.");
        }
        Ok(decoded.map(ResultPrediction::normalized))
    }
}

/// The prediction used when the predictor's reply cannot be decoded.
pub fn fallback_prediction(sql: &str) -> ResultPrediction {
    failed_prediction(
        sql,
        PREDICTION_PARSE_FAILURE_CELL,
        "The results predictor failed to produce a proper response. Please review the SQL manually.",
    )
}

/// A single-cell error prediction that never matches the user's intent.
pub(crate) fn failed_prediction(sql: &str, cell: &str, explanation: &str) -> ResultPrediction {
    ResultPrediction {
        columns: vec!["Error".to_string()],
        data: vec![vec![Value::String(cell.to_string())]],
        row_count: 1,
        matches_user_intent: false,
        explanation: explanation.to_string(),
        suggested_improved_query: Some(sql.to_string()),
    }
}
