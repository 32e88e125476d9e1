use thiserror::Error;

/// Custom error types for the application.
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to AI provider: {0}")]
    AiRequest(reqwest::Error),
    #[error("Failed to deserialize AI provider response: {0}")]
    AiDeserialization(reqwest::Error),
    #[error("AI provider returned an error: {0}")]
    AiApi(String),
    #[error("API key is missing: {0}")]
    MissingApiKey(String),
    #[error("AI provider is missing: {0}")]
    MissingAiProvider(String),
    #[error("Unsupported AI provider type: {0}")]
    UnsupportedProvider(String),
    #[error("The database schema is empty. Please provide a database schema first.")]
    EmptySchema,
    #[error("The natural language query is empty. Please enter a query first.")]
    EmptyQuery,
    #[error("No schema has been analyzed yet. Please analyze your database schema first.")]
    SchemaNotAnalyzed,
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
