//! # Shared Constants
//!
//! This module provides a centralized location for constants that are shared across
//! the `nl2sql` workspace. Using these constants helps to avoid "magic strings" and
//! ensures consistency between the library and the CLI.

/// The number of refinement rounds performed before giving up on convergence.
pub const DEFAULT_MAX_ITERATIONS: usize = 3;

/// The model used when a provider configuration does not name one.
pub const DEFAULT_MODEL_NAME: &str = "llama-3.3-70b-versatile";

/// The OpenAI-compatible chat-completions endpoint for Groq.
pub const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// The fallback endpoint for a self-hosted OpenAI-compatible server.
pub const LOCAL_AI_API_URL: &str = "http://localhost:1234/v1/chat/completions";

/// The timestamp format used when displaying query history entries.
pub const HISTORY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Issue reported by the validator fallback when its reply cannot be decoded.
pub const VALIDATION_PARSE_FAILURE_ISSUE: &str = "Failed to parse validation response";

/// Cell value reported by the predictor fallback when its reply cannot be decoded.
pub const PREDICTION_PARSE_FAILURE_CELL: &str = "Failed to parse results preview";

/// Cell value reported when the predictor's provider call itself fails mid-refinement.
pub const PREDICTION_CALL_FAILURE_CELL: &str = "Failed to generate results preview";
