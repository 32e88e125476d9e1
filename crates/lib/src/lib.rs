//! # Natural Language to SQL
//!
//! This crate turns plain-language requests into SQL for a user-supplied schema.
//! A configurable AI provider analyzes the schema, writes a query, validates it,
//! and predicts what it would return. When the predicted results do not answer
//! the request, the query is refined over a bounded number of rounds.
//!
//! Nothing is executed against a database: every "result" is a prediction.

pub mod constants;
pub mod errors;
pub mod executor;
pub mod parser;
pub mod prompts;
pub mod providers;
pub mod refine;
pub mod session;
pub mod stages;
pub mod types;

pub use errors::PromptError;
pub use executor::{SqlAssistant, SqlAssistantBuilder};
pub use parser::{Decoded, ParseFailure};
pub use refine::RefinementLoop;
pub use session::Session;
pub use types::{
    GenerationReport, IterationRecord, QueryHistoryEntry, RefinementOutcome, ResultPrediction,
    SchemaDescription, ValidationVerdict,
};
