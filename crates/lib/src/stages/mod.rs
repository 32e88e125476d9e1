//! # Pipeline Stages
//!
//! Each stage wraps one model role. Stages hold nothing but their provider and
//! take every piece of context as an explicit argument, so a single instance can
//! serve any number of requests.

pub mod analyzer;
pub mod generator;
pub mod predictor;
pub mod validator;

pub use analyzer::SchemaAnalyzer;
pub use generator::SqlGenerator;
pub use predictor::ResultsPredictor;
pub use validator::SqlValidator;
