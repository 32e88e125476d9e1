//! # The Core Executor
//!
//! This module defines the `SqlAssistant`, the entry point a presentation layer
//! (the CLI, or anything else) calls into. It holds one stage per model role and
//! exposes the high-level operations: schema analysis, the full refining
//! pipeline, and the simpler generate-then-validate pipeline.

use crate::{
    constants::DEFAULT_MAX_ITERATIONS,
    errors::PromptError,
    providers::ai::AiProvider,
    refine::RefinementLoop,
    stages::{ResultsPredictor, SchemaAnalyzer, SqlGenerator, SqlValidator},
    types::{GenerationReport, RefinementOutcome, SchemaDescription},
};
use tracing::info;

/// Holds the pipeline stages and runs requests through them.
///
/// The assistant carries no per-request state; every call takes its context as
/// arguments, so one instance can serve a whole session.
#[derive(Debug, Clone)]
pub struct SqlAssistant {
    analyzer: SchemaAnalyzer,
    generator: SqlGenerator,
    validator: SqlValidator,
    predictor: ResultsPredictor,
    max_iterations: usize,
}

impl SqlAssistant {
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Analyzes a raw schema. Provider failures propagate unchanged.
    pub async fn analyze_schema(&self, raw_schema: &str) -> Result<SchemaDescription, PromptError> {
        self.analyzer.analyze(raw_schema).await
    }

    /// Runs the full pipeline for one request: generate, validate, then refine.
    ///
    /// Failures of the initial generation or validation call are returned to the
    /// caller. From the first prediction onwards the pipeline always completes.
    pub async fn process_query(
        &self,
        schema: &SchemaDescription,
        user_query: &str,
    ) -> Result<RefinementOutcome, PromptError> {
        info!("[process_query] received prompt: {:?}", user_query);
        let report = self.generate_validated(schema, user_query).await?;

        let outcome = RefinementLoop::new(&self.generator, &self.validator, &self.predictor)
            .max_iterations(self.max_iterations)
            .run(schema, user_query, &report.final_sql)
            .await;

        info!(
            iterations = outcome.iterations,
            converged = outcome.converged,
            "[process_query] finished"
        );
        Ok(outcome)
    }

    /// Generates SQL and validates it once, adopting the fix when invalid.
    ///
    /// This is the non-refining variant; no results are predicted.
    pub async fn generate_validated(
        &self,
        schema: &SchemaDescription,
        user_query: &str,
    ) -> Result<GenerationReport, PromptError> {
        let generated_sql = self.generator.generate(schema, user_query, None).await?;
        let verdict = self
            .validator
            .validate(schema, user_query, &generated_sql)
            .await?
            .into_record();

        let final_sql = verdict.resolve(&generated_sql);
        if !verdict.is_valid {
            info!(issues = ?verdict.issues, "[generate_validated] adopting suggested fix");
        }

        Ok(GenerationReport {
            generated_sql,
            verdict,
            final_sql,
        })
    }
}

/// A builder for creating `SqlAssistant` instances.
///
/// Each role can be bound to its own provider; `ai_provider` binds every role
/// that has not been set explicitly.
#[derive(Default)]
pub struct SqlAssistantBuilder {
    default_provider: Option<Box<dyn AiProvider>>,
    analyzer_provider: Option<Box<dyn AiProvider>>,
    generator_provider: Option<Box<dyn AiProvider>>,
    previewer_provider: Option<Box<dyn AiProvider>>,
    max_iterations: Option<usize>,
}

impl SqlAssistantBuilder {
    /// Creates a new `SqlAssistantBuilder`.
    ///
    /// # Examples
    ///
    /// ```
    /// use nl2sql::SqlAssistantBuilder;
    ///
    /// let builder = SqlAssistantBuilder::new().max_iterations(5);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the provider used by every role without a dedicated one.
    pub fn ai_provider(mut self, provider: Box<dyn AiProvider>) -> Self {
        self.default_provider = Some(provider);
        self
    }

    /// Sets the provider for schema analysis.
    pub fn analyzer_provider(mut self, provider: Box<dyn AiProvider>) -> Self {
        self.analyzer_provider = Some(provider);
        self
    }

    /// Sets the provider for SQL generation and validation.
    pub fn generator_provider(mut self, provider: Box<dyn AiProvider>) -> Self {
        self.generator_provider = Some(provider);
        self
    }

    /// Sets the provider for results prediction.
    pub fn previewer_provider(mut self, provider: Box<dyn AiProvider>) -> Self {
        self.previewer_provider = Some(provider);
        self
    }

    /// Sets the refinement budget. Defaults to three rounds.
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    /// Builds the `SqlAssistant`.
    ///
    /// Fails with `MissingAiProvider` if any role is left without a provider.
    pub fn build(self) -> Result<SqlAssistant, PromptError> {
        let default = self.default_provider;
        let resolve = |role: &str, specific: Option<Box<dyn AiProvider>>| {
            specific.or_else(|| default.clone()).ok_or_else(|| {
                PromptError::MissingAiProvider(format!("no provider configured for the {role} role"))
            })
        };

        let analyzer = resolve("analyzer", self.analyzer_provider)?;
        let generator = resolve("generator", self.generator_provider)?;
        let previewer = resolve("previewer", self.previewer_provider)?;

        Ok(SqlAssistant {
            analyzer: SchemaAnalyzer::new(analyzer),
            validator: SqlValidator::new(generator.clone()),
            generator: SqlGenerator::new(generator),
            predictor: ResultsPredictor::new(previewer),
            max_iterations: self
                .max_iterations
                .unwrap_or(DEFAULT_MAX_ITERATIONS)
                .max(1),
        })
    }
}
