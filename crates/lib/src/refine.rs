//! # Refinement Loop
//!
//! Drives the predictor, generator and validator through a bounded number of
//! rounds until the predicted results are judged to answer the user's request.
//!
//! Each round evaluates one candidate statement:
//!
//! 1.  Predict its results and record the round.
//! 2.  If the prediction matches the user's intent, stop (`Converged`).
//! 3.  Otherwise pick the next candidate: the predictor's improved query when it
//!     offers one, else a fresh generation with the prediction's explanation as
//!     feedback.
//! 4.  Validate the new candidate and adopt the validator's fix if it is invalid.
//!
//! When the budget runs out, the last candidate is evaluated once more and that
//! fresh prediction replaces the last round's record (`Exhausted`).
//!
//! Convergence is the model's own judgement; the bound only caps cost.

use crate::{
    constants::{DEFAULT_MAX_ITERATIONS, PREDICTION_CALL_FAILURE_CELL},
    prompts::core::Feedback,
    stages::{predictor::failed_prediction, ResultsPredictor, SqlGenerator, SqlValidator},
    types::{IterationRecord, RefinementOutcome, ResultPrediction, SchemaDescription},
};
use tracing::{info, warn};

/// The states of one refinement run.
#[derive(Debug)]
enum LoopState {
    RoundStart {
        round: usize,
        sql: String,
    },
    Predicted {
        round: usize,
        sql: String,
        prediction: ResultPrediction,
    },
    Converged {
        round: usize,
        sql: String,
        prediction: ResultPrediction,
    },
    Exhausted {
        sql: String,
    },
}

/// The orchestrator for one request's refinement rounds.
///
/// Borrows the stages it drives; it owns no state beyond a single `run`.
#[derive(Debug)]
pub struct RefinementLoop<'a> {
    generator: &'a SqlGenerator,
    validator: &'a SqlValidator,
    predictor: &'a ResultsPredictor,
    max_iterations: usize,
}

impl<'a> RefinementLoop<'a> {
    pub fn new(
        generator: &'a SqlGenerator,
        validator: &'a SqlValidator,
        predictor: &'a ResultsPredictor,
    ) -> Self {
        Self {
            generator,
            validator,
            predictor,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Sets the round budget. Values below 1 are raised to 1.
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    /// Refines `initial_sql` for `user_query`.
    ///
    /// Provider failures inside the loop are absorbed so the run always produces
    /// an outcome: a failed prediction counts as a non-matching round, a failed
    /// regeneration keeps the previous statement, and a failed validation keeps
    /// the candidate unchanged.
    pub async fn run(
        &self,
        schema: &SchemaDescription,
        user_query: &str,
        initial_sql: &str,
    ) -> RefinementOutcome {
        let mut history: Vec<IterationRecord> = Vec::with_capacity(self.max_iterations);
        let mut state = LoopState::RoundStart {
            round: 1,
            sql: initial_sql.to_string(),
        };

        loop {
            state = match state {
                LoopState::RoundStart { round, sql } => {
                    info!(round, max = self.max_iterations, "[refine] starting round");
                    let prediction = self.predict(schema, user_query, &sql).await;
                    history.push(IterationRecord {
                        iteration: round,
                        sql: sql.clone(),
                        results: prediction.clone(),
                    });
                    LoopState::Predicted {
                        round,
                        sql,
                        prediction,
                    }
                }
                LoopState::Predicted {
                    round,
                    sql,
                    prediction,
                } => {
                    if prediction.matches_user_intent {
                        LoopState::Converged {
                            round,
                            sql,
                            prediction,
                        }
                    } else if round >= self.max_iterations {
                        LoopState::Exhausted { sql }
                    } else {
                        let next_sql = self.next_candidate(schema, user_query, &sql, &prediction).await;
                        LoopState::RoundStart {
                            round: round + 1,
                            sql: next_sql,
                        }
                    }
                }
                LoopState::Converged {
                    round,
                    sql,
                    prediction,
                } => {
                    info!(round, "[refine] predicted results match the user's intent");
                    return RefinementOutcome {
                        sql,
                        results: prediction,
                        iterations: round,
                        converged: true,
                        history,
                    };
                }
                LoopState::Exhausted { sql } => {
                    info!(
                        max = self.max_iterations,
                        "[refine] budget exhausted; evaluating the last candidate once more"
                    );
                    let prediction = self.predict(schema, user_query, &sql).await;
                    let record = IterationRecord {
                        iteration: self.max_iterations,
                        sql: sql.clone(),
                        results: prediction.clone(),
                    };
                    // Replaced rather than appended so that `history.len() == iterations`
                    // and `history[i].iteration == i + 1` still hold.
                    match history.last_mut() {
                        Some(last) => *last = record,
                        None => history.push(record),
                    }
                    return RefinementOutcome {
                        sql,
                        results: prediction,
                        iterations: self.max_iterations,
                        converged: false,
                        history,
                    };
                }
            };
        }
    }

    async fn predict(
        &self,
        schema: &SchemaDescription,
        user_query: &str,
        sql: &str,
    ) -> ResultPrediction {
        match self.predictor.predict(schema, user_query, sql).await {
            Ok(decoded) => decoded.into_record(),
            Err(e) => {
                warn!(error = %e, "[refine] prediction call failed; treating round as unmatched");
                failed_prediction(
                    sql,
                    PREDICTION_CALL_FAILURE_CELL,
                    &format!("The results predictor could not be reached: {e}"),
                )
            }
        }
    }

    /// Picks and validates the candidate for the next round.
    async fn next_candidate(
        &self,
        schema: &SchemaDescription,
        user_query: &str,
        sql: &str,
        prediction: &ResultPrediction,
    ) -> String {
        let candidate = match prediction.improved_query() {
            Some(improved) => {
                info!("[refine] adopting the predictor's improved query");
                improved.to_string()
            }
            None => {
                info!("[refine] regenerating with prediction feedback");
                let feedback = Feedback::new(sql, prediction.explanation.as_str());
                match self
                    .generator
                    .generate(schema, user_query, Some(&feedback))
                    .await
                {
                    Ok(regenerated) if !regenerated.trim().is_empty() => regenerated,
                    Ok(_) => {
                        warn!("[refine] regeneration returned no SQL; keeping the previous query");
                        sql.to_string()
                    }
                    Err(e) => {
                        warn!(error = %e, "[refine] regeneration failed; keeping the previous query");
                        sql.to_string()
                    }
                }
            }
        };

        match self.validator.validate(schema, user_query, &candidate).await {
            Ok(decoded) => {
                let verdict = decoded.into_record();
                if !verdict.is_valid {
                    info!(issues = ?verdict.issues, "[refine] candidate is invalid; adopting suggested fix");
                }
                verdict.resolve(&candidate)
            }
            Err(e) => {
                warn!(error = %e, "[refine] validation failed; keeping the candidate as is");
                candidate
            }
        }
    }
}
