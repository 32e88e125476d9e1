#![allow(dead_code)]
//! # Common Test Utilities
//!
//! This module provides shared utilities for testing, such as a scripted mock
//! provider, to ensure tests are isolated and repeatable.

use async_trait::async_trait;
use dotenvy::dotenv;
use nl2sql::prompts::tasks::{
    RESULTS_PREVIEW_SYSTEM_PROMPT, SCHEMA_ANALYSIS_SYSTEM_PROMPT, SQL_GENERATION_SYSTEM_PROMPT,
    SQL_VALIDATION_SYSTEM_PROMPT,
};
use nl2sql::providers::ai::AiProvider;
use nl2sql::{PromptError, SchemaDescription, SqlAssistant, SqlAssistantBuilder};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::fmt::Debug;
use std::sync::{Arc, Mutex, Once};

static INIT: Once = Once::new();

/// Initializes the tracing subscriber and loads .env for tests.
pub fn setup_tracing() {
    INIT.call_once(|| {
        dotenv().ok();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// The model roles, identified by their system prompts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Analyzer,
    Generator,
    Validator,
    Previewer,
}

impl Role {
    fn from_system_prompt(system_prompt: &str) -> Option<Self> {
        match system_prompt {
            SCHEMA_ANALYSIS_SYSTEM_PROMPT => Some(Role::Analyzer),
            SQL_GENERATION_SYSTEM_PROMPT => Some(Role::Generator),
            SQL_VALIDATION_SYSTEM_PROMPT => Some(Role::Validator),
            RESULTS_PREVIEW_SYSTEM_PROMPT => Some(Role::Previewer),
            _ => None,
        }
    }
}

/// A scripted reply: either text or a simulated provider failure.
#[derive(Clone, Debug)]
pub enum Reply {
    Text(String),
    Fail(String),
}

// --- Mock AI Provider ---

/// A provider that replays queued replies per role and records every call.
#[derive(Clone, Debug, Default)]
pub struct MockAiProvider {
    replies: Arc<Mutex<HashMap<Role, VecDeque<Reply>>>>,
    calls: Arc<Mutex<Vec<(Role, String)>>>,
}

impl MockAiProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a text reply for `role`.
    pub fn reply(&self, role: Role, text: impl Into<String>) -> &Self {
        self.push(role, Reply::Text(text.into()))
    }

    /// Queues a simulated provider failure for `role`.
    pub fn fail(&self, role: Role, message: impl Into<String>) -> &Self {
        self.push(role, Reply::Fail(message.into()))
    }

    fn push(&self, role: Role, reply: Reply) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .entry(role)
            .or_default()
            .push_back(reply);
        self
    }

    /// All recorded calls as `(role, user_prompt)`, in order.
    pub fn calls(&self) -> Vec<(Role, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, role: Role) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(r, _)| *r == role)
            .count()
    }

    /// The user prompts sent to `role`, in order.
    pub fn prompts_for(&self, role: Role) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(r, _)| *r == role)
            .map(|(_, p)| p.clone())
            .collect()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, PromptError> {
        let role = Role::from_system_prompt(system_prompt).ok_or_else(|| {
            PromptError::AiApi(format!(
                "MockAiProvider: unknown system prompt. Got: '{system_prompt}'"
            ))
        })?;
        self.calls
            .lock()
            .unwrap()
            .push((role, user_prompt.to_string()));

        let next = self
            .replies
            .lock()
            .unwrap()
            .get_mut(&role)
            .and_then(|queue| queue.pop_front());

        match next {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Fail(message)) => Err(PromptError::AiApi(message)),
            None => Err(PromptError::AiApi(format!(
                "MockAiProvider: no reply programmed for {role:?}"
            ))),
        }
    }
}

// --- Fixtures ---

pub const USERS_ORDERS_DDL: &str = "CREATE TABLE users(id INT PRIMARY KEY, name TEXT); CREATE TABLE orders(id INT PRIMARY KEY, user_id INT, total DECIMAL);";

pub const TOTAL_SPENT_QUERY: &str = "total spent by each user";

pub const TOTAL_SPENT_SQL: &str = "SELECT users.name, SUM(orders.total) AS total_spent FROM orders JOIN users ON orders.user_id = users.id GROUP BY users.id, users.name;";

pub fn schema() -> SchemaDescription {
    SchemaDescription::new(
        "Tables: users(id INT PK, name TEXT); orders(id INT PK, user_id INT -> users.id, total DECIMAL).",
    )
}

pub fn assistant(provider: &MockAiProvider) -> SqlAssistant {
    SqlAssistantBuilder::new()
        .ai_provider(Box::new(provider.clone()))
        .build()
        .unwrap()
}

pub fn valid_verdict() -> String {
    json!({
        "is_valid": true,
        "issues": [],
        "explanation": "The query is valid."
    })
    .to_string()
}

pub fn invalid_verdict(fix: &str) -> String {
    json!({
        "is_valid": false,
        "issues": ["wrong column"],
        "suggested_fix": fix,
        "explanation": "The query references a missing column."
    })
    .to_string()
}

pub fn prediction(matches: bool, improved: Option<&str>) -> String {
    let mut value = json!({
        "columns": ["name", "total_spent"],
        "data": [["Alice", 120.5], ["Bob", 80.0]],
        "row_count": 2,
        "matches_user_intent": matches,
        "explanation": if matches { "Totals per user." } else { "Missing per-user grouping." }
    });
    if let Some(q) = improved {
        value["suggested_improved_query"] = Value::String(q.to_string());
    }
    value.to_string()
}
