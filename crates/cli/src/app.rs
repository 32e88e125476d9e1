//! # Command Handlers
//!
//! Wires the loaded configuration into an `SqlAssistant` and implements each CLI
//! command on top of a `Session`.

use crate::{config::AppConfig, ui};
use anyhow::{bail, Context, Result};
use nl2sql::providers::factory::{create_providers, provider_for_role};
use nl2sql::{Session, SqlAssistant, SqlAssistantBuilder};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

/// Builds the assistant, binding each role to its configured provider.
pub fn build_assistant(config: &AppConfig) -> Result<SqlAssistant> {
    let providers = create_providers(&config.providers)?;
    let roles = &config.roles;

    let assistant = SqlAssistantBuilder::new()
        .analyzer_provider(provider_for_role(&providers, "analyzer", &roles.analyzer)?)
        .generator_provider(provider_for_role(&providers, "generator", &roles.generator)?)
        .previewer_provider(provider_for_role(&providers, "previewer", &roles.previewer)?)
        .max_iterations(config.max_iterations)
        .build()?;

    info!(
        analyzer = %roles.analyzer,
        generator = %roles.generator,
        previewer = %roles.previewer,
        max_iterations = assistant.max_iterations(),
        "Assistant configured."
    );
    Ok(assistant)
}

fn read_schema_file(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read schema file '{}'", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Loads and analyzes a schema file into a fresh session.
async fn analyzed_session(assistant: &SqlAssistant, schema_path: &Path) -> Result<Session> {
    let mut session = Session::new();
    session.set_raw_schema(read_schema_file(schema_path)?);
    session.analyze(assistant).await?;
    Ok(session)
}

pub async fn handle_analyze(assistant: &SqlAssistant, schema_path: &Path, json: bool) -> Result<()> {
    let session = analyzed_session(assistant, schema_path).await?;
    let schema = session.schema()?;
    if json {
        print_json(schema)?;
    } else {
        println!("{schema}");
    }
    Ok(())
}

pub async fn handle_query(
    assistant: &SqlAssistant,
    schema_path: &Path,
    request: &str,
    json: bool,
) -> Result<()> {
    let mut session = analyzed_session(assistant, schema_path).await?;
    let outcome = session.submit(assistant, request).await?;
    if json {
        print_json(&outcome)?;
    } else {
        print!("{}", ui::render_outcome(&outcome));
    }
    Ok(())
}

pub async fn handle_generate(
    assistant: &SqlAssistant,
    schema_path: &Path,
    request: &str,
    json: bool,
) -> Result<()> {
    let mut session = analyzed_session(assistant, schema_path).await?;
    let report = session.submit_simple(assistant, request).await?;
    if json {
        print_json(&report)?;
    } else {
        print!("{}", ui::render_report(&report));
    }
    Ok(())
}

/// Reads requests from stdin, one per line, until EOF or `:quit`.
///
/// A failed request is reported and the session continues.
pub async fn handle_interactive(
    assistant: &SqlAssistant,
    schema_path: &Path,
    json: bool,
) -> Result<()> {
    let mut session = analyzed_session(assistant, schema_path).await?;
    println!("Schema analyzed. Enter a request, or :history, :schema, :quit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        match input {
            "" => continue,
            ":quit" | ":q" => break,
            ":history" => print!("{}", ui::render_history(session.history())),
            ":schema" => println!("{}", session.schema()?),
            cmd if cmd.starts_with(':') => eprintln!("Unknown command: {cmd}"),
            request => match session.submit(assistant, request).await {
                Ok(outcome) if json => print_json(&outcome)?,
                Ok(outcome) => print!("{}", ui::render_outcome(&outcome)),
                Err(e) => eprintln!("Request failed: {e}"),
            },
        }
    }
    info!("Interactive session ended after {} requests.", session.history_len());
    Ok(())
}

/// Rejects a blank request before any provider is contacted.
pub fn require_request(request: &str) -> Result<&str> {
    let request = request.trim();
    if request.is_empty() {
        bail!("The request must not be empty.");
    }
    Ok(request)
}
