//! # Application Configuration
//!
//! This module defines the configuration structure for the `nl2sql` CLI and
//! provides the logic for loading it from a `config.yml` file and environment
//! variables. Configuration is resolved once at start-up.

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use nl2sql::constants::DEFAULT_MAX_ITERATIONS;
use nl2sql::types::ProviderConfig;
use regex::{Captures, Regex};
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;
use tracing::info;

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates a required configuration file was not found.
    NotFound(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `config.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The number of refinement rounds per request.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// A map of named, reusable AI provider configurations.
    pub providers: HashMap<String, ProviderConfig>,
    /// Which provider serves each model role.
    #[serde(default)]
    pub roles: RoleConfig,
}

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

/// Maps each pipeline role to a key of the `providers` map.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct RoleConfig {
    #[serde(default = "default_role_provider")]
    pub analyzer: String,
    /// Serves both SQL generation and validation.
    #[serde(default = "default_role_provider")]
    pub generator: String,
    #[serde(default = "default_role_provider")]
    pub previewer: String,
}

fn default_role_provider() -> String {
    "default".to_string()
}

impl Default for RoleConfig {
    fn default() -> Self {
        Self {
            analyzer: default_role_provider(),
            generator: default_role_provider(),
            previewer: default_role_provider(),
        }
    }
}

// Helper to read a file, substitute env vars, and return its content.
// Returns Ok(None) if the file does not exist, or an error if it fails to read.
fn read_and_substitute(path: &Path) -> Result<Option<String>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path).map_err(|e| {
        ConfigError::General(format!(
            "Failed to read config file '{}': {e}",
            path.display()
        ))
    })?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}")
        .map_err(|e| ConfigError::General(e.to_string()))?;
    let expanded_content = re.replace_all(&content, |caps: &Captures| {
        let var_name = &caps["var"];
        env::var(var_name).unwrap_or_default()
    });

    Ok(Some(expanded_content.into_owned()))
}

/// Picks the main config file.
///
/// An explicit path wins. Otherwise `config.yml` in `base_dir` is used if it
/// exists, falling back to the `config.{AI_PROVIDER}.yml` template (`groq` by
/// default).
fn resolve_config_path(config_path_override: Option<&str>, base_dir: &Path) -> String {
    if let Some(override_path) = config_path_override {
        return override_path.to_string();
    }

    let user_config_path = base_dir.join("config.yml");
    if user_config_path.exists() {
        info!(
            "Loading user-defined configuration from '{}'.",
            user_config_path.display()
        );
        return user_config_path.display().to_string();
    }

    let provider = env::var("AI_PROVIDER").unwrap_or_else(|_| "groq".to_string());
    let fallback_path = base_dir.join(format!("config.{provider}.yml"));
    info!(
        "'{}' not found. Falling back to '{}' based on AI_PROVIDER='{provider}'.",
        user_config_path.display(),
        fallback_path.display()
    );
    fallback_path.display().to_string()
}

/// Loads the application configuration from a file and environment variables.
///
/// Layers, lowest precedence first:
/// - programmatic defaults (`max_iterations`, role assignments);
/// - the YAML file, with `${VAR}` references substituted from the environment;
/// - `NL2SQL_`-prefixed environment variables, `__` separating nested keys
///   (e.g. `NL2SQL_MAX_ITERATIONS=5`, `NL2SQL_ROLES__PREVIEWER=gemini_default`).
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    get_config_from(config_path_override, Path::new(env!("CARGO_MANIFEST_DIR")))
}

pub(crate) fn get_config_from(
    config_path_override: Option<&str>,
    base_dir: &Path,
) -> Result<AppConfig, ConfigError> {
    let main_config_path = resolve_config_path(config_path_override, base_dir);
    let main_content = read_and_substitute(Path::new(&main_config_path))?.ok_or_else(|| {
        ConfigError::NotFound(format!(
            "Main config file not found at '{main_config_path}'. Please ensure 'config.yml' exists or your AI_PROVIDER is set to load a valid template ('groq', 'gemini' or 'local')."
        ))
    })?;

    let settings = ConfigBuilder::builder()
        // Layer 1: Programmatic defaults.
        .set_default("max_iterations", DEFAULT_MAX_ITERATIONS as u64)?
        .set_default("roles.analyzer", default_role_provider())?
        .set_default("roles.generator", default_role_provider())?
        .set_default("roles.previewer", default_role_provider())?
        // Layer 2: The main config file.
        .add_source(File::from_str(&main_content, FileFormat::Yaml))
        // Layer 3: Prefixed environment variables for overrides.
        .add_source(
            Environment::with_prefix("NL2SQL")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    let config: AppConfig = settings.try_deserialize()?;
    Ok(config)
}
