//! # AI Provider Factory
//!
//! This module centralizes the logic for creating AI provider instances from
//! configuration, so every consumer (the CLI, tests, other front ends) builds
//! providers the same way.

use crate::{
    constants::{GROQ_API_URL, LOCAL_AI_API_URL},
    errors::PromptError,
    providers::ai::{gemini::GeminiProvider, local::LocalAiProvider, AiProvider},
    types::ProviderConfig,
};
use std::collections::HashMap;
use tracing::{info, warn};

/// Creates one AI provider instance from its configuration.
///
/// - `gemini` requires an API key; the URL is derived from the model name if unset.
/// - `groq` requires an API key; the URL defaults to Groq's OpenAI-compatible endpoint.
/// - `local` talks to any OpenAI-compatible server; the key is optional.
pub fn create_provider(
    name: &str,
    config: &ProviderConfig,
) -> Result<Box<dyn AiProvider>, PromptError> {
    let api_key = config
        .api_key
        .as_ref()
        .filter(|key| !key.trim().is_empty())
        .cloned();
    let api_url = config
        .api_url
        .as_ref()
        .filter(|url| !url.trim().is_empty())
        .cloned();

    let provider: Box<dyn AiProvider> = match config.provider.as_str() {
        "gemini" => {
            let api_key = api_key.ok_or_else(|| {
                PromptError::MissingApiKey(format!("api_key is required for gemini provider '{name}'"))
            })?;
            let api_url =
                api_url.unwrap_or_else(|| GeminiProvider::endpoint_for_model(&config.model_name));
            info!("Configuring Gemini provider '{}' with URL: {}", name, api_url);
            Box::new(GeminiProvider::new(api_url, api_key)?)
        }
        "groq" => {
            let api_key = api_key.ok_or_else(|| {
                PromptError::MissingApiKey(format!(
                    "api_key is required for groq provider '{name}'. Please set GROQ_API_KEY in your .env file."
                ))
            })?;
            let api_url = api_url.unwrap_or_else(|| GROQ_API_URL.to_string());
            info!("Configuring Groq provider '{}' with URL: {}", name, api_url);
            Box::new(LocalAiProvider::new(
                api_url,
                Some(api_key),
                Some(config.model_name.clone()),
            )?)
        }
        "local" => {
            let api_url = api_url.unwrap_or_else(|| {
                warn!(
                    "api_url is not set for local provider '{}'. Falling back to default: {}",
                    name, LOCAL_AI_API_URL
                );
                LOCAL_AI_API_URL.to_string()
            });
            info!("Configuring Local AI provider '{}' with URL: {}", name, api_url);
            Box::new(LocalAiProvider::new(
                api_url,
                api_key,
                Some(config.model_name.clone()),
            )?)
        }
        other => {
            return Err(PromptError::UnsupportedProvider(format!(
                "'{other}' for provider '{name}'"
            )))
        }
    };

    Ok(provider)
}

/// Instantiates every configured provider, keyed by its name.
pub fn create_providers(
    configs: &HashMap<String, ProviderConfig>,
) -> Result<HashMap<String, Box<dyn AiProvider>>, PromptError> {
    configs
        .iter()
        .map(|(name, config)| Ok((name.clone(), create_provider(name, config)?)))
        .collect()
}

/// Looks up the provider assigned to a role.
pub fn provider_for_role(
    providers: &HashMap<String, Box<dyn AiProvider>>,
    role: &str,
    provider_name: &str,
) -> Result<Box<dyn AiProvider>, PromptError> {
    providers.get(provider_name).cloned().ok_or_else(|| {
        PromptError::MissingAiProvider(format!(
            "Provider '{provider_name}' for role '{role}' not found in providers map."
        ))
    })
}
