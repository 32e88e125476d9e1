use crate::{errors::PromptError, providers::ai::AiProvider};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use tracing::debug;

// --- Gemini-specific request and response structures ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    system_instruction: Content,
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize, Debug)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: ContentResponse,
}

#[derive(Deserialize, Debug)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize, Debug)]
struct PartResponse {
    text: String,
}

// --- Gemini Provider implementation ---

/// A provider for interacting with the Google Gemini API.
#[derive(Clone, Debug)]
pub struct GeminiProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: String,
}

impl GeminiProvider {
    /// Creates a new `GeminiProvider`.
    pub fn new(api_url: String, api_key: String) -> Result<Self, PromptError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(PromptError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url,
            api_key,
        })
    }

    /// Builds the `generateContent` endpoint for a model name.
    pub fn endpoint_for_model(model_name: &str) -> String {
        format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{model_name}:generateContent"
        )
    }
}

#[async_trait]
impl AiProvider for GeminiProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, PromptError> {
        let request_body = GeminiRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: system_prompt.to_string(),
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part {
                    text: user_prompt.to_string(),
                }],
            }],
        };

        let response = self
            .client
            .post(&self.api_url)
            .query(&[("key", &self.api_key)])
            .json(&request_body)
            .send()
            .await
            .map_err(PromptError::AiRequest)?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(PromptError::AiApi(error_text));
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(PromptError::AiDeserialization)?;

        debug!(candidates = gemini_response.candidates.len(), "Gemini reply received");

        let raw_response = gemini_response
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        Ok(raw_response)
    }
}
