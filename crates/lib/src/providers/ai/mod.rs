pub mod gemini;
pub mod local;

use crate::errors::PromptError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;

/// A trait for interacting with an AI provider.
///
/// Every pipeline stage talks to its model through this single call contract:
/// a system prompt carrying the role description and a user prompt carrying the
/// task. Implementations may be bound to different models per role.
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// Generates a response from a given system and user prompt.
    ///
    /// The result is the model's free-form text reply.
    async fn generate(&self, system_prompt: &str, user_prompt: &str)
        -> Result<String, PromptError>;
}

dyn_clone::clone_trait_object!(AiProvider);
