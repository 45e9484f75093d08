//! Generation backend abstraction
//!
//! The relay talks to the remote model service only through
//! [`GenerationBackend`], so tests can swap in a scripted backend.

pub mod gemini;

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;

pub use gemini::GeminiClient;

/// Everything needed to call one model: the id plus the request template
/// shared by every call to it. Built once per model id and cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelHandle {
    pub model: String,
    pub system_instruction: Option<Arc<str>>,
    pub safety_settings: Vec<SafetySetting>,
    pub max_output_tokens: u32,
}

impl ModelHandle {
    pub fn new(model: impl Into<String>, template: &HandleTemplate) -> Self {
        Self {
            model: model.into(),
            system_instruction: template.system_instruction.clone(),
            safety_settings: template.safety_settings.clone(),
            max_output_tokens: template.max_output_tokens,
        }
    }
}

/// Per-process settings every model handle is stamped from
#[derive(Debug, Clone)]
pub struct HandleTemplate {
    pub system_instruction: Option<Arc<str>>,
    pub safety_settings: Vec<SafetySetting>,
    pub max_output_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafetySetting {
    pub category: &'static str,
    pub threshold: &'static str,
}

/// Block medium-and-above harm in every category the API exposes
pub fn default_safety_settings() -> Vec<SafetySetting> {
    [
        "HARM_CATEGORY_HARASSMENT",
        "HARM_CATEGORY_HATE_SPEECH",
        "HARM_CATEGORY_SEXUALLY_EXPLICIT",
        "HARM_CATEGORY_DANGEROUS_CONTENT",
    ]
    .into_iter()
    .map(|category| SafetySetting {
        category,
        threshold: "BLOCK_MEDIUM_AND_ABOVE",
    })
    .collect()
}

/// Result of a single generate call that reached the API and completed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    /// Non-blank text extracted from the response
    Text(String),
    /// Completed, but no candidate carried any text
    Empty,
    /// Withheld by the API's safety filters
    Blocked { reason: String },
}

impl Generation {
    pub fn kind(&self) -> &'static str {
        match self {
            Generation::Text(_) => "text",
            Generation::Empty => "empty",
            Generation::Blocked { .. } => "blocked",
        }
    }
}

/// Remote model service used by the relay
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Ids of models that support content generation, in API order
    async fn list_models(&self) -> Result<Vec<String>>;

    /// Submit one user message to the model described by `handle`
    async fn generate(&self, handle: &ModelHandle, message: &str) -> Result<Generation>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}
