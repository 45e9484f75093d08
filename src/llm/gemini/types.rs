// src/llm/gemini/types.rs
// Gemini REST request/response types (generateContent + models.list)

use serde::{Deserialize, Serialize};

// ============================================================================
// Request
// ============================================================================

#[derive(Debug, Serialize)]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<GeminiSystemInstruction>,
    #[serde(rename = "safetySettings", skip_serializing_if = "Vec::is_empty")]
    pub safety_settings: Vec<GeminiSafetySetting>,
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub struct GeminiContent {
    pub role: String,
    pub parts: Vec<GeminiTextPart>,
}

#[derive(Debug, Serialize)]
pub struct GeminiSystemInstruction {
    pub parts: Vec<GeminiTextPart>,
}

#[derive(Debug, Serialize)]
pub struct GeminiTextPart {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct GeminiSafetySetting {
    pub category: String,
    pub threshold: String,
}

#[derive(Debug, Serialize)]
pub struct GenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    pub max_output_tokens: u32,
}

// ============================================================================
// Response
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
    #[serde(rename = "promptFeedback")]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GeminiCandidate {
    pub content: Option<GeminiContentResponse>,
    #[serde(rename = "finishReason")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GeminiContentResponse {
    #[serde(default)]
    pub parts: Vec<GeminiPartResponse>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GeminiPartResponse {
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PromptFeedback {
    #[serde(rename = "blockReason")]
    pub block_reason: Option<String>,
}

/// Error envelope returned with non-2xx statuses
#[derive(Debug, Default, Deserialize)]
pub struct GeminiErrorEnvelope {
    pub error: Option<GeminiError>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GeminiError {
    pub code: Option<u16>,
    pub message: Option<String>,
    pub status: Option<String>,
}

// ============================================================================
// models.list
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct ListModelsResponse {
    #[serde(default)]
    pub models: Vec<GeminiModel>,
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GeminiModel {
    pub name: Option<String>,
    #[serde(rename = "supportedGenerationMethods", default)]
    pub supported_generation_methods: Vec<String>,
}
