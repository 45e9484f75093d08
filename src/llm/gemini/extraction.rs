// src/llm/gemini/extraction.rs
// Response extraction helpers for Gemini API responses

use super::types::{GeminiModel, GeminiResponse};
use crate::llm::Generation;

/// Finish reasons that mean the output was withheld rather than produced
const BLOCKED_FINISH_REASONS: &[&str] = &["SAFETY", "BLOCKLIST", "PROHIBITED_CONTENT", "SPII"];

const GENERATE_METHOD: &str = "generateContent";

/// Classify a completed generateContent response.
///
/// The first non-blank text part across all candidates wins. With no text,
/// a prompt block reason or a safety finish reason marks the reply as
/// withheld; anything else is an empty completion.
pub fn classify_response(response: &GeminiResponse) -> Generation {
    if let Some(text) = first_text(response) {
        return Generation::Text(text);
    }

    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.clone())
    {
        return Generation::Blocked { reason };
    }

    let blocked = response
        .candidates
        .iter()
        .filter_map(|c| c.finish_reason.as_deref())
        .find(|r| BLOCKED_FINISH_REASONS.contains(r));

    match blocked {
        Some(reason) => Generation::Blocked {
            reason: reason.to_string(),
        },
        None => Generation::Empty,
    }
}

fn first_text(response: &GeminiResponse) -> Option<String> {
    response
        .candidates
        .iter()
        .filter_map(|c| c.content.as_ref())
        .flat_map(|content| content.parts.iter())
        .filter_map(|part| part.text.as_deref())
        .find(|text| !text.trim().is_empty())
        .map(str::to_string)
}

/// Model id (without the `models/` prefix) if the model can generate content
pub fn generating_model_id(model: &GeminiModel) -> Option<String> {
    if !model.supported_generation_methods.iter().any(|m| m == GENERATE_METHOD) {
        return None;
    }
    let name = model.name.as_deref()?;
    let id = name.strip_prefix("models/").unwrap_or(name);
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}
