//! Wire types for the chat and health endpoints

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RelayError, Result};

/// Inbound chat message. `message` must be a string that is non-empty
/// after trimming; the untrimmed text is what gets forwarded.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ChatRequest {
    pub message: String,
}

impl ChatRequest {
    /// Validate an arbitrary JSON body
    pub fn from_value(body: &Value) -> Result<Self> {
        match body.get("message").and_then(Value::as_str) {
            Some(message) if !message.trim().is_empty() => Ok(Self {
                message: message.to_string(),
            }),
            _ => Err(RelayError::InvalidMessage),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ChatReply {
    pub reply: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub models: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthResponse {
    pub fn healthy(models: Vec<String>) -> Self {
        Self {
            ok: true,
            models: Some(models),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            models: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_message_kept_untrimmed() {
        let req = ChatRequest::from_value(&json!({"message": "  hi  "})).unwrap();
        assert_eq!(req.message, "  hi  ");
    }

    #[test]
    fn test_single_character_accepted() {
        assert!(ChatRequest::from_value(&json!({"message": "x"})).is_ok());
    }

    #[test]
    fn test_invalid_messages_rejected() {
        for body in [
            json!({}),
            json!({"message": ""}),
            json!({"message": " \n\t "}),
            json!({"message": 42}),
            json!({"message": null}),
            json!({"message": ["hi"]}),
            json!("hi"),
            json!(null),
        ] {
            assert!(
                matches!(ChatRequest::from_value(&body), Err(RelayError::InvalidMessage)),
                "accepted {body}"
            );
        }
    }

    #[test]
    fn test_health_serialization() {
        let ok = serde_json::to_value(HealthResponse::healthy(vec!["gemini-pro".into()])).unwrap();
        assert_eq!(ok, json!({"ok": true, "models": ["gemini-pro"]}));

        let failed = serde_json::to_value(HealthResponse::failed("ListModels failed: HTTP 403")).unwrap();
        assert_eq!(failed, json!({"ok": false, "error": "ListModels failed: HTTP 403"}));
    }
}
