// src/error.rs
// Error types for the relay

use thiserror::Error;

/// Main error type for the relay library
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Invalid message")]
    InvalidMessage,

    #[error("GEMINI_API_KEY is not set; add it to the environment or a .env file")]
    MissingApiKey,

    #[error("HTTP {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Stored without the request URL
    #[error("transport error: {0}")]
    Transport(reqwest::Error),

    #[error("failed to decode upstream response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("ListModels failed: {0}")]
    Discovery(String),

    #[error("No candidate models to try. Set MODEL_ID or check model access for this API key.")]
    NoCandidates,

    #[error("Empty response from model. Tried models: {}", .tried.join(", "))]
    EmptyReply { tried: Vec<String> },

    #[error(
        "Failed to generate reply. Tried models: {}. Errors: {}",
        .tried.join(", "),
        .failures.join(" | ")
    )]
    Exhausted {
        tried: Vec<String>,
        failures: Vec<String>,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience type alias for Result using RelayError
pub type Result<T> = std::result::Result<T, RelayError>;

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        RelayError::Transport(err.without_url())
    }
}

impl RelayError {
    /// HTTP status reported by the upstream API, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            RelayError::Upstream { status, .. } => Some(*status),
            RelayError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the failure means "this model id is unknown or cannot generate".
    /// Only these errors let the fallback loop move on to the next candidate.
    pub fn is_model_unavailable(&self) -> bool {
        if self.status() == Some(404) {
            return true;
        }
        match self {
            RelayError::Upstream { message, .. } => mentions_unsupported(message),
            RelayError::Transport(e) => mentions_unsupported(&e.to_string()),
            _ => false,
        }
    }
}

fn mentions_unsupported(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("not found") || lower.contains("unsupported") || lower.contains("not supported")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upstream(status: u16, message: &str) -> RelayError {
        RelayError::Upstream {
            status,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_404_is_model_unavailable() {
        assert!(upstream(404, "whatever").is_model_unavailable());
    }

    #[test]
    fn test_message_text_marks_unavailable() {
        assert!(upstream(400, "models/gemini-x is not found for API version v1").is_model_unavailable());
        assert!(upstream(400, "Model Unsupported for generateContent").is_model_unavailable());
        assert!(upstream(400, "method is not supported by this model").is_model_unavailable());
    }

    #[test]
    fn test_auth_and_quota_errors_are_fatal() {
        assert!(!upstream(403, "API key not valid").is_model_unavailable());
        assert!(!upstream(429, "Resource has been exhausted").is_model_unavailable());
        assert!(!RelayError::MissingApiKey.is_model_unavailable());
    }

    #[test]
    fn test_upstream_display() {
        assert_eq!(upstream(500, "boom").to_string(), "HTTP 500: boom");
    }

    #[tokio::test]
    async fn test_transport_error_drops_request_url() {
        let err = reqwest::Client::builder()
            .no_proxy()
            .build()
            .unwrap()
            .get("http://127.0.0.1:9/v1beta/models/not-found-model?key=hunter2")
            .send()
            .await
            .unwrap_err();
        let err = RelayError::from(err);

        let text = err.to_string();
        assert!(!text.contains("hunter2"), "{text}");
        assert!(!text.contains("not-found-model"), "{text}");
        assert!(!err.is_model_unavailable());
    }

    #[test]
    fn test_exhausted_lists_every_attempt() {
        let err = RelayError::Exhausted {
            tried: vec!["a".into(), "b".into()],
            failures: vec!["a: 404 HTTP 404: gone".into(), "b: empty response".into()],
        };
        let text = err.to_string();
        assert!(text.contains("Tried models: a, b"));
        assert!(text.contains("a: 404 HTTP 404: gone | b: empty response"));
    }
}
