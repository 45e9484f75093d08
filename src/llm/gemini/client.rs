// src/llm/gemini/client.rs
// Google Gemini REST client (generateContent + models.list)
// Authenticates via the `x-goog-api-key` header so the key never appears in a URL

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};
use url::Url;

use super::extraction::{classify_response, generating_model_id};
use super::types::{
    GeminiContent, GeminiErrorEnvelope, GeminiRequest, GeminiResponse, GeminiSafetySetting,
    GeminiSystemInstruction, GeminiTextPart, GenerationConfig, ListModelsResponse,
};
use crate::error::{RelayError, Result};
use crate::llm::{Generation, GenerationBackend, ModelHandle};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Upper bound on models.list pages followed during discovery
const MAX_MODEL_PAGES: usize = 20;
const MODEL_PAGE_SIZE: &str = "1000";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Google Gemini API client
pub struct GeminiClient {
    http: HttpClient,
    api_key: Option<String>,
    api_base: Url,
}

impl GeminiClient {
    /// Create a client against `api_base` (e.g. `.../v1beta`).
    /// A missing key is allowed; every call then fails with `MissingApiKey`.
    pub fn new(api_key: Option<String>, api_base: Url, timeout: Duration) -> Result<Self> {
        let http = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self::with_http_client(api_key, api_base, http))
    }

    /// Create a client with a shared HTTP client
    pub fn with_http_client(api_key: Option<String>, api_base: Url, http: HttpClient) -> Self {
        Self {
            http,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            api_base,
        }
    }

    fn key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or(RelayError::MissingApiKey)
    }

    /// `{base}/{segments...}`, each segment percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| RelayError::Config(format!("API base {} cannot take a path", self.api_base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn build_request(handle: &ModelHandle, message: &str) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiTextPart {
                    text: message.to_string(),
                }],
            }],
            system_instruction: handle.system_instruction.as_ref().map(|s| GeminiSystemInstruction {
                parts: vec![GeminiTextPart { text: s.to_string() }],
            }),
            safety_settings: handle
                .safety_settings
                .iter()
                .map(|s| GeminiSafetySetting {
                    category: s.category.to_string(),
                    threshold: s.threshold.to_string(),
                })
                .collect(),
            generation_config: GenerationConfig {
                max_output_tokens: handle.max_output_tokens,
            },
        }
    }

    /// Turn a non-2xx response into `RelayError::Upstream`
    async fn error_from(response: reqwest::Response) -> RelayError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<GeminiErrorEnvelope>(&body)
            .ok()
            .and_then(|e| e.error)
            .and_then(|e| e.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "Unknown error".to_string());
        RelayError::Upstream { status, message }
    }

    async fn list_page(&self, page_token: Option<&str>) -> Result<ListModelsResponse> {
        let key = self.key()?;
        let mut url = self.endpoint(&["models"])?;
        url.query_pairs_mut().append_pair("pageSize", MODEL_PAGE_SIZE);
        if let Some(token) = page_token {
            url.query_pairs_mut().append_pair("pageToken", token);
        }

        let response = self.http.get(url).header(API_KEY_HEADER, key).send().await?;
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl GenerationBackend for GeminiClient {
    async fn list_models(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        let mut token: Option<String> = None;

        for _ in 0..MAX_MODEL_PAGES {
            let page = self
                .list_page(token.as_deref())
                .await
                .map_err(|e| RelayError::Discovery(e.to_string()))?;
            ids.extend(page.models.iter().filter_map(generating_model_id));
            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(next) => token = Some(next),
                None => break,
            }
        }

        debug!(count = ids.len(), "Listed generating models");
        Ok(ids)
    }

    #[instrument(skip(self, handle, message), fields(model = %handle.model))]
    async fn generate(&self, handle: &ModelHandle, message: &str) -> Result<Generation> {
        let start = Instant::now();
        let key = self.key()?;
        let method = format!("{}:generateContent", handle.model);
        let url = self.endpoint(&["models", method.as_str()])?;
        let request = Self::build_request(handle, message);

        let response = self
            .http
            .post(url)
            .header(API_KEY_HEADER, key)
            .json(&request)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let body = response.text().await?;
        let data: GeminiResponse = serde_json::from_str(&body)?;
        let generation = classify_response(&data);

        debug!(
            duration_ms = start.elapsed().as_millis() as u64,
            outcome = generation.kind(),
            "Gemini generateContent completed"
        );
        Ok(generation)
    }

    fn name(&self) -> &'static str {
        "Gemini"
    }
}
