//! Model selection and fallback
//!
//! [`Relay`] owns the process-scoped state (discovered models, model
//! handles) and turns one user message into reply text by walking the
//! candidate list:
//! - operator override first
//! - preferred models that discovery confirmed (or all of them, without discovery)
//! - remaining discovered models

pub mod candidates;
pub mod catalog;
pub mod fallback;

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::RelayConfig;
use crate::error::{RelayError, Result};
use crate::llm::{default_safety_settings, GenerationBackend, HandleTemplate};

pub use candidates::{build_candidates, default_preferred, PREFERRED_MODELS};
pub use catalog::{HandleCache, ModelCatalog};
pub use fallback::{AttemptOutcome, Sweep, SAFETY_APOLOGY};

/// Settings the relay needs beyond the backend itself
#[derive(Debug, Clone)]
pub struct RelaySettings {
    pub model_override: Option<String>,
    pub preferred: Vec<String>,
    pub template: HandleTemplate,
}

impl RelaySettings {
    pub fn from_config(config: &RelayConfig) -> Self {
        Self {
            model_override: config.model_override.clone(),
            preferred: default_preferred(),
            template: HandleTemplate {
                system_instruction: config.persona.prompt().map(Arc::from),
                safety_settings: default_safety_settings(),
                max_output_tokens: config.max_output_tokens,
            },
        }
    }
}

pub struct Relay {
    backend: Arc<dyn GenerationBackend>,
    catalog: ModelCatalog,
    handles: HandleCache,
    model_override: Option<String>,
    preferred: Vec<String>,
}

impl Relay {
    pub fn new(backend: Arc<dyn GenerationBackend>, settings: RelaySettings) -> Self {
        Self {
            backend,
            catalog: ModelCatalog::new(),
            handles: HandleCache::new(settings.template),
            model_override: settings.model_override,
            preferred: settings.preferred,
        }
    }

    /// Discovered generating models; errors when the listing fails
    pub async fn discovered_models(&self) -> Result<Arc<Vec<String>>> {
        self.catalog.ensure(self.backend.as_ref()).await
    }

    /// The ordered try list. A failed discovery is logged and treated as
    /// "no filter available".
    pub async fn candidates(&self) -> Vec<String> {
        let available = match self.discovered_models().await {
            Ok(ids) => ids,
            Err(e) => {
                warn!(error = %e, "Model discovery failed; using preferred list as-is");
                Arc::new(Vec::new())
            }
        };
        build_candidates(self.model_override.as_deref(), &self.preferred, &available)
    }

    /// Generate a reply, trying candidates in order. At most one upstream
    /// call per candidate.
    pub async fn generate_reply(&self, message: &str) -> Result<String> {
        let candidates = self.candidates().await;
        if candidates.is_empty() {
            return Err(RelayError::NoCandidates);
        }
        debug!(candidates = ?candidates, "Candidate order");

        let mut sweep = Sweep::default();
        for (attempt, model) in candidates.iter().enumerate() {
            let handle = self.handles.get(model).await;
            let result = self.backend.generate(&handle, message).await;
            let outcome = AttemptOutcome::classify(model, result);

            if let Some(text) = sweep.record(model, outcome)? {
                info!(model = %model, attempt = attempt + 1, chars = text.len(), "Reply generated");
                return Ok(text);
            }
        }

        Err(sweep.into_error())
    }
}
