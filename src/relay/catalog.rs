// src/relay/catalog.rs
// Process-lifetime caches: discovered model ids and per-model handles

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::Result;
use crate::llm::{GenerationBackend, HandleTemplate, ModelHandle};

// ============================================================================
// Discovered models
// ============================================================================

/// Model ids that support generation, discovered once and kept until restart.
///
/// Only a non-empty discovery is cached. An empty or failed listing is
/// retried on the next call.
#[derive(Default)]
pub struct ModelCatalog {
    discovered: RwLock<Option<Arc<Vec<String>>>>,
}

impl ModelCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached ids, if discovery has already succeeded
    pub async fn cached(&self) -> Option<Arc<Vec<String>>> {
        self.discovered.read().await.clone()
    }

    /// Return the cached ids, listing them from the backend on first use.
    /// Concurrent first calls may both list; the results are equivalent.
    pub async fn ensure(&self, backend: &dyn GenerationBackend) -> Result<Arc<Vec<String>>> {
        if let Some(ids) = self.cached().await {
            return Ok(ids);
        }

        let ids = Arc::new(backend.list_models().await?);
        if ids.is_empty() {
            debug!(backend = backend.name(), "Model discovery returned no generating models");
            return Ok(ids);
        }

        info!(backend = backend.name(), count = ids.len(), models = ?ids, "Discovered generating models");
        let mut slot = self.discovered.write().await;
        Ok(slot.get_or_insert_with(|| ids).clone())
    }
}

// ============================================================================
// Model handles
// ============================================================================

/// Per-model-id handles, each built once from the shared template.
pub struct HandleCache {
    template: HandleTemplate,
    handles: RwLock<HashMap<String, Arc<ModelHandle>>>,
}

impl HandleCache {
    pub fn new(template: HandleTemplate) -> Self {
        Self {
            template,
            handles: RwLock::new(HashMap::new()),
        }
    }

    /// Get or create the handle for a model id.
    pub async fn get(&self, model: &str) -> Arc<ModelHandle> {
        // Fast path: handle already built
        {
            let handles = self.handles.read().await;
            if let Some(handle) = handles.get(model) {
                return handle.clone();
            }
        }

        // Slow path: build it
        let mut handles = self.handles.write().await;
        handles
            .entry(model.to_string())
            .or_insert_with(|| Arc::new(ModelHandle::new(model, &self.template)))
            .clone()
    }

    pub async fn len(&self) -> usize {
        self.handles.read().await.len()
    }
}
