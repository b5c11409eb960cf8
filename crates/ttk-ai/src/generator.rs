//! Script generation service.

use std::sync::Arc;

use tracing::{info, warn};

use ttk_models::{InMemoryMemo, Memo, ScriptSet};

use crate::client::OpenRouterClient;
use crate::config::AiConfig;
use crate::error::GenerationResult;
use crate::payload::ScriptPayload;

/// Turns transcripts into validated script sets, memoized by transcript text.
#[derive(Clone)]
pub struct ScriptGenerator {
    client: Arc<OpenRouterClient>,
    cache: Arc<dyn Memo<ScriptSet>>,
}

impl ScriptGenerator {
    pub fn new(client: OpenRouterClient, cache: Arc<dyn Memo<ScriptSet>>) -> Self {
        Self {
            client: Arc::new(client),
            cache,
        }
    }

    pub fn from_config(config: &AiConfig) -> GenerationResult<Self> {
        Ok(Self::new(
            OpenRouterClient::new(config)?,
            Arc::new(InMemoryMemo::<ScriptSet>::new()),
        ))
    }

    /// Ten validated scripts for `transcript`.
    ///
    /// A memo hit returns without touching the provider (or checking the key).
    pub async fn generate_scripts(&self, transcript: &str) -> GenerationResult<ScriptSet> {
        if let Some(cached) = self.cache.get(transcript).await {
            metrics::counter!("ttk_memo_hits_total", "memo" => "scripts").increment(1);
            return Ok(cached);
        }

        let content = self.client.complete(transcript).await?;

        let scripts = ScriptPayload::parse(&content)
            .and_then(ScriptPayload::into_script_set)
            .inspect_err(|e| warn!(error = %e, "Rejected model output"))?;

        info!(model = %self.client.model(), count = scripts.len(), "Generated scripts");
        self.cache.set(transcript.to_string(), scripts.clone()).await;
        Ok(scripts)
    }

    /// Forget every memoized generation.
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }
}
