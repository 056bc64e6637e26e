//! The worksheet generator: owns the collaborators every workflow needs and
//! routes each model call through the guardrail.

use crate::dictionary::Dictionary;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value;
use spellkit_core::{
    CategoryCatalog, EngineConfig, Fingerprint, GenerationRequest, SpellError, SpellResult,
};
use spellkit_guard::Guardrail;
use spellkit_llm::{decode_json, GenerationProvider, UsageTracker};
use std::sync::Arc;

/// Entry point for word sets, exercises, hints and stories.
///
/// Holds no persistent state of its own; usage and cache live in the
/// guardrail, the word list in the dictionary.
pub struct WorksheetGenerator {
    pub(crate) provider: Arc<dyn GenerationProvider>,
    pub(crate) guardrail: Arc<Guardrail>,
    pub(crate) dictionary: Arc<Dictionary>,
    pub(crate) catalog: Arc<CategoryCatalog>,
    pub(crate) config: EngineConfig,
    usage: UsageTracker,
}

impl WorksheetGenerator {
    pub fn new(
        provider: Arc<dyn GenerationProvider>,
        guardrail: Arc<Guardrail>,
        dictionary: Arc<Dictionary>,
    ) -> Self {
        Self {
            provider,
            guardrail,
            dictionary,
            catalog: Arc::new(CategoryCatalog::builtin().clone()),
            config: EngineConfig::default(),
            usage: UsageTracker::new(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_catalog(mut self, catalog: Arc<CategoryCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &CategoryCatalog {
        &self.catalog
    }

    pub fn guardrail(&self) -> &Guardrail {
        &self.guardrail
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Token usage of calls that actually reached the provider.
    pub fn usage(&self) -> &UsageTracker {
        &self.usage
    }

    /// Fresh generator for one workflow; seeded when the config fixes a seed.
    pub(crate) fn rng(&self) -> StdRng {
        match self.config.shuffle_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    /// Guarded call whose output is decoded as JSON. The decoded value is
    /// what gets cached.
    pub(crate) async fn call_json(
        &self,
        fingerprint: &Fingerprint,
        request: GenerationRequest,
    ) -> SpellResult<Value> {
        self.guardrail
            .execute(fingerprint, || async {
                let response = self.provider.generate(&request).await?;
                self.usage.record(response.usage);
                let value = decode_json(self.provider.provider_id(), &response.text)?;
                Ok::<_, SpellError>(value)
            })
            .await
    }

    /// Guarded call returning trimmed plain text.
    pub(crate) async fn call_text(
        &self,
        fingerprint: &Fingerprint,
        request: GenerationRequest,
    ) -> SpellResult<String> {
        self.guardrail
            .execute(fingerprint, || async {
                let response = self.provider.generate(&request).await?;
                self.usage.record(response.usage);
                Ok::<_, SpellError>(response.text.trim().to_string())
            })
            .await
    }
}

impl std::fmt::Debug for WorksheetGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorksheetGenerator")
            .field("provider", &self.provider.provider_id())
            .field("model", &self.provider.model_id())
            .field("dictionary", &self.dictionary)
            .field("config", &self.config)
            .field("usage", &self.usage)
            .finish()
    }
}
