//! SPELLKIT LLM - Generation Service Boundary
//!
//! Provider-agnostic trait for text generation, call accounting, and
//! tolerant decoding of the untrusted JSON the service returns. Concrete
//! providers live in [`providers`].

use async_trait::async_trait;
use spellkit_core::{GenerationRequest, GenerationResponse, LlmError, TokenUsage};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub mod providers;
pub mod response;

pub use providers::{GeminiClient, GeminiProvider};
pub use response::{clean_json, decode_json, extract_items, field_int, field_str, field_strings};

// ============================================================================
// GENERATION PROVIDER TRAIT
// ============================================================================

/// Trait for generation providers.
/// Implementations must be thread-safe (Send + Sync).
///
/// # Example
/// ```ignore
/// struct MyProvider { /* ... */ }
///
/// #[async_trait]
/// impl GenerationProvider for MyProvider {
///     async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, LlmError> {
///         // Call the service
///     }
///     // ...
/// }
/// ```
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Run one generation call.
    ///
    /// # Returns
    /// * `Ok(GenerationResponse)` - Raw text produced by the service
    /// * `Err(LlmError)` - Transport, status or decoding failure
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, LlmError>;

    /// Stable provider identifier (e.g. "gemini").
    fn provider_id(&self) -> &str;

    /// Model identifier used for requests.
    fn model_id(&self) -> &str;
}

#[async_trait]
impl<P: GenerationProvider + ?Sized> GenerationProvider for Arc<P> {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, LlmError> {
        (**self).generate(request).await
    }

    fn provider_id(&self) -> &str {
        (**self).provider_id()
    }

    fn model_id(&self) -> &str {
        (**self).model_id()
    }
}

// ============================================================================
// USAGE TRACKER
// ============================================================================

/// Tracks token usage across generation calls.
/// Thread-safe via atomic operations.
pub struct UsageTracker {
    calls: AtomicU64,
    prompt_tokens: AtomicU64,
    completion_tokens: AtomicU64,
}

impl UsageTracker {
    pub fn new() -> Self {
        Self {
            calls: AtomicU64::new(0),
            prompt_tokens: AtomicU64::new(0),
            completion_tokens: AtomicU64::new(0),
        }
    }

    /// Record one completed call and its reported usage, if any.
    pub fn record(&self, usage: Option<TokenUsage>) {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if let Some(usage) = usage {
            self.prompt_tokens
                .fetch_add(usage.prompt_tokens as u64, Ordering::Relaxed);
            self.completion_tokens
                .fetch_add(usage.completion_tokens as u64, Ordering::Relaxed);
        }
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    pub fn prompt_tokens(&self) -> u64 {
        self.prompt_tokens.load(Ordering::Relaxed)
    }

    pub fn completion_tokens(&self) -> u64 {
        self.completion_tokens.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.calls.store(0, Ordering::Relaxed);
        self.prompt_tokens.store(0, Ordering::Relaxed);
        self.completion_tokens.store(0, Ordering::Relaxed);
    }
}

impl Default for UsageTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for UsageTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsageTracker")
            .field("calls", &self.calls())
            .field("prompt_tokens", &self.prompt_tokens())
            .field("completion_tokens", &self.completion_tokens())
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoProvider;

    #[async_trait]
    impl GenerationProvider for EchoProvider {
        async fn generate(
            &self,
            request: &GenerationRequest,
        ) -> Result<GenerationResponse, LlmError> {
            Ok(GenerationResponse::new(request.prompt.clone()))
        }

        fn provider_id(&self) -> &str {
            "echo"
        }

        fn model_id(&self) -> &str {
            "echo-1"
        }
    }

    #[tokio::test]
    async fn test_arc_provider_forwards() {
        let provider: Arc<EchoProvider> = Arc::new(EchoProvider);
        let response = provider
            .generate(&GenerationRequest::json("{}"))
            .await
            .unwrap();
        assert_eq!(response.text, "{}");
        assert_eq!(provider.model_id(), "echo-1");
    }

    #[test]
    fn test_usage_tracker() {
        let tracker = UsageTracker::new();
        tracker.record(Some(TokenUsage {
            prompt_tokens: 10,
            completion_tokens: 5,
        }));
        tracker.record(None);
        assert_eq!(tracker.calls(), 2);
        assert_eq!(tracker.prompt_tokens(), 10);
        assert_eq!(tracker.completion_tokens(), 5);

        tracker.reset();
        assert_eq!(tracker.calls(), 0);
    }
}
