//! Error types for worksheet generation

use crate::CategoryId;
use thiserror::Error;

/// Request guardrail conditions. These are "please wait" states, not defects.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GuardrailError {
    #[error("Cooldown active, retry in {remaining_secs}s")]
    CooldownActive { remaining_secs: u64 },

    #[error("Daily request limit of {limit} reached")]
    DailyQuotaExceeded { limit: u32 },

    #[error("QUOTA_LIMIT: provider quota exhausted, cooling down for {cooldown_secs}s")]
    QuotaLimit { cooldown_secs: u64 },
}

/// Generation service errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LlmError {
    #[error("No generation provider configured")]
    ProviderNotConfigured,

    #[error("Request to {provider} failed with status {status}: {message}")]
    RequestFailed {
        provider: String,
        status: i32,
        message: String,
    },

    #[error("Rate limited by {provider}, retry after {retry_after_ms}ms")]
    RateLimited {
        provider: String,
        retry_after_ms: i64,
    },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Transport error talking to {provider}: {message}")]
    Transport { provider: String, message: String },
}

impl LlmError {
    /// Whether this failure carries a provider-side quota or rate exhaustion signature.
    pub fn is_quota_exhaustion(&self) -> bool {
        match self {
            Self::RateLimited { .. } => true,
            Self::RequestFailed {
                status, message, ..
            } => *status == 429 || message_signals_quota(message),
            Self::InvalidResponse { reason, .. } => message_signals_quota(reason),
            Self::Transport { message, .. } => message_signals_quota(message),
            Self::ProviderNotConfigured => false,
        }
    }
}

fn message_signals_quota(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("429")
        || lower.contains("quota")
        || lower.contains("exhausted")
        || lower.contains("resource_exhausted")
}

/// Word set and exercise generation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Generation service unavailable: {reason}")]
    GenerationUnavailable { reason: String },

    #[error("Only {found} valid words found, {required} required for categories {categories:?}")]
    InsufficientValidWords {
        found: usize,
        required: usize,
        categories: Vec<CategoryId>,
    },

    #[error("Enrichment degraded: {reason}")]
    EnrichmentDegraded { reason: String },

    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },
}

/// Dictionary corpus errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DictionaryError {
    #[error("Failed to fetch dictionary from {source_name}: {reason}")]
    FetchFailed { source_name: String, reason: String },
}

/// Persistence boundary errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store I/O failed for {key}: {reason}")]
    Io { key: String, reason: String },

    #[error("Store (de)serialization failed for {key}: {reason}")]
    Serde { key: String, reason: String },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Master error type for all worksheet generation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SpellError {
    #[error("Guardrail: {0}")]
    Guardrail(#[from] GuardrailError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Dictionary error: {0}")]
    Dictionary(#[from] DictionaryError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl SpellError {
    /// Whether the caller should offer a "try again later" path.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Guardrail(GuardrailError::QuotaLimit { .. })
                | Self::Guardrail(GuardrailError::CooldownActive { .. })
        )
    }

    /// Actionable text for the end user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Guardrail(GuardrailError::CooldownActive { remaining_secs }) => format!(
                "The word service is busy. Please wait {} seconds and try again.",
                remaining_secs
            ),
            Self::Guardrail(GuardrailError::QuotaLimit { cooldown_secs }) => format!(
                "The word service has reached its limit. Please wait {} seconds and try again.",
                cooldown_secs
            ),
            Self::Guardrail(GuardrailError::DailyQuotaExceeded { limit }) => format!(
                "The daily limit of {} requests has been reached. Try again tomorrow.",
                limit
            ),
            Self::Generation(GenerationError::InsufficientValidWords { found, .. }) => format!(
                "Only {} suitable words were found. Try different or additional categories.",
                found
            ),
            Self::Generation(GenerationError::InvalidRequest { reason }) => {
                format!("The request is not valid: {}", reason)
            }
            Self::Generation(GenerationError::GenerationUnavailable { .. })
            | Self::Generation(GenerationError::EnrichmentDegraded { .. })
            | Self::Llm(_)
            | Self::Dictionary(_) => {
                "The word service is unavailable right now. Please try again later.".to_string()
            }
            Self::Store(_) | Self::Config(_) => format!("Setup problem: {}", self),
        }
    }
}

/// Result type alias for worksheet generation operations.
pub type SpellResult<T> = Result<T, SpellError>;

// =============================================================================
// TESTS
// =============================================================================
