//! Gemini HTTP client

use super::types::{ApiError, GenerateContentRequest, GenerateContentResponse};
use reqwest::{Client, StatusCode};
use spellkit_core::LlmError;
use std::time::Duration;

const PROVIDER: &str = "gemini";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini API client.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a new Gemini client.
    ///
    /// # Arguments
    /// * `api_key` - Google API key
    /// * `timeout` - Per-request timeout
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Transport {
                provider: PROVIDER.to_string(),
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            api_key: api_key.into().trim().to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different endpoint root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Call `models/{model}:generateContent`.
    pub async fn generate_content(
        &self,
        model: &str,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, LlmError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| LlmError::Transport {
                provider: PROVIDER.to_string(),
                message: format!("HTTP request failed: {}", e),
            })?;

        let status = response.status();

        if status.is_success() {
            return response.json().await.map_err(|e| LlmError::InvalidResponse {
                provider: PROVIDER.to_string(),
                reason: format!("Failed to parse response: {}", e),
            });
        }

        let retry_after_ms = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<i64>().ok())
            .map(|secs| secs * 1000)
            .unwrap_or(0);

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        let error_msg = match serde_json::from_str::<ApiError>(&error_text) {
            Ok(api_error) => match api_error.error.status {
                Some(code) => format!("{}: {}", code, api_error.error.message),
                None => api_error.error.message,
            },
            Err(_) => error_text,
        };

        Err(map_status(status, error_msg, retry_after_ms))
    }
}

fn map_status(status: StatusCode, message: String, retry_after_ms: i64) -> LlmError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimited {
            provider: PROVIDER.to_string(),
            retry_after_ms,
        },
        _ => LlmError::RequestFailed {
            provider: PROVIDER.to_string(),
            status: status.as_u16() as i32,
            message,
        },
    }
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_key() {
        let client = GeminiClient::new("AIzaSecret", Duration::from_secs(5)).unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("AIzaSecret"));
    }

    #[test]
    fn test_base_url_override_trims_slash() {
        let client = GeminiClient::new("k", Duration::from_secs(5))
            .unwrap()
            .with_base_url("http://localhost:8080/v1beta/");
        assert_eq!(client.base_url(), "http://localhost:8080/v1beta");
    }

    #[test]
    fn test_map_status_quota() {
        let err = map_status(StatusCode::TOO_MANY_REQUESTS, "slow".to_string(), 2000);
        assert!(matches!(err, LlmError::RateLimited { retry_after_ms: 2000, .. }));
        assert!(err.is_quota_exhaustion());

        let err = map_status(
            StatusCode::BAD_REQUEST,
            "RESOURCE_EXHAUSTED: quota".to_string(),
            0,
        );
        assert!(err.is_quota_exhaustion());

        let err = map_status(StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string(), 0);
        assert!(!err.is_quota_exhaustion());
    }
}
