//! Gemini generation provider implementation

use super::client::GeminiClient;
use super::types::{
    Content, GenerateContentRequest, GenerationConfig, Part, SystemInstruction,
};
use crate::GenerationProvider;
use async_trait::async_trait;
use spellkit_core::{
    GenerationRequest, GenerationResponse, LlmError, ResponseFormat, TokenUsage,
};

/// Default model for worksheet generation.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Gemini generation provider.
pub struct GeminiProvider {
    client: GeminiClient,
    model: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider.
    ///
    /// # Arguments
    /// * `client` - Configured HTTP client
    /// * `model` - Model name (e.g., "gemini-2.0-flash")
    pub fn new(client: GeminiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Create provider with the default model.
    pub fn with_default_model(client: GeminiClient) -> Self {
        Self::new(client, DEFAULT_MODEL)
    }

    fn build_request(request: &GenerationRequest) -> GenerateContentRequest {
        let response_mime_type = match request.response_format {
            ResponseFormat::Json => Some("application/json".to_string()),
            ResponseFormat::Text => None,
        };

        let generation_config =
            if response_mime_type.is_some() || request.temperature.is_some() {
                Some(GenerationConfig {
                    temperature: request.temperature,
                    max_output_tokens: None,
                    response_mime_type,
                })
            } else {
                None
            };

        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(request.prompt.clone()),
                }],
            }],
            system_instruction: request.system_instruction.as_ref().map(|s| SystemInstruction {
                parts: vec![Part {
                    text: Some(s.clone()),
                }],
            }),
            generation_config,
        }
    }
}

#[async_trait]
impl GenerationProvider for GeminiProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, LlmError> {
        let body = Self::build_request(request);
        let response = self.client.generate_content(&self.model, &body).await?;

        let text = response
            .first_text()
            .ok_or_else(|| LlmError::InvalidResponse {
                provider: self.provider_id().to_string(),
                reason: "Missing content".to_string(),
            })?
            .to_string();

        let usage = response.usage_metadata.as_ref().map(|u| TokenUsage {
            prompt_tokens: u.prompt_token_count,
            completion_tokens: u.candidates_token_count,
        });

        tracing::debug!(
            model = %self.model,
            chars = text.len(),
            "Gemini generation completed"
        );

        Ok(GenerationResponse { text, usage })
    }

    fn provider_id(&self) -> &str {
        "gemini"
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("client", &self.client)
            .field("model", &self.model)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_request_json_mode() {
        let request = GenerationRequest::json("geef woorden").with_system("je bent juf");
        let body = GeminiProvider::build_request(&request);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "geef woorden");
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "je bent juf");
        assert_eq!(
            json["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[test]
    fn test_build_request_text_mode() {
        let request = GenerationRequest::text("hint");
        let body = GeminiProvider::build_request(&request);
        assert!(body.generation_config.is_none());
        assert!(body.system_instruction.is_none());

        let request = GenerationRequest::text("hint").with_temperature(0.7);
        let body = GeminiProvider::build_request(&request);
        let config = body.generation_config.unwrap();
        assert_eq!(config.temperature, Some(0.7));
        assert!(config.response_mime_type.is_none());
    }

    #[test]
    fn test_provider_ids() {
        let client = GeminiClient::new("k", std::time::Duration::from_secs(5)).unwrap();
        let provider = GeminiProvider::with_default_model(client);
        assert_eq!(provider.provider_id(), "gemini");
        assert_eq!(provider.model_id(), DEFAULT_MODEL);
    }
}
