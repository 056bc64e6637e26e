//! Generation request and response primitives.
//!
//! Pure data types for generation calls. The provider trait and HTTP clients live in spellkit-llm.

use serde::{Deserialize, Serialize};

// ============================================================================
// REQUEST
// ============================================================================

/// Output format the provider is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseFormat {
    /// A single JSON document
    Json,
    /// Free text
    Text,
}

impl ResponseFormat {
    /// Convert to string representation.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            Self::Json => "Json",
            Self::Text => "Text",
        }
    }

    /// Parse from string representation.
    pub fn from_db_str(s: &str) -> Result<Self, ResponseFormatParseError> {
        match s {
            "Json" => Ok(Self::Json),
            "Text" => Ok(Self::Text),
            _ => Err(ResponseFormatParseError(s.to_string())),
        }
    }
}

/// Error parsing ResponseFormat from string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseFormatParseError(pub String);

impl std::fmt::Display for ResponseFormatParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid response format: {}", self.0)
    }
}

impl std::error::Error for ResponseFormatParseError {}

/// A structured instruction pair sent to the generation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// System instruction (persona and output contract)
    pub system_instruction: Option<String>,
    /// Task instruction
    pub prompt: String,
    pub response_format: ResponseFormat,
    pub temperature: Option<f32>,
}

impl GenerationRequest {
    /// A JSON-producing request with no system instruction.
    pub fn json(prompt: impl Into<String>) -> Self {
        Self {
            system_instruction: None,
            prompt: prompt.into(),
            response_format: ResponseFormat::Json,
            temperature: None,
        }
    }

    /// A free-text request with no system instruction.
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            system_instruction: None,
            prompt: prompt.into(),
            response_format: ResponseFormat::Text,
            temperature: None,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system_instruction = Some(system.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

// ============================================================================
// RESPONSE
// ============================================================================

/// Token accounting reported by the provider, when available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// Raw text returned by the generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub text: String,
    pub usage: Option<TokenUsage>,
}

impl GenerationResponse {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_format_roundtrip() {
        for format in [ResponseFormat::Json, ResponseFormat::Text] {
            assert_eq!(ResponseFormat::from_db_str(format.as_db_str()), Ok(format));
        }
        assert!(ResponseFormat::from_db_str("Xml").is_err());
    }

    #[test]
    fn test_request_builders() {
        let req = GenerationRequest::json("list words")
            .with_system("you are a teacher")
            .with_temperature(0.7);
        assert_eq!(req.response_format, ResponseFormat::Json);
        assert_eq!(req.system_instruction.as_deref(), Some("you are a teacher"));
        assert_eq!(req.temperature, Some(0.7));
    }
}
