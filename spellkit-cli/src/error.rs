//! Error types for the command-line front end.

use crate::args::ArgsError;
use crate::config::ConfigError;
use spellkit_core::SpellError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Args(#[from] ArgsError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Spell(#[from] SpellError),
    #[error("Failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
    #[error("Failed to init logging: {0}")]
    Telemetry(String),
}

impl CliError {
    /// Text shown to the person running the command.
    pub fn user_message(&self) -> String {
        match self {
            Self::Spell(err) => err.user_message(),
            other => other.to_string(),
        }
    }

    /// Process exit code. Retryable guardrail refusals get their own code so
    /// scripts can back off.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Args(_) => 2,
            Self::Spell(err) if err.is_retryable() => 75,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spellkit_core::{GenerationError, GuardrailError};

    #[test]
    fn test_spell_errors_use_user_message() {
        let err = CliError::from(SpellError::from(GuardrailError::CooldownActive {
            remaining_secs: 12,
        }));
        assert!(err.user_message().contains("12 seconds"));
        assert_eq!(err.exit_code(), 75);
    }

    #[test]
    fn test_exit_codes() {
        let usage = CliError::from(ArgsError::MissingCommand);
        assert_eq!(usage.exit_code(), 2);

        let fatal = CliError::from(SpellError::from(GenerationError::InsufficientValidWords {
            found: 3,
            required: 15,
            categories: vec![2],
        }));
        assert_eq!(fatal.exit_code(), 1);
        assert!(fatal.user_message().contains("Only 3"));
    }
}
