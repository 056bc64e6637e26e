//! Generation provider implementations
//!
//! Concrete implementations of the GenerationProvider trait.

pub mod gemini;

pub use gemini::{GeminiClient, GeminiProvider};
