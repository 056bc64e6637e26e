//! Google Gemini provider implementation
//!
//! API-key based access to the Generative Language API.

pub mod client;
pub mod generation;
pub mod types;

pub use client::GeminiClient;
pub use generation::GeminiProvider;
