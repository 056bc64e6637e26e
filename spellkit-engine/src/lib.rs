//! Spellkit Engine - Worksheet Generation Orchestration
//!
//! Turns unreliable model output into worksheet content:
//! - [`Dictionary`]: one corpus fetch per session, case-insensitive lookup
//! - [`select_strategy`]: (tier, stage) table of generation tasks
//! - [`WorksheetGenerator::generate_word_set`]: candidates, Gold/Silver/Bronze
//!   ranking, quota-balanced selection, enrichment
//! - [`WorksheetGenerator::generate_exercises`]: both exercise stages with
//!   deterministic metadata fallbacks
//! - Spelling hints and reading stories
//!
//! Every model call goes through the [`spellkit_guard::Guardrail`].

pub mod candidates;
pub mod dictionary;
pub mod exercises;
pub mod fallback;
mod feedback;
mod generator;
pub mod profile;
pub mod selection;
mod story;
pub mod strategy;
mod words;

pub use dictionary::{
    normalize, CorpusSource, Dictionary, HttpCorpusSource, StaticCorpus, DEFAULT_CORPUS_URL,
};
pub use feedback::{CASE_ONLY, CORRECT};
pub use generator::WorksheetGenerator;
pub use profile::GradeProfile;
pub use selection::select_words;
pub use story::{FALLBACK_STORY, MAX_STORY_SENTENCES};
pub use strategy::{item_kind, select_strategy};
pub use words::with_placeholders;
