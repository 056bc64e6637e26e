//! Spelling hints and reading stories.

use serde_json::json;
use spellkit_core::{GradeLevel, GuardrailConfig, LlmError};
use spellkit_engine::{Dictionary, WorksheetGenerator, CASE_ONLY, CORRECT, FALLBACK_STORY};
use spellkit_guard::Guardrail;
use spellkit_test_utils::fixtures;
use spellkit_test_utils::{FailingProvider, GenerationProvider, ScriptedProvider};
use std::sync::Arc;
use std::time::Duration;

const ZINGWOORD_RULE: &str = "Net als bij ding dong.";

fn generator(provider: Arc<dyn GenerationProvider>) -> WorksheetGenerator {
    let config = GuardrailConfig::default().with_min_interval(Duration::ZERO);
    WorksheetGenerator::new(
        provider,
        Arc::new(Guardrail::in_memory(config).unwrap()),
        Arc::new(Dictionary::preloaded(fixtures::dictionary_words())),
    )
}

#[tokio::test]
async fn test_correct_and_case_only_attempts_answer_locally() {
    let provider = Arc::new(ScriptedProvider::new());
    let gen = generator(provider.clone());

    let exact = gen.spelling_hint("koning", " koning ", 2, GradeLevel::Group4).await;
    assert_eq!(exact, CORRECT);

    let case = gen.spelling_hint("Anna's", "anna's", 16, GradeLevel::Group6).await;
    assert_eq!(case, CASE_ONLY);

    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_hint_comes_from_model() {
    let provider = Arc::new(ScriptedProvider::with_replies(["  Denk aan ding dong!  "]));
    let gen = generator(provider.clone());

    let hint = gen.spelling_hint("koning", "konink", 2, GradeLevel::Group4).await;
    assert_eq!(hint, "Denk aan ding dong!");

    let request = &provider.requests()[0];
    assert_eq!(request.temperature, Some(0.7));
    assert!(request.prompt.contains("konink"));
    assert!(request.system_instruction.is_some());
}

#[tokio::test]
async fn test_hint_prompt_includes_class_rhyme() {
    let provider = Arc::new(ScriptedProvider::with_replies(["Denk aan de rap!"]));
    let gen = generator(provider.clone());

    let hint = gen.spelling_hint("trein", "trijn", 36, GradeLevel::Group5).await;
    assert_eq!(hint, "Denk aan de rap!");

    let prompt = &provider.requests()[0].prompt;
    assert!(prompt.contains("EI RAP:"));
    assert!(prompt.contains("Onze geit staat in de wei"));
}

#[tokio::test]
async fn test_hint_revealing_answer_falls_back_to_rule() {
    let provider = Arc::new(ScriptedProvider::with_replies(["Het is KONING met ng."]));
    let gen = generator(provider);

    let hint = gen.spelling_hint("koning", "konink", 2, GradeLevel::Group4).await;
    assert_eq!(hint, ZINGWOORD_RULE);
}

#[tokio::test]
async fn test_hint_failure_falls_back_to_rule() {
    let gen = generator(Arc::new(FailingProvider::new(LlmError::Transport {
        provider: "failing".to_string(),
        message: "timeout".to_string(),
    })));

    let hint = gen.spelling_hint("koning", "konig", 2, GradeLevel::Group5).await;
    assert_eq!(hint, ZINGWOORD_RULE);
}

#[tokio::test]
async fn test_story_is_capped_and_bolded() {
    let story = "De koning had een hond. De **hond** blafte. Drie. Vier. Vijf. Zes. Zeven. \
                 Acht. Negen. Tien. Elf. Twaalf.";
    let provider = Arc::new(ScriptedProvider::with_replies([
        json!({ "story": story }).to_string()
    ]));
    let gen = generator(provider.clone());
    let words = fixtures::word_items(&[("koning", 2), ("hond", 8)]);

    let text = gen.generate_story(&words, GradeLevel::Group5).await;

    assert!(text.starts_with("De **koning** had een hond. De **hond** blafte."));
    assert!(text.ends_with("Tien."));
    assert!(!text.contains("Elf"));
    assert!(provider.requests()[0].prompt.contains("koning, hond"));
}

#[tokio::test]
async fn test_story_failure_uses_fallback_text() {
    let words = fixtures::word_items(&[("koning", 2)]);

    let failing = generator(Arc::new(FailingProvider::unavailable()));
    assert_eq!(failing.generate_story(&words, GradeLevel::Group4).await, FALLBACK_STORY);

    let wrong_shape = generator(Arc::new(ScriptedProvider::with_replies([r#"{"title": "x"}"#])));
    assert_eq!(wrong_shape.generate_story(&words, GradeLevel::Group4).await, FALLBACK_STORY);
}
