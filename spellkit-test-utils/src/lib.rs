//! SPELLKIT Test Utilities
//!
//! Shared test infrastructure for the SPELLKIT workspace:
//! - Scripted and failing generation providers
//! - Proptest generators for grades, category sets and words
//! - Fixtures: word lists, a small dictionary corpus, model payloads
//! - Assertions for word sets and exercise sets

pub use spellkit_core::{
    CategoryCatalog, CategoryId, ExerciseItem, ExerciseKind, ExerciseSet, GenerationRequest,
    GenerationResponse, GradeLevel, GradeTier, LlmError, SpellError, SpellResult, Stage,
    WordItem,
};
pub use spellkit_llm::GenerationProvider;

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

// ============================================================================
// MOCK PROVIDERS
// ============================================================================

/// Provider that replays a queue of canned replies in order.
///
/// Every request is recorded. Once the queue runs dry each further call
/// fails with `InvalidResponse`.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    requests: Mutex<Vec<GenerationRequest>>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue several successful replies at once.
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let provider = Self::new();
        for reply in replies {
            provider.push_text(reply);
        }
        provider
    }

    pub fn push_text(&self, text: impl Into<String>) -> &Self {
        if let Ok(mut q) = self.replies.lock() {
            q.push_back(Ok(text.into()));
        }
        self
    }

    pub fn push_error(&self, error: LlmError) -> &Self {
        if let Ok(mut q) = self.replies.lock() {
            q.push_back(Err(error));
        }
        self
    }

    /// Number of `generate` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests received so far, in call order.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Replies not yet consumed.
    pub fn remaining(&self) -> usize {
        self.replies.lock().map(|q| q.len()).unwrap_or(0)
    }
}

#[async_trait]
impl GenerationProvider for ScriptedProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut r) = self.requests.lock() {
            r.push(request.clone());
        }
        let next = self.replies.lock().ok().and_then(|mut q| q.pop_front());
        match next {
            Some(Ok(text)) => Ok(GenerationResponse::new(text)),
            Some(Err(e)) => Err(e),
            None => Err(LlmError::InvalidResponse {
                provider: "scripted".to_string(),
                reason: "no scripted reply left".to_string(),
            }),
        }
    }

    fn provider_id(&self) -> &str {
        "scripted"
    }

    fn model_id(&self) -> &str {
        "scripted-model"
    }
}

/// Provider that fails every call with the same error.
#[derive(Debug)]
pub struct FailingProvider {
    error: LlmError,
    calls: AtomicUsize,
}

impl FailingProvider {
    pub fn new(error: LlmError) -> Self {
        Self {
            error,
            calls: AtomicUsize::new(0),
        }
    }

    /// Fails like a provider that ran out of quota.
    pub fn quota_exhausted() -> Self {
        Self::new(LlmError::RateLimited {
            provider: "failing".to_string(),
            retry_after_ms: 0,
        })
    }

    /// Fails like a provider that is down.
    pub fn unavailable() -> Self {
        Self::new(LlmError::RequestFailed {
            provider: "failing".to_string(),
            status: 503,
            message: "service unavailable".to_string(),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationProvider for FailingProvider {
    async fn generate(&self, _request: &GenerationRequest) -> Result<GenerationResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(self.error.clone())
    }

    fn provider_id(&self) -> &str {
        "failing"
    }

    fn model_id(&self) -> &str {
        "failing-model"
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for SPELLKIT domain values.

    use super::*;
    use proptest::prelude::*;
    use proptest::sample::subsequence;

    /// Any grade level.
    pub fn arb_grade_level() -> impl Strategy<Value = GradeLevel> {
        prop::sample::select(GradeLevel::ALL.to_vec())
    }

    /// Any grade tier.
    pub fn arb_grade_tier() -> impl Strategy<Value = GradeTier> {
        prop::sample::select(GradeTier::ALL.to_vec())
    }

    /// Any stage.
    pub fn arb_stage() -> impl Strategy<Value = Stage> {
        prop::sample::select(Stage::ALL.to_vec())
    }

    /// One to three distinct categories offered for `grade`, in id order.
    pub fn arb_category_set(grade: GradeLevel) -> impl Strategy<Value = Vec<CategoryId>> {
        let allowed = CategoryCatalog::builtin().allowed_for(grade).to_vec();
        (1usize..=3).prop_flat_map(move |n| subsequence(allowed.clone(), n))
    }

    /// A grade together with a category set valid for it.
    pub fn arb_grade_and_categories() -> impl Strategy<Value = (GradeLevel, Vec<CategoryId>)> {
        arb_grade_level().prop_flat_map(|g| (Just(g), arb_category_set(g)))
    }

    /// A lowercase word of plain letters.
    pub fn arb_word() -> impl Strategy<Value = String> {
        "[a-z]{2,12}"
    }

    /// A word with noise the candidate filter has to cope with.
    pub fn arb_noisy_word() -> impl Strategy<Value = String> {
        prop_oneof![
            arb_word(),
            arb_word().prop_map(|w| w.to_uppercase()),
            arb_word().prop_map(|w| format!(" {} ", w)),
            (arb_word(), arb_word()).prop_map(|(a, b)| format!("{} {}", a, b)),
            Just(String::new()),
            "[a-z]{1,3}-[a-z]{1,5}",
        ]
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    //! Canned words, corpora and model payloads.

    use super::*;
    use serde_json::{json, Value};

    /// Words that pass the rule check of their category.
    pub fn rule_words(category: CategoryId) -> &'static [&'static str] {
        match category {
            2 => &[
                "ring", "bank", "ding", "koning", "slang", "vink", "drank", "tong", "bang",
                "kring", "plank", "wang", "stank", "link", "long", "zink",
            ],
            3 => &[
                "lucht", "nacht", "licht", "recht", "zacht", "knecht", "gracht", "tocht",
                "vracht", "bocht", "kracht", "macht", "pacht", "specht", "schicht", "wicht",
            ],
            8 => &[
                "hond", "kind", "bed", "bord", "land", "web", "hand", "wand", "rib", "krab",
                "brood", "paard", "woord", "tand", "mond", "veld",
            ],
            36 => &[
                "trein", "klein", "plein", "geit", "reis", "eind", "zeil", "wei", "brein",
                "kei", "meid", "steil", "dweil", "feit", "lein", "rein",
            ],
            37 => &[
                "pauw", "saus", "auto", "blauw", "flauw", "klauw", "gauw", "lauw", "paus",
                "rauw", "kauw", "sauna", "fraude", "pauze", "haus", "gauwe",
            ],
            24 => &["cadeau", "bureau", "niveau", "plateau", "tableau", "bordeau"],
            _ => &[],
        }
    }

    /// Real words that fail every rule used by the fixtures.
    pub const PLAIN_WORDS: &[&str] = &[
        "boom", "vis", "maan", "kaas", "roos", "muis", "vuur", "zee", "stoel", "tafel",
        "fiets", "water", "boek", "pen", "deur", "raam",
    ];

    /// A small corpus: the rule words of categories 2, 3, 8, 36 and 37 plus
    /// [`PLAIN_WORDS`]. Loanwords are deliberately absent.
    pub fn dictionary_words() -> Vec<&'static str> {
        let mut words: Vec<&'static str> = Vec::new();
        for cat in [2, 3, 8, 36, 37] {
            words.extend_from_slice(rule_words(cat));
        }
        words.extend_from_slice(PLAIN_WORDS);
        words
    }

    /// The corpus as the newline-delimited text a corpus endpoint serves.
    pub fn dictionary_text() -> String {
        let mut text = dictionary_words().join("\n");
        text.push('\n');
        text
    }

    pub fn word_item(word: &str, category: CategoryId) -> WordItem {
        WordItem::bare(word, category)
    }

    /// Bare items for `(word, category)` pairs.
    pub fn word_items(pairs: &[(&str, CategoryId)]) -> Vec<WordItem> {
        pairs.iter().map(|(w, c)| word_item(w, *c)).collect()
    }

    /// Candidate payload in the shape the model is asked for.
    pub fn candidates_json(pairs: &[(&str, CategoryId)]) -> String {
        let items: Vec<Value> = pairs
            .iter()
            .map(|(w, c)| json!({ "woord": w, "categorie": c }))
            .collect();
        json!({ "items": items }).to_string()
    }

    /// Candidate payload holding every rule word of each category.
    pub fn rule_candidates_json(categories: &[CategoryId]) -> String {
        let pairs: Vec<(&str, CategoryId)> = categories
            .iter()
            .flat_map(|c| rule_words(*c).iter().map(move |w| (*w, *c)))
            .collect();
        candidates_json(&pairs)
    }

    /// Enrichment payload with a dictation and context sentence per word.
    pub fn enrichment_json(words: &[WordItem]) -> String {
        let items: Vec<Value> = words
            .iter()
            .map(|w| {
                json!({
                    "woord": w.word,
                    "categorie": w.category_id,
                    "dictee": format!("Ik schrijf {} op.", w.word),
                    "context": format!("Kijk, daar is een {}.", w.word),
                })
            })
            .collect();
        json!({ "items": items }).to_string()
    }

    /// Exercise payload with one bare analysis and transfer item per word.
    pub fn exercises_json(words: &[WordItem]) -> String {
        let analysis: Vec<Value> = words
            .iter()
            .map(|w| json!({ "woord": w.word, "opdracht": "Vul de letters in." }))
            .collect();
        let transfer: Vec<Value> = words
            .iter()
            .map(|w| json!({ "woord": w.word, "opdracht": "Ik zie een ... in de tuin." }))
            .collect();
        json!({ "analyse": analysis, "transfer": transfer }).to_string()
    }
}

// ============================================================================
// ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions for SPELLKIT invariants.

    use super::*;
    use std::collections::HashSet;

    /// Assert that no two words are equal ignoring case.
    #[track_caller]
    pub fn assert_unique_words(words: &[WordItem]) {
        let mut seen = HashSet::new();
        for w in words {
            assert!(
                seen.insert(w.key()),
                "Duplicate word (case-insensitive): {}",
                w.word
            );
        }
    }

    /// Assert that every item belongs to one of `categories`.
    #[track_caller]
    pub fn assert_categories_within(words: &[WordItem], categories: &[CategoryId]) {
        for w in words {
            assert!(
                categories.contains(&w.category_id),
                "Word {} has unexpected category {}",
                w.word,
                w.category_id
            );
        }
    }

    /// Assert that every exercise item carries complete metadata.
    #[track_caller]
    pub fn assert_metadata_complete(set: &ExerciseSet) {
        for item in set.items() {
            let missing = item.metadata.missing_required(item.kind);
            assert!(
                missing.is_empty(),
                "Item {} ({}) is missing {:?}",
                item.word,
                item.kind,
                missing
            );
            assert!(
                !item.instruction_text.is_empty(),
                "Item {} has no instruction",
                item.word
            );
        }
    }

    /// Assert that a result is an `InsufficientValidWords` error.
    #[track_caller]
    pub fn assert_insufficient_words<T: std::fmt::Debug>(result: &SpellResult<T>) {
        match result {
            Err(SpellError::Generation(
                spellkit_core::GenerationError::InsufficientValidWords { .. },
            )) => {}
            other => panic!("Expected InsufficientValidWords error, got: {:?}", other),
        }
    }

    /// Assert that a result is a guardrail error.
    #[track_caller]
    pub fn assert_guardrail_error<T: std::fmt::Debug>(result: &SpellResult<T>) {
        match result {
            Err(SpellError::Guardrail(_)) => {}
            other => panic!("Expected Guardrail error, got: {:?}", other),
        }
    }
}
