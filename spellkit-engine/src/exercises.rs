//! Exercise assembly: one combined call for both stages, then per-item
//! matching and metadata completion.

use crate::fallback::{choices, gap_split, misspelling, syllable_split, syllable_type};
use crate::generator::WorksheetGenerator;
use crate::strategy::{item_kind, select_strategy};
use regex::Regex;
use serde_json::Value;
use spellkit_core::{
    CategoryCatalog, CategoryId, ExerciseItem, ExerciseKind, ExerciseMetadata, ExerciseSet,
    Fingerprint, GenerationRequest, GradeLevel, SortingExercise, Stage, StrategyDescriptor,
    WordItem,
};
use spellkit_llm::{extract_items, field_str, field_strings};
use std::collections::{HashMap, HashSet};

const EXERCISE_FINGERPRINT_VERSION: u32 = 6;

const ANALYSIS_KEYS: &[&str] = &["analyse", "analysis"];
const TRANSFER_KEYS: &[&str] = &["transfer", "invulzinnen"];
const BLANK: &str = "...";

impl WorksheetGenerator {
    /// Exercises for a finished word set. Never fails: a failed or garbled
    /// call yields empty stages, the locally computed sorting exercise or
    /// imprint instruction is always present.
    pub async fn generate_exercises(&self, words: &[WordItem], grade: GradeLevel) -> ExerciseSet {
        if words.is_empty() {
            return ExerciseSet::empty();
        }

        let analysis = select_strategy(grade, Stage::Analysis, words);
        let transfer = select_strategy(grade, Stage::Transfer, words);

        let categories: Vec<CategoryId> = words.iter().map(|w| w.category_id).collect();
        let fingerprint = Fingerprint::builder("exercises", EXERCISE_FINGERPRINT_VERSION)
            .grade(grade)
            .categories(&categories)
            .words(words.iter().map(|w| w.word.as_str()))
            .finish();

        let mut set = match self
            .call_json(&fingerprint, combined_request(&analysis, &transfer))
            .await
        {
            Ok(payload) => assemble(&payload, words, grade, &analysis, &transfer),
            Err(e) => {
                tracing::error!(error = %e, "Exercise generation failed, returning empty stages");
                ExerciseSet::empty()
            }
        };

        attach_step_one(&mut set, words, &self.catalog);
        set
    }
}

fn combined_request(analysis: &StrategyDescriptor, transfer: &StrategyDescriptor) -> GenerationRequest {
    let prompt = format!(
        "Create two exercise lists.\n\n\
         ANALYSIS (key \"analyse\"):\n{}\n\n\
         TRANSFER (key \"transfer\"):\n{}\n\n\
         Output JSON: {{ \"analyse\": [...], \"transfer\": [...] }}",
        analysis.task_prompt, transfer.task_prompt
    );
    GenerationRequest::json(prompt).with_system(analysis.system_prompt.clone())
}

// ============================================================================
// ASSEMBLY
// ============================================================================

/// Turn a decoded payload into exercise stages.
///
/// Items are matched back to the word set case-insensitively; items for
/// words outside the set, and repeats of a word within a stage, are dropped.
pub fn assemble(
    payload: &Value,
    words: &[WordItem],
    grade: GradeLevel,
    analysis: &StrategyDescriptor,
    transfer: &StrategyDescriptor,
) -> ExerciseSet {
    let by_key: HashMap<String, &WordItem> = words.iter().map(|w| (w.key(), w)).collect();
    ExerciseSet {
        analysis: assemble_stage(payload, ANALYSIS_KEYS, &by_key, grade, analysis, Stage::Analysis),
        transfer: assemble_stage(payload, TRANSFER_KEYS, &by_key, grade, transfer, Stage::Transfer),
        sorting: None,
        imprint_instruction: None,
    }
}

fn assemble_stage(
    payload: &Value,
    keys: &[&str],
    by_key: &HashMap<String, &WordItem>,
    grade: GradeLevel,
    descriptor: &StrategyDescriptor,
    stage: Stage,
) -> Vec<ExerciseItem> {
    let raw = if payload.is_object() {
        extract_items(payload, keys)
    } else {
        Vec::new()
    };

    let mut seen = HashSet::new();
    let mut items = Vec::new();
    for entry in &raw {
        let Some(word) = field_str(entry, &["woord", "word"]) else {
            continue;
        };
        let key = word.to_lowercase();
        let Some(source) = by_key.get(&key) else {
            tracing::debug!(word = %word, stage = %stage, "Exercise item for unknown word dropped");
            continue;
        };
        if !seen.insert(key) {
            continue;
        }

        let kind = item_kind(grade, descriptor.output_kind, source.category_id);
        if let Some(tag) = field_str(entry, &["type"]).and_then(|t| ExerciseKind::from_model_str(&t)) {
            if tag != kind {
                tracing::debug!(word = %word, model = %tag, used = %kind, "Model item type overridden");
            }
        }

        let metadata = complete_metadata(read_metadata(entry), source, kind);
        let instruction_text = instruction(entry, source, kind, &metadata);
        items.push(ExerciseItem {
            id: format!("{}-{}", stage.as_str(), items.len() + 1),
            instruction_text,
            word: source.word.clone(),
            category_id: source.category_id,
            kind,
            stage,
            metadata,
        });
    }

    if items.len() < by_key.len() {
        tracing::debug!(
            stage = %stage,
            items = items.len(),
            words = by_key.len(),
            "Stage covers part of the word set"
        );
    }
    items
}

fn read_metadata(entry: &Value) -> ExerciseMetadata {
    let meta = entry.get("metadata").filter(|m| m.is_object()).unwrap_or(entry);
    ExerciseMetadata {
        prefix: field_str(meta, &["prefix"]).unwrap_or_default(),
        suffix: field_str(meta, &["suffix"]).unwrap_or_default(),
        syllables: field_str(meta, &["lettergrepen", "syllables"]).unwrap_or_default(),
        syllable_type: field_str(meta, &["klankgroepType", "syllableType"]),
        choices: field_strings(meta, &["keuzes", "choices", "opties"]),
        wrong_spelling: field_str(meta, &["foutWoord", "wrongSpelling", "fout"]),
        infinitive: field_str(meta, &["infinitief", "infinitive"]),
        tense: field_str(meta, &["tijd", "tense"]),
        word_class: field_str(meta, &["woordsoort", "wordClass"]),
    }
}

/// Fill every field `kind` needs that the model left out.
pub fn complete_metadata(
    mut meta: ExerciseMetadata,
    word: &WordItem,
    kind: ExerciseKind,
) -> ExerciseMetadata {
    // A one-sided split from the model is replaced as a whole.
    if meta.prefix.is_empty() || meta.suffix.is_empty() {
        let (prefix, suffix) = gap_split(&word.word, word.category_id);
        meta.prefix = prefix;
        meta.suffix = suffix;
    }
    if meta.syllables.is_empty() {
        meta.syllables = word
            .syllables
            .clone()
            .unwrap_or_else(|| syllable_split(&word.word));
    }

    match kind {
        ExerciseKind::SyllableSplit if meta.syllable_type.is_none() => {
            let kind = word.syllable_type.unwrap_or_else(|| syllable_type(&word.word));
            meta.syllable_type = Some(kind.as_str().to_string());
        }
        ExerciseKind::Choice if meta.choices.is_empty() => {
            meta.choices = choices(&word.word, word.category_id);
        }
        ExerciseKind::EditorCorrection => {
            let same = meta
                .wrong_spelling
                .as_deref()
                .map(|w| w.eq_ignore_ascii_case(&word.word))
                .unwrap_or(true);
            if same {
                meta.wrong_spelling = Some(misspelling(&word.word, word.category_id));
            }
        }
        ExerciseKind::VerbSchema => {
            if meta.infinitive.is_none() {
                meta.infinitive = Some(infinitive(word));
            }
            if meta.tense.is_none() {
                meta.tense = word.verb_info.as_ref().map(|v| v.tense.as_str().to_string());
            }
        }
        _ => {}
    }
    meta
}

// Words ending in -en are taken as infinitives; otherwise stem + "en".
fn infinitive(word: &WordItem) -> String {
    let lower = word.word.to_lowercase();
    if lower.ends_with("en") {
        return lower;
    }
    match &word.verb_info {
        Some(verb) => format!("{}en", verb.stem.to_lowercase()),
        None => lower,
    }
}

fn instruction(
    entry: &Value,
    word: &WordItem,
    kind: ExerciseKind,
    meta: &ExerciseMetadata,
) -> String {
    let given = field_str(entry, &["opdracht", "instruction", "zin", "sentence"]);
    match kind {
        ExerciseKind::FillIn => {
            let sentence = given.or_else(|| word.context_sentence.clone());
            match sentence {
                Some(s) => blank_out(&s, &word.word),
                None => kind.default_instruction().to_string(),
            }
        }
        ExerciseKind::EditorCorrection => match given {
            Some(s) => s,
            None => match (&word.context_sentence, &meta.wrong_spelling) {
                (Some(sentence), Some(wrong)) if contains_word(sentence, &word.word) => {
                    replace_word(sentence, &word.word, wrong)
                }
                _ => kind.default_instruction().to_string(),
            },
        },
        _ => given.unwrap_or_else(|| kind.default_instruction().to_string()),
    }
}

fn word_pattern(word: &str) -> Option<Regex> {
    Regex::new(&format!(r"(?i)\b{}\b", regex::escape(word))).ok()
}

fn contains_word(sentence: &str, word: &str) -> bool {
    word_pattern(word)
        .map(|re| re.is_match(sentence))
        .unwrap_or(false)
}

fn replace_word(sentence: &str, word: &str, replacement: &str) -> String {
    match word_pattern(word) {
        Some(re) => re.replace_all(sentence, regex::NoExpand(replacement)).into_owned(),
        None => sentence.to_string(),
    }
}

/// The sentence with the target word replaced by a blank, if it was spelled out.
fn blank_out(sentence: &str, word: &str) -> String {
    replace_word(sentence, word, BLANK)
}

// ============================================================================
// STEP ONE
// ============================================================================

/// Sorting exercise for multi-category sets, imprint instruction otherwise.
pub fn attach_step_one(set: &mut ExerciseSet, words: &[WordItem], catalog: &CategoryCatalog) {
    let mut categories: Vec<CategoryId> = Vec::new();
    for w in words {
        if !categories.contains(&w.category_id) {
            categories.push(w.category_id);
        }
    }

    match categories.as_slice() {
        [] => {}
        [only] => {
            set.imprint_instruction = Some(
                catalog
                    .get(*only)
                    .map(|info| info.action.clone())
                    .unwrap_or_else(|| ExerciseKind::Mirror.default_instruction().to_string()),
            );
        }
        _ => {
            let items = words
                .iter()
                .enumerate()
                .map(|(i, w)| ExerciseItem {
                    id: format!("sort-{}", i + 1),
                    instruction_text: ExerciseKind::Sort.default_instruction().to_string(),
                    word: w.word.clone(),
                    category_id: w.category_id,
                    kind: ExerciseKind::Sort,
                    stage: Stage::Analysis,
                    metadata: complete_metadata(ExerciseMetadata::default(), w, ExerciseKind::Sort),
                })
                .collect();
            set.sorting = Some(SortingExercise { categories, items });
        }
    }
}
