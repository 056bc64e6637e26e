//! Word set generation: candidates, ranking, selection, enrichment.

use crate::candidates::{parse_candidates, rank_candidates};
use crate::fallback::{syllable_split, syllable_type};
use crate::generator::WorksheetGenerator;
use crate::profile::GradeProfile;
use crate::selection::select_words;
use serde_json::Value;
use spellkit_core::{
    placeholder_sentence, CategoryId, EnrichmentField, Fingerprint, GenerationError,
    GenerationRequest, GradeLevel, RankedCandidate, SpellError, SpellResult, SyllableType, Tense,
    VerbInfo, WordItem,
};
use spellkit_llm::{extract_items, field_str};
use std::collections::HashMap;

const CANDIDATE_FINGERPRINT_VERSION: u32 = 8;
const ENRICH_FINGERPRINT_VERSION: u32 = 3;

impl WorksheetGenerator {
    /// Word set of the configured target size.
    pub async fn generate_word_set(
        &self,
        categories: &[CategoryId],
        grade: GradeLevel,
    ) -> SpellResult<Vec<WordItem>> {
        self.generate_word_set_sized(categories, grade, self.config.target_size)
            .await
    }

    /// Exactly `target_size` distinct, enriched words, or an error.
    pub async fn generate_word_set_sized(
        &self,
        categories: &[CategoryId],
        grade: GradeLevel,
        target_size: usize,
    ) -> SpellResult<Vec<WordItem>> {
        let categories = self.validate_request(categories, grade, target_size)?;

        self.dictionary.ensure_loaded().await;

        let candidates = self.fetch_candidates(&categories, grade).await?;
        if candidates.is_empty() {
            return Err(GenerationError::GenerationUnavailable {
                reason: "the service returned no usable candidates".to_string(),
            }
            .into());
        }

        let ranked = rank_candidates(candidates, grade, &self.dictionary);
        let mut rng = self.rng();
        let selected = select_words(&ranked, &categories, target_size, &mut rng);

        if selected.len() < target_size {
            tracing::warn!(
                found = selected.len(),
                required = target_size,
                categories = ?categories,
                "Not enough valid words"
            );
            return Err(GenerationError::InsufficientValidWords {
                found: selected.len(),
                required: target_size,
                categories,
            }
            .into());
        }

        tracing::info!(
            words = selected.len(),
            grade = %grade,
            "Word set selected"
        );
        Ok(self.enrich(selected, grade).await)
    }

    fn validate_request(
        &self,
        categories: &[CategoryId],
        grade: GradeLevel,
        target_size: usize,
    ) -> SpellResult<Vec<CategoryId>> {
        let invalid = |reason: String| -> SpellError {
            GenerationError::InvalidRequest { reason }.into()
        };

        if categories.is_empty() {
            return Err(invalid("no categories selected".to_string()));
        }
        if target_size < self.config.min_viable_words {
            return Err(invalid(format!(
                "target size {} is below the minimum of {}",
                target_size, self.config.min_viable_words
            )));
        }

        let unknown: Vec<CategoryId> = categories
            .iter()
            .copied()
            .filter(|c| !self.catalog.contains(*c))
            .collect();
        if !unknown.is_empty() {
            return Err(invalid(format!("unknown categories {:?}", unknown)));
        }

        let mut unique = Vec::with_capacity(categories.len());
        for c in categories {
            if !unique.contains(c) {
                unique.push(*c);
            }
        }

        for c in &unique {
            if !self.catalog.is_allowed(grade, *c) {
                tracing::warn!(category = c, grade = %grade, "Category not offered for this grade");
            }
        }
        Ok(unique)
    }

    // ========================================================================
    // CANDIDATES
    // ========================================================================

    async fn fetch_candidates(
        &self,
        categories: &[CategoryId],
        grade: GradeLevel,
    ) -> SpellResult<Vec<spellkit_core::WordCandidate>> {
        let per_category = self.config.candidates_per_category(categories.len());
        let fingerprint = Fingerprint::builder("wordlist", CANDIDATE_FINGERPRINT_VERSION)
            .grade(grade)
            .categories(categories)
            .part(format!("n={}", per_category))
            .finish();

        let request = self.candidate_request(categories, grade, per_category);
        let payload = match self.call_json(&fingerprint, request).await {
            Ok(payload) => payload,
            Err(SpellError::Llm(e)) => {
                tracing::error!(error = %e, "Candidate generation failed");
                return Err(GenerationError::GenerationUnavailable {
                    reason: e.to_string(),
                }
                .into());
            }
            Err(e) => return Err(e),
        };

        let candidates = parse_candidates(&payload, categories);
        tracing::debug!(count = candidates.len(), "Candidates received");
        Ok(candidates)
    }

    fn candidate_request(
        &self,
        categories: &[CategoryId],
        grade: GradeLevel,
        per_category: usize,
    ) -> GenerationRequest {
        let profile = GradeProfile::for_grade(grade);
        let category_lines = categories
            .iter()
            .map(|id| match self.catalog.get(*id) {
                Some(info) => format!(
                    "- {}: {}. Rule: {} Example: {}",
                    id, info.name, info.rule, info.example
                ),
                None => format!("- {}", id),
            })
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = format!(
            "Generate {per} Dutch words for EACH of these spelling categories:\n{lines}\n\n\
             Every word must clearly show the spelling pattern of its category. \
             Single words only, no phrases.\n\
             Output JSON: {{ \"items\": [{{ \"woord\": \"...\", \"categorie\": <id> }}] }}",
            per = per_category,
            lines = category_lines,
        );

        GenerationRequest::json(prompt).with_system(format!(
            "You are a Dutch spelling expert building word lists for primary school.\n{}",
            profile.didactic_rules()
        ))
    }

    // ========================================================================
    // ENRICHMENT
    // ========================================================================

    /// Attach sentences and grade metadata. Never fails: a failed call or a
    /// word missing from the response gets placeholders.
    async fn enrich(&self, selected: Vec<RankedCandidate>, grade: GradeLevel) -> Vec<WordItem> {
        let words: Vec<WordItem> = selected
            .into_iter()
            .map(|r| WordItem::from(r.candidate))
            .collect();
        let categories: Vec<CategoryId> = words.iter().map(|w| w.category_id).collect();

        let fingerprint = Fingerprint::builder("enrich", ENRICH_FINGERPRINT_VERSION)
            .grade(grade)
            .categories(&categories)
            .words(words.iter().map(|w| w.word.as_str()))
            .finish();

        let payload = match self
            .call_json(&fingerprint, self.enrichment_request(&words, grade))
            .await
        {
            Ok(payload) => payload,
            Err(e) => {
                let degraded = GenerationError::EnrichmentDegraded {
                    reason: e.to_string(),
                };
                tracing::warn!(error = %degraded, "Using placeholder sentences");
                return words
                    .into_iter()
                    .map(|w| with_placeholders(w, grade))
                    .collect();
            }
        };

        let mut by_word: HashMap<String, Value> = HashMap::new();
        for item in extract_items(&payload, &["items", "words", "w"]) {
            if let Some(word) = field_str(&item, &["woord", "word", "w"]) {
                by_word.entry(word.to_lowercase()).or_insert(item);
            }
        }

        let mut missing = 0usize;
        let enriched = words
            .into_iter()
            .map(|w| match by_word.get(&w.key()) {
                Some(item) => apply_enrichment(w, item, grade),
                None => {
                    missing += 1;
                    with_placeholders(w, grade)
                }
            })
            .collect();
        if missing > 0 {
            tracing::warn!(missing, "Enrichment skipped some words, placeholders used");
        }
        enriched
    }

    fn enrichment_request(&self, words: &[WordItem], grade: GradeLevel) -> GenerationRequest {
        let profile = GradeProfile::for_grade(grade);
        let word_lines = words
            .iter()
            .map(|w| format!("- {} (categorie {})", w.word, w.category_id))
            .collect::<Vec<_>>()
            .join("\n");
        let extra = profile.extra_field_instructions();

        let prompt = format!(
            "For each of these words write a dictation sentence and a context sentence \
             that uses the word exactly as written:\n{}\n\n\
             Fields per item: \"woord\", \"categorie\", \"dictee\", \"context\"{}{}\n\
             Output JSON: {{ \"items\": [...] }}\nExample item: {}",
            word_lines,
            if extra.is_empty() { "" } else { "\n" },
            extra,
            profile.item_example
        );

        GenerationRequest::json(prompt).with_system(format!(
            "{}\n{}",
            profile.teacher_tone,
            profile.didactic_rules()
        ))
    }
}

/// Placeholder sentences, plus a heuristic syllable split where the tier needs one.
pub fn with_placeholders(mut word: WordItem, grade: GradeLevel) -> WordItem {
    let sentence = placeholder_sentence(&word.word);
    word.dictation_sentence = Some(sentence.clone());
    word.context_sentence = Some(sentence);
    fill_tier_fields(&mut word, grade);
    word
}

fn apply_enrichment(mut word: WordItem, item: &Value, grade: GradeLevel) -> WordItem {
    let placeholder = placeholder_sentence(&word.word);
    word.dictation_sentence = Some(
        field_str(item, &["dictee", "dictation", "dictationSentence"])
            .unwrap_or_else(|| placeholder.clone()),
    );
    word.context_sentence = Some(
        field_str(item, &["context", "zin", "contextSentence"]).unwrap_or(placeholder),
    );

    let fields = grade.tier().enrichment_fields();
    if fields.contains(&EnrichmentField::Syllables) {
        word.syllables = field_str(item, &["lettergrepen", "syllables"]);
    }
    if fields.contains(&EnrichmentField::SyllableType) {
        word.syllable_type = field_str(item, &["klankgroepType", "syllableType"])
            .map(|s| SyllableType::from_model_str(&s));
    }
    if fields.contains(&EnrichmentField::VerbInfo) {
        word.verb_info = item
            .get("werkwoord")
            .or_else(|| item.get("verbInfo"))
            .and_then(parse_verb_info);
    }

    fill_tier_fields(&mut word, grade);
    word
}

fn parse_verb_info(value: &Value) -> Option<VerbInfo> {
    let stem = field_str(value, &["stam", "stem"])?;
    let tense = field_str(value, &["tijd", "tense"]).and_then(|t| Tense::from_model_str(&t))?;
    let voiceless_stem = value
        .get("kofschip")
        .or_else(|| value.get("voicelessStem"))
        .and_then(Value::as_bool)
        .unwrap_or(false);
    Some(VerbInfo {
        stem,
        tense,
        voiceless_stem,
    })
}

/// Heuristic values for tier fields the model left out.
fn fill_tier_fields(word: &mut WordItem, grade: GradeLevel) {
    let fields = grade.tier().enrichment_fields();
    if fields.contains(&EnrichmentField::Syllables) && word.syllables.is_none() {
        word.syllables = Some(syllable_split(&word.word));
    }
    if fields.contains(&EnrichmentField::SyllableType) && word.syllable_type.is_none() {
        word.syllable_type = Some(syllable_type(&word.word));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_placeholders_follow_tier() {
        let lower = with_placeholders(WordItem::bare("hond", 8), GradeLevel::Group4);
        assert_eq!(lower.dictation_sentence.as_deref(), Some("Write down: hond."));
        assert_eq!(lower.context_sentence.as_deref(), Some("Write down: hond."));
        assert!(lower.syllables.is_none());

        let middle = with_placeholders(WordItem::bare("bomen", 10), GradeLevel::Group5);
        assert_eq!(middle.syllables.as_deref(), Some("bo-men"));
        assert!(middle.syllable_type.is_some());
    }

    #[test]
    fn test_apply_enrichment_reads_model_fields() {
        let item = json!({
            "woord": "verhuisd",
            "dictee": "Wij zijn verhuisd.",
            "context": "Het gezin is verhuisd naar Utrecht.",
            "werkwoord": { "stam": "verhuis", "tijd": "vd", "kofschip": false }
        });
        let word = apply_enrichment(WordItem::bare("verhuisd", 9), &item, GradeLevel::Group8);
        assert_eq!(word.dictation_sentence.as_deref(), Some("Wij zijn verhuisd."));
        let verb = word.verb_info.unwrap();
        assert_eq!(verb.stem, "verhuis");
        assert_eq!(verb.tense, Tense::PastParticiple);
        assert!(!verb.voiceless_stem);
    }

    #[test]
    fn test_apply_enrichment_fills_gaps() {
        let item = json!({ "woord": "bakker", "klankgroepType": "kort" });
        let word = apply_enrichment(WordItem::bare("bakker", 10), &item, GradeLevel::Group5);
        assert_eq!(word.dictation_sentence.as_deref(), Some("Write down: bakker."));
        assert_eq!(word.syllables.as_deref(), Some("bak-ker"));
        assert_eq!(word.syllable_type, Some(SyllableType::Short));
    }
}
