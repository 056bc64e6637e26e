//! Raw candidate parsing, structural checks and Gold/Silver/Bronze ranking.

use crate::dictionary::Dictionary;
use serde_json::Value;
use spellkit_core::rules::{allows_punctuation, is_dictionary_exempt, passes_rule};
use spellkit_core::{CategoryId, GradeLevel, Rank, RankedCandidate, WordCandidate};
use spellkit_llm::{extract_items, field_int, field_str};
use std::collections::BTreeMap;

/// Shortest word worth putting on a worksheet.
pub const MIN_WORD_CHARS: usize = 2;

/// Longest word offered to the youngest tier.
pub const YOUNGEST_MAX_CHARS: usize = 12;

/// Category whose words keep their capitals (possessive names).
const CASE_SENSITIVE: CategoryId = 16;

const LIST_KEYS: &[&str] = &["items", "words", "w"];
const WORD_KEYS: &[&str] = &["woord", "word", "w"];
const CATEGORY_KEYS: &[&str] = &["categorie", "categoryId", "category", "cat", "c"];

// ============================================================================
// PARSING
// ============================================================================

/// Candidates from a decoded payload.
///
/// Items whose claimed category was not requested are dropped. Bare strings
/// are accepted only when a single category was requested.
pub fn parse_candidates(payload: &Value, requested: &[CategoryId]) -> Vec<WordCandidate> {
    let single = match requested {
        [only] => Some(*only),
        _ => None,
    };

    extract_items(payload, LIST_KEYS)
        .iter()
        .filter_map(|item| {
            let (word, category) = match item {
                Value::String(s) => (s.trim().to_string(), single?),
                _ => {
                    let word = field_str(item, WORD_KEYS)?;
                    let category = field_int(item, CATEGORY_KEYS)
                        .and_then(|c| CategoryId::try_from(c).ok())
                        .or(single)?;
                    (word, category)
                }
            };
            if !requested.contains(&category) {
                tracing::debug!(word = %word, category, "Candidate for unrequested category dropped");
                return None;
            }
            let word = if category == CASE_SENSITIVE {
                word
            } else {
                word.to_lowercase()
            };
            Some(WordCandidate::new(word, category))
        })
        .collect()
}

// ============================================================================
// CHECKS
// ============================================================================

/// Non-empty, no whitespace, at least two characters, letters plus at most
/// apostrophes and hyphens.
pub fn is_structurally_valid(word: &str) -> bool {
    word.chars().count() >= MIN_WORD_CHARS
        && word
            .chars()
            .all(|c| c.is_alphabetic() || c == '\'' || c == '-')
        && word.chars().any(char::is_alphabetic)
}

/// Grade heuristic: the youngest tier gets short words and no punctuation
/// unless the category is about punctuation.
pub fn is_grade_appropriate(word: &str, category: CategoryId, grade: GradeLevel) -> bool {
    if !grade.tier().is_youngest() {
        return true;
    }
    let punctuated = word.contains(['\'', '-']);
    word.chars().count() <= YOUNGEST_MAX_CHARS && (!punctuated || allows_punctuation(category))
}

/// Rank a candidate, or `None` when it fails both the rule and the dictionary.
pub fn rank_candidate(
    candidate: WordCandidate,
    grade: GradeLevel,
    dictionary: &Dictionary,
) -> Option<RankedCandidate> {
    if !is_structurally_valid(&candidate.word)
        || !is_grade_appropriate(&candidate.word, candidate.category_id, grade)
    {
        return None;
    }
    let rule = passes_rule(&candidate.word, candidate.category_id);
    let known =
        is_dictionary_exempt(candidate.category_id) || dictionary.is_known(&candidate.word);
    let rank = Rank::classify(rule, known)?;
    Some(RankedCandidate { candidate, rank })
}

/// Rank every candidate, keeping input order among survivors.
pub fn rank_candidates(
    candidates: Vec<WordCandidate>,
    grade: GradeLevel,
    dictionary: &Dictionary,
) -> Vec<RankedCandidate> {
    let raw = candidates.len();
    let ranked: Vec<RankedCandidate> = candidates
        .into_iter()
        .filter_map(|c| rank_candidate(c, grade, dictionary))
        .collect();

    let mut counts: BTreeMap<CategoryId, [usize; 3]> = BTreeMap::new();
    for r in &ranked {
        let slot = counts.entry(r.candidate.category_id).or_default();
        slot[r.rank as usize] += 1;
    }
    for (category, [gold, silver, bronze]) in &counts {
        tracing::debug!(category, gold, silver, bronze, "Candidates ranked");
    }
    tracing::debug!(raw, kept = ranked.len(), "Candidate validation finished");

    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_tolerates_key_variance() {
        let payload = json!({
            "words": [
                { "word": "Koning", "categoryId": 2 },
                { "woord": "lucht", "categorie": "3" },
                { "w": "bank", "c": 4 },
                { "woord": "boom", "categorie": 1 },
                { "categorie": 2 },
                "los"
            ]
        });
        let parsed = parse_candidates(&payload, &[2, 3, 4]);
        assert_eq!(
            parsed,
            vec![
                WordCandidate::new("koning", 2),
                WordCandidate::new("lucht", 3),
                WordCandidate::new("bank", 4),
            ]
        );
    }

    #[test]
    fn test_parse_bare_strings_for_single_category() {
        let payload = json!(["zingen", { "woord": "bang" }]);
        let parsed = parse_candidates(&payload, &[2]);
        assert_eq!(parsed.len(), 2);
        assert!(parsed.iter().all(|c| c.category_id == 2));
    }

    #[test]
    fn test_parse_keeps_case_for_names() {
        let payload = json!({ "items": [{ "woord": "Anna's", "categorie": 16 }] });
        assert_eq!(parse_candidates(&payload, &[16])[0].word, "Anna's");
    }

    #[test]
    fn test_structural_rejections() {
        assert!(is_structurally_valid("koning"));
        assert!(is_structurally_valid("auto's"));
        assert!(is_structurally_valid("café"));
        assert!(!is_structurally_valid(""));
        assert!(!is_structurally_valid("a"));
        assert!(!is_structurally_valid("de koning"));
        assert!(!is_structurally_valid("k0ning"));
        assert!(!is_structurally_valid("--"));
    }

    #[test]
    fn test_youngest_tier_heuristic() {
        let g4 = GradeLevel::Group4;
        assert!(is_grade_appropriate("koning", 2, g4));
        assert!(!is_grade_appropriate("verkeersdrempels", 2, g4));
        assert!(!is_grade_appropriate("na-apen", 2, g4));
        assert!(is_grade_appropriate("auto's", 14, g4));
        assert!(is_grade_appropriate("verkeersdrempels", 2, GradeLevel::Group6));
    }

    #[test]
    fn test_ranking() {
        let dict = Dictionary::preloaded(["koning", "boom", "kado"]);
        let g5 = GradeLevel::Group5;
        let rank = |w: &str, c| rank_candidate(WordCandidate::new(w, c), g5, &dict).map(|r| r.rank);

        assert_eq!(rank("koning", 2), Some(Rank::Gold));
        assert_eq!(rank("slang", 2), Some(Rank::Silver));
        assert_eq!(rank("boom", 2), Some(Rank::Bronze));
        assert_eq!(rank("xyzzy", 2), None);
        // Exempt categories never land in Silver.
        assert_eq!(rank("cadeau", 24), Some(Rank::Gold));
        assert_eq!(rank("kado", 24), Some(Rank::Bronze));
        assert_eq!(rank("xyzzy", 24), Some(Rank::Bronze));
    }
}
