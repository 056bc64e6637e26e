//! Spellkit Core - Worksheet Generation Types
//!
//! Pure data structures and lookup tables shared by every other crate.
//! No I/O lives here.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

mod catalog;
mod config;
mod error;
mod exercise;
mod fingerprint;
mod grade;
mod llm;
pub mod rules;
mod word;

pub use catalog::*;
pub use config::*;
pub use error::*;
pub use exercise::*;
pub use fingerprint::*;
pub use grade::*;
pub use llm::*;
pub use word::*;

// ============================================================================
// PRIMITIVES
// ============================================================================

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// SHA-256 content hash.
pub type ContentHash = [u8; 32];

/// Compute SHA-256 hash of content.
pub fn compute_content_hash(content: &[u8]) -> ContentHash {
    let mut hasher = Sha256::new();
    hasher.update(content);
    let result = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}

/// Placeholder sentence used when enrichment could not supply one.
pub fn placeholder_sentence(word: &str) -> String {
    format!("Write down: {}.", word)
}

// ============================================================================
// TESTS
// ============================================================================


#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_taught_span_is_inside_word(word in "[a-z]{1,12}", category in 1u32..=37) {
            if let Some((start, end)) = rules::taught_span(&word, category) {
                prop_assert!(start < end);
                prop_assert!(end <= word.len());
            }
        }

        #[test]
        fn prop_rule_check_ignores_case(word in "[a-z]{2,10}", category in 1u32..=37) {
            prop_assert_eq!(
                rules::passes_rule(&word, category),
                rules::passes_rule(&word.to_uppercase(), category)
            );
        }

        #[test]
        fn prop_rank_classify_matches_checks(rule in any::<bool>(), known in any::<bool>()) {
            match Rank::classify(rule, known) {
                Some(Rank::Gold) => prop_assert!(rule && known),
                Some(Rank::Silver) => prop_assert!(rule && !known),
                Some(Rank::Bronze) => prop_assert!(!rule && known),
                None => prop_assert!(!rule && !known),
            }
        }

        #[test]
        fn prop_grade_label_roundtrip(idx in 0usize..6) {
            let grade = GradeLevel::ALL[idx];
            prop_assert_eq!(GradeLevel::from_db_str(grade.as_db_str()), Ok(grade));
        }
    }
}
