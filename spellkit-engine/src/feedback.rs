//! Spelling hints for a pupil's wrong attempt.

use crate::generator::WorksheetGenerator;
use crate::profile::GradeProfile;
use spellkit_core::{CategoryId, CategoryInfo, Fingerprint, GenerationRequest, GradeLevel};

const HINT_FINGERPRINT_VERSION: u32 = 3;
const HINT_TEMPERATURE: f32 = 0.7;
const MAX_HINT_WORDS: usize = 12;
// Slack over the requested length before a hint is thrown away.
const MAX_ACCEPTED_HINT_WORDS: usize = 20;

pub const CORRECT: &str = "That's right!";
pub const CASE_ONLY: &str = "That's right! Just watch the capital letters.";
const GENERIC_HINT: &str = "Look carefully at the word and try again.";

impl WorksheetGenerator {
    /// A short hint that does not give the answer away.
    ///
    /// Correct and case-only attempts are answered locally. Any failure of
    /// the model path falls back to the category's rule statement.
    pub async fn spelling_hint(
        &self,
        target: &str,
        attempt: &str,
        category: CategoryId,
        grade: GradeLevel,
    ) -> String {
        let (target, attempt) = (target.trim(), attempt.trim());
        if attempt == target {
            return CORRECT.to_string();
        }
        if attempt.to_lowercase() == target.to_lowercase() {
            return CASE_ONLY.to_string();
        }

        let fallback = || {
            self.catalog
                .get(category)
                .map(|info| info.rule.clone())
                .unwrap_or_else(|| GENERIC_HINT.to_string())
        };

        let fingerprint = Fingerprint::builder("feedback", HINT_FINGERPRINT_VERSION)
            .grade(grade)
            .categories(&[category])
            .words([target])
            .part(attempt.to_string())
            .finish();

        match self
            .call_text(&fingerprint, self.hint_request(target, attempt, category, grade))
            .await
        {
            Ok(hint) if is_usable_hint(&hint, target) => hint,
            Ok(hint) => {
                tracing::debug!(hint = %hint, "Hint rejected, using rule text");
                fallback()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Hint generation failed, using rule text");
                fallback()
            }
        }
    }

    fn hint_request(
        &self,
        target: &str,
        attempt: &str,
        category: CategoryId,
        grade: GradeLevel,
    ) -> GenerationRequest {
        let profile = GradeProfile::for_grade(grade);
        let rule = self
            .catalog
            .get(category)
            .map(rule_context)
            .unwrap_or_default();
        let prompt = format!(
            "A pupil had to write \"{}\" but wrote \"{}\". Category: {}\n\
             Give one hint of at most {} words that helps without revealing the correct \
             spelling. If the class has a rhyme for this rule, refer to it subtly. \
             Reply with the hint only.",
            target, attempt, rule, MAX_HINT_WORDS
        );
        GenerationRequest::text(prompt)
            .with_system(profile.teacher_tone)
            .with_temperature(HINT_TEMPERATURE)
    }
}

/// Name and rule, plus the class rhyme and extended explanation when known.
fn rule_context(info: &CategoryInfo) -> String {
    let mut context = format!("{} ({})", info.name, info.rule);
    if let Some(rhyme) = &info.rhyme {
        context.push_str(&format!("\nRhyme: \"{}\"", rhyme));
    }
    if let Some(explanation) = &info.explanation {
        context.push_str(&format!("\nExplanation: \"{}\"", explanation));
    }
    context
}

/// Non-empty, short, and does not contain the answer.
fn is_usable_hint(hint: &str, target: &str) -> bool {
    let words = hint.split_whitespace().count();
    words > 0
        && words <= MAX_ACCEPTED_HINT_WORDS
        && !hint.to_lowercase().contains(&target.to_lowercase())
}
