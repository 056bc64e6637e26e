//! Short reading story built around the worksheet words.

use crate::generator::WorksheetGenerator;
use crate::profile::GradeProfile;
use regex::Regex;
use spellkit_core::{Fingerprint, GenerationRequest, GradeLevel, WordItem};
use spellkit_llm::field_str;

const STORY_FINGERPRINT_VERSION: u32 = 2;
pub const MAX_STORY_SENTENCES: usize = 10;

pub const FALLBACK_STORY: &str =
    "The story could not be written right now. Read the words aloud together instead.";

impl WorksheetGenerator {
    /// A story of at most ten sentences using every word in bold. Failures
    /// yield [`FALLBACK_STORY`].
    pub async fn generate_story(&self, words: &[WordItem], grade: GradeLevel) -> String {
        if words.is_empty() {
            return FALLBACK_STORY.to_string();
        }

        let fingerprint = Fingerprint::builder("story", STORY_FINGERPRINT_VERSION)
            .grade(grade)
            .words(words.iter().map(|w| w.word.as_str()))
            .finish();

        let payload = match self.call_json(&fingerprint, story_request(words, grade)).await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "Story generation failed");
                return FALLBACK_STORY.to_string();
            }
        };

        match field_str(&payload, &["story", "verhaal", "text"]) {
            Some(story) => {
                let story = limit_sentences(&story, MAX_STORY_SENTENCES);
                embolden(&story, words)
            }
            None => {
                tracing::warn!("Story payload had no text");
                FALLBACK_STORY.to_string()
            }
        }
    }
}

fn story_request(words: &[WordItem], grade: GradeLevel) -> GenerationRequest {
    let profile = GradeProfile::for_grade(grade);
    let list = words
        .iter()
        .map(|w| w.word.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let prompt = format!(
        "Write a short, fun story in Dutch of at most {} sentences that uses these words: {}.\n\
         Put every one of these words in bold (**word**).\n\
         Output JSON: {{ \"story\": \"...\" }}",
        MAX_STORY_SENTENCES, list
    );
    GenerationRequest::json(prompt).with_system(format!(
        "You are a children's author.\n{}",
        profile.level_prompt
    ))
}

/// First `max` sentences of `text`.
pub fn limit_sentences(text: &str, max: usize) -> String {
    let mut count = 0;
    for (i, c) in text.char_indices() {
        if matches!(c, '.' | '!' | '?') {
            let next = text[i + c.len_utf8()..].chars().next();
            if next.map_or(true, char::is_whitespace) {
                count += 1;
                if count == max {
                    return text[..i + c.len_utf8()].trim().to_string();
                }
            }
        }
    }
    text.trim().to_string()
}

/// Bold the first plain occurrence of every word not already in bold.
pub fn embolden(text: &str, words: &[WordItem]) -> String {
    let mut out = text.to_string();
    for w in words {
        let escaped = regex::escape(&w.word);
        let bold = Regex::new(&format!(r"(?i)\*\*{}\*\*", escaped));
        let plain = Regex::new(&format!(r"(?i)\b{}\b", escaped));
        let (Ok(bold), Ok(plain)) = (bold, plain) else {
            continue;
        };
        if bold.is_match(&out) {
            continue;
        }
        out = plain
            .replacen(&out, 1, |caps: &regex::Captures| format!("**{}**", &caps[0]))
            .into_owned();
    }
    out
}
