//! Deterministic cache keys summarizing a request's semantic identity.

use crate::{compute_content_hash, CategoryId, GradeLevel, Stage};
use serde::{Deserialize, Serialize};

/// Cache key for one guarded generation call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Start a fingerprint for a request kind. Bump `version` when the prompt changes.
    pub fn builder(kind: &str, version: u32) -> FingerprintBuilder {
        FingerprintBuilder {
            kind: kind.to_string(),
            version,
            grade: None,
            stage: None,
            categories: Vec::new(),
            words: Vec::new(),
            extra: Vec::new(),
        }
    }

    /// Wrap an existing key verbatim.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builder for [`Fingerprint`]. Inputs are normalized so that order and
/// letter case of categories and words do not change the key.
#[derive(Debug, Clone)]
pub struct FingerprintBuilder {
    kind: String,
    version: u32,
    grade: Option<GradeLevel>,
    stage: Option<Stage>,
    categories: Vec<CategoryId>,
    words: Vec<String>,
    extra: Vec<String>,
}

impl FingerprintBuilder {
    pub fn grade(mut self, grade: GradeLevel) -> Self {
        self.grade = Some(grade);
        self
    }

    pub fn stage(mut self, stage: Stage) -> Self {
        self.stage = Some(stage);
        self
    }

    pub fn categories(mut self, categories: &[CategoryId]) -> Self {
        self.categories.extend_from_slice(categories);
        self
    }

    pub fn words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.words
            .extend(words.into_iter().map(|w| w.as_ref().trim().to_lowercase()));
        self
    }

    /// Free-form component, kept verbatim (e.g. a pupil's attempt).
    pub fn part(mut self, part: impl Into<String>) -> Self {
        self.extra.push(part.into());
        self
    }

    pub fn finish(mut self) -> Fingerprint {
        self.categories.sort_unstable();
        self.categories.dedup();
        self.words.sort();

        let mut key = format!("{}-v{}", self.kind, self.version);
        if let Some(grade) = self.grade {
            key.push_str("|g=");
            key.push_str(grade.as_db_str());
        }
        if let Some(stage) = self.stage {
            key.push_str("|s=");
            key.push_str(stage.as_str());
        }
        if !self.categories.is_empty() {
            let ids: Vec<String> = self.categories.iter().map(|c| c.to_string()).collect();
            key.push_str("|c=");
            key.push_str(&ids.join(","));
        }
        if !self.words.is_empty() {
            let digest = compute_content_hash(self.words.join("\n").as_bytes());
            key.push_str("|w=");
            key.push_str(&hex::encode(&digest[..8]));
        }
        if !self.extra.is_empty() {
            let digest = compute_content_hash(self.extra.join("\n").as_bytes());
            key.push_str("|x=");
            key.push_str(&hex::encode(&digest[..8]));
        }
        Fingerprint(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_order_and_case_insensitive() {
        let a = Fingerprint::builder("exercises", 1)
            .grade(GradeLevel::Group5)
            .categories(&[10, 2])
            .words(["Bomen", "koning"])
            .finish();
        let b = Fingerprint::builder("exercises", 1)
            .grade(GradeLevel::Group5)
            .categories(&[2, 10])
            .words(["koning", "bomen"])
            .finish();
        assert_eq!(a, b);
    }

    #[test]
    fn test_fingerprint_distinguishes_grade_and_stage() {
        let base = || Fingerprint::builder("exercises", 1).categories(&[2]);
        let g4 = base().grade(GradeLevel::Group4).finish();
        let g5 = base().grade(GradeLevel::Group5).finish();
        let analysis = base().stage(Stage::Analysis).finish();
        let transfer = base().stage(Stage::Transfer).finish();
        assert_ne!(g4, g5);
        assert_ne!(analysis, transfer);
    }

    #[test]
    fn test_fingerprint_readable_prefix() {
        let fp = Fingerprint::builder("wordlist", 3)
            .grade(GradeLevel::Group78)
            .categories(&[30])
            .finish();
        assert_eq!(fp.as_str(), "wordlist-v3|g=7/8|c=30");
    }

    #[test]
    fn test_extra_parts_change_key() {
        let a = Fingerprint::builder("hint", 1).part("hond").part("hont").finish();
        let b = Fingerprint::builder("hint", 1).part("hond").part("hondt").finish();
        assert_ne!(a, b);
    }
}
