//! Word candidates, validation ranks and finalized word items.

use serde::{Deserialize, Serialize};

/// Identifier of a spelling category in the catalog.
pub type CategoryId = u32;

// ============================================================================
// CANDIDATES AND RANKS
// ============================================================================

/// A word proposed by the generation service, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordCandidate {
    pub word: String,
    pub category_id: CategoryId,
}

impl WordCandidate {
    pub fn new(word: impl Into<String>, category_id: CategoryId) -> Self {
        Self {
            word: word.into(),
            category_id,
        }
    }
}

/// Validation confidence of a candidate. Declaration order is rank order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rank {
    /// Passes the rule check and is dictionary-known (or dictionary-exempt)
    Gold,
    /// Passes the rule check only
    Silver,
    /// Dictionary-known only
    Bronze,
}

impl Rank {
    /// Every rank, best first.
    pub const ALL: [Rank; 3] = [Self::Gold, Self::Silver, Self::Bronze];

    /// Rank for a candidate given its check outcomes. `None` means discard.
    pub fn classify(passes_rule: bool, known: bool) -> Option<Self> {
        match (passes_rule, known) {
            (true, true) => Some(Self::Gold),
            (true, false) => Some(Self::Silver),
            (false, true) => Some(Self::Bronze),
            (false, false) => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gold => "gold",
            Self::Silver => "silver",
            Self::Bronze => "bronze",
        }
    }
}

/// A candidate that survived validation, tagged with its rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub candidate: WordCandidate,
    pub rank: Rank,
}

// ============================================================================
// ENRICHMENT METADATA
// ============================================================================

/// Vowel kind of the first syllable group ("klankgroep").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyllableType {
    /// Open syllable ending in a short vowel ("kort")
    Short,
    /// Open syllable ending in a long vowel ("lang")
    Long,
    /// Two-letter vowel sound ("twee-teken")
    Digraph,
    /// Closed by a consonant ("medeklinker")
    Consonant,
    Other,
}

impl SyllableType {
    /// Lenient parse of the labels the model produces, Dutch or English.
    pub fn from_model_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "kort" | "short" => Self::Short,
            "lang" | "long" => Self::Long,
            "twee-teken" | "tweeteken" | "digraph" => Self::Digraph,
            "medeklinker" | "consonant" => Self::Consonant,
            _ => Self::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Long => "long",
            Self::Digraph => "digraph",
            Self::Consonant => "consonant",
            Self::Other => "other",
        }
    }
}

/// Verb tense for upper-grade verb spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tense {
    Present,
    Past,
    PastParticiple,
}

impl Tense {
    /// Parse the short codes ("tt", "vt", "vd") or English names.
    pub fn from_model_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "tt" | "present" => Some(Self::Present),
            "vt" | "past" => Some(Self::Past),
            "vd" | "past_participle" | "participle" => Some(Self::PastParticiple),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Past => "past",
            Self::PastParticiple => "past_participle",
        }
    }
}

/// Conjugation info attached to verb words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerbInfo {
    pub stem: String,
    pub tense: Tense,
    /// Whether the stem ends in a voiceless consonant ("'t kofschip")
    #[serde(alias = "kofschip")]
    pub voiceless_stem: bool,
}

// ============================================================================
// WORD ITEM
// ============================================================================

/// A finalized worksheet word. Immutable after enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordItem {
    pub word: String,
    pub category_id: CategoryId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dictation_sentence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_sentence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syllables: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syllable_type: Option<SyllableType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verb_info: Option<VerbInfo>,
}

impl WordItem {
    /// A bare item with no enrichment attached.
    pub fn bare(word: impl Into<String>, category_id: CategoryId) -> Self {
        Self {
            word: word.into(),
            category_id,
            dictation_sentence: None,
            context_sentence: None,
            syllables: None,
            syllable_type: None,
            verb_info: None,
        }
    }

    /// Case-insensitive word identity used for deduplication and matching.
    pub fn key(&self) -> String {
        self.word.to_lowercase()
    }
}

impl From<WordCandidate> for WordItem {
    fn from(candidate: WordCandidate) -> Self {
        Self::bare(candidate.word, candidate.category_id)
    }
}
