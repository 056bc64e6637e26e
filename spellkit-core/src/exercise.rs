//! Exercise items, exercise sets and strategy descriptors.

use crate::{CategoryId, Stage};
use serde::{Deserialize, Serialize};

// ============================================================================
// OUTPUT KINDS
// ============================================================================

/// Expected output shape of a generation task, as selected by the strategy router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputKind {
    GapFill,
    SyllableSplit,
    /// Resolved per item (syllable split, choice or gap fill)
    Mixed,
    VerbSchema,
    Grammar,
    /// Context sentence with the target word left out, answered as fill-in items
    FreeContext,
    EditorCorrection,
    Choice,
}

impl OutputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GapFill => "gap-fill",
            Self::SyllableSplit => "syllable-split",
            Self::Mixed => "mixed",
            Self::VerbSchema => "verb-schema",
            Self::Grammar => "grammar",
            Self::FreeContext => "free-context",
            Self::EditorCorrection => "editor-correction",
            Self::Choice => "choice",
        }
    }

    /// Item kind used when the model does not name one.
    pub fn default_item_kind(&self) -> ExerciseKind {
        match self {
            Self::GapFill | Self::Mixed => ExerciseKind::GapFill,
            Self::SyllableSplit => ExerciseKind::SyllableSplit,
            Self::VerbSchema => ExerciseKind::VerbSchema,
            Self::Grammar => ExerciseKind::Grammar,
            Self::FreeContext => ExerciseKind::FillIn,
            Self::EditorCorrection => ExerciseKind::EditorCorrection,
            Self::Choice => ExerciseKind::Choice,
        }
    }
}

impl std::fmt::Display for OutputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a single exercise item, consumed by presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExerciseKind {
    GapFill,
    Choice,
    /// Copy the word as shown
    Mirror,
    SyllableSplit,
    VerbSchema,
    Grammar,
    FillIn,
    EditorCorrection,
    Sort,
}

impl ExerciseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GapFill => "gap-fill",
            Self::Choice => "choice",
            Self::Mirror => "mirror",
            Self::SyllableSplit => "syllable-split",
            Self::VerbSchema => "verb-schema",
            Self::Grammar => "grammar",
            Self::FillIn => "fill-in",
            Self::EditorCorrection => "editor-correction",
            Self::Sort => "sort",
        }
    }

    /// Lenient parse of the type tags the model returns, in either language.
    pub fn from_model_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "gaten" | "gap-fill" | "gap_fill" | "gap" => Some(Self::GapFill),
            "keuze" | "choice" => Some(Self::Choice),
            "spiegel" | "mirror" => Some(Self::Mirror),
            "klankgroep" | "splits" | "syllable-split" | "syllable_split" => {
                Some(Self::SyllableSplit)
            }
            "werkwoord" | "verb-schema" | "verb_schema" | "verb" => Some(Self::VerbSchema),
            "grammatica" | "grammar" => Some(Self::Grammar),
            "invul" | "invulzin" | "fill-in" | "fill_in" | "context" => Some(Self::FillIn),
            "redacteur" | "editor-correction" | "editor_correction" | "editor" => {
                Some(Self::EditorCorrection)
            }
            "sorteer" | "sort" => Some(Self::Sort),
            _ => None,
        }
    }

    /// Instruction shown when the model supplies none.
    pub fn default_instruction(&self) -> &'static str {
        match self {
            Self::GapFill => "Fill in the missing letters.",
            Self::Choice => "Choose the correct spelling.",
            Self::Mirror => "Write the word down.",
            Self::SyllableSplit => "Split the word into syllables.",
            Self::VerbSchema => "Complete the verb schema.",
            Self::Grammar => "Name the word class.",
            Self::FillIn => "Fill in the missing word.",
            Self::EditorCorrection => "Find the mistake and correct it.",
            Self::Sort => "Write the word in the right column.",
        }
    }
}

impl std::fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// EXERCISE ITEMS
// ============================================================================

/// Per-item metadata. The string fields are always populated once assembly has run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseMetadata {
    /// Word part before the gap
    pub prefix: String,
    /// Word part after the gap
    pub suffix: String,
    /// Syllable split, hyphen separated
    pub syllables: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syllable_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrong_spelling: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infinitive: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tense: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_class: Option<String>,
}

impl ExerciseMetadata {
    /// Names of kind-specific fields that are still missing.
    pub fn missing_required(&self, kind: ExerciseKind) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.prefix.is_empty() {
            missing.push("prefix");
        }
        if self.suffix.is_empty() {
            missing.push("suffix");
        }
        if self.syllables.is_empty() {
            missing.push("syllables");
        }
        match kind {
            ExerciseKind::Choice if self.choices.is_empty() => missing.push("choices"),
            ExerciseKind::EditorCorrection if self.wrong_spelling.is_none() => {
                missing.push("wrong_spelling")
            }
            ExerciseKind::VerbSchema if self.infinitive.is_none() => missing.push("infinitive"),
            _ => {}
        }
        missing
    }

    pub fn is_complete(&self, kind: ExerciseKind) -> bool {
        self.missing_required(kind).is_empty()
    }
}

/// One analysis-stage or transfer-stage exercise slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseItem {
    pub id: String,
    pub instruction_text: String,
    pub word: String,
    pub category_id: CategoryId,
    pub kind: ExerciseKind,
    pub stage: Stage,
    pub metadata: ExerciseMetadata,
}

/// Step-1 sorting exercise: one column per category, one item per word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortingExercise {
    pub categories: Vec<CategoryId>,
    pub items: Vec<ExerciseItem>,
}

/// Complete exercise output for one worksheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseSet {
    pub analysis: Vec<ExerciseItem>,
    pub transfer: Vec<ExerciseItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sorting: Option<SortingExercise>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imprint_instruction: Option<String>,
}

impl ExerciseSet {
    /// An empty but well-formed set.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.analysis.is_empty() && self.transfer.is_empty()
    }

    /// All model-derived items, analysis first.
    pub fn items(&self) -> impl Iterator<Item = &ExerciseItem> {
        self.analysis.iter().chain(self.transfer.iter())
    }
}

// ============================================================================
// STRATEGY DESCRIPTOR
// ============================================================================

/// Declarative generation task for one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyDescriptor {
    pub output_kind: OutputKind,
    pub system_prompt: String,
    pub task_prompt: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exercise_kind_parses_both_languages() {
        assert_eq!(ExerciseKind::from_model_str("gaten"), Some(ExerciseKind::GapFill));
        assert_eq!(
            ExerciseKind::from_model_str("Klankgroep"),
            Some(ExerciseKind::SyllableSplit)
        );
        assert_eq!(
            ExerciseKind::from_model_str("editor-correction"),
            Some(ExerciseKind::EditorCorrection)
        );
        assert_eq!(ExerciseKind::from_model_str("visueel"), None);
    }

    #[test]
    fn test_missing_required_by_kind() {
        let meta = ExerciseMetadata {
            prefix: "ba".to_string(),
            suffix: "k".to_string(),
            syllables: "bank".to_string(),
            ..Default::default()
        };
        assert!(meta.is_complete(ExerciseKind::GapFill));
        assert_eq!(meta.missing_required(ExerciseKind::Choice), vec!["choices"]);
        assert_eq!(
            meta.missing_required(ExerciseKind::EditorCorrection),
            vec!["wrong_spelling"]
        );
    }

    #[test]
    fn test_empty_metadata_reports_core_fields() {
        let meta = ExerciseMetadata::default();
        let missing = meta.missing_required(ExerciseKind::GapFill);
        assert!(missing.contains(&"prefix"));
        assert!(missing.contains(&"suffix"));
        assert!(missing.contains(&"syllables"));
    }

    #[test]
    fn test_one_sided_split_is_incomplete() {
        let meta = ExerciseMetadata {
            prefix: "koni".to_string(),
            syllables: "ko-ning".to_string(),
            ..Default::default()
        };
        assert_eq!(meta.missing_required(ExerciseKind::GapFill), vec!["suffix"]);
    }

    #[test]
    fn test_empty_set_is_well_formed() {
        let set = ExerciseSet::empty();
        assert!(set.is_empty());
        let json = serde_json::to_value(&set).unwrap();
        assert!(json["analysis"].as_array().unwrap().is_empty());
        assert!(json["transfer"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_output_kind_default_item_kind() {
        assert_eq!(OutputKind::Mixed.default_item_kind(), ExerciseKind::GapFill);
        assert_eq!(
            OutputKind::EditorCorrection.default_item_kind(),
            ExerciseKind::EditorCorrection
        );
        assert_eq!(OutputKind::FreeContext.default_item_kind(), ExerciseKind::FillIn);
    }

    #[test]
    fn test_output_kind_tags() {
        assert_eq!(OutputKind::FreeContext.to_string(), "free-context");
        assert_eq!(
            serde_json::to_value(OutputKind::FreeContext).unwrap(),
            "free-context"
        );
        assert_eq!(OutputKind::VerbSchema.as_str(), "verb-schema");
    }
}
