//! Grade levels, grade tiers and pipeline stages.

use serde::{Deserialize, Serialize};

// ============================================================================
// GRADE LEVEL
// ============================================================================

/// School grade ("groep") a worksheet is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GradeLevel {
    #[serde(rename = "4")]
    Group4,
    #[serde(rename = "5")]
    Group5,
    #[serde(rename = "6")]
    Group6,
    #[serde(rename = "7")]
    Group7,
    #[serde(rename = "8")]
    Group8,
    /// Combined upper-grade class
    #[serde(rename = "7/8")]
    Group78,
}

impl GradeLevel {
    /// Every grade level, lowest first.
    pub const ALL: [GradeLevel; 6] = [
        Self::Group4,
        Self::Group5,
        Self::Group6,
        Self::Group7,
        Self::Group8,
        Self::Group78,
    ];

    /// Convert to the short label used in prompts and fingerprints.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            Self::Group4 => "4",
            Self::Group5 => "5",
            Self::Group6 => "6",
            Self::Group7 => "7",
            Self::Group8 => "8",
            Self::Group78 => "7/8",
        }
    }

    /// Parse from the short label.
    pub fn from_db_str(s: &str) -> Result<Self, GradeLevelParseError> {
        match s.trim() {
            "4" => Ok(Self::Group4),
            "5" => Ok(Self::Group5),
            "6" => Ok(Self::Group6),
            "7" => Ok(Self::Group7),
            "8" => Ok(Self::Group8),
            "7/8" | "78" => Ok(Self::Group78),
            _ => Err(GradeLevelParseError(s.to_string())),
        }
    }

    /// The tier whose strategies apply to this grade.
    pub fn tier(&self) -> GradeTier {
        match self {
            Self::Group4 => GradeTier::Lower,
            Self::Group5 => GradeTier::Middle5,
            Self::Group6 => GradeTier::Middle6,
            Self::Group7 | Self::Group8 | Self::Group78 => GradeTier::Upper,
        }
    }
}

impl std::fmt::Display for GradeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_db_str())
    }
}

impl std::str::FromStr for GradeLevel {
    type Err = GradeLevelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db_str(s)
    }
}

/// Error parsing GradeLevel from string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeLevelParseError(pub String);

impl std::fmt::Display for GradeLevelParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid grade level: {}", self.0)
    }
}

impl std::error::Error for GradeLevelParseError {}

// ============================================================================
// GRADE TIER
// ============================================================================

/// Pedagogical tier. Strategy dispatch is keyed by tier, not by grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeTier {
    /// Group 4: category recognition, short concrete words
    Lower,
    /// Group 5: syllable-group ("klankgroepen") focus
    Middle5,
    /// Group 6: loanwords and diaeresis
    Middle6,
    /// Groups 7 and 8: verb spelling and grammar
    Upper,
}

impl GradeTier {
    pub const ALL: [GradeTier; 4] = [Self::Lower, Self::Middle5, Self::Middle6, Self::Upper];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lower => "lower",
            Self::Middle5 => "middle5",
            Self::Middle6 => "middle6",
            Self::Upper => "upper",
        }
    }

    /// Youngest tier gets the stricter grade-appropriateness heuristic.
    pub fn is_youngest(&self) -> bool {
        matches!(self, Self::Lower)
    }

    /// Extra per-word fields the enrichment call must deliver for this tier.
    pub fn enrichment_fields(&self) -> &'static [EnrichmentField] {
        match self {
            Self::Lower => &[],
            Self::Middle5 => &[EnrichmentField::Syllables, EnrichmentField::SyllableType],
            Self::Middle6 => &[EnrichmentField::Syllables],
            Self::Upper => &[EnrichmentField::VerbInfo],
        }
    }

    /// Whether words for this tier must always carry a syllable split.
    pub fn requires_syllables(&self) -> bool {
        self.enrichment_fields().contains(&EnrichmentField::Syllables)
    }
}

/// Grade-specific metadata attached during enrichment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentField {
    Syllables,
    SyllableType,
    VerbInfo,
}

// ============================================================================
// STAGE
// ============================================================================

/// Exercise pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Pattern recognition ("step 2")
    Analysis,
    /// Application in context ("step 3")
    Transfer,
}

impl Stage {
    pub const ALL: [Stage; 2] = [Self::Analysis, Self::Transfer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Analysis => "analysis",
            Self::Transfer => "transfer",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_level_roundtrip() {
        for grade in GradeLevel::ALL {
            let parsed = GradeLevel::from_db_str(grade.as_db_str()).unwrap();
            assert_eq!(grade, parsed);
        }
    }

    #[test]
    fn test_grade_level_rejects_unknown() {
        assert!(GradeLevel::from_db_str("3").is_err());
        assert!(GradeLevel::from_db_str("").is_err());
    }

    #[test]
    fn test_upper_grades_share_tier() {
        assert_eq!(GradeLevel::Group7.tier(), GradeTier::Upper);
        assert_eq!(GradeLevel::Group8.tier(), GradeTier::Upper);
        assert_eq!(GradeLevel::Group78.tier(), GradeTier::Upper);
    }

    #[test]
    fn test_grade_level_serde_uses_label() {
        let json = serde_json::to_string(&GradeLevel::Group78).unwrap();
        assert_eq!(json, "\"7/8\"");
        let parsed: GradeLevel = serde_json::from_str("\"5\"").unwrap();
        assert_eq!(parsed, GradeLevel::Group5);
    }

    #[test]
    fn test_syllable_tiers() {
        assert!(!GradeTier::Lower.requires_syllables());
        assert!(GradeTier::Middle5.requires_syllables());
        assert!(GradeTier::Middle6.requires_syllables());
        assert!(!GradeTier::Upper.requires_syllables());
    }
}
