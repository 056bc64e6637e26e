//! Per-tier teaching profiles used to shape every prompt.

use spellkit_core::{EnrichmentField, GradeLevel, GradeTier};

/// How a grade tier is addressed: language level, didactic focus, the tone a
/// teacher takes with pupils, and the extra fields enrichment must supply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeProfile {
    pub tier: GradeTier,
    pub level_prompt: &'static str,
    pub focus: &'static str,
    pub teacher_tone: &'static str,
    /// Complete enrichment item shown to the model: the base fields plus
    /// exactly the tier's extra fields.
    pub item_example: &'static str,
}

static PROFILES: [GradeProfile; 4] = [
    GradeProfile {
        tier: GradeTier::Lower,
        level_prompt: "Level: group 4 (age 7-8). Use short, concrete, everyday words \
                       a beginning speller can picture.",
        focus: "Focus on recognising the category (hakwoord, zingwoord, luchtwoord) \
                and on the tussen-u that is heard but not written.",
        teacher_tone: "A kind, patient teacher who uses very short sentences.",
        item_example: r#"{ "woord": "melk", "categorie": 1, "dictee": "Ik drink melk.", "context": "Bij het ontbijt drink ik een glas melk." }"#,
    },
    GradeProfile {
        tier: GradeTier::Middle5,
        level_prompt: "Level: group 5 (age 8-9). Words may have two or three syllables.",
        focus: "Focus on KLANKGROEPEN: short sound gets a doubled consonant, long sound \
                gets an open syllable. Think of the syllable machine.",
        teacher_tone: "An enthusiastic teacher who talks about short, long and \
                       two-letter sounds.",
        item_example: r#"{ "woord": "bomen", "categorie": 10, "dictee": "De bomen zijn hoog.", "context": "In het bos staan veel bomen.", "lettergrepen": "bo-men", "klankgroepType": "lang" }"#,
    },
    GradeProfile {
        tier: GradeTier::Middle6,
        level_prompt: "Level: group 6 (age 9-10). Loanwords and longer compounds are fine.",
        focus: "Focus on loanwords (French and English origin) and the trema.",
        teacher_tone: "A knowledgeable teacher who mentions where a word comes from.",
        item_example: r#"{ "woord": "cadeau", "categorie": 24, "dictee": "Ik krijg een cadeau.", "context": "Voor mijn verjaardag kreeg ik een mooi cadeau.", "lettergrepen": "ca-deau" }"#,
    },
    GradeProfile {
        tier: GradeTier::Upper,
        level_prompt: "Level: groups 7 and 8 (age 10-12). Use verbs in every tense and \
                       richer vocabulary.",
        focus: "Focus on verb spelling (stem, 't kofschip, past participles) and grammar.",
        teacher_tone: "A coach who refers to the stem and to 't kofschip.",
        item_example: r#"{ "woord": "verhuisd", "categorie": 9, "dictee": "Wij zijn verhuisd.", "context": "Het gezin is vorige week verhuisd naar Utrecht.", "werkwoord": { "stam": "verhuis", "tijd": "vd", "kofschip": false } }"#,
    },
];

impl GradeProfile {
    pub fn for_tier(tier: GradeTier) -> &'static GradeProfile {
        match tier {
            GradeTier::Lower => &PROFILES[0],
            GradeTier::Middle5 => &PROFILES[1],
            GradeTier::Middle6 => &PROFILES[2],
            GradeTier::Upper => &PROFILES[3],
        }
    }

    pub fn for_grade(grade: GradeLevel) -> &'static GradeProfile {
        Self::for_tier(grade.tier())
    }

    pub fn extra_fields(&self) -> &'static [EnrichmentField] {
        self.tier.enrichment_fields()
    }

    /// Level and focus as one system-prompt paragraph.
    pub fn didactic_rules(&self) -> String {
        format!("{}\n{}", self.level_prompt, self.focus)
    }

    /// Field list for enrichment requests, matching `extra_fields`.
    pub fn extra_field_instructions(&self) -> String {
        let mut lines = Vec::new();
        for field in self.extra_fields() {
            lines.push(match field {
                EnrichmentField::Syllables => {
                    "\"lettergrepen\": the syllable split with hyphens (bo-men)"
                }
                EnrichmentField::SyllableType => {
                    "\"klankgroepType\": kort, lang, twee-teken or medeklinker"
                }
                EnrichmentField::VerbInfo => {
                    "\"werkwoord\": { \"stam\", \"tijd\" (tt, vt, vd), \"kofschip\" (true/false) } for verbs"
                }
            });
        }
        lines.join("\n")
    }
}
