//! Strategy router: (grade tier, stage) to a declarative generation task.
//!
//! Dispatch is a table of builder functions indexed by tier and stage.
//! Adding a tier means adding a row.

use crate::fallback::fixed_choices;
use crate::profile::GradeProfile;
use spellkit_core::rules::{is_loanword, DIMINUTIVE, SYLLABLE_GROUP};
use spellkit_core::{
    CategoryCatalog, CategoryId, ExerciseKind, GradeLevel, GradeTier, OutputKind, Stage,
    StrategyDescriptor, WordItem,
};

type Build = fn(&StrategyInput<'_>) -> StrategyDescriptor;

const ROUTES: [[Build; 2]; 4] = [
    [lower_analysis, lower_transfer],
    [middle5_analysis, middle5_transfer],
    [middle6_analysis, middle6_transfer],
    [upper_analysis, upper_transfer],
];

fn tier_row(tier: GradeTier) -> usize {
    match tier {
        GradeTier::Lower => 0,
        GradeTier::Middle5 => 1,
        GradeTier::Middle6 => 2,
        GradeTier::Upper => 3,
    }
}

fn stage_column(stage: Stage) -> usize {
    match stage {
        Stage::Analysis => 0,
        Stage::Transfer => 1,
    }
}

/// Generation task for one stage of a worksheet.
pub fn select_strategy(grade: GradeLevel, stage: Stage, words: &[WordItem]) -> StrategyDescriptor {
    let input = StrategyInput {
        grade,
        profile: GradeProfile::for_grade(grade),
        words,
    };
    let build = ROUTES[tier_row(grade.tier())][stage_column(stage)];
    build(&input)
}

/// Item kind for one word under a descriptor.
///
/// Group 4 analysis picks a kind per category; mixed output resolves to
/// syllable split for syllable-group words, choice for loanwords and gap
/// fill otherwise. Everything else uses the descriptor's default.
pub fn item_kind(grade: GradeLevel, output: OutputKind, category: CategoryId) -> ExerciseKind {
    match output {
        OutputKind::GapFill if grade.tier() == GradeTier::Lower => lower_item_kind(category),
        OutputKind::Mixed if category == SYLLABLE_GROUP => ExerciseKind::SyllableSplit,
        OutputKind::Mixed if is_loanword(category) => ExerciseKind::Choice,
        other => other.default_item_kind(),
    }
}

fn lower_item_kind(category: CategoryId) -> ExerciseKind {
    match category {
        1 => ExerciseKind::Mirror,
        c if fixed_choices(c).is_some() => ExerciseKind::Choice,
        _ => ExerciseKind::GapFill,
    }
}

// ============================================================================
// INPUT
// ============================================================================

struct StrategyInput<'a> {
    grade: GradeLevel,
    profile: &'static GradeProfile,
    words: &'a [WordItem],
}

impl StrategyInput<'_> {
    fn has_category(&self, id: CategoryId) -> bool {
        self.words.iter().any(|w| w.category_id == id)
    }

    fn has_verb_info(&self) -> bool {
        self.words.iter().any(|w| w.verb_info.is_some())
    }

    fn word_lines(&self, hint: impl Fn(&WordItem) -> Option<String>) -> String {
        let catalog = CategoryCatalog::builtin();
        self.words
            .iter()
            .map(|w| {
                let base = format!(
                    "- {} (category {}: {})",
                    w.word,
                    w.category_id,
                    catalog.name(w.category_id)
                );
                match hint(w) {
                    Some(h) => format!("{} -> {}", base, h),
                    None => base,
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn system_prompt(&self, role: &str) -> String {
        format!(
            "You are {} for Dutch spelling lessons in group {}.\n{}\n{}\n\
             All words, sentences and instructions you write are in Dutch. Output JSON only.",
            role,
            self.grade,
            self.profile.didactic_rules(),
            self.profile.teacher_tone
        )
    }

    fn descriptor(&self, output_kind: OutputKind, role: &str, task: String) -> StrategyDescriptor {
        StrategyDescriptor {
            output_kind,
            system_prompt: self.system_prompt(role),
            task_prompt: task,
        }
    }
}

const ANALYSIS_ITEM_SHAPE: &str = r#"{ "woord": "...", "opdracht": "...", "type": "...", "metadata": { ... } }"#;
const TRANSFER_ITEM_SHAPE: &str = r#"{ "woord": "...", "opdracht": "..." }"#;

// ============================================================================
// ANALYSIS STAGE
// ============================================================================

fn lower_analysis(input: &StrategyInput<'_>) -> StrategyDescriptor {
    let lines = input.word_lines(|w| {
        Some(match lower_item_kind(w.category_id) {
            ExerciseKind::Mirror => "type \"spiegel\": opdracht \"Schrijf het woord.\"".to_string(),
            ExerciseKind::Choice => {
                let options = fixed_choices(w.category_id).unwrap_or(&[]).join(", ");
                format!("type \"keuze\": metadata.keuzes [{}]", options)
            }
            _ if w.category_id == 11 => {
                "type \"gaten\": leave out the diminutive suffix, metadata.prefix is the stem"
                    .to_string()
            }
            _ => "type \"gaten\": leave out the taught letters, metadata.prefix and metadata.suffix"
                .to_string(),
        })
    });
    let task = format!(
        "Visual recognition for beginning spellers. One item per word:\n{}\n\
         Each item: {}",
        lines, ANALYSIS_ITEM_SHAPE
    );
    input.descriptor(OutputKind::GapFill, "a teacher for beginning spellers", task)
}

fn middle5_analysis(input: &StrategyInput<'_>) -> StrategyDescriptor {
    if input.has_category(SYLLABLE_GROUP) || input.has_category(DIMINUTIVE) {
        let task = format!(
            "Syllable work (klankgroepen). One item per word:\n{}\n\
             type \"klankgroep\", metadata.lettergrepen (bo-men) and metadata.klankgroepType \
             (kort, lang, twee-teken).\nEach item: {}",
            input.word_lines(|_| None),
            ANALYSIS_ITEM_SHAPE
        );
        return input.descriptor(OutputKind::SyllableSplit, "a syllable coach", task);
    }
    let task = format!(
        "Gap exercise. One item per word:\n{}\n\
         type \"gaten\": hide the taught letters, give metadata.prefix and metadata.suffix.\n\
         Each item: {}",
        input.word_lines(|_| None),
        ANALYSIS_ITEM_SHAPE
    );
    input.descriptor(OutputKind::GapFill, "a spelling teacher", task)
}

fn middle6_analysis(input: &StrategyInput<'_>) -> StrategyDescriptor {
    let lines = input.word_lines(|w| {
        Some(match item_kind(input.grade, OutputKind::Mixed, w.category_id) {
            ExerciseKind::SyllableSplit => {
                "type \"klankgroep\" with metadata.lettergrepen".to_string()
            }
            ExerciseKind::Choice => {
                "type \"keuze\": metadata.keuzes with the sound and its loanword spelling"
                    .to_string()
            }
            _ => "type \"gaten\" with metadata.prefix and metadata.suffix".to_string(),
        })
    });
    let task = format!(
        "Mixed exercise, the type depends on the word:\n{}\nEach item: {}",
        lines, ANALYSIS_ITEM_SHAPE
    );
    input.descriptor(OutputKind::Mixed, "a language teacher who knows word origins", task)
}

fn upper_analysis(input: &StrategyInput<'_>) -> StrategyDescriptor {
    if input.has_verb_info() {
        let task = format!(
            "Verb schema. One item per word:\n{}\n\
             type \"werkwoord\": metadata.infinitief, metadata.tijd (tt, vt, vd) and \
             metadata.hulp (the rule that decides the ending).\nEach item: {}",
            input.word_lines(|w| {
                w.verb_info
                    .as_ref()
                    .map(|v| format!("stam {}, {}", v.stem, v.tense.as_str()))
            }),
            ANALYSIS_ITEM_SHAPE
        );
        return input.descriptor(OutputKind::VerbSchema, "a grammar coach", task);
    }
    let task = format!(
        "Grammar. One item per word:\n{}\n\
         type \"grammatica\": name the word class in metadata.woordsoort.\nEach item: {}",
        input.word_lines(|_| None),
        ANALYSIS_ITEM_SHAPE
    );
    input.descriptor(OutputKind::Grammar, "a grammar coach", task)
}

// ============================================================================
// TRANSFER STAGE
// ============================================================================

fn fill_in_task(input: &StrategyInput<'_>, sentence_rule: &str) -> String {
    format!(
        "Fill-in sentences. One item per word:\n{}\n\
         {} Replace the target word with \"...\" in opdracht.\nEach item: {}",
        input.word_lines(|_| None),
        sentence_rule,
        TRANSFER_ITEM_SHAPE
    )
}

fn lower_transfer(input: &StrategyInput<'_>) -> StrategyDescriptor {
    let task = fill_in_task(
        input,
        "Short sentences of at most 7 words; the context must make the word obvious.",
    );
    input.descriptor(OutputKind::FreeContext, "a teacher for beginning spellers", task)
}

fn middle5_transfer(input: &StrategyInput<'_>) -> StrategyDescriptor {
    let task = fill_in_task(input, "Lively sentences with a clear context.");
    input.descriptor(OutputKind::FreeContext, "a spelling teacher", task)
}

fn middle6_transfer(input: &StrategyInput<'_>) -> StrategyDescriptor {
    let task = fill_in_task(input, "Informative sentences, as in a school textbook.");
    input.descriptor(OutputKind::FreeContext, "a language teacher", task)
}

fn upper_transfer(input: &StrategyInput<'_>) -> StrategyDescriptor {
    let task = format!(
        "Editor exercise. One item per word:\n{}\n\
         Write a sentence in opdracht that contains the word spelled WRONG in a phonetically \
         plausible way (cadeau -> kado). Put the wrong form in metadata.foutWoord.\n\
         Each item: {}",
        input.word_lines(|_| None),
        r#"{ "woord": "...", "opdracht": "...", "metadata": { "foutWoord": "..." } }"#
    );
    input.descriptor(OutputKind::EditorCorrection, "an editor-in-chief", task)
}
