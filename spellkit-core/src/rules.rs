//! Per-category spelling rule checks and taught-pattern tables.
//!
//! Two tables live here. The rule table answers "does this word plausibly
//! exhibit the pattern its category teaches?" and drives candidate ranking.
//! The taught-pattern table locates the substring a gap-fill exercise hides.

use crate::CategoryId;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

// ============================================================================
// CATEGORY GROUPS
// ============================================================================

/// Categories whose words a general corpus does not reliably contain
/// (loanwords, diacritics, apostrophes, hyphens, compounds). The dictionary
/// check is treated as satisfied for these.
pub const DICTIONARY_EXEMPT: &[CategoryId] =
    &[14, 16, 21, 23, 24, 25, 26, 28, 29, 30, 31, 32, 33, 34, 35];

/// Categories whose words legitimately carry an apostrophe or hyphen.
pub const PUNCTUATED: &[CategoryId] = &[14, 16, 30, 33];

/// Loanword categories, answered with a sound-to-spelling choice in mixed output.
pub const LOANWORD: &[CategoryId] = &[18, 21, 22, 23, 24, 25, 26, 27, 28, 29, 31];

/// Category taught with the syllable-group schema.
pub const SYLLABLE_GROUP: CategoryId = 10;

/// Category holding diminutives, split into stem and suffix.
pub const DIMINUTIVE: CategoryId = 11;

pub fn is_dictionary_exempt(category: CategoryId) -> bool {
    DICTIONARY_EXEMPT.contains(&category)
}

pub fn allows_punctuation(category: CategoryId) -> bool {
    PUNCTUATED.contains(&category)
}

pub fn is_loanword(category: CategoryId) -> bool {
    LOANWORD.contains(&category)
}

// ============================================================================
// RULE CHECK
// ============================================================================

enum Check {
    Matches(&'static str),
    /// Doubled consonant or open syllable, longer than three letters
    SyllableGroup,
    /// Contains "i" but never "ie"
    KiloVowel,
    Contains(char),
    /// Longer than six letters without a space
    Compound,
}

static RULE_TABLE: Lazy<HashMap<CategoryId, (Check, Option<Regex>)>> = Lazy::new(|| {
    let checks: Vec<(CategoryId, Check)> = vec![
        (1, Check::Matches(r"^[^aeiouy]*[aeiou]+[^aeiouy]*$")),
        (2, Check::Matches(r"(ng|nk)$")),
        (3, Check::Matches(r"cht")),
        (4, Check::Matches(r"nk$")),
        (5, Check::Matches(r"(eer|oor|eur)")),
        (6, Check::Matches(r"(aai|ooi|oei)$")),
        (7, Check::Matches(r"(eeuw|ieuw)")),
        (8, Check::Matches(r"[db]$")),
        (9, Check::Matches(r"^(be|ge|ver)")),
        (10, Check::SyllableGroup),
        (11, Check::Matches(r"je$")),
        (12, Check::Matches(r"(ig|lijk)$")),
        (13, Check::KiloVowel),
        (14, Check::Matches(r"'s$")),
        (15, Check::Matches(r"c")),
        (16, Check::Matches(r"'s$")),
        (17, Check::Matches(r"tie$")),
        (18, Check::Matches(r"c")),
        (19, Check::Matches(r"isch$")),
        (20, Check::Matches(r"x")),
        (21, Check::Matches(r"ch|sh")),
        (22, Check::Matches(r"th")),
        (23, Check::Matches(r"é")),
        (24, Check::Matches(r"eau")),
        (25, Check::Matches(r"ou")),
        (26, Check::Matches(r"g")),
        (27, Check::Matches(r"y$")),
        (28, Check::Matches(r"[äëïöü]")),
        (29, Check::Matches(r"air$")),
        (30, Check::Contains('-')),
        (31, Check::Matches(r"oir")),
        (32, Check::Matches(r"e")),
        (33, Check::Contains('\'')),
        (34, Check::Matches(r"^(ab|ad|con|ob|sub)")),
        (35, Check::Compound),
        (36, Check::Matches(r"ei")),
        (37, Check::Matches(r"au")),
    ];

    checks
        .into_iter()
        .map(|(id, check)| {
            let re = match &check {
                Check::Matches(pattern) => {
                    Some(Regex::new(pattern).expect("Invalid rule regex"))
                }
                _ => None,
            };
            (id, (check, re))
        })
        .collect()
});

static DOUBLED_CONSONANT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(bb|dd|ff|gg|kk|ll|mm|nn|pp|rr|ss|tt|vv|zz)").expect("Invalid consonant regex")
});

static OPEN_SYLLABLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[aeiou][bdfgklmnprstvz][aeiou]").expect("Invalid syllable regex"));

/// Whether `word` plausibly exhibits the spelling pattern of `category`.
///
/// Unknown categories never pass.
pub fn passes_rule(word: &str, category: CategoryId) -> bool {
    let w = word.trim().to_lowercase();
    let Some((check, re)) = RULE_TABLE.get(&category) else {
        return false;
    };

    match check {
        Check::Matches(_) => re.as_ref().map(|re| re.is_match(&w)).unwrap_or(false),
        Check::SyllableGroup => {
            w.chars().count() > 3 && (DOUBLED_CONSONANT.is_match(&w) || OPEN_SYLLABLE.is_match(&w))
        }
        Check::KiloVowel => w.contains('i') && !w.contains("ie"),
        Check::Contains(c) => w.contains(*c),
        Check::Compound => w.chars().count() > 6 && !w.contains(' '),
    }
}

// ============================================================================
// TAUGHT PATTERNS
// ============================================================================

// Where a pattern has capture groups, the first participating group is the
// taught part; otherwise the whole match is.
static TAUGHT_TABLE: Lazy<HashMap<CategoryId, Regex>> = Lazy::new(|| {
    let patterns: &[(CategoryId, &str)] = &[
        (1, r"[aeiou]+"),
        (2, r"ng|nk"),
        (3, r"cht|ch"),
        (4, r"nk"),
        (5, r"eer|oor|eur"),
        (6, r"(aai|ooi|oei)$"),
        (7, r"eeuw|ieuw"),
        (8, r"(d|t|b)$"),
        (9, r"^(be|ge|ver)"),
        (10, r"(bb|dd|ff|gg|kk|ll|mm|nn|pp|rr|ss|tt|vv|zz)|([aeiou])[bdfgklmnprstvz][aeiou]"),
        (11, r"(pje|tje|je)$"),
        (12, r"(ig|lijk)$"),
        (13, r"(i)(?:[^e]|$)"),
        (14, r"'s"),
        (15, r"c"),
        (16, r"'s"),
        (17, r"tie$"),
        (18, r"c"),
        (19, r"isch$"),
        (20, r"x"),
        (21, r"ch|sh"),
        (22, r"th"),
        (23, r"é"),
        (24, r"eau"),
        (25, r"ou"),
        (26, r"^(g)[iyeé]|(g)e$"),
        (27, r"y"),
        (28, r"[äëïöü]"),
        (29, r"air$"),
        (30, r"-"),
        (31, r"oir"),
        (32, r"e(n)[bcdfghjklmpqrstvwxz]"),
        (33, r"'s?"),
        (34, r"^(ad|ab|ob|sub|con)"),
        (36, r"ei"),
        (37, r"au"),
    ];

    patterns
        .iter()
        .map(|(id, p)| {
            let re = Regex::new(&format!("(?i){}", p)).expect("Invalid taught-pattern regex");
            (*id, re)
        })
        .collect()
});

/// Byte range of the taught substring inside `word`, if the category has a
/// pattern and it matches.
pub fn taught_span(word: &str, category: CategoryId) -> Option<(usize, usize)> {
    let re = TAUGHT_TABLE.get(&category)?;
    let caps = re.captures(word)?;
    let m = caps
        .iter()
        .skip(1)
        .flatten()
        .next()
        .or_else(|| caps.get(0))?;
    if m.start() == m.end() {
        return None;
    }
    Some((m.start(), m.end()))
}

/// The taught substring itself.
pub fn taught_part(word: &str, category: CategoryId) -> Option<&str> {
    taught_span(word, category).map(|(start, end)| &word[start..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_table_compiles() {
        for id in 1..=37 {
            let _ = passes_rule("woord", id);
            let _ = taught_span("woord", id);
        }
    }

    #[test]
    fn test_passes_rule_examples() {
        assert!(passes_rule("koning", 2));
        assert!(passes_rule("bank", 4));
        assert!(!passes_rule("bang", 4));
        assert!(passes_rule("lucht", 3));
        assert!(passes_rule("hond", 8));
        assert!(passes_rule("gebak", 9));
        assert!(passes_rule("bakker", 10));
        assert!(passes_rule("bomen", 10));
        assert!(!passes_rule("bom", 10));
        assert!(passes_rule("piloot", 13));
        assert!(!passes_rule("fiets", 13));
        assert!(passes_rule("Auto's", 14));
        assert!(passes_rule("café", 23));
        assert!(passes_rule("cadeau", 24));
        assert!(passes_rule("na-apen", 30));
        assert!(passes_rule("voetbal", 35));
        assert!(passes_rule("trein", 36));
    }

    #[test]
    fn test_hakwoord_single_vowel_group() {
        assert!(passes_rule("melk", 1));
        assert!(passes_rule("boom", 1));
        assert!(!passes_rule("bomen", 1));
    }

    #[test]
    fn test_unknown_category_never_passes() {
        assert!(!passes_rule("boom", 0));
        assert!(!passes_rule("boom", 99));
    }

    #[test]
    fn test_taught_span_ng_nk() {
        assert_eq!(taught_part("koning", 2), Some("ng"));
        assert_eq!(taught_part("bank", 4), Some("nk"));
        assert_eq!(taught_span("koning", 2), Some((4, 6)));
    }

    #[test]
    fn test_taught_span_uses_capture_group() {
        assert_eq!(taught_part("piloot", 13), Some("i"));
        assert_eq!(taught_part("garage", 26), Some("g"));
        assert_eq!(taught_span("garage", 26), Some((4, 5)));
        assert_eq!(taught_part("bomen", 10), Some("o"));
        assert_eq!(taught_part("bakker", 10), Some("kk"));
        assert_eq!(taught_part("pannenkoek", 32), Some("n"));
    }

    #[test]
    fn test_taught_span_is_case_insensitive() {
        assert_eq!(taught_part("CADEAU", 24), Some("EAU"));
    }

    #[test]
    fn test_taught_span_none_without_pattern() {
        assert_eq!(taught_span("voetbal", 35), None);
        assert_eq!(taught_span("boom", 2), None);
    }

    #[test]
    fn test_exempt_and_punctuated_lists() {
        assert!(is_dictionary_exempt(24));
        assert!(!is_dictionary_exempt(2));
        assert!(allows_punctuation(30));
        assert!(!allows_punctuation(2));
    }
}
