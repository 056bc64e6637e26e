//! Deterministic metadata for when the generator leaves fields out.
//!
//! Everything here is pure and total: each function returns a usable value
//! for any non-empty word.

use spellkit_core::rules::{taught_span, SYLLABLE_GROUP};
use spellkit_core::{CategoryCatalog, CategoryId, SyllableType};

// ============================================================================
// GAP SPLIT
// ============================================================================

/// Split a word around the substring its category teaches.
///
/// Returns `(prefix, suffix)`: the text before and after the gap. Both are
/// non-empty for any word of two or more characters. A taught part at the
/// start of the word leaves its first letter in the prefix, one at the end
/// leaves its last letter in the suffix (koning -> koni...g). Without a
/// match, or when nothing is left for the gap, the split is first letter /
/// rest.
pub fn gap_split(word: &str, category: CategoryId) -> (String, String) {
    let Some((start, end)) = taught_span(word, category) else {
        return first_letter_split(word);
    };
    let start = if start == 0 {
        word.chars().next().map(char::len_utf8).unwrap_or(0)
    } else {
        start
    };
    let end = if end == word.len() {
        word.len() - word.chars().last().map(char::len_utf8).unwrap_or(0)
    } else {
        end
    };
    if start < end {
        (word[..start].to_string(), word[end..].to_string())
    } else {
        first_letter_split(word)
    }
}

fn first_letter_split(word: &str) -> (String, String) {
    match word.chars().next() {
        Some(first) => {
            let cut = first.len_utf8();
            (word[..cut].to_string(), word[cut..].to_string())
        }
        None => (String::new(), String::new()),
    }
}

// ============================================================================
// SYLLABLES
// ============================================================================

const DIGRAPH_CONSONANTS: &[&str] = &["ch"];

fn is_vowel(chars: &[char], i: usize) -> bool {
    let c = chars[i];
    if "aeiouyáéíóúàèìòùäëïöüâêîôû".contains(c) {
        return true;
    }
    // the j of "ij" belongs to the vowel
    c == 'j' && i > 0 && chars[i - 1] == 'i'
}

/// Heuristic syllable split on vowel clusters, hyphen separated.
///
/// One consonant between two vowel groups starts the next syllable (bo-men),
/// a cluster splits after its first consonant (bak-ker), and "ch" stays
/// together (la-chen). Existing hyphens are kept as boundaries.
pub fn syllable_split(word: &str) -> String {
    word.split('-')
        .map(split_part)
        .collect::<Vec<_>>()
        .join("-")
}

fn split_part(part: &str) -> String {
    let chars: Vec<char> = part.chars().collect();
    let lower: Vec<char> = part.to_lowercase().chars().collect();
    if chars.len() != lower.len() {
        return part.to_string();
    }

    // Index ranges of vowel groups.
    let mut groups: Vec<(usize, usize)> = Vec::new();
    let mut i = 0;
    while i < lower.len() {
        if is_vowel(&lower, i) {
            let start = i;
            while i < lower.len() && is_vowel(&lower, i) {
                i += 1;
            }
            groups.push((start, i));
        } else {
            i += 1;
        }
    }
    if groups.len() < 2 {
        return part.to_string();
    }

    let mut cuts = Vec::new();
    for pair in groups.windows(2) {
        let (gap_start, gap_end) = (pair[0].1, pair[1].0);
        let cluster: String = lower[gap_start..gap_end].iter().collect();
        let cut = match gap_end - gap_start {
            0 | 1 => gap_start,
            _ if DIGRAPH_CONSONANTS.contains(&cluster.as_str()) => gap_start,
            _ => gap_start + 1,
        };
        if cut > 0 {
            cuts.push(cut);
        }
    }

    let mut out = String::with_capacity(part.len() + cuts.len());
    for (idx, c) in chars.iter().enumerate() {
        if cuts.contains(&idx) {
            out.push('-');
        }
        out.push(*c);
    }
    out
}

/// Sound type of the first syllable.
pub fn syllable_type(word: &str) -> SyllableType {
    let split = syllable_split(&word.to_lowercase());
    let first = split.split('-').next().unwrap_or_default();
    let chars: Vec<char> = first.chars().collect();

    let Some(start) = (0..chars.len()).find(|&i| is_vowel(&chars, i)) else {
        return SyllableType::Consonant;
    };
    let mut end = start;
    while end < chars.len() && is_vowel(&chars, end) {
        end += 1;
    }
    let vowels = &chars[start..end];
    let open = end == chars.len();

    match vowels.len() {
        1 if open => SyllableType::Long,
        1 => SyllableType::Short,
        2 if vowels[0] == vowels[1] => SyllableType::Long,
        2 | 3 => SyllableType::Digraph,
        _ => SyllableType::Other,
    }
}

// ============================================================================
// MISSPELLINGS
// ============================================================================

enum Swap {
    /// Replace the first occurrence anywhere
    Any(&'static str, &'static str),
    /// Replace only at the end of the word
    End(&'static str, &'static str),
    /// Replace only at the start of the word
    Start(&'static str, &'static str),
}

// First applicable swap per category wins.
const PHONETIC_SWAPS: &[(CategoryId, &[Swap])] = &[
    (1, &[Swap::End("lk", "luk"), Swap::End("rk", "ruk"), Swap::End("lm", "lum")]),
    (2, &[Swap::Any("ng", "ngg"), Swap::Any("nk", "ngk")]),
    (3, &[Swap::Any("cht", "gt")]),
    (4, &[Swap::Any("nk", "ngk")]),
    (5, &[Swap::Any("eer", "ir"), Swap::Any("oor", "or"), Swap::Any("eur", "ur")]),
    (6, &[Swap::End("aai", "aaj"), Swap::End("ooi", "ooj"), Swap::End("oei", "oej")]),
    (7, &[Swap::Any("eeuw", "eew"), Swap::Any("ieuw", "iew")]),
    (8, &[Swap::End("d", "t"), Swap::End("b", "p")]),
    (9, &[Swap::Start("be", "bu"), Swap::Start("ge", "gu"), Swap::Start("ver", "vur")]),
    (11, &[Swap::End("je", "ie")]),
    (12, &[Swap::End("lijk", "luk"), Swap::End("ig", "ug")]),
    (13, &[Swap::Any("i", "ie")]),
    (14, &[Swap::Any("'", "")]),
    (15, &[Swap::Any("c", "s")]),
    (16, &[Swap::Any("'", "")]),
    (17, &[Swap::End("tie", "tsie")]),
    (18, &[Swap::Any("c", "k")]),
    (19, &[Swap::End("isch", "ies")]),
    (20, &[Swap::Any("x", "ks")]),
    (21, &[Swap::Any("ch", "sj"), Swap::Any("sh", "sj")]),
    (22, &[Swap::Any("th", "t")]),
    (23, &[Swap::Any("é", "e")]),
    (24, &[Swap::Any("eau", "o")]),
    (25, &[Swap::Any("ou", "oe")]),
    (26, &[Swap::Any("g", "zj")]),
    (27, &[Swap::End("y", "ie")]),
    (28, &[
        Swap::Any("ë", "e"),
        Swap::Any("ï", "i"),
        Swap::Any("ö", "o"),
        Swap::Any("ü", "u"),
        Swap::Any("ä", "a"),
    ]),
    (29, &[Swap::End("air", "èr")]),
    (30, &[Swap::Any("-", "")]),
    (31, &[Swap::Any("oir", "waar")]),
    (32, &[Swap::Any("nen", "ne")]),
    (33, &[Swap::Any("'", "")]),
    (34, &[Swap::Start("ad", "at"), Swap::Start("ab", "ap"), Swap::Start("ob", "op")]),
    (36, &[Swap::Any("ei", "ij")]),
    (37, &[Swap::Any("au", "ou")]),
];

// Tried when the category has no applicable swap.
const GENERIC_SWAPS: &[Swap] = &[
    Swap::Any("eau", "o"),
    Swap::Any("c", "k"),
    Swap::End("d", "t"),
    Swap::Any("ei", "ij"),
    Swap::Any("au", "ou"),
];

impl Swap {
    fn apply(&self, word: &str) -> Option<String> {
        match self {
            Swap::Any(from, to) => word.find(*from).map(|i| {
                format!("{}{}{}", &word[..i], to, &word[i + from.len()..])
            }),
            Swap::End(from, to) => word
                .strip_suffix(*from)
                .map(|stem| format!("{}{}", stem, to)),
            Swap::Start(from, to) => word
                .strip_prefix(*from)
                .map(|rest| format!("{}{}", to, rest)),
        }
    }
}

/// A phonetically plausible misspelling, always different from `word`.
pub fn misspelling(word: &str, category: CategoryId) -> String {
    let lower = word.to_lowercase();

    if let Some(info) = CategoryCatalog::builtin().get(category) {
        if info.example.to_lowercase() == lower && info.misspelling.to_lowercase() != lower {
            return info.misspelling.clone();
        }
    }

    if category == SYLLABLE_GROUP {
        if let Some(wrong) = syllable_group_misspelling(&lower) {
            return wrong;
        }
    }

    let category_swaps = PHONETIC_SWAPS
        .iter()
        .find(|(id, _)| *id == category)
        .map(|(_, swaps)| *swaps)
        .unwrap_or(&[]);

    category_swaps
        .iter()
        .chain(GENERIC_SWAPS.iter())
        .filter_map(|swap| swap.apply(&lower))
        .find(|wrong| *wrong != lower && !wrong.is_empty())
        .unwrap_or_else(|| tussen_u(&lower))
}

// bakker -> baker, bomen -> boomen
fn syllable_group_misspelling(word: &str) -> Option<String> {
    let chars: Vec<char> = word.chars().collect();
    for i in 1..chars.len() {
        if chars[i] == chars[i - 1] && !"aeiou".contains(chars[i]) {
            let mut out: String = chars[..i].iter().collect();
            out.extend(&chars[i + 1..]);
            return Some(out);
        }
    }
    let split = syllable_split(word);
    let first = split.split('-').next()?;
    let last = first.chars().last()?;
    if split.contains('-') && "aeiou".contains(last) {
        return Some(format!("{}{}{}", first, last, &word[first.len()..]));
    }
    None
}

// Spells out the tussen-u: melk -> meluk. Falls back to doubling the last letter.
fn tussen_u(word: &str) -> String {
    let chars: Vec<char> = word.chars().collect();
    let n = chars.len();
    if n >= 2 && !is_vowel(&chars, n - 1) && !is_vowel(&chars, n - 2) {
        let mut out: String = chars[..n - 1].iter().collect();
        out.push('u');
        out.push(chars[n - 1]);
        return out;
    }
    match chars.last() {
        Some(last) => format!("{}{}", word, last),
        None => "?".to_string(),
    }
}

// ============================================================================
// CHOICES
// ============================================================================

const CHOICE_TABLE: &[(CategoryId, &[&str])] = &[
    (2, &["ng", "nk"]),
    (3, &["g", "ch", "cht"]),
    (4, &["ng", "nk"]),
    (5, &["eer", "oor", "eur"]),
    (8, &["d", "t"]),
    (9, &["be", "ge", "ver"]),
    (12, &["ig", "lijk"]),
];

/// The fixed spelling contrast a category is drilled with, if any.
pub fn fixed_choices(category: CategoryId) -> Option<&'static [&'static str]> {
    CHOICE_TABLE
        .iter()
        .find(|(id, _)| *id == category)
        .map(|(_, options)| *options)
}

/// Options for a choice item.
///
/// Categories with a fixed contrast use it; otherwise the taught substring is
/// offered next to its misspelled form, sorted so the order gives nothing away.
pub fn choices(word: &str, category: CategoryId) -> Vec<String> {
    if let Some(options) = fixed_choices(category) {
        return options.iter().map(|o| o.to_string()).collect();
    }

    let mut options = match taught_span(word, category) {
        Some((start, end)) => {
            let part = word[start..end].to_lowercase();
            let wrong = misspelling(&part, category);
            if wrong != part && !wrong.is_empty() {
                vec![part, wrong]
            } else {
                vec![word.to_lowercase(), misspelling(word, category)]
            }
        }
        None => vec![word.to_lowercase(), misspelling(word, category)],
    };
    options.sort();
    options.dedup();
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gap_split_at_first_match() {
        assert_eq!(gap_split("jongen", 2), ("jo".to_string(), "en".to_string()));
    }

    #[test]
    fn test_gap_split_keeps_both_sides_when_match_ends_word() {
        assert_eq!(gap_split("koning", 2), ("koni".to_string(), "g".to_string()));
        assert_eq!(gap_split("bank", 2), ("ba".to_string(), "k".to_string()));
        assert_eq!(gap_split("cadeau", 24), ("cad".to_string(), "u".to_string()));
        assert_eq!(gap_split("boompje", 11), ("boom".to_string(), "e".to_string()));
        for (word, cat) in [("koning", 2), ("slang", 2), ("cadeau", 24), ("trein", 36)] {
            let (prefix, suffix) = gap_split(word, cat);
            assert!(!prefix.is_empty() && !suffix.is_empty(), "{} / {}", word, cat);
        }
    }

    #[test]
    fn test_gap_split_falls_back_to_first_letter() {
        assert_eq!(gap_split("voetbal", 35), ("v".to_string(), "oetbal".to_string()));
        assert_eq!(gap_split("école", 35), ("é".to_string(), "cole".to_string()));
        assert_eq!(gap_split("", 35), (String::new(), String::new()));
        assert_eq!(gap_split("ei", 36), ("e".to_string(), "i".to_string()));
    }

    #[test]
    fn test_syllable_split() {
        assert_eq!(syllable_split("bomen"), "bo-men");
        assert_eq!(syllable_split("bakker"), "bak-ker");
        assert_eq!(syllable_split("lachen"), "la-chen");
        assert_eq!(syllable_split("zingen"), "zin-gen");
        assert_eq!(syllable_split("boom"), "boom");
        assert_eq!(syllable_split("na-apen"), "na-a-pen");
        assert_eq!(syllable_split("lijken"), "lij-ken");
    }

    #[test]
    fn test_syllable_type() {
        assert_eq!(syllable_type("bomen"), SyllableType::Long);
        assert_eq!(syllable_type("bakker"), SyllableType::Short);
        assert_eq!(syllable_type("manen"), SyllableType::Long);
        assert_eq!(syllable_type("maan"), SyllableType::Long);
        assert_eq!(syllable_type("trein"), SyllableType::Digraph);
        assert_eq!(syllable_type("brr"), SyllableType::Consonant);
    }

    #[test]
    fn test_misspelling_follows_category() {
        assert_eq!(misspelling("cadeau", 24), "kado");
        assert_eq!(misspelling("bureau", 24), "buro");
        assert_eq!(misspelling("paard", 8), "paart");
        assert_eq!(misspelling("trein", 36), "trijn");
        assert_eq!(misspelling("bakker", 10), "baker");
        assert_eq!(misspelling("politie", 17), "politsie");
        assert_eq!(misspelling("auto's", 14), "autos");
    }

    #[test]
    fn test_misspelling_never_equals_word() {
        for (word, cat) in [("boom", 35), ("a", 1), ("hond", 99), ("melk", 1), ("kip", 99)] {
            let wrong = misspelling(word, cat);
            assert_ne!(wrong, word, "{} / {}", word, cat);
            assert!(!wrong.is_empty());
        }
        assert_eq!(misspelling("hond", 99), "hont");
    }

    #[test]
    fn test_choices() {
        assert_eq!(choices("koning", 2), vec!["ng", "nk"]);
        assert_eq!(choices("cadeau", 24), vec!["eau", "o"]);
        let opts = choices("trein", 36);
        assert!(opts.contains(&"ei".to_string()));
        assert!(opts.contains(&"ij".to_string()));
    }
}
