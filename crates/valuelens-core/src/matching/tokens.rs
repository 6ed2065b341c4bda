//! Tokenization, light stemming and token similarity.
//!
//! The stemmer only strips common English inflectional and derivational
//! suffixes. It is not a lemmatizer; it only needs inflected variants of the
//! same word ("respect", "respecting", "respected") to collapse onto one stem.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Words, optionally with internal apostrophes ("isn't", "patient's").
    static ref TOKEN_PATTERN: Regex = Regex::new(r"[\p{L}\p{N}_]+(?:'[\p{L}\p{N}]+)*").unwrap();
}

/// Similarity assigned to two different tokens that share a stem.
pub const STEM_SIMILARITY: f64 = 0.9;

/// Scale applied to edit-distance similarity of unrelated tokens.
///
/// Keeps non-inflectional near misses ("protect" / "project") under the
/// BALANCED threshold while letting FUZZY accept them.
pub const EDIT_SIMILARITY_SCALE: f64 = 0.75;

const MIN_STEM_LEN: usize = 3;

/// Suffix and replacement, longest candidates first.
const SUFFIXES: &[(&str, &str)] = &[
    ("nesses", ""),
    ("ments", ""),
    ("ities", ""),
    ("fully", ""),
    ("ness", ""),
    ("ment", ""),
    ("ings", ""),
    ("ions", ""),
    ("edly", ""),
    ("ful", ""),
    ("ing", ""),
    ("ity", ""),
    ("ion", ""),
    ("ies", "y"),
    ("ied", "y"),
    ("ous", ""),
    ("ed", ""),
    ("es", ""),
    ("ly", ""),
    ("s", ""),
];

/// Split text into word tokens.
///
/// Curly apostrophes are folded to ASCII so "isn’t" and "isn't" tokenize
/// the same way. Tokens are lowercased unless `case_sensitive` is set.
pub fn tokenize(text: &str, case_sensitive: bool) -> Vec<String> {
    let folded = text.replace(['\u{2019}', '\u{2018}'], "'");
    TOKEN_PATTERN
        .find_iter(&folded)
        .map(|m| {
            if case_sensitive {
                m.as_str().to_string()
            } else {
                m.as_str().to_lowercase()
            }
        })
        .collect()
}

/// Remove a trailing possessive marker ("patient's" -> "patient").
pub fn strip_possessive(token: &str) -> &str {
    token
        .strip_suffix("'s")
        .or_else(|| token.strip_suffix("'S"))
        .or_else(|| token.strip_suffix('\''))
        .unwrap_or(token)
}

/// Suffixes beginning with a vowel, which swallow a silent final "e"
/// ("violate" -> "violating").
const VOWEL_SUFFIXES: &[&str] = &[
    "ities", "ings", "ions", "edly", "ing", "ity", "ion", "ous", "ed", "es",
];

/// A light stem plus whether a vowel suffix may have swallowed a final "e".
struct Stem {
    base: String,
    elided_e: bool,
}

fn light_stem(token: &str) -> Stem {
    let mut word = strip_possessive(token).to_string();
    let mut stripped = false;
    let mut elided_e = false;

    for (suffix, replacement) in SUFFIXES {
        if *suffix == "s" && (word.ends_with("ss") || word.ends_with("us") || word.ends_with("is")) {
            continue;
        }
        let base = match word.strip_suffix(suffix) {
            Some(base) => base.to_string(),
            None => continue,
        };

        if base.chars().count() >= MIN_STEM_LEN {
            word = format!("{}{}", base, replacement);
            stripped = true;
            elided_e = VOWEL_SUFFIXES.contains(suffix);
            break;
        }
        if let Some(restored) = restore_short_base(&base, suffix) {
            word = restored;
            stripped = true;
            break;
        }
    }

    // "stopped" -> "stopp" -> "stop"
    let chars: Vec<char> = word.chars().collect();
    let n = chars.len();
    if stripped
        && n > MIN_STEM_LEN + 1
        && chars[n - 1] == chars[n - 2]
        && chars[n - 1].is_alphabetic()
        && !"aeiouylsz".contains(chars[n - 1])
    {
        word.pop();
    }

    Stem {
        base: word,
        elided_e,
    }
}

/// Rebuild the e-final base of a short word: "lied" -> "lie",
/// "used" -> "use", "lying" -> "lie".
fn restore_short_base(base: &str, suffix: &str) -> Option<String> {
    if suffix != "ed" && suffix != "ing" {
        return None;
    }
    let len = base.chars().count();
    if suffix == "ing" && len == 2 && base.ends_with('y') {
        return Some(format!("{}ie", &base[..base.len() - 1]));
    }
    let has_vowel = base.chars().any(|c| "aeiou".contains(c));
    if len == 2 && has_vowel && !base.ends_with('e') {
        return Some(format!("{}e", base));
    }
    None
}

/// Reduce a token to a light stem.
pub fn stem(token: &str) -> String {
    light_stem(token).base
}

/// Whether two tokens are inflections of one word.
///
/// Stems must agree, except that a stem cut by a vowel suffix also matches
/// the same stem followed by "e" ("violat" and "violate"). Unsuffixed words
/// are never trimmed, so "care" and "car" stay apart.
pub fn same_stem(a: &str, b: &str) -> bool {
    let (a, b) = (light_stem(a), light_stem(b));
    if a.base == b.base {
        return true;
    }
    let restores = |cut: &Stem, whole: &Stem| {
        cut.elided_e && whole.base.strip_suffix('e') == Some(cut.base.as_str())
    };
    restores(&a, &b) || restores(&b, &a)
}

/// Similarity of two tokens in [0, 1].
///
/// Identical tokens score 1.0. With `lemmatize`, tokens sharing a stem score
/// [`STEM_SIMILARITY`]. Everything else falls back to scaled normalized
/// Levenshtein similarity.
pub fn token_similarity(a: &str, b: &str, lemmatize: bool) -> f64 {
    if a == b {
        return 1.0;
    }
    if lemmatize && same_stem(a, b) {
        return STEM_SIMILARITY;
    }
    (strsim::normalized_levenshtein(a, b) * EDIT_SIMILARITY_SCALE).clamp(0.0, 1.0)
}

/// Start indices at which `needle` occurs contiguously in `haystack`.
pub fn sequence_positions<'a>(
    haystack: &'a [String],
    needle: &'a [String],
) -> impl Iterator<Item = usize> + 'a {
    let len = needle.len();
    let last = if len == 0 || len > haystack.len() {
        0
    } else {
        haystack.len() - len + 1
    };
    (0..last).filter(move |&start| haystack[start..start + len] == *needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_keeps_contractions() {
        let tokens = tokenize("It ISN'T the patient’s choice.", false);
        assert_eq!(tokens, vec!["it", "isn't", "the", "patient's", "choice"]);
    }

    #[test]
    fn test_tokenize_case_sensitive() {
        let tokens = tokenize("Informed Consent", true);
        assert_eq!(tokens, vec!["Informed", "Consent"]);
    }

    #[test]
    fn test_stem_collapses_inflections() {
        assert_eq!(stem("respecting"), "respect");
        assert_eq!(stem("respected"), "respect");
        assert_eq!(stem("respects"), "respect");
        assert_eq!(stem("protection"), "protect");
        assert_eq!(stem("violates"), stem("violation"));
        assert!(same_stem("violating", "violate"));
        assert!(same_stem("deceived", "deceive"));
        assert_eq!(stem("policies"), "policy");
        assert_eq!(stem("stopped"), "stop");
        assert_eq!(stem("patient's"), "patient");
    }

    #[test]
    fn test_stem_leaves_short_and_double_s_words() {
        assert_eq!(stem("process"), "process");
        assert_eq!(stem("lies"), "lie");
        assert_eq!(stem("is"), "is");
    }

    #[test]
    fn test_short_e_final_inflections() {
        for (base, inflected) in [
            ("lie", "lied"),
            ("use", "used"),
            ("die", "died"),
            ("lie", "lying"),
            ("die", "dying"),
            ("use", "using"),
            ("lie", "lies"),
        ] {
            assert!(
                token_similarity(base, inflected, true) > 0.8,
                "{} / {}",
                base,
                inflected
            );
        }
        assert_eq!(stem("lied"), "lie");
        assert_eq!(stem("lying"), "lie");
        // Consonant-only bases are left alone
        assert_eq!(stem("thing"), "thing");
        assert_eq!(stem("seed"), "seed");
    }

    #[test]
    fn test_unsuffixed_words_keep_final_e() {
        assert_eq!(stem("care"), "care");
        assert!(!same_stem("care", "car"));
        assert!(token_similarity("care", "car", true) < 0.8);
        // A real suffix still reaches the e-final word
        assert!(same_stem("caring", "care"));
        assert!(same_stem("cares", "care"));
    }

    #[test]
    fn test_similarity_tiers() {
        assert_eq!(token_similarity("harm", "harm", true), 1.0);
        assert!(token_similarity("harm", "harmed", true) > 0.8);
        // Stems do not count without lemmatization
        assert!(token_similarity("harm", "harmed", false) < 0.8);
        // Near miss stays below the balanced threshold
        let near = token_similarity("protect", "project", true);
        assert!(near < 0.8 && near > 0.6);
    }

    #[test]
    fn test_sequence_positions() {
        let haystack = tokenize("right now and right now", false);
        let needle = tokenize("right now", false);
        let found: Vec<usize> = sequence_positions(&haystack, &needle).collect();
        assert_eq!(found, vec![0, 3]);

        let empty: Vec<String> = Vec::new();
        assert_eq!(sequence_positions(&haystack, &empty).count(), 0);
    }
}
