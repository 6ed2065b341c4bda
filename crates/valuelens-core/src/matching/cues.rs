//! Modifier cue lists: negation, intensifiers and hedges.
//!
//! Cues are pre-tokenized so multi-word cues ("sort of", "no longer") are
//! matched as contiguous token sequences in the words preceding a keyword.

use lazy_static::lazy_static;

use super::tokens::tokenize;

/// Tokens before a keyword that are searched for negation cues.
pub const NEGATION_WINDOW: usize = 3;

/// Tokens before a keyword that are searched for intensifier and hedge cues.
pub const MODIFIER_WINDOW: usize = 2;

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "nobody", "nothing", "neither", "nor", "without",
    "cannot", "can't", "isn't", "aren't", "wasn't", "weren't", "don't", "doesn't",
    "didn't", "won't", "wouldn't", "shouldn't", "couldn't", "hasn't", "haven't",
    "hadn't", "mustn't", "lack", "lacks", "lacking", "hardly", "barely", "no longer",
];

const INTENSIFIERS: &[&str] = &[
    "very", "extremely", "highly", "deeply", "incredibly", "absolutely", "completely",
    "totally", "utterly", "seriously", "severely", "critically", "gravely", "really",
    "truly", "especially", "particularly", "profoundly", "so", "most",
];

const HEDGES: &[&str] = &[
    "maybe", "perhaps", "possibly", "might", "may", "could", "somewhat", "slightly",
    "probably", "likely", "apparently", "seemingly", "arguably", "fairly", "rather",
    "partly", "partially", "sort of", "kind of", "a bit", "a little",
];

lazy_static! {
    pub static ref NEGATION_CUES: Vec<Vec<String>> = prepare(NEGATIONS);
    pub static ref INTENSIFIER_CUES: Vec<Vec<String>> = prepare(INTENSIFIERS);
    pub static ref HEDGE_CUES: Vec<Vec<String>> = prepare(HEDGES);
}

fn prepare(cues: &[&str]) -> Vec<Vec<String>> {
    cues.iter()
        .map(|cue| tokenize(cue, false))
        .filter(|tokens| !tokens.is_empty())
        .collect()
}
