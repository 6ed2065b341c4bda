//! Keyword and phrase matching primitives.
//!
//! [`PatternMatcher`] answers three kinds of question about a piece of text:
//!
//! - Does any of these keywords occur? (`contains_any`, `count_keywords`)
//! - Is an occurrence modified? (`is_negated`, `has_intensifier`, `has_hedge`)
//! - What is the strongest tiered evidence? (`adjust_score`, `get_max_score`)
//!
//! ## Score Adjustment Order
//!
//! `adjust_score` applies negation, then intensification, then hedging. The
//! order changes the result for keywords that are both negated and hedged and
//! must not be rearranged.
//!
//! ## Memoization
//!
//! Compiled keyword patterns and token similarities are cached per instance.
//! Both caches are keyed on their full inputs, so a cache hit returns exactly
//! what a recomputation would.

mod cues;
mod strategies;
pub mod tokens;

pub use strategies::{MatchOptions, MatchingStrategies};

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use cues::{HEDGE_CUES, INTENSIFIER_CUES, MODIFIER_WINDOW, NEGATION_CUES, NEGATION_WINDOW};
use tokens::{sequence_positions, strip_possessive, token_similarity, tokenize};

/// Amount added by an intensifier and removed by a hedge.
pub const MODIFIER_DELTA: f64 = 0.15;

/// A named bucket of keywords sharing one base score.
#[derive(Debug, Clone, Copy)]
pub struct Tier<'a> {
    pub name: &'a str,
    pub score: f64,
    pub keywords: &'a [&'a str],
}

/// The winning evidence from [`PatternMatcher::best_match`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierMatch {
    /// Tier the keyword belongs to
    pub tier: String,

    /// The keyword that matched
    pub keyword: String,

    /// The tier's score before modifiers
    pub base_score: f64,

    /// Score after negation, intensifier and hedge adjustment
    pub score: f64,
}

type SimilarityKey = (String, String, bool);

/// Keyword matcher with per-instance memoization.
#[derive(Default)]
pub struct PatternMatcher {
    patterns: RwLock<HashMap<(String, bool), Option<Regex>>>,
    similarities: RwLock<HashMap<SimilarityKey, f64>>,
}

impl fmt::Debug for PatternMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let patterns = self.patterns.read().map(|c| c.len()).unwrap_or(0);
        let similarities = self.similarities.read().map(|c| c.len()).unwrap_or(0);
        f.debug_struct("PatternMatcher")
            .field("cached_patterns", &patterns)
            .field("cached_similarities", &similarities)
            .finish()
    }
}

impl PatternMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether any keyword occurs in the text.
    ///
    /// Without options this is a case-insensitive whole-word search. With
    /// options that only a verbatim occurrence can satisfy (no lemmatization,
    /// no partial matching, threshold 1.0) it is a whole-word search honoring
    /// `case_sensitive`. Any other options compare tokens and succeed when
    /// aggregate similarity reaches `threshold`.
    pub fn contains_any<S: AsRef<str>>(
        &self,
        text: &str,
        keywords: &[S],
        options: Option<&MatchOptions>,
    ) -> bool {
        if text.trim().is_empty() {
            return false;
        }

        match options {
            None => keywords
                .iter()
                .any(|kw| self.word_matches(text, kw.as_ref(), false)),
            Some(opts) if opts.is_exact() => keywords
                .iter()
                .any(|kw| self.word_matches(text, kw.as_ref(), opts.case_sensitive)),
            Some(opts) => {
                let text_tokens = self.prepare_tokens(text, opts);
                if text_tokens.is_empty() {
                    return false;
                }
                keywords.iter().any(|kw| {
                    let pattern_tokens = self.prepare_tokens(kw.as_ref(), opts);
                    if pattern_tokens.is_empty() {
                        return false;
                    }
                    let score = self.phrase_similarity(&pattern_tokens, &text_tokens, opts);
                    score + f64::EPSILON >= opts.threshold
                })
            }
        }
    }

    /// Total whole-word, case-insensitive occurrences of all keywords.
    pub fn count_keywords<S: AsRef<str>>(&self, text: &str, keywords: &[S]) -> usize {
        keywords
            .iter()
            .filter_map(|kw| self.word_pattern(kw.as_ref(), false))
            .map(|pattern| pattern.find_iter(text).count())
            .sum()
    }

    /// True if a negation cue occurs within three tokens before the keyword.
    pub fn is_negated(&self, text: &str, keyword: &str) -> bool {
        cue_precedes(text, keyword, &NEGATION_CUES, NEGATION_WINDOW)
    }

    /// True if an intensifier occurs within two tokens before the keyword.
    pub fn has_intensifier(&self, text: &str, keyword: &str) -> bool {
        cue_precedes(text, keyword, &INTENSIFIER_CUES, MODIFIER_WINDOW)
    }

    /// True if a hedge occurs within two tokens before the keyword.
    pub fn has_hedge(&self, text: &str, keyword: &str) -> bool {
        cue_precedes(text, keyword, &HEDGE_CUES, MODIFIER_WINDOW)
    }

    /// Adjust a base score for the modifiers around a keyword.
    ///
    /// Negation flips the score (`1 - s`), an intensifier adds
    /// [`MODIFIER_DELTA`] capped at 1, a hedge subtracts it floored at 0.
    /// Applied in exactly that order.
    pub fn adjust_score(&self, text: &str, keyword: &str, base_score: f64) -> f64 {
        let mut score = base_score.clamp(0.0, 1.0);

        if self.is_negated(text, keyword) {
            score = 1.0 - score;
        }
        if self.has_intensifier(text, keyword) {
            score = (score + MODIFIER_DELTA).min(1.0);
        }
        if self.has_hedge(text, keyword) {
            score = (score - MODIFIER_DELTA).max(0.0);
        }

        score
    }

    /// Strongest adjusted match across all tiers, if any keyword occurs.
    ///
    /// Scores are never summed: the result is the single best match. Ties keep
    /// the earlier tier, so tables list their strongest tier first.
    pub fn best_match(&self, text: &str, tiers: &[Tier<'_>]) -> Option<TierMatch> {
        if text.trim().is_empty() {
            return None;
        }

        let mut best: Option<TierMatch> = None;
        for tier in tiers {
            for keyword in tier.keywords {
                if !self.word_matches(text, keyword, false) {
                    continue;
                }
                let score = self.adjust_score(text, keyword, tier.score);
                let better = best.as_ref().map(|b| score > b.score).unwrap_or(true);
                if better {
                    best = Some(TierMatch {
                        tier: tier.name.to_string(),
                        keyword: (*keyword).to_string(),
                        base_score: tier.score,
                        score,
                    });
                }
            }
        }
        best
    }

    /// Maximum adjusted tier score, or `default_score` when nothing matches.
    pub fn get_max_score(&self, text: &str, tiers: &[Tier<'_>], default_score: f64) -> f64 {
        self.best_match(text, tiers)
            .map(|m| m.score)
            .unwrap_or(default_score)
            .clamp(0.0, 1.0)
    }

    /// Memoized token similarity.
    pub fn similarity(&self, a: &str, b: &str, lemmatize: bool) -> f64 {
        if a == b {
            return 1.0;
        }
        let key = if a < b {
            (a.to_string(), b.to_string(), lemmatize)
        } else {
            (b.to_string(), a.to_string(), lemmatize)
        };

        if let Some(score) = self
            .similarities
            .read()
            .ok()
            .and_then(|cache| cache.get(&key).copied())
        {
            return score;
        }

        let score = token_similarity(&key.0, &key.1, lemmatize);
        if let Ok(mut cache) = self.similarities.write() {
            cache.insert(key, score);
        }
        score
    }

    fn word_matches(&self, text: &str, keyword: &str, case_sensitive: bool) -> bool {
        self.word_pattern(keyword, case_sensitive)
            .map(|pattern| pattern.is_match(text))
            .unwrap_or(false)
    }

    /// Compiled whole-word pattern for a keyword, memoized.
    fn word_pattern(&self, keyword: &str, case_sensitive: bool) -> Option<Regex> {
        let key = (keyword.to_string(), case_sensitive);
        if let Some(cached) = self
            .patterns
            .read()
            .ok()
            .and_then(|cache| cache.get(&key).cloned())
        {
            return cached;
        }

        let compiled = build_word_pattern(keyword, case_sensitive);
        if let Ok(mut cache) = self.patterns.write() {
            cache.insert(key, compiled.clone());
        }
        compiled
    }

    fn prepare_tokens(&self, text: &str, options: &MatchOptions) -> Vec<String> {
        tokenize(text, options.case_sensitive)
            .into_iter()
            .map(|token| strip_possessive(&token).to_string())
            .filter(|token| !token.is_empty())
            .collect()
    }

    /// Aggregate similarity of a pattern against text tokens.
    ///
    /// With `partial_match` each pattern token takes its best score anywhere
    /// in the text, so order and intervening words do not matter. Otherwise
    /// the best contiguous window of pattern length wins.
    fn phrase_similarity(
        &self,
        pattern: &[String],
        text: &[String],
        options: &MatchOptions,
    ) -> f64 {
        let n = pattern.len() as f64;

        if options.partial_match {
            let total: f64 = pattern
                .iter()
                .map(|p| {
                    text.iter()
                        .map(|t| self.similarity(p, t, options.lemmatize))
                        .fold(0.0, f64::max)
                })
                .sum();
            return total / n;
        }

        if pattern.len() > text.len() {
            return 0.0;
        }
        text.windows(pattern.len())
            .map(|window| {
                pattern
                    .iter()
                    .zip(window)
                    .map(|(p, t)| self.similarity(p, t, options.lemmatize))
                    .sum::<f64>()
                    / n
            })
            .fold(0.0, f64::max)
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Build a whole-word pattern from a literal keyword.
///
/// Each word is regex-escaped and internal whitespace matches any run of
/// whitespace. Word boundaries are only asserted next to word characters so
/// keywords such as "c++" still match.
fn build_word_pattern(keyword: &str, case_sensitive: bool) -> Option<Regex> {
    let trimmed = keyword.trim();
    let (first, last) = match (trimmed.chars().next(), trimmed.chars().last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return None,
    };

    let body = trimmed
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");

    let mut pattern = String::with_capacity(body.len() + 10);
    if !case_sensitive {
        pattern.push_str("(?i)");
    }
    if is_word_char(first) {
        pattern.push_str(r"\b");
    }
    pattern.push_str(&body);
    if is_word_char(last) {
        pattern.push_str(r"\b");
    }

    match Regex::new(&pattern) {
        Ok(regex) => Some(regex),
        Err(e) => {
            tracing::debug!(keyword = %keyword, error = %e, "Keyword pattern rejected");
            None
        }
    }
}

/// Whether any occurrence of `keyword` has a cue within `window` tokens before it.
fn cue_precedes(text: &str, keyword: &str, cues: &[Vec<String>], window: usize) -> bool {
    let tokens = tokenize(text, false);
    let target = tokenize(keyword, false);
    if target.is_empty() {
        return false;
    }

    let found = sequence_positions(&tokens, &target).any(|start| {
        let preceding = &tokens[start.saturating_sub(window)..start];
        cues.iter()
            .any(|cue| sequence_positions(preceding, cue).next().is_some())
    });
    found
}
