//! Profile aggregation.
//!
//! The profiler turns values already scored for salience by an upstream
//! scorer into an explainable summary. It never mutates the caller's values;
//! it sorts its own copy.
//!
//! ## Dominant domain
//!
//! Domain averages are compared after the five canonical domains have been
//! zero-filled. When the leader is less than 0.1 ahead of the runner-up the
//! profile reports `"Mixed"`.
//!
//! ## Confidence
//!
//! ```text
//! confidence = 0.3 * min(count / 10, 1) + 0.5 * avg_salience + 0.2 * keyword_fraction
//! ```
//!
//! clamped to [0, 1] and rounded to two decimals. An empty input yields 0.

mod conflicts;

pub use conflicts::{
    detect_conflicts, Conflict, ConflictSource, INFERRED_SEVERITY, SALIENCE_GATE,
    TENSION_THRESHOLD,
};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::taxonomy::{ConflictPair, ConflictTable};
use crate::types::{round2, Polarity, ScoredValue, ValueSource};

/// Domains always present in `domain_scores`.
pub const CANONICAL_DOMAINS: [&str; 5] = ["Dignity", "Care", "Virtue", "Community", "Transcendence"];

/// Reported when no domain leads by at least [`DOMINANCE_MARGIN`].
pub const MIXED_DOMAIN: &str = "Mixed";

pub const DOMINANCE_MARGIN: f64 = 0.1;

const MARGIN_TOLERANCE: f64 = 1e-9;

/// Number of values at which the count term of confidence saturates.
const CONFIDENCE_SATURATION: f64 = 10.0;

/// Options for [`EthicalProfiler::generate_profile`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileOptions {
    #[serde(default = "default_top_values_count")]
    pub top_values_count: usize,

    #[serde(default)]
    pub verbose: bool,
}

fn default_top_values_count() -> usize {
    5
}

impl Default for ProfileOptions {
    fn default() -> Self {
        Self {
            top_values_count: default_top_values_count(),
            verbose: false,
        }
    }
}

/// A scored value as it appears in a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileValue {
    pub name: String,
    /// Capitalized domain
    pub domain: String,
    pub salience: f64,
    pub polarity: Polarity,
    pub conflict: bool,
    pub evidence: Vec<String>,
    pub source: ValueSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopValue {
    pub name: String,
    pub domain: String,
    pub salience: f64,
    pub polarity: Polarity,
    pub evidence: Vec<String>,
    /// Non-zero score components, e.g. `"keywords:0.40"`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub boosted_by: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainSummary {
    pub count: usize,
    pub average_salience: f64,
    /// Values flagged upstream as internally conflicted
    pub conflicts: usize,
}

/// Extra detail for verbose profiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileMetadata {
    pub total_evidence: usize,
    pub keyword_values: usize,
    pub entailed_values: usize,
    pub frame_boosted: usize,
    pub role_boosted: usize,
    pub average_score: f64,
}

/// Aggregated view over a set of scored values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Sorted by salience, highest first
    pub values: Vec<ProfileValue>,
    pub value_summary: BTreeMap<String, DomainSummary>,
    pub top_values: Vec<TopValue>,
    pub dominant_domain: String,
    pub domain_scores: BTreeMap<String, f64>,
    pub conflict_score: f64,
    pub conflicts: Vec<Conflict>,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ProfileMetadata>,
}

/// Builds profiles using a curated conflict table plus automatic inference.
#[derive(Debug, Clone, Default)]
pub struct EthicalProfiler {
    conflict_pairs: Vec<ConflictPair>,
}

impl EthicalProfiler {
    /// An empty table leaves only automatic conflict inference.
    pub fn new(conflict_pairs: Vec<ConflictPair>) -> Self {
        Self { conflict_pairs }
    }

    pub fn with_conflict_table(table: ConflictTable) -> Self {
        Self::new(table.conflicts)
    }

    pub fn conflict_pairs(&self) -> &[ConflictPair] {
        &self.conflict_pairs
    }

    /// Aggregate scored values into a profile.
    pub fn generate_profile(&self, scored_values: &[ScoredValue], options: &ProfileOptions) -> Profile {
        let mut sorted = scored_values.to_vec();
        sorted.sort_by(|a, b| b.clamped_salience().total_cmp(&a.clamped_salience()));

        let values: Vec<ProfileValue> = sorted
            .iter()
            .map(|value| ProfileValue {
                name: value.name.clone(),
                domain: capitalize(&value.domain),
                salience: value.clamped_salience(),
                polarity: value.polarity,
                conflict: value.conflict,
                evidence: value.evidence.clone(),
                source: value.source,
            })
            .collect();

        let top_values = sorted
            .iter()
            .take(options.top_values_count)
            .map(|value| TopValue {
                name: value.name.clone(),
                domain: capitalize(&value.domain),
                salience: value.clamped_salience(),
                polarity: value.polarity,
                evidence: value.evidence.clone(),
                boosted_by: value
                    .breakdown
                    .map(|breakdown| breakdown.boosted_by())
                    .unwrap_or_default(),
            })
            .collect();

        let averages = domain_averages(&sorted);
        let dominant_domain = dominant_domain(&averages);
        let domain_scores = averages
            .iter()
            .map(|(domain, average)| (domain.clone(), round2(*average)))
            .collect();

        let conflicts = detect_conflicts(&sorted, &self.conflict_pairs);
        let conflict_score = conflicts
            .iter()
            .map(|conflict| conflict.tension)
            .fold(0.0, f64::max);

        tracing::debug!(
            values = sorted.len(),
            dominant = %dominant_domain,
            conflicts = conflicts.len(),
            "Profile generated"
        );

        Profile {
            values,
            value_summary: value_summary(&sorted),
            top_values,
            dominant_domain,
            domain_scores,
            conflict_score,
            conflicts,
            confidence: confidence(&sorted),
            metadata: options.verbose.then(|| metadata(&sorted)),
        }
    }
}

/// Uppercase the first character, leave the rest untouched.
pub fn capitalize(domain: &str) -> String {
    let mut chars = domain.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn value_summary(values: &[ScoredValue]) -> BTreeMap<String, DomainSummary> {
    let mut totals: BTreeMap<String, (usize, f64, usize)> = BTreeMap::new();
    for value in values {
        let entry = totals.entry(capitalize(&value.domain)).or_insert((0, 0.0, 0));
        entry.0 += 1;
        entry.1 += value.clamped_salience();
        if value.conflict {
            entry.2 += 1;
        }
    }

    totals
        .into_iter()
        .map(|(domain, (count, sum, conflicts))| {
            let summary = DomainSummary {
                count,
                average_salience: round2(sum / count as f64),
                conflicts,
            };
            (domain, summary)
        })
        .collect()
}

/// Mean salience per capitalized domain, canonical domains zero-filled.
fn domain_averages(values: &[ScoredValue]) -> BTreeMap<String, f64> {
    let mut sums: BTreeMap<String, (f64, usize)> = CANONICAL_DOMAINS
        .iter()
        .map(|domain| (domain.to_string(), (0.0, 0)))
        .collect();

    for value in values {
        let entry = sums.entry(capitalize(&value.domain)).or_insert((0.0, 0));
        entry.0 += value.clamped_salience();
        entry.1 += 1;
    }

    sums.into_iter()
        .map(|(domain, (sum, count))| {
            let average = if count == 0 { 0.0 } else { sum / count as f64 };
            (domain, average)
        })
        .collect()
}

fn dominant_domain(averages: &BTreeMap<String, f64>) -> String {
    let mut leader: Option<(&str, f64)> = None;
    let mut runner_up = 0.0;

    for (domain, &average) in averages {
        match leader {
            Some((_, best)) if average <= best => {
                runner_up = f64::max(runner_up, average);
            }
            Some((_, best)) => {
                runner_up = best;
                leader = Some((domain, average));
            }
            None => leader = Some((domain, average)),
        }
    }

    match leader {
        Some((domain, best)) if best - runner_up + MARGIN_TOLERANCE >= DOMINANCE_MARGIN => {
            domain.to_string()
        }
        _ => MIXED_DOMAIN.to_string(),
    }
}

fn confidence(values: &[ScoredValue]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let count = values.len() as f64;
    let average = values.iter().map(ScoredValue::clamped_salience).sum::<f64>() / count;
    let keyword_fraction = values
        .iter()
        .filter(|value| value.source == ValueSource::Keyword)
        .count() as f64
        / count;

    let raw = 0.3 * (count / CONFIDENCE_SATURATION).min(1.0) + 0.5 * average + 0.2 * keyword_fraction;
    round2(raw.clamp(0.0, 1.0))
}

fn metadata(values: &[ScoredValue]) -> ProfileMetadata {
    let count_where = |predicate: fn(&ScoredValue) -> bool| values.iter().filter(|v| predicate(v)).count();
    let average_score = if values.is_empty() {
        0.0
    } else {
        round2(values.iter().map(ScoredValue::clamped_salience).sum::<f64>() / values.len() as f64)
    };

    ProfileMetadata {
        total_evidence: values.iter().map(|value| value.evidence.len()).sum(),
        keyword_values: count_where(|v| v.source == ValueSource::Keyword),
        entailed_values: count_where(|v| v.source == ValueSource::Entailed),
        frame_boosted: count_where(|v| v.breakdown.map_or(false, |b| b.frame_boost != 0.0)),
        role_boosted: count_where(|v| v.breakdown.map_or(false, |b| b.role_boost != 0.0)),
        average_score,
    }
}
