//! Hybrid conflict detection.
//!
//! Two independent passes feed one result set:
//!
//! 1. **Predefined**: every curated [`ConflictPair`] whose values are both
//!    present at salience >= 0.6. Tension is `min(s1, s2) * severity * factor`
//!    with factor 1.0 for strictly opposite non-zero polarities, 0.5 otherwise.
//! 2. **Detected**: every remaining pair of present values with salience
//!    >= 0.6 and opposite non-zero polarities, using severity 0.5.
//!
//! A conflict is kept only when its tension exceeds 0.4. Pairs are keyed by
//! their unordered names, so the second pass never repeats a conflict the
//! first pass kept. A curated pair the first pass dropped is still eligible
//! for the second.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::taxonomy::ConflictPair;
use crate::types::{Polarity, ScoredValue};

/// Minimum salience for either value of a pair to be considered.
pub const SALIENCE_GATE: f64 = 0.6;

/// Tension must exceed this to be reported.
pub const TENSION_THRESHOLD: f64 = 0.4;

/// Severity assumed for pairs absent from the curated table.
pub const INFERRED_SEVERITY: f64 = 0.5;

const OPPOSED_FACTOR: f64 = 1.0;
const UNOPPOSED_FACTOR: f64 = 0.5;

/// Which pass produced a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictSource {
    Predefined,
    Detected,
}

/// A tension between two present values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    pub value1: String,
    pub value2: String,
    pub score1: f64,
    pub score2: f64,
    pub polarity1: Polarity,
    pub polarity2: Polarity,
    pub tension: f64,
    pub description: String,
    pub source: ConflictSource,
}

/// Unordered pair key.
fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

fn tension(s1: f64, s2: f64, severity: f64, p1: Polarity, p2: Polarity) -> f64 {
    let factor = if p1.is_opposite(p2) {
        OPPOSED_FACTOR
    } else {
        UNOPPOSED_FACTOR
    };
    (s1.min(s2) * severity * factor).clamp(0.0, 1.0)
}

/// Run both passes over values sorted by salience, strongest first.
pub fn detect_conflicts(sorted: &[ScoredValue], curated: &[ConflictPair]) -> Vec<Conflict> {
    // First occurrence wins, which is the most salient after sorting.
    let mut by_name: HashMap<&str, &ScoredValue> = HashMap::new();
    for value in sorted {
        by_name.entry(value.name.as_str()).or_insert(value);
    }

    let mut covered: HashSet<(String, String)> = HashSet::new();
    let mut conflicts = Vec::new();

    for pair in curated {
        let (first, second) = match (
            by_name.get(pair.value1.as_str()),
            by_name.get(pair.value2.as_str()),
        ) {
            (Some(first), Some(second)) => (*first, *second),
            _ => continue,
        };
        let (s1, s2) = (first.clamped_salience(), second.clamped_salience());
        if s1 < SALIENCE_GATE || s2 < SALIENCE_GATE {
            continue;
        }

        let strength = tension(s1, s2, pair.severity, first.polarity, second.polarity);
        if strength <= TENSION_THRESHOLD {
            continue;
        }
        if !covered.insert(pair_key(&first.name, &second.name)) {
            continue;
        }

        tracing::debug!(
            value1 = %first.name,
            value2 = %second.name,
            tension = strength,
            "Predefined conflict"
        );
        conflicts.push(Conflict {
            value1: first.name.clone(),
            value2: second.name.clone(),
            score1: s1,
            score2: s2,
            polarity1: first.polarity,
            polarity2: second.polarity,
            tension: strength,
            description: pair.description.clone(),
            source: ConflictSource::Predefined,
        });
    }

    let candidates: Vec<&ScoredValue> = by_name_in_order(sorted);
    for (i, first) in candidates.iter().enumerate() {
        for second in &candidates[i + 1..] {
            let (s1, s2) = (first.clamped_salience(), second.clamped_salience());
            if s1 < SALIENCE_GATE || s2 < SALIENCE_GATE {
                continue;
            }
            if !first.polarity.is_opposite(second.polarity) {
                continue;
            }
            let key = pair_key(&first.name, &second.name);
            if covered.contains(&key) {
                continue;
            }

            let strength = tension(s1, s2, INFERRED_SEVERITY, first.polarity, second.polarity);
            if strength <= TENSION_THRESHOLD {
                continue;
            }

            tracing::debug!(
                value1 = %first.name,
                value2 = %second.name,
                tension = strength,
                "Detected conflict"
            );
            covered.insert(key);
            conflicts.push(Conflict {
                value1: first.name.clone(),
                value2: second.name.clone(),
                score1: s1,
                score2: s2,
                polarity1: first.polarity,
                polarity2: second.polarity,
                tension: strength,
                description: format!(
                    "{} is {} while {} is {}",
                    first.name,
                    stance_word(first.polarity),
                    second.name,
                    stance_word(second.polarity)
                ),
                source: ConflictSource::Detected,
            });
        }
    }

    conflicts
}

/// Distinct values by name, keeping sorted order.
fn by_name_in_order(sorted: &[ScoredValue]) -> Vec<&ScoredValue> {
    let mut seen = HashSet::new();
    sorted
        .iter()
        .filter(|value| seen.insert(value.name.as_str()))
        .collect()
}

fn stance_word(polarity: Polarity) -> &'static str {
    match polarity {
        Polarity::Upholding => "upheld",
        Polarity::Violating => "violated",
        Polarity::Neutral => "neutral",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(name: &str, salience: f64, polarity: Polarity) -> ScoredValue {
        ScoredValue::new(name, "care", salience, polarity)
    }

    #[test]
    fn test_predefined_conflict_at_threshold() {
        let values = vec![
            value("Autonomy", 0.6, Polarity::Upholding),
            value("Beneficence", 0.6, Polarity::Violating),
        ];
        let curated = vec![ConflictPair::new("Autonomy", "Beneficence", 0.7, "choice vs care")];
        let conflicts = detect_conflicts(&values, &curated);

        assert_eq!(conflicts.len(), 1);
        assert!((conflicts[0].tension - 0.42).abs() < 1e-9);
        assert_eq!(conflicts[0].source, ConflictSource::Predefined);
        assert_eq!(conflicts[0].description, "choice vs care");
    }

    #[test]
    fn test_salience_gate_excludes_pair() {
        let values = vec![
            value("Autonomy", 0.55, Polarity::Upholding),
            value("Beneficence", 0.55, Polarity::Violating),
        ];
        let curated = vec![ConflictPair::new("Autonomy", "Beneficence", 1.0, "")];
        assert!(detect_conflicts(&values, &curated).is_empty());
    }

    #[test]
    fn test_same_polarity_halves_tension() {
        let values = vec![
            value("Justice", 0.9, Polarity::Upholding),
            value("Mercy", 0.9, Polarity::Upholding),
        ];
        // 0.9 * 0.9 * 0.5 = 0.405
        let curated = vec![ConflictPair::new("Justice", "Mercy", 0.9, "")];
        let conflicts = detect_conflicts(&values, &curated);
        assert_eq!(conflicts.len(), 1);
        assert!((conflicts[0].tension - 0.405).abs() < 1e-9);

        // 0.9 * 0.8 * 0.5 = 0.36
        let curated = vec![ConflictPair::new("Justice", "Mercy", 0.8, "")];
        assert!(detect_conflicts(&values, &curated).is_empty());
    }

    #[test]
    fn test_detected_conflict_requires_high_salience() {
        // 0.85 * 0.5 = 0.425 > 0.4
        let values = vec![
            value("Loyalty", 0.9, Polarity::Upholding),
            value("Honesty", 0.85, Polarity::Violating),
        ];
        let conflicts = detect_conflicts(&values, &[]);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].source, ConflictSource::Detected);
        assert_eq!(conflicts[0].value1, "Loyalty");
        assert!((conflicts[0].tension - 0.425).abs() < 1e-9);

        // 0.7 * 0.5 = 0.35
        let values = vec![
            value("Loyalty", 0.9, Polarity::Upholding),
            value("Honesty", 0.7, Polarity::Violating),
        ];
        assert!(detect_conflicts(&values, &[]).is_empty());
    }

    #[test]
    fn test_detected_skips_neutral_and_same_polarity() {
        let values = vec![
            value("Loyalty", 0.95, Polarity::Upholding),
            value("Honesty", 0.95, Polarity::Neutral),
            value("Care", 0.95, Polarity::Upholding),
        ];
        assert!(detect_conflicts(&values, &[]).is_empty());
    }

    #[test]
    fn test_no_duplicate_between_passes() {
        let values = vec![
            value("Autonomy", 0.9, Polarity::Upholding),
            value("Beneficence", 0.9, Polarity::Violating),
        ];
        // Reversed order in the table still covers the pair
        let curated = vec![ConflictPair::new("Beneficence", "Autonomy", 0.8, "")];
        let conflicts = detect_conflicts(&values, &curated);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].source, ConflictSource::Predefined);
        assert_eq!(conflicts[0].value1, "Beneficence");
    }

    #[test]
    fn test_weak_curated_pair_falls_through_to_detection() {
        // Curated: 0.9 * 0.3 = 0.27, dropped. Inferred: 0.9 * 0.5 = 0.45, kept.
        let values = vec![
            value("Autonomy", 0.9, Polarity::Upholding),
            value("Beneficence", 0.9, Polarity::Violating),
        ];
        let curated = vec![ConflictPair::new("Autonomy", "Beneficence", 0.3, "mild")];
        let conflicts = detect_conflicts(&values, &curated);

        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].source, ConflictSource::Detected);
        assert!((conflicts[0].tension - 0.45).abs() < 1e-9);
        assert_eq!(conflicts[0].description, "Autonomy is upheld while Beneficence is violated");
    }

    #[test]
    fn test_missing_curated_value_is_skipped() {
        let values = vec![value("Autonomy", 0.9, Polarity::Upholding)];
        let curated = vec![ConflictPair::new("Autonomy", "Justice", 1.0, "")];
        assert!(detect_conflicts(&values, &curated).is_empty());
    }
}
