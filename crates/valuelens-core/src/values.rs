//! Value detection against a taxonomy.
//!
//! A value is detected when at least one of its semantic markers occurs in
//! the text as a whole word. Polarity is evaluated separately from detection,
//! by matching the value's upholding and violating phrases with the BALANCED
//! strategy.
//!
//! ## Polarity
//!
//! | Upholding matched | Violating matched | Stance | Polarity |
//! |-------------------|-------------------|--------|----------|
//! | yes | yes | Conflicted | 0 |
//! | no | yes | Violating | -1 |
//! | yes | no | Upholding | +1 |
//! | no | no | Neutral | 0 |

use serde::{Deserialize, Serialize};

use crate::matching::{MatchingStrategies, PatternMatcher};
use crate::taxonomy::{Taxonomy, TaxonomyError, ValueDefinition};
use crate::types::{Polarity, ValueSource};

/// How the text stands toward a detected value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stance {
    Upholding,
    Violating,
    Neutral,
    /// Both upholding and violating phrases matched
    Conflicted,
}

impl Stance {
    fn from_matches(upholding: bool, violating: bool) -> Self {
        match (upholding, violating) {
            (true, true) => Stance::Conflicted,
            (false, true) => Stance::Violating,
            (true, false) => Stance::Upholding,
            (false, false) => Stance::Neutral,
        }
    }

    pub fn polarity(self) -> Polarity {
        match self {
            Stance::Upholding => Polarity::Upholding,
            Stance::Violating => Polarity::Violating,
            Stance::Neutral | Stance::Conflicted => Polarity::Neutral,
        }
    }
}

/// A value found in the text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedValue {
    pub name: String,

    pub domain: String,

    /// Whole-word occurrences of all semantic markers
    pub keyword_count: usize,

    pub polarity: Polarity,

    pub stance: Stance,

    /// Matched semantic markers, deduplicated, in taxonomy order
    pub evidence: Vec<String>,

    pub source: ValueSource,
}

/// Detects taxonomy values in text.
#[derive(Debug)]
pub struct ValueMatcher {
    taxonomy: Taxonomy,
    matcher: PatternMatcher,
}

impl ValueMatcher {
    /// Create a matcher over a validated taxonomy.
    pub fn new(taxonomy: Taxonomy) -> Self {
        Self {
            taxonomy,
            matcher: PatternMatcher::new(),
        }
    }

    /// Create a matcher from an untyped document, failing fast when it is
    /// missing or has no `values` list.
    pub fn from_json_value(document: serde_json::Value) -> Result<Self, TaxonomyError> {
        Ok(Self::new(Taxonomy::from_json_value(document)?))
    }

    /// Create a matcher from a YAML taxonomy.
    pub fn from_yaml(yaml: &str) -> Result<Self, TaxonomyError> {
        Ok(Self::new(Taxonomy::from_yaml(yaml)?))
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Detect every taxonomy value present in the text, in taxonomy order.
    pub fn match_values(&self, text: &str) -> Vec<DetectedValue> {
        self.taxonomy
            .values
            .iter()
            .filter_map(|definition| self.match_value(text, definition))
            .collect()
    }

    fn match_value(&self, text: &str, definition: &ValueDefinition) -> Option<DetectedValue> {
        let mut keyword_count = 0;
        let mut evidence: Vec<String> = Vec::new();

        for marker in &definition.semantic_markers {
            let count = self.matcher.count_keywords(text, &[marker]);
            if count == 0 {
                continue;
            }
            keyword_count += count;
            if !evidence.iter().any(|e| e.eq_ignore_ascii_case(marker)) {
                evidence.push(marker.clone());
            }
        }

        if keyword_count == 0 {
            return None;
        }

        let stance = self.evaluate_stance(text, definition);
        tracing::debug!(
            value = %definition.name,
            keyword_count,
            stance = ?stance,
            "Value detected"
        );

        Some(DetectedValue {
            name: definition.name.clone(),
            domain: definition.domain.clone(),
            keyword_count,
            polarity: stance.polarity(),
            stance,
            evidence,
            source: ValueSource::Keyword,
        })
    }

    fn evaluate_stance(&self, text: &str, definition: &ValueDefinition) -> Stance {
        let balanced = MatchingStrategies::BALANCED;
        let indicators = &definition.polarity_indicators;
        let upholding = self
            .matcher
            .contains_any(text, indicators.upholding.as_slice(), Some(&balanced));
        let violating = self
            .matcher
            .contains_any(text, indicators.violating.as_slice(), Some(&balanced));
        Stance::from_matches(upholding, violating)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn care_taxonomy() -> Taxonomy {
        Taxonomy::new(vec![
            ValueDefinition::new("Autonomy", "dignity", &["autonomy"]).with_upholding(&["respect"]),
            ValueDefinition::new("Beneficence", "care", &["protect"])
                .with_upholding(&["protect", "respect"]),
            ValueDefinition::new("Honesty", "virtue", &["honest", "truth", "Truth"])
                .with_upholding(&["tell the truth"])
                .with_violating(&["lie", "deceive"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_detects_values_with_markers() {
        let matcher = ValueMatcher::new(care_taxonomy());
        let found = matcher
            .match_values("We must protect the vulnerable patients while respecting their autonomy.");

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].name, "Autonomy");
        assert_eq!(found[0].polarity, Polarity::Upholding);
        assert_eq!(found[0].evidence, vec!["autonomy"]);
        assert_eq!(found[1].name, "Beneficence");
        assert_eq!(found[1].polarity, Polarity::Upholding);
        assert_eq!(found[1].evidence, vec!["protect"]);
        assert!(found.iter().all(|v| v.source == ValueSource::Keyword));
    }

    #[test]
    fn test_no_markers_no_detection() {
        let matcher = ValueMatcher::new(care_taxonomy());
        // Upholding phrase alone does not qualify a value
        assert!(matcher.match_values("We respect everyone.").is_empty());
        assert!(matcher.match_values("").is_empty());
    }

    #[test]
    fn test_keyword_count_is_whole_word() {
        let taxonomy = Taxonomy::new(vec![
            ValueDefinition::new("Consent", "dignity", &["consent", "sent"]),
        ])
        .unwrap();
        let matcher = ValueMatcher::new(taxonomy);
        let found = matcher.match_values("Consent first. Then consent again.");
        assert_eq!(found[0].keyword_count, 2);
        assert_eq!(found[0].evidence, vec!["consent"]);
    }

    #[test]
    fn test_evidence_is_deduplicated() {
        let matcher = ValueMatcher::new(care_taxonomy());
        let found = matcher.match_values("The truth matters. Truth is honest.");
        let honesty = &found[0];
        assert_eq!(honesty.evidence, vec!["honest", "truth"]);
        // Both case variants count the same occurrences
        assert_eq!(honesty.keyword_count, 1 + 2 + 2);
    }

    #[test]
    fn test_polarity_states() {
        let matcher = ValueMatcher::new(care_taxonomy());

        let violating = matcher.match_values("He chose to lie instead of being honest.");
        assert_eq!(violating[0].stance, Stance::Violating);
        assert_eq!(violating[0].polarity, Polarity::Violating);

        let conflicted =
            matcher.match_values("Being honest, she would tell the truth but also deceive him.");
        assert_eq!(conflicted[0].stance, Stance::Conflicted);
        assert_eq!(conflicted[0].polarity, Polarity::Neutral);

        let neutral = matcher.match_values("Honest work.");
        assert_eq!(neutral[0].stance, Stance::Neutral);
    }

    #[test]
    fn test_past_tense_indicator_sets_polarity() {
        let matcher = ValueMatcher::new(care_taxonomy());
        let found = matcher.match_values("He lied to the patient about being honest.");
        assert_eq!(found[0].name, "Honesty");
        assert_eq!(found[0].stance, Stance::Violating);
        assert_eq!(found[0].polarity, Polarity::Violating);
    }

    #[test]
    fn test_construction_fails_without_values() {
        assert!(ValueMatcher::from_json_value(serde_json::Value::Null).is_err());
        assert!(ValueMatcher::from_json_value(serde_json::json!({"items": []})).is_err());
        assert!(ValueMatcher::from_json_value(serde_json::json!({"values": []})).is_ok());
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let matcher = ValueMatcher::new(care_taxonomy());
        let text = "They deceive patients and refuse to protect them.";
        assert_eq!(matcher.match_values(text), matcher.match_values(text));
    }
}
