//! Contextual intensity scoring.
//!
//! [`ContextAnalyzer`] scores twelve fixed dimensions grouped in four
//! categories. Every dimension is scored the same way: the strongest
//! adjusted match from its tier table (see [`tables`]), or the dimension's
//! default when nothing matches.
//!
//! | Category | Dimension | Default |
//! |----------|-----------|---------|
//! | temporal | urgency, duration, reversibility | 0.5 |
//! | relational | intimacy, power_differential | 0.3 |
//! | relational | trust | 0.5 |
//! | consequential | harm_severity, benefit_magnitude | 0.2 |
//! | consequential | scope | 0.3 |
//! | epistemic | certainty, information_completeness, expertise | 0.5 |
//!
//! Structural inputs (tagged words, semantic frame, roles) are accepted but the
//! current dimensions are purely lexical, so scores are identical with or
//! without them.

pub mod tables;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::matching::{PatternMatcher, Tier};

/// The four dimension groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Temporal,
    Relational,
    Consequential,
    Epistemic,
}

/// One of the twelve contextual axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Urgency,
    Duration,
    Reversibility,
    Intimacy,
    PowerDifferential,
    Trust,
    HarmSeverity,
    BenefitMagnitude,
    Scope,
    Certainty,
    InformationCompleteness,
    Expertise,
}

impl Dimension {
    /// All dimensions in category order.
    pub const ALL: [Dimension; 12] = [
        Dimension::Urgency,
        Dimension::Duration,
        Dimension::Reversibility,
        Dimension::Intimacy,
        Dimension::PowerDifferential,
        Dimension::Trust,
        Dimension::HarmSeverity,
        Dimension::BenefitMagnitude,
        Dimension::Scope,
        Dimension::Certainty,
        Dimension::InformationCompleteness,
        Dimension::Expertise,
    ];

    pub fn category(self) -> Category {
        match self {
            Dimension::Urgency | Dimension::Duration | Dimension::Reversibility => {
                Category::Temporal
            }
            Dimension::Intimacy | Dimension::PowerDifferential | Dimension::Trust => {
                Category::Relational
            }
            Dimension::HarmSeverity | Dimension::BenefitMagnitude | Dimension::Scope => {
                Category::Consequential
            }
            Dimension::Certainty | Dimension::InformationCompleteness | Dimension::Expertise => {
                Category::Epistemic
            }
        }
    }

    /// Score used when no keyword of the dimension occurs.
    pub fn default_score(self) -> f64 {
        match self {
            Dimension::Intimacy | Dimension::PowerDifferential | Dimension::Scope => 0.3,
            Dimension::HarmSeverity | Dimension::BenefitMagnitude => 0.2,
            _ => 0.5,
        }
    }

    /// The tier table this dimension is scored against.
    pub fn tiers(self) -> &'static [Tier<'static>] {
        match self {
            Dimension::Urgency => tables::URGENCY,
            Dimension::Duration => tables::DURATION,
            Dimension::Reversibility => tables::REVERSIBILITY,
            Dimension::Intimacy => tables::INTIMACY,
            Dimension::PowerDifferential => tables::POWER_DIFFERENTIAL,
            Dimension::Trust => tables::TRUST,
            Dimension::HarmSeverity => tables::HARM_SEVERITY,
            Dimension::BenefitMagnitude => tables::BENEFIT_MAGNITUDE,
            Dimension::Scope => tables::SCOPE,
            Dimension::Certainty => tables::CERTAINTY,
            Dimension::InformationCompleteness => tables::INFORMATION_COMPLETENESS,
            Dimension::Expertise => tables::EXPERTISE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::Urgency => "urgency",
            Dimension::Duration => "duration",
            Dimension::Reversibility => "reversibility",
            Dimension::Intimacy => "intimacy",
            Dimension::PowerDifferential => "power_differential",
            Dimension::Trust => "trust",
            Dimension::HarmSeverity => "harm_severity",
            Dimension::BenefitMagnitude => "benefit_magnitude",
            Dimension::Scope => "scope",
            Dimension::Certainty => "certainty",
            Dimension::InformationCompleteness => "information_completeness",
            Dimension::Expertise => "expertise",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemporalContext {
    pub urgency: f64,
    pub duration: f64,
    pub reversibility: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelationalContext {
    pub intimacy: f64,
    pub power_differential: f64,
    pub trust: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsequentialContext {
    pub harm_severity: f64,
    pub benefit_magnitude: f64,
    pub scope: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpistemicContext {
    pub certainty: f64,
    pub information_completeness: f64,
    pub expertise: f64,
}

/// Scores for all twelve dimensions, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContextIntensity {
    pub temporal: TemporalContext,
    pub relational: RelationalContext,
    pub consequential: ConsequentialContext,
    pub epistemic: EpistemicContext,
}

impl ContextIntensity {
    /// Build from a per-dimension scoring function.
    pub fn from_fn(mut score: impl FnMut(Dimension) -> f64) -> Self {
        Self {
            temporal: TemporalContext {
                urgency: score(Dimension::Urgency),
                duration: score(Dimension::Duration),
                reversibility: score(Dimension::Reversibility),
            },
            relational: RelationalContext {
                intimacy: score(Dimension::Intimacy),
                power_differential: score(Dimension::PowerDifferential),
                trust: score(Dimension::Trust),
            },
            consequential: ConsequentialContext {
                harm_severity: score(Dimension::HarmSeverity),
                benefit_magnitude: score(Dimension::BenefitMagnitude),
                scope: score(Dimension::Scope),
            },
            epistemic: EpistemicContext {
                certainty: score(Dimension::Certainty),
                information_completeness: score(Dimension::InformationCompleteness),
                expertise: score(Dimension::Expertise),
            },
        }
    }

    /// Every dimension at its default.
    pub fn defaults() -> Self {
        Self::from_fn(Dimension::default_score)
    }

    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Urgency => self.temporal.urgency,
            Dimension::Duration => self.temporal.duration,
            Dimension::Reversibility => self.temporal.reversibility,
            Dimension::Intimacy => self.relational.intimacy,
            Dimension::PowerDifferential => self.relational.power_differential,
            Dimension::Trust => self.relational.trust,
            Dimension::HarmSeverity => self.consequential.harm_severity,
            Dimension::BenefitMagnitude => self.consequential.benefit_magnitude,
            Dimension::Scope => self.consequential.scope,
            Dimension::Certainty => self.epistemic.certainty,
            Dimension::InformationCompleteness => self.epistemic.information_completeness,
            Dimension::Expertise => self.epistemic.expertise,
        }
    }

    /// `(dimension, score)` pairs in category order.
    pub fn iter(&self) -> impl Iterator<Item = (Dimension, f64)> + '_ {
        Dimension::ALL.iter().map(move |&d| (d, self.get(d)))
    }
}

/// A part-of-speech tagged token from an upstream tagger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedWord {
    pub word: String,
    pub tag: String,
}

/// The semantic frame an upstream parser assigned to the text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticFrame {
    pub name: String,

    #[serde(default)]
    pub confidence: f64,
}

/// A role filler within the semantic frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticRole {
    pub role: String,
    pub filler: String,
}

/// One dimension's score with the evidence behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionReading {
    pub dimension: Dimension,
    pub category: Category,
    pub score: f64,

    /// Winning tier, `None` when the default applied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,

    /// Keyword that produced the score
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}

/// Scores contextual intensity from raw text.
#[derive(Debug, Default)]
pub struct ContextAnalyzer {
    matcher: PatternMatcher,
}

impl ContextAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score all twelve dimensions.
    ///
    /// `tagged_words`, `frame` and `roles` may be empty or absent; they do not
    /// change the result.
    pub fn analyze_context(
        &self,
        text: &str,
        tagged_words: &[TaggedWord],
        frame: Option<&SemanticFrame>,
        roles: &[SemanticRole],
    ) -> ContextIntensity {
        tracing::trace!(
            tagged_words = tagged_words.len(),
            frame = frame.map(|f| f.name.as_str()).unwrap_or("none"),
            roles = roles.len(),
            "Analyzing context"
        );
        ContextIntensity::from_fn(|dimension| self.score_dimension(text, dimension))
    }

    /// Score all twelve dimensions from text alone.
    pub fn analyze(&self, text: &str) -> ContextIntensity {
        self.analyze_context(text, &[], None, &[])
    }

    /// Score a single dimension.
    pub fn score_dimension(&self, text: &str, dimension: Dimension) -> f64 {
        self.matcher
            .get_max_score(text, dimension.tiers(), dimension.default_score())
    }

    /// Per-dimension scores with the tier and keyword that produced them.
    pub fn explain(&self, text: &str) -> Vec<DimensionReading> {
        Dimension::ALL
            .iter()
            .map(|&dimension| {
                let found = self.matcher.best_match(text, dimension.tiers());
                if let Some(m) = &found {
                    tracing::debug!(
                        dimension = %dimension,
                        tier = %m.tier,
                        keyword = %m.keyword,
                        score = m.score,
                        "Dimension matched"
                    );
                }
                DimensionReading {
                    dimension,
                    category: dimension.category(),
                    score: found
                        .as_ref()
                        .map(|m| m.score.clamp(0.0, 1.0))
                        .unwrap_or_else(|| dimension.default_score()),
                    tier: found.as_ref().map(|m| m.tier.clone()),
                    keyword: found.map(|m| m.keyword),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_empty_text_yields_defaults() {
        let analyzer = ContextAnalyzer::new();
        let context = analyzer.analyze("");
        assert_eq!(context, ContextIntensity::defaults());
        assert_eq!(context.temporal.urgency, 0.5);
        assert_eq!(context.relational.power_differential, 0.3);
        assert_eq!(context.relational.trust, 0.5);
        assert_eq!(context.consequential.harm_severity, 0.2);
        assert_eq!(context.consequential.scope, 0.3);
        assert_eq!(context.epistemic.expertise, 0.5);
    }

    #[test]
    fn test_emergency_scores_urgency() {
        let analyzer = ContextAnalyzer::new();
        let context = analyzer.analyze("This is an emergency and the patient will die.");
        assert_eq!(context.temporal.urgency, 1.0);
        assert_eq!(context.consequential.harm_severity, 1.0);
        assert_eq!(context.relational.power_differential, 0.6);
    }

    #[test]
    fn test_highest_tier_wins_within_dimension() {
        let analyzer = ContextAnalyzer::new();
        // "harm" (medium) and "fatal" (extreme) both occur
        let context = analyzer.analyze("Minor harm today, but the outcome will be fatal.");
        assert_eq!(context.consequential.harm_severity, 1.0);
    }

    #[test]
    fn test_negated_keyword_flips_score() {
        let analyzer = ContextAnalyzer::new();
        let context = analyzer.analyze("This is not urgent.");
        assert!(close(context.temporal.urgency, 0.2));
    }

    #[test]
    fn test_intensifier_and_hedge_adjust() {
        let analyzer = ContextAnalyzer::new();
        let intensified = analyzer.analyze("The damage is really severe.");
        assert!(close(intensified.consequential.harm_severity, 0.95));

        let hedged = analyzer.analyze("She is probably trustworthy.");
        assert!(close(hedged.relational.trust, 0.75));
    }

    #[test]
    fn test_structure_does_not_change_scores() {
        let analyzer = ContextAnalyzer::new();
        let text = "A trusted doctor must act quickly to protect the community.";
        let tagged = vec![TaggedWord {
            word: "doctor".to_string(),
            tag: "NN".to_string(),
        }];
        let frame = SemanticFrame {
            name: "Protecting".to_string(),
            confidence: 0.8,
        };
        let roles = vec![SemanticRole {
            role: "agent".to_string(),
            filler: "doctor".to_string(),
        }];

        let bare = analyzer.analyze(text);
        let structured = analyzer.analyze_context(text, &tagged, Some(&frame), &roles);
        assert_eq!(bare, structured);
        assert_eq!(bare.relational.trust, 0.9);
        assert_eq!(bare.epistemic.expertise, 0.9);
        assert_eq!(bare.temporal.urgency, 0.8);
        assert_eq!(bare.consequential.benefit_magnitude, 0.8);
        assert_eq!(bare.consequential.scope, 0.8);
    }

    #[test]
    fn test_repeated_analysis_is_bitwise_identical() {
        let analyzer = ContextAnalyzer::new();
        let text = "Perhaps a permanent, irreversible decision affecting millions.";
        let first = analyzer.analyze(text);
        for _ in 0..3 {
            let again = analyzer.analyze(text);
            for ((_, a), (_, b)) in first.iter().zip(again.iter()) {
                assert_eq!(a.to_bits(), b.to_bits());
            }
        }
    }

    #[test]
    fn test_explain_reports_evidence() {
        let analyzer = ContextAnalyzer::new();
        let readings = analyzer.explain("An expert made an irreversible call.");
        assert_eq!(readings.len(), 12);

        let reversibility = readings
            .iter()
            .find(|r| r.dimension == Dimension::Reversibility)
            .unwrap();
        assert_eq!(reversibility.tier.as_deref(), Some("extreme"));
        assert_eq!(reversibility.keyword.as_deref(), Some("irreversible"));
        assert_eq!(reversibility.category, Category::Temporal);

        let scope = readings.iter().find(|r| r.dimension == Dimension::Scope).unwrap();
        assert!(scope.tier.is_none());
        assert_eq!(scope.score, 0.3);
    }

    #[test]
    fn test_explain_agrees_with_analyze() {
        let analyzer = ContextAnalyzer::new();
        let text = "Experts are uncertain whether the harm is reversible for the community.";
        let context = analyzer.analyze(text);
        for reading in analyzer.explain(text) {
            assert_eq!(reading.score, context.get(reading.dimension));
        }
    }

    #[test]
    fn test_dimension_metadata() {
        assert_eq!(Dimension::ALL.len(), 12);
        assert_eq!(Dimension::Trust.category(), Category::Relational);
        assert_eq!(Dimension::PowerDifferential.to_string(), "power_differential");
        let json = serde_json::to_string(&ContextIntensity::defaults()).unwrap();
        assert!(json.contains("\"information_completeness\":0.5"));
    }
}
