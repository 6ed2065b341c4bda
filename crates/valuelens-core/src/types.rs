//! Core types shared across valuelens.
//!
//! These are the data structures exchanged with collaborators outside this
//! crate: polarity, provenance of a value, and the salience-scored values the
//! profiler consumes.

use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt;

/// Direction in which text engages a value.
///
/// Serialized as the integers -1, 0 and 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Polarity {
    /// The text works against the value
    Violating,

    /// No direction, or evidence in both directions
    #[default]
    Neutral,

    /// The text supports the value
    Upholding,
}

impl Polarity {
    pub fn as_i8(self) -> i8 {
        match self {
            Polarity::Violating => -1,
            Polarity::Neutral => 0,
            Polarity::Upholding => 1,
        }
    }

    pub fn is_neutral(self) -> bool {
        matches!(self, Polarity::Neutral)
    }

    /// Both polarities are non-zero and point in different directions.
    pub fn is_opposite(self, other: Polarity) -> bool {
        !self.is_neutral() && !other.is_neutral() && self != other
    }
}

impl From<Polarity> for i8 {
    fn from(polarity: Polarity) -> Self {
        polarity.as_i8()
    }
}

impl TryFrom<i8> for Polarity {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Polarity::Violating),
            0 => Ok(Polarity::Neutral),
            1 => Ok(Polarity::Upholding),
            other => Err(format!("polarity must be -1, 0 or 1, got {}", other)),
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.as_i8())
    }
}

/// How a value came to be attached to the text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSource {
    /// Found through its semantic markers
    #[default]
    Keyword,

    /// Inferred from another value or from structure
    Entailed,
}

impl ValueSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueSource::Keyword => "keyword",
            ValueSource::Entailed => "entailed",
        }
    }
}

/// Components of an upstream salience score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    #[serde(default)]
    pub keyword_score: f64,

    #[serde(default)]
    pub frame_boost: f64,

    #[serde(default)]
    pub role_boost: f64,
}

impl ScoreBreakdown {
    /// One label per non-zero component ("keywords:0.40", "frame:0.20", ...).
    pub fn boosted_by(&self) -> Vec<String> {
        [
            ("keywords", self.keyword_score),
            ("frame", self.frame_boost),
            ("role", self.role_boost),
        ]
        .iter()
        .filter(|(_, amount)| *amount != 0.0)
        .map(|(label, amount)| format!("{}:{:.2}", label, amount))
        .collect()
    }
}

/// A value already scored for salience by an upstream scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredValue {
    pub name: String,

    pub domain: String,

    /// Confidence in [0, 1] that the value is present
    pub salience: f64,

    #[serde(default)]
    pub polarity: Polarity,

    /// Whether upstream saw evidence in both directions
    #[serde(default)]
    pub conflict: bool,

    #[serde(default)]
    pub evidence: Vec<String>,

    #[serde(default)]
    pub source: ValueSource,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<ScoreBreakdown>,
}

impl ScoredValue {
    /// Keyword-sourced value with no evidence or breakdown.
    pub fn new(
        name: impl Into<String>,
        domain: impl Into<String>,
        salience: f64,
        polarity: Polarity,
    ) -> Self {
        Self {
            name: name.into(),
            domain: domain.into(),
            salience,
            polarity,
            conflict: false,
            evidence: Vec::new(),
            source: ValueSource::Keyword,
            breakdown: None,
        }
    }

    /// Salience clamped to [0, 1]; NaN counts as 0.
    pub fn clamped_salience(&self) -> f64 {
        if self.salience.is_nan() {
            0.0
        } else {
            self.salience.clamp(0.0, 1.0)
        }
    }
}

/// Round to two decimals.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
