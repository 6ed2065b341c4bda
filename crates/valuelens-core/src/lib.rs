//! # valuelens-core
//!
//! Rule-based lexical analysis of ethical values in short natural-language text.
//!
//! This crate answers three questions about a piece of text:
//! - Which values from a taxonomy does it engage, and in which direction?
//! - How intense is its context (urgency, harm, power, certainty, ...)?
//! - Given salience-scored values, what does the overall profile look like,
//!   and where are the tensions?
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same input always produces same output
//! 2. **No learning**: All scoring is lexical and rule-based
//! 3. **Explainable**: Detections carry evidence, dimensions carry the tier
//!    and keyword that produced them, conflicts carry their tension
//! 4. **Non-mutating**: Caller-owned collections are never reordered
//!
//! ## Data flow
//!
//! | Input | Component | Output |
//! |-------|-----------|--------|
//! | text + taxonomy | [`ValueMatcher`] | [`DetectedValue`]s |
//! | text | [`ContextAnalyzer`] | [`ContextIntensity`] (12 dimensions) |
//! | scored values + conflict table | [`EthicalProfiler`] | [`Profile`] |
//!
//! Turning detections into salience-scored values happens upstream of the
//! profiler and is not part of this crate.
//!
//! ## Example
//!
//! ```rust,ignore
//! use valuelens_core::{analyze_text, ContextAnalyzer, Taxonomy, ValueMatcher};
//!
//! let matcher = ValueMatcher::new(Taxonomy::from_yaml_file("taxonomy.yaml")?);
//! let analyzer = ContextAnalyzer::new();
//! let analysis = analyze_text(&matcher, &analyzer, "This is an emergency.");
//!
//! println!("urgency = {}", analysis.context.temporal.urgency);
//! ```

pub mod context;
pub mod matching;
pub mod profile;
pub mod taxonomy;
pub mod types;
pub mod values;

// Re-export main types at crate root
pub use context::{
    Category, ContextAnalyzer, ContextIntensity, Dimension, DimensionReading, SemanticFrame,
    SemanticRole, TaggedWord,
};
pub use matching::{MatchOptions, MatchingStrategies, PatternMatcher, Tier, TierMatch};
pub use profile::{
    Conflict, ConflictSource, EthicalProfiler, Profile, ProfileMetadata, ProfileOptions,
};
pub use taxonomy::{
    ConflictPair, ConflictTable, PolarityIndicators, Taxonomy, TaxonomyError, ValueDefinition,
};
pub use types::{Polarity, ScoreBreakdown, ScoredValue, ValueSource};
pub use values::{DetectedValue, Stance, ValueMatcher};

use serde::{Deserialize, Serialize};

/// Both text flows for one input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextAnalysis {
    pub values: Vec<DetectedValue>,
    pub context: ContextIntensity,
}

/// Detect values and score context for a text.
///
/// The two flows are independent; neither influences the other.
pub fn analyze_text(matcher: &ValueMatcher, analyzer: &ContextAnalyzer, text: &str) -> TextAnalysis {
    TextAnalysis {
        values: matcher.match_values(text),
        context: analyzer.analyze(text),
    }
}
