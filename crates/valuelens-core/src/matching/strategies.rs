//! Named matching presets.
//!
//! Each preset is an immutable [`MatchOptions`] value. The domain presets
//! (medical, legal, ethics) differ from the general ones only in their numbers;
//! they carry no extra matching logic.
//!
//! | Preset | lemmatize | case_sensitive | partial_match | threshold |
//! |--------|-----------|----------------|---------------|-----------|
//! | STRICT | no | yes | no | 1.00 |
//! | BALANCED | yes | no | yes | 0.80 |
//! | FUZZY | yes | no | yes | 0.60 |
//! | MEDICAL | yes | no | yes | 0.85 |
//! | LEGAL | no | yes | no | 0.95 |
//! | ETHICS | yes | no | yes | 0.80 |

use serde::{Deserialize, Serialize};

/// Options controlling how [`PatternMatcher::contains_any`] compares a phrase
/// with text.
///
/// [`PatternMatcher::contains_any`]: super::PatternMatcher::contains_any
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchOptions {
    /// Reduce inflected tokens to a light stem before comparing
    #[serde(default)]
    pub lemmatize: bool,

    /// Compare tokens without lowercasing them first
    #[serde(default)]
    pub case_sensitive: bool,

    /// Allow pattern tokens to appear out of order or with words in between
    #[serde(default)]
    pub partial_match: bool,

    /// Minimum aggregate token similarity for a match
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_threshold() -> f64 {
    MatchingStrategies::BALANCED.threshold
}

impl Default for MatchOptions {
    fn default() -> Self {
        MatchingStrategies::BALANCED
    }
}

impl MatchOptions {
    /// True when only a verbatim occurrence can reach the threshold, so the
    /// options reduce to a whole-word search.
    pub fn is_exact(&self) -> bool {
        !self.lemmatize && !self.partial_match && self.threshold + f64::EPSILON >= 1.0
    }
}

/// Namespace for the built-in presets.
pub struct MatchingStrategies;

impl MatchingStrategies {
    pub const STRICT: MatchOptions = MatchOptions {
        lemmatize: false,
        case_sensitive: true,
        partial_match: false,
        threshold: 1.0,
    };

    /// The default preset.
    pub const BALANCED: MatchOptions = MatchOptions {
        lemmatize: true,
        case_sensitive: false,
        partial_match: true,
        threshold: 0.8,
    };

    pub const FUZZY: MatchOptions = MatchOptions {
        lemmatize: true,
        case_sensitive: false,
        partial_match: true,
        threshold: 0.6,
    };

    pub const MEDICAL: MatchOptions = MatchOptions {
        lemmatize: true,
        case_sensitive: false,
        partial_match: true,
        threshold: 0.85,
    };

    pub const LEGAL: MatchOptions = MatchOptions {
        lemmatize: false,
        case_sensitive: true,
        partial_match: false,
        threshold: 0.95,
    };

    /// Same numbers as BALANCED, labeled for ethics vocabularies.
    pub const ETHICS: MatchOptions = MatchOptions {
        lemmatize: true,
        case_sensitive: false,
        partial_match: true,
        threshold: 0.8,
    };

    /// All presets with their canonical names, in declaration order.
    pub fn all() -> [(&'static str, MatchOptions); 6] {
        [
            ("strict", Self::STRICT),
            ("balanced", Self::BALANCED),
            ("fuzzy", Self::FUZZY),
            ("medical", Self::MEDICAL),
            ("legal", Self::LEGAL),
            ("ethics", Self::ETHICS),
        ]
    }

    /// Look up a preset by name (case-insensitive).
    pub fn by_name(name: &str) -> Option<MatchOptions> {
        let wanted = name.trim().to_lowercase();
        Self::all()
            .into_iter()
            .find(|(preset, _)| *preset == wanted)
            .map(|(_, options)| options)
    }
}
