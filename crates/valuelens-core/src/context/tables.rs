//! Tiered keyword tables for the twelve context dimensions.
//!
//! Each table lists its tiers strongest first. A text's score on a dimension
//! is the single best adjusted tier match, never a sum.
//!
//! All scores read as intensity: for `reversibility` a high score means the
//! outcome is hard or impossible to undo.

use crate::matching::Tier;

// =========================================================================
// TEMPORAL
// =========================================================================

pub const URGENCY: &[Tier<'static>] = &[
    Tier {
        name: "extreme",
        score: 1.0,
        keywords: &[
            "emergency", "immediately", "life-threatening", "right now", "critical", "crisis",
            "dying", "at once",
        ],
    },
    Tier {
        name: "high",
        score: 0.8,
        keywords: &[
            "urgent", "urgently", "asap", "as soon as possible", "quickly", "deadline",
            "pressing", "time-sensitive", "hurry",
        ],
    },
    Tier {
        name: "medium",
        score: 0.6,
        keywords: &["soon", "shortly", "this week", "timely", "upcoming"],
    },
    Tier {
        name: "low",
        score: 0.2,
        keywords: &["eventually", "no rush", "someday", "whenever", "in due course"],
    },
];

pub const DURATION: &[Tier<'static>] = &[
    Tier {
        name: "extreme",
        score: 1.0,
        keywords: &["permanent", "permanently", "forever", "lifelong", "for life", "for generations"],
    },
    Tier {
        name: "high",
        score: 0.8,
        keywords: &["years", "decades", "chronic", "long-term", "ongoing", "lasting"],
    },
    Tier {
        name: "medium",
        score: 0.5,
        keywords: &["months", "weeks", "several days", "a while"],
    },
    Tier {
        name: "low",
        score: 0.2,
        keywords: &[
            "temporary", "temporarily", "brief", "briefly", "momentary", "one-time",
            "short-term", "minutes",
        ],
    },
];

pub const REVERSIBILITY: &[Tier<'static>] = &[
    Tier {
        name: "extreme",
        score: 1.0,
        keywords: &[
            "irreversible", "irreversibly", "irrevocable", "cannot be undone", "no going back",
            "point of no return",
        ],
    },
    Tier {
        name: "high",
        score: 0.75,
        keywords: &["hard to undo", "difficult to reverse", "lasting damage", "long-lasting"],
    },
    Tier {
        name: "medium",
        score: 0.45,
        keywords: &["partially reversible", "recoverable", "mitigated"],
    },
    Tier {
        name: "low",
        score: 0.2,
        keywords: &["reversible", "undo", "can be undone", "easily fixed", "correctable", "fixable"],
    },
];

// =========================================================================
// RELATIONAL
// =========================================================================

pub const INTIMACY: &[Tier<'static>] = &[
    Tier {
        name: "extreme",
        score: 1.0,
        keywords: &[
            "spouse", "husband", "wife", "my child", "my children", "mother", "father",
            "family", "parent",
        ],
    },
    Tier {
        name: "high",
        score: 0.75,
        keywords: &["friend", "best friend", "sibling", "brother", "sister", "relative", "loved one"],
    },
    Tier {
        name: "medium",
        score: 0.5,
        keywords: &["colleague", "coworker", "neighbor", "classmate", "acquaintance"],
    },
    Tier {
        name: "low",
        score: 0.15,
        keywords: &["stranger", "strangers", "anonymous", "the public", "customer"],
    },
];

pub const POWER_DIFFERENTIAL: &[Tier<'static>] = &[
    Tier {
        name: "extreme",
        score: 1.0,
        keywords: &["dictator", "prisoner", "inmate", "in custody", "hostage", "captive"],
    },
    Tier {
        name: "high",
        score: 0.8,
        keywords: &[
            "boss", "employer", "supervisor", "authority", "landlord", "government",
            "vulnerable", "guardian", "officer",
        ],
    },
    Tier {
        name: "medium",
        score: 0.6,
        keywords: &["employee", "student", "patient", "patients", "tenant", "subordinate", "manager"],
    },
    Tier {
        name: "low",
        score: 0.15,
        keywords: &["peer", "peers", "equal", "equals", "teammate", "mutual"],
    },
];

pub const TRUST: &[Tier<'static>] = &[
    Tier {
        name: "high",
        score: 0.9,
        keywords: &["trusted", "trustworthy", "reliable", "faithful", "loyal", "confided"],
    },
    Tier {
        name: "medium",
        score: 0.7,
        keywords: &["trust", "rely on", "count on", "depend on", "believe in"],
    },
    Tier {
        name: "low",
        score: 0.2,
        keywords: &[
            "distrust", "mistrust", "suspicious", "betrayed", "betrayal", "deceived",
            "unreliable",
        ],
    },
];

// =========================================================================
// CONSEQUENTIAL
// =========================================================================

pub const HARM_SEVERITY: &[Tier<'static>] = &[
    Tier {
        name: "extreme",
        score: 1.0,
        keywords: &["death", "die", "dies", "kill", "killed", "fatal", "lethal", "catastrophic"],
    },
    Tier {
        name: "high",
        score: 0.8,
        keywords: &[
            "severe", "injury", "injured", "abuse", "abused", "violence", "trauma", "suffering",
        ],
    },
    Tier {
        name: "medium",
        score: 0.5,
        keywords: &["harm", "harmed", "hurt", "damage", "damaged", "pain", "distress", "risk"],
    },
    Tier {
        name: "low",
        score: 0.3,
        keywords: &["inconvenience", "discomfort", "setback", "annoyance", "minor issue"],
    },
];

pub const BENEFIT_MAGNITUDE: &[Tier<'static>] = &[
    Tier {
        name: "extreme",
        score: 1.0,
        keywords: &["save lives", "saves lives", "life-saving", "lifesaving", "cure", "transformative"],
    },
    Tier {
        name: "high",
        score: 0.8,
        keywords: &["protect", "rescue", "heal", "significant benefit", "major improvement"],
    },
    Tier {
        name: "medium",
        score: 0.5,
        keywords: &["help", "helps", "improve", "improves", "benefit", "benefits", "support", "assist"],
    },
    Tier {
        name: "low",
        score: 0.3,
        keywords: &["convenience", "slightly better", "minor benefit", "small improvement"],
    },
];

pub const SCOPE: &[Tier<'static>] = &[
    Tier {
        name: "extreme",
        score: 1.0,
        keywords: &[
            "everyone", "humanity", "society", "global", "worldwide", "nationwide", "millions",
            "entire population",
        ],
    },
    Tier {
        name: "high",
        score: 0.8,
        keywords: &["community", "communities", "thousands", "public", "citizens", "nation", "population"],
    },
    Tier {
        name: "medium",
        score: 0.5,
        keywords: &["group", "team", "families", "organization", "department", "several people"],
    },
    Tier {
        name: "low",
        score: 0.2,
        keywords: &["individual", "one person", "personally", "myself", "himself", "herself"],
    },
];

// =========================================================================
// EPISTEMIC
// =========================================================================

pub const CERTAINTY: &[Tier<'static>] = &[
    Tier {
        name: "extreme",
        score: 1.0,
        keywords: &["certain", "certainly", "definitely", "undoubtedly", "proven", "guaranteed"],
    },
    Tier {
        name: "high",
        score: 0.8,
        keywords: &["confident", "clearly", "evidently", "confirmed", "established"],
    },
    Tier {
        name: "medium",
        score: 0.6,
        keywords: &["likely", "probably", "expected", "believed"],
    },
    Tier {
        name: "low",
        score: 0.2,
        keywords: &["uncertain", "unclear", "unsure", "doubtful", "speculative", "ambiguous", "unknown"],
    },
];

pub const INFORMATION_COMPLETENESS: &[Tier<'static>] = &[
    Tier {
        name: "high",
        score: 0.9,
        keywords: &["comprehensive", "fully informed", "all the facts", "complete information", "thorough"],
    },
    Tier {
        name: "medium",
        score: 0.6,
        keywords: &["informed", "aware", "some information", "detailed"],
    },
    Tier {
        name: "low",
        score: 0.2,
        keywords: &[
            "incomplete", "missing information", "partial", "limited information", "unaware",
            "uninformed", "misinformed",
        ],
    },
];

pub const EXPERTISE: &[Tier<'static>] = &[
    Tier {
        name: "high",
        score: 0.9,
        keywords: &[
            "expert", "experts", "specialist", "physician", "surgeon", "doctor", "scientist",
            "licensed", "certified",
        ],
    },
    Tier {
        name: "medium",
        score: 0.6,
        keywords: &["trained", "experienced", "knowledgeable", "skilled", "professional"],
    },
    Tier {
        name: "low",
        score: 0.2,
        keywords: &["novice", "layperson", "amateur", "untrained", "inexperienced", "beginner", "unqualified"],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: &[&[Tier<'static>]] = &[
        URGENCY,
        DURATION,
        REVERSIBILITY,
        INTIMACY,
        POWER_DIFFERENTIAL,
        TRUST,
        HARM_SEVERITY,
        BENEFIT_MAGNITUDE,
        SCOPE,
        CERTAINTY,
        INFORMATION_COMPLETENESS,
        EXPERTISE,
    ];

    #[test]
    fn test_tiers_are_ordered_strongest_first() {
        for table in ALL {
            for pair in table.windows(2) {
                assert!(pair[0].score > pair[1].score, "{} before {}", pair[0].name, pair[1].name);
            }
        }
    }

    #[test]
    fn test_scores_within_unit_interval() {
        for table in ALL {
            for tier in *table {
                assert!((0.0..=1.0).contains(&tier.score));
                assert!(!tier.keywords.is_empty());
            }
        }
    }

    #[test]
    fn test_no_keyword_repeated_within_a_table() {
        for table in ALL {
            let mut seen = std::collections::HashSet::new();
            for tier in *table {
                for keyword in tier.keywords {
                    assert!(seen.insert(*keyword), "duplicate keyword {}", keyword);
                }
            }
        }
    }
}
