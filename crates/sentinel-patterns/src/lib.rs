#![warn(missing_docs)]
//! # sentinel-patterns
//!
//! ## Purpose
//! Classifies free text against named threat-category keyword families.
//!
//! ## Responsibilities
//! - Define the fixed [`ThreatCategory`] set and its human labels.
//! - Hold versioned, data-driven keyword families in a [`RuleSet`].
//! - Compile a rule set once into a reusable [`PatternMatcher`].
//! - Produce a per-call [`MatchSet`] of category flags plus the audio flag.
//!
//! ## Data flow
//! [`RuleSet::builtin`] or [`RuleSet::from_json`] -> [`PatternMatcher::new`]
//! -> [`PatternMatcher::classify`] -> [`MatchSet`] consumed by scoring.
//!
//! ## Ownership and lifetimes
//! The matcher owns its compiled regexes and is immutable after construction,
//! so one instance can be shared across threads behind `Arc` or a reference.
//!
//! ## Error model
//! Rule sets that fail to decode or compile return [`PatternError`].
//! Classification itself cannot fail.
//!
//! ## Security and privacy notes
//! Input text is matched in memory only and is never logged by this crate.
//!
//! ## Example
//! ```rust
//! use sentinel_patterns::{PatternMatcher, RuleSet, ThreatCategory};
//!
//! let matcher = PatternMatcher::new(&RuleSet::builtin()).expect("builtin rules compile");
//! let matches = matcher.classify("Pošlite IBAN", false);
//! assert!(matches.is_matched(ThreatCategory::Bank));
//! assert!(!matches.has_deepfake());
//! ```

mod builtin;

use std::fmt;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use builtin::BUILTIN_RULESET_VERSION;

/// Number of threat categories.
pub const CATEGORY_COUNT: usize = 9;

/// Fixed threat-indicator classes.
///
/// Declaration order is the order used when listing matched categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThreatCategory {
    /// Bank accounts, transfers, payments.
    Bank,
    /// Crypto assets and investment bait.
    Crypto,
    /// Credentials, cards, identity data.
    Auth,
    /// Urgency, threats, authority pressure.
    Pressure,
    /// Parcel delivery and customs pretexts.
    Delivery,
    /// Suspicious links.
    Link,
    /// Support/authority impersonation and remote access.
    Impersonation,
    /// Session hijacking indicators.
    Session,
    /// Family emergency pretexts.
    Family,
}

impl ThreatCategory {
    /// All categories in listing order.
    pub const ALL: [ThreatCategory; CATEGORY_COUNT] = [
        ThreatCategory::Bank,
        ThreatCategory::Crypto,
        ThreatCategory::Auth,
        ThreatCategory::Pressure,
        ThreatCategory::Delivery,
        ThreatCategory::Link,
        ThreatCategory::Impersonation,
        ThreatCategory::Session,
        ThreatCategory::Family,
    ];

    /// Returns the wire name (`BANK`, `AUTH`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bank => "BANK",
            Self::Crypto => "CRYPTO",
            Self::Auth => "AUTH",
            Self::Pressure => "PRESSURE",
            Self::Delivery => "DELIVERY",
            Self::Link => "LINK",
            Self::Impersonation => "IMPERSONATION",
            Self::Session => "SESSION",
            Self::Family => "FAMILY",
        }
    }

    /// Returns the human label used in technical detail text.
    pub fn label(self) -> &'static str {
        match self {
            Self::Bank => "Bank",
            Self::Crypto => "Crypto",
            Self::Auth => "Auth",
            Self::Pressure => "Urgency",
            Self::Delivery => "Delivery",
            Self::Link => "Link",
            Self::Impersonation => "Impersonation",
            Self::Session => "Session",
            Self::Family => "Family",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ThreatCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword family and weight for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    /// Category this rule detects.
    pub category: ThreatCategory,
    /// Points contributed when the category matches.
    pub weight: u32,
    /// Regex alternatives; any one occurring anywhere in the text matches.
    pub patterns: Vec<String>,
}

/// Versioned collection of category rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Rule set version tag.
    pub version: String,
    /// Category rules. Categories without a rule never match.
    pub rules: Vec<CategoryRule>,
}

impl RuleSet {
    /// Returns the built-in Slovak/English rule set.
    pub fn builtin() -> Self {
        Self {
            version: BUILTIN_RULESET_VERSION.to_string(),
            rules: builtin::BUILTIN_RULES
                .iter()
                .map(|(category, weight, patterns)| CategoryRule {
                    category: *category,
                    weight: *weight,
                    patterns: patterns.iter().map(|pattern| (*pattern).to_string()).collect(),
                })
                .collect(),
        }
    }

    /// Decodes a rule set from JSON.
    ///
    /// # Errors
    /// Returns [`PatternError::Decode`] for invalid JSON or unknown category
    /// names.
    pub fn from_json(raw: &str) -> Result<Self, PatternError> {
        serde_json::from_str(raw).map_err(PatternError::Decode)
    }

    /// Returns the rule for `category`, if present.
    pub fn rule(&self, category: ThreatCategory) -> Option<&CategoryRule> {
        self.rules.iter().find(|rule| rule.category == category)
    }

    /// Returns the weight for `category`, or `0` when the rule set has none.
    pub fn weight(&self, category: ThreatCategory) -> u32 {
        self.rule(category).map_or(0, |rule| rule.weight)
    }
}

/// Category presence flags for one analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchSet {
    flags: [bool; CATEGORY_COUNT],
    has_deepfake: bool,
}

impl MatchSet {
    /// Creates a match set from explicit flags.
    pub fn from_categories(
        categories: impl IntoIterator<Item = ThreatCategory>,
        has_deepfake: bool,
    ) -> Self {
        let mut set = Self {
            flags: [false; CATEGORY_COUNT],
            has_deepfake,
        };
        for category in categories {
            set.flags[category.index()] = true;
        }
        set
    }

    /// Returns `true` when `category` matched.
    pub fn is_matched(&self, category: ThreatCategory) -> bool {
        self.flags[category.index()]
    }

    /// Iterates matched categories in listing order.
    pub fn matched(&self) -> impl Iterator<Item = ThreatCategory> + '_ {
        ThreatCategory::ALL
            .into_iter()
            .filter(move |category| self.is_matched(*category))
    }

    /// Returns `true` when an audio payload was supplied.
    pub fn has_deepfake(&self) -> bool {
        self.has_deepfake
    }

    /// Returns `true` when no category matched. The audio flag is ignored.
    pub fn is_empty(&self) -> bool {
        !self.flags.iter().any(|flag| *flag)
    }
}

/// Compiled, immutable classifier for one rule set.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    version: String,
    compiled: Vec<(ThreatCategory, Regex)>,
}

impl PatternMatcher {
    /// Compiles every rule into one case-insensitive alternation.
    ///
    /// # Errors
    /// Returns [`PatternError::EmptyRule`] for a rule without patterns,
    /// [`PatternError::DuplicateCategory`] when a category appears twice, and
    /// [`PatternError::InvalidPattern`] when a pattern is not a valid regex.
    pub fn new(rules: &RuleSet) -> Result<Self, PatternError> {
        let mut compiled: Vec<(ThreatCategory, Regex)> = Vec::with_capacity(rules.rules.len());

        for rule in &rules.rules {
            if compiled.iter().any(|(category, _)| *category == rule.category) {
                return Err(PatternError::DuplicateCategory {
                    category: rule.category,
                });
            }
            if rule.patterns.is_empty() {
                return Err(PatternError::EmptyRule {
                    category: rule.category,
                });
            }

            // Each alternative is grouped so a `|` inside one pattern cannot
            // leak into its neighbours.
            let alternation = rule
                .patterns
                .iter()
                .map(|pattern| format!("(?:{pattern})"))
                .collect::<Vec<_>>()
                .join("|");

            let regex = RegexBuilder::new(&alternation)
                .case_insensitive(true)
                .build()
                .map_err(|source| PatternError::InvalidPattern {
                    category: rule.category,
                    source,
                })?;
            compiled.push((rule.category, regex));
        }

        tracing::debug!(
            stage = "patterns",
            action = "compile",
            version = %rules.version,
            rules = compiled.len(),
            "rule set compiled"
        );

        Ok(Self {
            version: rules.version.clone(),
            compiled,
        })
    }

    /// Classifies `text`; `has_audio` is carried through as the deepfake flag.
    ///
    /// Audio content is never inspected, presence alone is the signal.
    pub fn classify(&self, text: &str, has_audio: bool) -> MatchSet {
        let lowered = text.to_lowercase();
        MatchSet::from_categories(
            self.compiled
                .iter()
                .filter(|(_, regex)| regex.is_match(&lowered))
                .map(|(category, _)| *category),
            has_audio,
        )
    }

    /// Returns the version tag of the compiled rule set.
    pub fn version(&self) -> &str {
        &self.version
    }
}

/// Rule set decoding and compilation errors.
#[derive(Debug, Error)]
pub enum PatternError {
    /// Rule set JSON could not be decoded.
    #[error("rule set decode failure: {0}")]
    Decode(#[from] serde_json::Error),
    /// A rule has no patterns.
    #[error("rule for {category} has no patterns")]
    EmptyRule {
        /// Offending category.
        category: ThreatCategory,
    },
    /// A category has more than one rule.
    #[error("duplicate rule for {category}")]
    DuplicateCategory {
        /// Offending category.
        category: ThreatCategory,
    },
    /// A pattern failed to compile.
    #[error("invalid pattern for {category}: {source}")]
    InvalidPattern {
        /// Offending category.
        category: ThreatCategory,
        /// Regex compiler error.
        source: regex::Error,
    },
}
