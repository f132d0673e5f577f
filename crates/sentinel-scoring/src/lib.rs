#![warn(missing_docs)]
//! # sentinel-scoring
//!
//! ## Purpose
//! Turns category match flags into a bounded, explained [`RiskAssessment`].
//! This is the offline fallback used when remote analysis is unavailable.
//!
//! ## Responsibilities
//! - Accumulate category weights, the audio weight, and combination bonuses
//!   into a raw score.
//! - Map the raw score to status and risk level through fixed thresholds.
//! - Pick a representative keyword label by ordered priority rules.
//! - Assemble the full assessment with static local forensics and workflow.
//!
//! ## Data flow
//! [`AnalysisInput`] -> [`sentinel_patterns::PatternMatcher::classify`] ->
//! [`ScoringModel::score`] -> [`Verdict::from_raw_score`] -> assembled
//! [`RiskAssessment`]. [`HeuristicEngine`] runs the whole chain.
//!
//! ## Ownership and lifetimes
//! [`ScoringModel`] is plain immutable data; tests substitute alternate
//! weights, bonuses, and thresholds by constructing their own value.
//!
//! ## Error model
//! Scoring and assembly are total: every input, including empty text,
//! yields a well-formed assessment. Only engine construction can fail, when
//! the rule set does not compile.
//!
//! ## Security and privacy notes
//! Logs carry scores and category names only, never input text.
//!
//! ## Example
//! ```rust
//! use sentinel_core::{AnalysisInput, ThreatStatus};
//! use sentinel_scoring::HeuristicEngine;
//!
//! let engine = HeuristicEngine::builtin().expect("builtin rules compile");
//! let assessment = engine.assess(&AnalysisInput::text("Dobrý deň, ako sa máte?"));
//! assert_eq!(assessment.status, ThreatStatus::Monitoring);
//! assert_eq!(assessment.risk_matrix.composite_score, 0.0);
//! ```

mod assemble;

use std::collections::BTreeMap;

use sentinel_core::{AnalysisInput, RiskAssessment, RiskLevel, ThreatStatus};
use sentinel_patterns::{MatchSet, PatternError, PatternMatcher, RuleSet, ThreatCategory};

pub use assemble::MAX_COMPOSITE_SCORE;

/// Points added when an audio payload was supplied.
pub const DEEPFAKE_WEIGHT: u32 = 15;

/// Extra points when every listed category matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinationBonus {
    /// Categories that must all match.
    pub all_of: Vec<ThreatCategory>,
    /// Points added.
    pub bonus: u32,
}

impl CombinationBonus {
    fn applies(&self, matches: &MatchSet) -> bool {
        !self.all_of.is_empty() && self.all_of.iter().all(|category| matches.is_matched(*category))
    }
}

/// Raw-score thresholds for status derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    /// Scores at or above this are `DANGER`.
    pub danger_at: u32,
    /// Scores strictly above this (and below `danger_at`) are `WARNING`.
    pub warning_above: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            danger_at: 50,
            warning_above: 20,
        }
    }
}

/// Label chosen when `when` matched. Rules are evaluated in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordRule {
    /// Triggering category.
    pub when: ThreatCategory,
    /// Label reported as `detected_keyword`.
    pub label: String,
}

/// Immutable scoring configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringModel {
    /// Points per matched category. Missing categories score zero.
    pub weights: BTreeMap<ThreatCategory, u32>,
    /// Points when audio was supplied.
    pub deepfake_weight: u32,
    /// Contextual bonuses; several may apply at once.
    pub combination_bonuses: Vec<CombinationBonus>,
    /// Status thresholds.
    pub thresholds: Thresholds,
    /// First-match-wins keyword label rules.
    pub keyword_rules: Vec<KeywordRule>,
    /// Label when no keyword rule matched.
    pub keyword_fallback: String,
}

impl ScoringModel {
    /// Builds the standard model with weights taken from `rules`.
    pub fn standard(rules: &RuleSet) -> Self {
        Self {
            weights: rules
                .rules
                .iter()
                .map(|rule| (rule.category, rule.weight))
                .collect(),
            deepfake_weight: DEEPFAKE_WEIGHT,
            combination_bonuses: vec![
                CombinationBonus {
                    all_of: vec![ThreatCategory::Pressure, ThreatCategory::Impersonation],
                    bonus: 20,
                },
                CombinationBonus {
                    all_of: vec![ThreatCategory::Pressure, ThreatCategory::Auth],
                    bonus: 20,
                },
            ],
            thresholds: Thresholds::default(),
            keyword_rules: vec![
                KeywordRule {
                    when: ThreatCategory::Auth,
                    label: "Kreditná Karta / Identita".to_string(),
                },
                KeywordRule {
                    when: ThreatCategory::Bank,
                    label: "Bankové údaje".to_string(),
                },
            ],
            keyword_fallback: "Nátlak".to_string(),
        }
    }

    /// Sums all applicable weights and bonuses. The result is unbounded.
    pub fn score(&self, matches: &MatchSet) -> ScoreBreakdown {
        let mut contributions = Vec::new();

        for category in matches.matched() {
            let points = self.weights.get(&category).copied().unwrap_or(0);
            contributions.push(Contribution {
                source: ContributionSource::Category(category),
                points,
            });
        }

        if matches.has_deepfake() {
            contributions.push(Contribution {
                source: ContributionSource::Deepfake,
                points: self.deepfake_weight,
            });
        }

        for bonus in &self.combination_bonuses {
            if bonus.applies(matches) {
                contributions.push(Contribution {
                    source: ContributionSource::Combination(bonus.all_of.clone()),
                    points: bonus.bonus,
                });
            }
        }

        let raw_score = contributions
            .iter()
            .fold(0_u32, |total, item| total.saturating_add(item.points));

        ScoreBreakdown {
            raw_score,
            contributions,
        }
    }

    /// Returns the label of the first keyword rule whose category matched.
    pub fn detected_keyword(&self, matches: &MatchSet) -> &str {
        self.keyword_rules
            .iter()
            .find(|rule| matches.is_matched(rule.when))
            .map_or(self.keyword_fallback.as_str(), |rule| rule.label.as_str())
    }
}

/// What produced one score contribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContributionSource {
    /// A matched category.
    Category(ThreatCategory),
    /// Audio payload present.
    Deepfake,
    /// A combination bonus over the listed categories.
    Combination(Vec<ThreatCategory>),
}

/// One applied weight or bonus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contribution {
    /// Origin of the points.
    pub source: ContributionSource,
    /// Points added.
    pub points: u32,
}

/// Raw score with its itemized contributions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreBreakdown {
    /// Sum of all contributions, before clamping.
    pub raw_score: u32,
    /// Contributions in application order: categories, audio, bonuses.
    pub contributions: Vec<Contribution>,
}

/// Status and risk level derived from a raw score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    /// Threat status.
    pub status: ThreatStatus,
    /// Risk level.
    pub risk_level: RiskLevel,
}

impl Verdict {
    /// Applies the thresholds, highest first.
    pub fn from_raw_score(raw_score: u32, thresholds: &Thresholds) -> Self {
        if raw_score >= thresholds.danger_at {
            Self {
                status: ThreatStatus::Danger,
                risk_level: RiskLevel::Critical,
            }
        } else if raw_score > thresholds.warning_above {
            Self {
                status: ThreatStatus::Warning,
                risk_level: RiskLevel::High,
            }
        } else {
            Self {
                status: ThreatStatus::Monitoring,
                risk_level: RiskLevel::Medium,
            }
        }
    }

    /// Returns `true` for `DANGER`.
    pub fn is_danger(&self) -> bool {
        self.status == ThreatStatus::Danger
    }
}

/// Full trace of one heuristic evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct HeuristicReport {
    /// Category flags.
    pub matches: MatchSet,
    /// Itemized score.
    pub breakdown: ScoreBreakdown,
    /// Derived verdict.
    pub verdict: Verdict,
    /// Assembled assessment.
    pub assessment: RiskAssessment,
}

/// Pattern matcher and scoring model bundled as one fallback engine.
#[derive(Debug, Clone)]
pub struct HeuristicEngine {
    matcher: PatternMatcher,
    model: ScoringModel,
}

impl HeuristicEngine {
    /// Compiles `rules` and derives the standard model from them.
    ///
    /// # Errors
    /// Returns [`PatternError`] when the rule set does not compile.
    pub fn new(rules: &RuleSet) -> Result<Self, PatternError> {
        Ok(Self {
            matcher: PatternMatcher::new(rules)?,
            model: ScoringModel::standard(rules),
        })
    }

    /// Engine over the built-in rule set.
    ///
    /// # Errors
    /// Returns [`PatternError`] if the built-in rules fail to compile.
    pub fn builtin() -> Result<Self, PatternError> {
        Self::new(&RuleSet::builtin())
    }

    /// Combines an already compiled matcher with a custom model.
    pub fn with_model(matcher: PatternMatcher, model: ScoringModel) -> Self {
        Self { matcher, model }
    }

    /// Returns the scoring model.
    pub fn model(&self) -> &ScoringModel {
        &self.model
    }

    /// Returns the rule set version of the matcher.
    pub fn rules_version(&self) -> &str {
        self.matcher.version()
    }

    /// Produces the assessment for `input`.
    pub fn assess(&self, input: &AnalysisInput) -> RiskAssessment {
        self.evaluate(input).assessment
    }

    /// Produces the assessment along with the intermediate match and score.
    pub fn evaluate(&self, input: &AnalysisInput) -> HeuristicReport {
        let matches = self.matcher.classify(&input.text, input.has_audio);
        let breakdown = self.model.score(&matches);
        let verdict = Verdict::from_raw_score(breakdown.raw_score, &self.model.thresholds);
        let assessment = assemble::build_assessment(&matches, &breakdown, verdict, &self.model);

        tracing::debug!(
            stage = "heuristic",
            action = "evaluate",
            rules_version = self.matcher.version(),
            matched = ?matches.matched().collect::<Vec<_>>(),
            deepfake = matches.has_deepfake(),
            raw_score = breakdown.raw_score,
            status = %verdict.status,
            "local assessment produced"
        );

        HeuristicReport {
            matches,
            breakdown,
            verdict,
            assessment,
        }
    }
}
