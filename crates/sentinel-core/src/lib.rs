#![warn(missing_docs)]
//! # sentinel-core
//!
//! ## Purpose
//! Defines the threat assessment data model shared across the `sentinel-eye`
//! workspace.
//!
//! ## Responsibilities
//! - Represent the analysis input consumed by the heuristic engine.
//! - Represent the [`RiskAssessment`] produced by either the remote analysis
//!   service or the local heuristic fallback.
//! - Encode/decode assessments as JSON with the exact wire field names.
//! - Summarize prior assessments into opaque history entries.
//!
//! ## Data flow
//! Orchestration builds an [`AnalysisInput`] -> an engine produces a
//! [`RiskAssessment`] -> dashboards and reports consume it without knowing
//! which engine produced it.
//!
//! ## Ownership and lifetimes
//! All records own their strings so assessments can outlive the request that
//! produced them and be cloned into history freely.
//!
//! ## Error model
//! Range violations and JSON codec failures return [`CoreError`].
//!
//! ## Security and privacy notes
//! Assessments carry only derived labels and scores. Raw input text is never
//! copied into an assessment by this crate.
//!
//! ## Example
//! ```rust
//! use sentinel_core::{AnalysisInput, ThreatStatus};
//!
//! let input = AnalysisInput::from_payloads("Dobrý deň", Some(""));
//! assert!(!input.has_audio);
//! assert_eq!(ThreatStatus::Danger.to_string(), "DANGER");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Overall verdict of one analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThreatStatus {
    /// No threat indicators.
    Safe,
    /// Suspicious content.
    Warning,
    /// Likely fraud attempt.
    Danger,
    /// Nothing conclusive; keep observing.
    Monitoring,
}

impl ThreatStatus {
    /// Returns the wire name (`SAFE`, `WARNING`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "SAFE",
            Self::Warning => "WARNING",
            Self::Danger => "DANGER",
            Self::Monitoring => "MONITORING",
        }
    }
}

impl fmt::Display for ThreatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Risk level attached to an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    /// Informational only.
    Info,
    /// Low risk.
    Low,
    /// Medium risk.
    Medium,
    /// High risk.
    High,
    /// Critical risk.
    Critical,
}

impl RiskLevel {
    /// Returns the wire name (`INFO`, `LOW`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Likelihood/impact matrix with a bounded composite score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskMatrix {
    /// Likelihood in [0.0, 1.0].
    pub likelihood: f64,
    /// Impact in [0.0, 1.0].
    pub impact: f64,
    /// Composite score in [0, 100]. Local output never exceeds 99.
    pub composite_score: f64,
}

/// One labeled evidence record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForensicIndicator {
    /// Indicator type, for example `LOCAL_HEURISTICS`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Indicator value, for example `PATTERN_MATCH`.
    pub value: String,
    /// Confidence in [0.0, 1.0].
    pub confidence: f64,
}

/// Progress of one mitigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// Not started.
    Pending,
    /// In progress.
    Active,
    /// Done.
    Completed,
}

/// One step of the remediation workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MitigationStep {
    /// Step identifier.
    pub id: String,
    /// Human-readable step description.
    pub step: String,
    /// Step progress.
    pub status: StepStatus,
}

/// Color of the recommended action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ButtonColor {
    /// Safe to proceed.
    Green,
    /// Caution.
    Yellow,
    /// Act now.
    Red,
}

/// Recommended next operator action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionButton {
    /// Button label, for example `TERMINATE`.
    pub label: String,
    /// Action identifier, for example `jam`.
    pub action: String,
    /// Display color.
    pub color: ButtonColor,
}

/// Structured threat assessment.
///
/// The field set mirrors the remote analysis schema so consumers are
/// indifferent to which engine produced the value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Overall verdict.
    pub status: ThreatStatus,
    /// Call verdict; equal to `status` for local output.
    pub call_status: ThreatStatus,
    /// Short threat classification.
    pub threat_type: String,
    /// Technical explanation with matched categories.
    pub technical_detail: String,
    /// Risk level.
    pub risk_level: RiskLevel,
    /// Instruction shown to the user.
    pub user_message: String,
    /// Likelihood/impact matrix.
    pub risk_matrix: RiskMatrix,
    /// Ordered evidence records.
    pub forensics: Vec<ForensicIndicator>,
    /// Ordered remediation steps.
    pub mitigation_workflow: Vec<MitigationStep>,
    /// Fraud probability in [0.0, 1.0].
    pub scam_probability: f64,
    /// Representative keyword label.
    pub detected_keyword: String,
    /// High-visibility alert text.
    pub alert_message: String,
    /// Recommended action.
    pub action_button: ActionButton,
}

impl RiskAssessment {
    /// Checks numeric fields against their documented ranges.
    ///
    /// # Errors
    /// Returns [`CoreError::OutOfRange`] for the first field outside its range
    /// (NaN included).
    pub fn validate(&self) -> Result<(), CoreError> {
        check_unit("risk_matrix.likelihood", self.risk_matrix.likelihood)?;
        check_unit("risk_matrix.impact", self.risk_matrix.impact)?;
        check_range(
            "risk_matrix.composite_score",
            self.risk_matrix.composite_score,
            100.0,
        )?;
        check_unit("scam_probability", self.scam_probability)?;
        for indicator in &self.forensics {
            check_unit("forensics.confidence", indicator.confidence)?;
        }
        Ok(())
    }

    /// Serializes the assessment to compact JSON bytes.
    ///
    /// # Errors
    /// Returns [`CoreError::Codec`] when JSON serialization fails.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, CoreError> {
        serde_json::to_vec(self).map_err(CoreError::Codec)
    }

    /// Deserializes an assessment from JSON bytes.
    ///
    /// # Errors
    /// Returns [`CoreError::Codec`] when JSON decoding fails.
    pub fn from_json_bytes(raw: &[u8]) -> Result<Self, CoreError> {
        serde_json::from_slice(raw).map_err(CoreError::Codec)
    }
}

fn check_unit(field: &'static str, value: f64) -> Result<(), CoreError> {
    check_range(field, value, 1.0)
}

fn check_range(field: &'static str, value: f64, max: f64) -> Result<(), CoreError> {
    if (0.0..=max).contains(&value) {
        Ok(())
    } else {
        Err(CoreError::OutOfRange { field, value })
    }
}

/// Input consumed by the heuristic engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisInput {
    /// Free text to classify. May be empty.
    pub text: String,
    /// Whether an audio payload accompanied the text.
    #[serde(rename = "hasAudio")]
    pub has_audio: bool,
}

impl AnalysisInput {
    /// Creates text-only input.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            has_audio: false,
        }
    }

    /// Creates input from raw payloads.
    ///
    /// Audio counts as present only when the payload is non-empty; its
    /// content is never inspected.
    pub fn from_payloads(text: impl Into<String>, audio_payload: Option<&str>) -> Self {
        Self {
            text: text.into(),
            has_audio: audio_payload.is_some_and(|payload| !payload.is_empty()),
        }
    }
}

/// Opaque summary of a prior analysis, forwarded to the remote service as
/// context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySummary {
    /// Input that was analyzed.
    pub input: String,
    /// `"<threat_type>: <status>"`.
    pub result: String,
}

impl HistorySummary {
    /// Summarizes one prior analysis.
    pub fn from_assessment(input: impl Into<String>, assessment: &RiskAssessment) -> Self {
        Self {
            input: input.into(),
            result: format!("{}: {}", assessment.threat_type, assessment.status),
        }
    }
}

/// Error type for model validation and codec failures.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Numeric field outside its documented range.
    #[error("{field} out of range: {value}")]
    OutOfRange {
        /// Dotted field path.
        field: &'static str,
        /// Offending value.
        value: f64,
    },
    /// JSON encoding/decoding error.
    #[error("assessment codec failure: {0}")]
    Codec(#[from] serde_json::Error),
}
