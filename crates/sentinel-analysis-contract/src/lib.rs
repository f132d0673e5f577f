#![warn(missing_docs)]
//! # sentinel-analysis-contract
//!
//! ## Purpose
//! Defines the remote analysis request envelope and the client-side handling
//! of remote responses.
//!
//! ## Responsibilities
//! - Build the request body sent to the remote analysis endpoint.
//! - Strip markdown fences that language models wrap around JSON.
//! - Fill fields the remote response omits from a fixed defaults object
//!   (shallow, top-level override).
//!
//! ## Data flow
//! [`RemoteAnalysisRequest`] -> transport -> raw body ->
//! [`parse_remote_response`] -> [`RiskAssessment`].
//!
//! ## Ownership and lifetimes
//! Parsed values are owned structs to avoid borrowing from transient network
//! buffers.
//!
//! ## Error model
//! Invalid JSON, non-object bodies, and out-of-range values return
//! [`AnalysisContractError`]. Callers treat any error as a remote failure and
//! fall back to the local heuristic.
//!
//! ## Security and privacy notes
//! The request carries user text and media; this crate never logs them.

use sentinel_core::{
    ActionButton, ButtonColor, HistorySummary, RiskAssessment, RiskLevel, RiskMatrix,
    ThreatStatus,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Request body for the remote analysis endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteAnalysisRequest {
    /// Text to analyze.
    pub input: String,
    /// Base64 data-URL images.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    /// Base64 PCM audio.
    #[serde(
        rename = "audioData",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub audio_data: Option<String>,
    /// Summaries of earlier analyses in this session.
    #[serde(default)]
    pub history: Vec<HistorySummary>,
}

/// Returns the defaults object that backs every remote response.
pub fn default_assessment() -> RiskAssessment {
    RiskAssessment {
        status: ThreatStatus::Monitoring,
        call_status: ThreatStatus::Monitoring,
        threat_type: "Analýza prerušená".to_string(),
        technical_detail: "Vyskytol sa problém pri spracovaní odpovede z AI servisu.".to_string(),
        risk_level: RiskLevel::Medium,
        user_message: "Analýza prebehla s chybou. Odporúčame zvýšenú opatrnosť.".to_string(),
        risk_matrix: RiskMatrix {
            likelihood: 0.5,
            impact: 0.5,
            composite_score: 50.0,
        },
        forensics: Vec::new(),
        mitigation_workflow: Vec::new(),
        scam_probability: 0.5,
        detected_keyword: "N/A".to_string(),
        alert_message: "⚠️ CHYBA ANALÝZY ⚠️".to_string(),
        action_button: ActionButton {
            label: "MONITOR".to_string(),
            action: "trace".to_string(),
            color: ButtonColor::Yellow,
        },
    }
}

/// Removes ```` ```json ```` and ```` ``` ```` markers and surrounding
/// whitespace.
pub fn strip_markdown_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Overlays top-level keys of `remote` onto the defaults object.
///
/// Nested objects are replaced wholesale, never merged.
///
/// # Errors
/// Returns [`AnalysisContractError::InvalidContract`] when `remote` is not a
/// JSON object or a merged value is out of range.
/// Returns [`AnalysisContractError::Decode`] when the merged object does not
/// decode, for example a partial `risk_matrix` or an unknown status.
pub fn merge_over_defaults(remote: Value) -> Result<RiskAssessment, AnalysisContractError> {
    let Value::Object(overrides) = remote else {
        return Err(AnalysisContractError::InvalidContract(
            "remote response is not a json object".to_string(),
        ));
    };

    let mut merged = serde_json::to_value(default_assessment())?;
    if let Value::Object(base) = &mut merged {
        for (key, value) in overrides {
            base.insert(key, value);
        }
    }

    let assessment: RiskAssessment = serde_json::from_value(merged)?;
    assessment
        .validate()
        .map_err(|error| AnalysisContractError::InvalidContract(error.to_string()))?;
    Ok(assessment)
}

/// Parses a raw remote body into an assessment.
///
/// An empty body (after fence stripping) is treated as `{}` and yields the
/// defaults object.
///
/// # Errors
/// See [`merge_over_defaults`]; invalid JSON returns
/// [`AnalysisContractError::Decode`].
pub fn parse_remote_response(raw: &str) -> Result<RiskAssessment, AnalysisContractError> {
    let cleaned = strip_markdown_fences(raw);
    let value: Value = if cleaned.is_empty() {
        Value::Object(serde_json::Map::new())
    } else {
        serde_json::from_str(&cleaned)?
    };
    merge_over_defaults(value)
}

/// Analysis contract errors.
#[derive(Debug, Error)]
pub enum AnalysisContractError {
    /// JSON decode failure.
    #[error("analysis decode failure: {0}")]
    Decode(#[from] serde_json::Error),
    /// Parsed payload violates contract invariants.
    #[error("analysis contract violation: {0}")]
    InvalidContract(String),
}

#[cfg(test)]
mod tests {
    //! Unit tests for fence stripping and shallow merge.

    use super::*;

    #[test]
    fn strips_json_fences() {
        let raw = "```json\n{\"status\":\"SAFE\"}\n```";
        assert_eq!(strip_markdown_fences(raw), "{\"status\":\"SAFE\"}");
    }

    #[test]
    fn empty_body_yields_defaults() {
        let parsed = parse_remote_response("  ```json ``` ").expect("empty body should merge");
        assert_eq!(parsed, default_assessment());
    }

    #[test]
    fn partial_nested_object_is_not_merged() {
        let remote = serde_json::json!({ "risk_matrix": { "likelihood": 0.2 } });
        assert!(matches!(
            merge_over_defaults(remote),
            Err(AnalysisContractError::Decode(_))
        ));
    }

    #[test]
    fn rejects_non_object_body() {
        assert!(matches!(
            parse_remote_response("[1,2,3]"),
            Err(AnalysisContractError::InvalidContract(_))
        ));
    }
}
