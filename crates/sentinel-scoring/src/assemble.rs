//! Response assembly for locally produced assessments.

use sentinel_core::{
    ActionButton, ButtonColor, ForensicIndicator, MitigationStep, RiskAssessment, RiskMatrix,
    StepStatus,
};
use sentinel_patterns::{MatchSet, ThreatCategory};

use crate::{ScoreBreakdown, ScoringModel, Verdict};

const DETAIL_PREFIX: &str = "Súlad s NIST SP 800-61r2 & OWASP. Detekované: ";

const THREAT_TYPE_DANGER: &str = "NIST/OWASP Detekcia: Kritická hrozba";
const THREAT_TYPE_MONITOR: &str = "NIST/OWASP Analýza: Monitorovanie";

const USER_MESSAGE_DANGER: &str =
    "Pozor! Lokálna analýza detekovala vysoké riziko podvodu. Neodovzdávajte žiadne údaje!";
const USER_MESSAGE_MONITOR: &str =
    "Systém monitoruje podozrivý priebeh hovoru. Zachovajte ostražitosť.";

const ALERT_DANGER: &str = "⚠️ KRITICKÁ HROZBA: PODVOD ⚠️";
const ALERT_MONITOR: &str = "⚠️ PODOZRIVÝ HOVOR ⚠️";

const IMPACT_WITH_CREDENTIALS: f64 = 0.95;
const IMPACT_DEFAULT: f64 = 0.70;

/// Local output stays one point below the remote schema maximum.
pub const MAX_COMPOSITE_SCORE: u32 = 99;
const MAX_LIKELIHOOD: f64 = 0.99;

pub(crate) fn build_assessment(
    matches: &MatchSet,
    breakdown: &ScoreBreakdown,
    verdict: Verdict,
    model: &ScoringModel,
) -> RiskAssessment {
    let raw_score = breakdown.raw_score;
    let danger = verdict.is_danger();

    RiskAssessment {
        status: verdict.status,
        call_status: verdict.status,
        threat_type: pick(danger, THREAT_TYPE_DANGER, THREAT_TYPE_MONITOR).to_string(),
        technical_detail: technical_detail(matches),
        risk_level: verdict.risk_level,
        user_message: pick(danger, USER_MESSAGE_DANGER, USER_MESSAGE_MONITOR).to_string(),
        risk_matrix: risk_matrix(raw_score, matches),
        forensics: local_forensics(),
        mitigation_workflow: local_workflow(),
        scam_probability: (f64::from(raw_score) / 100.0).min(1.0),
        detected_keyword: model.detected_keyword(matches).to_string(),
        alert_message: pick(danger, ALERT_DANGER, ALERT_MONITOR).to_string(),
        action_button: action_button(danger),
    }
}

fn pick(danger: bool, when_danger: &'static str, otherwise: &'static str) -> &'static str {
    if danger { when_danger } else { otherwise }
}

/// Prefix plus matched labels in listing order, then `.`.
///
/// Every label except `Family` (always last) carries a `", "` suffix, so
/// output without `Family` ends in `", ."`.
pub(crate) fn technical_detail(matches: &MatchSet) -> String {
    let labels: String = matches
        .matched()
        .map(|category| match category {
            ThreatCategory::Family => category.label().to_string(),
            _ => format!("{}, ", category.label()),
        })
        .collect();
    format!("{DETAIL_PREFIX}{labels}.")
}

fn risk_matrix(raw_score: u32, matches: &MatchSet) -> RiskMatrix {
    RiskMatrix {
        likelihood: (f64::from(raw_score) / 100.0).min(MAX_LIKELIHOOD),
        impact: if matches.is_matched(ThreatCategory::Auth) {
            IMPACT_WITH_CREDENTIALS
        } else {
            IMPACT_DEFAULT
        },
        composite_score: f64::from(raw_score.min(MAX_COMPOSITE_SCORE)),
    }
}

fn local_forensics() -> Vec<ForensicIndicator> {
    vec![
        ForensicIndicator {
            kind: "LOCAL_HEURISTICS".to_string(),
            value: "PATTERN_MATCH".to_string(),
            confidence: 0.85,
        },
        ForensicIndicator {
            kind: "API_STATUS".to_string(),
            value: "OFFLINE_FALLBACK".to_string(),
            confidence: 1.0,
        },
    ]
}

fn local_workflow() -> Vec<MitigationStep> {
    [
        ("f1", "Local heuristic scan", StepStatus::Completed),
        ("f2", "UI Alert triggering", StepStatus::Completed),
        ("f3", "Automatic response generation", StepStatus::Pending),
    ]
    .into_iter()
    .map(|(id, step, status)| MitigationStep {
        id: id.to_string(),
        step: step.to_string(),
        status,
    })
    .collect()
}

fn action_button(danger: bool) -> ActionButton {
    if danger {
        ActionButton {
            label: "TERMINATE".to_string(),
            action: "jam".to_string(),
            color: ButtonColor::Red,
        }
    } else {
        ActionButton {
            label: "MONITOR".to_string(),
            action: "trace".to_string(),
            color: ButtonColor::Yellow,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_keeps_separator_before_period_without_family() {
        let matches =
            MatchSet::from_categories([ThreatCategory::Auth, ThreatCategory::Bank], false);
        assert_eq!(
            technical_detail(&matches),
            "Súlad s NIST SP 800-61r2 & OWASP. Detekované: Bank, Auth, ."
        );
    }

    #[test]
    fn detail_ends_with_family_label() {
        let matches = MatchSet::from_categories(
            [ThreatCategory::Family, ThreatCategory::Pressure, ThreatCategory::Bank],
            false,
        );
        assert_eq!(
            technical_detail(&matches),
            "Súlad s NIST SP 800-61r2 & OWASP. Detekované: Bank, Urgency, Family."
        );
        assert_eq!(
            technical_detail(&MatchSet::default()),
            "Súlad s NIST SP 800-61r2 & OWASP. Detekované: ."
        );
    }

    #[test]
    fn matrix_clamps_at_ninety_nine() {
        let matrix = risk_matrix(250, &MatchSet::default());
        assert_eq!(matrix.composite_score, 99.0);
        assert_eq!(matrix.likelihood, 0.99);
        assert_eq!(matrix.impact, 0.70);
    }
}
