//! Scenario tests for the offline fallback engine.

use sentinel_core::{AnalysisInput, ButtonColor, RiskLevel, StepStatus, ThreatStatus};
use sentinel_scoring::{HeuristicEngine, HeuristicReport};

fn evaluate(text: &str) -> HeuristicReport {
    HeuristicEngine::builtin()
        .expect("builtin engine should build")
        .evaluate(&AnalysisInput::text(text))
}

#[test]
fn fallback_scenario_tests_account_number_request_is_critical() {
    let report = evaluate("Prosím pošlite číslo účtu a IBAN");

    assert_eq!(report.breakdown.raw_score, 70);
    assert_eq!(report.assessment.status, ThreatStatus::Danger);
    assert_eq!(report.assessment.risk_level, RiskLevel::Critical);
    assert_eq!(report.assessment.detected_keyword, "Kreditná Karta / Identita");
    assert_eq!(report.assessment.risk_matrix.impact, 0.95);
}

#[test]
fn fallback_scenario_tests_detail_without_family_keeps_separator() {
    let report = evaluate("Pošlite IBAN");

    assert_eq!(report.breakdown.raw_score, 30);
    assert_eq!(
        report.assessment.technical_detail,
        "Súlad s NIST SP 800-61r2 & OWASP. Detekované: Bank, ."
    );

    let report = evaluate("Pošlite IBAN, váš syn");
    assert_eq!(
        report.assessment.technical_detail,
        "Súlad s NIST SP 800-61r2 & OWASP. Detekované: Bank, Family."
    );
}

#[test]
fn fallback_scenario_tests_card_pin_with_urgency_gets_bonus() {
    let report = evaluate("Zadajte heslo a PIN kód ku kreditnej karte ihneď!");
    let assessment = &report.assessment;

    assert_eq!(report.breakdown.raw_score, 40 + 30 + 20);
    assert_eq!(assessment.status, ThreatStatus::Danger);
    assert_eq!(assessment.risk_level, RiskLevel::Critical);
    assert!(assessment.scam_probability > 0.5);
    assert_eq!(assessment.risk_matrix.composite_score, 90.0);
    assert_eq!(assessment.risk_matrix.likelihood, 0.9);
    assert_eq!(assessment.action_button.label, "TERMINATE");
    assert_eq!(assessment.action_button.action, "jam");
    assert_eq!(assessment.action_button.color, ButtonColor::Red);
}

#[test]
fn fallback_scenario_tests_greeting_is_monitoring() {
    let report = evaluate("Dobrý deň, ako sa máte?");
    let assessment = &report.assessment;

    assert_eq!(report.breakdown.raw_score, 0);
    assert_eq!(assessment.status, ThreatStatus::Monitoring);
    assert_eq!(assessment.call_status, ThreatStatus::Monitoring);
    assert_eq!(assessment.risk_level, RiskLevel::Medium);
    assert_eq!(assessment.risk_matrix.composite_score, 0.0);
    assert_eq!(assessment.risk_matrix.impact, 0.70);
    assert_eq!(assessment.detected_keyword, "Nátlak");
    assert_eq!(assessment.threat_type, "NIST/OWASP Analýza: Monitorovanie");
    assert_eq!(assessment.alert_message, "⚠️ PODOZRIVÝ HOVOR ⚠️");
    assert_eq!(assessment.action_button.color, ButtonColor::Yellow);
}

#[test]
fn fallback_scenario_tests_grandchild_scam_counts_money_twice() {
    // FAMILY (35) via `peniaze`, BANK (30) via the `peniaz` stem.
    let report = evaluate("Ahoj babi, som tvoj vnuk, mal som nehodu a potrebujem peniaze");

    assert_eq!(report.breakdown.raw_score, 35 + 30);
    assert_eq!(report.assessment.status, ThreatStatus::Danger);
    assert!(report.assessment.technical_detail.contains("Family"));
    assert_eq!(report.assessment.detected_keyword, "Bankové údaje");
}

#[test]
fn fallback_scenario_tests_audio_only_stays_monitoring() {
    let engine = HeuristicEngine::builtin().expect("builtin engine should build");
    let report = engine.evaluate(&AnalysisInput::from_payloads("", Some("AAAA")));

    assert_eq!(report.breakdown.raw_score, 15);
    assert_eq!(report.assessment.status, ThreatStatus::Monitoring);
    assert_eq!(report.assessment.risk_matrix.composite_score, 15.0);
}

#[test]
fn fallback_scenario_tests_impersonation_and_session_are_warnings() {
    let report = evaluate("Volám z Microsoft podpory, váš počítač má vírus");
    assert_eq!(report.assessment.status, ThreatStatus::Warning);
    assert_eq!(report.assessment.risk_level, RiskLevel::High);
    assert!(report.assessment.technical_detail.contains("Impersonation"));

    let report = evaluate("Your session has expired, please re-authenticate with your token");
    assert_eq!(report.breakdown.raw_score, 25);
    assert_eq!(report.assessment.status, ThreatStatus::Warning);
    assert!(report.assessment.technical_detail.contains("Session"));
}

#[test]
fn fallback_scenario_tests_police_threat_stacks_both_categories_and_bonus() {
    let report = evaluate("Tu je polícia, máte zatykač, zaplaťte pokutu ihneď alebo vás zatkneme.");

    assert_eq!(report.breakdown.raw_score, 30 + 35 + 20);
    assert_eq!(report.assessment.risk_level, RiskLevel::Critical);
    assert!(report.assessment.technical_detail.contains("Urgency"));
}

#[test]
fn fallback_scenario_tests_many_categories_clamp_below_hundred() {
    let report = evaluate(
        "Banka: heslo ihneď, kliknite na link, Microsoft admin, session token, bitcoin, balík, syn",
    );
    let assessment = &report.assessment;

    assert!(report.breakdown.raw_score > 99);
    assert_eq!(assessment.risk_matrix.composite_score, 99.0);
    assert_eq!(assessment.risk_matrix.likelihood, 0.99);
    assert_eq!(assessment.scam_probability, 1.0);
}

#[test]
fn fallback_scenario_tests_static_forensics_and_workflow() {
    let assessment = evaluate("").assessment;

    assert_eq!(assessment.forensics.len(), 2);
    assert_eq!(assessment.forensics[0].kind, "LOCAL_HEURISTICS");
    assert_eq!(assessment.forensics[0].value, "PATTERN_MATCH");
    assert_eq!(assessment.forensics[0].confidence, 0.85);
    assert_eq!(assessment.forensics[1].kind, "API_STATUS");
    assert_eq!(assessment.forensics[1].value, "OFFLINE_FALLBACK");
    assert_eq!(assessment.forensics[1].confidence, 1.0);

    let steps: Vec<_> = assessment
        .mitigation_workflow
        .iter()
        .map(|step| (step.id.as_str(), step.status))
        .collect();
    assert_eq!(
        steps,
        vec![
            ("f1", StepStatus::Completed),
            ("f2", StepStatus::Completed),
            ("f3", StepStatus::Pending),
        ]
    );
    assert!(assessment.validate().is_ok());
}
