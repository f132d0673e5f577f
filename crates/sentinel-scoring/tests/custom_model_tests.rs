//! Tests substituting scoring configuration.

use sentinel_core::{AnalysisInput, ThreatStatus};
use sentinel_patterns::{PatternMatcher, RuleSet, ThreatCategory};
use sentinel_scoring::{ContributionSource, HeuristicEngine, ScoringModel, Thresholds};

#[test]
fn custom_model_tests_thresholds_and_weights_are_injectable() {
    let rules = RuleSet::builtin();
    let mut model = ScoringModel::standard(&rules);
    model.weights.insert(ThreatCategory::Delivery, 60);
    model.thresholds = Thresholds {
        danger_at: 80,
        warning_above: 10,
    };

    let engine = HeuristicEngine::with_model(
        PatternMatcher::new(&rules).expect("rules should compile"),
        model,
    );

    let report = engine.evaluate(&AnalysisInput::text("Váš balík čaká"));
    assert_eq!(report.breakdown.raw_score, 60);
    assert_eq!(report.assessment.status, ThreatStatus::Warning);
}

#[test]
fn custom_model_tests_rule_set_weights_flow_into_model() {
    let raw = r#"{"version":"t1","rules":[{"category":"LINK","weight":55,"patterns":["odkaz"]}]}"#;
    let rules = RuleSet::from_json(raw).expect("rule set should decode");
    let engine = HeuristicEngine::new(&rules).expect("engine should build");

    let report = engine.evaluate(&AnalysisInput::text("Pozrite tento ODKAZ"));
    assert_eq!(engine.rules_version(), "t1");
    assert_eq!(report.breakdown.raw_score, 55);
    assert_eq!(report.assessment.status, ThreatStatus::Danger);
    assert_eq!(
        report.breakdown.contributions[0].source,
        ContributionSource::Category(ThreatCategory::Link)
    );
}

#[test]
fn custom_model_tests_engine_is_shareable_across_threads() {
    let engine = HeuristicEngine::builtin().expect("builtin engine should build");
    let inputs = ["Prosím pošlite číslo účtu a IBAN", "Dobrý deň", "bit.ly/x"];
    let expected: Vec<_> = inputs
        .iter()
        .map(|text| engine.assess(&AnalysisInput::text(*text)))
        .collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|text| {
                let engine = &engine;
                scope.spawn(move || engine.assess(&AnalysisInput::text(*text)))
            })
            .collect();
        for (handle, want) in handles.into_iter().zip(&expected) {
            let got = handle.join().expect("worker should not panic");
            assert_eq!(&got, want);
        }
    });
}
