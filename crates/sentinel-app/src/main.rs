#![warn(missing_docs)]
//! # sentinel-eye binary
//!
//! Command-line entry point: analyzes one text and prints the assessment.

use std::io::Read;
use std::sync::Arc;

use clap::Parser;
use sentinel_app::{
    AnalysisRequest, AppConfig, AppError, EngineSource, OfflineTransport, ThreatAnalyzer,
    app_version,
};
use sentinel_core::RiskAssessment;

/// Estimates whether a message or call transcript is a fraud attempt.
#[derive(Parser, Debug)]
#[command(name = "sentinel-eye", version = app_version(), about, long_about = None)]
struct Args {
    /// Text to analyze. Read from stdin when omitted.
    #[arg(value_name = "TEXT")]
    text: Option<String>,

    /// Treat the input as accompanied by an audio recording.
    #[arg(long)]
    audio: bool,

    /// Print the full assessment as JSON.
    #[arg(long)]
    json: bool,
}

/// CLI entry point.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(error) = run(Args::parse()) {
        eprintln!("sentinel-eye failed: {error}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), AppError> {
    let text = match args.text {
        Some(text) => text,
        None => read_stdin()?,
    };

    let config = AppConfig::from_env();
    tracing::info!(
        stage = "startup",
        action = "config",
        version = app_version(),
        remote_enabled = config.remote_enabled,
        "sentinel-eye starting"
    );

    // No network client ships with the binary; remote calls resolve to the
    // heuristic fallback.
    let analyzer = ThreatAnalyzer::from_config(config, Arc::new(OfflineTransport))?;

    let request = AnalysisRequest {
        text,
        images: Vec::new(),
        audio_data: args.audio.then(|| "present".to_string()),
    };
    let resolved = analyzer.analyze(&request, &[]);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&resolved.assessment)?);
    } else {
        print_summary(&resolved.assessment, resolved.source);
    }
    Ok(())
}

fn read_stdin() -> Result<String, AppError> {
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|source| AppError::Io {
            path: "<stdin>".into(),
            source,
        })?;
    Ok(buffer)
}

fn print_summary(assessment: &RiskAssessment, source: EngineSource) {
    let engine = match source {
        EngineSource::Remote => "remote",
        EngineSource::LocalHeuristic => "local heuristic",
    };
    println!("{}", assessment.alert_message);
    println!(
        "status={} risk_level={} composite_score={} engine={engine}",
        assessment.status, assessment.risk_level, assessment.risk_matrix.composite_score
    );
    println!("detected_keyword={}", assessment.detected_keyword);
    println!("{}", assessment.technical_detail);
    println!(
        "action={} ({})",
        assessment.action_button.label, assessment.action_button.action
    );
}
