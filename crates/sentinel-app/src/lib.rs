#![warn(missing_docs)]
//! # sentinel-app
//!
//! ## Purpose
//! Orchestrates remote analysis and the offline heuristic fallback for
//! `sentinel-eye`.
//!
//! ## Responsibilities
//! - Load runtime configuration from the environment.
//! - Call the remote analysis service through an injectable transport.
//! - Substitute the whole local heuristic result when the remote call fails.
//! - Keep logs free of raw input, audio, and secrets.
//!
//! ## Data flow
//! [`AnalysisRequest`] -> [`AnalysisTransport::analyze`] ->
//! [`sentinel_analysis_contract::parse_remote_response`] on success, or
//! [`HeuristicEngine::assess`] on any failure -> [`ResolvedAssessment`].
//!
//! ## Ownership and lifetimes
//! The analyzer owns its engine and shares the transport behind `Arc`, so one
//! analyzer can serve concurrent requests.
//!
//! ## Error model
//! Construction and configuration failures are wrapped in [`AppError`].
//! [`ThreatAnalyzer::analyze`] itself never fails: remote errors are logged
//! and resolved by the fallback engine.
//!
//! ## Security and privacy notes
//! - Inputs are identified in logs by [`input_fingerprint`] only.
//! - Transport error text passes through [`redact_sensitive`] before logging.
//! - Non-HTTPS remote endpoints are rejected unless they are loopback.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use sentinel_analysis_contract::{
    AnalysisContractError, RemoteAnalysisRequest, parse_remote_response,
};
use sentinel_core::{AnalysisInput, HistorySummary, RiskAssessment};
use sentinel_patterns::{PatternError, RuleSet};
use sentinel_scoring::HeuristicEngine;
use sha2::{Digest, Sha256};
use thiserror::Error;
use url::{Host, Url};

/// Build-time application version loaded from root `VERSION` file.
pub const APP_VERSION: &str = env!("SENTINEL_VERSION");

/// Env var holding the remote analysis endpoint.
pub const ENV_ANALYZE_ENDPOINT: &str = "SENTINEL_ANALYZE_ENDPOINT";
/// Env var that disables remote analysis when set to `0`, `false`, or `off`.
pub const ENV_REMOTE_ENABLED: &str = "SENTINEL_REMOTE_ENABLED";
/// Env var pointing at an alternate JSON rule set.
pub const ENV_RULES_PATH: &str = "SENTINEL_RULES_PATH";

const DEFAULT_ANALYZE_ENDPOINT: &str = "https://localhost/api/analyze";

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Remote analysis endpoint.
    pub analyze_endpoint: String,
    /// Whether remote analysis is attempted at all.
    pub remote_enabled: bool,
    /// Optional alternate rule set file.
    pub rules_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            analyze_endpoint: DEFAULT_ANALYZE_ENDPOINT.to_string(),
            remote_enabled: true,
            rules_path: None,
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment variables, defaulting unset ones.
    pub fn from_env() -> Self {
        let analyze_endpoint = std::env::var(ENV_ANALYZE_ENDPOINT)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ANALYZE_ENDPOINT.to_string());

        let rules_path = std::env::var_os(ENV_RULES_PATH)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        Self {
            analyze_endpoint,
            remote_enabled: remote_enabled_from_env(),
            rules_path,
        }
    }

    /// Checks the endpoint policy.
    ///
    /// # Errors
    /// Returns [`AppError::InvalidEndpoint`] when the endpoint is not a secure
    /// URL per [`is_secure_endpoint`].
    pub fn validate(&self) -> Result<(), AppError> {
        if !is_secure_endpoint(&self.analyze_endpoint) {
            return Err(AppError::InvalidEndpoint(format!(
                "{} must use https or a loopback host",
                self.analyze_endpoint
            )));
        }
        Ok(())
    }

    /// Loads the configured rule set, or the built-in one.
    ///
    /// Read or decode failures are logged and resolved to the built-in set.
    pub fn load_rule_set(&self) -> RuleSet {
        match &self.rules_path {
            Some(path) => load_rule_set_file(path).unwrap_or_else(|error| {
                tracing::warn!(
                    stage = "config",
                    action = "load_rules",
                    path = %path.display(),
                    error = %error,
                    "failed to load rule set, using built-in rules"
                );
                RuleSet::builtin()
            }),
            None => RuleSet::builtin(),
        }
    }
}

fn load_rule_set_file(path: &Path) -> Result<RuleSet, AppError> {
    let raw = std::fs::read_to_string(path).map_err(|error| AppError::Io {
        path: path.to_path_buf(),
        source: error,
    })?;
    let rules = RuleSet::from_json(&raw)?;
    tracing::info!(
        stage = "config",
        action = "load_rules",
        path = %path.display(),
        version = %rules.version,
        "loaded rule set from file"
    );
    Ok(rules)
}

/// Checks the remote kill-switch env var.
///
/// Semantics:
/// - Unset => remote enabled.
/// - `0`, `false`, `off` (case-insensitive) => remote disabled.
/// - Any other value => remote enabled.
pub fn remote_enabled_from_env() -> bool {
    match std::env::var(ENV_REMOTE_ENABLED) {
        Ok(value) => {
            let normalized = value.trim().to_ascii_lowercase();
            !(normalized == "0" || normalized == "false" || normalized == "off")
        }
        Err(_) => true,
    }
}

/// Returns `true` for HTTPS URLs, and for plain HTTP on a loopback host.
pub fn is_secure_endpoint(endpoint: &str) -> bool {
    let Ok(url) = Url::parse(endpoint) else {
        return false;
    };
    if url.scheme() == "https" {
        return true;
    }

    url.scheme() == "http"
        && match url.host() {
            Some(Host::Domain(domain)) => domain == "localhost",
            Some(Host::Ipv4(address)) => address.is_loopback(),
            Some(Host::Ipv6(address)) => address.is_loopback(),
            None => false,
        }
}

/// Redacts common secret markers in log-safe output.
///
/// Everything from the first marker onwards is replaced.
pub fn redact_sensitive(input: &str) -> String {
    const MARKERS: [&str; 6] = ["password", "token", "authorization", "bearer", "cvv", "audiodata"];

    let lower = input.to_ascii_lowercase();
    let first = MARKERS
        .iter()
        .filter_map(|marker| lower.find(marker).map(|position| (position, *marker)))
        .min_by_key(|(position, _)| *position);

    match first {
        Some((position, marker)) => format!("{}{marker}=<redacted>", &input[..position]),
        None => input.to_string(),
    }
}

/// Short stable identifier for an input, safe to log.
pub fn input_fingerprint(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    hex::encode(&digest[..8])
}

/// One analysis request as captured by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisRequest {
    /// Text or transcript to analyze.
    pub text: String,
    /// Base64 data-URL images, forwarded to the remote service only.
    pub images: Vec<String>,
    /// Base64 PCM audio, forwarded to the remote service; locally only its
    /// presence is used.
    pub audio_data: Option<String>,
}

impl AnalysisRequest {
    /// Text-only request.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Input for the local heuristic engine.
    pub fn heuristic_input(&self) -> AnalysisInput {
        AnalysisInput::from_payloads(self.text.clone(), self.audio_data.as_deref())
    }

    /// Request envelope for the remote service.
    pub fn remote_request(&self, history: &[HistorySummary]) -> RemoteAnalysisRequest {
        RemoteAnalysisRequest {
            input: self.text.clone(),
            images: self.images.clone(),
            audio_data: self.audio_data.clone().filter(|payload| !payload.is_empty()),
            history: history.to_vec(),
        }
    }
}

/// Remote transport failures.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Service unreachable or not configured.
    #[error("remote analysis unavailable: {0}")]
    Unavailable(String),
    /// Service answered with a non-success status.
    #[error("remote analysis returned status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },
    /// Request timed out.
    #[error("remote analysis timed out")]
    Timeout,
}

/// Abstract transport to the remote analysis service.
pub trait AnalysisTransport: Send + Sync {
    /// Sends the request and returns the raw success body.
    ///
    /// # Errors
    /// Returns [`TransportError`] for network failures and non-success
    /// responses.
    fn analyze(
        &self,
        endpoint: &str,
        request: &RemoteAnalysisRequest,
    ) -> Result<String, TransportError>;
}

/// Transport used when no remote client is wired in. Always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineTransport;

impl AnalysisTransport for OfflineTransport {
    fn analyze(
        &self,
        _endpoint: &str,
        _request: &RemoteAnalysisRequest,
    ) -> Result<String, TransportError> {
        Err(TransportError::Unavailable(
            "no remote transport configured".to_string(),
        ))
    }
}

/// Engine that produced an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineSource {
    /// Remote analysis service, merged over defaults.
    Remote,
    /// Offline heuristic fallback.
    LocalHeuristic,
}

/// Assessment together with the engine that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAssessment {
    /// Final assessment.
    pub assessment: RiskAssessment,
    /// Producing engine.
    pub source: EngineSource,
}

/// Two-tier analyzer: remote first, local heuristic on any failure.
#[derive(Clone)]
pub struct ThreatAnalyzer {
    config: AppConfig,
    transport: Arc<dyn AnalysisTransport>,
    engine: HeuristicEngine,
}

impl ThreatAnalyzer {
    /// Creates an analyzer from parts.
    ///
    /// # Errors
    /// Returns [`AppError::InvalidEndpoint`] when remote analysis is enabled
    /// and the endpoint fails [`AppConfig::validate`].
    pub fn new(
        config: AppConfig,
        transport: Arc<dyn AnalysisTransport>,
        engine: HeuristicEngine,
    ) -> Result<Self, AppError> {
        if config.remote_enabled {
            config.validate()?;
        }
        Ok(Self {
            config,
            transport,
            engine,
        })
    }

    /// Creates an analyzer with the engine described by `config`.
    ///
    /// A configured rule set that fails to compile is logged and replaced by
    /// the built-in set.
    ///
    /// # Errors
    /// Returns [`AppError::Patterns`] if even the built-in rules fail to
    /// compile, or [`AppError::InvalidEndpoint`] per [`ThreatAnalyzer::new`].
    pub fn from_config(
        config: AppConfig,
        transport: Arc<dyn AnalysisTransport>,
    ) -> Result<Self, AppError> {
        let rules = config.load_rule_set();
        let engine = match HeuristicEngine::new(&rules) {
            Ok(engine) => engine,
            Err(error) => {
                tracing::warn!(
                    stage = "config",
                    action = "compile_rules",
                    version = %rules.version,
                    error = %error,
                    "rule set does not compile, using built-in rules"
                );
                HeuristicEngine::builtin()?
            }
        };
        Self::new(config, transport, engine)
    }

    /// Returns active configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Returns the fallback engine.
    pub fn engine(&self) -> &HeuristicEngine {
        &self.engine
    }

    /// Resolves one request.
    ///
    /// On remote success the merged remote result is returned untouched; on
    /// any failure the entire heuristic result replaces it.
    pub fn analyze(
        &self,
        request: &AnalysisRequest,
        history: &[HistorySummary],
    ) -> ResolvedAssessment {
        let fingerprint = input_fingerprint(&request.text);

        if !self.config.remote_enabled {
            tracing::info!(
                stage = "analysis",
                action = "remote_skipped",
                input = %fingerprint,
                "remote analysis disabled"
            );
            return self.fallback(request, &fingerprint);
        }

        match self.try_remote(request, history) {
            Ok(assessment) => {
                tracing::info!(
                    stage = "analysis",
                    action = "remote_success",
                    input = %fingerprint,
                    status = %assessment.status,
                    "remote analysis succeeded"
                );
                ResolvedAssessment {
                    assessment,
                    source: EngineSource::Remote,
                }
            }
            Err(error) => {
                tracing::warn!(
                    stage = "analysis",
                    action = "remote_failed",
                    input = %fingerprint,
                    error = %redact_sensitive(&error.to_string()),
                    "remote analysis failed, initiating heuristic fallback"
                );
                self.fallback(request, &fingerprint)
            }
        }
    }

    fn try_remote(
        &self,
        request: &AnalysisRequest,
        history: &[HistorySummary],
    ) -> Result<RiskAssessment, AppError> {
        let body = self
            .transport
            .analyze(&self.config.analyze_endpoint, &request.remote_request(history))?;
        Ok(parse_remote_response(&body)?)
    }

    fn fallback(&self, request: &AnalysisRequest, fingerprint: &str) -> ResolvedAssessment {
        let assessment = self.engine.assess(&request.heuristic_input());
        tracing::info!(
            stage = "analysis",
            action = "local_fallback",
            input = %fingerprint,
            status = %assessment.status,
            composite_score = assessment.risk_matrix.composite_score,
            "local heuristic assessment produced"
        );
        ResolvedAssessment {
            assessment,
            source: EngineSource::LocalHeuristic,
        }
    }
}

/// App integration error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Remote endpoint violates policy.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
    /// Rule set decode or compile failure.
    #[error("rule set error: {0}")]
    Patterns(#[from] PatternError),
    /// Remote response violated the contract.
    #[error("analysis error: {0}")]
    Analysis(#[from] AnalysisContractError),
    /// Remote transport failure.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    /// File read failure.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Output encoding failure.
    #[error("output encoding failure: {0}")]
    Encode(#[from] serde_json::Error),
}
