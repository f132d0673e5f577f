//! Shared fixtures for app integration tests.

use std::sync::Mutex;

use sentinel_analysis_contract::RemoteAnalysisRequest;
use sentinel_app::{AnalysisTransport, AppConfig, TransportError};

/// Canned outcome for [`ScriptedTransport`].
#[allow(dead_code)]
pub enum Reply {
    Body(String),
    Status(u16),
    Timeout,
}

/// Transport returning a fixed reply and recording requests.
#[allow(dead_code)]
pub struct ScriptedTransport {
    pub reply: Reply,
    pub requests: Mutex<Vec<RemoteAnalysisRequest>>,
}

#[allow(dead_code)]
impl ScriptedTransport {
    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn ok(body: &str) -> Self {
        Self::with_reply(Reply::Body(body.to_string()))
    }

    pub fn status(status: u16) -> Self {
        Self::with_reply(Reply::Status(status))
    }

    pub fn timeout() -> Self {
        Self::with_reply(Reply::Timeout)
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().expect("request lock should work").len()
    }
}

impl AnalysisTransport for ScriptedTransport {
    fn analyze(
        &self,
        _endpoint: &str,
        request: &RemoteAnalysisRequest,
    ) -> Result<String, TransportError> {
        self.requests
            .lock()
            .expect("request lock should work")
            .push(request.clone());
        match &self.reply {
            Reply::Body(body) => Ok(body.clone()),
            Reply::Status(status) => Err(TransportError::Status { status: *status }),
            Reply::Timeout => Err(TransportError::Timeout),
        }
    }
}

/// Config with remote analysis enabled against a test endpoint.
#[allow(dead_code)]
pub fn remote_config() -> AppConfig {
    AppConfig {
        analyze_endpoint: "https://api.example.test/api/analyze".to_string(),
        remote_enabled: true,
        rules_path: None,
    }
}
