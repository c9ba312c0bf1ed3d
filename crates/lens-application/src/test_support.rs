//! Mock backend collaborators shared by the application tests.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use lens_core::{
    AnalysisReport, AnalysisService, LensError, PasswordVerifier, Result, SessionToken,
    StartupIdea, TokenProvider,
};
use serde_json::{Value, json};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Notify;

pub const NOW: i64 = 1_700_000_000;

pub fn jwt(exp: i64) -> String {
    jwt_with_claims(&format!(r#"{{"exp":{exp}}}"#))
}

pub fn jwt_with_claims(claims: &str) -> String {
    format!(
        "{}.{}.sig",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256"}"#),
        URL_SAFE_NO_PAD.encode(claims)
    )
}

pub fn sample_report() -> Value {
    json!({
        "verdict": {
            "feasibilityScore": 78,
            "recommendation": "Proceed with caution",
            "riskLevel": "Medium"
        }
    })
}

/// Token endpoint that issues a fixed token, or fails when built with
/// [`MockTokenProvider::failing`].
pub struct MockTokenProvider {
    calls: AtomicUsize,
    issued: Option<String>,
}

impl MockTokenProvider {
    pub fn healthy() -> Self {
        Self::issuing(jwt(NOW + 3600))
    }

    pub fn issuing(token: impl Into<String>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            issued: Some(token.into()),
        }
    }

    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            issued: None,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenProvider for MockTokenProvider {
    async fn acquire_token(&self) -> Result<SessionToken> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.issued {
            Some(token) => Ok(SessionToken::new(token.clone())),
            None => Err(LensError::token_acquisition("auth endpoint unreachable")),
        }
    }
}

pub struct MockPasswordVerifier {
    pub accepted: &'static str,
}

#[async_trait]
impl PasswordVerifier for MockPasswordVerifier {
    async fn verify_password(&self, candidate: &str) -> Result<bool> {
        Ok(candidate == self.accepted)
    }
}

/// Analysis backend that records every call. When constructed with
/// [`MockAnalysisService::held`], each call blocks until `release` is notified.
pub struct MockAnalysisService {
    calls: AtomicUsize,
    fail: AtomicBool,
    hold: bool,
    pub started: Notify,
    pub release: Notify,
    last_request: Mutex<Option<(StartupIdea, String)>>,
}

impl MockAnalysisService {
    pub fn succeeding() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
            hold: false,
            started: Notify::new(),
            release: Notify::new(),
            last_request: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        let service = Self::succeeding();
        service.fail.store(true, Ordering::SeqCst);
        service
    }

    pub fn held() -> Self {
        Self {
            hold: true,
            ..Self::succeeding()
        }
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<(StartupIdea, String)> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnalysisService for MockAnalysisService {
    async fn analyze(&self, idea: &StartupIdea, token: &SessionToken) -> Result<AnalysisReport> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some((idea.clone(), token.as_str().to_string()));
        self.started.notify_one();

        if self.hold {
            self.release.notified().await;
        }

        if self.fail.load(Ordering::SeqCst) {
            return Err(LensError::analysis_request("backend returned 502 Bad Gateway"));
        }
        AnalysisReport::from_value(sample_report())
    }
}
