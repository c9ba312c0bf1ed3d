//! BackendClient - REST implementation of the VentureLens backend.
//!
//! One client serves all three remote collaborators of the session core:
//! token acquisition, password verification and the analysis request.
//! Every call is attempted exactly once; there is no retry at this layer.

use async_trait::async_trait;
use lens_core::config::ApiConfig;
use lens_core::{
    AnalysisReport, AnalysisService, LensError, PasswordVerifier, SessionToken, StartupIdea,
    TokenProvider,
};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(alias = "access_token")]
    token: Option<String>,
}

#[derive(Debug, Serialize)]
struct PasswordRequest<'a> {
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct PasswordResponse {
    #[serde(default)]
    status: bool,
}

/// HTTP client for the analysis backend.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    token_url: String,
    password_url: String,
    analyze_url: String,
    timeout: Option<Duration>,
}

impl BackendClient {
    /// Creates a client for the endpoints described by `config`.
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            client: Client::new(),
            token_url: config.endpoint(&config.token_path),
            password_url: config.endpoint(&config.password_path),
            analyze_url: config.endpoint(&config.analyze_path),
            timeout: config.request_timeout_secs.map(Duration::from_secs),
        }
    }

    /// Replaces the underlying reqwest client.
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Bounds every request by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn post(&self, url: &str) -> RequestBuilder {
        let request = self.client.post(url);
        match self.timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        }
    }

    /// Fails with the status and body text on a non-success response.
    async fn ensure_success(response: Response) -> Result<Response, String> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(format!("backend returned {}: {}", status, error_text))
    }
}

#[async_trait]
impl TokenProvider for BackendClient {
    async fn acquire_token(&self) -> lens_core::Result<SessionToken> {
        let response = self
            .post(&self.token_url)
            .send()
            .await
            .map_err(|e| LensError::token_acquisition(format!("request failed: {}", e)))?;

        let response = Self::ensure_success(response)
            .await
            .map_err(LensError::token_acquisition)?;

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| LensError::token_acquisition(format!("invalid response: {}", e)))?;

        match body.token {
            Some(token) if !token.trim().is_empty() => Ok(SessionToken::new(token)),
            _ => Err(LensError::token_acquisition("response carried no token")),
        }
    }
}

#[async_trait]
impl PasswordVerifier for BackendClient {
    async fn verify_password(&self, candidate: &str) -> lens_core::Result<bool> {
        let response = self
            .post(&self.password_url)
            .json(&PasswordRequest {
                password: candidate,
            })
            .send()
            .await
            .map_err(|e| LensError::transport(format!("password check failed: {}", e)))?;

        let response = Self::ensure_success(response)
            .await
            .map_err(LensError::transport)?;

        let body: PasswordResponse = response
            .json()
            .await
            .map_err(|e| LensError::transport(format!("invalid password response: {}", e)))?;

        Ok(body.status)
    }
}

#[async_trait]
impl AnalysisService for BackendClient {
    async fn analyze(
        &self,
        idea: &StartupIdea,
        token: &SessionToken,
    ) -> lens_core::Result<AnalysisReport> {
        let response = self
            .post(&self.analyze_url)
            .bearer_auth(token.as_str())
            .json(idea)
            .send()
            .await
            .map_err(|e| LensError::analysis_request(format!("request failed: {}", e)))?;

        let response = Self::ensure_success(response)
            .await
            .map_err(LensError::analysis_request)?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| LensError::analysis_request(format!("invalid response: {}", e)))?;

        AnalysisReport::from_value(body)
    }
}
