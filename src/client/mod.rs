//! HTTP client for the fund-platform backend.
//!
//! Every endpoint answers with a `{ status, data, message }` envelope:
//! `status: true` means `data` carries the payload, `status: false` is a
//! backend-reported failure whose `message` is shown to the operator.
//! Reads send query-string parameters, mutations send form-urlencoded
//! bodies, and authenticated calls carry a bearer token.

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Failures a backend call can surface.
///
/// All three collapse to one display string at the edge; the variants
/// exist so callers can tell "log in first" apart from everything else.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not logged in: no auth token (run `fundesk login` or pass --token)")]
    MissingToken,

    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// `status: false` from the backend, carrying its `message`.
    #[error("{0}")]
    Backend(String),
}

/// The response envelope every endpoint wraps its payload in.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub status: bool,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub message: Option<String>,
}

/// One backend connection: base URL, shared `reqwest::Client`, optional
/// token. Cheap to construct per CLI invocation.
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(timeout).build()?;
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(Self {
            http,
            base_url,
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn token(&self) -> Result<&str, ApiError> {
        self.token.as_deref().ok_or(ApiError::MissingToken)
    }

    /// Authenticated GET with query-string parameters.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let token = self.token()?;
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "GET");
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;
        Self::unwrap_envelope(response).await
    }

    /// Authenticated mutation with a form-urlencoded body.
    pub async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let token = self.token()?;
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "POST");
        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .form(form)
            .send()
            .await?;
        Self::unwrap_envelope(response).await
    }

    /// Mutation where the caller only cares that the backend accepted it.
    pub async fn post_ack(&self, path: &str, form: &[(&str, String)]) -> Result<(), ApiError> {
        let _: Value = self.post_form(path, form).await?;
        Ok(())
    }

    /// Unauthenticated POST, used by login before a token exists.
    pub async fn post_form_public<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "POST (public)");
        let response = self.http.post(&url).form(form).send().await?;
        Self::unwrap_envelope(response).await
    }

    /// Read the envelope, surface `status: false` as a backend error, and
    /// decode `data` into the caller's shape.
    async fn unwrap_envelope<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let http_status = response.status();
        let body = response.bytes().await?;

        let envelope: Envelope = match serde_json::from_slice(&body) {
            Ok(envelope) => envelope,
            // Proxies and crashes answer with non-envelope bodies; fall
            // back to the HTTP status for those.
            Err(_) if !http_status.is_success() => {
                return Err(ApiError::Backend(describe_http_status(http_status)));
            }
            Err(e) => return Err(ApiError::Decode(e)),
        };

        if !envelope.status {
            let message = envelope
                .message
                .unwrap_or_else(|| describe_http_status(http_status));
            tracing::debug!(%message, "backend reported failure");
            return Err(ApiError::Backend(message));
        }

        Ok(serde_json::from_value(envelope.data)?)
    }
}

fn describe_http_status(status: StatusCode) -> String {
    match status {
        StatusCode::UNAUTHORIZED => "authentication required or token expired".to_string(),
        StatusCode::FORBIDDEN => "access denied by the backend".to_string(),
        _ => format!("server returned {}", status),
    }
}
