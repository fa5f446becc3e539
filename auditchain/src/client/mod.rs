//! HTTP client for the compliance API.
//!
//! A single `ApiClient` serves every endpoint. Credentials come from the
//! `ClientConfig` it was built with (or a `Session` attached through
//! `with_session`); nothing is stored in global state.
//!
//! Every call resolves to `ApiResult<T>`: transport failures, non-2xx
//! statuses, unparseable bodies and `success: false` envelopes are all
//! distinct `ApiError` variants.

pub mod auth;
pub mod dashboard;
pub mod retry;
pub mod types;

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use reqwest::header::ACCEPT;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

pub use retry::RetryPolicy;
pub use types::{AnalysisResult, AnalyzeRequest, Envelope, ProjectStats, RemoteVerdict, Session};

/// How a request authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth<'a> {
    None,
    /// `Authorization: Bearer <access_token>`
    Bearer,
    /// `x-api-key`; falls back to the configured key when `None`
    ApiKey(Option<&'a str>),
}

#[derive(Debug, Clone)]
struct RequestSpec<'a> {
    method: Method,
    url: String,
    auth: Auth<'a>,
    query: Vec<(&'static str, String)>,
    body: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url).map_err(|e| {
            ApiError::InvalidArgument(format!("invalid base_url '{}': {}", config.base_url, e))
        })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| ApiError::Transport(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            config,
            base_url,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// A client that authenticates with `session`'s access token.
    pub fn with_session(&self, session: &Session) -> Self {
        let mut next = self.clone();
        next.config.access_token = Some(session.access_token.clone());
        next
    }

    /// `<base_url>/<segment>/...` with every segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        url
    }

    async fn request<T: DeserializeOwned>(&self, spec: RequestSpec<'_>) -> ApiResult<T> {
        // Credentials are checked once, before any network traffic.
        let credential = self.credential(spec.auth)?;
        let label = format!("{} {}", spec.method, spec.url);

        let value = self
            .config
            .retry
            .run(&label, || self.send_once(&spec, credential.as_ref()))
            .await?;

        serde_json::from_value(value).map_err(|e| ApiError::Decode(format!("{}: {}", label, e)))
    }

    fn credential(&self, auth: Auth<'_>) -> ApiResult<Option<(&'static str, String)>> {
        match auth {
            Auth::None => Ok(None),
            Auth::Bearer => {
                let token = self
                    .config
                    .access_token
                    .as_deref()
                    .filter(|t| !t.is_empty())
                    .ok_or(ApiError::MissingCredential("JWT access token"))?;
                Ok(Some(("authorization", format!("Bearer {}", token))))
            }
            Auth::ApiKey(explicit) => {
                let key = explicit
                    .or(self.config.api_key.as_deref())
                    .filter(|k| !k.is_empty())
                    .ok_or(ApiError::MissingCredential("project API key"))?;
                Ok(Some(("x-api-key", key.to_string())))
            }
        }
    }

    async fn send_once(
        &self,
        spec: &RequestSpec<'_>,
        credential: Option<&(&'static str, String)>,
    ) -> ApiResult<Value> {
        debug!("{} {}", spec.method, spec.url);

        let mut builder = self
            .http
            .request(spec.method.clone(), &spec.url)
            .header(ACCEPT, "application/json");
        if let Some((name, value)) = credential {
            builder = builder.header(*name, value.as_str());
        }
        if !spec.query.is_empty() {
            builder = builder.query(&spec.query);
        }
        if let Some(body) = &spec.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        let data: Value = serde_json::from_str(&text)
            .map_err(|_| ApiError::InvalidResponse { status })?;

        let message = || {
            data.get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {}", status))
        };

        if !(200..300).contains(&status) {
            return Err(ApiError::Status {
                status,
                message: message(),
            });
        }
        if data.get("success") == Some(&Value::Bool(false)) {
            return Err(ApiError::Rejected {
                status,
                message: message(),
            });
        }

        debug!("{} {} -> {}", spec.method, spec.url, status);
        Ok(data)
    }
}

pub(crate) fn require(name: &str, value: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        Err(ApiError::InvalidArgument(format!("{} is required", name)))
    } else {
        Ok(())
    }
}
