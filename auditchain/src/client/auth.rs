//! Session endpoints (`<base>/auth`).

use super::types::Session;
use super::{require, ApiClient, Auth, RequestSpec};
use crate::error::{ApiError, ApiResult};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::info;

/// Tokens may sit at the top level or under `data`.
fn session_from_value(raw: &Value) -> ApiResult<Session> {
    let candidate = if raw.get("accessToken").is_some() {
        raw
    } else {
        raw.get("data").unwrap_or(raw)
    };
    serde_json::from_value(candidate.clone())
        .map_err(|e| ApiError::Decode(format!("no session tokens in response: {}", e)))
}

impl ApiClient {
    fn auth_spec<'a>(&self, path: &str, auth: Auth<'a>, body: Option<Value>) -> RequestSpec<'a> {
        RequestSpec {
            method: if body.is_some() { Method::POST } else { Method::GET },
            url: self.endpoint(&["auth", path]),
            auth,
            query: Vec::new(),
            body,
        }
    }

    /// `POST /auth/login`
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<Session> {
        require("username", username)?;
        require("password", password)?;

        let raw: Value = self
            .request(self.auth_spec(
                "login",
                Auth::None,
                Some(json!({ "username": username, "password": password })),
            ))
            .await?;

        let mut session = session_from_value(&raw)?;
        if session.username.is_none() {
            session.username = Some(username.to_string());
        }
        info!("signed in as {}", username);
        Ok(session)
    }

    /// `POST /auth/refresh-token`
    pub async fn refresh_session(&self, session: &Session) -> ApiResult<Session> {
        let refresh_token = session
            .refresh_token
            .as_deref()
            .ok_or(ApiError::MissingCredential("refresh token"))?;

        let raw: Value = self
            .request(self.auth_spec(
                "refresh-token",
                Auth::None,
                Some(json!({ "refreshToken": refresh_token })),
            ))
            .await?;

        let mut next = session_from_value(&raw)?;
        if next.refresh_token.is_none() {
            next.refresh_token = session.refresh_token.clone();
        }
        if next.username.is_none() {
            next.username = session.username.clone();
        }
        Ok(next)
    }

    /// `GET /auth/verify`: whether the configured JWT is still accepted.
    pub async fn verify_session(&self) -> ApiResult<bool> {
        match self
            .request::<Value>(self.auth_spec("verify", Auth::Bearer, None))
            .await
        {
            Ok(_) => Ok(true),
            Err(ApiError::Status { status: 401, .. }) | Err(ApiError::Status { status: 403, .. }) => {
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}
