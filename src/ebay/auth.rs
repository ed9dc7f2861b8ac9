use crate::ebay::config::Credentials;
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use reqwest::{Client, header};
use serde::Deserialize;
use std::fmt;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum EbayAuthError {
    #[error("missing ebay app credentials in env")]
    MissingCredentials,
    #[error("oauth request failed: {0}")]
    Request(String),
    #[error("oauth endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid oauth response: {0}")]
    InvalidResponse(String),
}

/// Bearer token presented to the Browse API. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Client-credentials token exchange. Every call hits the OAuth endpoint.
#[derive(Clone)]
pub struct TokenProvider {
    http: Client,
    token_url: String,
    scope: String,
}

impl TokenProvider {
    pub fn new(http: Client, token_url: impl Into<String>, scope: impl Into<String>) -> Self {
        Self {
            http,
            token_url: token_url.into(),
            scope: scope.into(),
        }
    }

    pub async fn acquire_token(
        &self,
        credentials: &Credentials,
    ) -> Result<AccessToken, EbayAuthError> {
        let authorization = basic_auth_header(credentials)?;
        let body = [
            ("grant_type", "client_credentials"),
            ("scope", self.scope.as_str()),
        ];
        let response = self
            .http
            .post(self.token_url.as_str())
            .header(header::AUTHORIZATION, authorization)
            .form(&body)
            .send()
            .await
            .map_err(|err| EbayAuthError::Request(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EbayAuthError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: TokenResponse = response
            .json()
            .await
            .map_err(|err| EbayAuthError::InvalidResponse(err.to_string()))?;
        let token = payload
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| EbayAuthError::InvalidResponse("missing access_token".into()))?;
        debug!(
            target = "sanbi.ebay",
            expires_in = payload.expires_in,
            "application token acquired"
        );
        Ok(AccessToken::new(token))
    }
}

fn basic_auth_header(credentials: &Credentials) -> Result<String, EbayAuthError> {
    if !credentials.is_complete() {
        return Err(EbayAuthError::MissingCredentials);
    }
    let raw = format!("{}:{}", credentials.client_id, credentials.client_secret);
    Ok(format!("Basic {}", BASE64.encode(raw)))
}
