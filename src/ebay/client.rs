use crate::ebay::request::HttpRequestSpec;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EbaySearchError {
    #[error("search request failed: {0}")]
    Request(String),
    #[error("search endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid search response: {0}")]
    InvalidJson(String),
}

/// Executes built Browse API requests. One attempt per call.
#[derive(Clone)]
pub struct UpstreamSearchClient {
    http: Client,
}

impl UpstreamSearchClient {
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    pub async fn execute(&self, spec: &HttpRequestSpec) -> Result<Value, EbaySearchError> {
        let mut request = self.http.request(spec.method.clone(), spec.url.as_str());
        for (name, value) in &spec.headers {
            request = request.header(*name, value);
        }
        if let Some(body) = &spec.body {
            request = request.body(body.to_string());
        }

        let response = request
            .send()
            .await
            .map_err(|err| EbaySearchError::Request(err.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| EbaySearchError::Request(err.to_string()))?;

        if !status.is_success() {
            return Err(EbaySearchError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|err| EbaySearchError::InvalidJson(err.to_string()))
    }
}
