use async_trait::async_trait;
use http::StatusCode;
use crate::error::Result;

/// Status and undecoded body of one GET.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn ok_json(value: &serde_json::Value) -> Self {
        Self::new(StatusCode::OK, value.to_string())
    }
}

/// The network seam under the request executor.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<RawResponse>;
}
