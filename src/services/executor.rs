use std::sync::Arc;
use serde_json::Value;
use tracing::{debug, error, warn};
use url::Url;
use crate::clients::{HttpClient, Transport};
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::utils::{retry_with_backoff, RetryPolicy};

/// Issues one GET per call, retrying timeouts and transient failures within
/// the configured budget, and decodes the body as JSON.
#[derive(Clone)]
pub struct RequestExecutor {
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
    validation: bool,
}

impl RequestExecutor {
    pub fn new(transport: Arc<dyn Transport>, policy: RetryPolicy, validation: bool) -> Self {
        Self {
            transport,
            policy,
            validation,
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let client = HttpClient::new(&settings.api)?;
        Ok(Self::new(
            Arc::new(client),
            RetryPolicy::from(&settings.request),
            settings.validation,
        ))
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn validation(&self) -> bool {
        self.validation
    }

    pub async fn get_json(&self, url: &str) -> Result<Value> {
        if self.validation {
            self.validate(url)?;
        }

        let backoff_ms = u64::try_from(self.policy.backoff.as_millis()).unwrap_or(u64::MAX);

        retry_with_backoff(self.policy.retries, backoff_ms, || self.attempt(url)).await
    }

    /// Same as [`get_json`](Self::get_json) but collapses every failure to `None`.
    pub async fn try_get_json(&self, url: &str) -> Option<Value> {
        match self.get_json(url).await {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(error = %e, url = url, "Discarding failed request");
                None
            }
        }
    }

    async fn attempt(&self, url: &str) -> Result<Value> {
        let response = tokio::time::timeout(self.policy.timeout, self.transport.get(url))
            .await
            .map_err(|_| Error::Timeout {
                url: url.to_string(),
                timeout: self.policy.timeout,
            })??;

        debug!(
            status = response.status.as_u16(),
            url = url,
            "API response received"
        );

        if !response.status.is_success() {
            return Err(Error::Status {
                status: response.status,
                url: url.to_string(),
            });
        }

        if response.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&response.body).map_err(|e| {
            let body_str = String::from_utf8_lossy(&response.body);
            error!(
                error = %e,
                body = %body_str,
                "Invalid JSON response"
            );
            Error::from(e)
        })
    }

    fn validate(&self, url: &str) -> Result<()> {
        let parsed = Url::parse(url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::validation(format!(
                "url '{}' must use http or https",
                url
            )));
        }
        if self.policy.timeout.is_zero() {
            return Err(Error::validation("timeout must be greater than zero"));
        }
        Ok(())
    }
}
