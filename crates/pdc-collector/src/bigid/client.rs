//! HTTP client for the BigID audit-log endpoint

use crate::error::{CollectorError, Result};
use crate::onetrust::client::DEFAULT_HTTP_TIMEOUT_SECS;
use reqwest::{header, Client};
use std::time::Duration;

/// API client for a BigID instance
pub struct BigIdClient {
    client: Client,
    base_url: String,
    token: String,
}

impl BigIdClient {
    /// Create a new client for the given instance
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        let timeout_secs = std::env::var("PDC_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            token: token.to_string(),
        })
    }

    /// Fetch the full audit log as newline-delimited text
    ///
    /// A non-success status here is fatal for the run.
    pub async fn fetch_audit_log(&self) -> Result<String> {
        let url = format!("{}/api/v1/audit-log", self.base_url);

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CollectorError::api(format!(
                "audit-log request returned status {} from {}",
                status, self.base_url
            )));
        }

        Ok(response.text().await?)
    }
}
