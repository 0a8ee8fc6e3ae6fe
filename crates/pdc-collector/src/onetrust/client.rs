//! HTTP client for the OneTrust Assessments API

use crate::config::ArchivalState;
use crate::error::{CollectorError, Result};
use reqwest::{header, Client};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Default timeout for API requests in seconds.
/// Can be overridden via PDC_HTTP_TIMEOUT_SECS environment variable.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

/// One page of the assessments list endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct AssessmentPage {
    /// Assessment summaries, emitted verbatim
    #[serde(default)]
    pub content: Vec<Value>,

    /// Pagination metadata; absent on some tenant versions
    #[serde(default)]
    pub page: Option<PageInfo>,
}

/// Pagination metadata of the assessments list endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub total_pages: u32,

    #[serde(default)]
    pub total_elements: Option<u64>,

    #[serde(default)]
    pub number: Option<u32>,
}

/// API client for a OneTrust tenant
pub struct OneTrustClient {
    client: Client,
    base_url: String,
    token: String,
}

impl OneTrustClient {
    /// Create a new client for the given tenant
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

    /// Fetch one page of assessment summaries
    ///
    /// A non-success status here is fatal for the run.
    pub async fn list_assessments(
        &self,
        state: ArchivalState,
        size: u32,
        page: u32,
    ) -> Result<AssessmentPage> {
        let url = format!(
            "{}/api/assessment/v2/assessments?assessmentArchivalState={}&size={}&page={}",
            self.base_url,
            state.as_query_value(),
            size,
            page
        );

        let response = self.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CollectorError::api(format!(
                "assessment list page {} returned status {} from {}",
                page, status, self.base_url
            )));
        }

        Ok(response.json().await?)
    }

    /// Fetch the export document for one assessment
    ///
    /// Callers treat a failure here as skippable.
    pub async fn export_assessment(&self, assessment_id: &str) -> Result<Value> {
        let url = format!(
            "{}/api/assessment/v2/assessments/{}/export?excludeSkippedQuestions=false",
            self.base_url, assessment_id
        );

        let response = self.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CollectorError::api(format!(
                "export of assessment {} returned status {}",
                assessment_id, status
            )));
        }

        Ok(response.json().await?)
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .header(header::CONTENT_TYPE, "application/json")
            .bearer_auth(&self.token)
    }
}
