//! Run configuration for the collector
//!
//! One config struct per source. Values come from CLI flags with
//! environment-variable fallbacks (see `main.rs`). Validation is by
//! presence only; an unreachable URL or expired token surfaces as an
//! HTTP error at run time.

use crate::error::{CollectorError, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// Default page size for the assessment list endpoint
pub const DEFAULT_PAGE_SIZE: u32 = 2000;

/// Default directory for collector state (secret store, checkpoints)
pub const DEFAULT_STATE_DIR: &str = "./state";

/// Upstream filter distinguishing active vs. archived assessments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum ArchivalState {
    #[default]
    All,
    Active,
    Archived,
}

impl ArchivalState {
    /// Query-string value expected by the assessments endpoint
    pub fn as_query_value(self) -> &'static str {
        match self {
            ArchivalState::All => "ALL",
            ArchivalState::Active => "ACTIVE",
            ArchivalState::Archived => "ARCHIVED",
        }
    }
}

impl std::fmt::Display for ArchivalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArchivalState::All => write!(f, "all"),
            ArchivalState::Active => write!(f, "active"),
            ArchivalState::Archived => write!(f, "archived"),
        }
    }
}

/// Configuration for a OneTrust assessments run
#[derive(Debug, Clone)]
pub struct OneTrustConfig {
    /// Tenant base URL, e.g. https://customer.my.onetrust.com
    pub base_url: String,

    /// Bearer token, or the mask sentinel once sealed
    pub api_token: String,

    /// Archival-state filter for the list endpoint
    pub archival_state: ArchivalState,

    /// Page size for the list endpoint
    pub page_size: u32,

    /// Cap collection to page 0 and skip detail/Q&A stages
    pub test_mode: bool,

    /// Directory holding the secret store
    pub state_dir: PathBuf,
}

impl OneTrustConfig {
    /// Validate presence of required values and normalize the base URL
    pub fn validated(mut self) -> Result<Self> {
        self.base_url = normalize_base_url(&self.base_url)?;
        if self.api_token.trim().is_empty() {
            return Err(CollectorError::config("api_token must not be empty"));
        }
        Ok(self)
    }

    /// Hostname of the upstream tenant, for event enrichment
    pub fn source_host(&self) -> Result<String> {
        source_host(&self.base_url)
    }
}

/// Configuration for a BigID audit-log run
#[derive(Debug, Clone)]
pub struct BigIdConfig {
    /// BigID base URL
    pub base_url: String,

    /// Bearer token, or the mask sentinel once sealed
    pub api_token: String,

    /// Directory holding the secret store and the checkpoint file
    pub state_dir: PathBuf,
}

impl BigIdConfig {
    /// Validate presence of required values and normalize the base URL
    pub fn validated(mut self) -> Result<Self> {
        self.base_url = normalize_base_url(&self.base_url)?;
        if self.api_token.trim().is_empty() {
            return Err(CollectorError::config("api_token must not be empty"));
        }
        Ok(self)
    }

    /// Hostname of the upstream instance, for event enrichment
    pub fn source_host(&self) -> Result<String> {
        source_host(&self.base_url)
    }
}

/// Trim trailing slashes and reject empty or unparseable base URLs
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(CollectorError::config("base_url must not be empty"));
    }
    // Parse once to fail fast on junk; the trimmed string is what gets used
    Url::parse(trimmed)?;
    Ok(trimmed.to_string())
}

/// Extract the host component of a base URL
pub fn source_host(base_url: &str) -> Result<String> {
    let url = Url::parse(base_url)?;
    url.host_str()
        .map(str::to_string)
        .ok_or_else(|| CollectorError::config(format!("base_url has no host: {}", base_url)))
}
