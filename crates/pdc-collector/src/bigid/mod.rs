//! BigID audit-log source
//!
//! Tails the append-only audit log with opportunistic checkpointing:
//! each run fetches the full log text, resumes after the last line whose
//! digest matches the stored checkpoint, emits the remainder, and
//! records the digest of the last emitted line.

pub mod checkpoint;
pub mod client;

use crate::config::BigIdConfig;
use crate::error::Result;
use crate::secrets::{self, SecretStore};
use crate::sink::{self, Event, EventSink};
use checkpoint::{resume_index, CheckpointFile};
use client::BigIdClient;
use pdc_common::hash::line_digest;
use serde_json::Value;
use tracing::info;

pub const SOURCETYPE_AUDIT: &str = "bigid:audit";

/// Run one BigID audit-log collection pass
pub async fn run(
    config: &BigIdConfig,
    store: &mut dyn SecretStore,
    sink: &mut dyn EventSink,
) -> Result<()> {
    let token = secrets::resolve_token(store, &config.base_url, &config.api_token)?;
    let source = config.source_host()?;
    let host = sink::collector_host();
    let client = BigIdClient::new(&config.base_url, &token)?;

    let body = client.fetch_audit_log().await?;
    let lines: Vec<&str> = body.lines().filter(|line| !line.trim().is_empty()).collect();

    let cp = CheckpointFile::new(&config.state_dir);
    let stored = cp.load()?;
    let start = resume_index(&lines, stored.as_deref());

    if stored.is_some() && start == 0 && !lines.is_empty() {
        info!("checkpoint not found in fetched log; treating entire log as new");
    }

    let mut emitted = 0usize;
    for line in &lines[start..] {
        sink.emit(Event::new(
            SOURCETYPE_AUDIT,
            &source,
            &host,
            Value::String((*line).to_string()),
        ))?;
        emitted += 1;
    }

    if emitted > 0 {
        // lines[start..] is never empty here, so last() is the last
        // emitted line
        if let Some(last) = lines.last() {
            cp.record(&line_digest(last))?;
        }
    }

    info!(
        total = lines.len(),
        emitted,
        resumed_at = start,
        "audit log pass complete"
    );

    Ok(())
}
