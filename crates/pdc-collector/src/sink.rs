//! Event envelope and sink boundary
//!
//! Every record leaves the collector wrapped in an envelope carrying its
//! sourcetype label, the upstream host it came from, the collector host,
//! and an emission timestamp. The production sink writes one JSON object
//! per line to stdout, which the host platform tails; a memory sink
//! backs tests through the same code paths.

use crate::error::Result;
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::io::Write;

/// A single emitted record
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    /// Record-kind label, e.g. `onetrust:assessment:summary`
    pub sourcetype: String,

    /// Hostname of the upstream system the record came from
    pub source: String,

    /// Hostname of the collector
    pub host: String,

    /// Emission timestamp, RFC 3339
    pub time: String,

    /// The record itself
    pub event: Value,
}

impl Event {
    /// Wrap a record in an envelope, stamping the emission time
    pub fn new(sourcetype: &str, source: &str, host: &str, event: Value) -> Self {
        Self {
            sourcetype: sourcetype.to_string(),
            source: source.to_string(),
            host: host.to_string(),
            time: Utc::now().to_rfc3339(),
            event,
        }
    }
}

/// Destination for emitted events
pub trait EventSink {
    /// Emit one event; a failure here is fatal for the run
    fn emit(&mut self, event: Event) -> Result<()>;
}

/// Production sink: one JSON object per line on stdout
#[derive(Debug, Default)]
pub struct StdoutSink;

impl StdoutSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for StdoutSink {
    fn emit(&mut self, event: Event) -> Result<()> {
        let line = serde_json::to_string(&event)?;
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(line.as_bytes())?;
        handle.write_all(b"\n")?;
        Ok(())
    }
}

/// In-memory sink for tests
#[derive(Debug, Default)]
pub struct MemorySink {
    pub events: Vec<Event>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events with the given sourcetype label
    pub fn with_sourcetype(&self, sourcetype: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.sourcetype == sourcetype)
            .collect()
    }
}

impl EventSink for MemorySink {
    fn emit(&mut self, event: Event) -> Result<()> {
        self.events.push(event);
        Ok(())
    }
}

/// Hostname of the machine running the collector
pub fn collector_host() -> String {
    hostname::get()
        .map(|h| h.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "unknown".to_string())
}
