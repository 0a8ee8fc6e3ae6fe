//! Audit-log checkpointing
//!
//! The checkpoint is the SHA-256 digest of the last emitted log line,
//! appended to a flat file (one digest per line, last line wins).
//! Resumption scans the fetched log for the checkpointed line and
//! restarts emission after it; at-most-once re-indexing holds as long as
//! log lines are unique and the tail is not rotated between runs.

use crate::error::Result;
use pdc_common::hash::line_digest;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Checkpoint file name within the state directory
pub const CHECKPOINT_FILE_NAME: &str = "bigid.checkpoint";

/// Size bound above which the checkpoint file is rewritten to hold only
/// the latest digest
pub const MAX_CHECKPOINT_BYTES: u64 = 64 * 1024;

/// Flat-file checkpoint storage
pub struct CheckpointFile {
    path: PathBuf,
}

impl CheckpointFile {
    /// Checkpoint file inside the given state directory
    pub fn new(state_dir: &Path) -> Self {
        Self {
            path: state_dir.join(CHECKPOINT_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the current checkpoint digest (last non-empty line), if any
    pub fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(&self.path)?;
        Ok(raw
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .map(str::to_string))
    }

    /// Append a new checkpoint digest, rewriting the file down to the
    /// latest digest once it exceeds [`MAX_CHECKPOINT_BYTES`]
    pub fn record(&self, digest: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", digest)?;
        drop(file);

        let size = std::fs::metadata(&self.path)?.len();
        if size > MAX_CHECKPOINT_BYTES {
            debug!(size, "checkpoint file over size bound; rewriting");
            std::fs::write(&self.path, format!("{}\n", digest))?;
        }

        Ok(())
    }
}

/// Index of the first line to emit, given the fetched log lines and the
/// stored checkpoint digest
///
/// The last matching line wins when duplicates make several matches
/// possible; no match (or no checkpoint) means the entire log is new.
pub fn resume_index(lines: &[&str], checkpoint: Option<&str>) -> usize {
    let Some(checkpoint) = checkpoint else {
        return 0;
    };

    let mut resume = 0;
    for (idx, line) in lines.iter().enumerate() {
        if line_digest(line) == checkpoint {
            resume = idx + 1;
        }
    }
    resume
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resume_after_matching_line() {
        let lines = vec!["alpha", "beta", "gamma", "delta"];
        let checkpoint = line_digest("beta");
        assert_eq!(resume_index(&lines, Some(&checkpoint)), 2);
    }

    #[test]
    fn test_resume_at_end_when_last_line_matches() {
        let lines = vec!["alpha", "beta"];
        let checkpoint = line_digest("beta");
        assert_eq!(resume_index(&lines, Some(&checkpoint)), 2);
    }

    #[test]
    fn test_no_match_emits_entire_log() {
        let lines = vec!["alpha", "beta"];
        let checkpoint = line_digest("not in the log");
        assert_eq!(resume_index(&lines, Some(&checkpoint)), 0);
    }

    #[test]
    fn test_no_checkpoint_emits_entire_log() {
        let lines = vec!["alpha", "beta"];
        assert_eq!(resume_index(&lines, None), 0);
    }

    #[test]
    fn test_duplicate_lines_resume_from_last_match() {
        let lines = vec!["dup", "other", "dup", "tail"];
        let checkpoint = line_digest("dup");
        assert_eq!(resume_index(&lines, Some(&checkpoint)), 3);
    }

    #[test]
    fn test_record_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let cp = CheckpointFile::new(dir.path());

        assert_eq!(cp.load().unwrap(), None);

        cp.record(&line_digest("first")).unwrap();
        cp.record(&line_digest("second")).unwrap();

        // Last line wins
        assert_eq!(cp.load().unwrap(), Some(line_digest("second")));
    }

    #[test]
    fn test_record_rewrites_over_size_bound() {
        let dir = TempDir::new().unwrap();
        let cp = CheckpointFile::new(dir.path());

        // 65-byte lines; enough appends to cross the bound
        let appends = (MAX_CHECKPOINT_BYTES / 65) + 2;
        for i in 0..appends {
            cp.record(&line_digest(&format!("line {}", i))).unwrap();
        }

        let size = std::fs::metadata(cp.path()).unwrap().len();
        assert!(size <= MAX_CHECKPOINT_BYTES);

        // The latest digest survives the rewrite
        assert_eq!(
            cp.load().unwrap(),
            Some(line_digest(&format!("line {}", appends - 1)))
        );
    }
}
