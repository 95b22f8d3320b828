//! JSON report for a pipeline run.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "root": "/photos",
//!   "corruption": {
//!     "examined": 3, "invalid": 1, "moved": 1, "failed": 0,
//!     "bytes_moved": 512, "interrupted": false,
//!     "moves": [{ "from": "/photos/c.png", "to": "/photos/corrupted/c.png",
//!                 "reason": "malformed image: ..." }],
//!     "failures": []
//!   },
//!   "duplicates": {
//!     "input_files": 2, "hashed": 2, "hash_failures": 0, "groups": 1,
//!     "moved": 1, "failed": 0, "bytes_moved": 2048, "skipped": false,
//!     "interrupted": false,
//!     "groups_detail": [{ "fingerprint": "af13...", "keeper": "/photos/a.jpg",
//!                         "moves": [{ "from": "/photos/b.jpg",
//!                                     "to": "/photos/duplicates/b.jpg" }],
//!                         "failures": [] }]
//!   },
//!   "duration_ms": 42,
//!   "exit_code": 0,
//!   "exit_code_name": "MS000"
//! }
//! ```

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::actions::{BatchMoveResult, MoveResult};
use crate::duplicates::GroupOutcome;
use crate::error::ExitCode;
use crate::pipeline::PipelineSummary;

/// A completed relocation.
#[derive(Debug, Clone, Serialize)]
pub struct JsonMove {
    /// Original location
    pub from: String,
    /// New location
    pub to: String,
    /// Why the file was invalid (corruption stage only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl JsonMove {
    fn from_result(result: &MoveResult, reason: Option<String>) -> Self {
        Self {
            from: path_string(&result.from),
            to: path_string(&result.to),
            reason,
        }
    }
}

/// A relocation that failed; the file stayed in place.
#[derive(Debug, Clone, Serialize)]
pub struct JsonFailure {
    /// File that could not be moved
    pub path: String,
    /// Underlying cause
    pub error: String,
}

fn failures(batch: &BatchMoveResult) -> Vec<JsonFailure> {
    batch
        .failures
        .iter()
        .map(|(path, error)| JsonFailure {
            path: path_string(path),
            error: error.clone(),
        })
        .collect()
}

/// Corruption stage section.
#[derive(Debug, Clone, Serialize)]
pub struct JsonCorruption {
    pub examined: usize,
    pub invalid: usize,
    pub moved: usize,
    pub failed: usize,
    pub bytes_moved: u64,
    pub scan_errors: usize,
    pub interrupted: bool,
    pub moves: Vec<JsonMove>,
    pub failures: Vec<JsonFailure>,
}

/// One duplicate group.
#[derive(Debug, Clone, Serialize)]
pub struct JsonGroup {
    /// BLAKE3 fingerprint as hexadecimal string (64 characters)
    pub fingerprint: String,
    /// Member left in place
    pub keeper: String,
    pub moves: Vec<JsonMove>,
    pub failures: Vec<JsonFailure>,
}

impl JsonGroup {
    fn from_outcome(group: &GroupOutcome) -> Self {
        Self {
            fingerprint: group.fingerprint.to_hex(),
            keeper: path_string(&group.keeper),
            moves: group
                .moves
                .successes
                .iter()
                .map(|m| JsonMove::from_result(m, None))
                .collect(),
            failures: failures(&group.moves),
        }
    }
}

/// Duplicate stage section.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicates {
    pub input_files: usize,
    pub hashed: usize,
    pub hash_failures: usize,
    pub groups: usize,
    pub moved: usize,
    pub failed: usize,
    pub bytes_moved: u64,
    /// Stage did not run because the first stage was interrupted
    pub skipped: bool,
    pub interrupted: bool,
    pub groups_detail: Vec<JsonGroup>,
}

/// Complete JSON report.
#[derive(Debug, Clone, Serialize)]
pub struct JsonReport {
    pub root: String,
    pub corruption: JsonCorruption,
    pub duplicates: JsonDuplicates,
    pub duration_ms: u64,
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "MS000")
    pub exit_code_name: String,
}

impl JsonReport {
    /// Build a report from a run summary and its exit code.
    #[must_use]
    pub fn new(summary: &PipelineSummary, exit_code: ExitCode) -> Self {
        let c = &summary.corruption;
        let d = &summary.duplicates;

        Self {
            root: path_string(&summary.root),
            corruption: JsonCorruption {
                examined: c.stats.examined,
                invalid: c.stats.invalid,
                moved: c.stats.moved,
                failed: c.stats.failed,
                bytes_moved: c.stats.bytes_moved,
                scan_errors: c.stats.scan_errors,
                interrupted: c.stats.interrupted,
                moves: c
                    .quarantined
                    .iter()
                    .map(|q| JsonMove::from_result(&q.moved, Some(q.reason.to_string())))
                    .collect(),
                failures: failures(&c.moves),
            },
            duplicates: JsonDuplicates {
                input_files: d.stats.input_files,
                hashed: d.stats.hashed,
                hash_failures: d.stats.hash_failures,
                groups: d.stats.groups,
                moved: d.stats.moved,
                failed: d.stats.failed,
                bytes_moved: d.stats.bytes_moved,
                skipped: summary.duplicates_skipped,
                interrupted: d.stats.interrupted,
                groups_detail: d.groups.iter().map(JsonGroup::from_outcome).collect(),
            },
            duration_ms: summary.duration.as_millis() as u64,
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        }
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the report to a writer, followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), JsonOutputError> {
        let json = self.to_json_pretty()?;
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
