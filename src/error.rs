//! Structured error handling and exit codes.

use serde::Serialize;

use crate::pipeline::{PipelineError, PipelineSummary};

/// Exit codes for the mediasweep binary.
///
/// - 0: Success (both stages completed, every move succeeded)
/// - 1: General error (unexpected failure, destination not creatable)
/// - 2: Input error (missing root, not a directory, prompt cancelled)
/// - 3: Partial success (completed, but some files could not be moved)
/// - 130: Interrupted by user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: the run completed without per-file failures.
    Success = 0,
    /// General error: an unexpected error occurred.
    GeneralError = 1,
    /// Input error: the root directory was unusable or not supplied.
    InputError = 2,
    /// Partial success: completed but at least one move failed.
    PartialSuccess = 3,
    /// Interrupted: stopped early by Ctrl+C.
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "MS000",
            Self::GeneralError => "MS001",
            Self::InputError => "MS002",
            Self::PartialSuccess => "MS003",
            Self::Interrupted => "MS130",
        }
    }

    /// Exit code for a completed run.
    #[must_use]
    pub fn from_summary(summary: &PipelineSummary) -> Self {
        if summary.interrupted() {
            Self::Interrupted
        } else if summary.has_failures() {
            Self::PartialSuccess
        } else {
            Self::Success
        }
    }

    /// Exit code for a fatal error.
    #[must_use]
    pub fn from_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<PipelineError>() {
            Some(e) if e.is_input_error() => Self::InputError,
            _ => Self::GeneralError,
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "MS001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Whether the operation was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}
