//! Corruption detection module.
//!
//! This module provides the first pipeline stage:
//! - Enumerate supported media files under the root
//! - Validate each one against its declared kind
//! - Relocate invalid files into the corrupted folder
//! - Hand the surviving files to the duplicate stage
//!
//! A file that fails validation but cannot be moved is reported as a failure
//! and is NOT a survivor: it stays in place, and it never takes part in
//! duplicate grouping.

pub mod stage;

use std::path::PathBuf;

use crate::actions::{BatchMoveResult, MoveResult};
use crate::scanner::{MediaFile, WalkerConfig};
use crate::validation::{InvalidReason, ValidationDepth};

pub use stage::CorruptionStage;

/// Configuration for the corruption stage.
#[derive(Debug, Clone)]
pub struct CorruptionConfig {
    /// Folder receiving invalid files. Created on demand.
    pub destination: PathBuf,
    /// How deeply images are checked.
    pub depth: ValidationDepth,
    /// Walk options, including excluded destination folders.
    pub walker: WalkerConfig,
}

impl CorruptionConfig {
    /// Create a configuration moving invalid files into `destination`.
    #[must_use]
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
            depth: ValidationDepth::default(),
            walker: WalkerConfig::default(),
        }
    }

    /// Set the validation depth.
    #[must_use]
    pub fn with_depth(mut self, depth: ValidationDepth) -> Self {
        self.depth = depth;
        self
    }

    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, walker: WalkerConfig) -> Self {
        self.walker = walker;
        self
    }
}

/// An invalid file and where it ended up.
#[derive(Debug, Clone)]
pub struct QuarantinedFile {
    /// Completed relocation.
    pub moved: MoveResult,
    /// Why the file failed validation.
    pub reason: InvalidReason,
}

/// Statistics from the corruption stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorruptionStats {
    /// Files that were validated
    pub examined: usize,
    /// Files that passed validation
    pub valid: usize,
    /// Files that failed validation
    pub invalid: usize,
    /// Invalid files relocated to the corrupted folder
    pub moved: usize,
    /// Invalid files that could not be relocated
    pub failed: usize,
    /// Bytes relocated
    pub bytes_moved: u64,
    /// Walk errors (unreadable directories, symlink loops)
    pub scan_errors: usize,
    /// Whether the stage stopped early on shutdown
    pub interrupted: bool,
}

/// Everything the corruption stage produced.
#[derive(Debug, Clone, Default)]
pub struct CorruptionOutcome {
    /// Summary counts.
    pub stats: CorruptionStats,
    /// Invalid files that were relocated, with their reasons.
    pub quarantined: Vec<QuarantinedFile>,
    /// Relocation accounting, including failures.
    pub moves: BatchMoveResult,
    /// Files that passed validation, in walk order.
    pub survivors: Vec<MediaFile>,
}
