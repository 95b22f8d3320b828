//! Duplicate stage implementation.
//!
//! # Overview
//!
//! The stage consumes the files that survived the corruption check:
//! 1. **Fingerprint** every file (a failed read excludes that file)
//! 2. **Group** by fingerprint (see [`crate::duplicates::groups`])
//! 3. **Relocate** every non-keeper member into the duplicates folder
//!
//! A file that cannot be hashed can never be judged a duplicate of anything,
//! even of a file it is byte-identical to.
//!
//! # Example
//!
//! ```no_run
//! use mediasweep::duplicates::{DuplicateConfig, DuplicateStage};
//! use mediasweep::progress::SilentProgress;
//! use mediasweep::scanner::MediaFile;
//! use std::path::Path;
//!
//! let files: Vec<MediaFile> = ["/photos/a.jpg", "/photos/b.jpg"]
//!     .iter()
//!     .filter_map(|p| MediaFile::from_path(Path::new(p)))
//!     .collect();
//!
//! let stage = DuplicateStage::new(DuplicateConfig::new("/photos/duplicates"));
//! let outcome = stage.run(files, &SilentProgress).unwrap();
//! println!("{} duplicate(s) moved", outcome.stats.moved);
//! ```

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::groups::{group_by_fingerprint, DuplicateGroup};
use crate::actions::{ensure_dir, relocate_into, BatchMoveResult};
use crate::pipeline::PipelineError;
use crate::progress::ProgressReporter;
use crate::scanner::{Fingerprint, Hasher, MediaFile};

/// Configuration for the duplicate stage.
#[derive(Debug, Clone)]
pub struct DuplicateConfig {
    /// Folder receiving non-keeper copies. Created on demand.
    pub destination: PathBuf,
}

impl DuplicateConfig {
    /// Create a configuration moving duplicates into `destination`.
    #[must_use]
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
        }
    }
}

/// Statistics from the duplicate stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateStats {
    /// Files handed to the stage
    pub input_files: usize,
    /// Files that produced a fingerprint
    pub hashed: usize,
    /// Files excluded because they could not be read
    pub hash_failures: usize,
    /// Actionable groups found
    pub groups: usize,
    /// Non-keeper members across all groups
    pub duplicates_found: usize,
    /// Duplicates relocated
    pub moved: usize,
    /// Duplicates that could not be relocated
    pub failed: usize,
    /// Bytes relocated
    pub bytes_moved: u64,
    /// Whether the stage stopped early on shutdown
    pub interrupted: bool,
}

/// What happened to one duplicate group.
#[derive(Debug, Clone)]
pub struct GroupOutcome {
    /// Shared fingerprint
    pub fingerprint: Fingerprint,
    /// Member left in place
    pub keeper: PathBuf,
    /// Relocations of the other members
    pub moves: BatchMoveResult,
}

/// Everything the duplicate stage produced.
#[derive(Debug, Clone, Default)]
pub struct DuplicateOutcome {
    /// Summary counts.
    pub stats: DuplicateStats,
    /// Per-group results, ordered by keeper path.
    pub groups: Vec<GroupOutcome>,
}

impl DuplicateOutcome {
    /// True when there was nothing to fingerprint.
    #[must_use]
    pub fn had_no_files(&self) -> bool {
        self.stats.input_files == 0
    }

    /// True when every file was checked and no actionable group exists.
    ///
    /// False after an interrupted fingerprint pass, whose groups are unknown.
    #[must_use]
    pub fn found_no_duplicates(&self) -> bool {
        !self.had_no_files() && !self.stats.interrupted && self.stats.groups == 0
    }
}

/// Groups files by content and relocates all but the keeper of each group.
#[derive(Debug)]
pub struct DuplicateStage {
    config: DuplicateConfig,
    hasher: Hasher,
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl DuplicateStage {
    /// Create a stage with the given configuration.
    #[must_use]
    pub fn new(config: DuplicateConfig) -> Self {
        Self {
            config,
            hasher: Hasher::new(),
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Fingerprint every file, dropping the ones that cannot be read.
    ///
    /// Returns `None` if shutdown was requested part-way.
    fn fingerprint_all(
        &self,
        files: Vec<MediaFile>,
        stats: &mut DuplicateStats,
        progress: &dyn ProgressReporter,
    ) -> Option<Vec<(MediaFile, Fingerprint)>> {
        let total = files.len();
        let mut hashed = Vec::with_capacity(total);

        for (index, file) in files.into_iter().enumerate() {
            if self.is_shutdown_requested() {
                log::info!("Fingerprinting interrupted after {} file(s)", index);
                return None;
            }
            progress.report(index + 1, total, &file.path.display().to_string());

            match self.hasher.fingerprint(&file.path) {
                Some(fingerprint) => {
                    stats.hashed += 1;
                    hashed.push((file, fingerprint));
                }
                None => stats.hash_failures += 1,
            }
        }

        Some(hashed)
    }

    /// Relocate the non-keeper members of one group.
    fn relocate_group(&self, group: &DuplicateGroup) -> GroupOutcome {
        let keeper = group.keeper();
        log::info!(
            "Keeping {} ({} duplicate(s))",
            keeper.path.display(),
            group.duplicates().len()
        );

        let mut moves = BatchMoveResult::default();
        for file in group.duplicates() {
            if self.is_shutdown_requested() {
                break;
            }
            moves.record(
                &file.path,
                relocate_into(&file.path, &self.config.destination),
            );
        }

        GroupOutcome {
            fingerprint: group.fingerprint,
            keeper: keeper.path.clone(),
            moves,
        }
    }

    /// Run the stage over the given files.
    ///
    /// Creates the duplicates folder first. An empty input and an input
    /// without duplicates both complete normally. A shutdown request during
    /// fingerprinting ends the stage before anything is moved; during
    /// relocation it stops after the current file.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::DestinationUnavailable`] if the duplicates
    /// folder cannot be created.
    pub fn run(
        &self,
        files: Vec<MediaFile>,
        progress: &dyn ProgressReporter,
    ) -> Result<DuplicateOutcome, PipelineError> {
        let destination = &self.config.destination;
        ensure_dir(destination).map_err(|source| PipelineError::DestinationUnavailable {
            path: destination.clone(),
            source,
        })?;

        let mut outcome = DuplicateOutcome::default();
        outcome.stats.input_files = files.len();

        if files.is_empty() {
            log::info!("No files to check for duplicates");
            return Ok(outcome);
        }

        let Some(hashed) = self.fingerprint_all(files, &mut outcome.stats, progress) else {
            outcome.stats.interrupted = true;
            return Ok(outcome);
        };

        let (groups, grouping) = group_by_fingerprint(hashed);
        outcome.stats.groups = grouping.duplicate_groups;
        outcome.stats.duplicates_found = grouping.duplicate_files;

        if groups.is_empty() {
            log::info!("No duplicates found");
            return Ok(outcome);
        }

        for group in &groups {
            if self.is_shutdown_requested() {
                outcome.stats.interrupted = true;
                break;
            }
            let result = self.relocate_group(group);
            outcome.stats.moved += result.moves.success_count();
            outcome.stats.failed += result.moves.failure_count();
            outcome.stats.bytes_moved += result.moves.bytes_moved;
            outcome.groups.push(result);
        }
        if self.is_shutdown_requested() {
            outcome.stats.interrupted = true;
        }

        log::info!(
            "Duplicate stage: {} group(s), {} moved, {} failed",
            outcome.stats.groups,
            outcome.stats.moved,
            outcome.stats.failed
        );

        Ok(outcome)
    }
}
