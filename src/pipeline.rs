//! Two-stage pipeline orchestration.
//!
//! # Overview
//!
//! [`Pipeline::run`] sequences the stages over one root directory:
//! 1. **Corruption stage** validates every supported file and relocates the
//!    invalid ones into the corrupted folder
//! 2. **Duplicate stage** fingerprints the survivors and relocates every
//!    non-keeper copy into the duplicates folder
//!
//! The only fatal errors are an unusable root or an uncreatable destination
//! folder; everything that goes wrong with an individual file is recorded in
//! the [`PipelineSummary`] instead.
//!
//! # Example
//!
//! ```no_run
//! use mediasweep::pipeline::{Pipeline, PipelineConfig};
//! use mediasweep::progress::SilentProgress;
//! use std::path::Path;
//!
//! let root = Path::new("/photos");
//! let pipeline = Pipeline::new(PipelineConfig::for_root(root));
//! let summary = pipeline.run(root, &SilentProgress).unwrap();
//! println!(
//!     "{} corrupted, {} duplicates moved",
//!     summary.corruption.stats.moved,
//!     summary.duplicates.stats.moved
//! );
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::corruption::{CorruptionConfig, CorruptionOutcome, CorruptionStage};
use crate::duplicates::{DuplicateConfig, DuplicateOutcome, DuplicateStage};
use crate::progress::ProgressReporter;
use crate::scanner::WalkerConfig;
use crate::validation::ValidationDepth;

/// Default name of the folder receiving invalid files.
pub const CORRUPTED_DIR_NAME: &str = "corrupted";
/// Default name of the folder receiving duplicate copies.
pub const DUPLICATES_DIR_NAME: &str = "duplicates";

/// Errors that abort a run.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// The provided root does not exist.
    #[error("Path not found: {0}")]
    RootNotFound(PathBuf),

    /// The provided root is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// No root was supplied (prompt cancelled or left empty).
    #[error("No directory selected")]
    NoRootSelected,

    /// The corrupted and duplicates folders resolve to the same place.
    #[error("Corrupted and duplicates folders must differ: {0}")]
    SameDestination(PathBuf),

    /// A destination folder is the root itself or one of its ancestors.
    #[error("Destination folder must not be the root or contain it: {0}")]
    DestinationContainsRoot(PathBuf),

    /// A destination folder could not be created.
    #[error("Cannot create destination folder {path}: {source}")]
    DestinationUnavailable {
        /// Folder that could not be created
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// Whether the error is about the user's input rather than the system.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::RootNotFound(_) | Self::NotADirectory(_) | Self::NoRootSelected
        )
    }
}

/// Configuration for a full run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Folder receiving invalid files
    pub corrupted_dir: PathBuf,
    /// Folder receiving duplicate copies
    pub duplicates_dir: PathBuf,
    /// How deeply images are checked
    pub depth: ValidationDepth,
    /// Follow symbolic links during the walk
    pub follow_symlinks: bool,
    /// Skip hidden files and directories
    pub skip_hidden: bool,
}

impl PipelineConfig {
    /// Default configuration: both folders directly under `root`.
    #[must_use]
    pub fn for_root(root: &Path) -> Self {
        Self {
            corrupted_dir: root.join(CORRUPTED_DIR_NAME),
            duplicates_dir: root.join(DUPLICATES_DIR_NAME),
            depth: ValidationDepth::default(),
            follow_symlinks: false,
            skip_hidden: false,
        }
    }

    /// Set the validation depth.
    #[must_use]
    pub fn with_depth(mut self, depth: ValidationDepth) -> Self {
        self.depth = depth;
        self
    }

    /// Walker configuration that never descends into either destination.
    #[must_use]
    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig::new(
            self.follow_symlinks,
            self.skip_hidden,
            vec![self.corrupted_dir.clone(), self.duplicates_dir.clone()],
        )
    }
}

/// Aggregate result of a run.
#[derive(Debug, Clone, Default)]
pub struct PipelineSummary {
    /// Root that was processed
    pub root: PathBuf,
    /// Corruption stage result
    pub corruption: CorruptionOutcome,
    /// Duplicate stage result
    pub duplicates: DuplicateOutcome,
    /// Whether the duplicate stage was skipped because of a shutdown
    pub duplicates_skipped: bool,
    /// Wall-clock duration of the run
    pub duration: Duration,
}

impl PipelineSummary {
    /// Whether the run stopped early on shutdown.
    #[must_use]
    pub fn interrupted(&self) -> bool {
        self.corruption.stats.interrupted
            || self.duplicates.stats.interrupted
            || self.duplicates_skipped
    }

    /// Total files relocated by both stages.
    #[must_use]
    pub fn total_moved(&self) -> usize {
        self.corruption.stats.moved + self.duplicates.stats.moved
    }

    /// Total per-file relocation failures across both stages.
    #[must_use]
    pub fn total_failures(&self) -> usize {
        self.corruption.stats.failed + self.duplicates.stats.failed
    }

    /// Whether any per-file problem was recorded.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.total_failures() > 0
    }
}

/// Runs the corruption stage then the duplicate stage over one root.
#[derive(Debug)]
pub struct Pipeline {
    config: PipelineConfig,
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Pipeline {
    /// Create a pipeline with the given configuration.
    #[must_use]
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Pipeline configuration.
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn check_root(root: &Path) -> Result<(), PipelineError> {
        if !root.exists() {
            return Err(PipelineError::RootNotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(PipelineError::NotADirectory(root.to_path_buf()));
        }
        Ok(())
    }

    /// Both destinations must differ, and neither may be the root or an
    /// ancestor of it; otherwise relocated files would be walked again.
    fn check_destinations(&self, root: &Path) -> Result<(), PipelineError> {
        let resolve = |p: &Path| std::fs::canonicalize(p).unwrap_or_else(|_| p.to_path_buf());
        let root = resolve(root);
        let corrupted = resolve(&self.config.corrupted_dir);
        let duplicates = resolve(&self.config.duplicates_dir);

        if corrupted == duplicates {
            return Err(PipelineError::SameDestination(corrupted));
        }
        for dest in [corrupted, duplicates] {
            if root.starts_with(&dest) {
                return Err(PipelineError::DestinationContainsRoot(dest));
            }
        }
        Ok(())
    }

    /// Run both stages over `root`.
    ///
    /// The corrupted folder is created right before the first stage and the
    /// duplicates folder right before the second. If the first stage is
    /// interrupted the second does not run.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] if the root is unusable, a destination
    /// overlaps the root or the other destination, or a destination folder
    /// cannot be created. Nothing is moved when the run is rejected.
    pub fn run(
        &self,
        root: &Path,
        progress: &dyn ProgressReporter,
    ) -> Result<PipelineSummary, PipelineError> {
        let start = Instant::now();
        Self::check_root(root)?;
        self.check_destinations(root)?;

        log::info!("Processing {}", root.display());
        let walker = self.config.walker_config();

        let mut corruption = CorruptionStage::new(
            CorruptionConfig::new(&self.config.corrupted_dir)
                .with_depth(self.config.depth)
                .with_walker_config(walker),
        );
        if let Some(ref flag) = self.shutdown_flag {
            corruption = corruption.with_shutdown_flag(flag.clone());
        }
        let mut corruption_outcome = corruption.run(root, progress)?;

        let mut summary = PipelineSummary {
            root: root.to_path_buf(),
            ..Default::default()
        };

        if corruption_outcome.stats.interrupted {
            log::warn!("Interrupted during corruption check; skipping duplicate stage");
            summary.duplicates_skipped = true;
        } else {
            let mut duplicates =
                DuplicateStage::new(DuplicateConfig::new(&self.config.duplicates_dir));
            if let Some(ref flag) = self.shutdown_flag {
                duplicates = duplicates.with_shutdown_flag(flag.clone());
            }
            let survivors = std::mem::take(&mut corruption_outcome.survivors);
            summary.duplicates = duplicates.run(survivors, progress)?;
        }

        summary.corruption = corruption_outcome;
        summary.duration = start.elapsed();

        log::info!(
            "Finished in {:.2?}: {} file(s) moved, {} failure(s)",
            summary.duration,
            summary.total_moved(),
            summary.total_failures()
        );

        Ok(summary)
    }
}
