//! Corruption stage implementation.
//!
//! # Example
//!
//! ```no_run
//! use mediasweep::corruption::{CorruptionConfig, CorruptionStage};
//! use mediasweep::progress::SilentProgress;
//! use std::path::Path;
//!
//! let stage = CorruptionStage::new(CorruptionConfig::new("/photos/corrupted"));
//! let outcome = stage.run(Path::new("/photos"), &SilentProgress).unwrap();
//! println!("{} invalid file(s) moved", outcome.stats.moved);
//! ```

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::{CorruptionConfig, CorruptionOutcome, QuarantinedFile};
use crate::actions::{ensure_dir, relocate_into};
use crate::pipeline::PipelineError;
use crate::progress::ProgressReporter;
use crate::scanner::{MediaFile, Walker};
use crate::validation::{Validation, Validator};

/// Validates every supported file under a root and relocates the invalid ones.
#[derive(Debug)]
pub struct CorruptionStage {
    config: CorruptionConfig,
    validator: Validator,
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl CorruptionStage {
    /// Create a stage with the given configuration.
    #[must_use]
    pub fn new(config: CorruptionConfig) -> Self {
        let validator = Validator::new(config.depth);
        Self {
            config,
            validator,
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

    /// Collect the supported files under `root`, counting walk errors.
    fn collect(&self, root: &Path) -> (Vec<MediaFile>, usize) {
        let walker = Walker::new(root, self.config.walker.clone());
        let mut files = Vec::new();
        let mut errors = 0;

        for entry in walker.walk() {
            match entry {
                Ok(file) => files.push(file),
                Err(e) => {
                    log::warn!("Skipping during walk: {}", e);
                    errors += 1;
                }
            }
        }

        (files, errors)
    }

    /// Run the stage over `root`.
    ///
    /// Creates the corrupted folder first, then validates files one at a
    /// time. Per-file failures are logged and counted; they never abort the
    /// stage. A shutdown request is honored between files.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::DestinationUnavailable`] if the corrupted
    /// folder cannot be created. No file is touched in that case.
    pub fn run(
        &self,
        root: &Path,
        progress: &dyn ProgressReporter,
    ) -> Result<CorruptionOutcome, PipelineError> {
        let destination = &self.config.destination;
        ensure_dir(destination).map_err(|source| PipelineError::DestinationUnavailable {
            path: destination.clone(),
            source,
        })?;

        let (files, scan_errors) = self.collect(root);
        let total = files.len();
        log::info!(
            "Checking {} media file(s) under {} ({} validation)",
            total,
            root.display(),
            self.config.depth
        );

        let mut outcome = CorruptionOutcome::default();
        outcome.stats.scan_errors = scan_errors;

        for (index, file) in files.into_iter().enumerate() {
            if self.is_shutdown_requested() {
                log::info!("Corruption check interrupted after {} file(s)", index);
                outcome.stats.interrupted = true;
                break;
            }

            progress.report(index + 1, total, &file.path.display().to_string());
            outcome.stats.examined += 1;

            match self.validator.validate(&file.path, file.kind) {
                Validation::Valid => {
                    log::debug!("Valid: {}", file.path.display());
                    outcome.stats.valid += 1;
                    outcome.survivors.push(file);
                }
                Validation::Invalid(reason) => {
                    log::info!("Invalid {}: {}", file.path.display(), reason);
                    outcome.stats.invalid += 1;

                    let moved = relocate_into(&file.path, destination);
                    if let Ok(ref result) = moved {
                        outcome.quarantined.push(QuarantinedFile {
                            moved: result.clone(),
                            reason,
                        });
                    }
                    outcome.moves.record(&file.path, moved);
                }
            }
        }

        outcome.stats.moved = outcome.moves.success_count();
        outcome.stats.failed = outcome.moves.failure_count();
        outcome.stats.bytes_moved = outcome.moves.bytes_moved;

        log::info!(
            "Corruption check: {} examined, {} invalid, {}",
            outcome.stats.examined,
            outcome.stats.invalid,
            outcome.moves.summary()
        );

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corruption::CorruptionStats;
    use crate::progress::SilentProgress;
    use crate::scanner::{MediaKind, WalkerConfig};
    use std::fs;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn write_png(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        image::RgbImage::from_pixel(4, 4, image::Rgb([1, 2, 3]))
            .save_with_format(&path, image::ImageFormat::Png)
            .unwrap();
        path
    }

    fn stage_for(root: &Path) -> CorruptionStage {
        let destination = root.join("corrupted");
        let walker = WalkerConfig::default().with_excluded(destination.clone());
        CorruptionStage::new(CorruptionConfig::new(destination).with_walker_config(walker))
    }

    #[derive(Default)]
    struct RecordingProgress {
        calls: Mutex<Vec<(usize, usize, String)>>,
    }

    impl ProgressReporter for RecordingProgress {
        fn report(&self, index: usize, total: usize, label: &str) {
            self.calls
                .lock()
                .unwrap()
                .push((index, total, label.to_string()));
        }
    }

    /// Deletes `victim` the moment the stage announces it, so its later
    /// relocation fails regardless of filesystem permissions.
    struct VanishingFile {
        victim: PathBuf,
    }

    impl ProgressReporter for VanishingFile {
        fn report(&self, _index: usize, _total: usize, label: &str) {
            if Path::new(label) == self.victim {
                fs::remove_file(&self.victim).unwrap();
            }
        }
    }

    #[test]
    fn test_empty_root_creates_folder() {
        let dir = TempDir::new().unwrap();

        let outcome = stage_for(dir.path()).run(dir.path(), &SilentProgress).unwrap();

        assert_eq!(outcome.stats, CorruptionStats::default());
        assert!(outcome.survivors.is_empty());
        assert!(dir.path().join("corrupted").is_dir());
    }

    #[test]
    fn test_invalid_file_relocated() {
        let dir = TempDir::new().unwrap();
        write_png(dir.path(), "good.png");
        fs::write(dir.path().join("bad.png"), b"not a png").unwrap();
        fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();

        let outcome = stage_for(dir.path()).run(dir.path(), &SilentProgress).unwrap();

        assert_eq!(outcome.stats.examined, 2);
        assert_eq!(outcome.stats.valid, 1);
        assert_eq!(outcome.stats.invalid, 1);
        assert_eq!(outcome.stats.moved, 1);
        assert_eq!(outcome.stats.bytes_moved, 9);
        assert!(!dir.path().join("bad.png").exists());
        assert!(dir.path().join("corrupted/bad.png").exists());
        assert!(dir.path().join("notes.txt").exists());

        assert_eq!(outcome.survivors.len(), 1);
        assert_eq!(outcome.survivors[0].kind, MediaKind::Png);
        assert_eq!(outcome.quarantined.len(), 1);
        assert!(outcome.quarantined[0]
            .reason
            .to_string()
            .starts_with("malformed image"));
    }

    #[test]
    fn test_corrupted_folder_not_rescanned() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("corrupted")).unwrap();
        fs::write(dir.path().join("corrupted/old.png"), b"still broken").unwrap();

        let outcome = stage_for(dir.path()).run(dir.path(), &SilentProgress).unwrap();

        assert_eq!(outcome.stats.examined, 0);
        assert!(dir.path().join("corrupted/old.png").exists());
    }

    #[test]
    fn test_name_collision_in_corrupted_folder() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("corrupted")).unwrap();
        fs::write(dir.path().join("corrupted/bad.jpg"), b"from last run").unwrap();
        fs::write(dir.path().join("bad.jpg"), b"new garbage").unwrap();

        let outcome = stage_for(dir.path()).run(dir.path(), &SilentProgress).unwrap();

        assert_eq!(outcome.stats.moved, 1);
        assert_eq!(
            fs::read(dir.path().join("corrupted/bad.jpg")).unwrap(),
            b"from last run"
        );
        assert_eq!(
            fs::read(dir.path().join("corrupted/bad_1.jpg")).unwrap(),
            b"new garbage"
        );
    }

    #[test]
    fn test_progress_reported_per_file() {
        let dir = TempDir::new().unwrap();
        write_png(dir.path(), "a.png");
        write_png(dir.path(), "b.png");
        let progress = RecordingProgress::default();

        stage_for(dir.path()).run(dir.path(), &progress).unwrap();

        let label = |name: &str| dir.path().join(name).display().to_string();
        assert_eq!(
            *progress.calls.lock().unwrap(),
            vec![(1, 2, label("a.png")), (2, 2, label("b.png"))]
        );
    }

    #[test]
    fn test_failed_move_does_not_stop_stage() {
        let dir = TempDir::new().unwrap();
        let gone = dir.path().join("a.jpg");
        fs::write(&gone, b"garbage one").unwrap();
        fs::write(dir.path().join("b.jpg"), b"garbage two").unwrap();
        let progress = VanishingFile {
            victim: gone.clone(),
        };

        let outcome = stage_for(dir.path()).run(dir.path(), &progress).unwrap();

        assert_eq!(outcome.stats.examined, 2);
        assert_eq!(outcome.stats.invalid, 2);
        assert_eq!(outcome.stats.failed, 1);
        assert_eq!(outcome.stats.moved, 1);
        assert_eq!(outcome.moves.failures[0].0, gone);
        assert!(dir.path().join("corrupted/b.jpg").exists());
        assert!(!dir.path().join("b.jpg").exists());
    }

    #[test]
    fn test_shutdown_before_start() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bad.png"), b"junk").unwrap();
        let flag = Arc::new(AtomicBool::new(true));

        let outcome = stage_for(dir.path())
            .with_shutdown_flag(flag)
            .run(dir.path(), &SilentProgress)
            .unwrap();

        assert!(outcome.stats.interrupted);
        assert_eq!(outcome.stats.examined, 0);
        assert!(dir.path().join("bad.png").exists());
    }

    #[test]
    fn test_destination_unavailable() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"a file, not a folder").unwrap();
        fs::write(dir.path().join("bad.png"), b"junk").unwrap();

        let stage = CorruptionStage::new(CorruptionConfig::new(blocker.join("corrupted")));
        let err = stage.run(dir.path(), &SilentProgress).unwrap_err();

        assert!(matches!(err, PipelineError::DestinationUnavailable { .. }));
        assert!(dir.path().join("bad.png").exists());
    }
}
