//! Collision-safe file relocation.
//!
//! # Overview
//!
//! This module moves files into a destination folder without ever
//! overwriting existing content:
//! - [`resolve_conflict`] picks a free name (`stem_N.ext`, lowest N first)
//! - [`move_file`] renames, falling back to copy + remove across devices
//! - [`relocate_into`] combines the two for a single file
//!
//! Content is never deleted outright. When a cross-device copy succeeds but
//! the source cannot be removed afterwards, both copies are left in place
//! and the move is reported as [`MoveError::SourceNotRemoved`].
//!
//! The namer only probes the filesystem; it does not reserve the name. Another
//! process creating the same file between the probe and the move can still
//! race with us.
//!
//! # Example
//!
//! ```no_run
//! use mediasweep::actions::relocate::relocate_into;
//! use std::path::Path;
//!
//! match relocate_into(Path::new("/photos/copy.jpg"), Path::new("/photos/duplicates")) {
//!     Ok(moved) => println!("{} -> {}", moved.from.display(), moved.to.display()),
//!     Err(e) => eprintln!("Failed: {}", e),
//! }
//! ```

use std::ffi::OsString;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error type for relocation operations.
#[derive(Debug, Error)]
pub enum MoveError {
    /// Source file was not found (may have been moved already).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied on the source or the destination.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Cross-device copy failed; the source is untouched.
    #[error("copy to {destination} failed for {path}: {source}")]
    CopyFailed {
        path: PathBuf,
        destination: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Cross-device copy succeeded but the source could not be removed.
    #[error("copied {path} to {destination} but could not remove the source: {source}")]
    SourceNotRemoved {
        path: PathBuf,
        destination: PathBuf,
        #[source]
        source: io::Error,
    },

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl MoveError {
    /// Source path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::CopyFailed { path: p, .. }
            | Self::SourceNotRemoved { path: p, .. }
            | Self::Io { path: p, .. } => p,
        }
    }

    fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }
}

/// Result of a successful relocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResult {
    /// Original location.
    pub from: PathBuf,
    /// Final location inside the destination folder.
    pub to: PathBuf,
    /// Size of the moved file in bytes.
    pub size: u64,
    /// Whether the move needed the copy + remove fallback.
    pub across_devices: bool,
}

/// Results of a series of relocations.
#[derive(Debug, Clone, Default)]
pub struct BatchMoveResult {
    /// Successfully relocated files.
    pub successes: Vec<MoveResult>,
    /// Failed relocations with their errors.
    pub failures: Vec<(PathBuf, String)>,
    /// Total bytes relocated.
    pub bytes_moved: u64,
}

impl BatchMoveResult {
    /// Record the outcome of one relocation.
    pub fn record(&mut self, path: &Path, outcome: Result<MoveResult, MoveError>) {
        match outcome {
            Ok(moved) => {
                self.bytes_moved += moved.size;
                self.successes.push(moved);
            }
            Err(e) => {
                log::warn!("Failed to move {}: {}", path.display(), e);
                self.failures.push((path.to_path_buf(), e.to_string()));
            }
        }
    }

    /// Number of files moved.
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.successes.len()
    }

    /// Number of failed moves.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Check if all moves succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    /// Human-readable summary of the batch.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.all_succeeded() {
            format!(
                "Moved {} file(s), {}",
                self.success_count(),
                bytesize::ByteSize(self.bytes_moved)
            )
        } else {
            format!(
                "Moved {} file(s), {} failed, {}",
                self.success_count(),
                self.failure_count(),
                bytesize::ByteSize(self.bytes_moved)
            )
        }
    }
}

/// Whether anything (file, directory, dangling link) sits at `path`.
fn is_occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Return `target` if it is free, otherwise the first free `stem_N.ext`.
///
/// N counts up from 1, so the lowest unused suffix wins. The extension is
/// everything after the last dot of the file name; names without one get
/// the suffix appended.
///
/// # Example
///
/// ```no_run
/// use mediasweep::actions::relocate::resolve_conflict;
/// use std::path::Path;
///
/// // With /dups/a.jpg already present this yields /dups/a_1.jpg
/// let target = resolve_conflict(Path::new("/dups/a.jpg"));
/// ```
#[must_use]
pub fn resolve_conflict(target: &Path) -> PathBuf {
    if !is_occupied(target) {
        return target.to_path_buf();
    }

    let stem = target
        .file_stem()
        .map(OsString::from)
        .unwrap_or_default();
    let extension = target.extension();

    let mut counter: u64 = 1;
    loop {
        let mut name = stem.clone();
        name.push(format!("_{counter}"));
        if let Some(ext) = extension {
            name.push(".");
            name.push(ext);
        }

        let candidate = target.with_file_name(&name);
        if !is_occupied(&candidate) {
            log::debug!(
                "Name conflict at {}, using {}",
                target.display(),
                candidate.display()
            );
            return candidate;
        }
        counter += 1;
    }
}

/// Create a destination folder and any missing parents.
///
/// Succeeds if the folder already exists.
///
/// # Errors
///
/// Returns the underlying I/O error if the folder cannot be created.
pub fn ensure_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}

fn is_cross_device(err: &io::Error) -> bool {
    if err.kind() == io::ErrorKind::CrossesDevices {
        return true;
    }
    #[cfg(unix)]
    const EXDEV: i32 = 18;
    #[cfg(windows)]
    const EXDEV: i32 = 17; // ERROR_NOT_SAME_DEVICE
    #[cfg(not(any(unix, windows)))]
    const EXDEV: i32 = -1;

    err.raw_os_error() == Some(EXDEV)
}

/// Move `src` to exactly `dest`.
///
/// Tries a rename first and falls back to copy + sync + remove when the two
/// paths live on different devices. Returns whether the fallback was used.
///
/// # Errors
///
/// - `NotFound` / `PermissionDenied` / `Io` when the rename fails outright
/// - `CopyFailed` when the fallback copy fails (partial copy is removed)
/// - `SourceNotRemoved` when the copy landed but the source stayed
pub fn move_file(src: &Path, dest: &Path) -> Result<bool, MoveError> {
    match fs::rename(src, dest) {
        Ok(()) => Ok(false),
        Err(e) if is_cross_device(&e) => {
            log::debug!(
                "Cross-device move {} -> {}, copying",
                src.display(),
                dest.display()
            );
            copy_then_remove(src, dest)?;
            Ok(true)
        }
        Err(e) => Err(MoveError::from_io(src, e)),
    }
}

fn copy_then_remove(src: &Path, dest: &Path) -> Result<(), MoveError> {
    let copied = fs::copy(src, dest).and_then(|_| File::open(dest)?.sync_all());
    if let Err(source) = copied {
        if let Err(cleanup) = fs::remove_file(dest) {
            if cleanup.kind() != io::ErrorKind::NotFound {
                log::warn!(
                    "Could not remove partial copy {}: {}",
                    dest.display(),
                    cleanup
                );
            }
        }
        return Err(MoveError::CopyFailed {
            path: src.to_path_buf(),
            destination: dest.to_path_buf(),
            source,
        });
    }

    fs::remove_file(src).map_err(|source| {
        log::error!(
            "Copied {} to {} but the source remains: {}",
            src.display(),
            dest.display(),
            source
        );
        MoveError::SourceNotRemoved {
            path: src.to_path_buf(),
            destination: dest.to_path_buf(),
            source,
        }
    })
}

/// Move `src` into `dest_dir` under a collision-free name.
///
/// The folder must already exist (see [`ensure_dir`]).
///
/// # Errors
///
/// Returns [`MoveError`] if the source cannot be inspected or moved. The
/// source stays where it was in every error case except
/// [`MoveError::SourceNotRemoved`], where a copy also exists at the target.
pub fn relocate_into(src: &Path, dest_dir: &Path) -> Result<MoveResult, MoveError> {
    let metadata = fs::symlink_metadata(src).map_err(|e| MoveError::from_io(src, e))?;
    let Some(file_name) = src.file_name() else {
        return Err(MoveError::Io {
            path: src.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
        });
    };

    let target = resolve_conflict(&dest_dir.join(file_name));
    let across_devices = move_file(src, &target)?;

    log::info!("Moved {} -> {}", src.display(), target.display());

    Ok(MoveResult {
        from: src.to_path_buf(),
        to: target,
        size: metadata.len(),
        across_devices,
    })
}
