//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory tree
//! and collecting the supported media files it contains. Traversal is
//! single-threaded and sorted by file name within each directory, so the same
//! tree always yields the same sequence.
//!
//! # Features
//!
//! - Extension filtering against the closed [`MediaKind`] set
//! - Configurable symlink following (walkdir detects cycles)
//! - Hidden file filtering
//! - Excluded directories (the destination folders)
//!
//! # Example
//!
//! ```no_run
//! use mediasweep::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Pictures"), WalkerConfig::default());
//! let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
//! println!("Found {} media files", files.len());
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use super::{MediaFile, MediaKind, ScanError, WalkerConfig};

/// Directory walker for media file discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given path.
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
        }
    }

    /// Walk the directory tree, yielding supported media files.
    ///
    /// Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration; unsupported extensions are skipped silently.
    pub fn walk(&self) -> impl Iterator<Item = Result<MediaFile, ScanError>> + '_ {
        let excluded = self.resolved_exclusions();

        WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| self.should_descend(entry, &excluded))
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => self.process_entry(&entry),
                Err(e) => Some(Err(Self::convert_error(&self.root, e))),
            })
    }

    /// Canonical forms of the excluded directories that currently exist.
    fn resolved_exclusions(&self) -> Vec<PathBuf> {
        let mut resolved = Vec::with_capacity(self.config.exclude_dirs.len() * 2);
        for dir in &self.config.exclude_dirs {
            resolved.push(dir.clone());
            if let Ok(canonical) = fs::canonicalize(dir) {
                resolved.push(canonical);
            }
        }
        resolved
    }

    /// Decide whether an entry (and its subtree) stays in the walk.
    fn should_descend(&self, entry: &DirEntry, excluded: &[PathBuf]) -> bool {
        if entry.depth() == 0 {
            return true;
        }

        if self.config.skip_hidden && is_hidden(entry) {
            log::trace!("Skipping hidden entry: {}", entry.path().display());
            return false;
        }

        if entry.file_type().is_dir() && is_excluded(entry.path(), excluded) {
            log::debug!("Skipping excluded directory: {}", entry.path().display());
            return false;
        }

        true
    }

    /// Turn a walk entry into a MediaFile if it is a supported regular file.
    fn process_entry(&self, entry: &DirEntry) -> Option<Result<MediaFile, ScanError>> {
        let file_type = entry.file_type();
        if file_type.is_dir() {
            return None;
        }

        if file_type.is_symlink() && !self.config.follow_symlinks {
            log::trace!("Skipping symlink: {}", entry.path().display());
            return None;
        }

        let path = entry.path();
        let Some(kind) = MediaKind::from_path(path) else {
            log::trace!("Skipping unsupported file: {}", path.display());
            return None;
        };

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => return Some(Err(Self::convert_error(&self.root, e))),
        };

        if !metadata.is_file() {
            return None;
        }

        Some(Ok(MediaFile::new(path.to_path_buf(), kind, metadata.len())))
    }

    fn convert_error(root: &Path, err: walkdir::Error) -> ScanError {
        let path = err.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf);

        if err.loop_ancestor().is_some() {
            return ScanError::SymlinkLoop(path);
        }

        let io_err = err
            .into_io_error()
            .unwrap_or_else(|| io::Error::other("walk error"));
        match io_err.kind() {
            io::ErrorKind::NotFound => ScanError::NotFound(path),
            io::ErrorKind::PermissionDenied => ScanError::PermissionDenied(path),
            _ => ScanError::Io {
                path,
                source: io_err,
            },
        }
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

fn is_excluded(path: &Path, excluded: &[PathBuf]) -> bool {
    if excluded.iter().any(|dir| dir == path) {
        return true;
    }
    fs::canonicalize(path).is_ok_and(|canonical| excluded.contains(&canonical))
}
