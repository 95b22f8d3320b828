//! Scanner module for media discovery and content hashing.
//!
//! This module provides functionality for:
//! - Recursive directory walking restricted to supported media types
//! - Content fingerprinting with BLAKE3 (streamed in 64 KiB chunks)
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and media file discovery
//! - [`hasher`]: Streaming content hasher producing [`Fingerprint`]s
//!
//! # Example
//!
//! ```no_run
//! use mediasweep::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("."), WalkerConfig::default());
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{} ({})", file.path.display(), file.kind),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod hasher;
pub mod walker;

use std::fmt;
use std::path::{Path, PathBuf};

// Re-export main types
pub use hasher::{Fingerprint, Hasher, CHUNK_SIZE};
pub use walker::Walker;

/// Supported media types.
///
/// The set is closed: files whose extension maps to none of these kinds are
/// ignored by every stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    /// `image/jpeg` (`.jpg`, `.jpeg`)
    Jpeg,
    /// `image/png` (`.png`)
    Png,
    /// `audio/mp3` (`.mp3`)
    Mp3,
}

impl MediaKind {
    /// Every supported kind.
    pub const ALL: [MediaKind; 3] = [MediaKind::Jpeg, MediaKind::Png, MediaKind::Mp3];

    /// Lower-case extensions (without the dot) mapped to this kind.
    #[must_use]
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Jpeg => &["jpg", "jpeg"],
            Self::Png => &["png"],
            Self::Mp3 => &["mp3"],
        }
    }

    /// MIME type string for this kind.
    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Mp3 => "audio/mp3",
        }
    }

    /// Whether this kind is an image format.
    #[must_use]
    pub fn is_image(self) -> bool {
        matches!(self, Self::Jpeg | Self::Png)
    }

    /// Resolve a kind from an extension, compared case-insensitively.
    ///
    /// # Example
    ///
    /// ```
    /// use mediasweep::scanner::MediaKind;
    ///
    /// assert_eq!(MediaKind::from_extension("JPG"), Some(MediaKind::Jpeg));
    /// assert_eq!(MediaKind::from_extension("gif"), None);
    /// ```
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.extensions().contains(&ext.as_str()))
    }

    /// Resolve a kind from a path's extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime_type())
    }
}

/// A supported media file discovered during a walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    /// Path to the file, as produced by the walk
    pub path: PathBuf,
    /// Media kind derived from the extension
    pub kind: MediaKind,
    /// File size in bytes at discovery time
    pub size: u64,
}

impl MediaFile {
    /// Create a new MediaFile.
    #[must_use]
    pub fn new(path: PathBuf, kind: MediaKind, size: u64) -> Self {
        Self { path, kind, size }
    }

    /// Build a MediaFile from a path, reading its size from disk.
    ///
    /// Returns `None` if the extension is unsupported or the file
    /// cannot be inspected.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let kind = MediaKind::from_path(path)?;
        let size = std::fs::metadata(path).ok()?.len();
        Some(Self::new(path.to_path_buf(), kind, size))
    }

    /// File name for display, falling back to the full path.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Configuration for directory walking.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Follow symbolic links during traversal.
    pub follow_symlinks: bool,

    /// Skip hidden files and directories (names starting with `.`).
    pub skip_hidden: bool,

    /// Directories that are never descended into.
    ///
    /// The destination folders go here so relocated files are not
    /// picked up again when they live under the scanned root.
    pub exclude_dirs: Vec<PathBuf>,
}

impl WalkerConfig {
    /// Create a new configuration.
    #[must_use]
    pub fn new(follow_symlinks: bool, skip_hidden: bool, exclude_dirs: Vec<PathBuf>) -> Self {
        Self {
            follow_symlinks,
            skip_hidden,
            exclude_dirs,
        }
    }

    /// Add a directory to skip during the walk.
    #[must_use]
    pub fn with_excluded(mut self, dir: impl Into<PathBuf>) -> Self {
        self.exclude_dirs.push(dir.into());
        self
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// A symlink loop was detected while following links.
    #[error("Symlink loop detected at {0}")]
    SymlinkLoop(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    pub(crate) fn from_io(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }
}
