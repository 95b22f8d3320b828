//! Structural validation of media files.
//!
//! # Overview
//!
//! The [`Validator`] decides whether a file's content is well-formed for its
//! declared [`MediaKind`]. Every kind maps to exactly one [`Strategy`]:
//!
//! | Kind | Strategy | Check |
//! |------|----------|-------|
//! | JPEG | `Image(Jpeg)` | decode headers (or all pixels with [`ValidationDepth::Full`]) |
//! | PNG  | `Image(Png)`  | verify every chunk CRC through `IEND`, decode headers (or all pixels with [`ValidationDepth::Full`]) |
//! | MP3  | `Audio`       | parse container and tag metadata |
//!
//! Failures are never raised: each check returns a [`Validation`] so the
//! cause stays available for logging. The validator only reads files.
//!
//! # Example
//!
//! ```no_run
//! use mediasweep::scanner::MediaKind;
//! use mediasweep::validation::{Validation, Validator};
//! use std::path::Path;
//!
//! let validator = Validator::default();
//! match validator.validate(Path::new("photo.jpg"), MediaKind::Jpeg) {
//!     Validation::Valid => println!("ok"),
//!     Validation::Invalid(reason) => println!("corrupt: {}", reason),
//! }
//! ```

mod audio_check;
mod image_check;

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::scanner::MediaKind;

/// How deeply image content is checked.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ValidationDepth {
    /// Parse headers and verify container structure without decoding pixel data
    #[default]
    Header,
    /// Decode every pixel; also catches damaged compressed image data
    Full,
}

impl fmt::Display for ValidationDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Header => write!(f, "header"),
            Self::Full => write!(f, "full"),
        }
    }
}

/// Image container formats we can check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

/// Validation strategy selected for a media kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Image structure check for the given format
    Image(ImageFormat),
    /// Audio container/tag parse
    Audio,
}

impl Strategy {
    /// Strategy for a media kind.
    #[must_use]
    pub fn for_kind(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Jpeg => Self::Image(ImageFormat::Jpeg),
            MediaKind::Png => Self::Image(ImageFormat::Png),
            MediaKind::Mp3 => Self::Audio,
        }
    }
}

/// Why a file was classified invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidReason {
    /// The file could not be opened or read at all.
    Unreadable(String),
    /// The image decoder rejected the content.
    MalformedImage(String),
    /// No parseable audio metadata was found.
    UnparseableAudio(String),
    /// The path does not carry a supported extension.
    UnsupportedType,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreadable(msg) => write!(f, "unreadable: {msg}"),
            Self::MalformedImage(msg) => write!(f, "malformed image: {msg}"),
            Self::UnparseableAudio(msg) => write!(f, "unparseable audio: {msg}"),
            Self::UnsupportedType => write!(f, "unsupported file type"),
        }
    }
}

/// Outcome of validating one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    /// Content is well-formed for its kind.
    Valid,
    /// Content failed the structural check.
    Invalid(InvalidReason),
}

impl Validation {
    /// Whether the file passed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Failure reason, if any.
    #[must_use]
    pub fn reason(&self) -> Option<&InvalidReason> {
        match self {
            Self::Valid => None,
            Self::Invalid(reason) => Some(reason),
        }
    }
}

/// Media validator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    depth: ValidationDepth,
}

impl Validator {
    /// Create a validator with the given image check depth.
    #[must_use]
    pub fn new(depth: ValidationDepth) -> Self {
        Self { depth }
    }

    /// Configured image check depth.
    #[must_use]
    pub fn depth(&self) -> ValidationDepth {
        self.depth
    }

    /// Validate a file against its declared kind.
    #[must_use]
    pub fn validate(&self, path: &Path, kind: MediaKind) -> Validation {
        let outcome = match Strategy::for_kind(kind) {
            Strategy::Image(format) => image_check::check(path, format, self.depth),
            Strategy::Audio => audio_check::check_mp3(path),
        };
        log::trace!("Validated {} as {}: {:?}", path.display(), kind, outcome);
        outcome
    }

    /// Validate a file, deriving its kind from the extension.
    ///
    /// Paths without a supported extension are invalid.
    #[must_use]
    pub fn validate_path(&self, path: &Path) -> Validation {
        match MediaKind::from_path(path) {
            Some(kind) => self.validate(path, kind),
            None => Validation::Invalid(InvalidReason::UnsupportedType),
        }
    }
}
