//! Command-line interface definitions for mediasweep.
//!
//! # Example
//!
//! ```bash
//! # Clean a folder: corrupted files first, then duplicates
//! mediasweep ~/Pictures
//!
//! # Ask for the folder interactively
//! mediasweep
//!
//! # Decode every pixel and send relocations elsewhere
//! mediasweep ~/Pictures --validation full --duplicates-dir /mnt/spare/dups
//!
//! # Machine-readable report
//! mediasweep ~/Music --output json --no-progress
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::validation::ValidationDepth;

/// Move corrupted and duplicate media files out of a folder.
///
/// mediasweep validates every JPEG, PNG and MP3 file under a directory,
/// moves the ones that fail into a "corrupted" folder, then moves all but one
/// copy of each set of byte-identical files into a "duplicates" folder.
/// Nothing is ever deleted.
#[derive(Debug, Parser)]
#[command(name = "mediasweep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to process (prompted for when omitted)
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Configuration file (TOML)
    ///
    /// Defaults to mediasweep.toml in the platform config directory.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Folder receiving invalid files (default: <PATH>/corrupted)
    ///
    /// Relative paths are resolved against PATH.
    #[arg(long, value_name = "DIR")]
    pub corrupted_dir: Option<PathBuf>,

    /// Folder receiving duplicate copies (default: <PATH>/duplicates)
    ///
    /// Relative paths are resolved against PATH.
    #[arg(long, value_name = "DIR")]
    pub duplicates_dir: Option<PathBuf>,

    /// Follow symbolic links during the walk
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Skip hidden files and directories (starting with .)
    #[arg(long)]
    pub skip_hidden: bool,

    /// How deeply images are validated
    #[arg(long, value_enum, value_name = "DEPTH")]
    pub validation: Option<ValidationDepth>,

    /// Output format for the final report
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Print fatal errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl Cli {
    /// Whether a progress bar should be drawn.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.no_progress && self.output == OutputFormat::Text
    }
}

/// Output format for the run report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON for scripting
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
