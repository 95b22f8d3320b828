//! mediasweep - Corrupted and Duplicate Media Cleaner
//!
//! Cleans a directory tree of JPEG, PNG and MP3 files in two stages. The
//! corruption stage validates every supported file and moves the invalid ones
//! into a "corrupted" folder. The duplicate stage fingerprints the survivors
//! with BLAKE3 and moves every copy but one into a "duplicates" folder.
//! Files are only ever moved, never deleted.

pub mod actions;
pub mod cli;
pub mod config;
pub mod corruption;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompt;
pub mod scanner;
pub mod signal;
pub mod validation;

use std::io::Write;

use anyhow::Context;

use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::error::ExitCode;
use crate::output::{JsonReport, TextReport};
use crate::pipeline::{Pipeline, PipelineError};
use crate::progress::{ProgressReporter, SilentProgress, TerminalProgress};

/// Run the application for parsed arguments.
///
/// Logging must already be initialized. Per-file problems are reflected in
/// the returned [`ExitCode`]; only fatal problems are returned as errors.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded, no usable root
/// directory is available, a destination folder cannot be created, or the
/// report cannot be written.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    if cli.no_color {
        yansi::disable();
    }

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config.apply_cli(&cli);

    let root = match cli.path.clone() {
        Some(path) => path,
        None => {
            let stdin = std::io::stdin();
            prompt::read_root_path(stdin.lock(), std::io::stderr())
                .context("Failed to read directory from prompt")?
                .ok_or(PipelineError::NoRootSelected)?
        }
    };

    let handler = signal::install_handler()?;
    let pipeline =
        Pipeline::new(config.pipeline_config(&root)).with_shutdown_flag(handler.get_flag());
    log::debug!("Pipeline configuration: {:?}", pipeline.config());

    let progress: Box<dyn ProgressReporter> = if cli.show_progress() {
        Box::new(TerminalProgress::new())
    } else {
        Box::new(SilentProgress)
    };
    let summary = pipeline.run(&root, progress.as_ref())?;
    drop(progress);

    let exit_code = ExitCode::from_summary(&summary);
    let mut stdout = std::io::stdout().lock();
    match cli.output {
        OutputFormat::Json => JsonReport::new(&summary, exit_code).write_to(&mut stdout)?,
        OutputFormat::Text if !cli.quiet => TextReport::new(&summary).write_to(&mut stdout)?,
        OutputFormat::Text => {}
    }
    stdout.flush()?;

    Ok(exit_code)
}
