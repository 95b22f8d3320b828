//! Human-readable run report.
//!
//! Colors come from `yansi` and follow its global switch, so
//! `yansi::disable()` (done for `--no-color` / `NO_COLOR`) yields plain text.

use std::io::{self, Write};

use bytesize::ByteSize;
use yansi::Paint;

use crate::pipeline::PipelineSummary;

/// Text formatter for a [`PipelineSummary`].
pub struct TextReport<'a> {
    summary: &'a PipelineSummary,
}

impl<'a> TextReport<'a> {
    /// Wrap a summary for printing.
    #[must_use]
    pub fn new(summary: &'a PipelineSummary) -> Self {
        Self { summary }
    }

    /// Write the full report.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        self.write_corruption(w)?;
        writeln!(w)?;
        self.write_duplicates(w)?;
        writeln!(w)?;
        self.write_totals(w)
    }

    fn write_corruption<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let outcome = &self.summary.corruption;
        writeln!(
            w,
            "{} {}",
            "Corruption check:".bold(),
            self.summary.root.display()
        )?;

        for q in &outcome.quarantined {
            writeln!(
                w,
                "  {} {} -> {} ({})",
                "moved".yellow(),
                q.moved.from.display(),
                q.moved.to.display(),
                q.reason.dim()
            )?;
        }
        for (path, error) in &outcome.moves.failures {
            writeln!(w, "  {} {}: {}", "failed".red(), path.display(), error)?;
        }

        let stats = &outcome.stats;
        writeln!(
            w,
            "  {} examined, {} invalid, {} moved ({}), {} failed",
            stats.examined,
            stats.invalid,
            stats.moved.bold(),
            ByteSize::b(stats.bytes_moved),
            stats.failed
        )?;
        if stats.scan_errors > 0 {
            writeln!(
                w,
                "  {} walk error(s), see log",
                stats.scan_errors.yellow()
            )?;
        }
        Ok(())
    }

    fn write_duplicates<W: Write>(&self, w: &mut W) -> io::Result<()> {
        writeln!(w, "{}", "Duplicate check:".bold())?;

        if self.summary.duplicates_skipped {
            return writeln!(w, "  {}", "skipped (interrupted)".yellow());
        }

        let outcome = &self.summary.duplicates;
        if outcome.had_no_files() {
            return writeln!(w, "  No files to check");
        }
        if outcome.stats.interrupted && outcome.stats.groups == 0 {
            writeln!(w, "  {}", "interrupted while fingerprinting".yellow())?;
        } else if outcome.found_no_duplicates() {
            writeln!(w, "  No duplicates found")?;
        }

        for group in &outcome.groups {
            let copies = group.moves.success_count() + group.moves.failure_count() + 1;
            writeln!(
                w,
                "  {} {} ({} cop{})",
                "keep".green(),
                group.keeper.display(),
                copies,
                if copies == 1 { "y" } else { "ies" }
            )?;
            for moved in &group.moves.successes {
                writeln!(
                    w,
                    "    {} {} -> {}",
                    "moved".yellow(),
                    moved.from.display(),
                    moved.to.display()
                )?;
            }
            for (path, error) in &group.moves.failures {
                writeln!(w, "    {} {}: {}", "failed".red(), path.display(), error)?;
            }
        }

        let stats = &outcome.stats;
        writeln!(
            w,
            "  {} checked, {} unreadable, {} group(s), {} moved ({}), {} failed",
            stats.input_files,
            stats.hash_failures,
            stats.groups,
            stats.moved.bold(),
            ByteSize::b(stats.bytes_moved),
            stats.failed
        )
    }

    fn write_totals<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let summary = self.summary;
        if summary.interrupted() {
            writeln!(w, "{}", "Interrupted: results are partial.".red().bold())?;
        }
        writeln!(
            w,
            "{} {} file(s) moved, {} failure(s) in {:.2?}",
            "Done:".bold(),
            summary.total_moved(),
            summary.total_failures(),
            summary.duration
        )
    }
}
