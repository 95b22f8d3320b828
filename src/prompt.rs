//! Interactive selection of the root directory.
//!
//! Used when no path is given on the command line. Reads one line, so paths
//! can be pasted straight from a file manager, including surrounding quotes.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Text shown before reading the path.
pub const PROMPT: &str = "Directory to clean: ";

/// Ask for a directory on `output` and read the answer from `input`.
///
/// Returns `None` on end of input or an empty answer. The answer is trimmed
/// and one pair of matching single or double quotes is removed.
///
/// # Errors
///
/// Returns an error if writing the prompt or reading the answer fails.
pub fn read_root_path<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
) -> io::Result<Option<PathBuf>> {
    write!(output, "{PROMPT}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }

    let answer = unquote(line.trim());
    if answer.is_empty() {
        log::debug!("Empty answer to directory prompt");
        return Ok(None);
    }
    Ok(Some(PathBuf::from(answer)))
}

fn unquote(s: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = s
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner.trim();
        }
    }
    s
}
