//! MP3 checks backed by `lofty`.

use std::path::Path;

use lofty::file::{AudioFile, FileType, TaggedFileExt};
use lofty::probe::Probe;

use super::{InvalidReason, Validation};

/// Check that `path` parses as an MPEG audio stream.
///
/// A file with well-formed frames and no tags at all is still valid; only a
/// parse failure marks it invalid.
pub(super) fn check_mp3(path: &Path) -> Validation {
    let probe = match Probe::open(path) {
        Ok(probe) => probe.set_file_type(FileType::Mpeg),
        Err(e) => return Validation::Invalid(InvalidReason::Unreadable(e.to_string())),
    };

    match probe.read() {
        Ok(tagged) => {
            log::trace!(
                "{}: {} tag(s), {:?}",
                path.display(),
                tagged.tags().len(),
                tagged.properties().duration()
            );
            Validation::Valid
        }
        Err(e) => Validation::Invalid(InvalidReason::UnparseableAudio(e.to_string())),
    }
}
