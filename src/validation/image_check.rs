//! Image structure checks backed by the `image` crate.
//!
//! PNG files additionally get a chunk walk at every depth: each chunk up to
//! `IEND` must be complete and carry a matching CRC. Pixel data is not
//! inflated by the walk, so truncated and bit-flipped files are caught
//! without a full decode.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use image::ImageReader;

use super::{ImageFormat, InvalidReason, Validation, ValidationDepth};

/// The eight bytes every PNG stream starts with.
const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];

/// Largest chunk length the format allows (2^31 - 1).
const MAX_CHUNK_LEN: u32 = 0x7FFF_FFFF;

const READ_BUFFER_SIZE: usize = 64 * 1024;

impl From<ImageFormat> for image::ImageFormat {
    fn from(format: ImageFormat) -> Self {
        match format {
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Png => image::ImageFormat::Png,
        }
    }
}

/// Errors found while walking PNG chunks.
#[derive(thiserror::Error, Debug)]
enum ChunkError {
    #[error("missing PNG signature")]
    Signature,

    #[error("file ends inside {0} chunk")]
    Truncated(String),

    #[error("chunk length {0} exceeds the PNG limit")]
    Length(u32),

    #[error("CRC mismatch in {0} chunk")]
    Crc(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<ChunkError> for InvalidReason {
    fn from(err: ChunkError) -> Self {
        match err {
            ChunkError::Io(e) => InvalidReason::Unreadable(e.to_string()),
            other => InvalidReason::MalformedImage(other.to_string()),
        }
    }
}

fn chunk_name(kind: &[u8; 4]) -> String {
    String::from_utf8_lossy(kind).into_owned()
}

/// `read_exact` that reports end of file as truncation of `chunk`.
fn read_chunk_bytes<R: Read>(reader: &mut R, buf: &mut [u8], chunk: &str) -> Result<(), ChunkError> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => ChunkError::Truncated(chunk.to_string()),
        _ => ChunkError::Io(e),
    })
}

/// Walk every chunk of a PNG stream through `IEND`, checking CRCs.
///
/// Returns the number of chunks seen.
fn walk_png_chunks<R: Read>(mut reader: R) -> Result<usize, ChunkError> {
    let mut signature = [0u8; 8];
    read_chunk_bytes(&mut reader, &mut signature, "signature").map_err(|e| match e {
        ChunkError::Truncated(_) => ChunkError::Signature,
        other => other,
    })?;
    if signature != PNG_SIGNATURE {
        return Err(ChunkError::Signature);
    }

    let mut buf = vec![0u8; READ_BUFFER_SIZE];
    let mut chunks = 0;
    loop {
        let mut header = [0u8; 8];
        read_chunk_bytes(&mut reader, &mut header, "next")?;
        let len = u32::from_be_bytes([header[0], header[1], header[2], header[3]]);
        let kind = [header[4], header[5], header[6], header[7]];
        let name = chunk_name(&kind);
        if len > MAX_CHUNK_LEN {
            return Err(ChunkError::Length(len));
        }

        let mut crc = crc32fast::Hasher::new();
        crc.update(&kind);
        let mut remaining = len as usize;
        while remaining > 0 {
            let n = remaining.min(buf.len());
            read_chunk_bytes(&mut reader, &mut buf[..n], &name)?;
            crc.update(&buf[..n]);
            remaining -= n;
        }

        let mut stored = [0u8; 4];
        read_chunk_bytes(&mut reader, &mut stored, &name)?;
        if crc.finalize() != u32::from_be_bytes(stored) {
            return Err(ChunkError::Crc(name));
        }

        chunks += 1;
        if &kind == b"IEND" {
            return Ok(chunks);
        }
    }
}

fn verify_png_structure(path: &Path) -> Result<(), InvalidReason> {
    let file = File::open(path).map_err(|e| InvalidReason::Unreadable(e.to_string()))?;
    let chunks = walk_png_chunks(BufReader::new(file))?;
    log::trace!("{}: {} PNG chunk(s) verified", path.display(), chunks);
    Ok(())
}

/// Check that `path` decodes as `format`.
///
/// The format comes from the declared kind, never from sniffing, so a PNG
/// stream saved under a `.jpg` name is rejected.
pub(super) fn check(path: &Path, format: ImageFormat, depth: ValidationDepth) -> Validation {
    let mut reader = match ImageReader::open(path) {
        Ok(reader) => reader,
        Err(e) => return Validation::Invalid(InvalidReason::Unreadable(e.to_string())),
    };
    reader.set_format(format.into());

    if format == ImageFormat::Png {
        if let Err(reason) = verify_png_structure(path) {
            return Validation::Invalid(reason);
        }
    }

    let result = match depth {
        ValidationDepth::Header => reader.into_dimensions().map(|(w, h)| {
            log::trace!("{}: {}x{} {:?}", path.display(), w, h, format);
        }),
        ValidationDepth::Full => reader.decode().map(|img| {
            log::trace!(
                "{}: decoded {}x{} {:?}",
                path.display(),
                img.width(),
                img.height(),
                format
            );
        }),
    };

    match result {
        Ok(()) => Validation::Valid,
        Err(e) => Validation::Invalid(InvalidReason::MalformedImage(e.to_string())),
    }
}
