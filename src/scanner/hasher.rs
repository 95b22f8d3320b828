//! BLAKE3 content hasher with streaming support.
//!
//! # Overview
//!
//! This module provides the [`Hasher`] struct for computing content
//! fingerprints. Files are read in fixed [`CHUNK_SIZE`] chunks and fed to an
//! incremental BLAKE3 hasher, so memory use is independent of file size.
//!
//! The digest depends only on the bytes of the file: path, timestamps and
//! permissions never contribute.

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use super::HashError;

/// Size of each read fed to the incremental hasher (64 KiB).
pub const CHUNK_SIZE: usize = 64 * 1024;

/// A 256-bit content digest.
pub type Hash = [u8; 32];

/// Content fingerprint used as the duplicate-detection key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(Hash);

impl Fingerprint {
    /// Wrap a raw digest.
    #[must_use]
    pub fn from_bytes(bytes: Hash) -> Self {
        Self(bytes)
    }

    /// Raw digest bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &Hash {
        &self.0
    }

    /// Lower-case hexadecimal representation (64 characters).
    #[must_use]
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({}…)", &self.to_hex()[..12])
    }
}

/// Streaming file hasher.
#[derive(Debug, Clone)]
pub struct Hasher {
    chunk_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher reading [`CHUNK_SIZE`] bytes at a time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
        }
    }

    /// Hash the full content of a file.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or read.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use mediasweep::scanner::Hasher;
    /// use std::path::Path;
    ///
    /// let hasher = Hasher::new();
    /// let hash = hasher.full_hash(Path::new("photo.jpg")).unwrap();
    /// println!("{}", hash);
    /// ```
    pub fn full_hash(&self, path: &Path) -> Result<Fingerprint, HashError> {
        let file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        self.hash_reader(file).map_err(|e| HashError::from_io(path, e))
    }

    /// Hash a file, returning `None` instead of an error.
    ///
    /// Read and permission failures are logged and turned into the
    /// "no fingerprint" sentinel so the caller can skip the file without
    /// aborting the run.
    #[must_use]
    pub fn fingerprint(&self, path: &Path) -> Option<Fingerprint> {
        match self.full_hash(path) {
            Ok(fingerprint) => {
                log::trace!("Hashed {}: {}", path.display(), fingerprint);
                Some(fingerprint)
            }
            Err(e) => {
                log::warn!("Failed to hash {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Hash everything readable from `reader`.
    ///
    /// # Errors
    ///
    /// Propagates any read error other than `Interrupted`.
    pub fn hash_reader<R: Read>(&self, mut reader: R) -> io::Result<Fingerprint> {
        let mut hasher = blake3::Hasher::new();
        let mut buffer = vec![0u8; self.chunk_size];

        loop {
            let read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            hasher.update(&buffer[..read]);
        }

        Ok(Fingerprint(*hasher.finalize().as_bytes()))
    }
}
