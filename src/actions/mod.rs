//! File actions module.
//!
//! This module provides functionality for:
//! - Collision-safe naming inside a destination folder
//! - Moving files with a copy + remove fallback across devices
//! - Batch accounting of moves and failures
//!
//! Nothing here deletes content: "removing" a file from the scanned tree
//! always means relocating it.
//!
//! ```no_run
//! use mediasweep::actions::relocate::{ensure_dir, relocate_into};
//! use std::path::Path;
//!
//! let dest = Path::new("/photos/corrupted");
//! ensure_dir(dest).unwrap();
//! let result = relocate_into(Path::new("/photos/broken.png"), dest);
//! ```

pub mod relocate;

// Re-export commonly used types
pub use relocate::{
    ensure_dir, move_file, relocate_into, resolve_conflict, BatchMoveResult, MoveError,
    MoveResult,
};
