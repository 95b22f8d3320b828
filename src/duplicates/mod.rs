//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Content fingerprint grouping with keeper selection
//! - The duplicate stage that relocates redundant copies

pub mod finder;
pub mod groups;

pub use finder::{DuplicateConfig, DuplicateOutcome, DuplicateStage, DuplicateStats, GroupOutcome};
pub use groups::{group_by_fingerprint, DuplicateGroup, GroupingStats};
