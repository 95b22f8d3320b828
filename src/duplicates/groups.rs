//! Fingerprint grouping and keeper selection.
//!
//! # Overview
//!
//! Files sharing a [`Fingerprint`] form a [`DuplicateGroup`]. Members are
//! ordered by their path string (byte-wise lexicographic), and the first
//! member is the *keeper*: the one copy that is never relocated. Only groups
//! with two or more members are actionable.
//!
//! # Example
//!
//! ```
//! use mediasweep::duplicates::group_by_fingerprint;
//! use mediasweep::scanner::{Fingerprint, MediaFile, MediaKind};
//! use std::path::PathBuf;
//!
//! let fp = Fingerprint::from_bytes([7; 32]);
//! let entries = vec![
//!     (MediaFile::new(PathBuf::from("/b.jpg"), MediaKind::Jpeg, 10), fp),
//!     (MediaFile::new(PathBuf::from("/a.jpg"), MediaKind::Jpeg, 10), fp),
//! ];
//!
//! let (groups, stats) = group_by_fingerprint(entries);
//!
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0].keeper().path, PathBuf::from("/a.jpg"));
//! assert_eq!(stats.duplicate_files, 1);
//! ```

use std::collections::HashMap;
use std::path::Path;

use crate::scanner::{Fingerprint, MediaFile};

/// Files that share one content fingerprint.
///
/// Invariant: `files` is non-empty and sorted by path string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// Shared content fingerprint
    pub fingerprint: Fingerprint,
    /// Members, keeper first
    pub files: Vec<MediaFile>,
}

/// Ordering used for keeper selection: the raw path string.
fn path_order(a: &Path, b: &Path) -> std::cmp::Ordering {
    a.as_os_str().cmp(b.as_os_str())
}

impl DuplicateGroup {
    /// Create a group, sorting members by path.
    ///
    /// Returns `None` for an empty member list.
    #[must_use]
    pub fn new(fingerprint: Fingerprint, mut files: Vec<MediaFile>) -> Option<Self> {
        if files.is_empty() {
            return None;
        }
        files.sort_by(|a, b| path_order(&a.path, &b.path));
        Some(Self { fingerprint, files })
    }

    /// The member that stays in place.
    #[must_use]
    pub fn keeper(&self) -> &MediaFile {
        &self.files[0]
    }

    /// Every member except the keeper.
    #[must_use]
    pub fn duplicates(&self) -> &[MediaFile] {
        &self.files[1..]
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if the group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Whether the group has anything to relocate.
    #[must_use]
    pub fn is_actionable(&self) -> bool {
        self.files.len() > 1
    }

    /// Bytes held by the non-keeper members.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.duplicates().iter().map(|f| f.size).sum()
    }
}

/// Statistics from fingerprint grouping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Fingerprinted files that entered grouping
    pub total_files: usize,
    /// Distinct fingerprints seen
    pub unique_fingerprints: usize,
    /// Actionable groups (2+ members)
    pub duplicate_groups: usize,
    /// Non-keeper members across actionable groups
    pub duplicate_files: usize,
    /// Bytes held by non-keeper members
    pub wasted_space: u64,
}

/// Group fingerprinted files, keeping only actionable groups.
///
/// Groups come back ordered by keeper path, so processing order is the same
/// on every run over the same tree.
#[must_use]
pub fn group_by_fingerprint(
    entries: impl IntoIterator<Item = (MediaFile, Fingerprint)>,
) -> (Vec<DuplicateGroup>, GroupingStats) {
    let mut by_fingerprint: HashMap<Fingerprint, Vec<MediaFile>> = HashMap::new();
    let mut stats = GroupingStats::default();

    for (file, fingerprint) in entries {
        stats.total_files += 1;
        by_fingerprint.entry(fingerprint).or_default().push(file);
    }
    stats.unique_fingerprints = by_fingerprint.len();

    let mut groups: Vec<DuplicateGroup> = by_fingerprint
        .into_iter()
        .filter(|(_, files)| files.len() > 1)
        .filter_map(|(fingerprint, files)| DuplicateGroup::new(fingerprint, files))
        .collect();
    groups.sort_by(|a, b| path_order(&a.keeper().path, &b.keeper().path));

    for group in &groups {
        stats.duplicate_groups += 1;
        stats.duplicate_files += group.duplicates().len();
        stats.wasted_space += group.wasted_space();
        log::debug!(
            "Group {:?}: {} member(s), keeper {}",
            group.fingerprint,
            group.len(),
            group.keeper().path.display()
        );
    }

    log::info!(
        "Grouping complete: {} file(s) → {} duplicate group(s), {} redundant",
        stats.total_files,
        stats.duplicate_groups,
        stats.duplicate_files
    );

    (groups, stats)
}
