// Copyright 2026 Oxide Computer Company

//! Repository metadata record.

use crate::CanonicalUrl;
use camino::Utf8PathBuf;

/// Version-control metadata detected for a directory.
///
/// Assembled once per query by `git-provenance-vcs` and read-only
/// thereafter. Fields describing facts the VCS could not report are `None`
/// (or empty, for the list fields); a partially populated record is still a
/// valid record.
///
/// # Invariants
///
/// - `base_dir` is absolute.
/// - `rel_dir` is `.` (the queried directory was the repository root
///   itself) or a descendant path relative to `base_dir`, with
///   forward-slash separators.
/// - `canonical_url` is present exactly when `remote_url` is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepoMetadata {
    /// Absolute path of the repository root.
    pub base_dir: Utf8PathBuf,
    /// Path of the queried directory relative to `base_dir`; `.` for the
    /// root itself.
    pub rel_dir: Utf8PathBuf,
    /// Raw remote URL as reported by the VCS.
    pub remote_url: Option<String>,
    /// Normalized `host/path` form of `remote_url`.
    pub canonical_url: Option<CanonicalUrl>,
    /// Full revision identifier of the current commit.
    pub commit_hash: Option<String>,
    /// Abbreviated (8-character) revision identifier.
    pub short_hash: Option<String>,
    /// Branch names pointing at the current revision. Commonly zero or one
    /// entries.
    pub branches: Vec<String>,
    /// Tag names exactly matching the current revision.
    pub tags: Vec<String>,
    /// Commit time as decimal seconds since the epoch; `"0"` when the time
    /// could not be determined, empty on a stripped copy.
    pub timestamp: String,
}

impl RepoMetadata {
    /// Returns a copy reduced to location-identifying fields.
    ///
    /// The copy keeps `base_dir`, `rel_dir`, `canonical_url`, `commit_hash`,
    /// and `branches`; it clears `remote_url`, `short_hash`, `tags`, and
    /// `timestamp`. Use it when metadata needs to travel without its full
    /// provenance.
    pub fn stripped(&self) -> RepoMetadata {
        RepoMetadata {
            base_dir: self.base_dir.clone(),
            rel_dir: self.rel_dir.clone(),
            remote_url: None,
            canonical_url: self.canonical_url.clone(),
            commit_hash: self.commit_hash.clone(),
            short_hash: None,
            branches: self.branches.clone(),
            tags: Vec::new(),
            timestamp: String::new(),
        }
    }
}
