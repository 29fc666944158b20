// Copyright 2026 Oxide Computer Company

//! Repository provenance types and build-reference pinning.
//!
//! A build that consumes sources from a version-controlled directory is only
//! reproducible if its references record *where* that directory lives: which
//! remote repository, which subpath within it, and which revision. This
//! crate holds the pure half of that story:
//!
//! - [`CanonicalUrl`] reduces the many ways a git remote can be written
//!   (SSH shorthand, HTTPS, with or without credentials or a `.git` suffix)
//!   to one canonical `host/path` form.
//! - [`RepoMetadata`] is the immutable record of detected repository facts:
//!   root directory, repository-relative path, remote URL, revision
//!   identifiers, branches, tags, and commit timestamp.
//! - [`Reference`] is a named buildable or invokable unit;
//!   [`Reference::with_repo_metadata`] rewrites one to point at a specific
//!   revision inside a specific repository subpath.
//!
//! Detection itself (spawning a VCS binary and collecting the raw facts)
//! lives in the companion crate
//! [`git-provenance-vcs`](https://crates.io/crates/git-provenance-vcs),
//! which produces the [`RepoMetadata`] values consumed here.
//!
//! # Examples
//!
//! ```
//! use camino::Utf8PathBuf;
//! use git_provenance::{CanonicalUrl, RepoMetadata, Reference};
//!
//! let remote = "https://user@github.com/acme/widgets.git";
//! let metadata = RepoMetadata {
//!     base_dir: Utf8PathBuf::from("/work/widgets"),
//!     rel_dir: Utf8PathBuf::from("services/api"),
//!     remote_url: Some(remote.into()),
//!     canonical_url: Some(CanonicalUrl::from_remote(remote)),
//!     commit_hash: Some("1234567890abcdef1234567890abcdef12345678".into()),
//!     short_hash: Some("12345678".into()),
//!     branches: vec!["main".into()],
//!     tags: vec!["v1.0".into()],
//!     timestamp: "1700000000".into(),
//! };
//!
//! // Pin a target reference to the detected location. The tag wins over
//! // the branch and the commit hash.
//! let pinned = Reference::target("build").with_repo_metadata(Some(&metadata));
//! assert_eq!(pinned.git_url.as_deref(), Some("github.com/acme/widgets/services/api"));
//! assert_eq!(pinned.tag.as_deref(), Some("v1.0"));
//! ```

#![deny(missing_docs)]

mod canonical;
mod metadata;
mod reference;

pub use canonical::CanonicalUrl;
pub use metadata::RepoMetadata;
pub use reference::{RefKind, Reference};
