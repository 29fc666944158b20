// Copyright 2026 Oxide Computer Company

//! Git metadata detection for repository provenance.
//!
//! This crate answers one question: for a given directory, what does the
//! version-control system know about it? The answer is a
//! [`RepoMetadata`](git_provenance::RepoMetadata) record holding the
//! repository root, repository-relative path, remote URL (raw and
//! canonical), commit hash, branches, tags, and commit timestamp, assembled
//! by [`Detector`] from a bounded sequence of queries against the `git`
//! binary.
//!
//! Detection is best-effort by design. A directory with no remote
//! configured, or no commits yet, still yields a usable record; each fact
//! the VCS could not report is left empty and surfaced as a
//! [`DetectWarning`] alongside the result. Only structural problems abort:
//! no usable binary, a directory outside any repository, or a directory
//! that resolves outside the reported repository root.
//!
//! Process spawning is confined to [`GitCli`]; the [`Detector`] itself only
//! talks to the [`RepoQuery`] trait, so tests (and alternative VCS
//! frontends) supply their own collaborator. Every query is bounded by a
//! caller-supplied [`QueryContext`] carrying an optional deadline and a
//! cancel flag; cancellation kills in-flight child processes.
//!
//! # Examples
//!
//! ```no_run
//! use git_provenance::Reference;
//! use git_provenance_vcs::{Detector, QueryContext};
//! use std::time::Duration;
//!
//! let detector = Detector::git().expect("$GIT is unset or valid UTF-8");
//! let ctx = QueryContext::with_timeout(Duration::from_secs(10));
//! let detection = detector.detect(&ctx, ".").expect("inside a repository");
//!
//! // Pin a build reference to the detected repository location.
//! let pinned = Reference::target("build")
//!     .with_repo_metadata(Some(&detection.metadata));
//! println!("{:?} @ {:?}", pinned.git_url, pinned.tag);
//! ```

#![deny(missing_docs)]

mod context;
mod detect;
mod errors;
mod query;

pub use context::QueryContext;
pub use detect::{Detection, Detector};
pub use errors::{DetectError, DetectWarning, QueryError, VcsEnvError};
pub use query::{GitCli, RepoQuery};
