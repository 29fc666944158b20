// Copyright 2026 Oxide Computer Company

//! Error types for VCS queries and metadata detection.

use camino::Utf8PathBuf;
use std::{ffi::OsString, io};
use thiserror::Error;

// ---- Environment errors ----

/// An error from reading a VCS binary path from the environment.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VcsEnvError {
    /// The environment variable is set but is not valid UTF-8.
    #[error(
        "${var} environment variable is not valid \
         UTF-8: {value:?}"
    )]
    NonUtf8 {
        /// The environment variable name.
        var: &'static str,
        /// The non-UTF-8 value.
        value: OsString,
    },
}

// ---- Query errors ----

/// An error from a single VCS query.
///
/// Queries are issued through [`RepoQuery`](crate::RepoQuery); the detector
/// decides per fact whether a failed query is fatal or a recorded gap.
/// [`QueryError::Cancelled`] is always fatal.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QueryError {
    /// Failed to spawn the VCS process.
    #[error("failed to run {command:?}")]
    Spawn {
        /// The command line that failed to spawn.
        command: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Failed while waiting for the VCS process to exit.
    #[error("failed waiting for {command:?}")]
    Wait {
        /// The command line being waited on.
        command: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The VCS command ran but exited unsuccessfully.
    #[error("{command:?} failed ({exit_status}): {stderr}")]
    CommandFailed {
        /// The command line that failed.
        command: String,
        /// A human-readable description of the exit status (e.g.,
        /// "exit code 128" or "killed by signal").
        exit_status: String,
        /// The stderr output from the VCS.
        stderr: String,
    },

    /// The VCS command succeeded but produced no output where output was
    /// required.
    #[error("{command:?} produced no output")]
    EmptyOutput {
        /// The command line that produced no output.
        command: String,
    },

    /// The VCS command produced output that is not valid UTF-8.
    #[error("{command:?} produced non-UTF-8 output")]
    NonUtf8Output {
        /// The command line that produced the output.
        command: String,
    },

    /// The governing [`QueryContext`](crate::QueryContext) was cancelled or
    /// passed its deadline before the query completed.
    #[error("query cancelled by caller")]
    Cancelled,
}

// ---- Detection errors ----

/// A fatal error that aborts metadata detection with no result.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DetectError {
    /// No usable version-control binary was found.
    #[error("no usable git binary")]
    NoGitBinary {
        /// The query failure that revealed the missing binary.
        #[source]
        source: QueryError,
    },

    /// The directory is not inside a recognized repository.
    #[error("{dir} is not inside a git repository")]
    NotARepository {
        /// The directory that was queried.
        dir: Utf8PathBuf,
    },

    /// The repository root could not be determined.
    #[error("could not determine the repository root for {dir}")]
    RepositoryRoot {
        /// The directory that was queried.
        dir: Utf8PathBuf,
        /// The underlying query failure.
        #[source]
        source: QueryError,
    },

    /// The VCS reported a repository root that is not an absolute path.
    #[error("repository root {repo_root} is not absolute")]
    RootNotAbsolute {
        /// The reported repository root.
        repo_root: Utf8PathBuf,
    },

    /// The queried directory could not be resolved to an absolute,
    /// symlink-free path.
    #[error("failed to resolve {dir}")]
    ResolveDir {
        /// The directory that failed to resolve.
        dir: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The resolved directory path is not valid UTF-8.
    #[error("resolved path is not valid UTF-8: {path:?}")]
    NonUtf8Path {
        /// The non-UTF-8 resolved path.
        path: std::path::PathBuf,
    },

    /// The resolved directory is not a descendant of the repository root.
    #[error(
        "{dir} is outside the repository rooted at {repo_root} \
         (unexpected non-relative path)"
    )]
    OutsideRepository {
        /// The resolved directory.
        dir: Utf8PathBuf,
        /// The detected repository root.
        repo_root: Utf8PathBuf,
    },

    /// The governing [`QueryContext`](crate::QueryContext) was cancelled or
    /// passed its deadline mid-detection.
    #[error("detection cancelled by caller")]
    Cancelled,
}

/// A non-fatal gap recorded while assembling metadata.
///
/// Each variant names the fact that could not be detected. Detection
/// continues past these: the assembled
/// [`RepoMetadata`](git_provenance::RepoMetadata) simply leaves the
/// corresponding field empty. Absence of tags is never a warning.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DetectWarning {
    /// The remote URL could not be detected or parsed.
    #[error("could not detect remote URL")]
    Remote(#[source] QueryError),

    /// The commit hash could not be detected.
    #[error("could not detect commit hash")]
    Hash(#[source] QueryError),

    /// The abbreviated commit hash could not be detected.
    #[error("could not detect abbreviated commit hash")]
    ShortHash(#[source] QueryError),

    /// The branch could not be detected.
    #[error("could not detect branch")]
    Branch(#[source] QueryError),

    /// The commit timestamp could not be detected.
    #[error("could not detect commit timestamp")]
    Timestamp(#[source] QueryError),
}
