// Copyright 2026 Oxide Computer Company

//! Metadata detection: assembling a [`RepoMetadata`] record for a directory.

use crate::{
    DetectError, DetectWarning, GitCli, QueryContext, QueryError, RepoQuery,
    VcsEnvError,
};
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use git_provenance::{CanonicalUrl, RepoMetadata};

/// The outcome of a successful (possibly partial) detection.
///
/// Detection distinguishes two failure severities. Fatal conditions (no
/// binary, not a repository, a directory outside the repository root) abort
/// with a [`DetectError`] and no result. Per-fact gaps (no remote
/// configured, no commits yet) leave the corresponding metadata field empty
/// and are recorded here as warnings; callers inspect the warnings, and the
/// empty fields, to decide whether the gaps matter to them.
#[derive(Debug)]
pub struct Detection {
    /// The assembled metadata, populated best-effort.
    pub metadata: RepoMetadata,
    /// Non-fatal per-fact gaps, in the order they were encountered.
    pub warnings: Vec<DetectWarning>,
}

/// Detects version-control metadata for directories.
///
/// Wraps a [`RepoQuery`] collaborator and assembles its raw facts into
/// [`RepoMetadata`] records. The detector itself never spawns a process;
/// all external interaction goes through the collaborator.
///
/// # Examples
///
/// ```no_run
/// use git_provenance_vcs::{Detector, QueryContext};
///
/// let detector = Detector::git().expect("$GIT is unset or valid UTF-8");
/// let detection = detector
///     .detect(&QueryContext::unbounded(), "services/api")
///     .expect("directory is inside a git repository");
///
/// for warning in &detection.warnings {
///     eprintln!("warning: {warning}");
/// }
/// println!("remote: {:?}", detection.metadata.canonical_url);
/// ```
#[derive(Debug, Clone)]
pub struct Detector<Q> {
    query: Q,
}

impl Detector<GitCli> {
    /// Creates a detector backed by the default git CLI adapter.
    ///
    /// Returns an error if the `$GIT` environment variable is set but is
    /// not valid UTF-8.
    pub fn git() -> Result<Self, VcsEnvError> {
        Ok(Detector::new(GitCli::new()?))
    }
}

impl<Q: RepoQuery> Detector<Q> {
    /// Creates a detector over the given query collaborator.
    pub fn new(query: Q) -> Self {
        Detector { query }
    }

    /// Returns the query collaborator.
    pub fn query(&self) -> &Q {
        &self.query
    }

    /// Detects version-control metadata for `dir`.
    ///
    /// Preflight failures (no usable binary, `dir` not inside a
    /// repository) and structural failures (the resolved directory falling
    /// outside the reported repository root) are fatal. Individual fact
    /// queries that fail (remote URL, commit hash, short hash, branches,
    /// timestamp) are recorded as [`Detection::warnings`] and leave their
    /// field empty; a failed tag query reads as "no tags" and is not
    /// recorded at all.
    ///
    /// Cancellation of `ctx` at any point aborts with
    /// [`DetectError::Cancelled`], never with a detection-specific error.
    pub fn detect(
        &self,
        ctx: &QueryContext,
        dir: impl AsRef<Utf8Path>,
    ) -> Result<Detection, DetectError> {
        let dir = dir.as_ref();

        self.query.ensure_available(ctx).map_err(|err| match err {
            QueryError::Cancelled => DetectError::Cancelled,
            err => DetectError::NoGitBinary { source: err },
        })?;

        match self.query.is_repository(ctx, dir) {
            Ok(true) => {}
            Err(QueryError::Cancelled) => return Err(DetectError::Cancelled),
            // The binary preflight already passed; a query that cannot
            // even run here means the directory itself is unusable.
            Ok(false) | Err(_) => {
                return Err(DetectError::NotARepository {
                    dir: dir.to_owned(),
                });
            }
        }

        let base_dir =
            self.query.repository_root(ctx, dir).map_err(|err| match err {
                QueryError::Cancelled => DetectError::Cancelled,
                err => DetectError::RepositoryRoot {
                    dir: dir.to_owned(),
                    source: err,
                },
            })?;

        let mut warnings = Vec::new();

        let remote_url = optional(
            self.query.remote_url(ctx, dir),
            DetectWarning::Remote,
            &mut warnings,
        )?;
        let commit_hash = optional(
            self.query.commit_hash(ctx, dir),
            DetectWarning::Hash,
            &mut warnings,
        )?;
        let short_hash = optional(
            self.query.short_commit_hash(ctx, dir),
            DetectWarning::ShortHash,
            &mut warnings,
        )?;
        let branches = optional(
            self.query.current_branches(ctx, dir),
            DetectWarning::Branch,
            &mut warnings,
        )?
        .unwrap_or_default();

        // An untagged commit is the common case; a failed tag query reads
        // as "no tags".
        let tags = match self.query.tags_at_head(ctx, dir) {
            Ok(tags) => tags,
            Err(QueryError::Cancelled) => return Err(DetectError::Cancelled),
            Err(_) => Vec::new(),
        };

        let timestamp = optional(
            self.query.commit_timestamp(ctx, dir),
            DetectWarning::Timestamp,
            &mut warnings,
        )?
        .unwrap_or_else(|| "0".to_owned());

        let canonical_url =
            remote_url.as_deref().map(CanonicalUrl::from_remote);

        let rel_dir = rel_dir(&base_dir, dir)?;

        Ok(Detection {
            metadata: RepoMetadata {
                base_dir,
                rel_dir,
                remote_url,
                canonical_url,
                commit_hash,
                short_hash,
                branches,
                tags,
                timestamp,
            },
            warnings,
        })
    }
}

/// Folds a per-fact query result into an optional value, recording
/// failures as warnings. Cancellation is never downgraded to a warning.
fn optional<T>(
    result: Result<T, QueryError>,
    warning: fn(QueryError) -> DetectWarning,
    warnings: &mut Vec<DetectWarning>,
) -> Result<Option<T>, DetectError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(QueryError::Cancelled) => Err(DetectError::Cancelled),
        Err(err) => {
            warnings.push(warning(err));
            Ok(None)
        }
    }
}

/// Computes `dir`'s path relative to the repository root.
///
/// `dir` is resolved to an absolute, symlink-free path first, then compared
/// against `base_dir` component by component. The root itself yields `.`;
/// a resolved path that is not a descendant of `base_dir` is fatal.
fn rel_dir(
    base_dir: &Utf8Path,
    dir: &Utf8Path,
) -> Result<Utf8PathBuf, DetectError> {
    if !base_dir.is_absolute() {
        return Err(DetectError::RootNotAbsolute {
            repo_root: base_dir.to_owned(),
        });
    }
    let resolved =
        fs::canonicalize(dir).map_err(|source| DetectError::ResolveDir {
            dir: dir.to_owned(),
            source,
        })?;
    let resolved = Utf8PathBuf::from_path_buf(resolved)
        .map_err(|path| DetectError::NonUtf8Path { path })?;

    if let Ok(rel) = resolved.strip_prefix(base_dir) {
        if rel.as_str().is_empty() {
            return Ok(Utf8PathBuf::from("."));
        }
        return Ok(rel.to_owned());
    }
    Err(DetectError::OutsideRepository {
        dir: resolved,
        repo_root: base_dir.to_owned(),
    })
}
