// Copyright 2026 Oxide Computer Company

//! Build reference types and remote-location rewriting.

use crate::RepoMetadata;
use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;

/// The role a reference plays.
///
/// The variant set is closed: every reference is either a buildable target
/// or an invokable command, and both share the same location fields. Adding
/// a variant here is a compile-time concern for every consumer that matches
/// on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RefKind {
    /// A buildable target.
    Target,
    /// An invokable command.
    Command,
}

impl fmt::Display for RefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefKind::Target => write!(f, "target"),
            RefKind::Command => write!(f, "command"),
        }
    }
}

/// A named buildable or invokable unit, optionally bound to a remote
/// location and revision selector.
///
/// The remote-location triple is `git_url` + `tag` + `local_path`. A
/// reference with no `git_url` names a unit in the local project only;
/// [`Reference::with_repo_metadata`] populates the triple from detected
/// repository metadata.
///
/// # Examples
///
/// ```
/// use git_provenance::{RefKind, Reference};
///
/// let reference = Reference::target("build");
/// assert_eq!(reference.kind, RefKind::Target);
/// assert_eq!(reference.name, "build");
/// assert_eq!(reference.git_url, None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reference {
    /// Which role this reference plays.
    pub kind: RefKind,
    /// The name of the unit within its location.
    pub name: String,
    /// Remote repository location in canonical `host/path` form, possibly
    /// extended with a repository subpath.
    pub git_url: Option<String>,
    /// Revision selector: a tag, branch, or commit hash pinning the
    /// reference to a specific revision.
    pub tag: Option<String>,
    /// Local path of the unit, carried through rewrites verbatim.
    pub local_path: Option<Utf8PathBuf>,
    /// Import alias the reference was reached through, carried through
    /// rewrites verbatim.
    pub import_ref: Option<String>,
}

impl Reference {
    /// Creates a buildable-target reference with the given name and no
    /// location.
    pub fn target(name: impl Into<String>) -> Self {
        Reference {
            kind: RefKind::Target,
            name: name.into(),
            git_url: None,
            tag: None,
            local_path: None,
            import_ref: None,
        }
    }

    /// Creates an invokable-command reference with the given name and no
    /// location.
    pub fn command(name: impl Into<String>) -> Self {
        Reference { kind: RefKind::Command, ..Reference::target(name) }
    }

    /// Returns a copy of this reference with its remote location populated
    /// from detected repository metadata.
    ///
    /// If `metadata` is `None` or carries no canonical URL, no remote is
    /// known and the reference is returned unchanged. Otherwise the new
    /// reference points at the metadata's canonical URL joined with its
    /// repository-relative directory, pinned to a revision selector chosen
    /// by priority: an explicit `tag` already set on this reference, else
    /// the metadata's first tag, else its first branch, else its full
    /// commit hash.
    ///
    /// `kind`, `name`, `local_path`, and `import_ref` are copied verbatim.
    /// The input is never mutated.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8PathBuf;
    /// use git_provenance::{CanonicalUrl, RepoMetadata, Reference};
    ///
    /// let metadata = RepoMetadata {
    ///     base_dir: Utf8PathBuf::from("/work/widgets"),
    ///     rel_dir: Utf8PathBuf::from("buildkit"),
    ///     remote_url: Some("git@github.com:acme/widgets.git".into()),
    ///     canonical_url: Some(CanonicalUrl::from_remote(
    ///         "git@github.com:acme/widgets.git",
    ///     )),
    ///     commit_hash: None,
    ///     short_hash: None,
    ///     branches: vec!["main".into()],
    ///     tags: vec![],
    ///     timestamp: "0".into(),
    /// };
    ///
    /// let pinned = Reference::target("build").with_repo_metadata(Some(&metadata));
    /// assert_eq!(pinned.git_url.as_deref(), Some("github.com/acme/widgets/buildkit"));
    /// assert_eq!(pinned.tag.as_deref(), Some("main"));
    /// ```
    pub fn with_repo_metadata(
        &self,
        metadata: Option<&RepoMetadata>,
    ) -> Reference {
        let Some(metadata) = metadata else {
            return self.clone();
        };
        let Some(canonical) = &metadata.canonical_url else {
            return self.clone();
        };
        if canonical.is_empty() {
            return self.clone();
        }

        let git_url = join_rel_dir(canonical.as_str(), &metadata.rel_dir);

        let tag = match &self.tag {
            // The caller already pinned a revision explicitly.
            Some(tag) if !tag.is_empty() => Some(tag.clone()),
            _ => metadata
                .tags
                .first()
                .or_else(|| metadata.branches.first())
                .cloned()
                .or_else(|| metadata.commit_hash.clone()),
        };

        Reference {
            kind: self.kind,
            name: self.name.clone(),
            git_url: Some(git_url),
            tag,
            local_path: self.local_path.clone(),
            import_ref: self.import_ref.clone(),
        }
    }
}

/// Joins a canonical URL with a repository-relative directory.
///
/// `rel_dir` values of `""` and `.` both name the repository root and leave
/// the URL untouched.
fn join_rel_dir(canonical: &str, rel_dir: &Utf8Path) -> String {
    if rel_dir.as_str().is_empty() || rel_dir == Utf8Path::new(".") {
        canonical.to_owned()
    } else {
        format!("{}/{}", canonical, rel_dir)
    }
}
