// Copyright 2026 Oxide Computer Company

//! Canonical remote URL type.

use std::fmt;

/// A remote URL reduced to canonical `host/path` form.
///
/// Git remotes are written in several syntaxes that all name the same
/// repository:
///
/// - `scheme://[user@]host/path[.git]` (HTTPS, git protocol, ssh://)
/// - `[user@]host:path[.git]` (SSH shorthand)
///
/// This type holds the one form they all reduce to: no transport scheme, no
/// embedded credentials, no trailing `.git`.
///
/// # Examples
///
/// ```
/// use git_provenance::CanonicalUrl;
///
/// let url = CanonicalUrl::from_remote("git@github.com:acme/widgets.git");
/// assert_eq!(url.as_str(), "github.com/acme/widgets");
///
/// let url = CanonicalUrl::from_remote("https://user@github.com/acme/widgets.git");
/// assert_eq!(url.as_str(), "github.com/acme/widgets");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CanonicalUrl(String);

impl CanonicalUrl {
    /// Normalizes a raw remote URL into canonical form.
    ///
    /// The reduction proceeds in order:
    ///
    /// 1. Drop everything up to and including the first `://`.
    /// 2. Drop everything up to and including the first `@` (embedded
    ///    user info).
    /// 3. Replace the first remaining `:` with `/` (turns SSH-style
    ///    `host:path` into `host/path`; a no-op for URLs already using `/`).
    /// 4. Strip one trailing `.git` suffix.
    ///
    /// This function is total: malformed input passes through with no
    /// meaningful change, and input already in canonical form is returned
    /// unchanged.
    pub fn from_remote(remote: &str) -> Self {
        let s = match remote.split_once("://") {
            Some((_, rest)) => rest,
            None => remote,
        };
        let s = match s.split_once('@') {
            Some((_, rest)) => rest,
            None => s,
        };
        let s = s.replacen(':', "/", 1);
        let s = s.strip_suffix(".git").unwrap_or(&s);
        CanonicalUrl(s.to_owned())
    }

    /// Returns the canonical URL as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns whether the canonical URL is empty.
    ///
    /// An empty canonical URL means no usable remote is known; rewriting a
    /// reference against it is meaningless.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
