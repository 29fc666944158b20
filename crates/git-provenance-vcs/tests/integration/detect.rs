// Copyright 2026 Oxide Computer Company

//! Integration tests for metadata detection against a real git binary.

use anyhow::Result;
use camino::{Utf8Path, Utf8PathBuf};
use camino_tempfile::Utf8TempDir;
use git_provenance::Reference;
use git_provenance_vcs::{
    DetectError, DetectWarning, Detector, QueryContext,
};
use std::{fs, process::Command};

const REMOTE: &str = "git@github.com:acme/widgets.git";
const CANONICAL: &str = "github.com/acme/widgets";

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// Returns a `Command` for git, respecting the `$GIT` environment variable.
fn git_command() -> Command {
    let bin = std::env::var("GIT").unwrap_or_else(|_| "git".to_string());
    Command::new(bin)
}

/// Runs a git subcommand in `repo_root`, asserting success.
fn git_in(repo_root: &Utf8Path, args: &[&str]) -> Result<()> {
    let status = git_command().args(args).current_dir(repo_root).status()?;
    anyhow::ensure!(status.success(), "git {:?} failed", args);
    Ok(())
}

/// Initializes a git repository with a deterministic branch name and a
/// configured user.
fn init_repo(repo_root: &Utf8Path) -> Result<()> {
    git_in(repo_root, &["init"])?;
    // Pin the branch name regardless of the host's init.defaultBranch.
    git_in(repo_root, &["symbolic-ref", "HEAD", "refs/heads/main"])?;
    git_in(repo_root, &["config", "user.email", "test@example.com"])?;
    git_in(repo_root, &["config", "user.name", "Test User"])?;
    Ok(())
}

/// Writes a file and commits it. Returns the commit hash.
fn commit_file(
    repo_root: &Utf8Path,
    rel_path: &str,
    contents: &str,
) -> Result<String> {
    let path = repo_root.join(rel_path);
    fs::create_dir_all(path.parent().unwrap())?;
    fs::write(&path, contents)?;

    git_in(repo_root, &["add", "."])?;
    git_in(repo_root, &["commit", "-m", "Add file"])?;

    let output = git_command()
        .args(["rev-parse", "HEAD"])
        .current_dir(repo_root)
        .output()?;
    anyhow::ensure!(
        output.status.success(),
        "git rev-parse HEAD failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    Ok(String::from_utf8(output.stdout)?.trim().to_string())
}

/// Sets up a temporary repository with one commit and the test remote.
/// Returns (temp_dir, commit_hash).
fn setup_repo_with_remote() -> Result<(Utf8TempDir, String)> {
    let temp = Utf8TempDir::with_prefix("git-provenance-")?;
    init_repo(temp.path())?;
    let hash = commit_file(temp.path(), "README.md", "widgets\n")?;
    git_in(temp.path(), &["remote", "add", "origin", REMOTE])?;
    Ok((temp, hash))
}

/// Symlink-resolved form of a temp path, for comparison against the
/// repository root git reports (git resolves `/tmp`-style symlinks).
fn resolved(path: &Utf8Path) -> Result<Utf8PathBuf> {
    let resolved = fs::canonicalize(path)?;
    Utf8PathBuf::from_path_buf(resolved)
        .map_err(|path| anyhow::anyhow!("non-UTF-8 path: {:?}", path))
}

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

#[test]
fn test_detect_tagged_commit() -> Result<()> {
    let (temp, hash) = setup_repo_with_remote()?;
    git_in(temp.path(), &["tag", "v1.0"])?;

    let detector = Detector::git()?;
    let detection = detector.detect(&QueryContext::unbounded(), temp.path())?;

    assert!(
        detection.warnings.is_empty(),
        "unexpected warnings: {:?}",
        detection.warnings
    );
    let metadata = &detection.metadata;
    assert_eq!(metadata.base_dir, resolved(temp.path())?);
    assert_eq!(metadata.rel_dir, Utf8PathBuf::from("."));
    assert_eq!(metadata.remote_url.as_deref(), Some(REMOTE));
    assert_eq!(
        metadata.canonical_url.as_ref().map(|u| u.as_str()),
        Some(CANONICAL)
    );
    assert_eq!(metadata.commit_hash.as_deref(), Some(hash.as_str()));

    let short = metadata.short_hash.as_deref().expect("short hash detected");
    assert!(short.len() >= 8, "short hash is at least 8 characters");
    assert!(hash.starts_with(short), "short hash abbreviates the full hash");

    assert_eq!(metadata.branches, vec!["main".to_string()]);
    assert_eq!(metadata.tags, vec!["v1.0".to_string()]);

    let seconds: u64 = metadata.timestamp.parse()?;
    assert!(seconds > 0, "commit timestamp is a positive epoch time");
    Ok(())
}

#[test]
fn test_detect_subdirectory() -> Result<()> {
    let (temp, _hash) = setup_repo_with_remote()?;
    commit_file(temp.path(), "services/api/main.rs", "fn main() {}\n")?;
    let subdir = temp.path().join("services").join("api");

    let detector = Detector::git()?;
    let detection = detector.detect(&QueryContext::unbounded(), &subdir)?;

    assert_eq!(
        detection.metadata.rel_dir,
        Utf8PathBuf::from("services/api"),
        "rel dir is the slash-joined path below the root"
    );
    assert_eq!(detection.metadata.base_dir, resolved(temp.path())?);
    Ok(())
}

#[test]
fn test_detect_without_remote_warns_and_keeps_going() -> Result<()> {
    let temp = Utf8TempDir::with_prefix("git-provenance-")?;
    init_repo(temp.path())?;
    commit_file(temp.path(), "README.md", "widgets\n")?;

    let detector = Detector::git()?;
    let detection = detector.detect(&QueryContext::unbounded(), temp.path())?;

    assert!(
        detection
            .warnings
            .iter()
            .any(|w| matches!(w, DetectWarning::Remote(_))),
        "missing remote must be reported: {:?}",
        detection.warnings
    );
    assert_eq!(detection.metadata.remote_url, None);
    assert_eq!(detection.metadata.canonical_url, None);
    assert!(
        detection.metadata.commit_hash.is_some(),
        "the rest of the metadata is still populated"
    );
    Ok(())
}

#[test]
fn test_detect_empty_repository_is_partial() -> Result<()> {
    let temp = Utf8TempDir::with_prefix("git-provenance-")?;
    init_repo(temp.path())?;
    // No commits: HEAD does not resolve.

    let detector = Detector::git()?;
    let detection = detector.detect(&QueryContext::unbounded(), temp.path())?;

    assert_eq!(detection.metadata.commit_hash, None);
    assert_eq!(detection.metadata.timestamp, "0");
    assert!(detection.metadata.tags.is_empty());
    assert!(
        detection
            .warnings
            .iter()
            .any(|w| matches!(w, DetectWarning::Hash(_))),
        "an unresolvable HEAD must be reported: {:?}",
        detection.warnings
    );
    Ok(())
}

#[test]
fn test_detect_outside_any_repository() -> Result<()> {
    let temp = Utf8TempDir::with_prefix("git-provenance-")?;

    let detector = Detector::git()?;
    let err = detector
        .detect(&QueryContext::unbounded(), temp.path())
        .unwrap_err();
    assert!(
        matches!(err, DetectError::NotARepository { .. }),
        "expected NotARepository, got {err:?}"
    );
    Ok(())
}

#[test]
fn test_detect_cancelled_context() -> Result<()> {
    let (temp, _hash) = setup_repo_with_remote()?;

    let ctx = QueryContext::unbounded();
    ctx.cancel();
    let detector = Detector::git()?;
    let err = detector.detect(&ctx, temp.path()).unwrap_err();
    assert!(
        matches!(err, DetectError::Cancelled),
        "expected Cancelled, got {err:?}"
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Reference rewriting end to end
// ---------------------------------------------------------------------------

#[test]
fn test_rewrite_pins_to_tag() -> Result<()> {
    let (temp, _hash) = setup_repo_with_remote()?;
    git_in(temp.path(), &["tag", "v2.0"])?;

    let detector = Detector::git()?;
    let detection = detector.detect(&QueryContext::unbounded(), temp.path())?;

    let pinned =
        Reference::target("build").with_repo_metadata(Some(&detection.metadata));
    assert_eq!(pinned.git_url.as_deref(), Some(CANONICAL));
    assert_eq!(pinned.tag.as_deref(), Some("v2.0"), "tag beats branch");
    Ok(())
}

#[test]
fn test_rewrite_pins_subdir_to_branch() -> Result<()> {
    let (temp, _hash) = setup_repo_with_remote()?;
    commit_file(temp.path(), "services/api/main.rs", "fn main() {}\n")?;
    let subdir = temp.path().join("services").join("api");

    let detector = Detector::git()?;
    let detection = detector.detect(&QueryContext::unbounded(), &subdir)?;

    let pinned =
        Reference::target("build").with_repo_metadata(Some(&detection.metadata));
    assert_eq!(
        pinned.git_url.as_deref(),
        Some("github.com/acme/widgets/services/api"),
        "the rel dir extends the canonical URL"
    );
    assert_eq!(
        pinned.tag.as_deref(),
        Some("main"),
        "an untagged commit pins to the branch"
    );
    Ok(())
}

#[test]
fn test_rewrite_without_remote_is_identity() -> Result<()> {
    let temp = Utf8TempDir::with_prefix("git-provenance-")?;
    init_repo(temp.path())?;
    commit_file(temp.path(), "README.md", "widgets\n")?;

    let detector = Detector::git()?;
    let detection = detector.detect(&QueryContext::unbounded(), temp.path())?;

    let reference = Reference::command("deploy");
    assert_eq!(
        reference.with_repo_metadata(Some(&detection.metadata)),
        reference,
        "no remote means the reference travels unchanged"
    );
    Ok(())
}

#[test]
fn test_stripped_metadata_still_pins() -> Result<()> {
    let (temp, hash) = setup_repo_with_remote()?;

    let detector = Detector::git()?;
    let detection = detector.detect(&QueryContext::unbounded(), temp.path())?;
    let stripped = detection.metadata.stripped();

    assert_eq!(stripped.remote_url, None);
    assert!(stripped.tags.is_empty());
    assert!(stripped.timestamp.is_empty());
    assert_eq!(stripped.commit_hash.as_deref(), Some(hash.as_str()));

    // Location-identifying fields are enough to pin a reference.
    let pinned =
        Reference::target("build").with_repo_metadata(Some(&stripped));
    assert_eq!(pinned.git_url.as_deref(), Some(CANONICAL));
    assert_eq!(pinned.tag.as_deref(), Some("main"));
    Ok(())
}
