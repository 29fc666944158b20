// Copyright 2026 Oxide Computer Company

//! The version-control query collaborator and its git CLI adapter.

use crate::{QueryContext, QueryError, VcsEnvError};
use camino::{Utf8Path, Utf8PathBuf};
use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

/// How often an in-flight child process is polled for exit and the
/// governing context re-checked.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Reads a VCS binary path from an environment variable, falling back
/// to `default` if the variable is unset or empty.
///
/// The value is trimmed of leading and trailing whitespace.
///
/// Returns an error if the variable is set but is not valid UTF-8.
fn binary_from_env(
    var: &'static str,
    default: &str,
) -> Result<String, VcsEnvError> {
    match std::env::var(var) {
        Ok(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                Ok(default.to_owned())
            } else {
                Ok(trimmed.to_owned())
            }
        }
        Err(std::env::VarError::NotPresent) => Ok(default.to_owned()),
        Err(std::env::VarError::NotUnicode(value)) => {
            Err(VcsEnvError::NonUtf8 { var, value })
        }
    }
}

/// The version-control query collaborator.
///
/// One method per fact the detector needs, plus an availability preflight.
/// Each query is independent of the others and bounded by the passed
/// [`QueryContext`]; a cancelled context makes a query fail with
/// [`QueryError::Cancelled`].
///
/// The production implementation is [`GitCli`]. Tests implement this trait
/// with an in-memory stub, which keeps the detector free of any
/// process-spawning concern.
pub trait RepoQuery {
    /// Checks that the VCS binary can be invoked at all.
    fn ensure_available(&self, ctx: &QueryContext) -> Result<(), QueryError>;

    /// Returns whether `dir` is inside a recognized repository.
    fn is_repository(
        &self,
        ctx: &QueryContext,
        dir: &Utf8Path,
    ) -> Result<bool, QueryError>;

    /// Returns the absolute path of the repository root containing `dir`.
    fn repository_root(
        &self,
        ctx: &QueryContext,
        dir: &Utf8Path,
    ) -> Result<Utf8PathBuf, QueryError>;

    /// Returns the configured remote URL for `dir`'s repository.
    fn remote_url(
        &self,
        ctx: &QueryContext,
        dir: &Utf8Path,
    ) -> Result<String, QueryError>;

    /// Returns the full revision identifier of the current commit.
    fn commit_hash(
        &self,
        ctx: &QueryContext,
        dir: &Utf8Path,
    ) -> Result<String, QueryError>;

    /// Returns the abbreviated (8-character) revision identifier of the
    /// current commit.
    fn short_commit_hash(
        &self,
        ctx: &QueryContext,
        dir: &Utf8Path,
    ) -> Result<String, QueryError>;

    /// Returns the branch names pointing at the current revision.
    fn current_branches(
        &self,
        ctx: &QueryContext,
        dir: &Utf8Path,
    ) -> Result<Vec<String>, QueryError>;

    /// Returns the tag names exactly matching the current revision.
    fn tags_at_head(
        &self,
        ctx: &QueryContext,
        dir: &Utf8Path,
    ) -> Result<Vec<String>, QueryError>;

    /// Returns the commit time as decimal seconds since the epoch,
    /// defaulting to `"0"` when the time cannot be determined.
    fn commit_timestamp(
        &self,
        ctx: &QueryContext,
        dir: &Utf8Path,
    ) -> Result<String, QueryError>;
}

/// [`RepoQuery`] implementation that spawns the `git` binary.
///
/// The binary defaults to `"git"` and can be overridden through the `$GIT`
/// environment variable (see [`GitCli::new`]) or explicitly (see
/// [`GitCli::with_binary`]). Each fact maps to one git subcommand, run with
/// the queried directory as its working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCli {
    binary: String,
}

impl GitCli {
    /// Creates a git adapter using the `$GIT` environment variable or
    /// `"git"`.
    ///
    /// Returns an error if the `$GIT` environment variable is set but is
    /// not valid UTF-8.
    pub fn new() -> Result<Self, VcsEnvError> {
        let binary = binary_from_env("GIT", "git")?;
        Ok(GitCli { binary })
    }

    /// Creates a git adapter invoking the given binary.
    pub fn with_binary(binary: impl Into<String>) -> Self {
        GitCli { binary: binary.into() }
    }

    /// Returns the path to the git binary.
    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Renders the command line for error messages.
    fn command_line(&self, args: &[&str]) -> String {
        let mut line = self.binary.clone();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    /// Runs a git subcommand and returns its full stdout.
    ///
    /// The context is observed before spawning and while waiting: an
    /// in-flight child is killed once the context is cancelled or past its
    /// deadline. The outputs read here are single lines, far below the pipe
    /// buffer, so the child cannot block on a full pipe before exiting.
    fn run(
        &self,
        ctx: &QueryContext,
        dir: Option<&Utf8Path>,
        args: &[&str],
    ) -> Result<String, QueryError> {
        let command = self.command_line(args);
        if ctx.is_cancelled() {
            return Err(QueryError::Cancelled);
        }

        let mut cmd = Command::new(&self.binary);
        if let Some(dir) = dir {
            cmd.current_dir(dir);
        }
        let mut child = cmd
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| QueryError::Spawn {
                command: command.clone(),
                source,
            })?;

        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {}
                Err(source) => {
                    return Err(QueryError::Wait { command, source });
                }
            }
            if ctx.is_cancelled() {
                let _ = child.kill();
                let _ = child.wait();
                return Err(QueryError::Cancelled);
            }
            thread::sleep(POLL_INTERVAL);
        };

        let mut stdout = Vec::new();
        if let Some(mut pipe) = child.stdout.take() {
            pipe.read_to_end(&mut stdout).map_err(|source| {
                QueryError::Wait { command: command.clone(), source }
            })?;
        }

        if !status.success() {
            let mut stderr = Vec::new();
            if let Some(mut pipe) = child.stderr.take() {
                let _ = pipe.read_to_end(&mut stderr);
            }
            return Err(QueryError::CommandFailed {
                command,
                exit_status: status.to_string(),
                stderr: String::from_utf8_lossy(&stderr).trim().to_owned(),
            });
        }

        String::from_utf8(stdout)
            .map_err(|_| QueryError::NonUtf8Output { command })
    }

    /// Runs a git subcommand and returns the first line of its stdout,
    /// which must be non-empty.
    fn run_line(
        &self,
        ctx: &QueryContext,
        dir: &Utf8Path,
        args: &[&str],
    ) -> Result<String, QueryError> {
        let output = self.run(ctx, Some(dir), args)?;
        match output.lines().next() {
            Some(line) if !line.is_empty() => Ok(line.to_owned()),
            _ => Err(QueryError::EmptyOutput {
                command: self.command_line(args),
            }),
        }
    }
}

impl RepoQuery for GitCli {
    fn ensure_available(&self, ctx: &QueryContext) -> Result<(), QueryError> {
        self.run(ctx, None, &["--version"]).map(|_| ())
    }

    fn is_repository(
        &self,
        ctx: &QueryContext,
        dir: &Utf8Path,
    ) -> Result<bool, QueryError> {
        match self.run(ctx, Some(dir), &["status"]) {
            Ok(_) => Ok(true),
            Err(QueryError::CommandFailed { .. }) => Ok(false),
            Err(err) => Err(err),
        }
    }

    fn repository_root(
        &self,
        ctx: &QueryContext,
        dir: &Utf8Path,
    ) -> Result<Utf8PathBuf, QueryError> {
        self.run_line(ctx, dir, &["rev-parse", "--show-toplevel"])
            .map(Utf8PathBuf::from)
    }

    fn remote_url(
        &self,
        ctx: &QueryContext,
        dir: &Utf8Path,
    ) -> Result<String, QueryError> {
        self.run_line(ctx, dir, &["config", "--get", "remote.origin.url"])
    }

    fn commit_hash(
        &self,
        ctx: &QueryContext,
        dir: &Utf8Path,
    ) -> Result<String, QueryError> {
        self.run_line(ctx, dir, &["rev-parse", "HEAD"])
    }

    fn short_commit_hash(
        &self,
        ctx: &QueryContext,
        dir: &Utf8Path,
    ) -> Result<String, QueryError> {
        self.run_line(ctx, dir, &["rev-parse", "--short=8", "HEAD"])
    }

    fn current_branches(
        &self,
        ctx: &QueryContext,
        dir: &Utf8Path,
    ) -> Result<Vec<String>, QueryError> {
        let output =
            self.run(ctx, Some(dir), &["rev-parse", "--abbrev-ref", "HEAD"])?;
        Ok(collect_lines(&output))
    }

    fn tags_at_head(
        &self,
        ctx: &QueryContext,
        dir: &Utf8Path,
    ) -> Result<Vec<String>, QueryError> {
        let output = self
            .run(ctx, Some(dir), &["describe", "--exact-match", "--tags"])?;
        Ok(collect_lines(&output))
    }

    fn commit_timestamp(
        &self,
        ctx: &QueryContext,
        dir: &Utf8Path,
    ) -> Result<String, QueryError> {
        // An undeterminable commit time (no commits yet, unreadable log)
        // reads as the epoch default, not a failure. Cancellation still
        // propagates.
        match self.run(ctx, Some(dir), &["log", "-1", "--format=%ct"]) {
            Ok(output) => match output.lines().next() {
                Some(line) if !line.is_empty() => Ok(line.to_owned()),
                _ => Ok("0".to_owned()),
            },
            Err(QueryError::Cancelled) => Err(QueryError::Cancelled),
            Err(_) => Ok("0".to_owned()),
        }
    }
}

/// Splits command output into non-empty lines.
fn collect_lines(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}
