//! Repository operations used by the squawk pipeline: status, staging,
//! staged diff and commit.
//!
//! Status, staging and commit shell out to the system `git` binary so the
//! user's config, hooks and signing setup apply. The staged diff is read
//! through git2.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use git2::Repository;
use tokio::process::Command;
use tracing::debug;

use crate::error::GitError;

use super::diff::{MAX_DIFF_LENGTH, collect_staged_diff};

/// The version-control capabilities the orchestration needs.
///
/// Every method touches the single shared index, so callers must finish one
/// stage/diff/commit sequence before starting the next.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Workspace: Send + Sync {
    /// Short-format status lines (`XY path`).
    async fn raw_status(&self) -> Result<String, GitError>;

    /// Tab-separated `additions deletions path` lines against HEAD.
    /// Empty when the repository has no commits yet.
    async fn raw_numstat(&self) -> Result<String, GitError>;

    /// Stage the given paths, additions and deletions alike. Paths that are
    /// neither tracked nor present on disk are left out; if none remain,
    /// nothing is staged.
    async fn stage(&self, paths: &[String]) -> Result<(), GitError>;

    async fn unstage_all(&self) -> Result<(), GitError>;

    /// Unified diff of the index against HEAD; empty when nothing is staged.
    async fn staged_diff(&self) -> Result<String, GitError>;

    async fn commit(&self, message: &str) -> Result<(), GitError>;
}

/// [`Workspace`] backed by a real working tree.
#[derive(Debug, Clone)]
pub struct GitWorkspace {
    workdir: PathBuf,
}

impl GitWorkspace {
    /// Locate the repository containing `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, GitError> {
        let repo = Repository::discover(path.as_ref())
            .map_err(|e| GitError::NotARepository(e.message().to_string()))?;
        let workdir = repo
            .workdir()
            .ok_or_else(|| GitError::NotARepository("bare repository not supported".into()))?
            .to_path_buf();

        Ok(Self { workdir })
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Whether HEAD points at a commit (false on an unborn branch).
    pub async fn has_head(&self) -> bool {
        self.run_git(&["rev-parse", "--verify", "--quiet", "HEAD"], "rev-parse")
            .await
            .is_ok()
    }

    pub async fn current_branch(&self) -> Result<String, GitError> {
        let name = self
            .run_git(&["symbolic-ref", "--short", "HEAD"], "symbolic-ref")
            .await?;
        Ok(name.trim().to_string())
    }

    pub async fn create_branch(&self, name: &str) -> Result<(), GitError> {
        self.run_git(&["switch", "-c", name], "switch").await?;
        Ok(())
    }

    /// Stage every pending change, like `git add -A`.
    pub async fn stage_all(&self) -> Result<(), GitError> {
        self.run_git(&["add", "-A"], "add").await?;
        Ok(())
    }

    /// Diff of the working tree against HEAD, falling back to the staged
    /// diff when there is no history yet.
    pub async fn pending_diff(&self) -> Result<String, GitError> {
        if !self.has_head().await {
            return self.staged_diff().await;
        }
        let diff = self.run_git(&["diff", "HEAD"], "diff").await?;
        Ok(truncate_diff(diff))
    }

    /// Diff of the current branch since it forked from `base`.
    pub async fn diff_against(&self, base: &str) -> Result<String, GitError> {
        let range = format!("{base}...HEAD");
        let diff = self.run_git(&["diff", &range], "diff").await?;
        Ok(truncate_diff(diff))
    }

    /// One-line log of the commits on the current branch since `base`.
    pub async fn log_against(&self, base: &str) -> Result<String, GitError> {
        let range = format!("{base}..HEAD");
        self.run_git(&["log", "--oneline", "--no-decorate", &range], "log")
            .await
    }

    /// The subset of `paths` currently recorded in the index.
    async fn tracked_paths(&self, paths: &[String]) -> Result<HashSet<String>, GitError> {
        let mut args = vec!["--literal-pathspecs", "ls-files", "--cached", "-z", "--"];
        args.extend(paths.iter().map(String::as_str));
        let listed = self.run_git(&args, "ls-files").await?;

        Ok(listed
            .split('\0')
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Run a git command in the working tree and return its stdout.
    async fn run_git(&self, args: &[&str], operation: &str) -> Result<String, GitError> {
        debug!("git {}", args.join(" "));

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .await
            .map_err(|source| GitError::SpawnFailed {
                operation: operation.to_string(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if stderr.contains("not a git repository") {
                return Err(GitError::NotARepository(stderr));
            }
            return Err(GitError::CommandFailed {
                operation: operation.to_string(),
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[async_trait]
impl Workspace for GitWorkspace {
    async fn raw_status(&self) -> Result<String, GitError> {
        self.run_git(
            &["status", "--porcelain=v1", "--untracked-files=all"],
            "status",
        )
        .await
    }

    async fn raw_numstat(&self) -> Result<String, GitError> {
        if !self.has_head().await {
            return Ok(String::new());
        }
        self.run_git(&["diff", "HEAD", "--numstat"], "diff --numstat")
            .await
    }

    async fn stage(&self, paths: &[String]) -> Result<(), GitError> {
        if paths.is_empty() {
            return Err(GitError::NothingToStage);
        }

        // A deletion already committed by an earlier overlapping group leaves
        // a path git no longer knows, and `git add` rejects it outright.
        let tracked = self.tracked_paths(paths).await?;
        let stageable: Vec<&str> = paths
            .iter()
            .filter(|p| {
                tracked.contains(p.as_str()) || self.workdir.join(p).symlink_metadata().is_ok()
            })
            .map(String::as_str)
            .collect();

        if stageable.is_empty() {
            debug!("Nothing left to stage for {}", paths.join(", "));
            return Ok(());
        }

        let mut args = vec!["--literal-pathspecs", "add", "-A", "--"];
        args.extend(stageable);
        self.run_git(&args, "add").await?;
        Ok(())
    }

    async fn unstage_all(&self) -> Result<(), GitError> {
        if self.has_head().await {
            self.run_git(&["reset", "--quiet"], "reset").await?;
        } else {
            self.run_git(
                &["rm", "-r", "--cached", "--quiet", "--ignore-unmatch", "."],
                "rm --cached",
            )
            .await?;
        }
        Ok(())
    }

    async fn staged_diff(&self) -> Result<String, GitError> {
        let staged = collect_staged_diff(&self.workdir)?;
        debug!(
            "Staged diff: {} files, +{} -{}, truncated={}",
            staged.files, staged.additions, staged.deletions, staged.truncated
        );
        Ok(staged.text)
    }

    async fn commit(&self, message: &str) -> Result<(), GitError> {
        self.run_git(&["commit", "--quiet", "-m", message], "commit")
            .await?;
        Ok(())
    }
}

/// Cut diff text to [`MAX_DIFF_LENGTH`] on a char boundary.
fn truncate_diff(mut diff: String) -> String {
    if diff.len() > MAX_DIFF_LENGTH {
        let mut end = MAX_DIFF_LENGTH;
        while !diff.is_char_boundary(end) {
            end -= 1;
        }
        diff.truncate(end);
    }
    diff
}
