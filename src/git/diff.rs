//! Staged diff collection using git2.

use std::path::Path;

use git2::{Diff, DiffFormat, ErrorCode, Repository, Tree};
use tracing::warn;

use crate::error::GitError;

/// Maximum characters for the unified diff text before truncation.
pub const MAX_DIFF_LENGTH: usize = 30_000;

/// Unified text of what is currently staged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedDiff {
    pub text: String,
    pub files: usize,
    pub additions: usize,
    pub deletions: usize,
    pub truncated: bool,
}

impl StagedDiff {
    pub fn is_empty(&self) -> bool {
        self.files == 0
    }
}

/// Resolve the HEAD tree, distinguishing empty-repo errors from real failures.
///
/// Returns `Ok(None)` for repos with no commits (unborn branch / not found).
fn resolve_head_tree(repo: &Repository) -> Result<Option<Tree<'_>>, GitError> {
    let head_ref = match repo.head() {
        Ok(r) => r,
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            return Ok(None);
        }
        Err(e) => return Err(GitError::DiffFailed(e)),
    };

    let tree = head_ref.peel_to_tree().map_err(GitError::DiffFailed)?;
    Ok(Some(tree))
}

/// Collect the diff between HEAD (or the empty tree) and the index.
pub fn collect_staged_diff(workdir: &Path) -> Result<StagedDiff, GitError> {
    let repo = Repository::discover(workdir)
        .map_err(|e| GitError::NotARepository(e.message().to_string()))?;
    let head_tree = resolve_head_tree(&repo)?;

    let diff = repo
        .diff_tree_to_index(head_tree.as_ref(), None, None)
        .map_err(GitError::DiffFailed)?;

    let mut staged = StagedDiff {
        files: diff.deltas().len(),
        ..StagedDiff::default()
    };
    if staged.files > 0 {
        append_diff_text(&diff, &mut staged);
    }

    Ok(staged)
}

/// Append unified diff text from a diff object, respecting the max length.
fn append_diff_text(diff: &Diff<'_>, staged: &mut StagedDiff) {
    if let Err(e) = diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        match line.origin() {
            '+' => staged.additions += 1,
            '-' => staged.deletions += 1,
            _ => {}
        }

        if staged.truncated {
            return true;
        }

        let content = std::str::from_utf8(line.content()).unwrap_or("");
        if staged.text.len() + content.len() + 2 > MAX_DIFF_LENGTH {
            staged.truncated = true;
            return true;
        }

        let origin = line.origin();
        if origin == '+' || origin == '-' || origin == ' ' {
            staged.text.push(origin);
        }
        staged.text.push_str(content);

        true
    }) {
        warn!("Failed to collect diff text: {e}");
        staged.truncated = true;
    }
}
