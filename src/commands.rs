//! Single-shot commands sharing the generator and the approval loop:
//! commit what is staged, name a branch, describe a pull request, review.

use tracing::{debug, info};

use crate::approval::{ApprovalLoop, ApprovalOutcome, HumanPrompt};
use crate::error::SquawkError;
use crate::git::{GitWorkspace, Workspace};
use crate::llm::{GenerationKind, TextGenerator};

/// What a single-shot command ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The command produced (and, where applicable, applied) this text.
    Done(String),
    /// There was no diff to work from.
    NothingToDo,
    /// The user cancelled the approval prompt.
    Cancelled,
}

/// Collaborators shared by every command.
pub struct CommandContext<'a> {
    pub workspace: &'a GitWorkspace,
    pub generator: &'a dyn TextGenerator,
    pub prompt: &'a dyn HumanPrompt,
    pub auto_approve: bool,
}

impl CommandContext<'_> {
    async fn approve(
        &self,
        kind: GenerationKind,
        context: &str,
    ) -> Result<ApprovalOutcome, SquawkError> {
        let generator = self.generator;
        ApprovalLoop::new(self.prompt, kind, self.auto_approve)
            .run(move |instructions| generator.generate(context, kind, instructions))
            .await
    }
}

/// Commit what is staged (everything pending with `all`) under one message.
pub async fn run_commit(
    ctx: &CommandContext<'_>,
    all: bool,
) -> Result<CommandOutcome, SquawkError> {
    if all {
        ctx.workspace.stage_all().await?;
    }

    let diff = ctx.workspace.staged_diff().await?;
    if diff.trim().is_empty() {
        info!("Nothing staged");
        return Ok(CommandOutcome::NothingToDo);
    }

    match ctx.approve(GenerationKind::Commit, &diff).await? {
        ApprovalOutcome::Approved { text, .. } => {
            ctx.workspace.commit(&text).await?;
            Ok(CommandOutcome::Done(text))
        }
        ApprovalOutcome::Cancelled { .. } => Ok(CommandOutcome::Cancelled),
    }
}

/// Name a branch after the pending changes and switch to it.
pub async fn run_branch(ctx: &CommandContext<'_>) -> Result<CommandOutcome, SquawkError> {
    let diff = ctx.workspace.pending_diff().await?;
    if diff.trim().is_empty() {
        return Ok(CommandOutcome::NothingToDo);
    }

    match ctx.approve(GenerationKind::Branch, &diff).await? {
        ApprovalOutcome::Approved { text, .. } => {
            ctx.workspace.create_branch(&text).await?;
            Ok(CommandOutcome::Done(text))
        }
        ApprovalOutcome::Cancelled { .. } => Ok(CommandOutcome::Cancelled),
    }
}

/// Describe the current branch as a pull request against `base`.
pub async fn run_pr(ctx: &CommandContext<'_>, base: &str) -> Result<CommandOutcome, SquawkError> {
    let diff = ctx.workspace.diff_against(base).await?;
    if diff.trim().is_empty() {
        return Ok(CommandOutcome::NothingToDo);
    }

    let log = ctx.workspace.log_against(base).await?;
    let context = pr_context(&log, &diff);
    debug!("PR context: {} chars", context.len());

    match ctx.approve(GenerationKind::Pr, &context).await? {
        ApprovalOutcome::Approved { text, .. } => Ok(CommandOutcome::Done(text)),
        ApprovalOutcome::Cancelled { .. } => Ok(CommandOutcome::Cancelled),
    }
}

/// Review the staged diff, or the pending one when nothing is staged.
pub async fn run_review(ctx: &CommandContext<'_>) -> Result<CommandOutcome, SquawkError> {
    let mut diff = ctx.workspace.staged_diff().await?;
    if diff.trim().is_empty() {
        diff = ctx.workspace.pending_diff().await?;
    }
    if diff.trim().is_empty() {
        return Ok(CommandOutcome::NothingToDo);
    }

    let review = ctx
        .generator
        .generate(&diff, GenerationKind::Review, None)
        .await?;
    Ok(CommandOutcome::Done(review))
}

fn pr_context(log: &str, diff: &str) -> String {
    let log = log.trim();
    if log.is_empty() {
        return diff.to_string();
    }
    format!("Commits on this branch:\n{log}\n\n{diff}")
}
