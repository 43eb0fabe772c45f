//! Sequential stage / generate / commit pipeline over partitioned changes.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::approval::{ApprovalLoop, ApprovalOutcome, HumanPrompt};
use crate::config::SquawkConfig;
use crate::error::SquawkError;
use crate::git::{Change, Workspace, translate};
use crate::llm::{GenerationKind, TextGenerator};

use super::partition::{apply_groups, apply_ignore};
use super::pattern::PatternSet;
use super::report::{ItemLabel, RunStatistics, RunStatus, SquawkReport, SquawkReporter};

/// Result of one commit unit that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ItemResult {
    Committed(String),
    Skipped(&'static str),
}

/// Commits every eligible change, grouped or one by one.
///
/// Items are processed strictly one after another: the index is shared, so
/// each item is staged, described and committed before the next starts.
pub struct Squawk<'a> {
    config: &'a SquawkConfig,
    workspace: &'a dyn Workspace,
    generator: &'a dyn TextGenerator,
    prompt: &'a dyn HumanPrompt,
    reporter: &'a dyn SquawkReporter,
}

impl<'a> Squawk<'a> {
    pub fn new(
        config: &'a SquawkConfig,
        workspace: &'a dyn Workspace,
        generator: &'a dyn TextGenerator,
        prompt: &'a dyn HumanPrompt,
        reporter: &'a dyn SquawkReporter,
    ) -> Self {
        Self {
            config,
            workspace,
            generator,
            prompt,
            reporter,
        }
    }

    /// Query the workspace status and commit what it reports.
    pub async fn run_from_status(&self) -> Result<SquawkReport, SquawkError> {
        let status = self.workspace.raw_status().await?;
        let numstat = self.workspace.raw_numstat().await?;
        let changes = translate(&status, &numstat);
        debug!("Status reported {} change(s)", changes.len());
        self.run(changes).await
    }

    /// Partition `changes` and commit each group, then each ungrouped change.
    ///
    /// Invalid patterns and a failure to reset the index are fatal. Anything
    /// that goes wrong inside one item is counted in `failed` and the run
    /// moves on to the next item.
    pub async fn run(&self, changes: Vec<Change>) -> Result<SquawkReport, SquawkError> {
        let started = Instant::now();

        let ignore = PatternSet::new(&self.config.ignore_patterns)?;
        let groups = PatternSet::new(&self.config.group_patterns)?;

        if changes.is_empty() {
            info!("No changes found");
            return Ok(SquawkReport::early(RunStatus::NoChanges, started.elapsed()));
        }

        let found = changes.len();
        let filtered = apply_ignore(changes, &ignore);
        if filtered.is_empty() {
            info!("All {} change(s) ignored", found);
            return Ok(SquawkReport::early(
                RunStatus::AllIgnored { ignored: found },
                started.elapsed(),
            ));
        }

        let partition = apply_groups(filtered, &groups, self.config.group_mode);
        info!(
            "Processing {} group(s) and {} individual change(s)",
            partition.groups.len(),
            partition.ungrouped.len()
        );

        self.workspace.unstage_all().await?;

        let mut stats = RunStatistics::default();

        for group in &partition.groups {
            let label = ItemLabel::Group {
                pattern: group.pattern.clone(),
                files: group.files.len(),
            };
            if self.process(&label, &group.paths(), &mut stats).await {
                stats.group_commits += 1;
                stats.group_files += group.files.len();
            }
        }

        for change in &partition.ungrouped {
            let label = ItemLabel::File {
                path: change.path.clone(),
            };
            if self.process(&label, &change.staging_paths(), &mut stats).await {
                stats.individual_commits += 1;
            }
        }

        stats.finalize();
        Ok(SquawkReport {
            status: RunStatus::Completed,
            stats,
            elapsed: started.elapsed(),
        })
    }

    /// Run one item and record a skip or failure. Returns true on commit.
    async fn process(
        &self,
        label: &ItemLabel,
        paths: &[String],
        stats: &mut RunStatistics,
    ) -> bool {
        self.reporter.item_started(label);

        match self.commit_item(paths).await {
            Ok(ItemResult::Committed(message)) => {
                self.reporter.item_committed(label, &message);
                true
            }
            Ok(ItemResult::Skipped(reason)) => {
                debug!("Skipped {}: {}", label, reason);
                stats.skipped += 1;
                self.reporter.item_skipped(label, reason);
                false
            }
            Err(e) => {
                warn!("Failed to commit {}: {}", label, e);
                stats.failed += 1;
                self.reporter.item_failed(label, &e.to_string());
                if let Err(reset) = self.workspace.unstage_all().await {
                    warn!("Could not reset the index after failure: {}", reset);
                }
                false
            }
        }
    }

    async fn commit_item(&self, paths: &[String]) -> Result<ItemResult, SquawkError> {
        self.workspace.stage(paths).await?;

        let diff = self.workspace.staged_diff().await?;
        if diff.trim().is_empty() {
            return Ok(ItemResult::Skipped("nothing staged"));
        }

        let generator = self.generator;
        let context = diff.as_str();
        let approval =
            ApprovalLoop::new(self.prompt, GenerationKind::Commit, self.config.auto_approve);
        let outcome = approval
            .run(move |instructions| {
                generator.generate(context, GenerationKind::Commit, instructions)
            })
            .await?;

        match outcome {
            ApprovalOutcome::Approved { text, attempts } if !text.trim().is_empty() => {
                debug!("Message approved after {} attempt(s)", attempts);
                self.workspace.commit(&text).await?;
                Ok(ItemResult::Committed(text))
            }
            ApprovalOutcome::Approved { .. } => {
                self.workspace.unstage_all().await?;
                Ok(ItemResult::Skipped("empty message"))
            }
            ApprovalOutcome::Cancelled { .. } => {
                self.workspace.unstage_all().await?;
                Ok(ItemResult::Skipped("cancelled"))
            }
        }
    }
}
