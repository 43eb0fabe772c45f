//! Run statistics, final report and per-item progress output.

use std::fmt;
use std::time::Duration;

/// Counters accumulated over one squawk run.
///
/// `total_commits` stays zero until [`RunStatistics::finalize`] is called at
/// the end of the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStatistics {
    pub group_commits: usize,
    pub group_files: usize,
    pub individual_commits: usize,
    pub total_commits: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl RunStatistics {
    pub fn finalize(&mut self) {
        self.total_commits = self.group_commits + self.individual_commits;
    }
}

/// Why a run ended the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// The working tree had nothing to commit.
    NoChanges,
    /// Every change matched an ignore pattern.
    AllIgnored { ignored: usize },
    /// At least one item was processed.
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SquawkReport {
    pub status: RunStatus,
    pub stats: RunStatistics,
    pub elapsed: Duration,
}

impl SquawkReport {
    /// A report for a run that stopped before touching the index.
    pub fn early(status: RunStatus, elapsed: Duration) -> Self {
        Self {
            status,
            stats: RunStatistics::default(),
            elapsed,
        }
    }

    /// Human-readable summary printed after the run.
    pub fn summary(&self) -> String {
        match self.status {
            RunStatus::NoChanges => "No changes to commit.".to_string(),
            RunStatus::AllIgnored { ignored } => {
                format!("All {ignored} changed file(s) matched ignore patterns. Nothing to commit.")
            }
            RunStatus::Completed => {
                let s = &self.stats;
                let mut lines = vec![format!(
                    "Created {} commit(s) in {:.1}s",
                    s.total_commits,
                    self.elapsed.as_secs_f64()
                )];
                if s.group_commits > 0 {
                    lines.push(format!(
                        "  group commits:      {} ({} file(s))",
                        s.group_commits, s.group_files
                    ));
                }
                lines.push(format!("  individual commits: {}", s.individual_commits));
                if s.skipped > 0 {
                    lines.push(format!("  skipped:            {}", s.skipped));
                }
                lines.push(format!("  failed:             {}", s.failed));
                lines.join("\n")
            }
        }
    }
}

impl fmt::Display for SquawkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

/// Identifies the unit being committed in progress output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemLabel {
    Group { pattern: String, files: usize },
    File { path: String },
}

impl fmt::Display for ItemLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemLabel::Group { pattern, files } => write!(f, "group {pattern} ({files} file(s))"),
            ItemLabel::File { path } => f.write_str(path),
        }
    }
}

/// Receives per-item progress from the orchestrator.
pub trait SquawkReporter: Send + Sync {
    fn item_started(&self, _item: &ItemLabel) {}
    fn item_committed(&self, _item: &ItemLabel, _message: &str) {}
    fn item_skipped(&self, _item: &ItemLabel, _reason: &str) {}
    fn item_failed(&self, _item: &ItemLabel, _error: &str) {}
}

/// Reporter that prints nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl SquawkReporter for SilentReporter {}

/// Prints one line per item event to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl SquawkReporter for ConsoleReporter {
    fn item_started(&self, item: &ItemLabel) {
        println!("\n→ {item}");
    }

    fn item_committed(&self, item: &ItemLabel, message: &str) {
        let subject = message.lines().next().unwrap_or_default();
        println!("✓ {item}: {subject}");
    }

    fn item_skipped(&self, item: &ItemLabel, reason: &str) {
        println!("- {item}: skipped ({reason})");
    }

    fn item_failed(&self, item: &ItemLabel, error: &str) {
        println!("✗ {item}: {error}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finalize_sums_commit_kinds() {
        let mut stats = RunStatistics {
            group_commits: 2,
            group_files: 5,
            individual_commits: 3,
            ..Default::default()
        };
        assert_eq!(stats.total_commits, 0);
        stats.finalize();
        assert_eq!(stats.total_commits, 5);
    }

    #[test]
    fn test_early_report_has_zero_statistics() {
        let report = SquawkReport::early(RunStatus::NoChanges, Duration::ZERO);
        assert_eq!(report.stats, RunStatistics::default());
        assert_eq!(report.summary(), "No changes to commit.");
    }

    #[test]
    fn test_all_ignored_summary_mentions_count() {
        let report = SquawkReport::early(RunStatus::AllIgnored { ignored: 3 }, Duration::ZERO);
        assert!(report.summary().contains("All 3 changed file(s)"));
    }

    #[test]
    fn test_completed_summary_lists_counters() {
        let mut stats = RunStatistics {
            group_commits: 1,
            group_files: 2,
            individual_commits: 1,
            failed: 1,
            skipped: 1,
            ..Default::default()
        };
        stats.finalize();
        let report = SquawkReport {
            status: RunStatus::Completed,
            stats,
            elapsed: Duration::from_millis(1500),
        };

        let summary = report.to_string();
        assert!(summary.starts_with("Created 2 commit(s) in 1.5s"));
        assert!(summary.contains("group commits:      1 (2 file(s))"));
        assert!(summary.contains("individual commits: 1"));
        assert!(summary.contains("skipped:            1"));
        assert!(summary.contains("failed:             1"));
    }

    #[test]
    fn test_completed_summary_always_reports_failures() {
        let report = SquawkReport {
            status: RunStatus::Completed,
            stats: RunStatistics::default(),
            elapsed: Duration::ZERO,
        };
        assert!(report.summary().contains("failed:             0"));
        assert!(!report.summary().contains("skipped"));
    }

    #[test]
    fn test_item_label_display() {
        let group = ItemLabel::Group {
            pattern: "src/**".to_string(),
            files: 3,
        };
        assert_eq!(group.to_string(), "group src/** (3 file(s))");
        let file = ItemLabel::File {
            path: "a.js".to_string(),
        };
        assert_eq!(file.to_string(), "a.js");
    }
}
