//! Change classification and the sequential commit pipeline.

pub mod orchestrator;
pub mod partition;
pub mod pattern;
pub mod report;

pub use orchestrator::Squawk;
pub use partition::{Group, GroupMode, Partition, apply_groups, apply_ignore};
pub use pattern::{Glob, PatternSet, filter_out, matches, matches_any};
pub use report::{
    ConsoleReporter, ItemLabel, RunStatistics, RunStatus, SilentReporter, SquawkReport,
    SquawkReporter,
};
