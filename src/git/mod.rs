//! Git operations: status translation, staged diffs and the workspace.

pub mod diff;
pub mod status;
pub mod workspace;

pub use diff::{StagedDiff, collect_staged_diff};
pub use status::{Change, ChangeKind, translate};
pub use workspace::{GitWorkspace, Workspace};
