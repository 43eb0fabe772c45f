//! Immutable run configuration collected from the command line.

use crate::llm::{GenerationOptions, Provider};
use crate::squawk::GroupMode;

/// Settings for one squawk run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SquawkConfig {
    /// Glob patterns whose matches are committed together, in order.
    pub group_patterns: Vec<String>,
    /// Glob patterns whose matches are left untouched.
    pub ignore_patterns: Vec<String>,
    pub group_mode: GroupMode,
    /// Accept every generated message without asking.
    pub auto_approve: bool,
}

/// Settings shared by every command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub provider: Provider,
    pub generation: GenerationOptions,
    pub auto_approve: bool,
}

impl AppConfig {
    /// Build a [`SquawkConfig`] carrying this config's auto-approve flag.
    pub fn squawk(
        &self,
        group_patterns: Vec<String>,
        ignore_patterns: Vec<String>,
        group_mode: GroupMode,
    ) -> SquawkConfig {
        SquawkConfig {
            group_patterns,
            ignore_patterns,
            group_mode,
            auto_approve: self.auto_approve,
        }
    }
}
