//! Claude CLI integration.

pub mod generator;
pub mod subprocess;

pub use generator::{ClaudeExecutor, ClaudeGenerator, DefaultExecutor};
pub use subprocess::{check_claude_installed, run_claude};
