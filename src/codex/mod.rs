//! Codex CLI integration.

pub mod generator;
pub mod subprocess;

pub use generator::{CodexExecutor, CodexGenerator, DefaultExecutor};
pub use subprocess::{check_codex_installed, run_codex};
