//! Codex CLI invocation.

use crate::error::CodexError;
use crate::llm::cli::ProviderCli;

/// The `codex` binary; `SQUAWK_CODEX_TIMEOUT` overrides its timeout.
pub const CODEX_CLI: ProviderCli = ProviderCli::new("codex", "SQUAWK_CODEX_TIMEOUT");

/// Check if Codex CLI is installed and accessible.
pub async fn check_codex_installed() -> Result<(), CodexError> {
    CODEX_CLI.check_installed().await?;
    Ok(())
}

/// Run `codex exec <prompt>` and return its free-form text response.
///
/// The answer is printed as plain text, so stdout is returned as is.
pub async fn run_codex(prompt: &str) -> Result<String, CodexError> {
    Ok(CODEX_CLI.run(&["exec", prompt]).await?)
}
