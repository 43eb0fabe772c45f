//! Claude CLI invocation and result envelope parsing.

use serde::Deserialize;

use crate::error::ClaudeError;
use crate::llm::cli::ProviderCli;

/// The `claude` binary; `SQUAWK_CLAUDE_TIMEOUT` overrides its timeout.
pub const CLAUDE_CLI: ProviderCli = ProviderCli::new("claude", "SQUAWK_CLAUDE_TIMEOUT");

/// Check if Claude Code CLI is installed and accessible.
pub async fn check_claude_installed() -> Result<(), ClaudeError> {
    CLAUDE_CLI.check_installed().await?;
    Ok(())
}

/// Run Claude CLI with a prompt and return the text of its answer.
///
/// Uses `-p` with `--output-format json` and unwraps the result envelope.
pub async fn run_claude(prompt: &str) -> Result<String, ClaudeError> {
    let stdout = CLAUDE_CLI
        .run(&["-p", prompt, "--output-format", "json"])
        .await?;
    parse_claude_envelope(&stdout)
}

/// Claude CLI JSON envelope when using --output-format json
#[derive(Deserialize)]
struct ClaudeCliResponse {
    result: String,
    #[serde(default)]
    is_error: bool,
}

/// Extract the answer text from the CLI envelope, accepting raw text too.
fn parse_claude_envelope(response: &str) -> Result<String, ClaudeError> {
    match serde_json::from_str::<ClaudeCliResponse>(response) {
        Ok(envelope) if envelope.is_error => Err(ClaudeError::ExecutionFailed(envelope.result)),
        Ok(envelope) => Ok(envelope.result),
        Err(_) => Ok(response.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_result_is_unwrapped() {
        let response =
            r#"{"type":"result","subtype":"success","is_error":false,"result":"feat: add login"}"#;
        assert_eq!(parse_claude_envelope(response).unwrap(), "feat: add login");
    }

    #[test]
    fn test_envelope_error_is_surfaced() {
        let response = r#"{"type":"result","is_error":true,"result":"Credit balance is too low"}"#;
        let err = parse_claude_envelope(response).unwrap_err();
        assert!(matches!(err, ClaudeError::ExecutionFailed(ref msg) if msg.contains("Credit")));
    }

    #[test]
    fn test_non_json_output_is_returned_as_is() {
        assert_eq!(
            parse_claude_envelope("fix: plain text answer").unwrap(),
            "fix: plain text answer"
        );
    }

    #[test]
    fn test_envelope_without_is_error_defaults_to_success() {
        let response = r#"{"result":"docs: update readme"}"#;
        assert_eq!(parse_claude_envelope(response).unwrap(), "docs: update readme");
    }

    #[test]
    fn test_claude_cli_binding() {
        assert_eq!(CLAUDE_CLI.binary(), "claude");
        temp_env::with_var_unset("SQUAWK_CLAUDE_TIMEOUT", || {
            assert_eq!(CLAUDE_CLI.timeout().as_secs(), crate::llm::DEFAULT_TIMEOUT_SECS);
        });
    }
}
