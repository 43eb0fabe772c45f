//! The text-generation capability and provider selection.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;

use crate::claude::{ClaudeGenerator, check_claude_installed};
use crate::codex::{CodexGenerator, check_codex_installed};
use crate::error::GenerateError;

/// Supported LLM providers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Provider {
    #[default]
    Claude,
    Codex,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Claude => "Claude",
            Provider::Codex => "Codex",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "claude" => Ok(Self::Claude),
            "codex" => Ok(Self::Codex),
            _ => Err(format!("Unknown provider: {} (expected claude or codex)", s)),
        }
    }
}

/// What the generated text is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationKind {
    Commit,
    Branch,
    Pr,
    Review,
}

impl GenerationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationKind::Commit => "commit message",
            GenerationKind::Branch => "branch name",
            GenerationKind::Pr => "pull request description",
            GenerationKind::Review => "review",
        }
    }
}

impl fmt::Display for GenerationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prompt settings shared by every generation call of one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationOptions {
    /// Output language, e.g. "English" or "Japanese".
    pub language: Option<String>,
    /// Project-wide guidance appended to every prompt.
    pub custom_instructions: Option<String>,
}

/// Turns a diff into text of the requested kind.
///
/// `instructions` carries extra guidance typed by the user after rejecting a
/// previous suggestion.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        context: &str,
        kind: GenerationKind,
        instructions: Option<String>,
    ) -> Result<String, GenerateError>;
}

/// Construct the generator for the configured provider.
pub fn build_generator(provider: Provider, options: GenerationOptions) -> Box<dyn TextGenerator> {
    match provider {
        Provider::Claude => Box::new(ClaudeGenerator::new(options)),
        Provider::Codex => Box::new(CodexGenerator::new(options)),
    }
}

/// Verify the provider's CLI is installed and runs.
pub async fn check_provider_installed(provider: Provider) -> Result<(), GenerateError> {
    match provider {
        Provider::Claude => check_claude_installed().await.map_err(GenerateError::from),
        Provider::Codex => check_codex_installed().await.map_err(GenerateError::from),
    }
}

/// Reject responses that are empty once cleaned.
pub(crate) fn non_empty(provider: Provider, text: String) -> Result<String, GenerateError> {
    if text.trim().is_empty() {
        return Err(GenerateError::EmptyResponse {
            provider: provider.to_string(),
        });
    }
    Ok(text)
}
