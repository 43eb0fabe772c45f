//! [`TextGenerator`] implementation backed by the Claude CLI.

use async_trait::async_trait;
use tracing::debug;

use crate::error::{ClaudeError, GenerateError};
use crate::llm::generator::{GenerationKind, GenerationOptions, Provider, TextGenerator, non_empty};
use crate::llm::prompt::{build_prompt, clean_response};

use super::subprocess::run_claude;

/// Trait for executing Claude CLI commands.
///
/// This abstraction allows mocking the Claude subprocess in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClaudeExecutor: Send + Sync {
    /// Run Claude with the given prompt and return the answer text.
    async fn run(&self, prompt: &str) -> Result<String, ClaudeError>;
}

/// Default executor that calls the real Claude CLI.
pub struct DefaultExecutor;

#[async_trait]
impl ClaudeExecutor for DefaultExecutor {
    async fn run(&self, prompt: &str) -> Result<String, ClaudeError> {
        run_claude(prompt).await
    }
}

/// Generates commit messages, branch names, PR descriptions and reviews
/// with Claude. A failed call is reported as-is; there is no retry.
pub struct ClaudeGenerator<E: ClaudeExecutor = DefaultExecutor> {
    options: GenerationOptions,
    executor: E,
}

impl ClaudeGenerator<DefaultExecutor> {
    pub fn new(options: GenerationOptions) -> Self {
        Self::with_executor(options, DefaultExecutor)
    }
}

impl<E: ClaudeExecutor> ClaudeGenerator<E> {
    pub fn with_executor(options: GenerationOptions, executor: E) -> Self {
        Self { options, executor }
    }
}

#[async_trait]
impl<E: ClaudeExecutor> TextGenerator for ClaudeGenerator<E> {
    async fn generate(
        &self,
        context: &str,
        kind: GenerationKind,
        instructions: Option<String>,
    ) -> Result<String, GenerateError> {
        let prompt = build_prompt(kind, context, &self.options, instructions.as_deref());
        debug!("Claude {} prompt length: {} chars", kind, prompt.len());

        let raw = self.executor.run(&prompt).await?;
        non_empty(Provider::Claude, clean_response(kind, &raw))
    }
}
