//! [`TextGenerator`] implementation backed by the Codex CLI.

use async_trait::async_trait;
use tracing::debug;

use crate::error::{CodexError, GenerateError};
use crate::llm::generator::{GenerationKind, GenerationOptions, Provider, TextGenerator, non_empty};
use crate::llm::prompt::{build_prompt, clean_response};

use super::subprocess::run_codex;

/// Trait for executing Codex CLI commands.
///
/// This abstraction allows mocking the Codex subprocess in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CodexExecutor: Send + Sync {
    async fn run(&self, prompt: &str) -> Result<String, CodexError>;
}

/// Default executor that calls the real Codex CLI.
pub struct DefaultExecutor;

#[async_trait]
impl CodexExecutor for DefaultExecutor {
    async fn run(&self, prompt: &str) -> Result<String, CodexError> {
        run_codex(prompt).await
    }
}

pub struct CodexGenerator<E: CodexExecutor = DefaultExecutor> {
    options: GenerationOptions,
    executor: E,
}

impl CodexGenerator<DefaultExecutor> {
    pub fn new(options: GenerationOptions) -> Self {
        Self::with_executor(options, DefaultExecutor)
    }
}

impl<E: CodexExecutor> CodexGenerator<E> {
    pub fn with_executor(options: GenerationOptions, executor: E) -> Self {
        Self { options, executor }
    }
}

#[async_trait]
impl<E: CodexExecutor> TextGenerator for CodexGenerator<E> {
    async fn generate(
        &self,
        context: &str,
        kind: GenerationKind,
        instructions: Option<String>,
    ) -> Result<String, GenerateError> {
        let prompt = build_prompt(kind, context, &self.options, instructions.as_deref());
        debug!("Codex {} prompt length: {} chars", kind, prompt.len());

        let raw = self.executor.run(&prompt).await?;
        non_empty(Provider::Codex, clean_response(kind, &raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_generate_uses_configured_language() {
        let mut mock = MockCodexExecutor::new();
        mock.expect_run()
            .withf(|prompt| prompt.contains("Write the response in French."))
            .times(1)
            .returning(|_| Ok("feat: ajoute la connexion\n".to_string()));

        let options = GenerationOptions {
            language: Some("French".to_string()),
            custom_instructions: None,
        };
        let generator = CodexGenerator::with_executor(options, mock);
        let text = generator
            .generate("diff", GenerationKind::Commit, None)
            .await
            .unwrap();
        assert_eq!(text, "feat: ajoute la connexion");
    }

    #[tokio::test]
    async fn test_branch_response_is_slugified() {
        let mut mock = MockCodexExecutor::new();
        mock.expect_run()
            .returning(|_| Ok("Fix/Handle Empty Input".to_string()));

        let generator = CodexGenerator::with_executor(GenerationOptions::default(), mock);
        let text = generator
            .generate("diff", GenerationKind::Branch, None)
            .await
            .unwrap();
        assert_eq!(text, "fix/handle-empty-input");
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_propagated() {
        let mut mock = MockCodexExecutor::new();
        mock.expect_run().times(1).returning(|_| {
            Err(CodexError::NonZeroExit {
                code: 2,
                stderr: "not logged in".to_string(),
            })
        });

        let generator = CodexGenerator::with_executor(GenerationOptions::default(), mock);
        let err = generator
            .generate("diff", GenerationKind::Pr, None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not logged in"));
    }
}
