//! Human interaction for the approval loop.

use std::io;

use async_trait::async_trait;
use dialoguer::{Input, Select};

use crate::error::InteractionError;
use crate::llm::GenerationKind;

/// What the user decided about a generated suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Approve,
    Retry,
    RetryWithInstructions,
}

impl Choice {
    const ALL: [Choice; 3] = [Choice::Approve, Choice::Retry, Choice::RetryWithInstructions];

    pub fn label(&self) -> &'static str {
        match self {
            Choice::Approve => "Approve",
            Choice::Retry => "Retry",
            Choice::RetryWithInstructions => "Retry with instructions",
        }
    }
}

/// Asks the user about generated text.
///
/// `Ok(None)` means the prompt was cancelled (Esc, Ctrl-C); the caller
/// skips the item instead of treating it as an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HumanPrompt: Send + Sync {
    async fn choose(
        &self,
        kind: GenerationKind,
        text: &str,
    ) -> Result<Option<Choice>, InteractionError>;

    async fn instructions(&self) -> Result<Option<String>, InteractionError>;
}

/// Terminal prompt built on dialoguer.
#[derive(Debug, Default, Clone, Copy)]
pub struct DialoguerPrompt;

#[async_trait]
impl HumanPrompt for DialoguerPrompt {
    async fn choose(
        &self,
        kind: GenerationKind,
        text: &str,
    ) -> Result<Option<Choice>, InteractionError> {
        let header = format!("Suggested {kind}:");
        let body = text.to_string();

        tokio::task::spawn_blocking(move || {
            println!("\n{header}\n");
            for line in body.lines() {
                println!("  {line}");
            }
            println!();

            let labels: Vec<&str> = Choice::ALL.iter().map(Choice::label).collect();
            let selection = Select::new()
                .with_prompt("What do you want to do?")
                .items(&labels)
                .default(0)
                .interact_opt();

            match selection {
                Ok(index) => Ok(index.and_then(|i| Choice::ALL.get(i).copied())),
                Err(e) => cancelled_or_failed(e),
            }
        })
        .await
        .map_err(|_| InteractionError::TaskFailed)?
    }

    async fn instructions(&self) -> Result<Option<String>, InteractionError> {
        tokio::task::spawn_blocking(|| {
            let input = Input::<String>::new()
                .with_prompt("Instructions for the next attempt")
                .allow_empty(true)
                .interact_text();

            match input {
                Ok(text) => Ok(Some(text)),
                Err(e) => cancelled_or_failed(e),
            }
        })
        .await
        .map_err(|_| InteractionError::TaskFailed)?
    }
}

/// Ctrl-C during a prompt is a cancellation, anything else a failure.
fn cancelled_or_failed<T>(err: dialoguer::Error) -> Result<Option<T>, InteractionError> {
    match err {
        dialoguer::Error::IO(e) if e.kind() == io::ErrorKind::Interrupted => Ok(None),
        other => Err(InteractionError::PromptFailed(other.to_string())),
    }
}
