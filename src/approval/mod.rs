//! Human-in-the-loop approval around a single generation call.
//!
//! The loop is an explicit state machine:
//!
//! ```text
//! Generating ──ok──▶ AwaitingApproval ──approve / auto──▶ Approved
//!     ▲                   │        │
//!     │                 retry   retry with instructions
//!     │                   ▼        ▼
//!     └──────────── Regenerating  AwaitingInstructions
//! ```
//!
//! A generation error ends the loop immediately and is returned to the
//! caller. A cancelled prompt ends it with [`ApprovalOutcome::Cancelled`].

pub mod prompt;

use std::future::Future;

use tracing::debug;

use crate::error::{GenerateError, SquawkError};
use crate::llm::GenerationKind;

pub use prompt::{Choice, DialoguerPrompt, HumanPrompt};

/// States of the approval loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalState {
    Generating { instructions: Option<String> },
    AwaitingApproval { text: String },
    Regenerating,
    AwaitingInstructions,
    Approved { text: String },
}

/// How an approval loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalOutcome {
    Approved { text: String, attempts: u32 },
    Cancelled { attempts: u32 },
}

impl ApprovalOutcome {
    /// The approved text, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            ApprovalOutcome::Approved { text, .. } => Some(text),
            ApprovalOutcome::Cancelled { .. } => None,
        }
    }

    pub fn attempts(&self) -> u32 {
        match self {
            ApprovalOutcome::Approved { attempts, .. }
            | ApprovalOutcome::Cancelled { attempts } => *attempts,
        }
    }
}

/// Wraps generation calls with approve / retry / retry-with-instructions.
pub struct ApprovalLoop<'a> {
    prompt: &'a dyn HumanPrompt,
    kind: GenerationKind,
    auto_approve: bool,
}

impl<'a> ApprovalLoop<'a> {
    pub fn new(prompt: &'a dyn HumanPrompt, kind: GenerationKind, auto_approve: bool) -> Self {
        Self {
            prompt,
            kind,
            auto_approve,
        }
    }

    /// Drive the state machine until the text is approved or the user cancels.
    ///
    /// `generate` receives the instructions typed after "retry with
    /// instructions", or `None`. There is no attempt limit; with
    /// `auto_approve` the first generated text is accepted without asking.
    pub async fn run<F, Fut>(&self, mut generate: F) -> Result<ApprovalOutcome, SquawkError>
    where
        F: FnMut(Option<String>) -> Fut,
        Fut: Future<Output = Result<String, GenerateError>>,
    {
        let mut attempts = 0u32;
        let mut state = ApprovalState::Generating { instructions: None };

        loop {
            debug!("Approval loop ({}): {}", self.kind, state_name(&state));

            state = match state {
                ApprovalState::Generating { instructions } => {
                    attempts += 1;
                    let text = generate(instructions).await?;
                    ApprovalState::AwaitingApproval { text }
                }
                ApprovalState::AwaitingApproval { text } => {
                    if self.auto_approve {
                        ApprovalState::Approved { text }
                    } else {
                        match self.prompt.choose(self.kind, &text).await? {
                            None => return Ok(ApprovalOutcome::Cancelled { attempts }),
                            Some(Choice::Approve) => ApprovalState::Approved { text },
                            Some(Choice::Retry) => ApprovalState::Regenerating,
                            Some(Choice::RetryWithInstructions) => {
                                ApprovalState::AwaitingInstructions
                            }
                        }
                    }
                }
                ApprovalState::Regenerating => ApprovalState::Generating { instructions: None },
                ApprovalState::AwaitingInstructions => match self.prompt.instructions().await? {
                    None => return Ok(ApprovalOutcome::Cancelled { attempts }),
                    Some(text) if text.trim().is_empty() => {
                        ApprovalState::Generating { instructions: None }
                    }
                    Some(text) => ApprovalState::Generating {
                        instructions: Some(text.trim().to_string()),
                    },
                },
                ApprovalState::Approved { text } => {
                    return Ok(ApprovalOutcome::Approved { text, attempts });
                }
            };
        }
    }
}

fn state_name(state: &ApprovalState) -> &'static str {
    match state {
        ApprovalState::Generating { .. } => "generating",
        ApprovalState::AwaitingApproval { .. } => "awaiting approval",
        ApprovalState::Regenerating => "regenerating",
        ApprovalState::AwaitingInstructions => "awaiting instructions",
        ApprovalState::Approved { .. } => "approved",
    }
}
