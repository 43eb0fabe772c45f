//! squawk - commit pending changes one group or file at a time with
//! AI-generated messages.
//!
//! # Overview
//!
//! squawk reads the working tree status, drops ignored paths, buckets the
//! rest by group patterns and then stages, describes and commits each bucket
//! in turn. Messages come from the Claude or Codex CLI and go through an
//! approve / retry / retry-with-instructions loop before anything is
//! committed.

pub mod approval;
pub mod claude;
pub mod codex;
pub mod commands;
pub mod config;
pub mod error;
pub mod git;
pub mod llm;
pub mod squawk;

// Re-export commonly used types
pub use approval::{ApprovalLoop, ApprovalOutcome, Choice, DialoguerPrompt, HumanPrompt};
pub use config::{AppConfig, SquawkConfig};
pub use error::{
    ClaudeError, CodexError, GenerateError, GitError, InteractionError, PatternError, SquawkError,
};
pub use git::{Change, ChangeKind, GitWorkspace, Workspace};
pub use llm::{GenerationKind, GenerationOptions, Provider, TextGenerator};
pub use squawk::{GroupMode, RunStatistics, RunStatus, Squawk, SquawkReport};
