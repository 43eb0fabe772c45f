//! Error types for squawk modules using thiserror.

use thiserror::Error;

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Not a git repository: {0}")]
    NotARepository(String),

    #[error("Failed to run git {operation}: {source}")]
    SpawnFailed {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git {operation} failed: {stderr}")]
    CommandFailed { operation: String, stderr: String },

    #[error("Failed to read staged diff: {0}")]
    DiffFailed(#[source] git2::Error),

    #[error("Nothing to stage")]
    NothingToStage,
}

/// Errors from Claude CLI operations.
#[derive(Error, Debug)]
pub enum ClaudeError {
    #[error("Claude Code CLI not found. Install with: npm install -g @anthropic-ai/claude-code")]
    NotInstalled,

    #[error("Claude Code CLI failed to execute: {0}")]
    ExecutionFailed(String),

    #[error("Failed to spawn Claude process: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("Claude process timed out after {0} seconds")]
    Timeout(u64),

    #[error("Claude CLI exited with code {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },
}

/// Errors from Codex CLI operations.
#[derive(Error, Debug)]
pub enum CodexError {
    #[error(
        "Codex CLI not found. Install with: npm install -g @openai/codex (then run `codex` or set CODEX_API_KEY)"
    )]
    NotInstalled,

    #[error("Failed to spawn Codex process: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("Codex process timed out after {0} seconds")]
    Timeout(u64),

    #[error("Codex CLI exited with code {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },
}

/// Failures shared by every provider CLI, before they are attributed to a
/// provider.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{binary} not found on PATH")]
    NotInstalled { binary: String },

    #[error("Failed to spawn {binary}: {source}")]
    SpawnFailed {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{binary} timed out after {secs} seconds")]
    Timeout { binary: String, secs: u64 },

    #[error("{binary} exited with code {code}: {stderr}")]
    NonZeroExit {
        binary: String,
        code: i32,
        stderr: String,
    },
}

impl From<CliError> for ClaudeError {
    fn from(err: CliError) -> Self {
        match err {
            CliError::NotInstalled { .. } => ClaudeError::NotInstalled,
            CliError::SpawnFailed { source, .. } => ClaudeError::SpawnFailed(source),
            CliError::Timeout { secs, .. } => ClaudeError::Timeout(secs),
            CliError::NonZeroExit { code, stderr, .. } => ClaudeError::NonZeroExit { code, stderr },
        }
    }
}

impl From<CliError> for CodexError {
    fn from(err: CliError) -> Self {
        match err {
            CliError::NotInstalled { .. } => CodexError::NotInstalled,
            CliError::SpawnFailed { source, .. } => CodexError::SpawnFailed(source),
            CliError::Timeout { secs, .. } => CodexError::Timeout(secs),
            CliError::NonZeroExit { code, stderr, .. } => CodexError::NonZeroExit { code, stderr },
        }
    }
}

/// Errors from the text-generation capability, whatever the provider.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error(transparent)]
    Claude(#[from] ClaudeError),

    #[error(transparent)]
    Codex(#[from] CodexError),

    #[error("{provider} returned an empty response")]
    EmptyResponse { provider: String },
}

/// Errors from the interactive approval prompt.
#[derive(Error, Debug)]
pub enum InteractionError {
    #[error("Prompt failed: {0}")]
    PromptFailed(String),

    #[error("Prompt task panicked or was aborted")]
    TaskFailed,
}

/// Errors from glob pattern compilation.
#[derive(Error, Debug)]
pub enum PatternError {
    #[error("Empty glob pattern")]
    Empty,

    #[error("Invalid glob pattern '{pattern}': {source}")]
    Invalid {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// Top-level error for squawk runs and the single-shot commands.
#[derive(Error, Debug)]
pub enum SquawkError {
    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error(transparent)]
    Interaction(#[from] InteractionError),

    #[error(transparent)]
    Pattern(#[from] PatternError),
}
