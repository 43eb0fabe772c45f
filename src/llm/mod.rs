//! LLM provider selection, CLI spawning and prompt construction.

pub mod cli;
pub mod generator;
pub mod prompt;

pub use cli::{DEFAULT_TIMEOUT_SECS, ProviderCli};
pub use generator::{
    GenerationKind, GenerationOptions, Provider, TextGenerator, build_generator,
    check_provider_installed,
};
pub use prompt::{build_prompt, clean_response, sanitize_diff};
