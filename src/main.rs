//! squawk - CLI entry point.

use std::io::IsTerminal;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use squawk::commands::{
    CommandContext, CommandOutcome, run_branch, run_commit, run_pr, run_review,
};
use squawk::llm::{build_generator, check_provider_installed};
use squawk::squawk::ConsoleReporter;
use squawk::{
    AppConfig, DialoguerPrompt, GenerationOptions, GitWorkspace, GroupMode, Provider, Squawk,
};

/// Commit pending changes with AI-generated messages.
#[derive(Parser, Debug)]
#[command(name = "squawk")]
#[command(about = "Commit pending changes one group or file at a time with AI-generated messages")]
#[command(version)]
struct Cli {
    /// LLM provider CLI to use (claude or codex)
    #[arg(long, global = true, default_value = "claude")]
    provider: Provider,

    /// Language for generated text (e.g. English, Japanese)
    #[arg(long, global = true)]
    language: Option<String>,

    /// Extra instructions appended to every prompt
    #[arg(long, global = true)]
    instructions: Option<String>,

    /// Accept generated text without asking
    #[arg(short = 'y', long, global = true)]
    yes: bool,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Commit every pending change, grouped by pattern or one file at a time (default)
    Squawk {
        /// Leave paths matching this glob untouched (repeatable)
        #[arg(long = "ignore", value_name = "GLOB")]
        ignore: Vec<String>,

        /// Commit paths matching this glob together (repeatable, in order)
        #[arg(long = "group", value_name = "GLOB")]
        group: Vec<String>,

        /// Assign each file to the first matching group only
        #[arg(long)]
        exclusive_groups: bool,
    },

    /// Commit what is staged under one generated message
    Commit {
        /// Stage every pending change first
        #[arg(short, long)]
        all: bool,
    },

    /// Create and switch to a branch named after the pending changes
    Branch,

    /// Print a pull request description for the current branch
    Pr {
        /// Branch the pull request targets
        #[arg(default_value = "main")]
        base: String,
    },

    /// Print a review of the staged (or pending) changes
    Review,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if !cli.yes && !std::io::stdin().is_terminal() {
        bail!("stdin is not a terminal; pass --yes to accept generated text without prompting");
    }

    let config = AppConfig {
        provider: cli.provider,
        generation: GenerationOptions {
            language: cli.language,
            custom_instructions: cli.instructions,
        },
        auto_approve: cli.yes,
    };

    // Step 1: Check prerequisites
    let workspace = GitWorkspace::open(".")
        .context("Not a git repository. Run squawk from within a git repository.")?;

    check_provider_installed(config.provider)
        .await
        .with_context(|| format!("{} CLI is required", config.provider))?;

    let generator = build_generator(config.provider, config.generation.clone());
    let prompt = DialoguerPrompt;

    match cli.command.unwrap_or(Command::Squawk {
        ignore: Vec::new(),
        group: Vec::new(),
        exclusive_groups: false,
    }) {
        Command::Squawk {
            ignore,
            group,
            exclusive_groups,
        } => {
            let mode = if exclusive_groups {
                GroupMode::Exclusive
            } else {
                GroupMode::Overlapping
            };
            let squawk_config = config.squawk(group, ignore, mode);

            // Step 2: Commit item by item
            println!("Committing with {}...", config.provider);
            let squawk = Squawk::new(
                &squawk_config,
                &workspace,
                &*generator,
                &prompt,
                &ConsoleReporter,
            );
            let report = squawk.run_from_status().await.context("Squawk run failed")?;

            println!("\n{}", report.summary());
        }
        command => {
            let ctx = CommandContext {
                workspace: &workspace,
                generator: &*generator,
                prompt: &prompt,
                auto_approve: config.auto_approve,
            };
            run_single(&ctx, command).await?;
        }
    }

    Ok(())
}

/// Run one of the single-shot commands and print its result.
async fn run_single(ctx: &CommandContext<'_>, command: Command) -> Result<()> {
    let (outcome, done) = match command {
        Command::Commit { all } => (
            run_commit(ctx, all).await.context("Failed to commit")?,
            "Committed",
        ),
        Command::Branch => (
            run_branch(ctx).await.context("Failed to create branch")?,
            "Switched to new branch",
        ),
        Command::Pr { base } => (
            run_pr(ctx, &base)
                .await
                .context("Failed to describe pull request")?,
            "",
        ),
        Command::Review => (run_review(ctx).await.context("Failed to review changes")?, ""),
        Command::Squawk { .. } => return Ok(()),
    };

    match outcome {
        CommandOutcome::Done(text) if done.is_empty() => println!("\n{}", text),
        CommandOutcome::Done(text) => println!("✓ {}: {}", done, text),
        CommandOutcome::NothingToDo => println!("No changes found. Nothing to do."),
        CommandOutcome::Cancelled => println!("Cancelled."),
    }

    Ok(())
}

/// Log to stderr; `SQUAWK_LOG` overrides the level chosen by `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "squawk=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("SQUAWK_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
