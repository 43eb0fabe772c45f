//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::path::Path;
use std::process::Command;
use std::sync::Mutex;

use async_trait::async_trait;
use git2::{Oid, Repository, Signature};

use squawk::approval::{Choice, HumanPrompt};
use squawk::error::{GenerateError, InteractionError};
use squawk::llm::{GenerationKind, TextGenerator};

/// A test git repository builder for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a new empty git repository in a temp directory.
    ///
    /// Identity and signing are configured locally so the `git` CLI can
    /// commit regardless of the machine's global config.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");
        {
            let mut config = repo.config().expect("Failed to open repo config");
            config.set_str("user.name", "Test User").unwrap();
            config.set_str("user.email", "test@example.com").unwrap();
            config.set_bool("commit.gpgsign", false).unwrap();
            config.set_str("core.hooksPath", "/dev/null").unwrap();
        }
        Self { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file relative to the repository root, creating parent dirs.
    pub fn write(&self, relative: &str, content: &str) {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&path, content).expect("Failed to write file");
    }

    /// Get the test signature for commits.
    fn signature(&self) -> Signature<'_> {
        Signature::now("Test User", "test@example.com").expect("Failed to create signature")
    }

    /// Stage every listed file and commit it through libgit2. Returns the commit OID.
    pub fn commit_files(&self, files: &[&str], message: &str) -> Oid {
        let sig = self.signature();

        let mut index = self.repo.index().expect("Failed to get index");
        for file in files {
            index.add_path(Path::new(file)).expect("Failed to add file");
        }
        index.write().expect("Failed to write index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        // Get parent commit if exists
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// Run the git CLI in the repository and return trimmed stdout.
    pub fn git(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .args(args)
            .current_dir(self.dir.path())
            .output()
            .expect("Failed to run git");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    /// Commit subjects, newest first.
    pub fn subjects(&self) -> Vec<String> {
        self.git(&["log", "--format=%s"])
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Files touched by the commit at `rev`.
    pub fn files_in(&self, rev: &str) -> Vec<String> {
        self.git(&["show", "--name-only", "--format=", rev])
            .lines()
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Generator that names the files found in the diff, like `update a.js, b.txt`.
///
/// Deleted files are named by their `--- a/` header.
#[derive(Default)]
pub struct FileListGenerator {
    pub calls: Mutex<Vec<(GenerationKind, Option<String>)>>,
}

#[async_trait]
impl TextGenerator for FileListGenerator {
    async fn generate(
        &self,
        context: &str,
        kind: GenerationKind,
        instructions: Option<String>,
    ) -> Result<String, GenerateError> {
        self.calls.lock().unwrap().push((kind, instructions));

        let mut files: Vec<&str> = Vec::new();
        for line in context.lines() {
            let path = line
                .strip_prefix("--- a/")
                .or_else(|| line.strip_prefix("+++ b/"));
            if let Some(path) = path {
                if !files.contains(&path) {
                    files.push(path);
                }
            }
        }
        Ok(match kind {
            GenerationKind::Branch => "feat/update-files".to_string(),
            _ => format!("update {}", files.join(", ")),
        })
    }
}

/// Prompt that answers from a script and fails the test when it runs out.
pub struct ScriptedPrompt {
    choices: Mutex<Vec<Option<Choice>>>,
    instructions: Mutex<Vec<Option<String>>>,
}

impl ScriptedPrompt {
    pub fn new(choices: Vec<Option<Choice>>, instructions: Vec<Option<String>>) -> Self {
        Self {
            choices: Mutex::new(choices.into_iter().rev().collect()),
            instructions: Mutex::new(instructions.into_iter().rev().collect()),
        }
    }

    /// A prompt that must never be consulted.
    pub fn unused() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    pub fn remaining(&self) -> usize {
        self.choices.lock().unwrap().len() + self.instructions.lock().unwrap().len()
    }
}

#[async_trait]
impl HumanPrompt for ScriptedPrompt {
    async fn choose(
        &self,
        _kind: GenerationKind,
        _text: &str,
    ) -> Result<Option<Choice>, InteractionError> {
        self.choices
            .lock()
            .unwrap()
            .pop()
            .ok_or_else(|| InteractionError::PromptFailed("unexpected choice prompt".to_string()))
    }

    async fn instructions(&self) -> Result<Option<String>, InteractionError> {
        self.instructions
            .lock()
            .unwrap()
            .pop()
            .ok_or_else(|| {
                InteractionError::PromptFailed("unexpected instructions prompt".to_string())
            })
    }
}
