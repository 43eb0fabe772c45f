//! Integration tests for GitWorkspace against real repositories.

mod common;

use common::TestRepo;
use squawk::git::{ChangeKind, GitWorkspace, Workspace, collect_staged_diff, translate};

#[tokio::test]
async fn test_status_and_numstat_translate_into_changes() {
    let test = TestRepo::new();
    test.write("a.js", "one\n");
    test.write("c.json", "{}\n");
    test.commit_files(&["a.js"], "initial");

    test.write("a.js", "one\ntwo\nthree\n");
    test.write("b.txt", "hello\n");
    test.git(&["add", "c.json"]);

    let workspace = GitWorkspace::open(test.path()).unwrap();
    let status = workspace.raw_status().await.unwrap();
    let numstat = workspace.raw_numstat().await.unwrap();
    let changes = translate(&status, &numstat);

    let a = changes.iter().find(|c| c.path == "a.js").unwrap();
    assert_eq!(a.kind, ChangeKind::Modified);
    assert_eq!((a.additions, a.deletions), (2, 0));

    let b = changes.iter().find(|c| c.path == "b.txt").unwrap();
    assert_eq!(b.kind, ChangeKind::Untracked);
    assert_eq!((b.additions, b.deletions), (0, 0));

    let c = changes.iter().find(|c| c.path == "c.json").unwrap();
    assert_eq!(c.kind, ChangeKind::Added);
}

#[tokio::test]
async fn test_numstat_is_empty_without_history() {
    let test = TestRepo::new();
    test.write("a.js", "one\n");

    let workspace = GitWorkspace::open(test.path()).unwrap();
    assert!(!workspace.has_head().await);
    assert_eq!(workspace.raw_numstat().await.unwrap(), "");

    let changes = translate(&workspace.raw_status().await.unwrap(), "");
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].kind, ChangeKind::Untracked);
}

#[tokio::test]
async fn test_stage_diff_commit_cycle() {
    let test = TestRepo::new();
    test.write("README.md", "# demo\n");
    test.commit_files(&["README.md"], "initial");

    test.write("src/lib.rs", "pub fn answer() -> u32 { 42 }\n");
    test.write("notes.txt", "todo\n");

    let workspace = GitWorkspace::open(test.path()).unwrap();
    workspace.stage(&["src/lib.rs".to_string()]).await.unwrap();

    let diff = workspace.staged_diff().await.unwrap();
    assert!(diff.contains("+++ b/src/lib.rs"));
    assert!(!diff.contains("notes.txt"));

    workspace.commit("feat: add answer").await.unwrap();

    assert_eq!(test.subjects(), vec!["feat: add answer", "initial"]);
    assert_eq!(test.files_in("HEAD"), vec!["src/lib.rs"]);
    assert_eq!(workspace.staged_diff().await.unwrap(), "");
}

#[tokio::test]
async fn test_stage_deleted_file() {
    let test = TestRepo::new();
    test.write("gone.txt", "bye\n");
    test.commit_files(&["gone.txt"], "initial");
    std::fs::remove_file(test.path().join("gone.txt")).unwrap();

    let workspace = GitWorkspace::open(test.path()).unwrap();
    workspace.stage(&["gone.txt".to_string()]).await.unwrap();

    let diff = workspace.staged_diff().await.unwrap();
    assert!(diff.contains("-bye"));
}

#[tokio::test]
async fn test_unstage_all_with_history() {
    let test = TestRepo::new();
    test.write("a.txt", "a\n");
    test.commit_files(&["a.txt"], "initial");
    test.write("a.txt", "changed\n");

    let workspace = GitWorkspace::open(test.path()).unwrap();
    workspace.stage(&["a.txt".to_string()]).await.unwrap();
    assert!(!workspace.staged_diff().await.unwrap().is_empty());

    workspace.unstage_all().await.unwrap();
    assert_eq!(workspace.staged_diff().await.unwrap(), "");
    // The working tree keeps the edit.
    assert_eq!(
        std::fs::read_to_string(test.path().join("a.txt")).unwrap(),
        "changed\n"
    );
}

#[tokio::test]
async fn test_unstage_all_without_history() {
    let test = TestRepo::new();
    test.write("a.txt", "a\n");

    let workspace = GitWorkspace::open(test.path()).unwrap();
    workspace.stage(&["a.txt".to_string()]).await.unwrap();
    assert!(!collect_staged_diff(test.path()).unwrap().is_empty());

    workspace.unstage_all().await.unwrap();
    assert!(collect_staged_diff(test.path()).unwrap().is_empty());
    assert!(test.path().join("a.txt").exists());
}

#[tokio::test]
async fn test_commit_message_with_shell_characters_is_kept_verbatim() {
    let test = TestRepo::new();
    test.write("a.txt", "a\n");

    let workspace = GitWorkspace::open(test.path()).unwrap();
    workspace.stage(&["a.txt".to_string()]).await.unwrap();
    workspace
        .commit("fix: handle `$HOME` and \"quotes\"; rm -rf nothing")
        .await
        .unwrap();

    assert_eq!(
        test.subjects(),
        vec!["fix: handle `$HOME` and \"quotes\"; rm -rf nothing"]
    );
}

#[tokio::test]
async fn test_stage_unknown_path_stages_nothing() {
    let test = TestRepo::new();
    let workspace = GitWorkspace::open(test.path()).unwrap();

    workspace.stage(&["missing.txt".to_string()]).await.unwrap();
    assert_eq!(workspace.staged_diff().await.unwrap(), "");
}

#[tokio::test]
async fn test_stage_already_committed_deletion_is_a_no_op() {
    let test = TestRepo::new();
    test.write("gone.txt", "bye\n");
    test.commit_files(&["gone.txt"], "initial");
    std::fs::remove_file(test.path().join("gone.txt")).unwrap();

    let workspace = GitWorkspace::open(test.path()).unwrap();
    workspace.stage(&["gone.txt".to_string()]).await.unwrap();
    workspace.commit("chore: remove gone.txt").await.unwrap();

    workspace.stage(&["gone.txt".to_string()]).await.unwrap();
    assert_eq!(workspace.staged_diff().await.unwrap(), "");
}

#[tokio::test]
async fn test_branch_helpers() {
    let test = TestRepo::new();
    test.write("a.txt", "a\n");
    test.commit_files(&["a.txt"], "initial");
    let workspace = GitWorkspace::open(test.path()).unwrap();
    let base = workspace.current_branch().await.unwrap();

    workspace.create_branch("feat/login").await.unwrap();
    assert_eq!(workspace.current_branch().await.unwrap(), "feat/login");

    test.write("login.rs", "fn login() {}\n");
    workspace.stage(&["login.rs".to_string()]).await.unwrap();
    workspace.commit("feat: add login").await.unwrap();

    let diff = workspace.diff_against(&base).await.unwrap();
    assert!(diff.contains("+fn login() {}"));
    let log = workspace.log_against(&base).await.unwrap();
    assert!(log.trim().ends_with("feat: add login"));
    assert_eq!(log.lines().count(), 1);
}

#[tokio::test]
async fn test_pending_diff_includes_unstaged_edits() {
    let test = TestRepo::new();
    test.write("a.txt", "a\n");
    test.commit_files(&["a.txt"], "initial");
    test.write("a.txt", "b\n");

    let workspace = GitWorkspace::open(test.path()).unwrap();
    let diff = workspace.pending_diff().await.unwrap();
    assert!(diff.contains("-a"));
    assert!(diff.contains("+b"));
}
