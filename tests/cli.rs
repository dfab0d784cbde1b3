/*!
 * Command-line tests for treeclip
 */

use std::env;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;

fn treeclip(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_treeclip"))
        .current_dir(cwd)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run treeclip")
}

fn setup_project(root: &Path) {
    fs::create_dir_all(root.join("folder1").join("subfolder")).unwrap();
    fs::write(root.join("file1.txt"), "Content of file1").unwrap();
    fs::write(root.join("folder1").join("file3.txt"), "Content of file3").unwrap();
    fs::write(
        root.join("folder1").join("subfolder").join("file4.txt"),
        "Content of file4",
    )
    .unwrap();
}

#[test]
fn test_stdout_export() {
    let temp_dir = tempdir().unwrap();
    setup_project(temp_dir.path());

    let output = treeclip(temp_dir.path(), &["--stdout", "--quiet", "folder1", "file1.txt"]);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        concat!(
            "folder1\n",
            "  ├── file3.txt\n",
            "  └── subfolder\n",
            "      └── file4.txt\n",
            "file1.txt\n",
            "\n\n",
            "File: folder1/file3.txt\n```\nContent of file3\n```\n\n",
            "File: folder1/subfolder/file4.txt\n```\nContent of file4\n```\n\n",
            "File: file1.txt\n```\nContent of file1\n```\n\n",
        )
    );
}

#[test]
fn test_target_is_used_without_paths() {
    let temp_dir = tempdir().unwrap();
    setup_project(temp_dir.path());

    let output = treeclip(temp_dir.path(), &["--stdout", "--quiet", "--target", "file1.txt"]);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "file1.txt\n\n\nFile: file1.txt\n```\nContent of file1\n```\n\n"
    );
}

#[test]
fn test_output_file() {
    let temp_dir = tempdir().unwrap();
    setup_project(temp_dir.path());

    let output = treeclip(temp_dir.path(), &["--quiet", "-o", "context.md", "file1.txt"]);

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    let written = fs::read_to_string(temp_dir.path().join("context.md")).unwrap();
    assert!(written.starts_with("file1.txt\n"));
}

#[test]
fn test_empty_selection_fails() {
    let temp_dir = tempdir().unwrap();

    let output = treeclip(temp_dir.path(), &["--stdout"]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Please select files or folders to export."));
}

#[test]
fn test_empty_selection_checked_before_root() {
    let temp_dir = tempdir().unwrap();
    let missing_root = temp_dir.path().join("missing");

    let output = treeclip(
        temp_dir.path(),
        &["--stdout", "--root", missing_root.to_str().unwrap()],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid input: Please select files or folders to export."));
    assert!(!stderr.contains("Root directory not found"));
}

#[test]
fn test_failure_reported_once() {
    let temp_dir = tempdir().unwrap();
    setup_project(temp_dir.path());

    let output = treeclip(temp_dir.path(), &["--stdout", "non-existent.txt"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("non-existent.txt").count(), 1);
}

#[test]
fn test_missing_file_fails_without_output() {
    let temp_dir = tempdir().unwrap();
    setup_project(temp_dir.path());

    let output = treeclip(temp_dir.path(), &["--stdout", "file1.txt", "non-existent.txt"]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error copying file tree: IO error:"));
    assert!(stderr.contains("non-existent.txt"));
}

#[test]
#[ignore] // This test requires tmux to be running and is ignored by default
          // To run this test manually use: cargo test --test cli -- --ignored
fn test_clipboard_export() {
    // Skip if not in a tmux session
    if env::var("TMUX").is_err() {
        return;
    }

    let temp_dir = tempdir().unwrap();
    setup_project(temp_dir.path());

    let output = treeclip(temp_dir.path(), &["--quiet", "file1.txt"]);
    assert!(output.status.success());

    let clipboard_output = Command::new("tmux").args(["show-buffer"]).output().unwrap();
    let clipboard_content = String::from_utf8_lossy(&clipboard_output.stdout);

    assert_eq!(
        clipboard_content,
        "file1.txt\n\n\nFile: file1.txt\n```\nContent of file1\n```\n\n"
    );
}
