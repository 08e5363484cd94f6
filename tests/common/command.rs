use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// A real git repository with a handful of staged files
///
/// Returns `None` when git is not installed, so callers can skip.
pub fn git_repository_dir(files: &[(&str, &str)]) -> Option<TempDir> {
    if !git_available() {
        return None;
    }

    let dir = TempDir::new().expect("Failed to create temp dir");
    run_git_command(dir.path(), &["init", "--quiet"])
        .assert()
        .success();

    for (path, content) in files {
        write_file(FileSpec::new(dir.path().join(path), content.to_string()));
    }

    run_git_command(dir.path(), &["add", "."]).assert().success();

    Some(dir)
}

pub fn git_available() -> bool {
    std::process::Command::new("git")
        .arg("--version")
        .output()
        .is_ok_and(|output| output.status.success())
}

pub fn run_dirc_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("dirc").expect("Failed to find dirc binary");
    cmd.current_dir(dir).env_remove("RUST_LOG");
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn run_git_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::new("git");
    cmd.envs(vec![
        ("GIT_CONFIG_NOSYSTEM", "1"),
        ("GIT_CONFIG_GLOBAL", "/dev/null"),
    ]);
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}
