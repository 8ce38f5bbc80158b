use crate::error::{FameError, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Thin boundary around the `git` binary. Every query runs inside the
/// repository directory and returns captured stdout; a non-zero exit status
/// or non-UTF-8 output is an error carrying the offending command line.
#[derive(Debug, Clone)]
pub struct GitCli {
    repo: PathBuf,
}

impl GitCli {
    pub fn new<P: AsRef<Path>>(repo: P) -> Self {
        Self {
            repo: repo.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.repo
    }

    /// Paths of all files present at `revision`.
    pub fn ls_tree(&self, revision: &str) -> Result<Vec<String>> {
        let out = self.run(&["ls-tree", "-r", revision, "--name-only"])?;
        Ok(out.lines().map(str::to_string).collect())
    }

    /// Machine-readable per-line attribution for one file at `revision`.
    /// Empty files produce empty output with a zero exit status.
    pub fn blame_porcelain(&self, revision: &str, file: &str) -> Result<String> {
        self.run(&["blame", "--porcelain", revision, "--", file])
    }

    /// Commit log for one file at `revision`, newest first.
    pub fn log_file(&self, revision: &str, file: &str) -> Result<String> {
        self.run(&["log", revision, "--", file])
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let command = || format!("git {}", args.join(" "));

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo)
            .output()
            .map_err(|source| FameError::Spawn {
                command: command(),
                source,
            })?;

        if !output.status.success() {
            return Err(FameError::GitCommand {
                command: command(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| FameError::NonUtf8Output {
            command: command(),
        })
    }
}
