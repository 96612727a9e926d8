use std::path::PathBuf;
use std::process::Command;
use tracing::{debug, instrument};

use crate::error::{Error, Result};

pub const DEFAULT_VCS_BINARY: &str = "git";

/// Trait defining the VCS operations required by the library
pub trait Git {
    /// Run a VCS command with the given arguments.
    ///
    /// Returns stdout with Windows line endings normalized to `\n`. The
    /// output is not trimmed, callers decide how much whitespace matters.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be executed or exits non-zero
    fn run_git_command(&self, args: &[&str]) -> Result<String>;
}

impl<G: Git + ?Sized> Git for &G {
    fn run_git_command(&self, args: &[&str]) -> Result<String> {
        (**self).run_git_command(args)
    }
}

/// Implementation of VCS operations using the local Git CLI
pub struct GitCli {
    binary: String,
    repo_path: PathBuf,
}

impl GitCli {
    /// Creates a new `GitCli` running `git` inside the given working directory
    #[must_use]
    pub fn new(repo_path: PathBuf) -> Self {
        Self::with_binary(DEFAULT_VCS_BINARY, repo_path)
    }

    /// Creates a new `GitCli` running a custom VCS binary
    #[must_use]
    pub fn with_binary(binary: impl Into<String>, repo_path: PathBuf) -> Self {
        Self {
            binary: binary.into(),
            repo_path,
        }
    }
}

impl Git for GitCli {
    #[instrument(skip(self), fields(binary = %self.binary, args = ?args, repo_path = %self.repo_path.display()))]
    fn run_git_command(&self, args: &[&str]) -> Result<String> {
        let output = Command::new(&self.binary)
            .args(args)
            .current_dir(&self.repo_path)
            .output()
            .map_err(|e| Error::GitCommandError(e.to_string()))?;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr);
            debug!(error = %error, "Git command failed");
            return Err(Error::GitCommandError(error.trim().to_string()));
        }

        let result = String::from_utf8(output.stdout)
            .map(|s| s.replace("\r\n", "\n"))
            .map_err(|e| Error::GitCommandError(e.to_string()))?;

        debug!(
            output_length = result.len(),
            "Git command completed successfully"
        );
        Ok(result)
    }
}

/// Checks that the VCS binary can be executed at all.
///
/// # Errors
///
/// Returns a user-facing message when the binary is missing
pub fn check_prerequisites(binary: &str) -> std::result::Result<(), String> {
    match Command::new(binary).arg("--version").output() {
        Ok(output) if output.status.success() => Ok(()),
        _ => {
            debug!(binary = %binary, "VCS binary not available");
            Err(format!("{binary} is not installed."))
        }
    }
}
