use tracing::{debug, instrument};

use crate::classifier::{parse_diff_summary, parse_parent_ids};
use crate::error::Result;
use crate::git::Git;
use crate::types::Commit;

/// Gathers the raw facts about the head commit from the VCS.
pub struct CommitExtractor<G: Git> {
    git: G,
}

impl<G: Git> CommitExtractor<G> {
    #[must_use]
    pub const fn new(git: G) -> Self {
        Self { git }
    }

    /// Fetches the head commit message.
    ///
    /// Returns the message and no error on success. On failure the message
    /// is empty and the error text is returned instead.
    #[instrument(skip(self))]
    pub fn get_head_commit(&self) -> (String, Option<String>) {
        match self.head_message() {
            Ok(message) => (message, None),
            Err(e) => (String::new(), Some(e.to_string())),
        }
    }

    fn head_message(&self) -> Result<String> {
        self.git.run_git_command(&["log", "-1", "--pretty=%B"])
    }

    /// Resolves `HEAD` to a revision id.
    ///
    /// # Errors
    ///
    /// Returns an error if the VCS command fails
    pub fn head_sha(&self) -> Result<String> {
        let sha = self.git.run_git_command(&["rev-parse", "HEAD"])?;
        Ok(sha.trim().to_string())
    }

    /// Lists the parents of `sha`; empty for a root commit.
    ///
    /// # Errors
    ///
    /// Returns an error if the VCS command fails
    pub fn parent_ids(&self, sha: &str) -> Result<Vec<String>> {
        let raw = self
            .git
            .run_git_command(&["log", "--pretty=%P", "-n", "1", sha])?;
        Ok(parse_parent_ids(&raw))
    }

    /// Returns the `--name-status` lines of the diff introduced by `sha`.
    ///
    /// # Errors
    ///
    /// Returns an error if the VCS command fails
    pub fn diff_summary(&self, sha: &str) -> Result<Vec<String>> {
        let raw = self
            .git
            .run_git_command(&["show", "--pretty=", "--name-status", sha])?;
        Ok(parse_diff_summary(&raw))
    }

    /// Builds the full `Commit` record for the head revision.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the underlying VCS commands fail
    #[instrument(skip(self))]
    pub fn extract_head(&self) -> Result<Commit> {
        let raw_message = self.head_message()?;
        self.commit_for_message(&raw_message)
    }

    /// Completes a `Commit` around an already fetched head message by
    /// resolving its sha, parents and diff summary.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the underlying VCS commands fail
    pub fn commit_for_message(&self, raw_message: &str) -> Result<Commit> {
        let sha = self.head_sha()?;
        let parents = self.parent_ids(&sha)?;
        let diff_lines = self.diff_summary(&sha)?;

        let commit = Commit::from_parts(&sha, raw_message, parents.as_slice(), diff_lines.as_slice());
        debug!(
            sha = %commit.sha,
            parent_count = commit.parent_count,
            changed = commit.changed_paths.len(),
            "Head commit extracted"
        );
        Ok(commit)
    }
}
