use crate::error::Result;
use crate::extractor::CommitExtractor;
use crate::git::{Git, GitCli};
use crate::types::CommitClassification;
use std::path::Path;
use tracing::{debug, error, instrument};

/// Collects and classifies the head commit of a repository
pub struct CommitProcessor<G: Git> {
    extractor: CommitExtractor<G>,
    vcs_name: String,
}

impl CommitProcessor<GitCli> {
    /// Create a processor for a local repository using the given VCS binary
    #[instrument(skip(path))]
    pub fn new_from_local(path: &Path, binary: &str) -> Self {
        debug!(path = %path.display(), "Creating processor from local repository");
        Self::new(GitCli::with_binary(binary, path.to_path_buf()), binary)
    }
}

impl<G: Git> CommitProcessor<G> {
    /// Wraps any `Git` implementation; `vcs_name` labels logged errors.
    /// A path to the VCS binary is reduced to its file stem.
    pub fn new(git: G, vcs_name: &str) -> Self {
        let vcs_name = Path::new(vcs_name)
            .file_stem()
            .map_or_else(|| vcs_name.into(), |stem| stem.to_string_lossy());
        Self {
            extractor: CommitExtractor::new(git),
            vcs_name: vcs_name.to_lowercase(),
        }
    }

    #[must_use]
    pub fn vcs_name(&self) -> &str {
        &self.vcs_name
    }

    /// Classifies the head commit.
    ///
    /// Returns `None` after logging when anything could not be fetched from
    /// the VCS. A partial classification is never produced.
    #[instrument(skip(self))]
    pub fn run(&self) -> Option<CommitClassification> {
        let (head_commit, fetch_error) = self.extractor.get_head_commit();
        if let Some(fetch_error) = fetch_error {
            error!(vcs = %format!("{}:", self.vcs_name), error = ?fetch_error, "Failed to fetch head commit");
            return None;
        }

        match self.classify_head(&head_commit) {
            Ok(classification) => Some(classification),
            Err(e) => {
                error!(vcs = %format!("{}:", self.vcs_name), error = %e, "Failed to inspect head commit");
                None
            }
        }
    }

    fn classify_head(&self, head_commit: &str) -> Result<CommitClassification> {
        let classification = self.extractor.commit_for_message(head_commit)?.classify();
        debug!(
            sha = %classification.sha,
            flags = ?classification.flags,
            modified = classification.modified.len(),
            added = classification.added.len(),
            deleted = classification.deleted.len(),
            "Head commit classified"
        );
        Ok(classification)
    }
}
