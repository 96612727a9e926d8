pub use archive::{Archiver, LinkBackup, SubmissionOutcome};
pub use classifier::classify;
pub use config::Config;
pub use error::{Error, Result};
pub use extractor::CommitExtractor;
pub use git::{check_prerequisites, Git, GitCli};
pub use processor::CommitProcessor;
pub use types::{
    Commit, CommitClassification, CommitFlag, FileChange, FileStatus, Finding, LinkCandidate,
    Severity,
};

use std::path::Path;

pub mod archive;
pub mod classifier;
pub mod config;
mod error;
mod extractor;
mod git;
pub mod processor;
mod types;

/// Classifies the head commit of a local repository.
///
/// # Arguments
///
/// * `repo_path`: Working directory of the repository.
/// * `config`: Settings; only `vcs_binary` is used here.
///
/// Returns `None` when the head commit could not be read. The failure is
/// logged, never returned.
#[must_use]
pub fn classify_head(repo_path: &Path, config: &Config) -> Option<CommitClassification> {
    CommitProcessor::new_from_local(repo_path, &config.vcs_binary).run()
}

/// Creates a `LinkBackup` submitter from the archive settings in `config`.
///
/// # Errors
///
/// Returns an error if the configured template is invalid or the HTTP client
/// cannot be created.
pub fn link_backup(config: &Config) -> Result<LinkBackup> {
    LinkBackup::new(config.archiver, config.archive_url_template.as_deref())
}
