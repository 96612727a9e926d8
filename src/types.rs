use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
}

impl FileStatus {
    /// Maps a `--name-status` kind letter to a status. Anything other than
    /// `M`, `A` or `D` (renames, copies, type changes) is not classified.
    #[must_use]
    pub fn from_letter(letter: &str) -> Option<Self> {
        match letter {
            "M" => Some(Self::Modified),
            "A" => Some(Self::Added),
            "D" => Some(Self::Deleted),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChange {
    pub path: String,
    pub status: FileStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitFlag {
    CiSkip,
    Merge,
}

/// One revision under inspection, rebuilt on every run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commit {
    pub sha: String,
    pub raw_message: String,
    pub parent_count: usize,
    pub changed_paths: Vec<FileChange>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitClassification {
    pub raw_message: String,
    pub sha: String,
    pub flags: BTreeSet<CommitFlag>,
    pub modified: Vec<String>,
    pub added: Vec<String>,
    pub deleted: Vec<String>,
}

impl CommitClassification {
    pub const MESSAGE: &'static str = "HEAD commit information";

    #[must_use]
    pub fn is_ci_skip(&self) -> bool {
        self.flags.contains(&CommitFlag::CiSkip)
    }

    #[must_use]
    pub fn is_merge(&self) -> bool {
        self.flags.contains(&CommitFlag::Merge)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
}

/// A result reported back to the host collector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    pub message: String,
    pub file: String,
    pub line: usize,
}

/// A link found by an upstream checker, together with its verdict on
/// whether some archive already holds a copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkCandidate {
    pub url: String,
    pub line: usize,
    #[serde(default)]
    pub archived: bool,
}
