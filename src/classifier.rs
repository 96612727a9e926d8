use std::collections::BTreeSet;

use crate::types::{Commit, CommitClassification, CommitFlag, FileChange, FileStatus};

const CI_SKIP_MARKERS: [&str; 2] = ["[ci skip]", "[skip ci]"];

/// Classifies a commit from the raw pieces the VCS reports about it.
///
/// `parent_commit_ids` decides merge status (two or more parents) and
/// `diff_summary_lines` are `--name-status` lines of the form `<letter>\t<path>`.
/// Lines with an unknown letter or without a tab are dropped.
#[must_use]
pub fn classify<P, L>(
    raw_message: &str,
    sha: &str,
    parent_commit_ids: &[P],
    diff_summary_lines: &[L],
) -> CommitClassification
where
    P: AsRef<str>,
    L: AsRef<str>,
{
    Commit::from_parts(sha, raw_message, parent_commit_ids, diff_summary_lines).classify()
}

fn detect_flags(raw_message: &str, parent_count: usize) -> BTreeSet<CommitFlag> {
    let mut flags = BTreeSet::new();

    let message = raw_message.strip_suffix('\n').unwrap_or(raw_message);
    // Unanchored: the marker may sit anywhere in the message, even mid-word.
    if CI_SKIP_MARKERS.iter().any(|marker| message.contains(marker)) {
        flags.insert(CommitFlag::CiSkip);
    }
    if parent_count >= 2 {
        flags.insert(CommitFlag::Merge);
    }
    flags
}

/// Splits the output of `log --pretty=%P` into parent ids.
#[must_use]
pub fn parse_parent_ids(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(ToString::to_string).collect()
}

/// Splits `show --name-status` output into lines, tolerating CRLF and a
/// trailing newline.
#[must_use]
pub fn parse_diff_summary(raw: &str) -> Vec<String> {
    raw.replace("\r\n", "\n")
        .lines()
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Parses a single `<letter>\t<path>` line. Everything after the first tab
/// is the path, embedded tabs included.
#[must_use]
pub fn parse_diff_line(line: &str) -> Option<FileChange> {
    let (letter, path) = line.split_once('\t')?;
    let status = FileStatus::from_letter(letter)?;
    Some(FileChange {
        path: path.to_string(),
        status,
    })
}

impl Commit {
    /// Builds a commit record from already split parent ids and diff lines.
    /// Blank parent ids are not counted; unclassified diff lines are dropped.
    #[must_use]
    pub fn from_parts<P, L>(
        sha: &str,
        raw_message: &str,
        parent_commit_ids: &[P],
        diff_summary_lines: &[L],
    ) -> Self
    where
        P: AsRef<str>,
        L: AsRef<str>,
    {
        let parent_count = parent_commit_ids
            .iter()
            .filter(|id| !id.as_ref().trim().is_empty())
            .count();
        let changed_paths = diff_summary_lines
            .iter()
            .filter_map(|line| parse_diff_line(line.as_ref()))
            .collect();

        Self {
            sha: sha.to_string(),
            raw_message: raw_message.to_string(),
            parent_count,
            changed_paths,
        }
    }

    /// Builds a commit record from raw VCS output.
    #[must_use]
    pub fn from_vcs_output(
        sha: &str,
        raw_message: &str,
        parents_raw: &str,
        name_status_raw: &str,
    ) -> Self {
        Self::from_parts(
            sha,
            raw_message,
            parse_parent_ids(parents_raw).as_slice(),
            parse_diff_summary(name_status_raw).as_slice(),
        )
    }

    #[must_use]
    pub fn classify(&self) -> CommitClassification {
        let mut modified = Vec::new();
        let mut added = Vec::new();
        let mut deleted = Vec::new();
        for change in &self.changed_paths {
            let bucket = match change.status {
                FileStatus::Modified => &mut modified,
                FileStatus::Added => &mut added,
                FileStatus::Deleted => &mut deleted,
            };
            bucket.push(change.path.clone());
        }

        CommitClassification {
            raw_message: self.raw_message.clone(),
            sha: self.sha.clone(),
            flags: detect_flags(&self.raw_message, self.parent_count),
            modified,
            added,
            deleted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_LINES: [&str; 0] = [];

    #[test]
    fn test_ci_skip_markers() {
        for message in [
            "Add feature [ci skip]",
            "[skip ci] docs only",
            "fix typo\n\nbody text [ci skip] trailing\n",
            "embedded[skip ci]word",
        ] {
            let result = classify(message, "abc", &["p1"], &NO_LINES);
            assert!(result.is_ci_skip(), "expected ci_skip for {message:?}");
        }

        for message in ["Add feature", "[CI SKIP] wrong case", "[ci-skip]", ""] {
            let result = classify(message, "abc", &["p1"], &NO_LINES);
            assert!(!result.is_ci_skip(), "unexpected ci_skip for {message:?}");
        }
    }

    #[test]
    fn test_both_markers_flag_once() {
        let result = classify("[ci skip] and [skip ci]", "abc", &["p1"], &NO_LINES);
        assert_eq!(result.flags.len(), 1);
        assert!(result.is_ci_skip());
    }

    #[test]
    fn test_merge_detection() {
        let no_parents: [&str; 0] = [];
        assert!(!classify("root", "a", &no_parents, &NO_LINES).is_merge());
        assert!(!classify("normal", "a", &["p1"], &NO_LINES).is_merge());
        assert!(classify("merge", "a", &["p1", "p2"], &NO_LINES).is_merge());
        assert!(classify("octopus", "a", &["p1", "p2", "p3"], &NO_LINES).is_merge());
    }

    #[test]
    fn test_trailing_empty_parent_is_not_counted() {
        let parents = parse_parent_ids("abc123\n");
        assert_eq!(parents, vec!["abc123".to_string()]);
        assert!(!classify("msg", "a", parents.as_slice(), &NO_LINES).is_merge());

        // An empty element that slipped through a naive split is ignored as well.
        assert!(!classify("msg", "a", &["abc123", ""], &NO_LINES).is_merge());
        assert_eq!(parse_parent_ids("p1 p2\n").len(), 2);
    }

    #[test]
    fn test_diff_buckets() {
        let lines = ["M\tfile1.txt", "A\tfile2.txt", "D\tfile3.txt"];
        let result = classify("msg", "sha", &["p1"], &lines);
        assert_eq!(result.modified, vec!["file1.txt"]);
        assert_eq!(result.added, vec!["file2.txt"]);
        assert_eq!(result.deleted, vec!["file3.txt"]);
    }

    #[test]
    fn test_empty_commit() {
        let result = classify("Merge [skip ci]", "sha", &["p1", "p2"], &NO_LINES);
        assert!(result.modified.is_empty());
        assert!(result.added.is_empty());
        assert!(result.deleted.is_empty());
        assert_eq!(
            result.flags,
            BTreeSet::from([CommitFlag::CiSkip, CommitFlag::Merge])
        );
    }

    #[test]
    fn test_add_feature_example() {
        let result = classify("Add feature [ci skip]", "sha1", &["abc123"], &["A\tnew.py"]);
        assert_eq!(result.flags, BTreeSet::from([CommitFlag::CiSkip]));
        assert!(result.modified.is_empty());
        assert_eq!(result.added, vec!["new.py"]);
        assert!(result.deleted.is_empty());
        assert_eq!(result.raw_message, "Add feature [ci skip]");
        assert_eq!(result.sha, "sha1");
    }

    #[test]
    fn test_unknown_and_malformed_lines_are_dropped() {
        let lines = [
            "R100\told.txt\tnew.txt",
            "no tab here",
            "",
            "M\tkept.txt",
            "T\ttype-change.txt",
        ];
        let result = classify("msg", "sha", &["p1"], &lines);
        assert_eq!(result.modified, vec!["kept.txt"]);
        assert!(result.added.is_empty());
        assert!(result.deleted.is_empty());
    }

    #[test]
    fn test_path_keeps_embedded_tabs_and_order() {
        let lines = ["A\tb.txt", "A\tdir/with\ttab.txt", "A\ta.txt"];
        let result = classify("msg", "sha", &["p1"], &lines);
        assert_eq!(result.added, vec!["b.txt", "dir/with\ttab.txt", "a.txt"]);
    }

    #[test]
    fn test_classify_is_idempotent() {
        let lines = ["M\tx", "D\ty"];
        let first = classify("msg [ci skip]", "sha", &["p1", "p2"], &lines);
        let second = classify("msg [ci skip]", "sha", &["p1", "p2"], &lines);
        assert_eq!(first, second);
    }

    #[test]
    fn test_diff_summary_normalizes_crlf() {
        let lines = parse_diff_summary("M\tfile1.txt\r\nA\tfile2.txt\r\n");
        assert_eq!(lines, vec!["M\tfile1.txt", "A\tfile2.txt"]);
    }

    #[test]
    fn test_commit_record_matches_classify() {
        let commit = Commit::from_vcs_output(
            "sha",
            "Merge branch [ci skip]\n",
            "p1 p2\n",
            "M\tsrc/lib.rs\nA\tsrc/new.rs\nD\told.rs\nR090\ta\tb\n",
        );
        assert_eq!(commit.parent_count, 2);
        assert_eq!(commit.changed_paths.len(), 3);

        let lines = parse_diff_summary("M\tsrc/lib.rs\nA\tsrc/new.rs\nD\told.rs\nR090\ta\tb\n");
        let expected = classify("Merge branch [ci skip]\n", "sha", &["p1", "p2"], &lines);
        assert_eq!(commit.classify(), expected);
    }
}
