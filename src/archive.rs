use std::fmt;
use std::str::FromStr;

use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use reqwest::StatusCode;
use tracing::{debug, error, info, instrument};

use crate::error::{Error, Result};
use crate::types::{Finding, LinkCandidate, Severity};

pub const ARCHIVE_ORG_SAVE_URL_TEMPLATE: &str = "https://web.archive.org/save/%s";
pub const ARCHIVE_IS_SUBMIT_URL: &str = "https://archive.is/submit/";

/// Reads `[{"url": .., "line": .., "archived": ..}]` as produced by an
/// upstream link checker.
///
/// # Errors
///
/// Returns an error if the input is not a JSON array of candidates
pub fn parse_candidates(content: &str) -> Result<Vec<LinkCandidate>> {
    Ok(serde_json::from_str(content)?)
}

/// A public web archive that accepts submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Archiver {
    /// `HEAD` on the save endpoint, the URL is spliced into the template.
    #[default]
    ArchiveOrg,
    /// `POST` of a `url` form field to a fixed submit endpoint.
    ArchiveIs,
}

impl Archiver {
    #[must_use]
    pub const fn default_template(self) -> &'static str {
        match self {
            Self::ArchiveOrg => ARCHIVE_ORG_SAVE_URL_TEMPLATE,
            Self::ArchiveIs => ARCHIVE_IS_SUBMIT_URL,
        }
    }

    /// Host name used in log lines.
    #[must_use]
    pub const fn service_name(self) -> &'static str {
        match self {
            Self::ArchiveOrg => "web.archive.org",
            Self::ArchiveIs => "archive.is",
        }
    }
}

impl fmt::Display for Archiver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArchiveOrg => f.write_str("archive.org"),
            Self::ArchiveIs => f.write_str("archive.is"),
        }
    }
}

impl FromStr for Archiver {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "archive.org" => Ok(Self::ArchiveOrg),
            "archive.is" => Ok(Self::ArchiveIs),
            other => Err(Error::ConfigError(format!(
                "unknown archiver `{other}`, expected `archive.org` or `archive.is`"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Success,
    /// The archive answered with something other than 200.
    Failed { status: u16 },
    /// The request never got an answer.
    NetworkError(String),
}

impl SubmissionOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Submits unarchived links to a web archive, one attempt per link.
pub struct LinkBackup {
    archiver: Archiver,
    template: String,
    client: Client,
}

impl LinkBackup {
    /// Creates a submitter for `archiver`, optionally overriding its endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if an archive.org template does not contain exactly
    /// one `%s` placeholder or the HTTP client cannot be built
    pub fn new(archiver: Archiver, template: Option<&str>) -> Result<Self> {
        let template = template.unwrap_or_else(|| archiver.default_template());
        if archiver == Archiver::ArchiveOrg && template.matches("%s").count() != 1 {
            return Err(Error::ConfigError(format!(
                "archive url template `{template}` must contain exactly one `%s` placeholder"
            )));
        }

        // A redirect from the save endpoint is a failed submission, not a hop.
        let client = Client::builder()
            .user_agent(concat!("repo-bears/", env!("CARGO_PKG_VERSION")))
            .redirect(Policy::none())
            .build()?;

        Ok(Self {
            archiver,
            template: template.to_string(),
            client,
        })
    }

    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    #[must_use]
    pub const fn archiver(&self) -> Archiver {
        self.archiver
    }

    /// Submits a single URL. Never retries.
    #[instrument(skip(self), fields(archiver = %self.archiver))]
    pub fn submit(&self, url: &str) -> SubmissionOutcome {
        let request = match self.archiver {
            Archiver::ArchiveOrg => self.client.head(self.template.replacen("%s", url, 1)),
            Archiver::ArchiveIs => self.client.post(&self.template).form(&[("url", url)]),
        };

        match request.send() {
            Ok(resp) if resp.status() == StatusCode::OK => {
                info!(
                    "This link ({url}) successfully submitted with {} method",
                    self.archiver
                );
                SubmissionOutcome::Success
            }
            Ok(resp) => {
                let status = resp.status().as_u16();
                error!(
                    "{} responds with code {status} while submitting {url}",
                    self.archiver.service_name()
                );
                SubmissionOutcome::Failed { status }
            }
            Err(e) => {
                error!(error = %e, "Request to {} failed while submitting {url}", self.archiver.service_name());
                SubmissionOutcome::NetworkError(e.to_string())
            }
        }
    }

    /// Submits every candidate that no archive holds yet and reports one
    /// informational finding per submission.
    #[instrument(skip(self, candidates), fields(candidates = candidates.len()))]
    pub fn run(&self, filename: &str, candidates: &[LinkCandidate]) -> Vec<Finding> {
        candidates
            .iter()
            .filter(|candidate| {
                if candidate.archived {
                    debug!(url = %candidate.url, "Already archived, skipping");
                }
                !candidate.archived
            })
            .map(|candidate| {
                let message = if self.submit(&candidate.url).is_success() {
                    format!(
                        "This link ({}) successfully submitted to {}",
                        candidate.url, self.template
                    )
                } else {
                    format!("Failed to submit {} to {}", candidate.url, self.template)
                };
                Finding {
                    severity: Severity::Info,
                    message,
                    file: filename.to_string(),
                    line: candidate.line,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archiver_names() {
        assert_eq!("archive.org".parse::<Archiver>().unwrap(), Archiver::ArchiveOrg);
        assert_eq!(" archive.is ".parse::<Archiver>().unwrap(), Archiver::ArchiveIs);
        assert!(matches!(
            "youtube_to_archive.org".parse::<Archiver>(),
            Err(Error::ConfigError(_))
        ));
        assert_eq!(Archiver::ArchiveIs.to_string(), "archive.is");
    }

    #[test]
    fn test_template_requires_placeholder() {
        let err = LinkBackup::new(Archiver::ArchiveOrg, Some("https://example.com/save/"));
        assert!(matches!(err, Err(Error::ConfigError(_))));

        let err = LinkBackup::new(Archiver::ArchiveOrg, Some("https://example.com/%s/save/%s"));
        assert!(matches!(err, Err(Error::ConfigError(_))));

        let backup = LinkBackup::new(Archiver::ArchiveIs, None).unwrap();
        assert_eq!(backup.template(), ARCHIVE_IS_SUBMIT_URL);
    }

    #[test]
    fn test_archived_candidates_are_not_submitted() {
        // Unroutable template: any submission would surface as a finding.
        let backup = LinkBackup::new(Archiver::ArchiveOrg, Some("http://127.0.0.1:9/save/%s")).unwrap();
        let candidates = vec![LinkCandidate {
            url: "http://iamarchived.com".to_string(),
            line: 2,
            archived: true,
        }];
        assert!(backup.run("default", &candidates).is_empty());
    }

    #[test]
    fn test_parse_candidates() {
        let candidates =
            parse_candidates(r#"[{"url": "http://a.example", "line": 3}]"#).unwrap();
        assert_eq!(candidates.len(), 1);
        assert!(!candidates[0].archived);

        assert!(matches!(
            parse_candidates("{not json"),
            Err(Error::JsonError(_))
        ));
    }
}
