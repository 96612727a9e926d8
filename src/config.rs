use crate::archive::Archiver;
use crate::error::Result;
use crate::git::DEFAULT_VCS_BINARY;

pub const ENV_VCS: &str = "REPO_BEARS_VCS";
pub const ENV_ARCHIVER: &str = "REPO_BEARS_ARCHIVER";
pub const ENV_ARCHIVE_URL_TEMPLATE: &str = "REPO_BEARS_ARCHIVE_URL_TEMPLATE";

/// Runtime settings shared by both analyses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub vcs_binary: String,
    pub archiver: Archiver,
    /// Overrides the archiver's built-in endpoint when set.
    pub archive_url_template: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vcs_binary: DEFAULT_VCS_BINARY.to_string(),
            archiver: Archiver::default(),
            archive_url_template: None,
        }
    }
}

impl Config {
    /// Reads settings from the process environment, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the archiver name is not recognized
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Applies explicitly given settings, such as command line flags, on top
    /// of this configuration.
    #[must_use]
    pub fn with_overrides(
        mut self,
        vcs_binary: Option<String>,
        archiver: Option<Archiver>,
        archive_url_template: Option<String>,
    ) -> Self {
        if let Some(vcs_binary) = vcs_binary {
            self.vcs_binary = vcs_binary;
        }
        if let Some(archiver) = archiver {
            self.archiver = archiver;
        }
        if archive_url_template.is_some() {
            self.archive_url_template = archive_url_template;
        }
        self
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mut config = Self::default();
        if let Some(binary) = non_empty(ENV_VCS) {
            config.vcs_binary = binary;
        }
        if let Some(archiver) = non_empty(ENV_ARCHIVER) {
            config.archiver = archiver.parse()?;
        }
        config.archive_url_template = non_empty(ENV_ARCHIVE_URL_TEMPLATE);
        Ok(config)
    }
}
