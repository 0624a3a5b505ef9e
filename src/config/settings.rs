//! Settings structure for runtime configuration
//!
//! Loaded from a key/value settings file and passed by reference into the
//! client constructors; there is no process-wide configuration state.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings recognized by the application. Key names in the settings
/// file match the serde renames verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// OAuth2 consumer key for the post search session (required)
    #[serde(rename = "TwitterConsumerKey")]
    pub twitter_consumer_key: String,
    /// OAuth2 consumer secret for the post search session (required)
    #[serde(rename = "TwitterConsumerSecret")]
    pub twitter_consumer_secret: String,
    /// Repository search account; unauthenticated mode when absent
    #[serde(rename = "GitHubUsername")]
    pub github_username: Option<String>,
    #[serde(rename = "GitHubPassword")]
    pub github_password: Option<String>,
    /// Stop once this many projects with commentary are collected
    #[serde(rename = "MaxProjects")]
    pub max_projects: usize,
    /// Posts collected and printed per project
    #[serde(rename = "MaxTweetsPerProject")]
    pub max_posts_per_project: usize,
    /// Print `id: text` summaries instead of full post payloads
    #[serde(rename = "OutputTweetSummary")]
    pub output_post_summary: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            twitter_consumer_key: String::new(),
            twitter_consumer_secret: String::new(),
            github_username: None,
            github_password: None,
            max_projects: 10,
            max_posts_per_project: 20,
            output_post_summary: false,
        }
    }
}

impl Settings {
    /// Load and validate settings from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("reading settings file {}", path.as_ref().display()))?;
        Self::parse(&content)
    }

    fn parse(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content).context("parsing settings file")?;
        settings.validate()?;
        Ok(settings)
    }

    /// The post search session cannot be established without consumer
    /// credentials.
    fn validate(&self) -> Result<()> {
        if self.twitter_consumer_key.is_empty() || self.twitter_consumer_secret.is_empty() {
            bail!("TwitterConsumerKey and TwitterConsumerSecret must be set in the settings file");
        }
        Ok(())
    }

    /// Repository search credentials, when both halves are present
    pub fn github_credentials(&self) -> Option<(&str, &str)> {
        match (
            self.github_username.as_deref(),
            self.github_password.as_deref(),
        ) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Some((username, password))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_all_keys() {
        let settings = Settings::parse(
            "TwitterConsumerKey: abc\n\
             TwitterConsumerSecret: def\n\
             GitHubUsername: octocat\n\
             GitHubPassword: hunter2\n\
             MaxProjects: 3\n\
             MaxTweetsPerProject: 7\n\
             OutputTweetSummary: true\n",
        )
        .unwrap();

        assert_eq!(settings.twitter_consumer_key, "abc");
        assert_eq!(settings.github_credentials(), Some(("octocat", "hunter2")));
        assert_eq!(settings.max_projects, 3);
        assert_eq!(settings.max_posts_per_project, 7);
        assert!(settings.output_post_summary);
    }

    #[test]
    fn test_defaults_apply_for_missing_keys() {
        let settings =
            Settings::parse("TwitterConsumerKey: abc\nTwitterConsumerSecret: def\n").unwrap();

        assert!(settings.github_credentials().is_none());
        assert_eq!(settings.max_projects, 10);
        assert_eq!(settings.max_posts_per_project, 20);
        assert!(!settings.output_post_summary);
    }

    #[test]
    fn test_missing_consumer_credentials_are_fatal() {
        assert!(Settings::parse("MaxProjects: 3\n").is_err());
        assert!(Settings::parse("TwitterConsumerKey: abc\nTwitterConsumerSecret: \"\"\n").is_err());
    }

    #[test]
    fn test_half_configured_github_account_means_unauthenticated() {
        let settings = Settings::parse(
            "TwitterConsumerKey: abc\n\
             TwitterConsumerSecret: def\n\
             GitHubUsername: octocat\n",
        )
        .unwrap();

        assert!(settings.github_credentials().is_none());
    }
}
