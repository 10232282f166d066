use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Secrets and connection strings loaded from the environment.
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub reddit_client_id: String,
    pub reddit_client_secret: String,
    pub reddit_user_agent: String,
}

impl Config {
    /// Load configuration from `.env` and the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            database_url: required_env("DATABASE_URL")?,
            reddit_client_id: required_env("REDDIT_CLIENT_ID")?,
            reddit_client_secret: required_env("REDDIT_CLIENT_SECRET")?,
            reddit_user_agent: required_env("REDDIT_USER_AGENT")?,
        };

        config.log_keys();
        Ok(config)
    }

    fn log_keys(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  DATABASE_URL: {}", preview(&self.database_url));
        tracing::info!("  REDDIT_CLIENT_ID: {}", preview(&self.reddit_client_id));
        tracing::info!("  REDDIT_CLIENT_SECRET: {}", preview(&self.reddit_client_secret));
        tracing::info!("  REDDIT_USER_AGENT: {}", self.reddit_user_agent);
    }
}

/// Secrets print as a short prefix and their length.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &preview(&self.database_url))
            .field("reddit_client_id", &preview(&self.reddit_client_id))
            .field("reddit_client_secret", &preview(&self.reddit_client_secret))
            .field("reddit_user_agent", &self.reddit_user_agent)
            .finish()
    }
}

fn preview(val: &str) -> String {
    let n = val.char_indices().nth(5).map(|(i, _)| i).unwrap_or(val.len());
    format!("{}...({} chars)", &val[..n], val.len())
}

fn required_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("{key} environment variable is required"))
}

/// Fixed parameters of a collection run.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub subreddits: Vec<String>,
    /// Stop starting new forums once this many pairs have been collected.
    pub target_count: usize,
    /// Comments must score strictly above this.
    pub min_comment_score: i64,
    /// Minimum raw comment body length (characters).
    pub min_comment_chars: usize,
    /// Pause after each listing category.
    pub category_delay: Duration,
    /// Pause between forums.
    pub forum_delay: Duration,
    /// Emit a progress line every this many pairs within a forum.
    pub progress_every: usize,
    pub export_path: PathBuf,
    pub log_path: PathBuf,
}

pub const DEFAULT_SUBREDDITS: &[&str] = &[
    "therapy",
    "mentalhealth",
    "TalkTherapy",
    "psychotherapy",
    "CBT",
    "DBT",
    "askatherapist",
    "therapeuticquestions",
];

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            subreddits: DEFAULT_SUBREDDITS.iter().map(|s| s.to_string()).collect(),
            target_count: 5000,
            min_comment_score: 3,
            min_comment_chars: crate::quality::MIN_ANSWER_CHARS,
            category_delay: Duration::from_secs(2),
            forum_delay: Duration::from_secs(5),
            progress_every: 100,
            export_path: PathBuf::from("therapy_qa_data.json"),
            log_path: PathBuf::from("therapy_qa_collection.log"),
        }
    }
}

impl ScrapeConfig {
    /// Per-forum share of the target. Zero forums yields zero.
    pub fn per_forum_quota(&self) -> usize {
        match self.subreddits.len() {
            0 => 0,
            n => self.target_count / n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_fixed_run() {
        let config = ScrapeConfig::default();
        assert_eq!(config.subreddits.len(), 8);
        assert_eq!(config.target_count, 5000);
        assert_eq!(config.per_forum_quota(), 625);
        assert_eq!(config.export_path, PathBuf::from("therapy_qa_data.json"));
    }

    #[test]
    fn quota_with_no_forums_is_zero() {
        let config = ScrapeConfig {
            subreddits: Vec::new(),
            ..ScrapeConfig::default()
        };
        assert_eq!(config.per_forum_quota(), 0);
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let config = Config {
            database_url: "postgres://admin:hunter2@db/qa".into(),
            reddit_client_id: "client-id-123456".into(),
            reddit_client_secret: "very-secret-value".into(),
            reddit_user_agent: "therapy-qa/0.1".into(),
        };
        let out = format!("{config:?}");
        assert!(!out.contains("hunter2"));
        assert!(!out.contains("very-secret-value"));
        assert!(out.contains("very-...(17 chars)"));
        assert!(out.contains("therapy-qa/0.1"));
    }
}
