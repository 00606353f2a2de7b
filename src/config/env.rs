use std::time::Duration;

use chrono_tz::Tz;
use thiserror::Error;
use url::Url;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub discord_token: String,
    pub directories: DirectoryConfig,
    pub logging: LoggingConfig,
    pub timezone: String,
    pub onboarding: OnboardingConfig,
    pub listings: ListingsConfig,
}

impl AppConfig {
    /// Zone used for calendar-year checks and the "Posted on" date.
    pub fn tz(&self) -> Tz {
        self.timezone.parse().unwrap_or(chrono_tz::UTC)
    }
}

#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    pub logs_dir: String,
    pub data_dir: String,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone)]
pub struct OnboardingConfig {
    pub email_domain: String,
    pub role_name: String,
    pub question_timeout: Duration,
    pub process_channels: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ListingsConfig {
    pub feeds: Vec<FeedConfig>,
    pub listings_file: String,
    pub dispatch_delay: Duration,
}

/// One job type: where its dataset lives and where its listings go.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub label: &'static str,
    pub repo_url: Url,
    pub local_dir: String,
    pub state_file: String,
    pub channel_id: u64,
    pub poll_cron: String,
    pub clear_cron: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}
