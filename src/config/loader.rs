use std::{env, time::Duration};

use url::Url;

use super::env::{
    AppConfig, ConfigError, DirectoryConfig, FeedConfig, ListingsConfig, LoggingConfig,
    OnboardingConfig,
};

struct FeedDefaults {
    label: &'static str,
    channel_key: &'static str,
    repo_key: &'static str,
    poll_key: &'static str,
    clear_key: &'static str,
    repo_url: &'static str,
    local_dir: &'static str,
    state_file: &'static str,
    poll_cron: &'static str,
}

const FEEDS: [FeedDefaults; 2] = [
    FeedDefaults {
        label: "intern",
        channel_key: "INTERN_CHANNEL_ID",
        repo_key: "INTERN_REPO_URL",
        poll_key: "INTERN_POLL_CRON",
        clear_key: "INTERN_CLEAR_CRON",
        repo_url: "https://github.com/SimplifyJobs/Summer2025-Internships",
        local_dir: "Summer2025-Internships",
        state_file: "intern_roles_data.json",
        poll_cron: "0 10 22 * * *",
    },
    FeedDefaults {
        label: "newgrad",
        channel_key: "NEWGRAD_CHANNEL_ID",
        repo_key: "NEWGRAD_REPO_URL",
        poll_key: "NEWGRAD_POLL_CRON",
        clear_key: "NEWGRAD_CLEAR_CRON",
        repo_url: "https://github.com/SimplifyJobs/New-Grad-Positions",
        local_dir: "New-Grad-Positions",
        state_file: "newgrad_roles_data.json",
        poll_cron: "0 11 22 * * *",
    },
];

const DEFAULT_CLEAR_CRON: &str = "0 1 20 * * Sun";

pub fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_env()
}

impl AppConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let discord_token = var("DISCORD_TOKEN").ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;

        let directories = DirectoryConfig {
            logs_dir: var("LOGS_DIR").unwrap_or_else(|| "logs".to_string()),
            data_dir: var("DATA_DIR").unwrap_or_else(|| "data".to_string()),
        };

        let logging = LoggingConfig {
            level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        };

        let timezone = var("BOT_TIMEZONE").unwrap_or_else(|| "UTC".to_string());

        let onboarding = OnboardingConfig {
            email_domain: var("MEMBER_EMAIL_DOMAIN")
                .map(|v| v.trim().to_lowercase())
                .unwrap_or_else(|| "@denison.edu".to_string()),
            role_name: var("MEMBER_ROLE_NAME").unwrap_or_else(|| "Students/Alumni".to_string()),
            question_timeout: Duration::from_secs(parse_number(
                "QUESTION_TIMEOUT_SECS",
                var("QUESTION_TIMEOUT_SECS"),
                6000,
            )?),
            process_channels: var("PROCESS_CHANNELS")
                .map(|value| split_list(&value, ','))
                .unwrap_or_else(|| vec!["intern-process".into(), "new-grad-process".into()]),
        };

        let mut feeds = Vec::with_capacity(FEEDS.len());
        for defaults in &FEEDS {
            let Some(raw_channel) = var(defaults.channel_key) else {
                continue;
            };
            let channel_id =
                raw_channel
                    .trim()
                    .parse::<u64>()
                    .ok()
                    .filter(|id| *id != 0)
                    .ok_or_else(|| ConfigError::Invalid {
                        key: defaults.channel_key,
                        value: raw_channel.clone(),
                    })?;
            let raw_repo = var(defaults.repo_key).unwrap_or_else(|| defaults.repo_url.to_string());
            let repo_url = Url::parse(raw_repo.trim()).map_err(|_| ConfigError::Invalid {
                key: defaults.repo_key,
                value: raw_repo.clone(),
            })?;
            feeds.push(FeedConfig {
                label: defaults.label,
                repo_url,
                local_dir: defaults.local_dir.to_string(),
                state_file: defaults.state_file.to_string(),
                channel_id,
                poll_cron: var(defaults.poll_key).unwrap_or_else(|| defaults.poll_cron.to_string()),
                clear_cron: var(defaults.clear_key)
                    .unwrap_or_else(|| DEFAULT_CLEAR_CRON.to_string()),
            });
        }

        let listings = ListingsConfig {
            feeds,
            listings_file: var("LISTINGS_FILE")
                .unwrap_or_else(|| ".github/scripts/listings.json".to_string()),
            dispatch_delay: Duration::from_secs(parse_number(
                "DISPATCH_DELAY_SECS",
                var("DISPATCH_DELAY_SECS"),
                2,
            )?),
        };

        Ok(Self {
            discord_token,
            directories,
            logging,
            timezone,
            onboarding,
            listings,
        })
    }
}

fn parse_number(key: &'static str, raw: Option<String>, default: u64) -> Result<u64, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

fn split_list(value: &str, separator: char) -> Vec<String> {
    value
        .split(separator)
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect()
}
