pub mod env;
mod loader;

pub use env::{
    AppConfig, ConfigError, DirectoryConfig, FeedConfig, ListingsConfig, OnboardingConfig,
};
pub use loader::load_config;
