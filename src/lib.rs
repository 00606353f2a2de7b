pub mod app;
pub mod commands;
pub mod config;
pub mod delivery;
pub mod discord;
pub mod domain;
pub mod infrastructure;
pub mod listings;
pub mod onboarding;
pub mod platform;
pub mod store;
pub mod tasks;

#[cfg(test)]
pub(crate) mod testing;
