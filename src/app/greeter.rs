use std::sync::Arc;

use anyhow::Result;
use serenity::{model::gateway::GatewayIntents, Client};

use crate::{
    config::AppConfig,
    discord::{GreeterHandler, GreeterState},
    infrastructure::{clock::SystemClock, directories::ResolvedPaths, latch::Shutdown},
};

/// Onboarding dialogue and channel command process.
pub struct GreeterApp {
    _paths: ResolvedPaths,
    client: Client,
    shutdown: Shutdown,
}

impl GreeterApp {
    pub async fn initialize(config: AppConfig, paths: ResolvedPaths, shutdown: Shutdown) -> Result<Self> {
        let config = Arc::new(config);
        let state = Arc::new(GreeterState {
            config: config.clone(),
            clock: Arc::new(SystemClock),
        });

        let intents = GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MEMBERS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::DIRECT_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT;
        let client = Client::builder(&config.discord_token, intents)
            .event_handler(GreeterHandler::new(state))
            .await?;

        Ok(Self {
            _paths: paths,
            client,
            shutdown,
        })
    }

    pub async fn run(self) -> Result<()> {
        let GreeterApp {
            _paths: _,
            mut client,
            shutdown,
        } = self;

        tracing::info!("greeter bot starting");
        super::run_client(&mut client, &shutdown).await;
        tracing::info!("greeter bot stopped");
        Ok(())
    }
}
