use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Result};
use serenity::{model::gateway::GatewayIntents, Client};
use tokio::time::timeout;
use tokio_cron_scheduler::JobScheduler;

use crate::{
    config::AppConfig,
    delivery::{CircuitBreaker, Notifier},
    discord::{DiscordGateway, ListingsHandler},
    infrastructure::{
        clock::{Clock, SystemClock},
        directories::ResolvedPaths,
        latch::{Latch, Shutdown},
        mirror::GitMirror,
    },
    store::DedupStore,
    tasks::{
        poller::{FeedPipeline, FeedSpec},
        scheduler::configure_feed_jobs,
    },
};

use super::SHUTDOWN_TIMEOUT;

/// Listing poller process: every configured feed shares one client and one
/// circuit breaker.
pub struct ListingsApp {
    _paths: ResolvedPaths,
    client: Client,
    scheduler: JobScheduler,
    shutdown: Shutdown,
}

impl ListingsApp {
    pub async fn initialize(config: AppConfig, paths: ResolvedPaths, shutdown: Shutdown) -> Result<Self> {
        if config.listings.feeds.is_empty() {
            bail!("no listing feeds configured; set INTERN_CHANNEL_ID and/or NEWGRAD_CHANNEL_ID");
        }

        let ready = Latch::new();
        let client = Client::builder(&config.discord_token, GatewayIntents::GUILDS)
            .event_handler(ListingsHandler::new(ready.clone()))
            .await?;

        let gateway = Arc::new(DiscordGateway::new(client.http.clone(), client.cache.clone()));
        let breaker = Arc::new(CircuitBreaker::new());
        let notifier = Arc::new(Notifier::new(gateway, breaker));
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let tz = config.tz();

        let pipelines: Vec<Arc<FeedPipeline>> = config
            .listings
            .feeds
            .iter()
            .map(|feed| {
                let mirror = GitMirror::new(feed.repo_url.clone(), paths.data_path(&feed.local_dir));
                let spec = FeedSpec {
                    label: feed.label,
                    channel_id: feed.channel_id,
                    listings_file: PathBuf::from(&config.listings.listings_file),
                    dispatch_delay: config.listings.dispatch_delay,
                    poll_cron: feed.poll_cron.clone(),
                    clear_cron: feed.clear_cron.clone(),
                };
                Arc::new(FeedPipeline::new(
                    spec,
                    Arc::new(mirror),
                    DedupStore::spawn(paths.data_path(&feed.state_file)),
                    notifier.clone(),
                    clock.clone(),
                    tz,
                ))
            })
            .collect();

        let scheduler = configure_feed_jobs(&pipelines, ready.subscribe()).await?;

        Ok(Self {
            _paths: paths,
            client,
            scheduler,
            shutdown,
        })
    }

    pub async fn run(self) -> Result<()> {
        let ListingsApp {
            _paths: _,
            mut client,
            mut scheduler,
            shutdown,
        } = self;

        tracing::info!("listings bot starting");
        super::run_client(&mut client, &shutdown).await;

        match timeout(SHUTDOWN_TIMEOUT, scheduler.shutdown()).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                tracing::error!(target: "scheduler", ?err, "scheduler shutdown failed");
            }
            Err(_) => {
                tracing::warn!(
                    target: "scheduler",
                    "scheduler did not stop within {:?}",
                    SHUTDOWN_TIMEOUT
                );
            }
        }

        tracing::info!("listings bot stopped");
        Ok(())
    }
}
