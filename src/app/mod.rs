pub mod greeter;
pub mod listings;

use std::{sync::Arc, time::Duration};

use serenity::gateway::ShardManager;

use crate::infrastructure::latch::Shutdown;

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Runs the gateway client until it exits on its own or shutdown is requested.
async fn run_client(client: &mut serenity::Client, shutdown: &Shutdown) {
    let shard_manager: Arc<ShardManager> = client.shard_manager.clone();
    let mut shutdown_listener = shutdown.subscribe();

    tokio::select! {
        _ = shutdown_listener.notified() => {
            tracing::info!(target: "lifecycle", "shutdown requested (CTRL+C / SIGTERM)");
        }
        res = client.start() => {
            match res {
                Ok(()) => tracing::info!(target: "discord", "gateway client stopped"),
                Err(err) => tracing::error!(target: "discord", error = %err, "gateway client failed"),
            }
        }
    }

    shutdown.trigger();
    if tokio::time::timeout(SHUTDOWN_TIMEOUT, shard_manager.shutdown_all())
        .await
        .is_err()
    {
        tracing::warn!(
            target: "discord",
            "shards did not stop within {:?}; forcing exit",
            SHUTDOWN_TIMEOUT
        );
    }
}
