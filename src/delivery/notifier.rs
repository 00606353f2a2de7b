use std::sync::Arc;

use crate::platform::{DeliveryGateway, PlatformError};

use super::CircuitBreaker;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    /// The destination could not be resolved; nothing was sent and the breaker
    /// is untouched.
    Unresolved,
    /// The send call failed and the breaker is now open.
    Failed,
    /// The breaker was already open.
    Suppressed,
}

pub struct Notifier {
    gateway: Arc<dyn DeliveryGateway>,
    breaker: Arc<CircuitBreaker>,
}

impl Notifier {
    pub fn new(gateway: Arc<dyn DeliveryGateway>, breaker: Arc<CircuitBreaker>) -> Self {
        Self { gateway, breaker }
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    pub async fn deliver(&self, channel_id: u64, text: &str) -> DeliveryOutcome {
        if self.breaker.is_open() {
            return DeliveryOutcome::Suppressed;
        }

        let channel = match self.gateway.resolve_channel(channel_id).await {
            Ok(channel) => channel,
            Err(err) => {
                tracing::error!(
                    target: "delivery",
                    channel_id,
                    error = %err,
                    "failed to resolve destination channel"
                );
                return DeliveryOutcome::Unresolved;
            }
        };

        match self.gateway.send_message(&channel, text).await {
            Ok(()) => {
                tracing::debug!(
                    target: "delivery",
                    channel_id,
                    channel = channel.name.as_deref().unwrap_or("<unnamed>"),
                    "listing delivered"
                );
                DeliveryOutcome::Delivered
            }
            Err(err) => {
                tracing::error!(
                    target: "delivery",
                    channel_id,
                    error = %err,
                    "send failed; disabling listing delivery"
                );
                if self.breaker.trip(err.to_string()) {
                    self.alert_owners(channel_id, &err).await;
                }
                DeliveryOutcome::Failed
            }
        }
    }

    async fn alert_owners(&self, channel_id: u64, err: &PlatformError) {
        let text = format!(
            "Error sending message to channel {channel_id}: '{err}'. \
             The bot has stopped sending new messages."
        );
        for owner in self.gateway.guild_owners() {
            if let Err(dm_err) = self.gateway.direct_message(owner.owner_id, &text).await {
                tracing::warn!(
                    target: "delivery",
                    guild_id = owner.guild_id,
                    owner_id = owner.owner_id,
                    error = %dm_err,
                    "failed to alert guild owner"
                );
            }
        }
    }
}
