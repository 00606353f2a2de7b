use std::sync::Arc;

use futures::future::BoxFuture;
use serenity::{
    cache::Cache,
    http::Http,
    model::id::{ChannelId, UserId},
};

use crate::platform::{ChannelHandle, DeliveryGateway, GuildOwner, PlatformError};

/// Listing delivery over the Discord REST client, with the gateway cache
/// consulted first.
pub struct DiscordGateway {
    http: Arc<Http>,
    cache: Arc<Cache>,
}

impl DiscordGateway {
    pub fn new(http: Arc<Http>, cache: Arc<Cache>) -> Self {
        Self { http, cache }
    }
}

impl DeliveryGateway for DiscordGateway {
    fn resolve_channel(&self, channel_id: u64) -> BoxFuture<'_, Result<ChannelHandle, PlatformError>> {
        Box::pin(async move {
            if channel_id == 0 {
                return Err(PlatformError::ChannelNotFound(channel_id));
            }
            let id = ChannelId::new(channel_id);
            let cached = self.cache.guilds().into_iter().find_map(|guild_id| {
                let guild = self.cache.guild(guild_id)?;
                guild.channels.get(&id).map(|channel| channel.name.clone())
            });
            if let Some(name) = cached {
                return Ok(ChannelHandle {
                    id: channel_id,
                    name: Some(name),
                });
            }

            tracing::debug!(target: "discord", channel_id, "channel not in cache, fetching");
            let channel = id.to_channel(&*self.http).await?;
            Ok(ChannelHandle {
                id: channel_id,
                name: channel.guild().map(|guild_channel| guild_channel.name),
            })
        })
    }

    fn send_message<'a>(
        &'a self,
        channel: &'a ChannelHandle,
        text: &'a str,
    ) -> BoxFuture<'a, Result<(), PlatformError>> {
        Box::pin(async move {
            ChannelId::new(channel.id).say(&self.http, text).await?;
            Ok(())
        })
    }

    fn guild_owners(&self) -> Vec<GuildOwner> {
        self.cache
            .guilds()
            .into_iter()
            .filter_map(|guild_id| {
                let owner_id = self.cache.guild(guild_id)?.owner_id;
                Some(GuildOwner {
                    guild_id: guild_id.get(),
                    owner_id: owner_id.get(),
                })
            })
            .collect()
    }

    fn direct_message<'a>(
        &'a self,
        user_id: u64,
        text: &'a str,
    ) -> BoxFuture<'a, Result<(), PlatformError>> {
        Box::pin(async move {
            let channel = UserId::new(user_id).create_dm_channel(&*self.http).await?;
            channel.id.say(&self.http, text).await?;
            Ok(())
        })
    }
}
