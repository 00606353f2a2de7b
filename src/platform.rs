//! Chat-platform seams. The Discord implementations live in `crate::discord`;
//! everything else talks to these traits.

use std::time::Duration;

use futures::future::BoxFuture;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error(transparent)]
    Discord(#[from] Box<serenity::Error>),
    #[error("channel {0} could not be resolved")]
    ChannelNotFound(u64),
    #[error("{0}")]
    Rejected(String),
}

impl From<serenity::Error> for PlatformError {
    fn from(err: serenity::Error) -> Self {
        PlatformError::Discord(Box::new(err))
    }
}

/// A destination channel that has been confirmed to exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelHandle {
    pub id: u64,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuildOwner {
    pub guild_id: u64,
    pub owner_id: u64,
}

pub trait DeliveryGateway: Send + Sync {
    /// Cache first, remote fetch on a miss.
    fn resolve_channel(&self, channel_id: u64) -> BoxFuture<'_, Result<ChannelHandle, PlatformError>>;

    fn send_message<'a>(
        &'a self,
        channel: &'a ChannelHandle,
        text: &'a str,
    ) -> BoxFuture<'a, Result<(), PlatformError>>;

    /// Owners of every guild the client is currently connected to.
    fn guild_owners(&self) -> Vec<GuildOwner>;

    fn direct_message<'a>(
        &'a self,
        user_id: u64,
        text: &'a str,
    ) -> BoxFuture<'a, Result<(), PlatformError>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleGrant {
    Granted,
    RoleMissing,
}

/// Private conversation with one newly joined member.
pub trait OnboardingSession: Send + Sync {
    fn send<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<(), PlatformError>>;

    /// Next message from the member in the private channel, or `None` once
    /// `wait` elapses.
    fn next_reply(&self, wait: Duration) -> BoxFuture<'_, Option<String>>;

    fn set_presentation_name<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<(), PlatformError>>;

    fn grant_role<'a>(&'a self, role_name: &'a str) -> BoxFuture<'a, Result<RoleGrant, PlatformError>>;
}

/// A message the bot can refer back to, usually to delete it later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRef {
    pub channel_id: u64,
    pub message_id: u64,
}

/// Actions available while answering one guild message.
pub trait CommandContext: Send + Sync {
    /// The message being answered.
    fn trigger(&self) -> MessageRef;

    fn author_id(&self) -> u64;

    /// The author's guild nickname, or their account name when none is set.
    fn author_display_name(&self) -> String;

    fn react(&self, emoji: char) -> BoxFuture<'_, Result<(), PlatformError>>;

    /// Posts into the trigger's channel.
    fn say<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<MessageRef, PlatformError>>;

    /// Posts as a reply to the trigger.
    fn reply<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<MessageRef, PlatformError>>;

    fn delete(&self, message: MessageRef) -> BoxFuture<'_, Result<(), PlatformError>>;

    /// Deletes `message` once `delay` has passed without holding up the caller.
    fn delete_after(&self, message: MessageRef, delay: Duration);

    fn set_author_nickname<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<(), PlatformError>>;
}
