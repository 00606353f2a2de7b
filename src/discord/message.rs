use std::time::Duration;

use futures::future::BoxFuture;
use serenity::{
    builder::EditMember,
    client::Context,
    model::{
        channel::{Message, ReactionType},
        id::{ChannelId, MessageId},
    },
};

use crate::platform::{CommandContext, MessageRef, PlatformError};

/// Command replies for one inbound guild message.
pub struct DiscordCommandContext<'a> {
    ctx: &'a Context,
    msg: &'a Message,
}

impl<'a> DiscordCommandContext<'a> {
    pub fn new(ctx: &'a Context, msg: &'a Message) -> Self {
        Self { ctx, msg }
    }
}

fn message_ref(msg: &Message) -> MessageRef {
    MessageRef {
        channel_id: msg.channel_id.get(),
        message_id: msg.id.get(),
    }
}

impl CommandContext for DiscordCommandContext<'_> {
    fn trigger(&self) -> MessageRef {
        message_ref(self.msg)
    }

    fn author_id(&self) -> u64 {
        self.msg.author.id.get()
    }

    fn author_display_name(&self) -> String {
        self.msg
            .member
            .as_ref()
            .and_then(|member| member.nick.clone())
            .unwrap_or_else(|| self.msg.author.name.clone())
    }

    fn react(&self, emoji: char) -> BoxFuture<'_, Result<(), PlatformError>> {
        Box::pin(async move {
            self.msg
                .react(self.ctx, ReactionType::Unicode(emoji.to_string()))
                .await?;
            Ok(())
        })
    }

    fn say<'b>(&'b self, text: &'b str) -> BoxFuture<'b, Result<MessageRef, PlatformError>> {
        Box::pin(async move {
            let sent = self.msg.channel_id.say(&self.ctx.http, text).await?;
            Ok(message_ref(&sent))
        })
    }

    fn reply<'b>(&'b self, text: &'b str) -> BoxFuture<'b, Result<MessageRef, PlatformError>> {
        Box::pin(async move {
            let sent = self.msg.reply(self.ctx, text).await?;
            Ok(message_ref(&sent))
        })
    }

    fn delete(&self, message: MessageRef) -> BoxFuture<'_, Result<(), PlatformError>> {
        Box::pin(async move {
            ChannelId::new(message.channel_id)
                .delete_message(&self.ctx.http, MessageId::new(message.message_id))
                .await?;
            Ok(())
        })
    }

    fn delete_after(&self, message: MessageRef, delay: Duration) {
        let http = self.ctx.http.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let channel_id = ChannelId::new(message.channel_id);
            if let Err(err) = channel_id
                .delete_message(&http, MessageId::new(message.message_id))
                .await
            {
                tracing::warn!(
                    target: "commands",
                    message_id = message.message_id,
                    error = %err,
                    "failed to delete message"
                );
            }
        });
    }

    fn set_author_nickname<'b>(&'b self, name: &'b str) -> BoxFuture<'b, Result<(), PlatformError>> {
        Box::pin(async move {
            let Some(guild_id) = self.msg.guild_id else {
                return Err(PlatformError::Rejected("message is not from a guild".into()));
            };
            guild_id
                .edit_member(self.ctx, self.msg.author.id, EditMember::new().nickname(name))
                .await?;
            Ok(())
        })
    }
}
