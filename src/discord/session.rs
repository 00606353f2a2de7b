use std::time::Duration;

use futures::future::BoxFuture;
use serenity::{
    builder::EditMember,
    client::Context,
    collector::MessageCollector,
    model::{
        guild::Member,
        id::{ChannelId, GuildId, RoleId, UserId},
    },
};

use crate::platform::{OnboardingSession, PlatformError, RoleGrant};

/// Onboarding conversation held in the new member's DM channel.
pub struct DiscordOnboardingSession {
    ctx: Context,
    guild_id: GuildId,
    user_id: UserId,
    dm: ChannelId,
}

impl DiscordOnboardingSession {
    pub async fn open(ctx: &Context, member: &Member) -> Result<Self, PlatformError> {
        let dm = member.user.create_dm_channel(ctx).await?;
        Ok(Self {
            ctx: ctx.clone(),
            guild_id: member.guild_id,
            user_id: member.user.id,
            dm: dm.id,
        })
    }

    async fn find_role(&self, role_name: &str) -> Result<Option<RoleId>, PlatformError> {
        let cached = self.ctx.cache.guild(self.guild_id).map(|guild| {
            guild
                .roles
                .values()
                .find(|role| role.name == role_name)
                .map(|role| role.id)
        });
        if let Some(found) = cached {
            return Ok(found);
        }
        let roles = self.guild_id.roles(&self.ctx.http).await?;
        Ok(roles
            .values()
            .find(|role| role.name == role_name)
            .map(|role| role.id))
    }
}

impl OnboardingSession for DiscordOnboardingSession {
    fn send<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<(), PlatformError>> {
        Box::pin(async move {
            self.dm.say(&self.ctx.http, text).await?;
            Ok(())
        })
    }

    fn next_reply(&self, wait: Duration) -> BoxFuture<'_, Option<String>> {
        Box::pin(async move {
            MessageCollector::new(&self.ctx.shard)
                .author_id(self.user_id)
                .channel_id(self.dm)
                .timeout(wait)
                .next()
                .await
                .map(|message| message.content)
        })
    }

    fn set_presentation_name<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<(), PlatformError>> {
        Box::pin(async move {
            self.guild_id
                .edit_member(&self.ctx, self.user_id, EditMember::new().nickname(name))
                .await?;
            Ok(())
        })
    }

    fn grant_role<'a>(&'a self, role_name: &'a str) -> BoxFuture<'a, Result<RoleGrant, PlatformError>> {
        Box::pin(async move {
            let Some(role_id) = self.find_role(role_name).await? else {
                return Ok(RoleGrant::RoleMissing);
            };
            self.ctx
                .http
                .add_member_role(self.guild_id, self.user_id, role_id, Some("member onboarding"))
                .await?;
            Ok(RoleGrant::Granted)
        })
    }
}
