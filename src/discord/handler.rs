use std::sync::Arc;

use serenity::{
    async_trait,
    client::{Context, EventHandler},
    model::{channel::Message, gateway::Ready, guild::Member},
};

use crate::{
    commands::{plan_message, respond, InboundMessage},
    infrastructure::latch::Latch,
    onboarding::OnboardingFlow,
};

use super::{message::DiscordCommandContext, session::DiscordOnboardingSession, types::GreeterState};

pub struct GreeterHandler {
    state: Arc<GreeterState>,
}

impl GreeterHandler {
    pub fn new(state: Arc<GreeterState>) -> Self {
        Self { state }
    }

    async fn onboard(&self, ctx: &Context, member: &Member) -> anyhow::Result<()> {
        let session = DiscordOnboardingSession::open(ctx, member).await?;
        let flow = OnboardingFlow::new(
            &session,
            &self.state.config.onboarding,
            self.state.current_year(),
        );
        let outcome = flow.run().await?;
        tracing::info!(
            target: "onboarding",
            user_id = member.user.id.get(),
            ?outcome,
            "onboarding finished"
        );
        Ok(())
    }
}

#[async_trait]
impl EventHandler for GreeterHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        tracing::info!(target: "discord", user = %ready.user.name, guilds = ready.guilds.len(), "logged in");
    }

    async fn guild_member_addition(&self, ctx: Context, new_member: Member) {
        if let Err(err) = self.onboard(&ctx, &new_member).await {
            tracing::error!(
                target: "onboarding",
                user_id = new_member.user.id.get(),
                error = %err,
                "error handling guild member join"
            );
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot || msg.guild_id.is_none() {
            return;
        }

        let channel_name = match msg.channel_id.name(&ctx).await {
            Ok(name) => Some(name),
            Err(err) => {
                tracing::debug!(target: "commands", error = %err, "could not resolve channel name");
                None
            }
        };
        let plan = plan_message(
            &InboundMessage {
                author_is_bot: msg.author.bot,
                in_guild: msg.guild_id.is_some(),
                channel_name: channel_name.as_deref(),
                content: &msg.content,
            },
            self.state.monitored_channels(),
        );

        if plan.is_empty() {
            return;
        }
        respond(
            &DiscordCommandContext::new(&ctx, &msg),
            plan,
            self.state.current_year(),
        )
        .await;
    }
}

/// Opens `ready` on the first gateway ready event so scheduled jobs can run.
pub struct ListingsHandler {
    ready: Latch,
}

impl ListingsHandler {
    pub fn new(ready: Latch) -> Self {
        Self { ready }
    }
}

#[async_trait]
impl EventHandler for ListingsHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        tracing::info!(target: "discord", user = %ready.user.name, guilds = ready.guilds.len(), "logged in");
        self.ready.trigger();
    }
}
