use std::time::Duration;

use crate::platform::CommandContext;

use super::{
    rebuild_presentation_name, usage_hint, MessagePlan, ProcessStatus, ProcessUpdate,
    ProcessVerdict,
};

pub const ACK_GLYPH: char = '✅';
pub const OFFER_MESSAGE: &str = "Congrats 💐!";
pub const HINT_TTL: Duration = Duration::from_secs(10);
pub const REPLY_TTL: Duration = Duration::from_secs(5);
const TITLE_UPDATE_FAILED: &str = "I couldn't update your nickname. Please contact an admin.";

/// Carries out a planned response. Platform failures are logged and never
/// abort the remaining steps.
pub async fn respond(ctx: &dyn CommandContext, plan: MessagePlan, current_year: i32) {
    if let Some(verdict) = plan.process {
        respond_to_process(ctx, verdict).await;
    }
    if let Some(affiliation) = plan.update_title {
        respond_to_update_title(ctx, &affiliation, current_year).await;
    }
}

async fn respond_to_process(ctx: &dyn CommandContext, verdict: ProcessVerdict) {
    match verdict {
        ProcessVerdict::Accepted(ProcessUpdate {
            company,
            status,
            note,
        }) => {
            tracing::debug!(
                target: "commands",
                user_id = ctx.author_id(),
                %company,
                %status,
                note = note.as_deref().unwrap_or(""),
                "process update accepted"
            );
            if let Err(err) = ctx.react(ACK_GLYPH).await {
                tracing::warn!(target: "commands", error = %err, "failed to react");
            }
            if status == ProcessStatus::Offer {
                if let Err(err) = ctx.say(OFFER_MESSAGE).await {
                    tracing::warn!(target: "commands", error = %err, "failed to send congratulations");
                }
            }
        }
        ProcessVerdict::Rejected => {
            if let Err(err) = ctx.delete(ctx.trigger()).await {
                tracing::warn!(target: "commands", error = %err, "failed to delete malformed process message");
            }
            match ctx.say(&usage_hint(ctx.author_id())).await {
                Ok(hint) => ctx.delete_after(hint, HINT_TTL),
                Err(err) => {
                    tracing::warn!(target: "commands", error = %err, "failed to send usage hint")
                }
            }
        }
    }
}

async fn respond_to_update_title(ctx: &dyn CommandContext, affiliation: &str, current_year: i32) {
    let current = ctx.author_display_name();
    let (reply, updated) = match rebuild_presentation_name(&current, affiliation, current_year) {
        Err(err) => (err.to_string(), false),
        Ok(nickname) => match ctx.set_author_nickname(&nickname).await {
            Ok(()) => (format!("Your nickname has been updated to: {nickname}"), true),
            Err(err) => {
                tracing::warn!(
                    target: "commands",
                    user_id = ctx.author_id(),
                    error = %err,
                    "failed to update nickname"
                );
                (TITLE_UPDATE_FAILED.to_string(), false)
            }
        },
    };

    match ctx.reply(&reply).await {
        Ok(sent) => ctx.delete_after(sent, REPLY_TTL),
        Err(err) => tracing::warn!(target: "commands", error = %err, "failed to reply"),
    }
    if updated {
        ctx.delete_after(ctx.trigger(), REPLY_TTL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        commands::{plan_message, InboundMessage},
        testing::{CommandCall, FakeCommandContext},
    };

    const YEAR: i32 = 2025;
    const AUTHOR: u64 = 42;

    fn plan_for(channel: &str, content: &str) -> MessagePlan {
        plan_message(
            &InboundMessage {
                author_is_bot: false,
                in_guild: true,
                channel_name: Some(channel),
                content,
            },
            &["intern-process".to_string(), "new-grad-process".to_string()],
        )
    }

    #[tokio::test]
    async fn accepted_update_is_acknowledged_without_congratulations() {
        let ctx = FakeCommandContext::new(AUTHOR, "Jane Doe - 2024");
        respond(&ctx, plan_for("intern-process", "!process Acme OA (went well)"), YEAR).await;
        assert_eq!(ctx.calls(), vec![CommandCall::React(ACK_GLYPH)]);
    }

    #[tokio::test]
    async fn offer_is_acknowledged_and_congratulated() {
        let ctx = FakeCommandContext::new(AUTHOR, "Jane Doe - 2024");
        respond(&ctx, plan_for("new-grad-process", "!process Acme offer"), YEAR).await;
        assert_eq!(
            ctx.calls(),
            vec![
                CommandCall::React(ACK_GLYPH),
                CommandCall::Say(OFFER_MESSAGE.to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn malformed_update_is_deleted_and_hint_expires() {
        let ctx = FakeCommandContext::new(AUTHOR, "Jane Doe - 2024");
        respond(&ctx, plan_for("intern-process", "!process Acme maybe"), YEAR).await;

        let calls = ctx.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], CommandCall::Delete(ctx.trigger()));
        match &calls[1] {
            CommandCall::Say(text) => {
                assert!(text.starts_with("<@42>"));
                assert!(text.contains(ProcessStatus::USAGE));
            }
            other => panic!("unexpected call {other:?}"),
        }
        let hint = ctx.posted()[0];
        assert_eq!(calls[2], CommandCall::DeleteAfter(hint, HINT_TTL));
    }

    #[tokio::test]
    async fn unmonitored_channel_gets_no_reaction_and_no_deletion() {
        let ctx = FakeCommandContext::new(AUTHOR, "Jane Doe - 2024");
        respond(&ctx, plan_for("general", "!process Acme maybe"), YEAR).await;
        assert!(ctx.calls().is_empty());
    }

    #[tokio::test]
    async fn successful_title_update_deletes_reply_and_command() {
        let ctx = FakeCommandContext::new(AUTHOR, "Jane Doe - 2024 - Google");
        respond(&ctx, plan_for("general", "!update-title Meta"), YEAR).await;

        let reply = ctx.posted()[0];
        assert_eq!(
            ctx.calls(),
            vec![
                CommandCall::SetNickname("Jane Doe - 2024 - Meta".to_string()),
                CommandCall::Reply("Your nickname has been updated to: Jane Doe - 2024 - Meta".to_string()),
                CommandCall::DeleteAfter(reply, REPLY_TTL),
                CommandCall::DeleteAfter(ctx.trigger(), REPLY_TTL),
            ]
        );
    }

    #[tokio::test]
    async fn refused_title_update_keeps_the_command() {
        let ctx = FakeCommandContext::new(AUTHOR, "Jane Doe - 2030");
        respond(&ctx, plan_for("general", "!update-title Meta"), YEAR).await;

        let reply = ctx.posted()[0];
        assert_eq!(
            ctx.calls(),
            vec![
                CommandCall::Reply(
                    "This command is only available to graduates or those graduating this year."
                        .to_string()
                ),
                CommandCall::DeleteAfter(reply, REPLY_TTL),
            ]
        );
    }

    #[tokio::test]
    async fn failed_nickname_change_keeps_the_command() {
        let ctx = FakeCommandContext::new(AUTHOR, "Jane Doe - 2024").rejecting_nickname();
        respond(&ctx, plan_for("general", "!update-title Meta"), YEAR).await;

        let calls = ctx.calls();
        assert_eq!(calls.last(), Some(&CommandCall::DeleteAfter(ctx.posted()[0], REPLY_TTL)));
        assert!(!calls.contains(&CommandCall::DeleteAfter(ctx.trigger(), REPLY_TTL)));
        assert!(calls.contains(&CommandCall::Reply(TITLE_UPDATE_FAILED.to_string())));
    }

    #[tokio::test]
    async fn both_commands_in_one_message_are_handled() {
        let ctx = FakeCommandContext::new(AUTHOR, "Jane Doe - 2024");
        let plan = MessagePlan {
            process: Some(ProcessVerdict::Rejected),
            update_title: Some("Meta".to_string()),
        };
        respond(&ctx, plan, YEAR).await;
        let calls = ctx.calls();
        assert_eq!(calls[0], CommandCall::Delete(ctx.trigger()));
        assert!(calls.contains(&CommandCall::SetNickname("Jane Doe - 2024 - Meta".to_string())));
    }
}
