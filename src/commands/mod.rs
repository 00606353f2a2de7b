pub mod process;
pub mod respond;
pub mod title;

pub use process::{parse_process_update, usage_hint, ProcessStatus, ProcessUpdate};
pub use respond::respond;
pub use title::{parse_update_title, rebuild_presentation_name, TitleUpdateError};

/// What the greeter needs to know about an inbound message.
#[derive(Debug, Clone)]
pub struct InboundMessage<'a> {
    pub author_is_bot: bool,
    pub in_guild: bool,
    pub channel_name: Option<&'a str>,
    pub content: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessVerdict {
    Accepted(ProcessUpdate),
    Rejected,
}

/// The two grammars are evaluated independently; a message may trigger both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessagePlan {
    pub process: Option<ProcessVerdict>,
    pub update_title: Option<String>,
}

impl MessagePlan {
    pub fn is_empty(&self) -> bool {
        self.process.is_none() && self.update_title.is_none()
    }
}

pub fn plan_message(message: &InboundMessage<'_>, monitored_channels: &[String]) -> MessagePlan {
    if message.author_is_bot || !message.in_guild {
        return MessagePlan::default();
    }

    let monitored = message
        .channel_name
        .is_some_and(|name| monitored_channels.iter().any(|c| c == name));
    let process = monitored.then(|| match parse_process_update(message.content) {
        Some(update) => ProcessVerdict::Accepted(update),
        None => ProcessVerdict::Rejected,
    });

    MessagePlan {
        process,
        update_title: parse_update_title(message.content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monitored() -> Vec<String> {
        vec!["intern-process".into(), "new-grad-process".into()]
    }

    fn guild_message<'a>(channel: &'a str, content: &'a str) -> InboundMessage<'a> {
        InboundMessage {
            author_is_bot: false,
            in_guild: true,
            channel_name: Some(channel),
            content,
        }
    }

    #[test]
    fn unmonitored_channel_is_ignored() {
        let plan = plan_message(&guild_message("general", "!process Acme apply"), &monitored());
        assert!(plan.is_empty());
    }

    #[test]
    fn malformed_command_in_monitored_channel_is_rejected() {
        let plan = plan_message(
            &guild_message("intern-process", "!process Acme maybe"),
            &monitored(),
        );
        assert_eq!(plan.process, Some(ProcessVerdict::Rejected));
    }

    #[test]
    fn offer_is_accepted() {
        let plan = plan_message(
            &guild_message("new-grad-process", "!process Acme offer"),
            &monitored(),
        );
        match plan.process {
            Some(ProcessVerdict::Accepted(update)) => {
                assert_eq!(update.status, ProcessStatus::Offer)
            }
            other => panic!("unexpected plan {other:?}"),
        }
    }

    #[test]
    fn bots_and_direct_messages_are_ignored() {
        let mut message = guild_message("intern-process", "!process Acme maybe");
        message.author_is_bot = true;
        assert!(plan_message(&message, &monitored()).is_empty());

        let mut message = guild_message("intern-process", "!update-title Google");
        message.in_guild = false;
        assert!(plan_message(&message, &monitored()).is_empty());
    }

    #[test]
    fn update_title_works_in_any_channel() {
        let plan = plan_message(&guild_message("general", "!update-title Google"), &monitored());
        assert_eq!(plan.process, None);
        assert_eq!(plan.update_title.as_deref(), Some("Google"));
    }
}
