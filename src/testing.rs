//! In-memory doubles for the platform and clock seams.

use std::{
    collections::{HashSet, VecDeque},
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Result;
use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use parking_lot::Mutex;

use crate::{
    infrastructure::{clock::Clock, mirror::DatasetMirror},
    platform::{
        ChannelHandle, CommandContext, DeliveryGateway, GuildOwner, MessageRef, OnboardingSession,
        PlatformError, RoleGrant,
    },
};

pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

#[derive(Default)]
pub struct FakeGateway {
    missing: HashSet<u64>,
    owners: Vec<GuildOwner>,
    succeed_before_failing: Option<usize>,
    sent: Mutex<Vec<(u64, String)>>,
    dms: Mutex<Vec<(u64, String)>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_missing_channel(mut self, channel_id: u64) -> Self {
        self.missing.insert(channel_id);
        self
    }

    pub fn with_owners(mut self, owners: &[(u64, u64)]) -> Self {
        self.owners = owners
            .iter()
            .map(|&(guild_id, owner_id)| GuildOwner { guild_id, owner_id })
            .collect();
        self
    }

    /// Sends succeed `count` times, then every send fails.
    pub fn failing_after(mut self, count: usize) -> Self {
        self.succeed_before_failing = Some(count);
        self
    }

    pub fn sent(&self) -> Vec<(u64, String)> {
        self.sent.lock().clone()
    }

    pub fn direct_messages(&self) -> Vec<(u64, String)> {
        self.dms.lock().clone()
    }
}

impl DeliveryGateway for FakeGateway {
    fn resolve_channel(&self, channel_id: u64) -> BoxFuture<'_, Result<ChannelHandle, PlatformError>> {
        Box::pin(async move {
            if self.missing.contains(&channel_id) {
                return Err(PlatformError::ChannelNotFound(channel_id));
            }
            Ok(ChannelHandle {
                id: channel_id,
                name: Some("listings".into()),
            })
        })
    }

    fn send_message<'a>(
        &'a self,
        channel: &'a ChannelHandle,
        text: &'a str,
    ) -> BoxFuture<'a, Result<(), PlatformError>> {
        Box::pin(async move {
            let mut sent = self.sent.lock();
            if let Some(limit) = self.succeed_before_failing {
                if sent.len() >= limit {
                    return Err(PlatformError::Rejected("Missing Access".into()));
                }
            }
            sent.push((channel.id, text.to_string()));
            Ok(())
        })
    }

    fn guild_owners(&self) -> Vec<GuildOwner> {
        self.owners.clone()
    }

    fn direct_message<'a>(
        &'a self,
        user_id: u64,
        text: &'a str,
    ) -> BoxFuture<'a, Result<(), PlatformError>> {
        Box::pin(async move {
            self.dms.lock().push((user_id, text.to_string()));
            Ok(())
        })
    }
}

/// Mirror that never touches the network; the dataset is written by the test.
pub struct StaticMirror {
    root: PathBuf,
    refreshes: Mutex<usize>,
}

impl StaticMirror {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            refreshes: Mutex::new(0),
        }
    }

    pub fn refreshes(&self) -> usize {
        *self.refreshes.lock()
    }
}

impl DatasetMirror for StaticMirror {
    fn refresh(&self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            *self.refreshes.lock() += 1;
            Ok(())
        })
    }

    fn root(&self) -> &Path {
        &self.root
    }
}

/// Scripted member on the other end of an onboarding conversation. `None` in
/// the script stands for a question that times out.
#[derive(Default)]
pub struct ScriptedSession {
    replies: Mutex<VecDeque<Option<String>>>,
    transcript: Mutex<Vec<String>>,
    nickname: Mutex<Option<String>>,
    granted: Mutex<Vec<String>>,
    role_missing: bool,
    nickname_fails: bool,
}

impl ScriptedSession {
    pub fn new(replies: &[Option<&str>]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(|r| r.map(str::to_string)).collect()),
            ..Self::default()
        }
    }

    pub fn without_role(mut self) -> Self {
        self.role_missing = true;
        self
    }

    pub fn rejecting_nickname(mut self) -> Self {
        self.nickname_fails = true;
        self
    }

    pub fn transcript(&self) -> Vec<String> {
        self.transcript.lock().clone()
    }

    pub fn nickname(&self) -> Option<String> {
        self.nickname.lock().clone()
    }

    pub fn granted(&self) -> Vec<String> {
        self.granted.lock().clone()
    }
}

impl OnboardingSession for ScriptedSession {
    fn send<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<(), PlatformError>> {
        Box::pin(async move {
            self.transcript.lock().push(text.to_string());
            Ok(())
        })
    }

    fn next_reply(&self, _wait: Duration) -> BoxFuture<'_, Option<String>> {
        Box::pin(async move { self.replies.lock().pop_front().flatten() })
    }

    fn set_presentation_name<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<(), PlatformError>> {
        Box::pin(async move {
            if self.nickname_fails {
                return Err(PlatformError::Rejected("Missing Permissions".into()));
            }
            *self.nickname.lock() = Some(name.to_string());
            Ok(())
        })
    }

    fn grant_role<'a>(&'a self, role_name: &'a str) -> BoxFuture<'a, Result<RoleGrant, PlatformError>> {
        Box::pin(async move {
            if self.role_missing {
                return Ok(RoleGrant::RoleMissing);
            }
            self.granted.lock().push(role_name.to_string());
            Ok(RoleGrant::Granted)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandCall {
    React(char),
    Say(String),
    Reply(String),
    Delete(MessageRef),
    DeleteAfter(MessageRef, Duration),
    SetNickname(String),
}

/// Records every action taken while answering one message. Delayed deletes
/// are recorded with their delay instead of waiting.
pub struct FakeCommandContext {
    author_id: u64,
    display_name: String,
    nickname_fails: bool,
    calls: Mutex<Vec<CommandCall>>,
    posted: Mutex<Vec<MessageRef>>,
}

impl FakeCommandContext {
    const CHANNEL: u64 = 500;

    pub fn new(author_id: u64, display_name: &str) -> Self {
        Self {
            author_id,
            display_name: display_name.to_string(),
            nickname_fails: false,
            calls: Mutex::new(Vec::new()),
            posted: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting_nickname(mut self) -> Self {
        self.nickname_fails = true;
        self
    }

    pub fn calls(&self) -> Vec<CommandCall> {
        self.calls.lock().clone()
    }

    /// Messages the bot posted, in order.
    pub fn posted(&self) -> Vec<MessageRef> {
        self.posted.lock().clone()
    }

    fn post(&self, call: CommandCall) -> MessageRef {
        let mut posted = self.posted.lock();
        let message = MessageRef {
            channel_id: Self::CHANNEL,
            message_id: 100 + posted.len() as u64,
        };
        posted.push(message);
        self.calls.lock().push(call);
        message
    }
}

impl CommandContext for FakeCommandContext {
    fn trigger(&self) -> MessageRef {
        MessageRef {
            channel_id: Self::CHANNEL,
            message_id: 1,
        }
    }

    fn author_id(&self) -> u64 {
        self.author_id
    }

    fn author_display_name(&self) -> String {
        self.display_name.clone()
    }

    fn react(&self, emoji: char) -> BoxFuture<'_, Result<(), PlatformError>> {
        Box::pin(async move {
            self.calls.lock().push(CommandCall::React(emoji));
            Ok(())
        })
    }

    fn say<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<MessageRef, PlatformError>> {
        Box::pin(async move { Ok(self.post(CommandCall::Say(text.to_string()))) })
    }

    fn reply<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<MessageRef, PlatformError>> {
        Box::pin(async move { Ok(self.post(CommandCall::Reply(text.to_string()))) })
    }

    fn delete(&self, message: MessageRef) -> BoxFuture<'_, Result<(), PlatformError>> {
        Box::pin(async move {
            self.calls.lock().push(CommandCall::Delete(message));
            Ok(())
        })
    }

    fn delete_after(&self, message: MessageRef, delay: Duration) {
        self.calls.lock().push(CommandCall::DeleteAfter(message, delay));
    }

    fn set_author_nickname<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<(), PlatformError>> {
        Box::pin(async move {
            if self.nickname_fails {
                return Err(PlatformError::Rejected("Missing Permissions".into()));
            }
            self.calls.lock().push(CommandCall::SetNickname(name.to_string()));
            Ok(())
        })
    }
}
