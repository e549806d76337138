//! Shared fixtures: a seeded in-memory [Platform] and twilight entities
//! built through their `Deserialize` impls, the same way the wire
//! payloads would produce them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;
use twilight_model::channel::{Channel, Message};
use twilight_model::guild::{Member, Permissions, Role};
use twilight_model::id::marker::{ChannelMarker, GuildMarker, MessageMarker, RoleMarker, UserMarker};
use twilight_model::id::Id;
use twilight_model::user::User;

use crate::command::messagebuilder::MessageBuilder;
use crate::command::source::Source;
use crate::command::TriggerData;
use crate::corvid::{Corvid, ThreadSafeCorvid};
use crate::platform::Platform;

use corvid_common::config::CorvidConfig;

pub const BOT_ID: u64 = 100000000000000001;
pub const USER_ID: u64 = 300000000000000001;
pub const GUILD_OWNER_ID: u64 = 600000000000000001;
pub const GUILD_ID: u64 = 500000000000000001;
pub const CHANNEL_GUILD: u64 = 400000000000000001;
pub const CHANNEL_DM: u64 = 400000000000000002;
pub const CHANNEL_NSFW: u64 = 400000000000000003;
pub const ROLE_ID: u64 = 700000000000000001;
pub const MESSAGE_ID: u64 = 800000000000000001;

const TIMESTAMP: &str = "2021-01-01T00:00:00.000000+00:00";

pub fn user(id: u64, name: &str) -> User {
    serde_json::from_value(json!({
        "id": id.to_string(),
        "username": name,
        "discriminator": "0001",
        "global_name": null,
        "avatar": null,
        "bot": false,
    }))
    .unwrap()
}

pub fn guild_channel(id: u64, nsfw: bool) -> Channel {
    serde_json::from_value(json!({
        "id": id.to_string(),
        "type": 0,
        "guild_id": GUILD_ID.to_string(),
        "name": "general",
        "nsfw": nsfw,
    }))
    .unwrap()
}

pub fn dm_channel(id: u64) -> Channel {
    serde_json::from_value(json!({
        "id": id.to_string(),
        "type": 1,
    }))
    .unwrap()
}

pub fn member(user_id: u64, name: &str) -> Member {
    serde_json::from_value(json!({
        "user": {
            "id": user_id.to_string(),
            "username": name,
            "discriminator": "0001",
            "global_name": null,
            "avatar": null,
            "bot": false,
        },
        "roles": [ROLE_ID.to_string()],
        "joined_at": TIMESTAMP,
        "deaf": false,
        "mute": false,
        "flags": 0,
        "pending": false,
    }))
    .unwrap()
}

pub fn role(id: u64, name: &str) -> Role {
    serde_json::from_value(json!({
        "id": id.to_string(),
        "name": name,
        "color": 0,
        "hoist": false,
        "position": 0,
        "permissions": "0",
        "managed": false,
        "mentionable": false,
        "flags": 0,
    }))
    .unwrap()
}

pub fn message(content: &str, channel_id: u64, author_id: u64) -> Message {
    let mut value = json!({
        "id": MESSAGE_ID.to_string(),
        "channel_id": channel_id.to_string(),
        "author": {
            "id": author_id.to_string(),
            "username": "tester",
            "discriminator": "0001",
            "global_name": null,
            "avatar": null,
            "bot": false,
        },
        "content": content,
        "timestamp": TIMESTAMP,
        "edited_timestamp": null,
        "tts": false,
        "mention_everyone": false,
        "mentions": [],
        "mention_roles": [],
        "attachments": [],
        "embeds": [],
        "pinned": false,
        "type": 0,
    });
    if channel_id != CHANNEL_DM {
        value["guild_id"] = json!(GUILD_ID.to_string());
    }
    serde_json::from_value(value).unwrap()
}

/// An in-memory [Platform] seeded with a small fixed world: one guild
/// owned by [GUILD_OWNER_ID], a text channel, a DM channel, an
/// age-restricted channel, and a handful of entities.
pub struct MockPlatform {
    pub users: HashMap<u64, User>,
    pub channels: HashMap<u64, Channel>,
    pub members: HashMap<(u64, u64), Member>,
    pub roles: HashMap<(u64, u64), Role>,
    pub messages: HashMap<(u64, u64), Message>,
    pub guild_owners: HashMap<u64, u64>,
    pub permissions: HashMap<(u64, u64), Permissions>,
    pub current_user: u64,
    pub replies: Arc<Mutex<Vec<MessageBuilder>>>,
}

pub fn mock_platform() -> MockPlatform {
    let mut users = HashMap::new();
    users.insert(USER_ID, user(USER_ID, "tester"));
    users.insert(BOT_ID, user(BOT_ID, "corvid"));
    users.insert(GUILD_OWNER_ID, user(GUILD_OWNER_ID, "owner"));

    let mut channels = HashMap::new();
    channels.insert(CHANNEL_GUILD, guild_channel(CHANNEL_GUILD, false));
    channels.insert(CHANNEL_NSFW, guild_channel(CHANNEL_NSFW, true));
    channels.insert(CHANNEL_DM, dm_channel(CHANNEL_DM));

    let mut members = HashMap::new();
    members.insert((GUILD_ID, USER_ID), member(USER_ID, "tester"));

    let mut roles = HashMap::new();
    roles.insert((GUILD_ID, ROLE_ID), role(ROLE_ID, "everyone-else"));

    let mut messages = HashMap::new();
    messages.insert((CHANNEL_GUILD, MESSAGE_ID), message("an old message", CHANNEL_GUILD, USER_ID));

    let mut guild_owners = HashMap::new();
    guild_owners.insert(GUILD_ID, GUILD_OWNER_ID);

    MockPlatform {
        users,
        channels,
        members,
        roles,
        messages,
        guild_owners,
        permissions: HashMap::new(),
        current_user: BOT_ID,
        replies: Arc::default(),
    }
}

#[async_trait]
impl Platform for MockPlatform {
    async fn user(&self, id: Id<UserMarker>) -> anyhow::Result<User> {
        self.users.get(&id.get()).cloned().context("unknown user")
    }

    async fn channel(&self, id: Id<ChannelMarker>) -> anyhow::Result<Channel> {
        self.channels.get(&id.get()).cloned().context("unknown channel")
    }

    async fn member(&self, guild_id: Id<GuildMarker>, user_id: Id<UserMarker>) -> anyhow::Result<Member> {
        self.members
            .get(&(guild_id.get(), user_id.get()))
            .cloned()
            .context("unknown member")
    }

    async fn role(&self, guild_id: Id<GuildMarker>, role_id: Id<RoleMarker>) -> anyhow::Result<Role> {
        self.roles
            .get(&(guild_id.get(), role_id.get()))
            .cloned()
            .context("unknown role")
    }

    async fn message(
        &self,
        channel_id: Id<ChannelMarker>,
        message_id: Id<MessageMarker>,
    ) -> anyhow::Result<Message> {
        self.messages
            .get(&(channel_id.get(), message_id.get()))
            .cloned()
            .context("unknown message")
    }

    async fn guild_owner(&self, guild_id: Id<GuildMarker>) -> anyhow::Result<Id<UserMarker>> {
        self.guild_owners
            .get(&guild_id.get())
            .map(|id| Id::new(*id))
            .context("unknown guild")
    }

    async fn member_permissions(
        &self,
        guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
    ) -> anyhow::Result<Permissions> {
        Ok(self
            .permissions
            .get(&(guild_id.get(), user_id.get()))
            .copied()
            .unwrap_or_else(Permissions::empty))
    }

    fn current_user_id(&self) -> Id<UserMarker> {
        Id::new(self.current_user)
    }

    async fn reply(&self, _data: &TriggerData, builder: MessageBuilder) -> anyhow::Result<()> {
        self.replies.lock().unwrap().push(builder);
        Ok(())
    }
}

pub fn mock_platform_arc() -> Arc<dyn Platform> {
    Arc::new(mock_platform())
}

pub fn mock_corvid_with(platform: MockPlatform) -> ThreadSafeCorvid {
    Arc::new(Corvid::new(CorvidConfig::default(), Arc::new(platform)))
}

pub fn mock_corvid() -> ThreadSafeCorvid {
    mock_corvid_with(mock_platform())
}

/// A handler plus a shared handle onto every reply the mock platform
/// captures.
pub fn mock_corvid_capturing() -> (ThreadSafeCorvid, Arc<Mutex<Vec<MessageBuilder>>>) {
    let platform = mock_platform();
    let replies = platform.replies.clone();
    (mock_corvid_with(platform), replies)
}

pub fn trigger_message() -> TriggerData {
    TriggerData {
        source: Source::Message,
        channel_id: Id::new(CHANNEL_GUILD),
        guild_id: Some(Id::new(GUILD_ID)),
        author: user(USER_ID, "tester"),
        message: None,
        interaction_id: None,
        interaction_token: None,
        calling_prefix: "-".to_owned(),
    }
}

pub fn trigger_dm() -> TriggerData {
    TriggerData {
        source: Source::Message,
        channel_id: Id::new(CHANNEL_DM),
        guild_id: None,
        author: user(USER_ID, "tester"),
        message: None,
        interaction_id: None,
        interaction_token: None,
        calling_prefix: String::new(),
    }
}
