//! The chat-platform capability surface.
//!
//! The framework consumes the platform, it does not implement it: entity
//! lookups, permission resolution and replies all go through the
//! [Platform] trait. [twilight_rest::TwilightRest] is the production
//! implementation over `twilight_http`; tests substitute their own.

use async_trait::async_trait;
use twilight_model::channel::{Channel, Message};
use twilight_model::guild::{Member, Permissions, Role};
use twilight_model::id::marker::{ChannelMarker, GuildMarker, MessageMarker, RoleMarker, UserMarker};
use twilight_model::id::Id;
use twilight_model::user::User;

use crate::command::messagebuilder::MessageBuilder;
use crate::command::TriggerData;

pub mod twilight_rest;

/// Everything the framework needs from the chat platform. Lookup methods
/// may hit the network; errors bubble up and are classified by the
/// caller.
#[async_trait]
pub trait Platform: Send + Sync {
    async fn user(&self, id: Id<UserMarker>) -> anyhow::Result<User>;

    async fn channel(&self, id: Id<ChannelMarker>) -> anyhow::Result<Channel>;

    async fn member(&self, guild_id: Id<GuildMarker>, user_id: Id<UserMarker>) -> anyhow::Result<Member>;

    async fn role(&self, guild_id: Id<GuildMarker>, role_id: Id<RoleMarker>) -> anyhow::Result<Role>;

    async fn message(&self, channel_id: Id<ChannelMarker>, message_id: Id<MessageMarker>)
        -> anyhow::Result<Message>;

    async fn guild_owner(&self, guild_id: Id<GuildMarker>) -> anyhow::Result<Id<UserMarker>>;

    /// The member's effective guild-level permissions.
    async fn member_permissions(
        &self,
        guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
    ) -> anyhow::Result<Permissions>;

    /// The bot's own user ID.
    fn current_user_id(&self) -> Id<UserMarker>;

    /// Sends a reply appropriate to the trigger: a channel message for
    /// text invocations, an interaction response for application
    /// commands.
    async fn reply(&self, data: &TriggerData, builder: MessageBuilder) -> anyhow::Result<()>;
}
