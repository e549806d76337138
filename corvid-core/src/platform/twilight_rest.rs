use anyhow::Context;
use async_trait::async_trait;
use twilight_http::Client;
use twilight_model::channel::{Channel, Message};
use twilight_model::guild::{Member, Permissions, Role};
use twilight_model::http::attachment::Attachment as HttpAttachment;
use twilight_model::http::interaction::{InteractionResponse, InteractionResponseType};
use twilight_model::id::marker::{ApplicationMarker, ChannelMarker, GuildMarker, MessageMarker, RoleMarker, UserMarker};
use twilight_model::id::Id;
use twilight_model::user::User;
use twilight_util::builder::InteractionResponseDataBuilder;

use super::Platform;
use crate::command::messagebuilder::MessageBuilder;
use crate::command::source::Source;
use crate::command::TriggerData;

/// The production [Platform] backed by the Discord REST API.
pub struct TwilightRest {
    http: Client,
    application_id: Id<ApplicationMarker>,
    current_user_id: Id<UserMarker>,
}

impl TwilightRest {
    pub fn new(http: Client, application_id: Id<ApplicationMarker>, current_user_id: Id<UserMarker>) -> Self {
        Self {
            http,
            application_id,
            current_user_id,
        }
    }

    pub fn http(&self) -> &Client {
        &self.http
    }
}

#[async_trait]
impl Platform for TwilightRest {
    async fn user(&self, id: Id<UserMarker>) -> anyhow::Result<User> {
        Ok(self.http.user(id).await?.model().await?)
    }

    async fn channel(&self, id: Id<ChannelMarker>) -> anyhow::Result<Channel> {
        Ok(self.http.channel(id).await?.model().await?)
    }

    async fn member(&self, guild_id: Id<GuildMarker>, user_id: Id<UserMarker>) -> anyhow::Result<Member> {
        Ok(self.http.guild_member(guild_id, user_id).await?.model().await?)
    }

    async fn role(&self, guild_id: Id<GuildMarker>, role_id: Id<RoleMarker>) -> anyhow::Result<Role> {
        let roles = self.http.roles(guild_id).await?.models().await?;
        roles
            .into_iter()
            .find(|role| role.id == role_id)
            .context("no role with that ID in the guild")
    }

    async fn message(
        &self,
        channel_id: Id<ChannelMarker>,
        message_id: Id<MessageMarker>,
    ) -> anyhow::Result<Message> {
        Ok(self.http.message(channel_id, message_id).await?.model().await?)
    }

    async fn guild_owner(&self, guild_id: Id<GuildMarker>) -> anyhow::Result<Id<UserMarker>> {
        Ok(self.http.guild(guild_id).await?.model().await?.owner_id)
    }

    async fn member_permissions(
        &self,
        guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
    ) -> anyhow::Result<Permissions> {
        let guild = self.http.guild(guild_id).await?.model().await?;
        if guild.owner_id == user_id {
            return Ok(Permissions::all());
        }

        let member = self.http.guild_member(guild_id, user_id).await?.model().await?;

        let everyone = guild
            .roles
            .iter()
            .find(|role| role.id.get() == guild_id.get())
            .map(|role| role.permissions)
            .unwrap_or_else(Permissions::empty);

        let roles = member
            .roles
            .iter()
            .filter_map(|role_id| guild.roles.iter().find(|role| role.id == *role_id))
            .map(|role| (role.id, role.permissions))
            .collect::<Vec<_>>();

        let calculator =
            twilight_util::permission_calculator::PermissionCalculator::new(guild_id, user_id, everyone, &roles);

        Ok(calculator.root())
    }

    fn current_user_id(&self) -> Id<UserMarker> {
        self.current_user_id
    }

    async fn reply(&self, data: &TriggerData, builder: MessageBuilder) -> anyhow::Result<()> {
        match data.source {
            Source::Message => {
                let embeds = builder.embed.map(|embed| vec![embed]);
                let attachments = builder
                    .attachment
                    .map(|a| vec![HttpAttachment::from_bytes(a.name, a.data, 0)]);

                let mut create = self.http.create_message(data.channel_id);
                if let Some(ref content) = builder.content {
                    create = create.content(content);
                }
                if let Some(ref embeds) = embeds {
                    create = create.embeds(embeds);
                }
                if let Some(ref attachments) = attachments {
                    create = create.attachments(attachments);
                }

                create.await?;
                Ok(())
            },
            Source::Interaction => {
                let interaction_id = data.interaction_id.context("interaction reply without an interaction ID")?;
                let token = data
                    .interaction_token
                    .as_deref()
                    .context("interaction reply without a token")?;

                let mut response_data = InteractionResponseDataBuilder::new();
                if let Some(content) = builder.content {
                    response_data = response_data.content(content);
                }
                if let Some(embed) = builder.embed {
                    response_data = response_data.embeds([embed]);
                }

                let response = InteractionResponse {
                    kind: InteractionResponseType::ChannelMessageWithSource,
                    data: Some(response_data.build()),
                };

                self.http
                    .interaction(self.application_id)
                    .create_response(interaction_id, token, &response)
                    .await?;
                Ok(())
            },
        }
    }
}
