use std::fmt::Display;

use twilight_model::channel::ChannelType;

use super::TriggerData;
use crate::corvid::Corvid;

/// A declarative boolean precondition on a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandTag {
    /// The command only works inside a guild.
    GuildOnly,
    /// The command only works in direct messages.
    DmOnly,
    /// Only configured owner users may run the command.
    OwnerOnly,
    /// Only the owner of the current guild may run the command.
    GuildOwnerOnly,
    /// The channel must be marked age-restricted.
    Nsfw,
    /// The channel must not be a thread.
    ChannelOnly,
    /// The channel must be a thread.
    ThreadOnly,
}

impl Display for CommandTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::GuildOnly => "guild_only",
            Self::DmOnly => "dm_only",
            Self::OwnerOnly => "owner_only",
            Self::GuildOwnerOnly => "guild_owner_only",
            Self::Nsfw => "nsfw",
            Self::ChannelOnly => "channel_only",
            Self::ThreadOnly => "thread_only",
        })
    }
}

fn is_thread(kind: ChannelType) -> bool {
    matches!(
        kind,
        ChannelType::AnnouncementThread | ChannelType::PublicThread | ChannelType::PrivateThread
    )
}

fn is_dm(kind: ChannelType) -> bool {
    matches!(kind, ChannelType::Private | ChannelType::Group)
}

impl CommandTag {
    /// Whether the precondition fails for this context. Lookup failures
    /// bubble up so the pipeline can classify them.
    pub async fn is_unmet(&self, corvid: &Corvid, data: &TriggerData) -> anyhow::Result<bool> {
        match self {
            Self::GuildOnly => Ok(data.guild_id.is_none()),
            Self::DmOnly => {
                let channel = corvid.platform().channel(data.channel_id).await?;
                Ok(!is_dm(channel.kind))
            },
            Self::OwnerOnly => Ok(!corvid.config().owners.contains(&data.author.id.get())),
            Self::GuildOwnerOnly => match data.guild_id {
                Some(guild_id) => {
                    let owner = corvid.platform().guild_owner(guild_id).await?;
                    Ok(owner != data.author.id)
                },
                None => Ok(true),
            },
            Self::Nsfw => {
                if data.guild_id.is_none() {
                    return Ok(false);
                }
                let channel = corvid.platform().channel(data.channel_id).await?;
                Ok(!channel.nsfw.unwrap_or(false))
            },
            Self::ChannelOnly => {
                let channel = corvid.platform().channel(data.channel_id).await?;
                Ok(is_thread(channel.kind))
            },
            Self::ThreadOnly => {
                let channel = corvid.platform().channel(data.channel_id).await?;
                Ok(!is_thread(channel.kind))
            },
        }
    }
}
