//! The command validation pipeline.
//!
//! Gates run in a fixed order and the first failure wins: cooldown,
//! channel allow-list, permissions (the bot's, then the invoking
//! user's), tags, and finally argument resolution. Later gates are never
//! evaluated once one fails.

use twilight_model::guild::Permissions;

use super::errors::CommandError;
use super::{Command, TriggerData};
use crate::corvid::Corvid;

/// Permission names the subject lacks, sorted for stable rendering.
/// `ADMINISTRATOR` short-circuits to "nothing missing".
fn missing_permissions(required: Permissions, actual: Permissions) -> Vec<String> {
    if actual.contains(Permissions::ADMINISTRATOR) {
        return vec![];
    }

    let mut names = required
        .difference(actual)
        .iter_names()
        .map(|(name, _)| name.to_owned())
        .collect::<Vec<_>>();
    names.sort_unstable();
    names
}

/// Runs every gate except argument resolution. Returns the first
/// classified failure, or `Ok` when the command may proceed to argument
/// resolution and execution.
pub async fn check_command(corvid: &Corvid, command: &Command, data: &TriggerData) -> Result<(), CommandError> {
    // 1. cooldown
    if let Some(info) = corvid.cooldowns().get_cooldown(data.subject_id(), &command.name) {
        return Err(CommandError::cooldown(info));
    }

    // 2. channel allow-list
    if !command.channels.is_empty() && !command.channels.contains(&data.channel_id) {
        return Err(CommandError::wrong_channel());
    }

    // 3. permissions; nothing to check outside a guild
    if let Some(guild_id) = data.guild_id {
        if !command.client_permissions.is_empty() {
            let actual = corvid
                .platform()
                .member_permissions(guild_id, corvid.platform().current_user_id())
                .await
                .map_err(|e| CommandError::other(format!("failed to resolve bot permissions: {e}")))?;

            let missing = missing_permissions(command.client_permissions, actual);
            if !missing.is_empty() {
                return Err(CommandError::client_missing_permissions(missing));
            }
        }

        if !command.user_permissions.is_empty() {
            let actual = corvid
                .platform()
                .member_permissions(guild_id, data.author.id)
                .await
                .map_err(|e| CommandError::other(format!("failed to resolve user permissions: {e}")))?;

            let missing = missing_permissions(command.user_permissions, actual);
            if !missing.is_empty() {
                return Err(CommandError::user_missing_permissions(missing));
            }
        }
    }

    // 4. tags. Administrator permission does not bypass these; tags and
    // permissions are independent gates.
    let mut unmet = vec![];
    for tag in &command.tags {
        match tag.is_unmet(corvid, data).await {
            Ok(true) => unmet.push(*tag),
            Ok(false) => {},
            Err(e) => return Err(CommandError::other(format!("failed to evaluate tag {tag}: {e}"))),
        }
    }
    if !unmet.is_empty() {
        return Err(CommandError::missing_tags(unmet));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::command::errors::{CommandErrorData, CommandErrorKind};
    use crate::command::tags::CommandTag;
    use crate::command::CommandBuilder;
    use crate::test_util::{
        mock_corvid, mock_corvid_with, mock_platform, trigger_dm, trigger_message, GUILD_ID, USER_ID,
    };

    fn command(builder: CommandBuilder) -> Command {
        builder.run(|_| async { Ok(()) }).build().unwrap()
    }

    #[tokio::test]
    async fn all_gates_pass_for_a_plain_command() {
        let corvid = mock_corvid();
        let cmd = command(CommandBuilder::new("ping"));
        assert!(check_command(&corvid, &cmd, &trigger_message()).await.is_ok());
    }

    #[tokio::test]
    async fn cooldown_gate_runs_first() {
        // failing cooldown and failing permissions: the cooldown error
        // must win because its gate runs first
        let corvid = mock_corvid();
        corvid
            .cooldowns()
            .set_cooldown(USER_ID, "ping", Duration::from_secs(10));

        let cmd = command(CommandBuilder::new("ping").user_permissions(Permissions::BAN_MEMBERS));
        let error = check_command(&corvid, &cmd, &trigger_message()).await.unwrap_err();
        assert_eq!(error.kind, CommandErrorKind::Cooldown);

        match error.data {
            CommandErrorData::Cooldown(info) => assert!(info.wait_more > Duration::ZERO),
            other => panic!("expected cooldown data, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn wrong_channel_gate() {
        let corvid = mock_corvid();
        let cmd = command(CommandBuilder::new("ping").channel(twilight_model::id::Id::new(999)));
        let error = check_command(&corvid, &cmd, &trigger_message()).await.unwrap_err();
        assert_eq!(error.kind, CommandErrorKind::WrongChannel);
    }

    #[tokio::test]
    async fn client_permissions_checked_before_user_permissions() {
        let corvid = mock_corvid();
        let cmd = command(
            CommandBuilder::new("ban")
                .client_permissions(Permissions::BAN_MEMBERS)
                .user_permissions(Permissions::BAN_MEMBERS),
        );
        let error = check_command(&corvid, &cmd, &trigger_message()).await.unwrap_err();
        assert_eq!(error.kind, CommandErrorKind::ClientMissingPermissions);
    }

    #[tokio::test]
    async fn permission_gate_precedes_tag_gate() {
        // the context fails both a permission check and a tag check; the
        // permission error must be the one returned
        let corvid = mock_corvid();
        let cmd = command(
            CommandBuilder::new("ban")
                .user_permissions(Permissions::BAN_MEMBERS)
                .tag(CommandTag::DmOnly),
        );
        let error = check_command(&corvid, &cmd, &trigger_message()).await.unwrap_err();
        assert_eq!(error.kind, CommandErrorKind::UserMissingPermissions);
    }

    #[tokio::test]
    async fn missing_permission_names_are_sorted() {
        let corvid = mock_corvid();
        let cmd = command(
            CommandBuilder::new("mod").user_permissions(Permissions::KICK_MEMBERS | Permissions::BAN_MEMBERS),
        );
        let error = check_command(&corvid, &cmd, &trigger_message()).await.unwrap_err();
        match error.data {
            CommandErrorData::Permissions(names) => {
                assert_eq!(names, vec!["BAN_MEMBERS".to_owned(), "KICK_MEMBERS".to_owned()]);
            },
            other => panic!("expected permission data, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn administrator_short_circuits_permissions() {
        let mut platform = mock_platform();
        platform
            .permissions
            .insert((GUILD_ID, USER_ID), Permissions::ADMINISTRATOR);
        let corvid = mock_corvid_with(platform);

        let cmd = command(CommandBuilder::new("ban").user_permissions(Permissions::BAN_MEMBERS));
        assert!(check_command(&corvid, &cmd, &trigger_message()).await.is_ok());
    }

    #[tokio::test]
    async fn administrator_does_not_bypass_tags() {
        let mut platform = mock_platform();
        platform
            .permissions
            .insert((GUILD_ID, USER_ID), Permissions::ADMINISTRATOR);
        let corvid = mock_corvid_with(platform);

        let cmd = command(
            CommandBuilder::new("secret")
                .user_permissions(Permissions::BAN_MEMBERS)
                .tag(CommandTag::OwnerOnly),
        );
        let error = check_command(&corvid, &cmd, &trigger_message()).await.unwrap_err();
        assert_eq!(error.kind, CommandErrorKind::MissingTags);
    }

    #[tokio::test]
    async fn guild_only_tag_fails_in_dms() {
        let corvid = mock_corvid();
        let cmd = command(CommandBuilder::new("serverinfo").tag(CommandTag::GuildOnly));

        let error = check_command(&corvid, &cmd, &trigger_dm()).await.unwrap_err();
        assert_eq!(error.kind, CommandErrorKind::MissingTags);
        match error.data {
            CommandErrorData::Tags(tags) => assert_eq!(tags, vec![CommandTag::GuildOnly]),
            other => panic!("expected tag data, got {other:?}"),
        }

        assert!(check_command(&corvid, &cmd, &trigger_message()).await.is_ok());
    }

    #[tokio::test]
    async fn nsfw_tag_follows_channel_flag() {
        let corvid = mock_corvid();
        let cmd = command(CommandBuilder::new("lewd").tag(CommandTag::Nsfw));

        let error = check_command(&corvid, &cmd, &trigger_message()).await.unwrap_err();
        assert_eq!(error.kind, CommandErrorKind::MissingTags);

        // DMs are exempt from the age-restriction flag
        assert!(check_command(&corvid, &cmd, &trigger_dm()).await.is_ok());
    }

    #[tokio::test]
    async fn owner_only_tag_consults_config() {
        let mut corvid = mock_corvid();
        let cmd = command(CommandBuilder::new("eval").tag(CommandTag::OwnerOnly));
        let error = check_command(&corvid, &cmd, &trigger_message()).await.unwrap_err();
        assert_eq!(error.kind, CommandErrorKind::MissingTags);

        let mut config = corvid.config().clone();
        config.owners.push(USER_ID);
        corvid = Arc::new(crate::corvid::Corvid::new(config, crate::test_util::mock_platform_arc()));
        assert!(check_command(&corvid, &cmd, &trigger_message()).await.is_ok());
    }

    #[tokio::test]
    async fn guild_owner_only_tag() {
        let corvid = mock_corvid();
        let cmd = command(CommandBuilder::new("settings").tag(CommandTag::GuildOwnerOnly));

        // the mock guild is owned by someone else
        let error = check_command(&corvid, &cmd, &trigger_message()).await.unwrap_err();
        assert_eq!(error.kind, CommandErrorKind::MissingTags);

        // and there is no guild owner at all in a DM
        let error = check_command(&corvid, &cmd, &trigger_dm()).await.unwrap_err();
        assert_eq!(error.kind, CommandErrorKind::MissingTags);
    }
}
