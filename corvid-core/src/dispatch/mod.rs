//! Entry points that drive a raw message or interaction through the
//! whole pipeline: preprocess, registry lookup, validation gates,
//! argument resolution, the command body, subcommand dispatch and
//! cooldown recording.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use tracing::{debug, error};
use twilight_model::application::interaction::application_command::{CommandDataOption, CommandOptionValue};
use twilight_model::application::interaction::{Interaction, InteractionData};
use twilight_model::channel::Message;

use self::error::{ErrorSeverity, GetErrorSeverity};
use crate::command::checks::check_command;
use crate::command::errors::{CommandErrorKind, ExecutionError};
use crate::command::resolver::{resolve_options, resolve_text, ResolutionContext};
use crate::command::source::Source;
use crate::command::tokenizer::TokenCursor;
use crate::command::{Command, CommandContext, TriggerData};
use crate::corvid::ThreadSafeCorvid;

pub mod error;
pub mod parser;
pub mod preprocess;

/// Handle a message received from the gateway.
///
/// The message is passed to the command parser; if it maps to a
/// registered command, the full validation-and-execution sequence runs.
/// Classified refusals are reported back to the invoking user; command
/// body failures are logged and reported generically.
pub async fn handle_message(corvid: &ThreadSafeCorvid, message: &Message) -> anyhow::Result<()> {
    let parsed = match parser::parse_message_into_command(corvid, message) {
        Ok(Some(parsed)) => parsed,
        Ok(None) => return Ok(()),
        Err(err) => {
            match err.get_severity() {
                ErrorSeverity::Low => debug!("{err}"),
                ErrorSeverity::High => error!("{err}"),
            }
            return Ok(());
        },
    };

    let data = Arc::new(TriggerData {
        source: Source::Message,
        channel_id: message.channel_id,
        guild_id: message.guild_id,
        author: message.author.clone(),
        message: Some(Box::new(message.clone())),
        interaction_id: None,
        interaction_token: None,
        calling_prefix: parsed.calling_prefix,
    });

    let outcome = execute_text_command(corvid, parsed.command.clone(), data.clone(), parsed.args).await;
    report_outcome(corvid, &parsed.command, &data, outcome).await;
    Ok(())
}

/// Handle an application command interaction.
///
/// Interactions carry pre-parsed options and bypass the tokenizer, but
/// pass through the same validation gates as text commands.
pub async fn handle_interaction(corvid: &ThreadSafeCorvid, interaction: &Interaction) -> anyhow::Result<()> {
    let Some(InteractionData::ApplicationCommand(command_data)) = &interaction.data else {
        return Ok(());
    };
    let Some(author) = interaction.author().cloned() else {
        return Ok(());
    };
    let Some(channel) = interaction.channel.as_ref() else {
        return Ok(());
    };
    let Some(command) = corvid.find_command(&command_data.name) else {
        return Ok(());
    };

    let data = Arc::new(TriggerData {
        source: Source::Interaction,
        channel_id: channel.id,
        guild_id: interaction.guild_id,
        author,
        message: None,
        interaction_id: Some(interaction.id),
        interaction_token: Some(interaction.token.clone()),
        calling_prefix: "/".to_owned(),
    });

    let outcome = execute_interaction_command(corvid, command.clone(), data.clone(), &command_data.options).await;
    report_outcome(corvid, &command, &data, outcome).await;
    Ok(())
}

async fn report_outcome(
    corvid: &ThreadSafeCorvid,
    command: &Command,
    data: &Arc<TriggerData>,
    outcome: Result<(), ExecutionError>,
) {
    match outcome {
        Ok(()) => {},
        Err(ExecutionError::Check(check)) => {
            debug!("refusing command '{}': {check}", command.name);
            let report = match check.kind {
                CommandErrorKind::ArgumentNotFound | CommandErrorKind::InvalidArgument => format!(
                    ":warning: `{check}`\nUsage: `{}{} {}`",
                    data.calling_prefix, command.name, command.usage
                ),
                _ => format!(":warning: `{check}`"),
            };
            let _ = corvid.platform().reply(data, report.into()).await;
        },
        Err(ExecutionError::Command(err)) => {
            error!("command '{}' failed: {err:?}", command.name);
            let _ = corvid
                .platform()
                .reply(data, format!(":warning: `command execution failed: {err}`").into())
                .await;
        },
    }
}

/// Runs the full pipeline for a text invocation: gates, argument
/// resolution, the body, subcommand dispatch against the unconsumed
/// remainder, then cooldown recording.
pub fn execute_text_command(
    corvid: &ThreadSafeCorvid,
    command: Arc<Command>,
    data: Arc<TriggerData>,
    raw_args: String,
) -> BoxFuture<'static, Result<(), ExecutionError>> {
    let corvid = corvid.clone();
    Box::pin(async move {
        check_command(&corvid, &command, &data).await?;

        let resolution = {
            let rctxt = ResolutionContext {
                corvid: &corvid,
                data: &data,
            };
            resolve_text(&command.arguments, &raw_args, &rctxt).await
        };
        if let Some(err) = resolution.arguments.first_error(&command.arguments) {
            return Err(ExecutionError::Check(err.clone()));
        }

        let ctxt = CommandContext::new(corvid.clone(), data.clone(), raw_args);
        ctxt.memoize_args(resolution.arguments);
        (command.run)(ctxt).await.map_err(ExecutionError::Command)?;

        // subcommand dispatch: the next unconsumed word may address a
        // subcommand, which then runs the entire pipeline itself
        let mut cursor = TokenCursor::new(&resolution.remainder);
        if let Some(word) = cursor.parse_next() {
            if let Some(subcommand) = command.find_subcommand(word) {
                let rest = cursor.consume_remaining().to_owned();
                execute_text_command(&corvid, subcommand, data.clone(), rest).await?;
            }
        }

        if !command.cooldown.is_zero() {
            corvid
                .cooldowns()
                .set_cooldown(data.subject_id(), &command.name, command.cooldown);
        }

        Ok(())
    })
}

/// Runs the full pipeline for an application command invocation. A
/// subcommand arrives as a single structured option; the addressed
/// subcommand runs the entire pipeline itself.
pub fn execute_interaction_command<'a>(
    corvid: &ThreadSafeCorvid,
    command: Arc<Command>,
    data: Arc<TriggerData>,
    options: &'a [CommandDataOption],
) -> BoxFuture<'a, Result<(), ExecutionError>> {
    let corvid = corvid.clone();
    Box::pin(async move {
        if let Some(first) = options.first() {
            match &first.value {
                CommandOptionValue::SubCommand(inner) | CommandOptionValue::SubCommandGroup(inner) => {
                    if let Some(subcommand) = command.find_subcommand(&first.name) {
                        return execute_interaction_command(&corvid, subcommand, data, inner).await;
                    }
                },
                _ => {},
            }
        }

        check_command(&corvid, &command, &data).await?;

        let resolved = {
            let rctxt = ResolutionContext {
                corvid: &corvid,
                data: &data,
            };
            resolve_options(&command.arguments, options, &rctxt).await
        };
        if let Some(err) = resolved.first_error(&command.arguments) {
            return Err(ExecutionError::Check(err.clone()));
        }

        let ctxt = CommandContext::new(corvid.clone(), data.clone(), String::new());
        ctxt.memoize_args(resolved);
        (command.run)(ctxt).await.map_err(ExecutionError::Command)?;

        if !command.cooldown.is_zero() {
            corvid
                .cooldowns()
                .set_cooldown(data.subject_id(), &command.name, command.cooldown);
        }

        Ok(())
    })
}
