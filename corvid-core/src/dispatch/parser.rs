use std::sync::Arc;

use twilight_model::channel::Message;

use super::error::PreParseError;
use super::preprocess::preprocess;
use crate::command::tokenizer::TokenCursor;
use crate::command::Command;
use crate::corvid::Corvid;

pub struct ParseResult {
    pub command: Arc<Command>,
    pub args: String,
    pub calling_prefix: String,
}

/// Parse any generic Message object into a command invocation.
///
/// This function takes all steps necessary to split a message into
/// critical command components, and if at any point the parse fails,
/// returns with no action: first the preprocessor validates the author
/// and identifies the prefix, then the first word after the prefix is
/// looked up in the registry (by name or alias). Everything after that
/// word is the raw argument text.
///
/// Metadata is checked *during* execution, not here; an unknown command
/// name is `Ok(None)`, never an error.
pub fn parse_message_into_command(corvid: &Corvid, message: &Message) -> Result<Option<ParseResult>, PreParseError> {
    let preprocess = preprocess(corvid, message)?;

    let command_text = message.content[preprocess.prefix.len()..].trim_start();

    let mut cursor = TokenCursor::new(command_text);
    let Some(name) = cursor.parse_next() else {
        return Ok(None);
    };
    let Some(command) = corvid.find_command(name) else {
        return Ok(None);
    };
    let args = cursor.consume_remaining().to_owned();

    Ok(Some(ParseResult {
        command,
        args,
        calling_prefix: preprocess.prefix,
    }))
}
