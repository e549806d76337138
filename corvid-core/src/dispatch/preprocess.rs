use tracing::debug;
use twilight_model::channel::Message;

use super::error::PreParseError;
use crate::corvid::Corvid;

pub struct PreprocessResult {
    pub prefix: String,
}

/// Returns `Some(prefix)` if the prefix is the mention of the bot, otherwise `None`
pub fn message_mention_prefix(content: &str, bot_id: u64) -> Option<String> {
    let mention_no_nickname = format!("<@{bot_id}>");
    let mention_nickname = format!("<@!{bot_id}>");

    if content.starts_with(&mention_no_nickname) {
        Some(mention_no_nickname)
    } else if content.starts_with(&mention_nickname) {
        Some(mention_nickname)
    } else {
        None
    }
}

/// Initial message processing. Checks the validity of the message before
/// any kind of parsing.
///
/// This includes:
/// - Checking that the message is not sent by a bot or a webhook,
/// - Checking that the message starts with the correct prefix for the
///   context, and returning any identified prefix.
///
/// Prefix precedence:
/// 1. prefix override (disabling other prefixes)
/// 2. mention prefix
/// 3. no prefix/configured prefix (depending on DM or guild context)
pub fn preprocess(corvid: &Corvid, message: &Message) -> Result<PreprocessResult, PreParseError> {
    if message.author.bot && !corvid.config().dev.process_bot_messages {
        return Err(PreParseError::UserIsBotOrWebhook(Some(message.author.id.get())));
    }
    if message.webhook_id.is_some() {
        return Err(PreParseError::UserIsBotOrWebhook(Some(message.author.id.get())));
    }

    let is_in_dm = message.guild_id.is_none();
    let bot_id = corvid.platform().current_user_id().get();

    let parsed_prefix = if let Some(ref r#override) = corvid.config().dev.prefix_override {
        r#override.clone()
    } else if let Some(mention_prefix) = message_mention_prefix(&message.content, bot_id) {
        mention_prefix
    } else if is_in_dm {
        String::new()
    } else {
        corvid.config().prefix.default.clone()
    };

    if !message.content.starts_with(&parsed_prefix) {
        return Err(PreParseError::MessageNotPrefixed(parsed_prefix));
    }

    debug!("parser: parsed prefix: {:?}", parsed_prefix);

    Ok(PreprocessResult { prefix: parsed_prefix })
}
