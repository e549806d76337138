use crate::util::regex;

/// Extracts the user ID from a `<@id>` or `<@!id>` mention.
pub fn user_mention_to_id(word: &str) -> Option<u64> {
    regex::USER_MENTION
        .captures(word)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Extracts the channel ID from a `<#id>` mention.
pub fn channel_mention_to_id(word: &str) -> Option<u64> {
    regex::CHANNEL_MENTION
        .captures(word)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Extracts the role ID from a `<@&id>` mention.
pub fn role_mention_to_id(word: &str) -> Option<u64> {
    regex::ROLE_MENTION
        .captures(word)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Parses a bare snowflake ID.
pub fn parse_snowflake(word: &str) -> Option<u64> {
    if regex::SNOWFLAKE.is_match(word) {
        word.parse().ok()
    } else {
        None
    }
}

/// Accepts either a mention of any kind or a bare ID.
pub fn id_from_mention_or_raw(word: &str) -> Option<u64> {
    user_mention_to_id(word)
        .or_else(|| channel_mention_to_id(word))
        .or_else(|| role_mention_to_id(word))
        .or_else(|| parse_snowflake(word))
}

/// Parses a message link into (guild id, channel id, message id).
/// The guild component is `None` for DM links.
pub fn parse_message_link(word: &str) -> Option<(Option<u64>, u64, u64)> {
    let captures = regex::MESSAGE_LINK.captures(word)?;
    let guild = match &captures[1] {
        "@me" => None,
        id => Some(id.parse().ok()?),
    };
    let channel = captures[2].parse().ok()?;
    let message = captures[3].parse().ok()?;
    Some((guild, channel, message))
}
