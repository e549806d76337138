use std::fmt::{self, Display};
use std::sync::Arc;

use corvid_common::util::discord::{
    channel_mention_to_id, parse_message_link, parse_snowflake, role_mention_to_id, user_mention_to_id,
};
use corvid_common::util::regex::CUSTOM_EMOJI;
use twilight_model::channel::{Channel, ChannelType, Message};
use twilight_model::guild::{Member, Role};
use twilight_model::id::Id;
use twilight_model::user::User;

use super::resolver::ResolutionContext;
use super::Command;
use crate::events::EventListener;

/// The closed set of argument type tags.
///
/// Each tag carries a validator (a pure predicate over the raw token) and
/// a parser (which may perform entity lookups through the platform
/// capability). Both are uniformly asynchronous and always awaited, even
/// for tags whose implementations never suspend.
#[derive(Clone, Debug)]
pub enum ArgumentKind {
    Boolean,
    Integer,
    Float,
    String,
    Snowflake,
    Channel,
    TextChannel,
    User,
    Member,
    Role,
    Emoji,
    MessageRef,
    /// The token must match this pattern; the parsed value is the match.
    Regex(regex::Regex),
    /// One of a fixed set of variants, matched case-insensitively; parses
    /// to the canonical variant spelling.
    Enumeration(Vec<String>),
    /// A (label, value) selection; parses to the value of the matched
    /// label.
    Choice(Vec<(String, String)>),
    /// A reference to a registered command, by name or alias.
    CommandRef,
    /// A reference to a registered event listener, by name.
    EventRef,
}

/// A custom guild emoji token, `<a:name:id>` or `<:name:id>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomEmoji {
    pub name: String,
    pub id: u64,
    pub animated: bool,
}

/// A successfully parsed argument value.
#[derive(Clone, Debug)]
pub enum ResolvedValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Snowflake(u64),
    Channel(Box<Channel>),
    User(Box<User>),
    Member(Box<Member>),
    Role(Box<Role>),
    Emoji(CustomEmoji),
    Message(Box<Message>),
    Command(Arc<Command>),
    Event(Arc<EventListener>),
}

impl ResolvedValue {
    pub fn as_boolean(&self) -> Option<bool> {
        if let Self::Boolean(v) = self { Some(*v) } else { None }
    }

    pub fn as_integer(&self) -> Option<i64> {
        if let Self::Integer(v) = self { Some(*v) } else { None }
    }

    pub fn as_float(&self) -> Option<f64> {
        if let Self::Float(v) = self { Some(*v) } else { None }
    }

    pub fn as_text(&self) -> Option<&str> {
        if let Self::Text(v) = self { Some(v) } else { None }
    }

    pub fn as_snowflake(&self) -> Option<u64> {
        if let Self::Snowflake(v) = self { Some(*v) } else { None }
    }

    pub fn as_channel(&self) -> Option<&Channel> {
        if let Self::Channel(v) = self { Some(v) } else { None }
    }

    pub fn as_user(&self) -> Option<&User> {
        if let Self::User(v) = self { Some(v) } else { None }
    }

    pub fn as_member(&self) -> Option<&Member> {
        if let Self::Member(v) = self { Some(v) } else { None }
    }

    pub fn as_role(&self) -> Option<&Role> {
        if let Self::Role(v) = self { Some(v) } else { None }
    }

    pub fn as_emoji(&self) -> Option<&CustomEmoji> {
        if let Self::Emoji(v) = self { Some(v) } else { None }
    }

    pub fn as_message(&self) -> Option<&Message> {
        if let Self::Message(v) = self { Some(v) } else { None }
    }

    pub fn as_command(&self) -> Option<&Arc<Command>> {
        if let Self::Command(v) = self { Some(v) } else { None }
    }

    pub fn as_event(&self) -> Option<&Arc<EventListener>> {
        if let Self::Event(v) = self { Some(v) } else { None }
    }
}

fn parse_boolean(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

fn is_text_channel(kind: ChannelType) -> bool {
    matches!(kind, ChannelType::GuildText | ChannelType::GuildAnnouncement)
}

impl ArgumentKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::Snowflake => "snowflake",
            Self::Channel => "channel",
            Self::TextChannel => "text channel",
            Self::User => "user",
            Self::Member => "member",
            Self::Role => "role",
            Self::Emoji => "emoji",
            Self::MessageRef => "message",
            Self::Regex(_) => "pattern",
            Self::Enumeration(_) => "enumeration",
            Self::Choice(_) => "choice",
            Self::CommandRef => "command",
            Self::EventRef => "event",
        }
    }

    /// Pure predicate over the raw token. Entity-reference tags only
    /// check the token's shape here and defer to the parser's lookup for
    /// the final verdict.
    pub async fn validate(&self, raw: &str, _ctxt: &ResolutionContext<'_>) -> bool {
        match self {
            Self::Boolean => parse_boolean(raw).is_some(),
            Self::Integer => raw.parse::<i64>().is_ok(),
            Self::Float => raw.parse::<f64>().is_ok(),
            Self::String => !raw.is_empty(),
            Self::Snowflake => parse_snowflake(raw).is_some(),
            Self::Channel | Self::TextChannel => {
                channel_mention_to_id(raw).or_else(|| parse_snowflake(raw)).is_some()
            },
            Self::User | Self::Member => user_mention_to_id(raw).or_else(|| parse_snowflake(raw)).is_some(),
            Self::Role => role_mention_to_id(raw).or_else(|| parse_snowflake(raw)).is_some(),
            Self::Emoji => CUSTOM_EMOJI.is_match(raw),
            Self::MessageRef => parse_message_link(raw).is_some() || parse_snowflake(raw).is_some(),
            Self::Regex(pattern) => pattern.is_match(raw),
            Self::Enumeration(variants) => variants.iter().any(|v| v.eq_ignore_ascii_case(raw)),
            Self::Choice(choices) => choices.iter().any(|(label, _)| label.eq_ignore_ascii_case(raw)),
            Self::CommandRef | Self::EventRef => !raw.is_empty(),
        }
    }

    /// Parses the raw token into a value, performing entity lookups where
    /// needed. Returns `None` on any failure; lookup errors never escape
    /// the resolver as raw errors.
    pub async fn parse(&self, raw: &str, ctxt: &ResolutionContext<'_>) -> Option<ResolvedValue> {
        match self {
            Self::Boolean => parse_boolean(raw).map(ResolvedValue::Boolean),
            Self::Integer => raw.parse().ok().map(ResolvedValue::Integer),
            Self::Float => raw.parse().ok().map(ResolvedValue::Float),
            Self::String => {
                if raw.is_empty() {
                    None
                } else {
                    Some(ResolvedValue::Text(raw.to_owned()))
                }
            },
            Self::Snowflake => parse_snowflake(raw).map(ResolvedValue::Snowflake),
            Self::Channel | Self::TextChannel => {
                let id = channel_mention_to_id(raw).or_else(|| parse_snowflake(raw))?;
                let channel = ctxt.corvid.platform().channel(Id::new_checked(id)?).await.ok()?;
                if let Self::TextChannel = self {
                    if !is_text_channel(channel.kind) {
                        return None;
                    }
                }
                Some(ResolvedValue::Channel(Box::new(channel)))
            },
            Self::User => {
                let id = user_mention_to_id(raw).or_else(|| parse_snowflake(raw))?;
                let user = ctxt.corvid.platform().user(Id::new_checked(id)?).await.ok()?;
                Some(ResolvedValue::User(Box::new(user)))
            },
            Self::Member => {
                let guild_id = ctxt.data.guild_id?;
                let id = user_mention_to_id(raw).or_else(|| parse_snowflake(raw))?;
                let member = ctxt
                    .corvid
                    .platform()
                    .member(guild_id, Id::new_checked(id)?)
                    .await
                    .ok()?;
                Some(ResolvedValue::Member(Box::new(member)))
            },
            Self::Role => {
                let guild_id = ctxt.data.guild_id?;
                let id = role_mention_to_id(raw).or_else(|| parse_snowflake(raw))?;
                let role = ctxt.corvid.platform().role(guild_id, Id::new_checked(id)?).await.ok()?;
                Some(ResolvedValue::Role(Box::new(role)))
            },
            Self::Emoji => {
                let captures = CUSTOM_EMOJI.captures(raw)?;
                Some(ResolvedValue::Emoji(CustomEmoji {
                    animated: !captures[1].is_empty(),
                    name: captures[2].to_owned(),
                    id: captures[3].parse().ok()?,
                }))
            },
            Self::MessageRef => {
                let (channel_id, message_id) = match parse_message_link(raw) {
                    Some((_, channel, message)) => (Id::new_checked(channel)?, Id::new_checked(message)?),
                    None => (ctxt.data.channel_id, Id::new_checked(parse_snowflake(raw)?)?),
                };
                let message = ctxt.corvid.platform().message(channel_id, message_id).await.ok()?;
                Some(ResolvedValue::Message(Box::new(message)))
            },
            Self::Regex(pattern) => pattern
                .find(raw)
                .map(|m| ResolvedValue::Text(m.as_str().to_owned())),
            Self::Enumeration(variants) => variants
                .iter()
                .find(|v| v.eq_ignore_ascii_case(raw))
                .map(|v| ResolvedValue::Text(v.clone())),
            Self::Choice(choices) => choices
                .iter()
                .find(|(label, _)| label.eq_ignore_ascii_case(raw))
                .map(|(_, value)| ResolvedValue::Text(value.clone())),
            Self::CommandRef => ctxt.corvid.find_command(raw).map(ResolvedValue::Command),
            Self::EventRef => ctxt.corvid.find_event(raw).map(ResolvedValue::Event),
        }
    }
}

/// How an argument behaves when its token is missing or fails to parse.
/// Derived from the modifiers; every descriptor has exactly one shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ArgumentShape {
    Simple,
    Coalescing,
    Defaulted,
    Optional,
}

/// Declarative description of one argument: a type tag plus modifiers.
/// Built once when its command is declared, immutable afterward, and
/// owned exclusively by that command.
#[derive(Clone, Debug)]
pub struct ArgumentDescriptor {
    kind: ArgumentKind,
    optional: bool,
    default: Option<ResolvedValue>,
    coalescing: bool,
    description: String,
}

impl ArgumentDescriptor {
    fn new(kind: ArgumentKind) -> Self {
        Self {
            kind,
            optional: false,
            default: None,
            coalescing: false,
            description: String::new(),
        }
    }

    pub fn boolean() -> Self {
        Self::new(ArgumentKind::Boolean)
    }

    pub fn integer() -> Self {
        Self::new(ArgumentKind::Integer)
    }

    pub fn float() -> Self {
        Self::new(ArgumentKind::Float)
    }

    pub fn string() -> Self {
        Self::new(ArgumentKind::String)
    }

    pub fn snowflake() -> Self {
        Self::new(ArgumentKind::Snowflake)
    }

    pub fn channel() -> Self {
        Self::new(ArgumentKind::Channel)
    }

    pub fn text_channel() -> Self {
        Self::new(ArgumentKind::TextChannel)
    }

    pub fn user() -> Self {
        Self::new(ArgumentKind::User)
    }

    pub fn member() -> Self {
        Self::new(ArgumentKind::Member)
    }

    pub fn role() -> Self {
        Self::new(ArgumentKind::Role)
    }

    pub fn emoji() -> Self {
        Self::new(ArgumentKind::Emoji)
    }

    pub fn message() -> Self {
        Self::new(ArgumentKind::MessageRef)
    }

    pub fn regex(pattern: regex::Regex) -> Self {
        Self::new(ArgumentKind::Regex(pattern))
    }

    pub fn enumeration<S: Into<String>>(variants: impl IntoIterator<Item = S>) -> Self {
        Self::new(ArgumentKind::Enumeration(
            variants.into_iter().map(Into::into).collect(),
        ))
    }

    pub fn choice<L: Into<String>, V: Into<String>>(choices: impl IntoIterator<Item = (L, V)>) -> Self {
        Self::new(ArgumentKind::Choice(
            choices.into_iter().map(|(l, v)| (l.into(), v.into())).collect(),
        ))
    }

    pub fn command() -> Self {
        Self::new(ArgumentKind::CommandRef)
    }

    pub fn event() -> Self {
        Self::new(ArgumentKind::EventRef)
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn default_value(mut self, value: ResolvedValue) -> Self {
        self.default = Some(value);
        self
    }

    /// The argument consumes all remaining tokens as one value. Only
    /// meaningful as the last declared argument.
    pub fn coalescing(mut self) -> Self {
        self.coalescing = true;
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    pub fn kind(&self) -> &ArgumentKind {
        &self.kind
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn default(&self) -> Option<&ResolvedValue> {
        self.default.as_ref()
    }

    pub fn is_coalescing(&self) -> bool {
        self.coalescing
    }

    pub fn describe(&self) -> &str {
        &self.description
    }

    /// Required, non-defaulted, non-coalescing.
    pub fn is_simple(&self) -> bool {
        !self.optional && !self.coalescing && self.default.is_none()
    }

    /// May be left out of the input without producing an error.
    pub fn is_skippable(&self) -> bool {
        self.optional || self.default.is_some()
    }

    pub(crate) fn shape(&self) -> ArgumentShape {
        if self.coalescing {
            ArgumentShape::Coalescing
        } else if self.default.is_some() {
            ArgumentShape::Defaulted
        } else if self.optional {
            ArgumentShape::Optional
        } else {
            ArgumentShape::Simple
        }
    }

    /// Usage fragment for help text: `<name>`, `[name]`, `<...name>`.
    pub fn usage(&self, name: &str) -> String {
        let inner = if self.coalescing {
            format!("...{name}")
        } else {
            name.to_owned()
        };
        if self.is_skippable() {
            format!("[{inner}]")
        } else {
            format!("<{inner}>")
        }
    }
}

/// An argument descriptor bound to its declared name and position within
/// a command's argument list.
#[derive(Clone, Debug)]
pub struct CommandArgument {
    pub name: String,
    pub index: usize,
    pub descriptor: ArgumentDescriptor,
}

impl Display for CommandArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.descriptor.usage(&self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shapes() {
        assert_eq!(ArgumentDescriptor::string().shape(), ArgumentShape::Simple);
        assert_eq!(ArgumentDescriptor::string().optional().shape(), ArgumentShape::Optional);
        assert_eq!(
            ArgumentDescriptor::string()
                .default_value(ResolvedValue::Text("x".to_owned()))
                .shape(),
            ArgumentShape::Defaulted
        );
        assert_eq!(
            ArgumentDescriptor::string().coalescing().shape(),
            ArgumentShape::Coalescing
        );
        // coalescing wins over the fallback modifiers
        assert_eq!(
            ArgumentDescriptor::string()
                .coalescing()
                .default_value(ResolvedValue::Text("x".to_owned()))
                .shape(),
            ArgumentShape::Coalescing
        );
    }

    #[test]
    fn simple_and_skippable() {
        let simple = ArgumentDescriptor::integer();
        assert!(simple.is_simple());
        assert!(!simple.is_skippable());

        let optional = ArgumentDescriptor::integer().optional();
        assert!(!optional.is_simple());
        assert!(optional.is_skippable());

        let defaulted = ArgumentDescriptor::integer().default_value(ResolvedValue::Integer(1));
        assert!(!defaulted.is_simple());
        assert!(defaulted.is_skippable());
    }

    #[test]
    fn usage_fragments() {
        assert_eq!(ArgumentDescriptor::string().usage("text"), "<text>");
        assert_eq!(ArgumentDescriptor::string().optional().usage("text"), "[text]");
        assert_eq!(ArgumentDescriptor::string().coalescing().usage("text"), "<...text>");
        assert_eq!(
            ArgumentDescriptor::string().coalescing().optional().usage("text"),
            "[...text]"
        );
    }

    #[test]
    fn boolean_spellings() {
        assert_eq!(parse_boolean("true"), Some(true));
        assert_eq!(parse_boolean("YES"), Some(true));
        assert_eq!(parse_boolean("off"), Some(false));
        assert_eq!(parse_boolean("0"), Some(false));
        assert_eq!(parse_boolean("maybe"), None);
    }
}
