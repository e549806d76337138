use twilight_model::channel::message::Embed;

/// A file attached to an outgoing reply.
#[derive(Clone, Debug)]
pub struct Attachment {
    pub name: String,
    pub data: Vec<u8>,
}

/// Everything a reply can carry. Pure data shaping; the platform
/// capability turns this into the actual send.
#[derive(Clone, Debug, Default)]
pub struct MessageBuilder {
    pub content: Option<String>,
    pub embed: Option<Embed>,
    pub attachment: Option<Attachment>,
}

impl From<&str> for MessageBuilder {
    fn from(value: &str) -> Self {
        Self {
            content: Some(value.into()),
            ..Default::default()
        }
    }
}

impl From<String> for MessageBuilder {
    fn from(value: String) -> Self {
        Self {
            content: Some(value),
            ..Default::default()
        }
    }
}

impl From<Embed> for MessageBuilder {
    fn from(value: Embed) -> Self {
        Self {
            embed: Some(value),
            ..Default::default()
        }
    }
}

impl From<Attachment> for MessageBuilder {
    fn from(value: Attachment) -> Self {
        Self {
            attachment: Some(value),
            ..Default::default()
        }
    }
}

impl From<(&str, Embed)> for MessageBuilder {
    fn from((text, embed): (&str, Embed)) -> Self {
        Self {
            content: Some(text.into()),
            embed: Some(embed),
            ..Default::default()
        }
    }
}
