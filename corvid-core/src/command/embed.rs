use twilight_model::channel::message::embed::{EmbedAuthor, EmbedField, EmbedFooter, EmbedImage, EmbedThumbnail};
use twilight_model::channel::message::Embed;

/// An embed author, resolved to one of its two forms at construction
/// time rather than re-inspected when the embed is built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EmbedAuthorSource {
    /// Just a display name.
    Text(String),
    /// Full author block.
    Structured {
        name: String,
        icon_url: Option<String>,
        url: Option<String>,
    },
}

impl From<&str> for EmbedAuthorSource {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl EmbedAuthorSource {
    fn build(self) -> EmbedAuthor {
        match self {
            Self::Text(name) => EmbedAuthor {
                icon_url: None,
                name,
                proxy_icon_url: None,
                url: None,
            },
            Self::Structured { name, icon_url, url } => EmbedAuthor {
                icon_url,
                name,
                proxy_icon_url: None,
                url,
            },
        }
    }
}

/// Convenience builder producing a twilight [Embed].
#[derive(Clone, Debug, Default)]
pub struct EmbedBuilder {
    title: Option<String>,
    description: Option<String>,
    color: Option<u32>,
    author: Option<EmbedAuthorSource>,
    fields: Vec<EmbedField>,
    footer: Option<String>,
    image_url: Option<String>,
    thumbnail_url: Option<String>,
}

impl EmbedBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_owned());
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_owned());
        self
    }

    pub fn color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    pub fn author(mut self, author: impl Into<EmbedAuthorSource>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn field(mut self, name: &str, value: &str, inline: bool) -> Self {
        self.fields.push(EmbedField {
            inline,
            name: name.to_owned(),
            value: value.to_owned(),
        });
        self
    }

    pub fn footer(mut self, footer: &str) -> Self {
        self.footer = Some(footer.to_owned());
        self
    }

    pub fn image(mut self, url: &str) -> Self {
        self.image_url = Some(url.to_owned());
        self
    }

    pub fn thumbnail(mut self, url: &str) -> Self {
        self.thumbnail_url = Some(url.to_owned());
        self
    }

    pub fn build(self) -> Embed {
        Embed {
            author: self.author.map(EmbedAuthorSource::build),
            color: self.color,
            description: self.description,
            fields: self.fields,
            footer: self.footer.map(|text| EmbedFooter {
                icon_url: None,
                proxy_icon_url: None,
                text,
            }),
            image: self.image_url.map(|url| EmbedImage {
                height: None,
                proxy_url: None,
                url,
                width: None,
            }),
            kind: "rich".to_owned(),
            provider: None,
            thumbnail: self.thumbnail_url.map(|url| EmbedThumbnail {
                height: None,
                proxy_url: None,
                url,
                width: None,
            }),
            timestamp: None,
            title: self.title,
            url: None,
            video: None,
        }
    }
}
