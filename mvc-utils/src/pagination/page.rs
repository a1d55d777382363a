//! Page sources and the decoration applied to plain-string pages.

use twilight_model::channel::message::embed::Embed;
use twilight_util::builder::embed::EmbedBuilder;

/// Default color of embeds produced from plain-string pages.
pub const DEFAULT_PAGE_COLOR: u32 = 0x00_00_00;

/// One element of a paginator's page list.
#[derive(Clone, Debug)]
pub enum Page {
    /// Ready-made embed, shown as-is.
    Embed(Embed),
    /// Plain text wrapped with the paginator's default decoration.
    Text(String),
}

impl From<Embed> for Page {
    fn from(embed: Embed) -> Self {
        Self::Embed(embed)
    }
}

impl From<String> for Page {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Page {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

/// Title, color and prefix/suffix used to turn [`Page::Text`] into an embed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageDecoration {
    pub title: String,
    pub color: u32,
    pub prefix: String,
    pub suffix: String,
}

impl Default for PageDecoration {
    fn default() -> Self {
        Self {
            title: String::new(),
            color: DEFAULT_PAGE_COLOR,
            prefix: String::new(),
            suffix: String::new(),
        }
    }
}

impl PageDecoration {
    /// Turn a page into the embed that will be displayed.
    pub fn render(&self, page: Page) -> anyhow::Result<Embed> {
        let text = match page {
            Page::Embed(embed) => return Ok(embed),
            Page::Text(text) => text,
        };

        let mut builder = EmbedBuilder::new()
            .color(self.color)
            .description(format!("{}{}{}", self.prefix, text, self.suffix));
        if !self.title.is_empty() {
            builder = builder.title(self.title.as_str());
        }

        Ok(builder.validate()?.build())
    }
}
