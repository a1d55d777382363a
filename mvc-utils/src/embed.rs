use twilight_model::channel::message::{
    component::{ActionRow, Button, Component, SelectMenu},
    embed::Embed,
};
use twilight_util::builder::embed::{
    EmbedBuilder, EmbedFieldBuilder, EmbedFooterBuilder, ImageSource,
};

/// Default embed color used across the bot UI.
pub const DEFAULT_EMBED_COLOR: u32 = 0x34_98_db;

/// Discord allows at most five buttons per action row.
const BUTTONS_PER_ROW: usize = 5;

/// One embed field. Fields are inline unless stated otherwise.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline: true,
        }
    }

    pub fn block(mut self) -> Self {
        self.inline = false;
        self
    }
}

impl<N: Into<String>, V: Into<String>> From<(N, V)> for EmbedField {
    fn from((name, value): (N, V)) -> Self {
        Self::new(name, value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmbedFooter {
    pub text: String,
    pub icon_url: Option<String>,
}

impl From<&str> for EmbedFooter {
    fn from(text: &str) -> Self {
        Self {
            text: text.to_owned(),
            icon_url: None,
        }
    }
}

/// Everything [`create_embed`] can put on a message.
#[derive(Clone, Debug)]
pub struct EmbedSpec {
    pub title: Option<String>,
    pub description: Option<String>,
    pub color: u32,
    pub fields: Vec<EmbedField>,
    pub footer: Option<EmbedFooter>,
    pub buttons: Vec<Button>,
    pub selects: Vec<SelectMenu>,
}

impl Default for EmbedSpec {
    fn default() -> Self {
        Self {
            title: None,
            description: None,
            color: DEFAULT_EMBED_COLOR,
            fields: Vec::new(),
            footer: None,
            buttons: Vec::new(),
            selects: Vec::new(),
        }
    }
}

/// Build an embed and the component rows that go with it.
///
/// Buttons are packed five to a row; every select menu gets a row of its own.
pub fn create_embed(spec: EmbedSpec) -> anyhow::Result<(Embed, Vec<Component>)> {
    let mut builder = EmbedBuilder::new().color(spec.color);

    if let Some(title) = spec.title {
        builder = builder.title(title);
    }
    if let Some(description) = spec.description {
        builder = builder.description(description);
    }

    for field in spec.fields {
        let mut field_builder = EmbedFieldBuilder::new(field.name, field.value);
        if field.inline {
            field_builder = field_builder.inline();
        }
        builder = builder.field(field_builder);
    }

    if let Some(footer) = spec.footer {
        let mut footer_builder = EmbedFooterBuilder::new(footer.text);
        if let Some(url) = footer.icon_url {
            footer_builder = footer_builder.icon_url(ImageSource::url(url)?);
        }
        builder = builder.footer(footer_builder);
    }

    let embed = builder.validate()?.build();

    let mut components: Vec<Component> = spec
        .buttons
        .chunks(BUTTONS_PER_ROW)
        .map(|row| action_row(row.iter().cloned().map(Component::Button).collect()))
        .collect();
    components.extend(
        spec.selects
            .into_iter()
            .map(|select| action_row(vec![Component::SelectMenu(select)])),
    );

    Ok((embed, components))
}

fn action_row(components: Vec<Component>) -> Component {
    Component::ActionRow(ActionRow {
        id: None,
        components,
    })
}
