use anyhow::Context as _;
use twilight_model::application::{
    command::{Command, CommandType},
    interaction::{
        Interaction,
        application_command::{CommandData, CommandOptionValue},
    },
};
use twilight_util::builder::command::{BooleanBuilder, CommandBuilder, IntegerBuilder};

use crate::CommandMeta;
use mvc_core::Context;
use mvc_utils::embed::{DEFAULT_EMBED_COLOR, EmbedField, EmbedSpec, create_embed};
use mvc_utils::pagination::{InteractionHandle, Page, Paginator};

pub const META: CommandMeta = CommandMeta {
    name: "pages",
    desc: "Browse a demo paginator.",
    category: "utility",
    usage: "pages [count] [page] [ephemeral]",
    slash_only: true,
};

const DEFAULT_PAGE_COUNT: i64 = 24;
const MAX_PAGE_COUNT: i64 = 100;

pub fn command() -> Command {
    CommandBuilder::new(META.name, META.desc, CommandType::ChatInput)
        .option(
            IntegerBuilder::new("count", "How many pages to generate")
                .min_value(1)
                .max_value(MAX_PAGE_COUNT),
        )
        .option(IntegerBuilder::new("page", "Page to start on"))
        .option(BooleanBuilder::new("ephemeral", "Only show the paginator to you"))
        .build()
}

/// Open a paginator over generated pages.
///
/// Odd pages are ready-made embeds, even pages are plain text decorated by the paginator.
pub async fn run_slash(
    ctx: Context,
    interaction: &Interaction,
    data: &CommandData,
) -> anyhow::Result<()> {
    let owner = interaction
        .author_id()
        .context("pages invoked without a user")?;

    let count = integer_option(data, "count")
        .unwrap_or(DEFAULT_PAGE_COUNT)
        .clamp(1, MAX_PAGE_COUNT);
    let target_page = integer_option(data, "page").unwrap_or(1);
    let ephemeral = boolean_option(data, "ephemeral").unwrap_or(false);

    let paginator = Paginator::builder(demo_pages(count)?)
        .title("Page demo")
        .color(DEFAULT_EMBED_COLOR)
        .prefix("```\n")
        .suffix("\n```")
        .target_page(target_page)
        .build()?;

    let handle = InteractionHandle::new(ctx.http.clone(), interaction);
    ctx.paginators
        .start(paginator, owner.get(), handle, ephemeral, false)
        .await?;

    Ok(())
}

fn demo_pages(count: i64) -> anyhow::Result<Vec<Page>> {
    (1..=count)
        .map(|index| {
            if index % 2 == 1 {
                let (embed, _) = create_embed(EmbedSpec {
                    title: Some(format!("Embed page {index}")),
                    description: Some(format!("Entry {index} of {count}")),
                    fields: vec![EmbedField::new("Index", index.to_string())],
                    ..EmbedSpec::default()
                })?;
                Ok(Page::from(embed))
            } else {
                Ok(Page::from(format!("Text page {index} of {count}")))
            }
        })
        .collect()
}

fn integer_option(data: &CommandData, name: &str) -> Option<i64> {
    data.options
        .iter()
        .find(|option| option.name == name)
        .and_then(|option| match option.value {
            CommandOptionValue::Integer(value) => Some(value),
            _ => None,
        })
}

fn boolean_option(data: &CommandData, name: &str) -> Option<bool> {
    data.options
        .iter()
        .find(|option| option.name == name)
        .and_then(|option| match option.value {
            CommandOptionValue::Boolean(value) => Some(value),
            _ => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_pages_alternate_embed_and_text() {
        let pages = demo_pages(4).unwrap();
        assert_eq!(pages.len(), 4);
        assert!(matches!(pages[0], Page::Embed(_)));
        assert!(matches!(&pages[1], Page::Text(text) if text == "Text page 2 of 4"));
    }

    #[test]
    fn out_of_range_start_falls_back_to_first_page() {
        let paginator = Paginator::builder(demo_pages(DEFAULT_PAGE_COUNT).unwrap())
            .target_page(30)
            .build()
            .unwrap();
        assert_eq!(paginator.total_pages(), 24);
        assert_eq!(paginator.current_page(), 1);
    }

    #[test]
    fn command_declares_its_options() {
        let command = command();
        let names: Vec<_> = command
            .options
            .iter()
            .map(|option| option.name.as_str())
            .collect();
        assert_eq!(names, ["count", "page", "ephemeral"]);
    }
}
