use anyhow::Context as _;
use twilight_model::{
    application::{
        command::{Command, CommandType},
        interaction::Interaction,
    },
    channel::message::embed::Embed,
    gateway::payload::incoming::MessageCreate,
};
use twilight_util::builder::command::CommandBuilder;

use crate::{COMMANDS, CommandMeta};
use mvc_core::Context;
use mvc_utils::embed::{EmbedField, EmbedFooter, EmbedSpec, create_embed};
use mvc_utils::pagination::{InteractionHandle, Paginator};

pub const META: CommandMeta = CommandMeta {
    name: "help",
    desc: "Lists out all available commands.",
    category: "utility",
    usage: "help",
    slash_only: false,
};

pub fn command() -> Command {
    CommandBuilder::new(META.name, META.desc, CommandType::ChatInput).build()
}

/// Send the command catalog as plain text.
pub async fn run(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    let http = &ctx.http;
    http.create_message(msg.channel_id)
        .content(&catalog_text(&ctx.prefix))
        .await?;

    Ok(())
}

/// Show the catalog as a paginator, one command per page.
///
/// The pages are built before the interaction is acknowledged, so a failure never leaves
/// the deferred response unanswered.
pub async fn run_slash(ctx: Context, interaction: &Interaction) -> anyhow::Result<()> {
    let owner = interaction
        .author_id()
        .context("help invoked without a user")?;
    let paginator = catalog_paginator(&ctx.prefix)?;

    let handle = InteractionHandle::new(ctx.http.clone(), interaction);
    handle.defer(false).await?;

    ctx.paginators
        .start(paginator, owner.get(), handle, false, true)
        .await?;

    Ok(())
}

fn sorted_commands() -> Vec<&'static CommandMeta> {
    let mut commands: Vec<_> = COMMANDS.iter().collect();
    commands.sort_by_key(|command| (command.category, command.name));
    commands
}

fn catalog_text(prefix: &str) -> String {
    let mut out = String::from("**Commands**\n");
    for command in sorted_commands() {
        out.push_str(&format!(
            "`{}` - {}\n",
            command.invocation(prefix),
            command.desc
        ));
    }
    out
}

fn catalog_paginator(prefix: &str) -> anyhow::Result<Paginator> {
    Paginator::builder(catalog_pages(prefix)?).build()
}

fn catalog_pages(prefix: &str) -> anyhow::Result<Vec<Embed>> {
    let commands = sorted_commands();
    let total = commands.len();

    commands
        .into_iter()
        .enumerate()
        .map(|(index, command)| {
            let (embed, _) = create_embed(EmbedSpec {
                title: Some(format!("Help: {}", command.name)),
                description: Some(command.desc.to_owned()),
                fields: vec![
                    EmbedField::new("Usage", format!("`{}`", command.invocation(prefix))),
                    EmbedField::new("Category", command.category),
                ],
                footer: Some(EmbedFooter::from(
                    format!("Command {} of {total}", index + 1).as_str(),
                )),
                ..EmbedSpec::default()
            })?;
            Ok(embed)
        })
        .collect()
}
