use anyhow::Context as _;
use twilight_model::{
    application::{
        command::{Command, CommandType},
        interaction::Interaction,
    },
    gateway::payload::incoming::MessageCreate,
};
use twilight_util::builder::command::CommandBuilder;

use crate::CommandMeta;
use crate::controllers::greet::greet_user;
use mvc_core::Context;
use mvc_utils::pagination::InteractionHandle;

pub const META: CommandMeta = CommandMeta {
    name: "hello",
    desc: "Greet the user",
    category: "utility",
    usage: "hello",
    slash_only: false,
};

pub fn command() -> Command {
    CommandBuilder::new(META.name, META.desc, CommandType::ChatInput).build()
}

/// Greet the message author.
pub async fn run(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    let http = &ctx.http;
    http.create_message(msg.channel_id)
        .content(&greet_user(&msg.author.name))
        .await?;

    Ok(())
}

/// Greet the user who invoked the slash command.
pub async fn run_slash(ctx: Context, interaction: &Interaction) -> anyhow::Result<()> {
    let user = interaction
        .author()
        .context("hello invoked without a user")?;

    InteractionHandle::new(ctx.http.clone(), interaction)
        .send_content(&greet_user(&user.name))
        .await
}
