use twilight_model::{
    application::{
        command::{Command, CommandType},
        interaction::Interaction,
    },
    gateway::payload::incoming::MessageCreate,
};
use twilight_util::builder::command::CommandBuilder;

use crate::CommandMeta;
use mvc_core::Context;
use mvc_utils::pagination::InteractionHandle;

pub const META: CommandMeta = CommandMeta {
    name: "ping",
    desc: "Check the bot's latency",
    category: "utility",
    usage: "ping",
    slash_only: false,
};

pub fn command() -> Command {
    CommandBuilder::new(META.name, META.desc, CommandType::ChatInput).build()
}

/// Reply with the last measured gateway latency.
pub async fn run(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    let http = &ctx.http;
    http.create_message(msg.channel_id)
        .content(&latency_message(ctx.latency.millis()))
        .await?;

    Ok(())
}

pub async fn run_slash(ctx: Context, interaction: &Interaction) -> anyhow::Result<()> {
    InteractionHandle::new(ctx.http.clone(), interaction)
        .send_content(&latency_message(ctx.latency.millis()))
        .await
}

fn latency_message(millis: Option<u64>) -> String {
    match millis {
        Some(millis) => format!("Pong! Latency: {millis}ms"),
        None => "Pong! Latency: not measured yet".to_owned(),
    }
}
