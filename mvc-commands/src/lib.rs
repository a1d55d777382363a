pub mod controllers;
pub mod utility;

use tracing::debug;
use twilight_http::Client;
use twilight_model::{
    application::{command::Command, interaction::InteractionData},
    gateway::payload::incoming::{InteractionCreate, MessageCreate},
    id::{Id, marker::ApplicationMarker},
};

use mvc_core::Context;
use mvc_utils::pagination::handle_component_interaction;

// Global command meta data
pub struct CommandMeta {
    pub name: &'static str,
    pub desc: &'static str,
    pub category: &'static str,
    /// Invocation without prefix or slash.
    pub usage: &'static str,
    pub slash_only: bool,
}

impl CommandMeta {
    /// How a user types the command, given the message-command prefix.
    pub fn invocation(&self, prefix: &str) -> String {
        if self.slash_only {
            format!("/{}", self.usage)
        } else {
            format!("{prefix}{}", self.usage)
        }
    }
}

pub const COMMANDS: &[CommandMeta] = &[
    utility::ping::META,
    utility::greet::META,
    utility::help::META,
    utility::pages::META,
    // Add new commands here
];

/// Slash commands registered with Discord on startup.
pub fn slash_commands() -> Vec<Command> {
    vec![
        utility::ping::command(),
        utility::greet::command(),
        utility::help::command(),
        utility::pages::command(),
    ]
}

/// Replace the application's global slash commands with [`slash_commands`].
pub async fn register_commands(
    http: &Client,
    application_id: Id<ApplicationMarker>,
) -> anyhow::Result<()> {
    http.interaction(application_id)
        .set_global_commands(&slash_commands())
        .await?;

    Ok(())
}

/// Split a message into a lowercase command name and its trimmed argument tail.
fn parse_command<'a>(content: &'a str, prefix: &str) -> Option<(String, Option<&'a str>)> {
    let content = content.trim().strip_prefix(prefix)?.trim();

    let mut command_and_rest = content.splitn(2, char::is_whitespace);
    let command = command_and_rest.next()?.to_ascii_lowercase();
    if command.is_empty() {
        return None;
    }

    let rest = command_and_rest
        .next()
        .map(str::trim)
        .filter(|value| !value.is_empty());

    Some((command, rest))
}

pub async fn handle_message(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    if msg.author.bot {
        return Ok(());
    }

    let Some((cmd, _)) = parse_command(&msg.content, &ctx.prefix) else {
        return Ok(());
    };

    match cmd.as_str() {
        "ping" => utility::ping::run(ctx.clone(), msg).await?,
        "hello" => utility::greet::run(ctx.clone(), msg).await?,
        "help" => utility::help::run(ctx.clone(), msg).await?,
        // Add new commands here
        _ => {}
    }

    Ok(())
}

pub async fn handle_interaction(
    ctx: Context,
    interaction: Box<InteractionCreate>,
) -> anyhow::Result<()> {
    match interaction.data.as_ref() {
        Some(InteractionData::ApplicationCommand(data)) => match data.name.as_str() {
            "ping" => utility::ping::run_slash(ctx.clone(), &interaction).await?,
            "hello" => utility::greet::run_slash(ctx.clone(), &interaction).await?,
            "help" => utility::help::run_slash(ctx.clone(), &interaction).await?,
            "pages" => utility::pages::run_slash(ctx.clone(), &interaction, data).await?,
            other => debug!(command = other, "unknown slash command"),
        },
        Some(InteractionData::MessageComponent(_)) => {
            let handled =
                handle_component_interaction(&ctx.paginators, ctx.http.clone(), &interaction)
                    .await?;
            if !handled {
                debug!(interaction_id = %interaction.id, "unrouted component interaction");
            }
        }
        _ => {}
    }

    Ok(())
}
