use std::sync::Arc;

use anyhow::Context as _;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use twilight_gateway::{EventTypeFlags, Intents, Shard, ShardId, StreamExt as _};
use twilight_http::Client;
use twilight_model::gateway::event::Event;

use rustls::crypto::ring::default_provider;

use mvc_commands::{handle_interaction, handle_message, register_commands};
use mvc_core::{
    Context,
    config::{AppConfig, DiscordConfig},
};
use mvc_database::Database;
use mvc_web::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load the .env file
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    let config = AppConfig::from_env()?;
    if config.discord.is_none() && config.web.is_none() {
        warn!("neither DISCORD_TOKEN nor WEB_HOST is set, nothing to run");
        return Ok(());
    }

    let db = Database::connect(&config.database_url, config.database_max_connections)
        .await
        .context("failed to connect to PostgreSQL")?;
    info!("PostgreSQL connection established.");
    db.migrate().await.context("failed to run migrations")?;

    let bot = async {
        match &config.discord {
            Some(discord) => run_bot(discord, db.clone()).await,
            None => Ok(()),
        }
    };
    let web = async {
        match &config.web {
            Some(web) => mvc_web::serve(&web.address(), AppState::new(db.clone())).await,
            None => Ok(()),
        }
    };

    tokio::try_join!(bot, web)?;
    Ok(()) // Return Success, shutdown cleanly
}

async fn run_bot(config: &DiscordConfig, db: Database) -> anyhow::Result<()> {
    // Create a single shared HTTP Client
    let http = Arc::new(Client::new(config.token.clone()));
    let ctx = Context::new(Arc::clone(&http), db, &config.prefix);

    // Declare which intents the bot has
    let intents = Intents::GUILDS
        | Intents::GUILD_MESSAGES
        | Intents::DIRECT_MESSAGES
        | Intents::MESSAGE_CONTENT;

    // A shard is one Gateway WebSocket connection to Discord
    let mut shard = Shard::new(ShardId::new(0, 1), config.token.clone(), intents);

    info!("Bot is connecting...");

    while let Some(item) = shard.next_event(EventTypeFlags::all()).await {
        let event = match item {
            Ok(event) => event,
            Err(source) => {
                error!(?source, "gateway event stream error");
                continue;
            }
        };

        if let Some(latency) = shard.latency().average() {
            ctx.latency.record(latency);
        }

        match event {
            Event::Ready(ready) => {
                info!(user = %ready.user.name, "Logged in");
                match register_commands(&http, ready.application.id).await {
                    Ok(()) => info!("slash commands registered"),
                    Err(source) => error!(?source, "failed to register slash commands"),
                }
            }
            Event::MessageCreate(msg) => {
                let ctx = ctx.clone();
                tokio::spawn(async move {
                    if let Err(source) = handle_message(ctx, msg).await {
                        error!(?source, "message handler failed");
                    }
                });
            }
            Event::InteractionCreate(interaction) => {
                let ctx = ctx.clone();
                tokio::spawn(async move {
                    if let Err(source) = handle_interaction(ctx, interaction).await {
                        error!(?source, "interaction handler failed");
                    }
                });
            }
            _ => {} // Ignore unused events
        }
    }

    Ok(())
}
