//! Environment configuration.

use std::env;

use anyhow::Context as _;

/// Prefix for message commands when `DISCORD_PREFIX` is unset.
pub const DEFAULT_PREFIX: &str = "!";
/// Port for the web server when `WEB_PORT` is unset.
pub const DEFAULT_WEB_PORT: u16 = 8000;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiscordConfig {
    pub token: String,
    pub prefix: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
}

impl WebConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Process configuration. The bot and the web server are each enabled by their own
/// variables and may run side by side.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub discord: Option<DiscordConfig>,
    pub web: Option<WebConfig>,
    pub database_url: String,
    pub database_max_connections: u32,
}

impl AppConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read the configuration through `lookup`. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let discord = var("DISCORD_TOKEN").map(|token| DiscordConfig {
            token,
            prefix: var("DISCORD_PREFIX").unwrap_or_else(|| DEFAULT_PREFIX.to_owned()),
        });

        let web = match var("WEB_HOST") {
            Some(host) => {
                let port = match var("WEB_PORT") {
                    Some(raw) => raw
                        .trim()
                        .parse::<u16>()
                        .with_context(|| format!("WEB_PORT must be a port number, got {raw:?}"))?,
                    None => DEFAULT_WEB_PORT,
                };
                Some(WebConfig { host, port })
            }
            None => None,
        };

        let database_url = var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let database_max_connections = match var("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw.trim().parse::<u32>().with_context(|| {
                format!("DATABASE_MAX_CONNECTIONS must be a positive integer, got {raw:?}")
            })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };
        anyhow::ensure!(
            database_max_connections > 0,
            "DATABASE_MAX_CONNECTIONS must be at least 1"
        );

        Ok(Self {
            discord,
            web,
            database_url,
            database_max_connections,
        })
    }
}
