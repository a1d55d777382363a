//! Recording surface for paginator tests.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use twilight_model::channel::message::{component::Component, embed::Embed};

use super::surface::InteractionSurface;

#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceCall {
    Send {
        embed: Embed,
        components: Vec<Component>,
        ephemeral: bool,
    },
    EditOriginal {
        embed: Embed,
        components: Vec<Component>,
    },
    Update {
        embed: Embed,
        components: Vec<Component>,
    },
    Ephemeral(String),
}

/// Clones share one call log.
#[derive(Clone, Default)]
pub struct RecordingSurface {
    calls: Arc<Mutex<Vec<SurfaceCall>>>,
    fail: bool,
    delay: Duration,
}

impl RecordingSurface {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Every call takes `delay` before it is recorded.
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.lock().unwrap().clone()
    }

    async fn record(&self, call: SurfaceCall) -> anyhow::Result<()> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        anyhow::ensure!(!self.fail, "surface unavailable");
        self.calls.lock().unwrap().push(call);
        Ok(())
    }
}

#[async_trait]
impl InteractionSurface for RecordingSurface {
    async fn send_message(
        &self,
        embed: &Embed,
        components: &[Component],
        ephemeral: bool,
    ) -> anyhow::Result<()> {
        self.record(SurfaceCall::Send {
            embed: embed.clone(),
            components: components.to_vec(),
            ephemeral,
        })
            .await
    }

    async fn edit_original(&self, embed: &Embed, components: &[Component]) -> anyhow::Result<()> {
        self.record(SurfaceCall::EditOriginal {
            embed: embed.clone(),
            components: components.to_vec(),
        })
            .await
    }

    async fn update_message(
        &self,
        embed: &Embed,
        components: &[Component],
    ) -> anyhow::Result<()> {
        self.record(SurfaceCall::Update {
            embed: embed.clone(),
            components: components.to_vec(),
        })
            .await
    }

    async fn send_ephemeral(&self, content: &str) -> anyhow::Result<()> {
        self.record(SurfaceCall::Ephemeral(content.to_owned())).await
    }
}
