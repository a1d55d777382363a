//! Interaction surface the paginator renders through, and its twilight implementation.

use std::sync::Arc;

use async_trait::async_trait;
use twilight_http::Client;
use twilight_model::{
    application::interaction::Interaction,
    channel::message::{MessageFlags, component::Component, embed::Embed},
    http::interaction::{InteractionResponse, InteractionResponseType},
    id::{
        Id,
        marker::{ApplicationMarker, InteractionMarker},
    },
};
use twilight_util::builder::InteractionResponseDataBuilder;

/// Generic message shown when a pagination session no longer exists.
pub const PAGINATION_EXPIRED_MESSAGE: &str =
    "This pagination session expired. Run the command again.";

/// Something that can display paginated content for one interaction.
///
/// Errors are the surface's own (usually HTTP) failures and are passed through to
/// whoever triggered the render.
#[async_trait]
pub trait InteractionSurface: Send + Sync {
    /// Answer the interaction with a new message.
    async fn send_message(
        &self,
        embed: &Embed,
        components: &[Component],
        ephemeral: bool,
    ) -> anyhow::Result<()>;

    /// Replace the content of the interaction's already-sent response.
    async fn edit_original(&self, embed: &Embed, components: &[Component]) -> anyhow::Result<()>;

    /// Answer a component interaction by replacing the message it was attached to.
    async fn update_message(&self, embed: &Embed, components: &[Component])
    -> anyhow::Result<()>;

    /// Answer with a notice only the triggering user can see.
    async fn send_ephemeral(&self, content: &str) -> anyhow::Result<()>;
}

/// Owned handle to a twilight interaction and the HTTP client that answers it.
#[derive(Clone)]
pub struct InteractionHandle {
    http: Arc<Client>,
    application_id: Id<ApplicationMarker>,
    interaction_id: Id<InteractionMarker>,
    token: String,
}

impl InteractionHandle {
    pub fn new(http: Arc<Client>, interaction: &Interaction) -> Self {
        Self {
            http,
            application_id: interaction.application_id,
            interaction_id: interaction.id,
            token: interaction.token.clone(),
        }
    }

    pub fn interaction_id(&self) -> Id<InteractionMarker> {
        self.interaction_id
    }

    /// Acknowledge the interaction now and send the real response later with
    /// [`InteractionSurface::edit_original`].
    pub async fn defer(&self, ephemeral: bool) -> anyhow::Result<()> {
        let data = ephemeral.then(|| {
            InteractionResponseDataBuilder::new()
                .flags(MessageFlags::EPHEMERAL)
                .build()
        });

        let response = InteractionResponse {
            kind: InteractionResponseType::DeferredChannelMessageWithSource,
            data,
        };

        self.create_response(&response).await
    }

    /// Answer with plain text content.
    pub async fn send_content(&self, content: &str) -> anyhow::Result<()> {
        let response = InteractionResponse {
            kind: InteractionResponseType::ChannelMessageWithSource,
            data: Some(InteractionResponseDataBuilder::new().content(content).build()),
        };

        self.create_response(&response).await
    }

    async fn create_response(&self, response: &InteractionResponse) -> anyhow::Result<()> {
        self.http
            .interaction(self.application_id)
            .create_response(self.interaction_id, &self.token, response)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl InteractionSurface for InteractionHandle {
    async fn send_message(
        &self,
        embed: &Embed,
        components: &[Component],
        ephemeral: bool,
    ) -> anyhow::Result<()> {
        let mut data = InteractionResponseDataBuilder::new()
            .embeds([embed.clone()])
            .components(components.to_vec());
        if ephemeral {
            data = data.flags(MessageFlags::EPHEMERAL);
        }

        let response = InteractionResponse {
            kind: InteractionResponseType::ChannelMessageWithSource,
            data: Some(data.build()),
        };

        self.create_response(&response).await
    }

    async fn edit_original(&self, embed: &Embed, components: &[Component]) -> anyhow::Result<()> {
        self.http
            .interaction(self.application_id)
            .update_response(&self.token)
            .embeds(Some(std::slice::from_ref(embed)))
            .components(Some(components))
            .await?;

        Ok(())
    }

    async fn update_message(
        &self,
        embed: &Embed,
        components: &[Component],
    ) -> anyhow::Result<()> {
        let response = InteractionResponse {
            kind: InteractionResponseType::UpdateMessage,
            data: Some(
                InteractionResponseDataBuilder::new()
                    .embeds([embed.clone()])
                    .components(components.to_vec())
                    .build(),
            ),
        };

        self.create_response(&response).await
    }

    async fn send_ephemeral(&self, content: &str) -> anyhow::Result<()> {
        let response = InteractionResponse {
            kind: InteractionResponseType::ChannelMessageWithSource,
            data: Some(
                InteractionResponseDataBuilder::new()
                    .content(content)
                    .flags(MessageFlags::EPHEMERAL)
                    .build(),
            ),
        };

        self.create_response(&response).await
    }
}
