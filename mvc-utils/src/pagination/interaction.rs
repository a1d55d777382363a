//! Routing of paginator control presses to their sessions.

use std::sync::Arc;

use tracing::debug;
use twilight_http::Client;
use twilight_model::application::interaction::{Interaction, InteractionData};

use super::paginator::NavigationOutcome;
use super::registry::PaginatorRegistry;
use super::surface::{InteractionHandle, InteractionSurface, PAGINATION_EXPIRED_MESSAGE};
use super::token::{NavToken, is_pagination_custom_id, parse_custom_id};

/// Route a component interaction to its paginator session.
///
/// Returns `false` when the interaction is not a paginator control, leaving it to other
/// handlers. Every paginator control press is answered, including ones for sessions that
/// are gone.
pub async fn handle_component_interaction(
    registry: &Arc<PaginatorRegistry<InteractionHandle>>,
    http: Arc<Client>,
    interaction: &Interaction,
) -> anyhow::Result<bool> {
    let Some(InteractionData::MessageComponent(data)) = interaction.data.as_ref() else {
        return Ok(false);
    };

    if !is_pagination_custom_id(&data.custom_id) {
        return Ok(false);
    }

    let event = InteractionHandle::new(http, interaction);

    let Some(actor_id) = interaction.author_id() else {
        event
            .send_ephemeral("Unable to determine interaction user.")
            .await?;
        return Ok(true);
    };

    let Some(token) = parse_custom_id(&data.custom_id) else {
        debug!(custom_id = %data.custom_id, "malformed paginator custom id");
        event.send_ephemeral(PAGINATION_EXPIRED_MESSAGE).await?;
        return Ok(true);
    };

    dispatch(registry, token, actor_id.get(), &event).await?;
    Ok(true)
}

/// Deliver one control press; unknown or finished sessions get the expired notice.
pub async fn dispatch<S: InteractionSurface + 'static>(
    registry: &Arc<PaginatorRegistry<S>>,
    token: NavToken,
    actor_id: u64,
    event: &dyn InteractionSurface,
) -> anyhow::Result<Option<NavigationOutcome>> {
    let outcome = registry
        .navigate(token.session_id, actor_id, token.control, event)
        .await?;

    if matches!(outcome, None | Some(NavigationOutcome::Ignored)) {
        event.send_ephemeral(PAGINATION_EXPIRED_MESSAGE).await?;
    }

    Ok(outcome)
}
