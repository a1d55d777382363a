//! Paginated embed view: construction, session binding, navigation and timeout.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use twilight_model::channel::message::{
    component::{ButtonStyle, Component},
    embed::Embed,
};

use super::components::build_nav_components;
use super::cursor::{NavControl, PageCursor};
use super::page::{Page, PageDecoration};
use super::surface::InteractionSurface;
use super::DEFAULT_TIMEOUT;

/// Notice sent to users pressing controls of someone else's paginator.
pub const NOT_COMMAND_SENDER_MESSAGE: &str =
    "Hmm? Seems like you are not the sender of this command!";

/// Called when a navigation event comes from anyone but the session owner.
#[async_trait]
pub trait InvalidActorHandler: Send + Sync {
    /// `surface` answers the rejected event, not the session's own interaction.
    async fn handle(&self, surface: &dyn InteractionSurface) -> anyhow::Result<()>;
}

/// Default handler: an ephemeral "not the command sender" notice.
#[derive(Clone, Copy, Debug, Default)]
pub struct NotSenderNotice;

#[async_trait]
impl InvalidActorHandler for NotSenderNotice {
    async fn handle(&self, surface: &dyn InteractionSurface) -> anyhow::Result<()> {
        surface.send_ephemeral(NOT_COMMAND_SENDER_MESSAGE).await
    }
}

/// Configures a [`Paginator`].
pub struct PaginatorBuilder {
    pages: Vec<Page>,
    decoration: PageDecoration,
    target_page: i64,
    timeout: Duration,
    button_style: ButtonStyle,
    invalid_actor: Arc<dyn InvalidActorHandler>,
}

impl PaginatorBuilder {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.decoration.title = title.into();
        self
    }

    pub fn color(mut self, color: u32) -> Self {
        self.decoration.color = color;
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.decoration.prefix = prefix.into();
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.decoration.suffix = suffix.into();
        self
    }

    /// One-based starting page. Anything outside the page range starts at page 1.
    pub fn target_page(mut self, page: i64) -> Self {
        self.target_page = page;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Style of the four navigation buttons. The page indicator stays secondary.
    pub fn button_style(mut self, style: ButtonStyle) -> Self {
        self.button_style = style;
        self
    }

    pub fn invalid_actor_handler(mut self, handler: Arc<dyn InvalidActorHandler>) -> Self {
        self.invalid_actor = handler;
        self
    }

    /// Render every page and validate the configuration.
    pub fn build(self) -> anyhow::Result<Paginator> {
        anyhow::ensure!(!self.pages.is_empty(), "a paginator needs at least one page");

        let embeds = self
            .pages
            .into_iter()
            .map(|page| self.decoration.render(page))
            .collect::<anyhow::Result<Vec<_>>>()?;
        let cursor = PageCursor::new(embeds.len(), self.target_page);

        Ok(Paginator {
            embeds,
            cursor,
            timeout: self.timeout,
            button_style: self.button_style,
            invalid_actor: self.invalid_actor,
        })
    }
}

/// An ordered, fixed list of embeds plus the current position within it.
pub struct Paginator {
    embeds: Vec<Embed>,
    cursor: PageCursor,
    timeout: Duration,
    button_style: ButtonStyle,
    invalid_actor: Arc<dyn InvalidActorHandler>,
}

impl Paginator {
    pub fn builder<I, P>(pages: I) -> PaginatorBuilder
    where
        I: IntoIterator<Item = P>,
        P: Into<Page>,
    {
        PaginatorBuilder {
            pages: pages.into_iter().map(Into::into).collect(),
            decoration: PageDecoration::default(),
            target_page: 1,
            timeout: DEFAULT_TIMEOUT,
            button_style: ButtonStyle::Secondary,
            invalid_actor: Arc::new(NotSenderNotice),
        }
    }

    /// One-based page currently displayed.
    pub fn current_page(&self) -> usize {
        self.cursor.current()
    }

    pub fn total_pages(&self) -> usize {
        self.cursor.total()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether any navigation is possible at all.
    pub fn is_navigable(&self) -> bool {
        self.total_pages() > 1
    }

    /// Bind a session to `interaction` without rendering anything yet.
    ///
    /// Only `owner_id` may navigate the resulting session.
    pub fn bind<S: InteractionSurface>(
        self,
        session_id: u64,
        owner_id: u64,
        interaction: S,
    ) -> PaginatorSession<S> {
        PaginatorSession {
            id: session_id,
            owner_id,
            paginator: self,
            interaction,
            state: SessionState::Active,
        }
    }

    /// Show the current page through `interaction` and bind a session to it.
    ///
    /// Sends a new response, or edits the deferred placeholder when `deferred` is set.
    pub async fn start<S: InteractionSurface>(
        self,
        session_id: u64,
        owner_id: u64,
        interaction: S,
        ephemeral: bool,
        deferred: bool,
    ) -> anyhow::Result<PaginatorSession<S>> {
        let session = self.bind(session_id, owner_id, interaction);
        session.show(ephemeral, deferred).await?;
        Ok(session)
    }
}

/// Lifecycle of a navigation session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Active,
    /// Terminal: controls are disabled and events are ignored.
    TimedOut,
}

/// What a navigation event did to a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The owner navigated; the new page was rendered.
    Moved { page: usize },
    /// Someone else pressed a control; the invalid-actor handler ran.
    Rejected,
    /// Nothing happened (timed out, display-only control, or single page).
    Ignored,
}

/// A paginator bound to the interaction that started it.
pub struct PaginatorSession<S> {
    id: u64,
    owner_id: u64,
    paginator: Paginator,
    interaction: S,
    state: SessionState,
}

impl<S: InteractionSurface> PaginatorSession<S> {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn owner_id(&self) -> u64 {
        self.owner_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn current_page(&self) -> usize {
        self.paginator.current_page()
    }

    pub fn total_pages(&self) -> usize {
        self.paginator.total_pages()
    }

    pub fn timeout(&self) -> Duration {
        self.paginator.timeout()
    }

    pub fn current_embed(&self) -> &Embed {
        &self.paginator.embeds[self.paginator.cursor.current() - 1]
    }

    /// Control row reflecting the current page and session state.
    pub fn components(&self) -> Vec<Component> {
        build_nav_components(
            self.id,
            &self.paginator.cursor,
            self.paginator.button_style,
            self.state == SessionState::TimedOut,
        )
    }

    /// Initial render through the bound interaction.
    pub async fn show(&self, ephemeral: bool, deferred: bool) -> anyhow::Result<()> {
        let embed = self.current_embed();
        let components = self.components();
        if deferred {
            self.interaction.edit_original(embed, &components).await
        } else {
            self.interaction
                .send_message(embed, &components, ephemeral)
                .await
        }
    }

    /// Handle one control press by `actor_id`, answering through `event`.
    pub async fn navigate(
        &mut self,
        actor_id: u64,
        control: NavControl,
        event: &dyn InteractionSurface,
    ) -> anyhow::Result<NavigationOutcome> {
        if self.state == SessionState::TimedOut
            || control == NavControl::Indicator
            || !self.paginator.is_navigable()
        {
            return Ok(NavigationOutcome::Ignored);
        }

        if actor_id != self.owner_id {
            self.paginator.invalid_actor.handle(event).await?;
            return Ok(NavigationOutcome::Rejected);
        }

        let page = self.paginator.cursor.apply(control);
        let components = self.components();
        event
            .update_message(self.current_embed(), &components)
            .await?;

        Ok(NavigationOutcome::Moved { page })
    }

    /// Disable every control and push a final render to the bound interaction.
    ///
    /// Only the first call has any effect.
    pub async fn time_out(&mut self) -> anyhow::Result<()> {
        if self.state == SessionState::TimedOut {
            return Ok(());
        }

        self.state = SessionState::TimedOut;
        let components = self.components();
        self.interaction
            .edit_original(self.current_embed(), &components)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::components::buttons;
    use crate::pagination::testing::{RecordingSurface, SurfaceCall};

    const OWNER: u64 = 100;
    const STRANGER: u64 = 200;

    fn text_pages(count: usize) -> Vec<String> {
        (1..=count).map(|index| format!("page {index}")).collect()
    }

    async fn started(count: usize, target: i64) -> PaginatorSession<RecordingSurface> {
        Paginator::builder(text_pages(count))
            .target_page(target)
            .build()
            .unwrap()
            .start(1, OWNER, RecordingSurface::default(), false, false)
            .await
            .unwrap()
    }

    #[test]
    fn empty_page_list_is_rejected() {
        assert!(Paginator::builder(Vec::<String>::new()).build().is_err());
    }

    #[test]
    fn builder_defaults_follow_the_documented_values() {
        let paginator = Paginator::builder(["a", "b"]).build().unwrap();
        assert_eq!(paginator.current_page(), 1);
        assert_eq!(paginator.timeout(), Duration::from_secs(300));
        assert_eq!(paginator.button_style, ButtonStyle::Secondary);
    }

    #[test]
    fn out_of_range_target_starts_on_first_page() {
        for target in [0, -3, 6] {
            let paginator = Paginator::builder(text_pages(5))
                .target_page(target)
                .build()
                .unwrap();
            assert_eq!(paginator.current_page(), 1);
        }
    }

    #[tokio::test]
    async fn start_sends_current_page_with_controls() {
        let session = started(4, 3).await;
        let calls = session.interaction.calls();

        assert_eq!(calls.len(), 1);
        let SurfaceCall::Send {
            embed,
            components,
            ephemeral,
        } = &calls[0]
        else {
            panic!("expected a new message, got {calls:?}");
        };
        assert!(!ephemeral);
        assert_eq!(embed.description.as_deref(), Some("page 3"));
        assert_eq!(buttons(components)[2].label.as_deref(), Some("3/4"));
    }

    #[tokio::test]
    async fn deferred_start_edits_the_placeholder() {
        let session = Paginator::builder(text_pages(2))
            .build()
            .unwrap()
            .start(1, OWNER, RecordingSurface::default(), true, true)
            .await
            .unwrap();

        assert!(matches!(
            session.interaction.calls().as_slice(),
            [SurfaceCall::EditOriginal { .. }]
        ));
    }

    #[tokio::test]
    async fn ephemeral_start_is_forwarded() {
        let session = Paginator::builder(text_pages(2))
            .build()
            .unwrap()
            .start(1, OWNER, RecordingSurface::default(), true, false)
            .await
            .unwrap();

        assert!(matches!(
            session.interaction.calls().as_slice(),
            [SurfaceCall::Send { ephemeral: true, .. }]
        ));
    }

    #[tokio::test]
    async fn owner_navigation_rerenders_through_the_event() {
        let mut session = started(5, 3).await;
        let event = RecordingSurface::default();

        let outcome = session
            .navigate(OWNER, NavControl::Next, &event)
            .await
            .unwrap();

        assert_eq!(outcome, NavigationOutcome::Moved { page: 4 });
        let calls = event.calls();
        let [SurfaceCall::Update { embed, components }] = calls.as_slice() else {
            panic!("expected one in-place update, got {calls:?}");
        };
        assert_eq!(embed.description.as_deref(), Some("page 4"));
        assert_eq!(buttons(components)[2].label.as_deref(), Some("4/5"));
    }

    #[tokio::test]
    async fn small_and_large_lists_follow_their_policies() {
        let mut session = started(5, 3).await;
        let event = RecordingSurface::default();
        session.navigate(OWNER, NavControl::First, &event).await.unwrap();
        assert_eq!(session.current_page(), 1);
        session.navigate(OWNER, NavControl::Last, &event).await.unwrap();
        assert_eq!(session.current_page(), 5);

        let mut session = started(20, 3).await;
        session.navigate(OWNER, NavControl::First, &event).await.unwrap();
        assert_eq!(session.current_page(), 13);

        let mut session = started(20, 18).await;
        session.navigate(OWNER, NavControl::Last, &event).await.unwrap();
        assert_eq!(session.current_page(), 8);
    }

    #[tokio::test]
    async fn foreign_actors_never_move_the_page() {
        for control in NavControl::ALL {
            let mut session = started(20, 7).await;
            let event = RecordingSurface::default();

            let outcome = session.navigate(STRANGER, control, &event).await.unwrap();

            assert_eq!(session.current_page(), 7);
            if control == NavControl::Indicator {
                assert_eq!(outcome, NavigationOutcome::Ignored);
                assert!(event.calls().is_empty());
            } else {
                assert_eq!(outcome, NavigationOutcome::Rejected);
                assert_eq!(
                    event.calls(),
                    vec![SurfaceCall::Ephemeral(NOT_COMMAND_SENDER_MESSAGE.to_owned())]
                );
            }
        }
    }

    #[tokio::test]
    async fn custom_invalid_actor_handler_is_used() {
        struct Silent;

        #[async_trait]
        impl InvalidActorHandler for Silent {
            async fn handle(&self, _surface: &dyn InteractionSurface) -> anyhow::Result<()> {
                Ok(())
            }
        }

        let mut session = Paginator::builder(text_pages(3))
            .invalid_actor_handler(Arc::new(Silent))
            .build()
            .unwrap()
            .start(1, OWNER, RecordingSurface::default(), false, false)
            .await
            .unwrap();
        let event = RecordingSurface::default();

        let outcome = session
            .navigate(STRANGER, NavControl::Next, &event)
            .await
            .unwrap();

        assert_eq!(outcome, NavigationOutcome::Rejected);
        assert!(event.calls().is_empty());
    }

    #[tokio::test]
    async fn single_page_sessions_have_no_live_controls() {
        let mut session = started(1, 1).await;
        assert!(buttons(&session.components()).iter().all(|b| b.disabled));

        let event = RecordingSurface::default();
        for control in NavControl::ALL {
            let outcome = session.navigate(OWNER, control, &event).await.unwrap();
            assert_eq!(outcome, NavigationOutcome::Ignored);
        }
        assert!(event.calls().is_empty());
    }

    #[tokio::test]
    async fn timeout_disables_controls_and_freezes_state() {
        let mut session = started(6, 2).await;
        session.time_out().await.unwrap();

        assert_eq!(session.state(), SessionState::TimedOut);
        let calls = session.interaction.calls();
        let Some(SurfaceCall::EditOriginal { components, .. }) = calls.last() else {
            panic!("expected a final edit, got {calls:?}");
        };
        assert!(buttons(components).iter().all(|b| b.disabled));

        let event = RecordingSurface::default();
        let outcome = session
            .navigate(OWNER, NavControl::Next, &event)
            .await
            .unwrap();
        assert_eq!(outcome, NavigationOutcome::Ignored);
        assert_eq!(session.current_page(), 2);
        assert!(event.calls().is_empty());

        session.time_out().await.unwrap();
        assert_eq!(session.interaction.calls().len(), 2);
    }

    #[tokio::test]
    async fn surface_failures_propagate() {
        let mut session = started(3, 1).await;
        let event = RecordingSurface::failing();

        let result = session.navigate(OWNER, NavControl::Next, &event).await;

        assert!(result.is_err());
    }
}
