//! Live paginator sessions and their timeout timers.

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use tokio::{sync::Mutex, task::JoinHandle};
use tracing::{info, warn};

use super::cursor::NavControl;
use super::paginator::{NavigationOutcome, Paginator, PaginatorSession};
use super::surface::InteractionSurface;

struct SessionSlot<S> {
    session: Arc<Mutex<PaginatorSession<S>>>,
    timer: JoinHandle<()>,
    timeout: Duration,
}

/// Hosts paginator sessions: hands out session IDs, serialises events per session and
/// times sessions out after a period without navigation.
pub struct PaginatorRegistry<S> {
    next_id: AtomicU64,
    sessions: Mutex<HashMap<u64, SessionSlot<S>>>,
}

impl<S> Default for PaginatorRegistry<S> {
    fn default() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            sessions: Mutex::new(HashMap::new()),
        }
    }
}

impl<S: InteractionSurface + 'static> PaginatorRegistry<S> {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Start `paginator` on `interaction` and keep the session alive until it times out.
    ///
    /// The session is registered before the first render, so presses that race the initial
    /// response wait for it instead of finding nothing. Single-page paginators are shown
    /// but not kept, since nothing can navigate them.
    pub async fn start(
        self: &Arc<Self>,
        paginator: Paginator,
        owner_id: u64,
        interaction: S,
        ephemeral: bool,
        deferred: bool,
    ) -> anyhow::Result<u64> {
        let session_id = self.next_id.fetch_add(1, Ordering::Relaxed);

        if !paginator.is_navigable() {
            paginator
                .bind(session_id, owner_id, interaction)
                .show(ephemeral, deferred)
                .await?;
            return Ok(session_id);
        }

        let timeout = paginator.timeout();
        let pages = paginator.total_pages();
        let session = Arc::new(Mutex::new(paginator.bind(session_id, owner_id, interaction)));
        let rendering = Arc::clone(&session).lock_owned().await;

        {
            let mut sessions = self.sessions.lock().await;
            let timer = self.spawn_timer(session_id, timeout);
            sessions.insert(
                session_id,
                SessionSlot {
                    session,
                    timer,
                    timeout,
                },
            );
        }

        if let Err(source) = rendering.show(ephemeral, deferred).await {
            drop(rendering);
            if let Some(slot) = self.sessions.lock().await.remove(&session_id) {
                slot.timer.abort();
            }
            return Err(source);
        }

        info!(session_id, owner_id, pages, "pagination session started");
        Ok(session_id)
    }

    /// Route a control press to its session.
    ///
    /// The timeout restarts as soon as the press is received, before it is rendered.
    /// Returns `None` when the session is unknown or already timed out.
    pub async fn navigate(
        self: &Arc<Self>,
        session_id: u64,
        actor_id: u64,
        control: NavControl,
        event: &dyn InteractionSurface,
    ) -> anyhow::Result<Option<NavigationOutcome>> {
        let Some(session) = self.touch(session_id).await else {
            return Ok(None);
        };

        let mut session = session.lock().await;
        let outcome = session.navigate(actor_id, control, event).await?;

        Ok(Some(outcome))
    }

    /// Number of sessions still accepting events.
    pub async fn active_sessions(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn contains(&self, session_id: u64) -> bool {
        self.sessions.lock().await.contains_key(&session_id)
    }

    /// Restart the session's timer and hand the session back.
    async fn touch(self: &Arc<Self>, session_id: u64) -> Option<Arc<Mutex<PaginatorSession<S>>>> {
        let mut sessions = self.sessions.lock().await;
        let slot = sessions.get_mut(&session_id)?;

        slot.timer.abort();
        slot.timer = self.spawn_timer(session_id, slot.timeout);

        Some(Arc::clone(&slot.session))
    }

    fn spawn_timer(self: &Arc<Self>, session_id: u64, timeout: Duration) -> JoinHandle<()> {
        let registry = Arc::downgrade(self);

        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;

            if let Some(registry) = registry.upgrade() {
                registry.expire(session_id).await;
            }
        })
    }

    // Runs on the session's own timer task, so the slot's handle must not be aborted here.
    async fn expire(&self, session_id: u64) {
        let Some(slot) = self.sessions.lock().await.remove(&session_id) else {
            return;
        };

        let mut session = slot.session.lock().await;
        match session.time_out().await {
            Ok(()) => info!(session_id, "pagination session timed out"),
            Err(source) => warn!(
                ?source,
                session_id, "failed to disable controls of timed out pagination session"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::components::buttons;
    use crate::pagination::paginator::NOT_COMMAND_SENDER_MESSAGE;
    use crate::pagination::testing::{RecordingSurface, SurfaceCall};

    const OWNER: u64 = 7;

    fn paginator(pages: usize, timeout_secs: u64) -> Paginator {
        Paginator::builder((1..=pages).map(|index| format!("entry {index}")))
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn navigable_sessions_are_kept_until_timeout() {
        let registry = PaginatorRegistry::new();
        let bound = RecordingSurface::default();

        let id = registry
            .start(paginator(3, 30), OWNER, bound.clone(), false, false)
            .await
            .unwrap();
        assert!(registry.contains(id).await);

        tokio::time::sleep(Duration::from_secs(31)).await;

        assert!(!registry.contains(id).await);
        let calls = bound.calls();
        assert_eq!(calls.len(), 2);
        let SurfaceCall::EditOriginal { components, .. } = &calls[1] else {
            panic!("expected the final edit, got {calls:?}");
        };
        assert!(buttons(components).iter().all(|button| button.disabled));
    }

    #[tokio::test(start_paused = true)]
    async fn single_page_sessions_are_not_kept() {
        let registry = PaginatorRegistry::new();

        let id = registry
            .start(paginator(1, 30), OWNER, RecordingSurface::default(), false, false)
            .await
            .unwrap();

        assert!(!registry.contains(id).await);
        assert_eq!(registry.active_sessions().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn navigation_restarts_the_timer() {
        let registry = PaginatorRegistry::new();
        let id = registry
            .start(paginator(4, 10), OWNER, RecordingSurface::default(), false, false)
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_secs(6)).await;
        let event = RecordingSurface::default();
        let outcome = registry
            .navigate(id, OWNER, NavControl::Next, &event)
            .await
            .unwrap();
        assert_eq!(outcome, Some(NavigationOutcome::Moved { page: 2 }));

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert!(registry.contains(id).await);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(!registry.contains(id).await);
    }

    #[tokio::test(start_paused = true)]
    async fn press_received_before_expiry_keeps_session_during_slow_render() {
        let registry = PaginatorRegistry::new();
        let id = registry
            .start(paginator(4, 10), OWNER, RecordingSurface::default(), false, false)
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_secs(9)).await;
        let slow = RecordingSurface::slow(Duration::from_secs(2));
        let outcome = registry
            .navigate(id, OWNER, NavControl::Next, &slow)
            .await
            .unwrap();
        assert_eq!(outcome, Some(NavigationOutcome::Moved { page: 2 }));
        assert!(registry.contains(id).await);

        tokio::time::sleep(Duration::from_secs(7)).await;
        assert!(registry.contains(id).await);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!registry.contains(id).await);
    }

    #[tokio::test(start_paused = true)]
    async fn press_during_initial_render_waits_for_it() {
        let registry = PaginatorRegistry::new();
        let bound = RecordingSurface::slow(Duration::from_secs(3));

        let starter = {
            let registry = Arc::clone(&registry);
            let bound = bound.clone();
            tokio::spawn(async move {
                registry
                    .start(paginator(4, 60), OWNER, bound, false, false)
                    .await
            })
        };

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(registry.contains(1).await);
        assert!(bound.calls().is_empty());

        let event = RecordingSurface::default();
        let outcome = registry
            .navigate(1, OWNER, NavControl::Next, &event)
            .await
            .unwrap();

        assert_eq!(outcome, Some(NavigationOutcome::Moved { page: 2 }));
        assert_eq!(starter.await.unwrap().unwrap(), 1);
        assert!(matches!(bound.calls().as_slice(), [SurfaceCall::Send { .. }]));
    }

    #[tokio::test(start_paused = true)]
    async fn expired_sessions_ignore_events() {
        let registry = PaginatorRegistry::new();
        let id = registry
            .start(paginator(4, 5), OWNER, RecordingSurface::default(), false, false)
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_secs(6)).await;

        let event = RecordingSurface::default();
        let outcome = registry
            .navigate(id, OWNER, NavControl::Next, &event)
            .await
            .unwrap();
        assert_eq!(outcome, None);
        assert!(event.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn foreign_actor_is_notified_and_page_is_unchanged() {
        let registry = PaginatorRegistry::new();
        let bound = RecordingSurface::default();
        let id = registry
            .start(paginator(4, 60), OWNER, bound.clone(), false, false)
            .await
            .unwrap();

        let event = RecordingSurface::default();
        let outcome = registry
            .navigate(id, OWNER + 1, NavControl::Last, &event)
            .await
            .unwrap();

        assert_eq!(outcome, Some(NavigationOutcome::Rejected));
        assert_eq!(
            event.calls(),
            vec![SurfaceCall::Ephemeral(NOT_COMMAND_SENDER_MESSAGE.to_owned())]
        );

        let owner_event = RecordingSurface::default();
        let outcome = registry
            .navigate(id, OWNER, NavControl::Next, &owner_event)
            .await
            .unwrap();
        assert_eq!(outcome, Some(NavigationOutcome::Moved { page: 2 }));
    }

    #[tokio::test(start_paused = true)]
    async fn sessions_are_independent() {
        let registry = PaginatorRegistry::new();
        let first = registry
            .start(paginator(5, 60), OWNER, RecordingSurface::default(), false, false)
            .await
            .unwrap();
        let second = registry
            .start(paginator(5, 60), OWNER, RecordingSurface::default(), false, false)
            .await
            .unwrap();
        assert_ne!(first, second);

        let event = RecordingSurface::default();
        registry
            .navigate(first, OWNER, NavControl::Last, &event)
            .await
            .unwrap();
        let outcome = registry
            .navigate(second, OWNER, NavControl::Next, &event)
            .await
            .unwrap();

        assert_eq!(outcome, Some(NavigationOutcome::Moved { page: 2 }));
        assert_eq!(registry.active_sessions().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_start_leaves_nothing_behind() {
        let registry = PaginatorRegistry::new();

        let result = registry
            .start(paginator(3, 60), OWNER, RecordingSurface::failing(), false, false)
            .await;

        assert!(result.is_err());
        assert_eq!(registry.active_sessions().await, 0);
    }
}
