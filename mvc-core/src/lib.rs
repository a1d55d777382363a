use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use twilight_http::Client;

use mvc_database::Database;
use mvc_utils::pagination::{InteractionHandle, PaginatorRegistry};

/// Environment configuration for the bot and the web server.
pub mod config;

/// Shared application context passed into command handlers.
///
/// Cheap to clone because it only stores reference-counted shared state.
#[derive(Clone)]
pub struct Context {
    pub http: Arc<Client>,
    pub db: Database,
    pub paginators: Arc<PaginatorRegistry<InteractionHandle>>,
    pub prefix: Arc<str>,
    pub latency: LatencyGauge,
}

impl Context {
    /// Create a new application context.
    pub fn new(http: Arc<Client>, db: Database, prefix: &str) -> Self {
        Self {
            http,
            db,
            paginators: PaginatorRegistry::new(),
            prefix: Arc::from(prefix),
            latency: LatencyGauge::default(),
        }
    }
}

/// Last known gateway heartbeat latency, written by the gateway loop.
#[derive(Clone, Debug)]
pub struct LatencyGauge(Arc<AtomicU64>);

impl Default for LatencyGauge {
    fn default() -> Self {
        Self(Arc::new(AtomicU64::new(u64::MAX)))
    }
}

impl LatencyGauge {
    pub fn record(&self, latency: Duration) {
        let millis = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        self.0.store(millis.min(u64::MAX - 1), Ordering::Relaxed);
    }

    /// `None` until the first heartbeat has been acknowledged.
    pub fn millis(&self) -> Option<u64> {
        match self.0.load(Ordering::Relaxed) {
            u64::MAX => None,
            millis => Some(millis),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latency_is_unknown_until_recorded() {
        let gauge = LatencyGauge::default();
        assert_eq!(gauge.millis(), None);

        let shared = gauge.clone();
        shared.record(Duration::from_millis(42));
        assert_eq!(gauge.millis(), Some(42));
    }
}
