//! Stable facade for the button paginator used by command handlers.

use std::time::Duration;

/// Default idle time before a pagination session disables its controls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

mod components;
mod cursor;
pub mod interaction;
mod page;
mod paginator;
mod registry;
mod surface;
pub mod token;

#[cfg(test)]
mod testing;

pub use components::build_nav_components;
pub use cursor::{JUMP_DISTANCE, JUMP_POLICY_MIN_PAGES, NavControl, PageCursor};
pub use interaction::{dispatch, handle_component_interaction};
pub use page::{DEFAULT_PAGE_COLOR, Page, PageDecoration};
pub use paginator::{
    InvalidActorHandler, NOT_COMMAND_SENDER_MESSAGE, NavigationOutcome, NotSenderNotice,
    Paginator, PaginatorBuilder, PaginatorSession, SessionState,
};
pub use registry::PaginatorRegistry;
pub use surface::{InteractionHandle, InteractionSurface, PAGINATION_EXPIRED_MESSAGE};
