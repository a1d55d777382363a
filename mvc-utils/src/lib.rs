/// Generic embed builder shared across commands.
pub mod embed;
/// Button paginator: page state machine, controls, sessions and routing.
pub mod pagination;
/// Webhook send/receive actions.
pub mod webhook;
