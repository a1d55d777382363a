//! Component custom-ID encoding for paginator controls.

use super::cursor::NavControl;

const TOKEN_PREFIX: &str = "pg";

/// Parsed paginator control custom ID.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavToken {
    /// Session the control belongs to.
    pub session_id: u64,
    /// Control that was pressed.
    pub control: NavControl,
}

/// Build the custom ID carried by one paginator control.
pub fn build_custom_id(session_id: u64, control: NavControl) -> String {
    format!("{TOKEN_PREFIX}:{session_id}:{}", control.as_str())
}

/// Whether a custom ID belongs to a paginator control at all.
pub fn is_pagination_custom_id(custom_id: &str) -> bool {
    custom_id
        .strip_prefix(TOKEN_PREFIX)
        .is_some_and(|rest| rest.starts_with(':'))
}

/// Parse a paginator control custom ID.
pub fn parse_custom_id(custom_id: &str) -> Option<NavToken> {
    let mut parts = custom_id.split(':');

    let prefix = parts.next()?;
    if prefix != TOKEN_PREFIX {
        return None;
    }

    let session_id = parts.next()?.parse::<u64>().ok()?;
    let control = NavControl::parse(parts.next()?)?;

    if parts.next().is_some() {
        return None;
    }

    Some(NavToken {
        session_id,
        control,
    })
}
