//! Activity evaluation
//!
//! Pure predicates over a session and a caller-supplied instant. Nothing
//! here mutates the session: an expired session keeps its stored `active`
//! flag and simply stops being usable.

use chrono::{DateTime, Utc};

use crate::{config::SessionConfig, models::Session};

/// Whether `session` is usable at `now`
///
/// This is the authorization gate. Checking the stored activation flag on
/// its own ignores expiry.
pub fn is_active(session: &Session, now: DateTime<Utc>) -> bool {
    session.active && session.expires_at.is_some_and(|expires_at| now < expires_at)
}

/// Whether `session` may have its expiry extended at `now`
///
/// Only usable sessions can be refreshed. With an `earliest_possible_extend`
/// window configured, refresh is only allowed once the session is within
/// that window of expiring.
pub fn can_be_refreshed(session: &Session, config: &SessionConfig, now: DateTime<Utc>) -> bool {
    if !is_active(session, now) {
        return false;
    }

    match (config.earliest_possible_extend(), session.expires_at) {
        (Some(window), Some(expires_at)) => expires_at
            .checked_sub_signed(window)
            .is_none_or(|earliest| earliest <= now),
        _ => true,
    }
}
