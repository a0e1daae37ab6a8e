//! Session lifecycle error types

use common::error::ConfigError;
use thiserror::Error;
use uuid::Uuid;

use crate::models::IdentityState;

/// Errors returned by session construction, activation and refresh
///
/// Expiry is not an error: an expired session is simply not usable, see
/// [`crate::activity::is_active`].
#[derive(Error, Debug)]
pub enum SessionError {
    /// Activation was attempted against an identity that is not active
    #[error("identity {identity_id} is {state} and cannot be authenticated")]
    IdentityDisabled {
        identity_id: Uuid,
        state: IdentityState,
    },

    /// The secure random source failed to produce token material
    #[error("failed to generate session token: {0}")]
    TokenGeneration(#[from] rand::Error),

    /// The session was already activated; tokens are issued only once
    #[error("session {session_id} is already active")]
    AlreadyActive { session_id: Uuid },

    /// The session has no completed authentication method to activate on
    #[error("session {session_id} has no completed authentication methods")]
    NoAuthenticationMethods { session_id: Uuid },

    /// `authenticated_at + lifespan` is not representable
    #[error("session {session_id} expiry overflows the supported time range")]
    ExpiryOverflow { session_id: Uuid },

    /// A stored session record violates the session invariants
    #[error("invalid session record {session_id}: {reason}")]
    InvalidRecord {
        session_id: Uuid,
        reason: &'static str,
    },

    /// The session is not usable at the requested instant
    #[error("session {session_id} is not active")]
    NotActive { session_id: Uuid },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl SessionError {
    /// Whether the calling flow may retry the whole authentication attempt
    ///
    /// Only entropy failures are transient. Everything else needs either
    /// administrative action or a different session.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SessionError::TokenGeneration(_))
    }
}

/// Type alias for Result with SessionError
pub type SessionResult<T> = Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_disabled_is_not_retryable() {
        let err = SessionError::IdentityDisabled {
            identity_id: Uuid::nil(),
            state: IdentityState::Disabled,
        };
        assert!(!err.is_retryable());
        assert_eq!(
            err.to_string(),
            "identity 00000000-0000-0000-0000-000000000000 is disabled and cannot be authenticated"
        );
    }

    #[test]
    fn test_token_generation_is_retryable() {
        let err = SessionError::from(rand::Error::new(std::io::Error::other("entropy exhausted")));
        assert!(err.is_retryable());
    }
}
