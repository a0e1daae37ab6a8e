//! Session construction, activation and refresh
//!
//! The factory is the only place a session becomes active. Activation
//! checks the identity snapshot once, draws both tokens, and only then
//! touches the session, so a failed activation leaves it as it was.

use std::{fmt, sync::Arc};

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, info};

use crate::{
    activity,
    config::SessionConfig,
    error::{SessionError, SessionResult},
    models::{CredentialsType, IdentitySnapshot, Session},
    random::{OsRandomSource, SecureRandomSource},
    token::generate_token,
};

/// Builds and activates sessions
#[derive(Clone)]
pub struct SessionFactory {
    config: SessionConfig,
    random: Arc<dyn SecureRandomSource>,
}

impl SessionFactory {
    /// Create a factory drawing tokens from the operating system CSPRNG
    pub fn new(config: SessionConfig) -> Self {
        Self::with_random_source(config, Arc::new(OsRandomSource))
    }

    /// Create a factory drawing tokens from `random`
    pub fn with_random_source(config: SessionConfig, random: Arc<dyn SecureRandomSource>) -> Self {
        Self { config, random }
    }

    /// Create a factory from `SESSION_*` environment variables
    pub fn from_env() -> SessionResult<Self> {
        Ok(Self::new(SessionConfig::from_env()?))
    }

    /// The configuration sessions are built with
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Create an inactive session to accumulate a multi-step login
    pub fn create_inactive_session(&self) -> Session {
        let session = Session::new_inactive();
        debug!(session_id = %session.id, "Created inactive session");
        session
    }

    /// Create a fully authenticated session
    ///
    /// Fails with [`SessionError::IdentityDisabled`] when the identity is
    /// not active; no session is returned in that case.
    pub fn create_active_session(
        &self,
        identity: &IdentitySnapshot,
        authenticated_at: DateTime<Utc>,
        method: CredentialsType,
    ) -> SessionResult<Session> {
        ensure_identity_active(identity)?;

        let mut session = Session::new_inactive();
        session.record_completed_method(method, authenticated_at);
        self.activate(&mut session, identity, authenticated_at)?;

        Ok(session)
    }

    /// Activate a session that accumulated its methods while inactive
    ///
    /// Sets the identity back-reference and state snapshot, issues the
    /// session and logout tokens, and starts the lifespan at
    /// `authenticated_at`. A session is activated at most once.
    pub fn activate(
        &self,
        session: &mut Session,
        identity: &IdentitySnapshot,
        authenticated_at: DateTime<Utc>,
    ) -> SessionResult<()> {
        ensure_identity_active(identity)?;

        if session.active {
            return Err(SessionError::AlreadyActive {
                session_id: session.id,
            });
        }

        if session.authentication_methods.is_empty() {
            return Err(SessionError::NoAuthenticationMethods {
                session_id: session.id,
            });
        }

        let expires_at = authenticated_at
            .checked_add_signed(self.config.lifespan())
            .ok_or(SessionError::ExpiryOverflow {
                session_id: session.id,
            })?;

        let token = generate_token(self.random.as_ref(), self.config.token_bytes())?;
        let logout_token = generate_token(self.random.as_ref(), self.config.token_bytes())?;

        session.identity_id = Some(identity.id);
        session.identity_state = Some(identity.state);
        session.token = Some(token);
        session.logout_token = Some(logout_token);
        session.authenticated_at = Some(authenticated_at);
        session.issued_at = Some(authenticated_at);
        session.expires_at = Some(expires_at);
        session.active = true;

        info!(
            session_id = %session.id,
            identity_id = %identity.id,
            aal = %session.authenticator_assurance_level,
            "Activated session"
        );

        Ok(())
    }

    /// Whether `session` may be refreshed at `now`
    pub fn can_be_refreshed(&self, session: &Session, now: DateTime<Utc>) -> bool {
        activity::can_be_refreshed(session, &self.config, now)
    }

    /// Extend a usable session to expire one lifespan after `now`
    ///
    /// Never shortens the session, and leaves tokens, the ledger and
    /// `authenticated_at` untouched.
    pub fn refresh(&self, session: &mut Session, now: DateTime<Utc>) -> SessionResult<()> {
        if !activity::is_active(session, now) {
            return Err(SessionError::NotActive {
                session_id: session.id,
            });
        }

        let extended = saturating_expiry(now, self.config.lifespan());
        if session.expires_at.is_none_or(|current| current < extended) {
            session.expires_at = Some(extended);
            info!(
                session_id = %session.id,
                identity_id = ?session.identity_id,
                expires_at = %extended,
                "Refreshed session"
            );
        }

        Ok(())
    }
}

impl fmt::Debug for SessionFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionFactory")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn ensure_identity_active(identity: &IdentitySnapshot) -> SessionResult<()> {
    if identity.is_active() {
        Ok(())
    } else {
        Err(SessionError::IdentityDisabled {
            identity_id: identity.id,
            state: identity.state,
        })
    }
}

/// `start + lifespan`, saturating at the latest representable instant
///
/// Only used on refresh, where `authenticated_at` stays in the past.
fn saturating_expiry(start: DateTime<Utc>, lifespan: TimeDelta) -> DateTime<Utc> {
    start
        .checked_add_signed(lifespan)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
