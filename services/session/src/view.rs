//! API views of a session
//!
//! The session token and the logout token travel on different channels:
//! no view here carries both.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    assurance::AuthenticatorAssuranceLevel,
    models::{AuthenticationMethod, Session},
};

/// Declassified session, safe to return to any authenticated caller
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub id: Uuid,
    /// Usability at the time the response was built
    pub active: bool,
    pub identity_id: Option<Uuid>,
    pub expires_at: Option<DateTime<Utc>>,
    pub authenticated_at: Option<DateTime<Utc>>,
    pub issued_at: Option<DateTime<Utc>>,
    pub authenticator_assurance_level: AuthenticatorAssuranceLevel,
    pub authentication_methods: Vec<AuthenticationMethod>,
}

impl SessionResponse {
    /// Build the view, evaluating `active` at `now`
    pub fn new(session: &Session, now: DateTime<Utc>) -> Self {
        Self {
            id: session.id(),
            active: session.is_active(now),
            identity_id: session.identity_id(),
            expires_at: session.expires_at(),
            authenticated_at: session.authenticated_at(),
            issued_at: session.issued_at(),
            authenticator_assurance_level: session.authenticator_assurance_level(),
            authentication_methods: session.authentication_methods().as_slice().to_vec(),
        }
    }
}

/// Response for a completed login: the continuation token and the session
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub session_token: String,
    pub session: SessionResponse,
}

impl LoginResponse {
    /// `None` when the session has no token, i.e. was never activated
    pub fn new(session: &Session, now: DateTime<Utc>) -> Option<Self> {
        let token = session.token()?;
        Some(Self {
            session_token: token.expose().to_string(),
            session: SessionResponse::new(session, now),
        })
    }
}

/// Response for a logout-token request
#[derive(Debug, Clone, Serialize)]
pub struct LogoutResponse {
    pub logout_token: String,
}

impl LogoutResponse {
    /// `None` when the session has no logout token
    pub fn new(session: &Session) -> Option<Self> {
        session.logout_token().map(|token| Self {
            logout_token: token.expose().to_string(),
        })
    }
}
