//! Session model and the authentication methods ledger

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::{
    activity,
    assurance::AuthenticatorAssuranceLevel,
    error::{SessionError, SessionResult},
    models::{CredentialsType, IdentitySnapshot, IdentityState},
    token::OpaqueToken,
};

/// One completed authentication method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationMethod {
    pub method: CredentialsType,
    pub completed_at: DateTime<Utc>,
    /// Upstream provider, e.g. the OIDC issuer alias
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

impl AuthenticationMethod {
    /// Create an entry without a provider
    pub fn new(method: CredentialsType, completed_at: DateTime<Utc>) -> Self {
        Self {
            method,
            completed_at,
            provider: None,
        }
    }

    /// Attach the upstream provider
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }
}

/// Append-only, ordered ledger of completed authentication methods (AMR)
///
/// The first entry is the factor that initiated the login; later entries
/// are step-ups. Entries are never removed, reordered or deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthenticationMethods(Vec<AuthenticationMethod>);

impl AuthenticationMethods {
    pub(crate) fn push(&mut self, entry: AuthenticationMethod) {
        self.0.push(entry);
    }

    /// Number of recorded entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The initiating factor
    pub fn first(&self) -> Option<&AuthenticationMethod> {
        self.0.first()
    }

    /// The most recent entry
    pub fn last(&self) -> Option<&AuthenticationMethod> {
        self.0.last()
    }

    /// Entry at `index` in completion order
    pub fn get(&self, index: usize) -> Option<&AuthenticationMethod> {
        self.0.get(index)
    }

    /// Iterate entries in completion order
    pub fn iter(&self) -> std::slice::Iter<'_, AuthenticationMethod> {
        self.0.iter()
    }

    /// Entries as a slice, in completion order
    pub fn as_slice(&self) -> &[AuthenticationMethod] {
        &self.0
    }

    /// Whether `method` was completed at least once
    pub fn contains(&self, method: CredentialsType) -> bool {
        self.0.iter().any(|entry| entry.method == method)
    }

    /// Methods in completion order
    pub fn methods(&self) -> impl Iterator<Item = CredentialsType> + '_ {
        self.0.iter().map(|entry| entry.method)
    }
}

impl<'a> IntoIterator for &'a AuthenticationMethods {
    type Item = &'a AuthenticationMethod;
    type IntoIter = std::slice::Iter<'a, AuthenticationMethod>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Session entity
///
/// Holds both the session token and the logout token, so this type is for
/// storage only. API responses go through [`crate::view`].
///
/// Fields are only writable inside the crate: `active`, the tokens and the
/// timestamps are set by [`crate::factory::SessionFactory`], and the ledger
/// only grows through [`Session::record_completed_method`].
///
/// Stored records are checked on deserialization: an active record needs a
/// non-empty ledger and both timestamps, `expires_at` must come after
/// `authenticated_at`, and the stored assurance level is recomputed from
/// the ledger rather than trusted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    pub(crate) id: Uuid,
    pub(crate) identity_id: Option<Uuid>,
    pub(crate) identity_state: Option<IdentityState>,
    pub(crate) token: Option<OpaqueToken>,
    pub(crate) logout_token: Option<OpaqueToken>,
    pub(crate) active: bool,
    pub(crate) expires_at: Option<DateTime<Utc>>,
    pub(crate) authenticated_at: Option<DateTime<Utc>>,
    pub(crate) issued_at: Option<DateTime<Utc>>,
    pub(crate) authentication_methods: AuthenticationMethods,
    pub(crate) authenticator_assurance_level: AuthenticatorAssuranceLevel,
}

/// Session record as read from storage, before validation
#[derive(Debug, Deserialize)]
struct SessionRecord {
    id: Uuid,
    #[serde(default)]
    identity_id: Option<Uuid>,
    #[serde(default)]
    identity_state: Option<IdentityState>,
    #[serde(default)]
    token: Option<OpaqueToken>,
    #[serde(default)]
    logout_token: Option<OpaqueToken>,
    #[serde(default)]
    active: bool,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    authenticated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    issued_at: Option<DateTime<Utc>>,
    #[serde(default)]
    authentication_methods: AuthenticationMethods,
}

impl SessionRecord {
    fn into_session(self) -> SessionResult<Session> {
        let invalid = |reason: &'static str| SessionError::InvalidRecord {
            session_id: self.id,
            reason,
        };

        if let (Some(expires_at), Some(authenticated_at)) = (self.expires_at, self.authenticated_at)
        {
            if expires_at <= authenticated_at {
                return Err(invalid("expires_at must be after authenticated_at"));
            }
        }

        if self.active {
            if self.authentication_methods.is_empty() {
                return Err(invalid("active session has no authentication methods"));
            }
            if self.expires_at.is_none() {
                return Err(invalid("active session has no expires_at"));
            }
            if self.authenticated_at.is_none() {
                return Err(invalid("active session has no authenticated_at"));
            }
        }

        let authenticator_assurance_level =
            AuthenticatorAssuranceLevel::from_methods(self.authentication_methods.methods());

        Ok(Session {
            id: self.id,
            identity_id: self.identity_id,
            identity_state: self.identity_state,
            token: self.token,
            logout_token: self.logout_token,
            active: self.active,
            expires_at: self.expires_at,
            authenticated_at: self.authenticated_at,
            issued_at: self.issued_at,
            authentication_methods: self.authentication_methods,
            authenticator_assurance_level,
        })
    }
}

impl<'de> Deserialize<'de> for Session {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        SessionRecord::deserialize(deserializer)?
            .into_session()
            .map_err(serde::de::Error::custom)
    }
}

impl Session {
    /// Create an inactive session with a fresh id, no tokens and an empty ledger
    pub fn new_inactive() -> Self {
        Self {
            id: Uuid::new_v4(),
            ..Self::default()
        }
    }

    /// Record a completed authentication method
    ///
    /// Appends to the ledger and recomputes the assurance level. Never
    /// activates the session.
    pub fn record_completed_method(
        &mut self,
        method: CredentialsType,
        completed_at: DateTime<Utc>,
    ) {
        self.record(AuthenticationMethod::new(method, completed_at));
    }

    /// Record a completed authentication method performed at `provider`
    pub fn record_completed_method_with_provider(
        &mut self,
        method: CredentialsType,
        provider: impl Into<String>,
        completed_at: DateTime<Utc>,
    ) {
        self.record(AuthenticationMethod::new(method, completed_at).with_provider(provider));
    }

    fn record(&mut self, entry: AuthenticationMethod) {
        self.authentication_methods.push(entry);
        self.authenticator_assurance_level =
            AuthenticatorAssuranceLevel::from_methods(self.authentication_methods.methods());
    }

    /// Whether the session is usable at `now`
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        activity::is_active(self, now)
    }

    /// Whether the session reaches `required`
    pub fn satisfies_aal(&self, required: AuthenticatorAssuranceLevel) -> bool {
        self.authenticator_assurance_level >= required
    }

    /// Whether the session reaches the highest level the identity could reach
    pub fn satisfies_identity_aal(&self, identity: &IdentitySnapshot) -> bool {
        self.satisfies_aal(identity.available_aal())
    }

    /// Session id, fixed at creation
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Owning identity, set on activation
    pub fn identity_id(&self) -> Option<Uuid> {
        self.identity_id
    }

    /// Identity state observed when the session was activated
    pub fn identity_state(&self) -> Option<IdentityState> {
        self.identity_state
    }

    /// Session continuation token, issued on activation
    pub fn token(&self) -> Option<&OpaqueToken> {
        self.token.as_ref()
    }

    /// Token authorizing termination of this session only
    pub fn logout_token(&self) -> Option<&OpaqueToken> {
        self.logout_token.as_ref()
    }

    /// The stored activation flag
    ///
    /// This says nothing about expiry; authorization checks must use
    /// [`Session::is_active`].
    pub fn activated(&self) -> bool {
        self.active
    }

    /// Instant from which the session is no longer usable
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Instant of the authentication that activated the session
    pub fn authenticated_at(&self) -> Option<DateTime<Utc>> {
        self.authenticated_at
    }

    /// Instant the tokens were issued
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.issued_at
    }

    /// Completed methods in completion order
    pub fn authentication_methods(&self) -> &AuthenticationMethods {
        &self.authentication_methods
    }

    /// Assurance level derived from the ledger
    pub fn authenticator_assurance_level(&self) -> AuthenticatorAssuranceLevel {
        self.authenticator_assurance_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_new_inactive_session_is_empty() {
        let session = Session::new_inactive();
        assert!(!session.activated());
        assert!(session.authentication_methods().is_empty());
        assert!(session.token().is_none());
        assert!(session.logout_token().is_none());
        assert_eq!(
            session.authenticator_assurance_level(),
            AuthenticatorAssuranceLevel::Aal0
        );
        assert!(!session.id().is_nil());
    }

    #[test]
    fn test_ledger_keeps_order_and_duplicates() {
        let mut session = Session::new_inactive();
        session.record_completed_method(CredentialsType::Password, t0());
        session.record_completed_method(CredentialsType::Totp, t0() + TimeDelta::seconds(10));
        session.record_completed_method(CredentialsType::Password, t0() + TimeDelta::seconds(20));

        let methods: Vec<_> = session.authentication_methods().methods().collect();
        assert_eq!(
            methods,
            vec![
                CredentialsType::Password,
                CredentialsType::Totp,
                CredentialsType::Password
            ]
        );
        assert_eq!(
            session.authentication_methods().last().unwrap().completed_at,
            t0() + TimeDelta::seconds(20)
        );
    }

    #[test]
    fn test_recording_never_activates() {
        let mut session = Session::new_inactive();
        session.record_completed_method(CredentialsType::Password, t0());
        session.record_completed_method(CredentialsType::Totp, t0());
        assert!(!session.activated());
        assert!(!session.is_active(t0()));
        assert!(session.token().is_none());
    }

    #[test]
    fn test_provider_is_kept() {
        let mut session = Session::new_inactive();
        session.record_completed_method_with_provider(CredentialsType::Oidc, "github", t0());

        let entry = session.authentication_methods().first().unwrap();
        assert_eq!(entry.provider.as_deref(), Some("github"));
    }

    #[test]
    fn test_assurance_level_follows_ledger() {
        let mut session = Session::new_inactive();
        session.record_completed_method(CredentialsType::Password, t0());
        assert_eq!(
            session.authenticator_assurance_level(),
            AuthenticatorAssuranceLevel::Aal1
        );
        assert!(!session.satisfies_aal(AuthenticatorAssuranceLevel::Aal2));

        session.record_completed_method(CredentialsType::WebAuthn, t0());
        assert_eq!(
            session.authenticator_assurance_level(),
            AuthenticatorAssuranceLevel::Aal2
        );
        assert!(session.satisfies_aal(AuthenticatorAssuranceLevel::Aal2));
    }

    #[test]
    fn test_identity_aal_requires_step_up() {
        let identity = IdentitySnapshot::new(Uuid::new_v4(), IdentityState::Active)
            .with_credential(CredentialsType::Password)
            .with_credential(CredentialsType::LookupSecret);

        let mut session = Session::new_inactive();
        session.record_completed_method(CredentialsType::Password, t0());
        assert!(!session.satisfies_identity_aal(&identity));

        session.record_completed_method(CredentialsType::LookupSecret, t0());
        assert!(session.satisfies_identity_aal(&identity));
    }

    fn stored_record(overrides: serde_json::Value) -> serde_json::Value {
        let mut record = serde_json::json!({
            "id": Uuid::new_v4(),
            "identity_id": Uuid::new_v4(),
            "active": true,
            "authenticated_at": t0(),
            "expires_at": t0() + TimeDelta::hours(1),
            "authentication_methods": [
                { "method": "password", "completed_at": t0() }
            ],
        });
        for (key, value) in overrides.as_object().unwrap() {
            record[key] = value.clone();
        }
        record
    }

    fn rejection(record: serde_json::Value) -> String {
        serde_json::from_value::<Session>(record)
            .unwrap_err()
            .to_string()
    }

    #[test]
    fn test_valid_record_deserializes() {
        let record = stored_record(serde_json::json!({}));
        let session: Session = serde_json::from_value(record).unwrap();
        assert!(session.is_active(t0()));
        assert_eq!(
            session.authenticator_assurance_level(),
            AuthenticatorAssuranceLevel::Aal1
        );
    }

    #[test]
    fn test_record_expiring_before_authentication_is_rejected() {
        let record = stored_record(serde_json::json!({
            "authenticated_at": t0() + TimeDelta::hours(5),
        }));
        assert!(rejection(record).contains("expires_at must be after authenticated_at"));

        let record = stored_record(serde_json::json!({ "expires_at": t0() }));
        assert!(rejection(record).contains("expires_at must be after authenticated_at"));
    }

    #[test]
    fn test_active_record_without_methods_is_rejected() {
        let record = stored_record(serde_json::json!({ "authentication_methods": [] }));
        assert!(rejection(record).contains("no authentication methods"));
    }

    #[test]
    fn test_active_record_without_timestamps_is_rejected() {
        let record = stored_record(serde_json::json!({ "expires_at": null }));
        assert!(rejection(record).contains("no expires_at"));

        let record = stored_record(serde_json::json!({ "authenticated_at": null }));
        assert!(rejection(record).contains("no authenticated_at"));
    }

    #[test]
    fn test_stored_assurance_level_is_recomputed() {
        let record = stored_record(serde_json::json!({
            "authenticator_assurance_level": "aal2",
        }));
        let session: Session = serde_json::from_value(record).unwrap();

        assert_eq!(
            session.authenticator_assurance_level(),
            AuthenticatorAssuranceLevel::Aal1
        );
        assert!(!session.satisfies_aal(AuthenticatorAssuranceLevel::Aal2));
    }

    #[test]
    fn test_inactive_record_may_omit_timestamps() {
        let record = stored_record(serde_json::json!({
            "active": false,
            "expires_at": null,
            "authenticated_at": null,
            "authentication_methods": [],
        }));
        let session: Session = serde_json::from_value(record).unwrap();
        assert!(!session.activated());
    }

    #[test]
    fn test_ledger_serializes_as_ordered_list() {
        let mut session = Session::new_inactive();
        session.record_completed_method(CredentialsType::Oidc, t0());
        session.record_completed_method(CredentialsType::RecoveryLink, t0());

        let value = serde_json::to_value(&session).unwrap();
        let amr = value["authentication_methods"].as_array().unwrap();
        assert_eq!(amr.len(), 2);
        assert_eq!(amr[0]["method"], "oidc");
        assert_eq!(amr[1]["method"], "link_recovery");
        assert!(amr[0].get("provider").is_none());

        let restored: Session = serde_json::from_value(value).unwrap();
        assert_eq!(restored, session);
    }
}
