//! Identity snapshot and credential types

use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::assurance::AuthenticatorAssuranceLevel;

/// Credential (authentication method) types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CredentialsType {
    #[serde(rename = "password")]
    Password,
    #[serde(rename = "oidc")]
    Oidc,
    #[serde(rename = "totp")]
    Totp,
    #[serde(rename = "webauthn")]
    WebAuthn,
    #[serde(rename = "lookup_secret")]
    LookupSecret,
    #[serde(rename = "link_recovery")]
    RecoveryLink,
    #[serde(rename = "code_recovery")]
    RecoveryCode,
}

impl CredentialsType {
    /// Get the credentials type as it appears on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialsType::Password => "password",
            CredentialsType::Oidc => "oidc",
            CredentialsType::Totp => "totp",
            CredentialsType::WebAuthn => "webauthn",
            CredentialsType::LookupSecret => "lookup_secret",
            CredentialsType::RecoveryLink => "link_recovery",
            CredentialsType::RecoveryCode => "code_recovery",
        }
    }

    /// Methods that can initiate a login on their own
    pub fn is_first_factor(&self) -> bool {
        matches!(
            self,
            CredentialsType::Password
                | CredentialsType::Oidc
                | CredentialsType::RecoveryLink
                | CredentialsType::RecoveryCode
        )
    }

    /// Methods that step an existing login up
    pub fn is_second_factor(&self) -> bool {
        matches!(
            self,
            CredentialsType::Totp | CredentialsType::WebAuthn | CredentialsType::LookupSecret
        )
    }
}

impl fmt::Display for CredentialsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Administrative state of an identity
///
/// Defaults to `Disabled`, so an identity whose state was never set
/// cannot be authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityState {
    Active,
    #[default]
    Disabled,
}

impl IdentityState {
    /// Get the state as it appears on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentityState::Active => "active",
            IdentityState::Disabled => "disabled",
        }
    }
}

impl fmt::Display for IdentityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only view of an identity at the moment a session is activated
///
/// This is a value copy handed in by the identity store. Later changes to
/// the identity do not reach sessions that were already activated from it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IdentitySnapshot {
    pub id: Uuid,
    pub state: IdentityState,
    /// Credential types the identity has configured
    #[serde(default)]
    pub credentials: BTreeSet<CredentialsType>,
}

impl IdentitySnapshot {
    /// Create a snapshot with no configured credentials
    pub fn new(id: Uuid, state: IdentityState) -> Self {
        Self {
            id,
            state,
            credentials: BTreeSet::new(),
        }
    }

    /// Add a configured credential type
    pub fn with_credential(mut self, credential: CredentialsType) -> Self {
        self.credentials.insert(credential);
        self
    }

    /// Whether the identity may be authenticated
    pub fn is_active(&self) -> bool {
        self.state == IdentityState::Active
    }

    /// Whether `credential` is configured for the identity
    pub fn has_credential(&self, credential: CredentialsType) -> bool {
        self.credentials.contains(&credential)
    }

    /// Highest assurance level reachable with the configured credentials
    pub fn available_aal(&self) -> AuthenticatorAssuranceLevel {
        AuthenticatorAssuranceLevel::from_methods(self.credentials.iter().copied())
    }
}
