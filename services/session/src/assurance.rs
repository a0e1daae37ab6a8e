//! Authenticator assurance level (AAL) derivation

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::CredentialsType;

/// How strongly a session is authenticated
///
/// Ordered, so `Aal2 > Aal1 > Aal0`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AuthenticatorAssuranceLevel {
    /// No first factor completed
    #[default]
    Aal0,
    /// A first factor completed
    Aal1,
    /// A first factor and a second factor completed
    Aal2,
}

impl AuthenticatorAssuranceLevel {
    /// Derive the level from a sequence of completed (or configured) methods
    ///
    /// A second factor without any first factor stays at `Aal0`.
    pub fn from_methods(methods: impl IntoIterator<Item = CredentialsType>) -> Self {
        let (mut first, mut second) = (false, false);
        for method in methods {
            first |= method.is_first_factor();
            second |= method.is_second_factor();
        }

        match (first, second) {
            (true, true) => AuthenticatorAssuranceLevel::Aal2,
            (true, false) => AuthenticatorAssuranceLevel::Aal1,
            (false, _) => AuthenticatorAssuranceLevel::Aal0,
        }
    }

    /// Get the level as it appears on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthenticatorAssuranceLevel::Aal0 => "aal0",
            AuthenticatorAssuranceLevel::Aal1 => "aal1",
            AuthenticatorAssuranceLevel::Aal2 => "aal2",
        }
    }
}

impl fmt::Display for AuthenticatorAssuranceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
