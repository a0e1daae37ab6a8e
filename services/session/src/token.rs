//! Opaque session and logout tokens
//!
//! Tokens are random bytes encoded as base64url without padding. The
//! session token and the logout token are drawn independently so neither
//! can be derived from the other.

use std::fmt;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};

use crate::random::SecureRandomSource;

/// An opaque bearer secret
///
/// `Debug` is redacted so tokens do not leak through logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpaqueToken(String);

impl OpaqueToken {
    /// The raw token value, for handing to the client
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for OpaqueToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OpaqueToken(***)")
    }
}

/// Draw `len` random bytes from `source` and encode them as a token
pub fn generate_token(
    source: &dyn SecureRandomSource,
    len: usize,
) -> Result<OpaqueToken, rand::Error> {
    let mut bytes = vec![0u8; len];
    source.try_fill(&mut bytes)?;
    Ok(OpaqueToken(URL_SAFE_NO_PAD.encode(bytes)))
}
