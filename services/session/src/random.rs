//! Secure random source used for token generation

use rand::{RngCore, rngs::OsRng};

/// Entropy source for session and logout tokens
///
/// Implementations are shared across concurrent session creations, so
/// they take `&self` and must be `Send + Sync`. A failure must be reported,
/// never papered over with weaker randomness.
pub trait SecureRandomSource: Send + Sync {
    /// Fill `dest` entirely with random bytes
    fn try_fill(&self, dest: &mut [u8]) -> Result<(), rand::Error>;
}

/// Operating system CSPRNG
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandomSource;

impl SecureRandomSource for OsRandomSource {
    fn try_fill(&self, dest: &mut [u8]) -> Result<(), rand::Error> {
        OsRng.try_fill_bytes(dest)
    }
}
