//! Session lifecycle models

pub mod identity;
pub mod session;

// Re-export for convenience
pub use identity::{CredentialsType, IdentitySnapshot, IdentityState};
pub use session::{AuthenticationMethod, AuthenticationMethods, Session};
