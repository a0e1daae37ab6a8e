//! Session lifecycle and authentication assurance for the Joy Kunga
//! identity service
//!
//! This crate decides whether a principal is authenticated, how strongly
//! and until when. Credential verification, persistence and transport
//! live elsewhere; flows report completed methods here and the resulting
//! [`Session`] is handed to storage.
//!
//! ```rust
//! use chrono::Utc;
//! use session::{CredentialsType, IdentitySnapshot, IdentityState, SessionConfig, SessionFactory};
//! use uuid::Uuid;
//!
//! let factory = SessionFactory::new(SessionConfig::default());
//! let identity = IdentitySnapshot::new(Uuid::new_v4(), IdentityState::Active);
//! let now = Utc::now();
//!
//! let session = factory
//!     .create_active_session(&identity, now, CredentialsType::Password)
//!     .expect("identity is active");
//! assert!(session.is_active(now));
//! ```

pub mod activity;
pub mod assurance;
pub mod config;
pub mod error;
pub mod factory;
pub mod models;
pub mod random;
pub mod token;
pub mod view;

pub use activity::is_active;
pub use assurance::AuthenticatorAssuranceLevel;
pub use config::SessionConfig;
pub use error::{SessionError, SessionResult};
pub use factory::SessionFactory;
pub use models::{
    AuthenticationMethod, AuthenticationMethods, CredentialsType, IdentitySnapshot, IdentityState,
    Session,
};
pub use random::{OsRandomSource, SecureRandomSource};
pub use token::OpaqueToken;
