//! Common library for the Joy Kunga application
//!
//! This crate provides shared functionality used across different services
//! in the Joy Kunga application: environment-driven settings, tracing
//! setup and the shared configuration error.
//!
//! ```rust,no_run
//! use common::settings::load_from_env;
//!
//! #[derive(serde::Deserialize)]
//! struct Limits {
//!     window_secs: u64,
//! }
//!
//! fn main() -> Result<(), common::error::ConfigError> {
//!     common::telemetry::init_tracing(tracing::Level::INFO);
//!     let limits: Limits = load_from_env("LIMITS", &[("window_secs", 300)])?;
//!     println!("window: {}s", limits.window_secs);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod settings;
pub mod telemetry;
