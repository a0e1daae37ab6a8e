//! Session lifespan and token configuration

use chrono::TimeDelta;
use common::{
    error::{ConfigError, ConfigResult},
    settings::load_from_env,
};
use serde::Deserialize;

/// Default session lifespan in seconds (24 hours)
const DEFAULT_LIFESPAN_SECS: i64 = 86_400;
/// Default number of random bytes per token
const DEFAULT_TOKEN_BYTES: i64 = 32;
/// Tokens shorter than this are refused
const MIN_TOKEN_BYTES: usize = 16;
const MAX_TOKEN_BYTES: usize = 512;

/// Session configuration
///
/// Construct with [`SessionConfig::new`] or [`SessionConfig::from_env`]; the
/// constructors reject values that would break the session invariants
/// (a zero lifespan would make `expires_at == authenticated_at`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    lifespan: TimeDelta,
    earliest_possible_extend: Option<TimeDelta>,
    token_bytes: usize,
}

/// Raw settings as read from the environment
#[derive(Debug, Deserialize)]
struct RawSessionConfig {
    lifespan_secs: i64,
    earliest_possible_extend_secs: Option<i64>,
    token_bytes: i64,
}

impl SessionConfig {
    /// Create a configuration with the given lifespan and default token size
    pub fn new(lifespan: TimeDelta) -> ConfigResult<Self> {
        if lifespan <= TimeDelta::zero() {
            return Err(ConfigError::invalid("lifespan", "must be greater than zero"));
        }

        Ok(Self {
            lifespan,
            earliest_possible_extend: None,
            token_bytes: DEFAULT_TOKEN_BYTES as usize,
        })
    }

    /// Only allow refreshing once the session is within `window` of expiring
    pub fn with_earliest_possible_extend(mut self, window: TimeDelta) -> ConfigResult<Self> {
        if window < TimeDelta::zero() {
            return Err(ConfigError::invalid(
                "earliest_possible_extend",
                "must not be negative",
            ));
        }

        self.earliest_possible_extend = Some(window);
        Ok(self)
    }

    /// Set the number of random bytes drawn for each token
    pub fn with_token_bytes(mut self, token_bytes: usize) -> ConfigResult<Self> {
        if !(MIN_TOKEN_BYTES..=MAX_TOKEN_BYTES).contains(&token_bytes) {
            return Err(ConfigError::invalid(
                "token_bytes",
                format!("must be between {} and {}", MIN_TOKEN_BYTES, MAX_TOKEN_BYTES),
            ));
        }

        self.token_bytes = token_bytes;
        Ok(self)
    }

    /// Create a new SessionConfig from environment variables
    ///
    /// # Environment Variables
    /// - `SESSION_LIFESPAN_SECS`: Session lifespan in seconds (default: 86400)
    /// - `SESSION_EARLIEST_POSSIBLE_EXTEND_SECS`: Refresh window before expiry in seconds (default: unset)
    /// - `SESSION_TOKEN_BYTES`: Random bytes per token (default: 32, minimum: 16)
    pub fn from_env() -> ConfigResult<Self> {
        let raw: RawSessionConfig = load_from_env(
            "SESSION",
            &[
                ("lifespan_secs", DEFAULT_LIFESPAN_SECS),
                ("token_bytes", DEFAULT_TOKEN_BYTES),
            ],
        )?;

        Self::from_raw(raw)
    }

    fn from_raw(raw: RawSessionConfig) -> ConfigResult<Self> {
        let lifespan = seconds("lifespan_secs", raw.lifespan_secs)?;
        let token_bytes = usize::try_from(raw.token_bytes)
            .map_err(|_| ConfigError::invalid("token_bytes", "must not be negative"))?;

        let config = Self::new(lifespan)?.with_token_bytes(token_bytes)?;
        match raw.earliest_possible_extend_secs {
            Some(secs) => config
                .with_earliest_possible_extend(seconds("earliest_possible_extend_secs", secs)?),
            None => Ok(config),
        }
    }

    /// How long a session stays usable after authentication or refresh
    pub fn lifespan(&self) -> TimeDelta {
        self.lifespan
    }

    /// Refresh window before expiry, `None` when refresh is always allowed
    pub fn earliest_possible_extend(&self) -> Option<TimeDelta> {
        self.earliest_possible_extend
    }

    /// Number of random bytes drawn for each token
    pub fn token_bytes(&self) -> usize {
        self.token_bytes
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            lifespan: TimeDelta::seconds(DEFAULT_LIFESPAN_SECS),
            earliest_possible_extend: None,
            token_bytes: DEFAULT_TOKEN_BYTES as usize,
        }
    }
}

fn seconds(key: &str, secs: i64) -> ConfigResult<TimeDelta> {
    TimeDelta::try_seconds(secs).ok_or_else(|| ConfigError::invalid(key, "out of range"))
}
