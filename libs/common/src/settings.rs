//! Environment-driven settings loading
//!
//! Services describe their settings as a plain `Deserialize` struct and
//! load it here: in-code defaults first, then `<PREFIX>_<KEY>` environment
//! variables on top.

use config::{Config, Environment};
use serde::de::DeserializeOwned;

use crate::error::{ConfigError, ConfigResult};

/// A default value applied before environment overrides
pub type SettingDefault<'a> = (&'a str, i64);

/// Load settings of type `T` from the environment
///
/// # Arguments
///
/// * `prefix` - Environment variable prefix, e.g. `SESSION` for `SESSION_LIFESPAN_SECS`
/// * `defaults` - Key/value pairs used when the variable is not set
///
/// # Returns
///
/// * `ConfigResult<T>` - The deserialized settings or a configuration error
pub fn load_from_env<T: DeserializeOwned>(
    prefix: &str,
    defaults: &[SettingDefault<'_>],
) -> ConfigResult<T> {
    let mut builder = Config::builder();
    for (key, value) in defaults {
        builder = builder
            .set_default(*key, *value)
            .map_err(ConfigError::Source)?;
    }

    builder
        .add_source(Environment::with_prefix(prefix).try_parsing(true))
        .build()
        .and_then(|config| config.try_deserialize())
        .map_err(ConfigError::Source)
}
