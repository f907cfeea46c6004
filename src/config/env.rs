//! Environment variable overrides for configuration.
//!
//! Supports overriding rule options with environment variables:
//! - `BEHOLD_LESS_MIN_TURN` - turn threshold (empty disables)
//! - `BEHOLD_LESS_MIN_POINTS` - points threshold (empty disables)
//! - `BEHOLD_LESS_BUFFER_NAME` - redirect buffer (empty hides lines)
//!
//! Overrides go through the same validation as any other option change.

use std::env;

use tracing::error;

use crate::rules::{ConfigStore, OptionKey};

/// Environment variable prefix for all config overrides.
const ENV_PREFIX: &str = "BEHOLD_LESS";

const OVERRIDABLE: [OptionKey; 3] = [
    OptionKey::MinTurn,
    OptionKey::MinPoints,
    OptionKey::BufferName,
];

fn env_var_name(key: OptionKey) -> String {
    format!("{}_{}", ENV_PREFIX, key.name().to_uppercase())
}

/// Apply environment variable overrides to the store.
pub fn apply_env_overrides(store: &mut ConfigStore) {
    apply_overrides_from(store, |name| env::var(name).ok());
}

/// Apply overrides from any variable source. Invalid values are logged and
/// leave the option unchanged.
pub fn apply_overrides_from<F>(store: &mut ConfigStore, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    for key in OVERRIDABLE {
        let var = env_var_name(key);
        if let Some(value) = lookup(&var) {
            if let Err(e) = store.set(key.name(), &value) {
                error!("Ignoring {}: {}", var, e);
            }
        }
    }
}

/// Get the config file path from environment or use default.
///
/// Checks `BEHOLD_LESS_CONFIG` environment variable, otherwise returns "behold-less.conf".
pub fn get_config_path() -> String {
    env::var(format!("{}_CONFIG", ENV_PREFIX)).unwrap_or_else(|_| "behold-less.conf".to_string())
}
