//! Configuration parsing and types.

pub mod env;
pub mod parser;
pub mod types;
pub mod validate;

use std::path::Path;

use tracing::info;

use crate::bridge::sources::SourceBindings;
use crate::common::error::ConfigError;
use crate::rules::RuleConfig;

pub use parser::load_config;
pub use types::*;

/// Everything needed to start filtering.
#[derive(Debug)]
pub struct Settings {
    pub debug: bool,
    pub rules: RuleConfig,
    pub sources: SourceBindings,
}

/// Build settings from a parsed configuration.
pub fn settings_from(config: &Config) -> Result<Settings, ConfigError> {
    validate::validate_config(config)?;
    Ok(Settings {
        debug: config.debug,
        rules: validate::build_rule_config(config.rules.as_ref())?,
        sources: validate::build_source_bindings(config)?,
    })
}

/// Load and validate the configuration file. A missing file means defaults.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<Settings, ConfigError> {
    let path = path.as_ref();
    let config = if path.exists() {
        load_config(path)?
    } else {
        info!("No config file at {}, using defaults", path.display());
        Config::default()
    };
    settings_from(&config)
}
