//! Configuration validation.
//!
//! Turns the file configuration into engine types and reports every
//! problem found in one error.

use crate::bridge::sources::SourceBindings;
use crate::common::error::ConfigError;
use crate::config::types::{Config, ListValue, RulesConfig};
use crate::rules::{DualList, OptionKey, PatternList, RuleConfig};

/// Build the initial rule configuration from the `rules` section.
pub fn build_rule_config(rules: Option<&RulesConfig>) -> Result<RuleConfig, ConfigError> {
    let mut config = RuleConfig::default();
    let Some(rules) = rules else {
        return Ok(config);
    };
    let mut errors = Vec::new();

    for (key, value) in [
        (OptionKey::MinTurn, &rules.min_turn),
        (OptionKey::MinPoints, &rules.min_points),
    ] {
        if let Some(value) = value {
            if let Err(e) = config.apply(key, &value.as_option_value()) {
                errors.push(e.to_string());
            }
        }
    }

    if let Some(ref users) = rules.show_users {
        config.show_users = dual_list(users);
    }
    if let Some(ref variants) = rules.show_variants {
        config.show_variants = dual_list(variants);
    }

    if let Some(ref patterns) = rules.always_show_events {
        let field = OptionKey::AlwaysShowEvents.name();
        let compiled = match patterns {
            ListValue::Items(items) => PatternList::from_entries(field, items),
            ListValue::Text(text) => PatternList::parse(field, text),
        };
        match compiled {
            Ok(list) => config.always_show_events = list,
            Err(e) => errors.push(e.to_string()),
        }
    }

    if let Some(ref name) = rules.buffer_name {
        config.buffer_name = name.trim().to_string();
    }

    if errors.is_empty() {
        Ok(config)
    } else {
        Err(ConfigError::ValidationError {
            message: errors.join("\n"),
        })
    }
}

fn dual_list(value: &ListValue) -> DualList {
    match value {
        ListValue::Items(items) => DualList::from_entries(items),
        ListValue::Text(text) => DualList::parse(text),
    }
}

/// Build the announcer bindings, falling back to the built-in set.
pub fn build_source_bindings(config: &Config) -> Result<SourceBindings, ConfigError> {
    let Some(ref sources) = config.sources else {
        return Ok(SourceBindings::default());
    };
    let bindings = SourceBindings::from_config(sources)?;
    if bindings.is_empty() {
        return Err(ConfigError::ValidationError {
            message: "sources is empty - no announcers would be filtered".to_string(),
        });
    }
    Ok(bindings)
}

/// Validate a configuration and return detailed errors.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    if let Err(e) = build_rule_config(config.rules.as_ref()) {
        errors.push(e.to_string());
    }
    if let Err(e) = build_source_bindings(config) {
        errors.push(e.to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            message: errors.join("\n"),
        })
    }
}
