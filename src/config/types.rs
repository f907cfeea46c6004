//! Configuration file type definitions.

use serde::Deserialize;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Log every decision with the rule that produced it.
    #[serde(default)]
    pub debug: bool,
    pub rules: Option<RulesConfig>,
    /// Announcer bindings; the built-in set is used when absent.
    pub sources: Option<Vec<SourceConfig>>,
}

/// Initial values for the rule options.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RulesConfig {
    pub min_turn: Option<ScalarValue>,
    pub min_points: Option<ScalarValue>,
    pub show_users: Option<ListValue>,
    pub show_variants: Option<ListValue>,
    pub always_show_events: Option<ListValue>,
    pub buffer_name: Option<String>,
}

/// A threshold written either as a number or as a string (`""` disables).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Number(i64),
    Text(String),
}

impl ScalarValue {
    /// The value as the host would store it.
    pub fn as_option_value(&self) -> String {
        match self {
            ScalarValue::Number(n) => n.to_string(),
            ScalarValue::Text(s) => s.clone(),
        }
    }
}

/// A list written either as an array or as a comma-delimited string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ListValue {
    Items(Vec<String>),
    Text(String),
}

/// Binds an announcer to a grammar.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Room the announcer posts in; absent for announcers active in many rooms.
    pub room: Option<String>,
    /// Announcer nick.
    pub announcer: String,
    /// "extended", "simple" or "achievement".
    pub grammar: String,
    /// Rooms where redirect containers may be created (absent = any room).
    pub redirect_rooms: Option<Vec<String>>,
}
