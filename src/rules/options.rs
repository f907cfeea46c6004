//! Parsed option values.
//!
//! Options arrive as strings from the host's configuration store. They are
//! parsed once, when set, into the types below; evaluation never re-splits
//! or re-parses a string and can therefore never fail on a bad value.

use std::fmt;

use fancy_regex::Regex;
use tracing::warn;

use crate::common::error::{ConfigError, ConfigResult};

/// Marks a deny entry in a dual list.
pub const DENY_MARKER: char = '!';

/// Ascensions and wishes are always worth seeing.
pub const DEFAULT_ALWAYS_SHOW_EVENTS: [&str; 2] = [
    r"^ascended",
    r#"^(?:wished for|made (?:his|her|their) first(?: artifact)? wish -) ""#,
];

/// Split a comma-delimited option value.
///
/// `\,` yields a literal comma; any other backslash is kept as is so regex
/// escapes survive. Entries are trimmed and empty entries dropped.
pub fn split_list(value: &str) -> Vec<String> {
    let mut entries = Vec::new();
    let mut current = String::new();
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&',') => {
                current.push(',');
                chars.next();
            }
            ',' => entries.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    entries.push(current);

    entries
        .into_iter()
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .collect()
}

/// A numeric show threshold that may be switched off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Threshold(Option<u64>);

impl Threshold {
    pub const fn disabled() -> Self {
        Threshold(None)
    }

    pub const fn at(min: u64) -> Self {
        Threshold(Some(min))
    }

    /// Parse an option value. Blank disables the threshold.
    pub fn parse(field: &str, value: &str) -> ConfigResult<Self> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(Self::disabled());
        }
        if value.starts_with('-') {
            return Err(ConfigError::invalid(
                field,
                format!("'{}' is negative (leave the value empty to disable)", value),
            ));
        }
        value
            .parse::<u64>()
            .map(Self::at)
            .map_err(|_| ConfigError::invalid(field, format!("'{}' is not a whole number", value)))
    }

    pub fn value(&self) -> Option<u64> {
        self.0
    }

    /// `true` when enabled and `value` reaches the threshold (inclusive).
    pub fn reached_by(&self, value: u64) -> bool {
        matches!(self.0, Some(min) if value >= min)
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(min) => write!(f, "{}", min),
            None => f.write_str("disabled"),
        }
    }
}

/// An allow list and a deny list sharing one option.
///
/// `qt, !spammer` allows `qt` and denies `spammer`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DualList {
    allow: Vec<String>,
    deny: Vec<String>,
}

impl DualList {
    pub fn parse(value: &str) -> Self {
        Self::from_entries(split_list(value))
    }

    /// Build from already separated entries (e.g. a config file array).
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = DualList::default();
        for entry in entries {
            let entry = entry.as_ref().trim();
            let (target, name) = match entry.strip_prefix(DENY_MARKER) {
                Some(name) => (&mut list.deny, name.trim()),
                None => (&mut list.allow, entry),
            };
            if !name.is_empty() && !target.iter().any(|n| n == name) {
                target.push(name.to_string());
            }
        }
        list
    }

    pub fn allows(&self, name: &str) -> bool {
        self.allow.iter().any(|n| n == name)
    }

    pub fn denies(&self, name: &str) -> bool {
        self.deny.iter().any(|n| n == name)
    }

    pub fn allowed(&self) -> &[String] {
        &self.allow
    }

    pub fn denied(&self) -> &[String] {
        &self.deny
    }

    pub fn is_empty(&self) -> bool {
        self.allow.is_empty() && self.deny.is_empty()
    }
}

/// A compiled regex pattern with its original string for debugging.
#[derive(Debug, Clone)]
struct CompiledPattern {
    original: String,
    regex: Regex,
}

/// Ordered list of event patterns that force a line to be shown.
#[derive(Debug, Clone, Default)]
pub struct PatternList {
    patterns: Vec<CompiledPattern>,
}

impl PatternList {
    pub fn parse(field: &str, value: &str) -> ConfigResult<Self> {
        Self::from_entries(field, split_list(value))
    }

    /// Compile every entry. One invalid pattern rejects the whole value.
    pub fn from_entries<I, S>(field: &str, entries: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut patterns = Vec::new();
        for entry in entries {
            let original = entry.as_ref().trim();
            if original.is_empty() {
                continue;
            }
            let regex = Regex::new(original).map_err(|e| {
                ConfigError::invalid(
                    field,
                    format!("'{}' is not a valid regex: {}", original, e),
                )
            })?;
            patterns.push(CompiledPattern {
                original: original.to_string(),
                regex,
            });
        }
        Ok(Self { patterns })
    }

    /// Ascension and wish patterns.
    pub fn defaults() -> Self {
        Self::from_entries("always_show_events", DEFAULT_ALWAYS_SHOW_EVENTS)
            .unwrap_or_default()
    }

    /// First pattern (in list order) found anywhere in `text`.
    pub fn first_match(&self, text: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|p| {
                p.regex.is_match(text).unwrap_or_else(|e| {
                    warn!("Regex match error for pattern '{}': {}", p.original, e);
                    false
                })
            })
            .map(|p| p.original.as_str())
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list_trims_and_drops_empty() {
        assert_eq!(split_list(" qt , ,bob,"), vec!["qt", "bob"]);
        assert!(split_list("").is_empty());
        assert!(split_list(" , ").is_empty());
    }

    #[test]
    fn test_split_list_escaped_comma() {
        assert_eq!(split_list(r"a\,b,c"), vec!["a,b", "c"]);
        // Other escapes are left for the regex engine.
        assert_eq!(split_list(r"^\d+ turns,x"), vec![r"^\d+ turns", "x"]);
    }

    #[test]
    fn test_threshold_parse() {
        assert_eq!(Threshold::parse("min_turn", "20000").unwrap(), Threshold::at(20000));
        assert_eq!(Threshold::parse("min_turn", " 5 ").unwrap(), Threshold::at(5));
        assert_eq!(Threshold::parse("min_turn", "").unwrap(), Threshold::disabled());
        assert_eq!(Threshold::parse("min_turn", "   ").unwrap(), Threshold::disabled());
    }

    #[test]
    fn test_threshold_rejects_bad_values() {
        let err = Threshold::parse("min_points", "lots").unwrap_err();
        assert!(err.to_string().contains("min_points"));
        assert!(err.to_string().contains("not a whole number"));

        let err = Threshold::parse("min_points", "-1").unwrap_err();
        assert!(err.to_string().contains("negative"));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let t = Threshold::at(100);
        assert!(t.reached_by(100));
        assert!(t.reached_by(101));
        assert!(!t.reached_by(99));
        assert!(!Threshold::disabled().reached_by(u64::MAX));
    }

    #[test]
    fn test_dual_list_split() {
        let list = DualList::parse("qt, !spammer, ! troll ,bob");
        assert_eq!(list.allowed(), ["qt", "bob"]);
        assert_eq!(list.denied(), ["spammer", "troll"]);
        assert!(list.allows("qt"));
        assert!(list.denies("troll"));
        assert!(!list.allows("spammer"));
    }

    #[test]
    fn test_dual_list_ignores_empty_and_duplicate_entries() {
        let list = DualList::parse("!, bob, bob, !");
        assert_eq!(list.allowed(), ["bob"]);
        assert!(list.denied().is_empty());
        assert!(!list.allows(""));
    }

    #[test]
    fn test_dual_list_matching_is_exact() {
        let list = DualList::parse("Bob");
        assert!(!list.allows("bob"));
        assert!(!list.allows("Bobby"));
    }

    #[test]
    fn test_default_patterns() {
        let patterns = PatternList::defaults();
        assert_eq!(patterns.len(), 2);
        assert!(patterns.first_match("ascended").is_some());
        assert!(patterns
            .first_match("wished for \"blessed +2 gray dragon scale mail\"")
            .is_some());
        assert!(patterns
            .first_match("made her first artifact wish - \"Excalibur\"")
            .is_some());
        assert!(patterns.first_match("killed by a grid bug").is_none());
        assert!(patterns.first_match("killed by an ascended being").is_none());
    }

    #[test]
    fn test_pattern_list_order() {
        let patterns = PatternList::parse("always_show_events", "Medusa,killed").unwrap();
        assert_eq!(patterns.first_match("killed Medusa"), Some("Medusa"));
        assert_eq!(patterns.first_match("killed by a newt"), Some("killed"));
    }

    #[test]
    fn test_invalid_pattern_rejects_value() {
        let err = PatternList::parse("always_show_events", "ok,[invalid").unwrap_err();
        assert!(err.to_string().contains("not a valid regex"));
    }
}
