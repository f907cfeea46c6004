//! Rule configuration snapshots and the store that owns them.
//!
//! The host notifies us of option changes one key at a time. Each accepted
//! change produces a new immutable `RuleConfig` snapshot; evaluations hold an
//! `Arc` to whichever snapshot was current when they started.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::common::error::ConfigResult;
use crate::rules::options::{DualList, PatternList, Threshold};

pub const DEFAULT_MIN_TURN: u64 = 20000;
pub const DEFAULT_MIN_POINTS: u64 = 40000;
pub const DEFAULT_BUFFER_NAME: &str = "behold_less";

/// Option names understood by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKey {
    MinTurn,
    MinPoints,
    ShowUsers,
    ShowVariants,
    AlwaysShowEvents,
    BufferName,
}

impl OptionKey {
    pub const ALL: [OptionKey; 6] = [
        OptionKey::MinTurn,
        OptionKey::MinPoints,
        OptionKey::ShowUsers,
        OptionKey::ShowVariants,
        OptionKey::AlwaysShowEvents,
        OptionKey::BufferName,
    ];

    /// Look up a key by name.
    ///
    /// Fully qualified host names (`plugins.var.python.behold_less.min_turn`)
    /// are reduced to their last component. The older `always_show_users` and
    /// `always_show_variants` names are still accepted.
    pub fn from_name(name: &str) -> Option<Self> {
        let short = name.rsplit('.').next().unwrap_or(name).trim();
        if let Some(key) = OptionKey::ALL.into_iter().find(|k| k.name() == short) {
            return Some(key);
        }
        match short {
            "always_show_users" => {
                warn!("Option 'always_show_users' is deprecated, use 'show_users'");
                Some(OptionKey::ShowUsers)
            }
            "always_show_variants" => {
                warn!("Option 'always_show_variants' is deprecated, use 'show_variants'");
                Some(OptionKey::ShowVariants)
            }
            "always_show_wishes" => {
                warn!(
                    "Option 'always_show_wishes' is no longer supported, \
                     edit the wish pattern in 'always_show_events' instead"
                );
                None
            }
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OptionKey::MinTurn => "min_turn",
            OptionKey::MinPoints => "min_points",
            OptionKey::ShowUsers => "show_users",
            OptionKey::ShowVariants => "show_variants",
            OptionKey::AlwaysShowEvents => "always_show_events",
            OptionKey::BufferName => "buffer_name",
        }
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything the rule engine reads.
#[derive(Debug, Clone)]
pub struct RuleConfig {
    pub min_turn: Threshold,
    pub min_points: Threshold,
    pub show_users: DualList,
    pub show_variants: DualList,
    pub always_show_events: PatternList,
    /// Container for redirected lines; empty hides them instead.
    pub buffer_name: String,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            min_turn: Threshold::at(DEFAULT_MIN_TURN),
            min_points: Threshold::at(DEFAULT_MIN_POINTS),
            show_users: DualList::default(),
            show_variants: DualList::default(),
            always_show_events: PatternList::defaults(),
            buffer_name: DEFAULT_BUFFER_NAME.to_string(),
        }
    }
}

impl RuleConfig {
    /// Parse `value` for `key` and store it. On error `self` is untouched.
    pub fn apply(&mut self, key: OptionKey, value: &str) -> ConfigResult<()> {
        let field = key.name();
        match key {
            OptionKey::MinTurn => self.min_turn = Threshold::parse(field, value)?,
            OptionKey::MinPoints => self.min_points = Threshold::parse(field, value)?,
            OptionKey::ShowUsers => self.show_users = DualList::parse(value),
            OptionKey::ShowVariants => self.show_variants = DualList::parse(value),
            OptionKey::AlwaysShowEvents => {
                self.always_show_events = PatternList::parse(field, value)?
            }
            OptionKey::BufferName => self.buffer_name = value.trim().to_string(),
        }
        Ok(())
    }

    /// `true` when redirected lines are hidden rather than moved.
    pub fn hides_redirected(&self) -> bool {
        self.buffer_name.is_empty()
    }
}

/// Result of a change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    /// The value was accepted; the store is now at this version.
    Applied { version: u64 },
    /// Not one of our keys.
    Ignored,
}

/// Owner of the current rule configuration.
#[derive(Debug)]
pub struct ConfigStore {
    current: Arc<RuleConfig>,
    version: u64,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(RuleConfig::default())
    }
}

impl ConfigStore {
    pub fn new(config: RuleConfig) -> Self {
        Self {
            current: Arc::new(config),
            version: 1,
        }
    }

    /// Snapshot to evaluate against. Later updates do not affect it.
    pub fn snapshot(&self) -> Arc<RuleConfig> {
        Arc::clone(&self.current)
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Handle a change notification for `key`.
    ///
    /// Invalid values are rejected and the previous value stays in effect.
    /// Unknown keys are ignored.
    pub fn set(&mut self, key: &str, value: &str) -> ConfigResult<SetOutcome> {
        let Some(option) = OptionKey::from_name(key) else {
            debug!("Ignoring change to unknown option '{}'", key);
            return Ok(SetOutcome::Ignored);
        };

        let mut next = RuleConfig::clone(&self.current);
        if let Err(e) = next.apply(option, value) {
            warn!("Rejected {} = {:?}, keeping previous value: {}", option, value, e);
            return Err(e);
        }

        self.current = Arc::new(next);
        self.version += 1;
        info!("Option {} set to {:?} (config v{})", option, value, self.version);

        Ok(SetOutcome::Applied {
            version: self.version,
        })
    }
}
