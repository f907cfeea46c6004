//! Rule configuration and evaluation.
//!
//! - `options`: parsed option value types (thresholds, dual lists, patterns)
//! - `store`: versioned configuration snapshots
//! - `engine`: the show/redirect decision procedure

pub mod engine;
pub mod options;
pub mod store;

pub use engine::{evaluate, Decision};
pub use options::{DualList, PatternList};
pub use store::{ConfigStore, OptionKey, RuleConfig, SetOutcome};
