//! Show/redirect decisions.
//!
//! `evaluate` is a pure function of one record and one config snapshot. Rules
//! are tried in a fixed order and the first one that fires decides.

use std::fmt;

use crate::grammar::{EventRecord, SourceKind};
use crate::rules::store::RuleConfig;

/// Achievement label prefixes (travel and sightseeing) not worth a ping.
pub const LOW_VALUE_ACHIEVEMENT_PREFIXES: [&str; 2] = ["entered ", "visited "];

/// The rule that produced a decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    UserDenied,
    UserAllowed,
    VariantDenied,
    VariantAllowed,
    AlwaysShowEvent { pattern: String },
    TurnThreshold { turn: u64, min: u64 },
    PointsThreshold { points: u64, min: u64 },
    NothingNotable,
    NewUserRegistration,
    LowValueAchievement,
    Achievement,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::UserDenied => write!(f, "user denied"),
            Rule::UserAllowed => write!(f, "user allowed"),
            Rule::VariantDenied => write!(f, "variant denied"),
            Rule::VariantAllowed => write!(f, "variant allowed"),
            Rule::AlwaysShowEvent { pattern } => write!(f, "event matches '{}'", pattern),
            Rule::TurnThreshold { turn, min } => write!(f, "turn {} >= {}", turn, min),
            Rule::PointsThreshold { points, min } => write!(f, "points {} >= {}", points, min),
            Rule::NothingNotable => write!(f, "no show rule matched"),
            Rule::NewUserRegistration => write!(f, "new user registration"),
            Rule::LowValueAchievement => write!(f, "low-value achievement"),
            Rule::Achievement => write!(f, "achievement"),
        }
    }
}

/// Verdict for one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub show: bool,
    /// Container name for hidden lines; `Some("")` means drop them.
    pub redirect_target: Option<String>,
    pub rule: Rule,
}

impl Decision {
    fn show(rule: Rule) -> Self {
        Self {
            show: true,
            redirect_target: None,
            rule,
        }
    }

    fn redirect(rule: Rule, config: &RuleConfig) -> Self {
        Self {
            show: false,
            redirect_target: Some(config.buffer_name.clone()),
            rule,
        }
    }
}

/// Decide whether `record` is shown under `config`.
pub fn evaluate(record: &EventRecord, config: &RuleConfig) -> Decision {
    match record.source_kind() {
        SourceKind::Achievement => evaluate_achievement(record, config),
        SourceKind::DeathOrScore | SourceKind::Milestone => evaluate_game_event(record, config),
    }
}

fn evaluate_game_event(record: &EventRecord, config: &RuleConfig) -> Decision {
    // Deny beats allow for the same name.
    if config.show_users.denies(&record.user) {
        return Decision::redirect(Rule::UserDenied, config);
    }
    if config.show_users.allows(&record.user) {
        return Decision::show(Rule::UserAllowed);
    }
    if config.show_variants.denies(&record.variant) {
        return Decision::redirect(Rule::VariantDenied, config);
    }
    if config.show_variants.allows(&record.variant) {
        return Decision::show(Rule::VariantAllowed);
    }

    if let Some(pattern) = config.always_show_events.first_match(record.reason_text()) {
        return Decision::show(Rule::AlwaysShowEvent {
            pattern: pattern.to_string(),
        });
    }

    let turn = record.turn();
    if config.min_turn.reached_by(turn) {
        return Decision::show(Rule::TurnThreshold {
            turn,
            min: config.min_turn.value().unwrap_or_default(),
        });
    }

    // Always 0 for milestones.
    let points = record.points();
    if config.min_points.reached_by(points) {
        return Decision::show(Rule::PointsThreshold {
            points,
            min: config.min_points.value().unwrap_or_default(),
        });
    }

    Decision::redirect(Rule::NothingNotable, config)
}

fn evaluate_achievement(record: &EventRecord, config: &RuleConfig) -> Decision {
    if record.is_registration() {
        return Decision::redirect(Rule::NewUserRegistration, config);
    }

    if config.show_users.denies(&record.user) {
        return Decision::redirect(Rule::UserDenied, config);
    }
    if config.show_users.allows(&record.user) {
        return Decision::show(Rule::UserAllowed);
    }
    if record.achievement_label().is_some_and(is_low_value_achievement) {
        return Decision::redirect(Rule::LowValueAchievement, config);
    }

    Decision::show(Rule::Achievement)
}

fn is_low_value_achievement(label: &str) -> bool {
    let label = label.trim_start().to_lowercase();
    LOW_VALUE_ACHIEVEMENT_PREFIXES
        .iter()
        .any(|prefix| label.starts_with(prefix))
}
