//! Structured form of a parsed announcement.

use std::fmt;

use fancy_regex::Captures;

/// `reason_text()` of an achievement record that carries no label.
pub const NEW_USER_REGISTRATION: &str = "new user registration";

/// `reason_text()` of a seed announcement.
pub const SEED_ANNOUNCEMENT: &str = "seed announcement";

/// Which grammar family produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    DeathOrScore,
    Milestone,
    Achievement,
}

/// Character role tuple, e.g. `(Val Hum Fem Law)`. Descriptive only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Role {
    pub class: String,
    pub race: String,
    pub gender: String,
    pub alignment: String,
}

impl Role {
    pub(crate) fn from_captures(caps: &Captures) -> Self {
        Self {
            class: capture_text(caps, "class"),
            race: capture_text(caps, "race"),
            gender: capture_text(caps, "gender"),
            alignment: capture_text(caps, "alignment"),
        }
    }
}

impl fmt::Display for Role {
    /// `(Val Hum Fem Law)`, leaving out missing parts.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = [&self.class, &self.race, &self.gender, &self.alignment]
            .into_iter()
            .map(String::as_str)
            .filter(|p| !p.is_empty())
            .collect();
        write!(f, "({})", parts.join(" "))
    }
}

/// Kind-specific part of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventDetail {
    /// A game ended (death, quit, escape, ascension).
    DeathOrScore {
        points: u64,
        end_turn: u64,
        reason: String,
    },
    /// Something notable happened mid-game. Points are never reported.
    Milestone { event_turn: u64, event: String },
    /// An achievement unlock, or a new user registration when `label` is `None`.
    Achievement { label: Option<String> },
}

/// One successfully parsed announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    /// Canonical player name, never empty.
    pub user: String,
    /// Ruleset identifier, empty when the line carries none.
    pub variant: String,
    pub role: Role,
    pub detail: EventDetail,
}

impl EventRecord {
    pub fn source_kind(&self) -> SourceKind {
        match self.detail {
            EventDetail::DeathOrScore { .. } => SourceKind::DeathOrScore,
            EventDetail::Milestone { .. } => SourceKind::Milestone,
            EventDetail::Achievement { .. } => SourceKind::Achievement,
        }
    }

    /// Final score; 0 for anything but a death or score line.
    pub fn points(&self) -> u64 {
        match self.detail {
            EventDetail::DeathOrScore { points, .. } => points,
            _ => 0,
        }
    }

    /// `end_turn` for deaths, `event_turn` for milestones, 0 for achievements.
    pub fn turn(&self) -> u64 {
        match self.detail {
            EventDetail::DeathOrScore { end_turn, .. } => end_turn,
            EventDetail::Milestone { event_turn, .. } => event_turn,
            EventDetail::Achievement { .. } => 0,
        }
    }

    /// Free text the always-show patterns are matched against.
    pub fn reason_text(&self) -> &str {
        match &self.detail {
            EventDetail::DeathOrScore { reason, .. } => reason,
            EventDetail::Milestone { event, .. } => event,
            EventDetail::Achievement { label: Some(label) } => label,
            EventDetail::Achievement { label: None } => NEW_USER_REGISTRATION,
        }
    }

    pub fn achievement_label(&self) -> Option<&str> {
        match &self.detail {
            EventDetail::Achievement { label } => label.as_deref(),
            _ => None,
        }
    }

    pub fn is_registration(&self) -> bool {
        matches!(self.detail, EventDetail::Achievement { label: None })
    }
}

/// Text of a named group, or an empty string when it did not participate.
pub(crate) fn capture_text(caps: &Captures, name: &str) -> String {
    caps.name(name)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Numeric value of a digit-only group.
///
/// Absent or empty captures are 0. Values beyond `u64` saturate rather than
/// wrap, so an absurd score still clears any threshold.
pub(crate) fn capture_count(caps: &Captures, name: &str) -> u64 {
    match caps.name(name).map(|m| m.as_str()) {
        None | Some("") => 0,
        Some(digits) => digits.parse().unwrap_or(u64::MAX),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(detail: EventDetail) -> EventRecord {
        EventRecord {
            user: "bob".to_string(),
            variant: String::new(),
            role: Role::default(),
            detail,
        }
    }

    #[test]
    fn test_milestone_has_no_points() {
        let rec = record(EventDetail::Milestone {
            event_turn: 4321,
            event: "entered the Gnomish Mines".to_string(),
        });
        assert_eq!(rec.source_kind(), SourceKind::Milestone);
        assert_eq!(rec.points(), 0);
        assert_eq!(rec.turn(), 4321);
        assert_eq!(rec.reason_text(), "entered the Gnomish Mines");
    }

    #[test]
    fn test_role_display_skips_missing_parts() {
        let role = Role {
            class: "Val".to_string(),
            race: String::new(),
            gender: "Fem".to_string(),
            alignment: String::new(),
        };
        assert_eq!(role.to_string(), "(Val Fem)");
    }

    #[test]
    fn test_registration_reason_is_sentinel() {
        let rec = record(EventDetail::Achievement { label: None });
        assert!(rec.is_registration());
        assert_eq!(rec.reason_text(), NEW_USER_REGISTRATION);
        assert_eq!(rec.achievement_label(), None);
    }

    #[test]
    fn test_capture_count_defaults_and_saturation() {
        let re = fancy_regex::Regex::new(r"^(?P<n>[0-9]*)(?P<m>x)?$").unwrap();

        let caps = re.captures("").unwrap().unwrap();
        assert_eq!(capture_count(&caps, "n"), 0);
        assert_eq!(capture_count(&caps, "m"), 0);

        let caps = re.captures("99999999999999999999999").unwrap().unwrap();
        assert_eq!(capture_count(&caps, "n"), u64::MAX);

        let caps = re.captures("1234").unwrap().unwrap();
        assert_eq!(capture_count(&caps, "n"), 1234);
    }
}
