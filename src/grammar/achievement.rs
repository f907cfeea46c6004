//! Achievement announcer format.
//!
//! ```text
//! New user registered: bob
//! [tnnt] Achievement unlocked by bob: "Entered the Gnomish Mines"
//! ```

use fancy_regex::Regex;

use super::record::{capture_text, EventDetail, EventRecord, Role};
use super::{match_line, Grammar, FMT};

#[derive(Debug, Clone)]
pub struct AchievementGrammar {
    pattern: Regex,
}

impl Default for AchievementGrammar {
    fn default() -> Self {
        Self::new()
    }
}

impl AchievementGrammar {
    pub fn new() -> Self {
        let pattern = [
            "^",
            FMT,
            r"(?:\[[^\]]*\]",
            FMT,
            " )?",
            "(?:",
            r"(?i:new (?:user|player) registered):? ",
            FMT,
            r"(?P<newuser>[^\s!\x00-\x1f]+?)",
            "|",
            r"(?i:achievement unlocked by) ",
            FMT,
            r"(?P<user>[^\s:\x00-\x1f]+)",
            FMT,
            r#": "?(?P<achievement>[^"]+?)"?"#,
            ")",
            FMT,
            r"[.!]?\s*$",
        ]
        .concat();

        Self {
            pattern: Regex::new(&pattern).unwrap(),
        }
    }
}

impl Grammar for AchievementGrammar {
    fn parse(&self, line: &str) -> Option<EventRecord> {
        let caps = match_line("achievement", &self.pattern, line)?;

        let (user, label) = match caps.name("newuser") {
            Some(m) => (m.as_str().to_string(), None),
            None => (
                capture_text(&caps, "user"),
                Some(capture_text(&caps, "achievement")),
            ),
        };

        Some(EventRecord {
            user,
            variant: String::new(),
            role: Role::default(),
            detail: EventDetail::Achievement { label },
        })
    }
}
