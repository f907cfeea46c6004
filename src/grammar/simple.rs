//! Plain announcer format: death/score lines only.
//!
//! ```text
//! [3.6.6] bob (Val Hum Fem Law), 500 points, T:100, killed by a grid bug
//! bob (Val Hum Fem Law), 500 points, T:100, killed by a grid bug
//! ```

use fancy_regex::Regex;

use super::record::{capture_count, capture_text, EventDetail, EventRecord, Role};
use super::{match_line, Grammar, DEATH_TAIL, FMT, ROLE};

#[derive(Debug, Clone)]
pub struct SimpleGrammar {
    pattern: Regex,
}

impl Default for SimpleGrammar {
    fn default() -> Self {
        Self::new()
    }
}

impl SimpleGrammar {
    pub fn new() -> Self {
        let pattern = [
            "^",
            FMT,
            r"(?:\[",
            FMT,
            r"(?P<variant>[^\]\x00-\x1f]*)",
            FMT,
            r"\] )?",
            r"(?P<user>[^\s()\x00-\x1f]+) ",
            ROLE,
            DEATH_TAIL,
        ]
        .concat();

        Self {
            pattern: Regex::new(&pattern).unwrap(),
        }
    }
}

impl Grammar for SimpleGrammar {
    fn parse(&self, line: &str) -> Option<EventRecord> {
        let caps = match_line("simple", &self.pattern, line)?;

        Some(EventRecord {
            user: capture_text(&caps, "user"),
            variant: capture_text(&caps, "variant"),
            role: Role::from_captures(&caps),
            detail: EventDetail::DeathOrScore {
                points: capture_count(&caps, "points"),
                end_turn: capture_count(&caps, "endturn"),
                reason: capture_text(&caps, "reason"),
            },
        })
    }
}
