//! Extended announcer format (death/score, milestone and seed lines).
//!
//! ```text
//! [hdf-us] [nh370] bob (Val Hum Fem Law), 500 points, T:100, killed by a grid bug
//! [hdf-us] [nh370] bob (Val Hum Fem Law) wished for "blessed +2 gray dragon scale mail", on T:8123
//! [hdf-us] [nh370] bob (Val Hum Fem Law) started with seed 1234567
//! ```
//!
//! The leading brackets usually carry IRC colour codes; those are part of
//! the pattern but never of the captured fields.

use fancy_regex::Regex;

use super::record::{capture_count, capture_text, EventDetail, EventRecord, Role, SEED_ANNOUNCEMENT};
use super::{match_line, Grammar, DEATH_TAIL, FMT, ROLE};

/// ` wished for "...", on T:8123` with optional trailing tags.
const MILESTONE_TAIL: &str = r" (?P<event>.*?),? on T:(?P<eventturn>[0-9]*)";

/// ` started with seed 1234567`
const SEED_TAIL: &str =
    r" (?:has )?(?:set|started with|is playing with) (?:the |a )?seed:? (?P<seed>\S+)";

/// Grammar for the primary and secondary death/milestone announcers.
#[derive(Debug, Clone)]
pub struct ExtendedGrammar {
    pattern: Regex,
}

impl Default for ExtendedGrammar {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtendedGrammar {
    pub fn new() -> Self {
        let pattern = [
            "^",
            FMT,
            r"\[[^\]]*\]",
            FMT,
            " ",
            FMT,
            r"\[",
            FMT,
            r"(?P<variant>[^\]\x00-\x1f]*)",
            FMT,
            r"\] ",
            r"(?P<user>[^\s()\x00-\x1f]+)(?: \((?P<trueuser>[^\s()]+)\))? ",
            ROLE,
            "(?:",
            DEATH_TAIL,
            "|",
            MILESTONE_TAIL,
            "|",
            SEED_TAIL,
            ")",
        ]
        .concat();

        Self {
            pattern: Regex::new(&pattern).unwrap(),
        }
    }
}

impl Grammar for ExtendedGrammar {
    fn parse(&self, line: &str) -> Option<EventRecord> {
        let caps = match_line("extended", &self.pattern, line)?;

        // The parenthesized name, when given, is the account the game ran under.
        let user = caps
            .name("trueuser")
            .or_else(|| caps.name("user"))
            .map(|m| m.as_str().to_string())?;

        let detail = if caps.name("endturn").is_some() {
            EventDetail::DeathOrScore {
                points: capture_count(&caps, "points"),
                end_turn: capture_count(&caps, "endturn"),
                reason: capture_text(&caps, "reason"),
            }
        } else if caps.name("eventturn").is_some() {
            EventDetail::Milestone {
                event_turn: capture_count(&caps, "eventturn"),
                event: capture_text(&caps, "event"),
            }
        } else {
            EventDetail::Milestone {
                event_turn: 0,
                event: SEED_ANNOUNCEMENT.to_string(),
            }
        };

        Some(EventRecord {
            user,
            variant: capture_text(&caps, "variant"),
            role: Role::from_captures(&caps),
            detail,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::SourceKind;

    fn parse(line: &str) -> Option<EventRecord> {
        ExtendedGrammar::new().parse(line)
    }

    #[test]
    fn test_death_line() {
        let rec = parse(
            "[Wed Jan 01 00:00:00 2020] [ab12cNhAHC-DSoLu] bob (Val Hum Fem Law), 500 points, T:100, killed by a grid bug",
        )
        .unwrap();

        assert_eq!(rec.source_kind(), SourceKind::DeathOrScore);
        assert_eq!(rec.user, "bob");
        assert_eq!(rec.variant, "ab12cNhAHC-DSoLu");
        assert_eq!(rec.points(), 500);
        assert_eq!(rec.turn(), 100);
        assert_eq!(rec.reason_text(), "killed by a grid bug");
        assert_eq!(
            rec.role,
            Role {
                class: "Val".to_string(),
                race: "Hum".to_string(),
                gender: "Fem".to_string(),
                alignment: "Law".to_string(),
            }
        );
    }

    #[test]
    fn test_colour_codes_are_not_captured() {
        let rec = parse(
            "[\x0303hdf-us\x0F] [\x0307nh370\x0F] alice (Wiz Elf Fem Cha), 31337 points, T:25012, killed by a soldier ant",
        )
        .unwrap();

        assert_eq!(rec.variant, "nh370");
        assert_eq!(rec.user, "alice");
        assert_eq!(rec.points(), 31337);
        assert_eq!(rec.turn(), 25012);
    }

    #[test]
    fn test_ansi_sequences_are_not_captured() {
        let rec = parse(
            "\x1b[1;33m[12:00]\x1b[0m [\x1b[32mevil\x1b[0m] eve (Pri Hum Fem Neu), 10 points, T:5, killed by a newt",
        )
        .unwrap();

        assert_eq!(rec.variant, "evil");
        assert_eq!(rec.user, "eve");
        assert_eq!(rec.reason_text(), "killed by a newt");
    }

    #[test]
    fn test_run_tags_are_skipped() {
        let rec = parse(
            "[hdf-eu] [nh370] bob (Val Hum Fem Law), 500 points, T:100, [seed:4242], [run 3], escaped the dungeon",
        )
        .unwrap();

        assert_eq!(rec.reason_text(), "escaped the dungeon");
    }

    #[test]
    fn test_milestone_line() {
        let rec = parse(
            "[hdf-eu] [nh367] carol (Arc Dwa Mal Law) wished for \"blessed +2 gray dragon scale mail\", on T:8123",
        )
        .unwrap();

        assert_eq!(rec.source_kind(), SourceKind::Milestone);
        assert_eq!(rec.user, "carol");
        assert_eq!(rec.turn(), 8123);
        assert_eq!(rec.points(), 0);
        assert_eq!(
            rec.reason_text(),
            "wished for \"blessed +2 gray dragon scale mail\""
        );
    }

    #[test]
    fn test_milestone_without_comma() {
        let rec = parse("[hdf-eu] [nh367] carol (Arc Dwa Mal Law) entered the Gnomish Mines on T:1200")
            .unwrap();

        assert_eq!(rec.source_kind(), SourceKind::Milestone);
        assert_eq!(rec.reason_text(), "entered the Gnomish Mines");
        assert_eq!(rec.turn(), 1200);
    }

    #[test]
    fn test_true_user_takes_precedence() {
        let rec = parse("[hdf-us] [xnh] bob (robert) (Sam Hum Mal Law), 100 points, T:50, quit")
            .unwrap();

        assert_eq!(rec.user, "robert");
        assert_eq!(rec.role.class, "Sam");
    }

    #[test]
    fn test_role_without_race_and_alignment() {
        let rec = parse("[hdf-us] [dnh] dana (Val Fem), 100 points, T:50, quit").unwrap();

        assert_eq!(rec.role.class, "Val");
        assert_eq!(rec.role.race, "");
        assert_eq!(rec.role.gender, "Fem");
        assert_eq!(rec.role.alignment, "");
    }

    #[test]
    fn test_seed_announcement() {
        let rec = parse("[hdf-us] [nh370] dave (Tou Hum Fem Neu) started with seed 3735928559")
            .unwrap();

        assert_eq!(rec.source_kind(), SourceKind::Milestone);
        assert_eq!(rec.reason_text(), SEED_ANNOUNCEMENT);
        assert_eq!(rec.turn(), 0);
        assert_eq!(rec.points(), 0);
    }

    #[test]
    fn test_milestone_with_trailing_tags() {
        let rec = parse(
            "[hdf-eu] [nh367] carol (Arc Dwa Mal Law) wished for \"a cursed scroll of genocide\", on T:8123, [seed:42], [run 2]",
        )
        .unwrap();

        assert_eq!(rec.source_kind(), SourceKind::Milestone);
        assert_eq!(rec.turn(), 8123);
        assert_eq!(rec.reason_text(), "wished for \"a cursed scroll of genocide\"");
    }

    #[test]
    fn test_seed_announcement_forms() {
        for line in [
            "[hdf-us] [nh370] dave (Tou Hum Fem Neu) has set seed 42",
            "[hdf-us] [nh370] dave (Tou Hum Fem Neu) set the seed: 42",
            "[hdf-us] [nh370] dave (Tou Hum Fem Neu) is playing with seed 42",
            "[hdf-us] [nh370] dave (Tou Hum Fem Neu) is playing with a seed 42",
        ] {
            let rec = parse(line).unwrap();
            assert_eq!(rec.source_kind(), SourceKind::Milestone, "{}", line);
            assert_eq!(rec.reason_text(), SEED_ANNOUNCEMENT, "{}", line);
            assert_eq!(rec.turn(), 0, "{}", line);
            assert_eq!(rec.user, "dave");
        }
    }

    #[test]
    fn test_command_echo_does_not_match() {
        assert!(parse("[hdf-us] bob's last game: 500 points, killed by a grid bug").is_none());
        assert!(parse("No games found for bob.").is_none());
        assert!(parse("").is_none());
    }
}
