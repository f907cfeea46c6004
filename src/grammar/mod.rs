//! Announcement grammars.
//!
//! Each announcer posts in a fixed format. A grammar turns one raw line into
//! an [`EventRecord`], or returns `None` when the line is not a game event
//! (usually an echo of a bot command like `!lastgame`). `None` is never an
//! error: callers pass such lines through untouched.
//!
//! ## Module Structure
//!
//! - `extended`: death/score, milestone and seed lines with variant tags
//! - `simple`: death/score lines from the plain announcer
//! - `achievement`: registrations and achievement unlocks
//! - `record`: the parsed record type

pub mod achievement;
pub mod extended;
pub mod record;
pub mod simple;

use fancy_regex::{Captures, Regex};
use tracing::warn;

pub use achievement::AchievementGrammar;
pub use extended::ExtendedGrammar;
pub use record::{EventRecord, SourceKind};
pub use simple::SimpleGrammar;

/// Formatting bytes announcers wrap around fields: IRC colour (`^C` with an
/// optional `fg[,bg]`), bold, reset, reverse, italic, underline, and ANSI SGR.
/// Matched structurally and never captured.
pub(crate) const FMT: &str =
    r"(?:\x03(?:[0-9]{1,2}(?:,[0-9]{1,2})?)?|\x1b\[[0-9;]*m|[\x02\x0f\x16\x1d\x1f])*";

/// `(Cls Rac Gen Aln)`; race and alignment may be missing.
pub(crate) const ROLE: &str = r"\((?P<class>[^\s()]+)(?: (?P<race>[^\s()]+))? (?P<gender>[^\s()]+)(?: (?P<alignment>[^\s()]+))?\)";

/// `, 1234 points, T:5678, [tag], ..., killed by a jackal`
pub(crate) const DEATH_TAIL: &str =
    r", (?P<points>[0-9]*) points, T:(?P<endturn>[0-9]*), (?:\[[^\]]*\], )*(?P<reason>.*)";

/// Which announcement format a source speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrammarKind {
    Extended,
    Simple,
    Achievement,
}

impl GrammarKind {
    /// Parse a grammar name from config.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "extended" | "beholder" => Some(GrammarKind::Extended),
            "simple" | "rodney" => Some(GrammarKind::Simple),
            "achievement" | "achievements" => Some(GrammarKind::Achievement),
            _ => None,
        }
    }
}

/// A single announcement format.
pub trait Grammar {
    /// Parse one line; `None` means "not an event, show it as is".
    fn parse(&self, line: &str) -> Option<EventRecord>;
}

/// All grammars, compiled once at startup.
#[derive(Debug, Clone)]
pub struct EventGrammar {
    extended: ExtendedGrammar,
    simple: SimpleGrammar,
    achievement: AchievementGrammar,
}

impl Default for EventGrammar {
    fn default() -> Self {
        Self::new()
    }
}

impl EventGrammar {
    pub fn new() -> Self {
        Self {
            extended: ExtendedGrammar::new(),
            simple: SimpleGrammar::new(),
            achievement: AchievementGrammar::new(),
        }
    }

    /// Parse `line` with the grammar bound to its source.
    pub fn parse(&self, kind: GrammarKind, line: &str) -> Option<EventRecord> {
        let grammar: &dyn Grammar = match kind {
            GrammarKind::Extended => &self.extended,
            GrammarKind::Simple => &self.simple,
            GrammarKind::Achievement => &self.achievement,
        };
        grammar.parse(line)
    }
}

/// Run `pattern` against `line`, treating engine errors as no match.
pub(crate) fn match_line<'t>(
    grammar: &str,
    pattern: &Regex,
    line: &'t str,
) -> Option<Captures<'t>> {
    pattern.captures(line).unwrap_or_else(|e| {
        warn!("{} grammar failed on line {:?}: {}", grammar, line, e);
        None
    })
}
