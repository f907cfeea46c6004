//! Announcer bindings.
//!
//! Decides which grammar applies to a line from its room and poster, and
//! whether redirect containers may be created for that room.

use crate::common::error::ConfigError;
use crate::config::types::SourceConfig;
use crate::grammar::GrammarKind;

/// One announcer the engine listens to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBinding {
    /// Room the announcer is bound to; `None` matches any room.
    pub room: Option<String>,
    pub announcer: String,
    pub grammar: GrammarKind,
    /// Rooms that permit redirect containers; `None` permits all.
    pub redirect_rooms: Option<Vec<String>>,
}

impl SourceBinding {
    pub fn new(room: Option<&str>, announcer: &str, grammar: GrammarKind) -> Self {
        Self {
            room: room.map(str::to_string),
            announcer: announcer.to_string(),
            grammar,
            redirect_rooms: None,
        }
    }

    pub fn with_redirect_rooms(mut self, rooms: &[&str]) -> Self {
        self.redirect_rooms = Some(rooms.iter().map(|r| r.to_string()).collect());
        self
    }

    fn matches(&self, room: &str, announcer: &str) -> bool {
        self.announcer.eq_ignore_ascii_case(announcer)
            && self.room.as_deref().map_or(true, |r| same_room(r, room))
    }

    fn permits_containers(&self, room: &str) -> bool {
        self.redirect_rooms
            .as_ref()
            .map_or(true, |rooms| rooms.iter().any(|r| same_room(r, room)))
    }
}

/// What a bound line gets parsed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundSource {
    pub grammar: GrammarKind,
    pub containers_permitted: bool,
}

/// All configured announcer bindings, first match wins.
#[derive(Debug, Clone)]
pub struct SourceBindings {
    bindings: Vec<SourceBinding>,
}

impl Default for SourceBindings {
    /// The public game servers' announcers.
    fn default() -> Self {
        Self::new(vec![
            SourceBinding::new(Some("#hardfought"), "Beholder", GrammarKind::Extended),
            SourceBinding::new(Some("#em.slashem.me"), "Beholder", GrammarKind::Extended),
            SourceBinding::new(Some("#NetHack"), "Rodney", GrammarKind::Simple),
            SourceBinding::new(None, "tnnt", GrammarKind::Achievement).with_redirect_rooms(&["#tnnt"]),
        ])
    }
}

impl SourceBindings {
    pub fn new(bindings: Vec<SourceBinding>) -> Self {
        Self { bindings }
    }

    /// Build bindings from config entries, collecting every problem found.
    pub fn from_config(sources: &[SourceConfig]) -> Result<Self, ConfigError> {
        let mut bindings = Vec::new();
        let mut errors = Vec::new();

        for (i, source) in sources.iter().enumerate() {
            if source.announcer.trim().is_empty() {
                errors.push(format!("sources[{}].announcer is required", i));
            }
            let Some(grammar) = GrammarKind::from_name(&source.grammar) else {
                errors.push(format!(
                    "sources[{}].grammar '{}' is invalid (use: extended, simple, achievement)",
                    i, source.grammar
                ));
                continue;
            };
            bindings.push(SourceBinding {
                room: source.room.as_ref().map(|r| r.trim().to_string()),
                announcer: source.announcer.trim().to_string(),
                grammar,
                redirect_rooms: source.redirect_rooms.clone(),
            });
        }

        if errors.is_empty() {
            Ok(Self::new(bindings))
        } else {
            Err(ConfigError::ValidationError {
                message: errors.join("\n"),
            })
        }
    }

    /// Binding for a line posted by `announcer` in `room`, if any.
    pub fn lookup(&self, room: &str, announcer: &str) -> Option<BoundSource> {
        self.bindings
            .iter()
            .find(|b| b.matches(room, announcer))
            .map(|b| BoundSource {
                grammar: b.grammar,
                containers_permitted: b.permits_containers(room),
            })
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceBinding> {
        self.bindings.iter()
    }
}

/// Channel part of a host room name: `libera.#NetHack` -> `#NetHack`.
fn channel_name(room: &str) -> &str {
    room.find('#').map_or(room, |i| &room[i..])
}

fn same_room(a: &str, b: &str) -> bool {
    channel_name(a.trim()).eq_ignore_ascii_case(channel_name(b.trim()))
}
