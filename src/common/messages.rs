//! Canonical message types exchanged with the host client.
//!
//! The host hands the engine one announcement at a time and gets back a
//! `HostAction` describing what to do with it.

use std::fmt;

/// One line as delivered by the host.
#[derive(Debug, Clone)]
pub struct IncomingLine {
    /// Room (channel) the line was posted in, e.g. `#hardfought`.
    pub room: String,
    /// Nick of the poster.
    pub announcer: String,
    /// Message text, formatting bytes included.
    pub text: String,
}

impl IncomingLine {
    pub fn new(
        room: impl Into<String>,
        announcer: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            room: room.into(),
            announcer: announcer.into(),
            text: text.into(),
        }
    }
}

/// Opaque handle of a host display container, as returned by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BufferId(pub String);

impl BufferId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Notification priority requested for a rerouted line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    /// Below the level that would raise highlights or hotlist alerts.
    Suppressed,
}

impl NotifyLevel {
    /// Value understood by the host's line-modification hook.
    pub fn host_value(&self) -> &'static str {
        match self {
            NotifyLevel::Suppressed => "-1",
        }
    }
}

/// Where a rerouted line ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectTarget {
    /// Move the line into this container.
    Buffer(BufferId),
    /// Drop the line from display entirely.
    Hidden,
    /// Leave the line where it is; only its notification level changes.
    InPlace,
}

/// Action handed back to the host for one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostAction {
    /// No modification, the host displays the line normally.
    Unchanged,
    /// Reroute or hide the line with suppressed notification.
    Redirect {
        target: RedirectTarget,
        notify_level: NotifyLevel,
    },
}

impl HostAction {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, HostAction::Unchanged)
    }
}
