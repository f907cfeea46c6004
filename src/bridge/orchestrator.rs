//! Per-line entry point tying grammars, rules and routing together.

use tracing::debug;

use crate::bridge::router::{BufferResolver, Router};
use crate::bridge::sources::SourceBindings;
use crate::common::error::ConfigResult;
use crate::common::messages::{HostAction, IncomingLine};
use crate::grammar::EventGrammar;
use crate::rules::{evaluate, ConfigStore, SetOutcome};

/// The line filter as seen by the host.
#[derive(Debug)]
pub struct Bridge {
    grammar: EventGrammar,
    sources: SourceBindings,
    router: Router,
    store: ConfigStore,
}

impl Bridge {
    pub fn new(sources: SourceBindings, store: ConfigStore, resolver: BufferResolver) -> Self {
        Self {
            grammar: EventGrammar::new(),
            sources,
            router: Router::new(resolver),
            store,
        }
    }

    /// Decide what the host should do with one line.
    ///
    /// Lines from unbound sources and lines no grammar recognises are left
    /// unchanged.
    pub fn handle_line(&self, line: &IncomingLine) -> HostAction {
        let Some(source) = self.sources.lookup(&line.room, &line.announcer) else {
            return HostAction::Unchanged;
        };

        let Some(record) = self.grammar.parse(source.grammar, &line.text) else {
            debug!("Unchanged, no {:?} match: {:?}", source.grammar, line.text);
            return HostAction::Unchanged;
        };

        let config = self.store.snapshot();
        let decision = evaluate(&record, &config);
        debug!(
            "{} because {} (user {} {}, variant {:?}): {:?}",
            if decision.show { "Shown" } else { "Redirected" },
            decision.rule,
            record.user,
            record.role,
            record.variant,
            line.text
        );

        self.router.route(&decision, source.containers_permitted)
    }

    /// Apply a configuration change notification from the host.
    pub fn set_option(&mut self, key: &str, value: &str) -> ConfigResult<SetOutcome> {
        self.store.set(key, value)
    }
}
