//! Decision to host action translation.
//!
//! The router owns no containers. Whenever a line has to move it asks the
//! host's resolver, which finds or creates the named container; asking for
//! the same name twice must return the same container.

use std::sync::Arc;

use tracing::warn;

use crate::common::messages::{BufferId, HostAction, NotifyLevel, RedirectTarget};
use crate::rules::Decision;

/// Host-side find-or-create lookup for display containers by name.
pub type BufferResolver = Arc<dyn Fn(&str) -> Option<BufferId> + Send + Sync>;

/// Turns decisions into host actions.
#[derive(Clone)]
pub struct Router {
    resolver: BufferResolver,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router").finish_non_exhaustive()
    }
}

impl Router {
    pub fn new(resolver: BufferResolver) -> Self {
        Self { resolver }
    }

    /// Host action for `decision`.
    ///
    /// `containers_permitted` is false for rooms where the line's source may
    /// post but where we must not create containers; such lines stay in
    /// place with their notification suppressed.
    pub fn route(&self, decision: &Decision, containers_permitted: bool) -> HostAction {
        if decision.show {
            return HostAction::Unchanged;
        }

        let name = decision.redirect_target.as_deref().unwrap_or_default();
        let target = if name.is_empty() {
            RedirectTarget::Hidden
        } else if !containers_permitted {
            RedirectTarget::InPlace
        } else {
            match (self.resolver)(name) {
                Some(buffer) => RedirectTarget::Buffer(buffer),
                None => {
                    warn!("Could not find or create buffer '{}', leaving line in place", name);
                    RedirectTarget::InPlace
                }
            }
        };

        HostAction::Redirect {
            target,
            notify_level: NotifyLevel::Suppressed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::rules::engine::Rule;

    /// Resolver backed by a map, counting creations.
    fn recording_resolver() -> (BufferResolver, Arc<Mutex<HashMap<String, usize>>>) {
        let created: Arc<Mutex<HashMap<String, usize>>> = Arc::default();
        let seen = Arc::clone(&created);
        let resolver: BufferResolver = Arc::new(move |name: &str| {
            let mut created = seen.lock().unwrap();
            *created.entry(name.to_string()).or_default() += 1;
            Some(BufferId(format!("buffer:{}", name)))
        });
        (resolver, created)
    }

    fn redirect(target: &str) -> Decision {
        Decision {
            show: false,
            redirect_target: Some(target.to_string()),
            rule: Rule::NothingNotable,
        }
    }

    #[test]
    fn test_shown_line_is_unchanged() {
        let (resolver, calls) = recording_resolver();
        let router = Router::new(resolver);
        let decision = Decision {
            show: true,
            redirect_target: None,
            rule: Rule::UserAllowed,
        };

        assert_eq!(router.route(&decision, true), HostAction::Unchanged);
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_redirect_to_buffer() {
        let (resolver, calls) = recording_resolver();
        let router = Router::new(resolver);

        let action = router.route(&redirect("behold_less"), true);
        assert_eq!(
            action,
            HostAction::Redirect {
                target: RedirectTarget::Buffer(BufferId("buffer:behold_less".to_string())),
                notify_level: NotifyLevel::Suppressed,
            }
        );

        // Resolved again on every redirect, same container each time.
        assert_eq!(router.route(&redirect("behold_less"), true), action);
        assert_eq!(calls.lock().unwrap()["behold_less"], 2);
    }

    #[test]
    fn test_empty_target_hides_line() {
        let (resolver, calls) = recording_resolver();
        let router = Router::new(resolver);

        let action = router.route(&redirect(""), true);
        assert_eq!(
            action,
            HostAction::Redirect {
                target: RedirectTarget::Hidden,
                notify_level: NotifyLevel::Suppressed,
            }
        );
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_no_container_outside_permitted_rooms() {
        let (resolver, calls) = recording_resolver();
        let router = Router::new(resolver);

        let action = router.route(&redirect("behold_less"), false);
        assert_eq!(
            action,
            HostAction::Redirect {
                target: RedirectTarget::InPlace,
                notify_level: NotifyLevel::Suppressed,
            }
        );
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_resolver_failure_leaves_line_in_place() {
        let router = Router::new(Arc::new(|_: &str| -> Option<BufferId> { None }));

        let action = router.route(&redirect("behold_less"), true);
        assert_eq!(
            action,
            HostAction::Redirect {
                target: RedirectTarget::InPlace,
                notify_level: NotifyLevel::Suppressed,
            }
        );
    }
}
