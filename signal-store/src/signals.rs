//! Post-save signal dispatch
//!
//! Replaces implicit, process-wide callback registration with an explicit
//! registry owned by a [`Store`](crate::Store). Handlers are named so they can
//! be disconnected later, and dispatch runs synchronously on the calling
//! thread, in registration order, before the triggering save returns.
//!
//! Handlers receive a [`SignalContext`] rather than the store itself. Writes
//! made through the context land in the same table set as the triggering
//! save, so they participate in any enclosing transactional scope.

use crate::store::Tables;
use crate::types::{Profile, Result, User, UserId};
use std::sync::Arc;

/// Event payload delivered to post-save handlers
#[derive(Debug, Clone)]
pub struct PostSave {
    /// The record that was just saved
    pub user: User,
    /// True if the save inserted a new record (always true today; updates
    /// would dispatch with false)
    pub created: bool,
}

/// The view of the store's tables a handler gets during dispatch
///
/// The context borrows the tables mutably for the duration of one handler
/// call, so handler writes are indistinguishable from writes made by the
/// caller that triggered the save.
pub struct SignalContext<'a> {
    tables: &'a mut Tables,
}

impl<'a> SignalContext<'a> {
    pub(crate) fn new(tables: &'a mut Tables) -> Self {
        Self { tables }
    }

    /// Create a profile for the given user
    ///
    /// Fails if the user does not exist or already has a profile.
    pub fn create_profile(&mut self, user_id: UserId) -> Result<Profile> {
        self.tables.insert_profile(user_id)
    }

    /// Number of profile records currently visible
    pub fn profile_count(&self) -> usize {
        self.tables.profile_count()
    }

    /// Number of user records currently visible
    pub fn user_count(&self) -> usize {
        self.tables.user_count()
    }
}

/// A registered post-save handler
///
/// A handler returning `Err` aborts dispatch of later handlers and propagates
/// out of the save that triggered it.
pub type Handler = Arc<dyn Fn(&PostSave, &mut SignalContext<'_>) -> Result<()> + Send + Sync>;

/// Ordered registry of named post-save handlers
///
/// Dispatch order is registration order. Re-connecting under an existing name
/// replaces the previous handler in place.
#[derive(Default)]
pub struct SignalRegistry {
    handlers: Vec<(String, Handler)>,
}

impl SignalRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under a name
    ///
    /// If the name is already taken the previous handler is replaced and a
    /// warning is logged; its position in the dispatch order is kept.
    pub fn connect<F>(&mut self, name: impl Into<String>, handler: F)
    where
        F: Fn(&PostSave, &mut SignalContext<'_>) -> Result<()> + Send + Sync + 'static,
    {
        let name = name.into();
        let handler: Handler = Arc::new(handler);
        if let Some(slot) = self.handlers.iter_mut().find(|(n, _)| *n == name) {
            log::warn!("replacing post-save handler '{}'", name);
            slot.1 = handler;
        } else {
            log::debug!("connecting post-save handler '{}'", name);
            self.handlers.push((name, handler));
        }
    }

    /// Remove a handler by name, returning true if it was registered
    pub fn disconnect(&mut self, name: &str) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(n, _)| n != name);
        let removed = self.handlers.len() != before;
        if removed {
            log::debug!("disconnected post-save handler '{}'", name);
        }
        removed
    }

    /// Names of registered handlers, in dispatch order
    pub fn handler_names(&self) -> Vec<&str> {
        self.handlers.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Number of registered handlers
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// True if no handlers are registered
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Clone the handler list so dispatch can run while the tables are
    /// borrowed mutably
    pub(crate) fn snapshot(&self) -> Vec<(String, Handler)> {
        self.handlers.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> impl Fn(&PostSave, &mut SignalContext<'_>) -> Result<()> + Send + Sync {
        |_: &PostSave, _: &mut SignalContext<'_>| Ok(())
    }

    #[test]
    fn test_connect_and_disconnect() {
        let mut registry = SignalRegistry::new();
        assert!(registry.is_empty());

        registry.connect("first", noop());
        registry.connect("second", noop());
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.handler_names(), vec!["first", "second"]);

        assert!(registry.disconnect("first"));
        assert!(!registry.disconnect("first")); // already gone
        assert_eq!(registry.handler_names(), vec!["second"]);
    }

    #[test]
    fn test_reconnect_replaces_in_place() {
        let mut registry = SignalRegistry::new();
        registry.connect("a", noop());
        registry.connect("b", noop());
        registry.connect("a", noop());

        // Replacement keeps dispatch order
        assert_eq!(registry.handler_names(), vec!["a", "b"]);
        assert_eq!(registry.len(), 2);
    }
}
