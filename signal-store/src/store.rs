//! The in-memory record store
//!
//! The [`Store`] is the entry point of the library. It owns the record tables
//! and a [`SignalRegistry`], dispatches post-save signals synchronously on
//! insert, and provides snapshot-based transactional scoping: a failed
//! transaction discards every write made inside it, including writes made by
//! signal handlers.

use crate::signals::{PostSave, SignalContext, SignalRegistry};
use crate::types::{Profile, ProfileId, Result, StoreError, User, UserId};
use std::collections::BTreeMap;

/// The record tables and their id sequences
///
/// Kept separate from the registry so a transaction can snapshot and restore
/// the data without touching handler registrations.
#[derive(Debug, Clone, Default)]
pub(crate) struct Tables {
    users: BTreeMap<UserId, User>,
    profiles: BTreeMap<ProfileId, Profile>,
    next_user_id: u64,
    next_profile_id: u64,
}

impl Tables {
    fn insert_user(&mut self, username: &str) -> Result<User> {
        if self.users.values().any(|u| u.username == username) {
            return Err(StoreError::DuplicateUsername(username.to_string()));
        }
        self.next_user_id += 1;
        let user = User {
            id: UserId(self.next_user_id),
            username: username.to_string(),
            created_at: chrono::Utc::now(),
        };
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    pub(crate) fn insert_profile(&mut self, user_id: UserId) -> Result<Profile> {
        if !self.users.contains_key(&user_id) {
            return Err(StoreError::UserNotFound(user_id));
        }
        if self.profiles.values().any(|p| p.user_id == user_id) {
            return Err(StoreError::ProfileExists(user_id));
        }
        self.next_profile_id += 1;
        let profile = Profile {
            id: ProfileId(self.next_profile_id),
            user_id,
        };
        self.profiles.insert(profile.id, profile.clone());
        Ok(profile)
    }

    pub(crate) fn user_count(&self) -> usize {
        self.users.len()
    }

    pub(crate) fn profile_count(&self) -> usize {
        self.profiles.len()
    }
}

/// In-memory record store with post-save signal dispatch
///
/// # Example
/// ```
/// use signal_store::Store;
///
/// let mut store = Store::new();
/// store.connect("make_profile", |event, ctx| {
///     ctx.create_profile(event.user.id)?;
///     Ok(())
/// });
///
/// let user = store.create_user("alice").unwrap();
/// assert_eq!(store.profiles_for(user.id), 1);
/// ```
#[derive(Default)]
pub struct Store {
    tables: Tables,
    registry: SignalRegistry,
}

impl Store {
    /// Create an empty store with no registered handlers
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a post-save handler (see [`SignalRegistry::connect`])
    pub fn connect<F>(&mut self, name: impl Into<String>, handler: F)
    where
        F: Fn(&PostSave, &mut SignalContext<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.registry.connect(name, handler);
    }

    /// Remove a post-save handler by name
    pub fn disconnect(&mut self, name: &str) -> bool {
        self.registry.disconnect(name)
    }

    /// The signal registry, for inspection
    pub fn registry(&self) -> &SignalRegistry {
        &self.registry
    }

    /// Insert a user record and dispatch the post-save signal
    ///
    /// Every registered handler runs to completion, in registration order, on
    /// the calling thread, before this function returns. A handler error
    /// aborts dispatch of later handlers and propagates to the caller; the
    /// insert itself is not undone unless an enclosing [`transaction`]
    /// rolls it back.
    ///
    /// [`transaction`]: Store::transaction
    pub fn create_user(&mut self, username: &str) -> Result<User> {
        let user = self.tables.insert_user(username)?;
        log::debug!(
            "saved {} ('{}'), dispatching post-save to {} handler(s)",
            user.id,
            user.username,
            self.registry.len()
        );

        let event = PostSave {
            user: user.clone(),
            created: true,
        };
        for (name, handler) in self.registry.snapshot() {
            log::trace!("running post-save handler '{}'", name);
            let mut ctx = SignalContext::new(&mut self.tables);
            handler(&event, &mut ctx)?;
        }
        Ok(user)
    }

    /// Run a closure as an atomic scope
    ///
    /// The tables are snapshotted before the closure runs. If it returns
    /// `Err`, the snapshot is restored — discarding every write made inside
    /// the scope, including writes made by signal handlers — and the error is
    /// propagated. Scopes nest; an inner rollback restores the inner
    /// snapshot only.
    pub fn transaction<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Store) -> Result<T>,
    {
        let snapshot = self.tables.clone();
        match f(self) {
            Ok(value) => Ok(value),
            Err(err) => {
                log::debug!("rolling back transaction: {}", err);
                self.tables = snapshot;
                Err(err)
            }
        }
    }

    /// Number of user records
    pub fn user_count(&self) -> usize {
        self.tables.user_count()
    }

    /// Number of profile records
    pub fn profile_count(&self) -> usize {
        self.tables.profile_count()
    }

    /// Number of profiles referencing the given user (0 or 1)
    pub fn profiles_for(&self, user_id: UserId) -> usize {
        self.tables
            .profiles
            .values()
            .filter(|p| p.user_id == user_id)
            .count()
    }

    /// Look up a user by username
    pub fn find_user(&self, username: &str) -> Option<&User> {
        self.tables.users.values().find(|u| u.username == username)
    }

    /// Iterate over all user records in id order
    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.tables.users.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::thread;

    #[test]
    fn test_create_user_assigns_sequential_ids() {
        let mut store = Store::new();
        let a = store.create_user("a").unwrap();
        let b = store.create_user("b").unwrap();

        assert_eq!(a.id, UserId(1));
        assert_eq!(b.id, UserId(2));
        assert_eq!(store.user_count(), 2);
        assert_eq!(store.find_user("a").unwrap().id, a.id);
        assert!(store.find_user("missing").is_none());
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let mut store = Store::new();
        store.create_user("alice").unwrap();

        let err = store.create_user("alice").unwrap_err();
        assert!(matches!(err, StoreError::DuplicateUsername(name) if name == "alice"));
        assert_eq!(store.user_count(), 1);
    }

    #[test]
    fn test_profile_is_one_to_one() {
        let mut store = Store::new();
        let user = store.create_user("alice").unwrap();

        store.tables.insert_profile(user.id).unwrap();
        let err = store.tables.insert_profile(user.id).unwrap_err();
        assert!(matches!(err, StoreError::ProfileExists(id) if id == user.id));

        let err = store.tables.insert_profile(UserId(99)).unwrap_err();
        assert!(matches!(err, StoreError::UserNotFound(id) if id == UserId(99)));
    }

    #[test]
    fn test_dispatch_is_synchronous_and_ordered() {
        let mut store = Store::new();
        let trace = Arc::new(Mutex::new(Vec::new()));

        for name in ["first", "second", "third"] {
            let trace = Arc::clone(&trace);
            store.connect(name, move |_, _| {
                trace.lock().unwrap().push(name);
                Ok(())
            });
        }

        store.create_user("alice").unwrap();
        // All handlers finished before create_user returned
        assert_eq!(*trace.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_dispatch_runs_on_calling_thread() {
        let mut store = Store::new();
        let seen = Arc::new(Mutex::new(None));
        let seen_in_handler = Arc::clone(&seen);
        store.connect("capture_thread", move |_, _| {
            *seen_in_handler.lock().unwrap() = Some(thread::current().id());
            Ok(())
        });

        store.create_user("alice").unwrap();
        assert_eq!(*seen.lock().unwrap(), Some(thread::current().id()));
    }

    #[test]
    fn test_handler_error_aborts_later_handlers() {
        let mut store = Store::new();
        let trace = Arc::new(Mutex::new(Vec::new()));

        let t = Arc::clone(&trace);
        store.connect("failing", move |_, _| {
            t.lock().unwrap().push("failing");
            Err(StoreError::Aborted("handler failed".to_string()))
        });
        let t = Arc::clone(&trace);
        store.connect("never_runs", move |_, _| {
            t.lock().unwrap().push("never_runs");
            Ok(())
        });

        let err = store.create_user("alice").unwrap_err();
        assert!(matches!(err, StoreError::Aborted(_)));
        assert_eq!(*trace.lock().unwrap(), vec!["failing"]);
        // The insert itself is not undone outside a transaction
        assert_eq!(store.user_count(), 1);
    }

    #[test]
    fn test_transaction_commits_on_ok() {
        let mut store = Store::new();
        let user = store
            .transaction(|txn| txn.create_user("alice"))
            .unwrap();

        assert_eq!(store.user_count(), 1);
        assert_eq!(store.find_user("alice").unwrap().id, user.id);
    }

    #[test]
    fn test_transaction_rolls_back_on_err() {
        let mut store = Store::new();
        store.create_user("kept").unwrap();

        let result: Result<()> = store.transaction(|txn| {
            txn.create_user("discarded")?;
            Err(StoreError::Aborted("forced".to_string()))
        });

        assert!(result.is_err());
        assert_eq!(store.user_count(), 1);
        assert!(store.find_user("discarded").is_none());
        assert!(store.find_user("kept").is_some());
    }

    #[test]
    fn test_handler_write_shares_transaction_scope() {
        let mut store = Store::new();
        store.connect("make_profile", |event, ctx| {
            ctx.create_profile(event.user.id)?;
            Ok(())
        });

        let result: Result<()> = store.transaction(|txn| {
            txn.create_user("rollback_user")?;
            Err(StoreError::Aborted("forced".to_string()))
        });

        assert!(result.is_err());
        // The handler's profile was written inside the scope and rolled back
        assert_eq!(store.profile_count(), 0);
        assert_eq!(store.user_count(), 0);
    }

    #[test]
    fn test_nested_transaction_rolls_back_inner_only() {
        let mut store = Store::new();

        let result: Result<()> = store.transaction(|txn| {
            txn.create_user("outer")?;
            let inner: Result<()> = txn.transaction(|inner| {
                inner.create_user("inner")?;
                Err(StoreError::Aborted("inner only".to_string()))
            });
            assert!(inner.is_err());
            Ok(())
        });

        assert!(result.is_ok());
        assert!(store.find_user("outer").is_some());
        assert!(store.find_user("inner").is_none());
    }

    #[test]
    fn test_id_sequence_rewinds_with_rollback() {
        let mut store = Store::new();
        let _: Result<()> = store.transaction(|txn| {
            txn.create_user("discarded")?;
            Err(StoreError::Aborted("forced".to_string()))
        });

        // The sequence is part of the snapshot, so ids stay dense
        let user = store.create_user("alice").unwrap();
        assert_eq!(user.id, UserId(1));
    }

    #[test]
    fn test_disconnect_stops_dispatch() {
        let mut store = Store::new();
        let count = Arc::new(Mutex::new(0usize));
        let c = Arc::clone(&count);
        store.connect("counter", move |_, _| {
            *c.lock().unwrap() += 1;
            Ok(())
        });

        store.create_user("a").unwrap();
        assert!(store.disconnect("counter"));
        store.create_user("b").unwrap();

        assert_eq!(*count.lock().unwrap(), 1);
    }
}
