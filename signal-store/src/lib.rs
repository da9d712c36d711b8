//! Signal Store Library
//!
//! An in-memory record store with synchronous post-save signal dispatch and
//! snapshot-based transactional scoping, plus a small iterable value type.
//!
//! # Architecture
//!
//! This library is intentionally minimal and focused on semantics:
//! - Records (users, one-to-one profiles) live in in-memory tables owned by a
//!   [`Store`]
//! - Saving a record dispatches a typed post-save event to an explicit,
//!   store-scoped [`SignalRegistry`] — registration is never process-global
//!   and always has a teardown path
//! - Handlers write through a [`SignalContext`], so their writes share any
//!   enclosing transactional scope and roll back with it
//! - [`Store::transaction`] gives closure-based atomic scopes with
//!   snapshot/restore rollback
//!
//! The library does NOT:
//! - Perform I/O or talk to an external database
//! - Spawn threads (dispatch is synchronous on the calling thread)
//! - Print anything; observations belong to the application layer
//!
//! All probe orchestration and output is in the application layer
//! (signal-probe-cli).
//!
//! # Example Usage
//!
//! ```
//! use signal_store::{Store, StoreError};
//!
//! let mut store = Store::new();
//! store.connect("make_profile", |event, ctx| {
//!     ctx.create_profile(event.user.id)?;
//!     Ok(())
//! });
//!
//! // A failed transaction rolls back handler writes too
//! let result: Result<(), StoreError> = store.transaction(|txn| {
//!     txn.create_user("alice")?;
//!     Err(StoreError::Aborted("forced rollback".to_string()))
//! });
//!
//! assert!(result.is_err());
//! assert_eq!(store.user_count(), 0);
//! assert_eq!(store.profile_count(), 0);
//! ```

// Public modules
pub mod rect;
pub mod signals;
pub mod store;
pub mod types;

// Re-export main types for convenience
pub use rect::{Dimension, Dimensions, Rectangle};
pub use signals::{Handler, PostSave, SignalContext, SignalRegistry};
pub use store::Store;
pub use types::{Profile, ProfileId, Result, StoreError, Timestamp, User, UserId};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: ensure we can create a store
        let store = Store::new();
        assert_eq!(store.user_count(), 0);
        assert!(store.registry().is_empty());
    }
}
