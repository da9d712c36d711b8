//! End-to-end rollback scenario
//!
//! Exercises the full path a post-save handler's write takes through a failed
//! transaction: user saved inside an atomic scope, handler creates the
//! dependent profile through its context, the scope aborts, and both records
//! are discarded together.

use signal_store::{Store, StoreError};
use std::sync::{Arc, Mutex};

#[test]
fn handler_write_is_discarded_with_the_failed_scope() {
    let mut store = Store::new();
    let handler_ran = Arc::new(Mutex::new(false));

    let flag = Arc::clone(&handler_ran);
    store.connect("make_profile", move |event, ctx| {
        ctx.create_profile(event.user.id)?;
        *flag.lock().unwrap() = true;
        Ok(())
    });

    let result: Result<(), StoreError> = store.transaction(|txn| {
        let user = txn.create_user("rollback_user")?;
        // The handler already ran and wrote its profile by this point
        assert_eq!(txn.profiles_for(user.id), 1);
        Err(StoreError::Aborted("forced rollback after save".to_string()))
    });

    let err = result.unwrap_err();
    assert!(matches!(err, StoreError::Aborted(_)));

    // The handler did run, but its write did not survive the scope
    assert!(*handler_ran.lock().unwrap());
    assert_eq!(store.user_count(), 0);
    assert_eq!(store.profile_count(), 0);
    assert!(store.find_user("rollback_user").is_none());
}

#[test]
fn committed_scope_keeps_handler_writes() {
    let mut store = Store::new();
    store.connect("make_profile", |event, ctx| {
        ctx.create_profile(event.user.id)?;
        Ok(())
    });

    let user = store
        .transaction(|txn| txn.create_user("kept_user"))
        .unwrap();

    assert_eq!(store.user_count(), 1);
    assert_eq!(store.profiles_for(user.id), 1);
}

#[test]
fn handler_failure_inside_scope_rolls_back_the_save() {
    let mut store = Store::new();
    store.connect("always_fails", |_, _| {
        Err(StoreError::Aborted("handler refused the save".to_string()))
    });

    let result: Result<(), StoreError> =
        store.transaction(|txn| txn.create_user("doomed").map(|_| ()));

    assert!(result.is_err());
    // The handler error propagated out of the scope, taking the save with it
    assert_eq!(store.user_count(), 0);
}
