//! Core record types for the signal store
//!
//! This module defines the records the store persists and the error type
//! shared by all store operations. The store owns uniqueness and lifecycle
//! rules; the records themselves are plain data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp type used throughout the store
pub type Timestamp = DateTime<Utc>;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Identifier for a [`User`] record
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user#{}", self.0)
    }
}

/// Identifier for a [`Profile`] record
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ProfileId(pub u64);

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "profile#{}", self.0)
    }
}

/// A user record
///
/// Usernames are unique per store; inserting a duplicate fails with
/// [`StoreError::DuplicateUsername`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned identifier
    pub id: UserId,
    /// Unique username
    pub username: String,
    /// When the record was inserted
    pub created_at: Timestamp,
}

/// A profile record holding a one-to-one back-reference to a user
///
/// A user has at most one profile; inserting a second fails with
/// [`StoreError::ProfileExists`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Store-assigned identifier
    pub id: ProfileId,
    /// The user this profile belongs to
    pub user_id: UserId,
}

/// Errors that can occur during store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("duplicate username: {0}")]
    DuplicateUsername(String),

    #[error("user not found: {0}")]
    UserNotFound(UserId),

    #[error("profile already exists for {0}")]
    ProfileExists(UserId),

    #[error("transaction aborted: {0}")]
    Aborted(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        assert_eq!(format!("{}", UserId(7)), "user#7");
        assert_eq!(format!("{}", ProfileId(3)), "profile#3");
    }

    #[test]
    fn test_error_messages() {
        let err = StoreError::DuplicateUsername("alice".to_string());
        assert_eq!(format!("{}", err), "duplicate username: alice");

        let err = StoreError::Aborted("forced rollback".to_string());
        assert_eq!(format!("{}", err), "transaction aborted: forced rollback");

        let err = StoreError::ProfileExists(UserId(1));
        assert_eq!(format!("{}", err), "profile already exists for user#1");
    }
}
