//! The user domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Timestamp value that stands for "never set" on the domain side
///
/// Nullable timestamp columns map to this value when they are `NULL`, and a
/// field holding it is written back as `NULL`. It lies before the earliest
/// instant PostgreSQL can store, so no real timestamp collides with it.
pub const UNSET_TIMESTAMP: DateTime<Utc> = DateTime::<Utc>::MIN_UTC;

/// Normalize an email address for storage and comparison
///
/// Emails are trimmed and lowercased everywhere they are written or compared,
/// so two addresses differing only in case or surrounding whitespace refer to
/// the same user.
///
/// # Example
///
/// ```rust
/// use user_store::models::normalize_email;
///
/// assert_eq!(normalize_email("  User@Test.ORG "), "user@test.org");
/// ```
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Returns `true` when the timestamp is the unset marker
#[must_use]
pub fn is_unset(ts: &DateTime<Utc>) -> bool {
    *ts == UNSET_TIMESTAMP
}

/// A user record
///
/// Optional attributes use the "empty means unset" convention: an empty
/// `full_name` and an [`UNSET_TIMESTAMP`] `last_login` are stored as `NULL`.
///
/// # Example
///
/// ```rust
/// use user_store::models::User;
///
/// let user = User::new("Alice@Example.com", "alice")
///     .with_full_name("Alice Liddell")
///     .active(true);
///
/// assert_eq!(user.username, "alice");
/// assert!(user.is_active);
/// assert!(!user.has_logged_in());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identity, immutable after creation
    pub id: Uuid,
    /// Unique, case-insensitive email address
    pub email: String,
    /// Display name, not unique
    pub username: String,
    /// Full name, empty when unknown
    pub full_name: String,
    /// Creation time, set once
    pub created_at: DateTime<Utc>,
    /// Last login time, [`UNSET_TIMESTAMP`] when the user never logged in
    pub last_login: DateTime<Utc>,
    /// Whether the account is active
    pub is_active: bool,
}

impl User {
    /// Create a user with a fresh random identity
    ///
    /// `created_at` is left unset so the store assigns it on insert.
    pub fn new(email: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            username: username.into(),
            full_name: String::new(),
            created_at: UNSET_TIMESTAMP,
            last_login: UNSET_TIMESTAMP,
            is_active: false,
        }
    }

    /// Set the full name
    #[must_use]
    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = full_name.into();
        self
    }

    /// Set the creation time explicitly
    #[must_use]
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Set the last login time
    #[must_use]
    pub fn with_last_login(mut self, last_login: DateTime<Utc>) -> Self {
        self.last_login = last_login;
        self
    }

    /// Set the active flag
    #[must_use]
    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Whether a last login time is recorded
    pub fn has_logged_in(&self) -> bool {
        !is_unset(&self.last_login)
    }
}
