//! Search filter over user attributes
//!
//! Every field of [`UserFilter`] is independent and optional. A field that is
//! absent imposes no constraint at all; it never means "match the empty or
//! default value". The accessors on this type hold the normalization rules
//! shared by both query backends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::normalize_email;

/// Constraints for [`search`](crate::repository::UserRepository::search)
///
/// # Example
///
/// ```rust
/// use user_store::models::UserFilter;
///
/// let filter = UserFilter::default()
///     .with_username("ali")
///     .with_is_active(true);
///
/// assert!(!filter.is_empty());
/// assert_eq!(filter.username_pattern().as_deref(), Some("%ali%"));
/// assert!(UserFilter::default().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFilter {
    /// Identity set membership, ignored when empty
    #[serde(default)]
    pub ids: Vec<Uuid>,
    /// Exact, case-insensitive email match
    pub email: Option<String>,
    /// Case-insensitive substring match on the username
    pub username: Option<String>,
    /// Plain phrase matched against the full name with a text-search predicate
    pub full_text: Option<String>,
    /// Exact match on the active flag
    pub is_active: Option<bool>,
    /// Inclusive lower bound on the creation time
    pub created_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the creation time
    pub created_to: Option<DateTime<Utc>>,
}

impl UserFilter {
    /// Restrict to the given identities
    #[must_use]
    pub fn with_ids(mut self, ids: impl IntoIterator<Item = Uuid>) -> Self {
        self.ids = ids.into_iter().collect();
        self
    }

    /// Match a single email address
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Match usernames containing the given text
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Match full names against a plain text phrase
    #[must_use]
    pub fn with_full_text(mut self, text: impl Into<String>) -> Self {
        self.full_text = Some(text.into());
        self
    }

    /// Match the active flag
    #[must_use]
    pub fn with_is_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    /// Only users created at or after `from`
    #[must_use]
    pub fn created_from(mut self, from: DateTime<Utc>) -> Self {
        self.created_from = Some(from);
        self
    }

    /// Only users created at or before `to`
    #[must_use]
    pub fn created_to(mut self, to: DateTime<Utc>) -> Self {
        self.created_to = Some(to);
        self
    }

    /// `true` when the filter yields no constraint at all
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
            && self.normalized_email().is_none()
            && self.username_pattern().is_none()
            && self.full_text_query().is_none()
            && self.is_active.is_none()
            && self.created_from.is_none()
            && self.created_to.is_none()
    }

    /// Normalized email to compare against, `None` when absent or blank
    pub fn normalized_email(&self) -> Option<String> {
        self.email
            .as_deref()
            .map(normalize_email)
            .filter(|email| !email.is_empty())
    }

    /// `ILIKE` pattern for the username, `None` when absent or blank
    ///
    /// The trimmed value is escaped so that `%`, `_` and `\` match literally,
    /// then wrapped as `%value%`.
    pub fn username_pattern(&self) -> Option<String> {
        let value = self.username.as_deref()?.trim();
        if value.is_empty() {
            return None;
        }
        Some(format!("%{}%", escape_like(value)))
    }

    /// Phrase for the full-text predicate, `None` when absent or blank
    pub fn full_text_query(&self) -> Option<&str> {
        self.full_text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

/// Escape `LIKE` metacharacters using the default backslash escape
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
