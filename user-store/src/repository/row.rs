//! Storage representation of a user and the mapping to and from the domain
//!
//! [`UserRow`] tracks `NULL` explicitly for the nullable columns. The domain
//! [`User`] uses "empty means unset" instead; the conversion happens here and
//! nowhere else.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::session::SqlValue;
use crate::models::{is_unset, normalize_email, User, UNSET_TIMESTAMP};

/// Table holding users
pub const USERS_TABLE: &str = "users";

/// Column names of the users table, in select order
pub mod columns {
    /// Identity
    pub const ID: &str = "id";
    /// Normalized email
    pub const EMAIL: &str = "email";
    /// Display name
    pub const USERNAME: &str = "username";
    /// Nullable full name
    pub const FULL_NAME: &str = "full_name";
    /// Creation time
    pub const CREATED_AT: &str = "created_at";
    /// Nullable last login time
    pub const LAST_LOGIN: &str = "last_login";
    /// Active flag
    pub const IS_ACTIVE: &str = "is_active";

    /// All columns in select order
    pub const ALL: [&str; 7] = [
        ID, EMAIL, USERNAME, FULL_NAME, CREATED_AT, LAST_LOGIN, IS_ACTIVE,
    ];
}

/// One row of the users table
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub full_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl UserRow {
    /// Columns and values to write on insert
    ///
    /// A nil id or an unset creation time is left out so the column default
    /// assigned by the store applies.
    pub fn insert_values(&self) -> Vec<(&'static str, SqlValue)> {
        let mut values = Vec::with_capacity(columns::ALL.len());
        if !self.id.is_nil() {
            values.push((columns::ID, SqlValue::from(self.id)));
        }
        values.push((columns::EMAIL, SqlValue::from(self.email.clone())));
        values.push((columns::USERNAME, SqlValue::from(self.username.clone())));
        values.push((columns::FULL_NAME, SqlValue::from(self.full_name.clone())));
        if !is_unset(&self.created_at) {
            values.push((columns::CREATED_AT, SqlValue::from(self.created_at)));
        }
        values.push((columns::LAST_LOGIN, SqlValue::from(self.last_login)));
        values.push((columns::IS_ACTIVE, SqlValue::from(self.is_active)));
        values
    }
}

/// Map a domain user to its storage row
///
/// The email is normalized; an empty full name and an unset last login become
/// `NULL`.
pub fn to_storage(user: &User) -> UserRow {
    UserRow {
        id: user.id,
        email: normalize_email(&user.email),
        username: user.username.clone(),
        full_name: Some(user.full_name.clone()).filter(|name| !name.is_empty()),
        created_at: user.created_at,
        last_login: Some(user.last_login).filter(|ts| !is_unset(ts)),
        is_active: user.is_active,
    }
}

/// Map a storage row back to the domain user
pub fn from_storage(row: UserRow) -> User {
    User {
        id: row.id,
        email: row.email,
        username: row.username,
        full_name: row.full_name.unwrap_or_default(),
        created_at: row.created_at,
        last_login: row.last_login.unwrap_or(UNSET_TIMESTAMP),
        is_active: row.is_active,
    }
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        to_storage(user)
    }
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        from_storage(row)
    }
}
