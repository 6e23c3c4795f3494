//! The session collaborator both backends execute statements through
//!
//! A [`Session`] runs one parameterized [`Statement`] and maps the result into
//! [`UserRow`]s. Backends only build statements; connection handling, binding
//! and timeouts belong to the session. Dropping the returned future cancels
//! the statement, and sessions never retry on their own.

use std::fmt;
use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::row::UserRow;
use crate::error::DatabaseError;

/// A bound statement parameter
///
/// Every variant is nullable so `NULL` keeps its SQL type when bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    /// `uuid`
    Uuid(Option<Uuid>),
    /// `text` / `varchar`
    Text(Option<String>),
    /// `boolean`
    Bool(Option<bool>),
    /// `timestamptz`
    Timestamp(Option<DateTime<Utc>>),
    /// `bigint`
    BigInt(Option<i64>),
}

impl SqlValue {
    /// `true` when the value is SQL `NULL`
    pub fn is_null(&self) -> bool {
        match self {
            Self::Uuid(v) => v.is_none(),
            Self::Text(v) => v.is_none(),
            Self::Bool(v) => v.is_none(),
            Self::Timestamp(v) => v.is_none(),
            Self::BigInt(v) => v.is_none(),
        }
    }
}

impl From<Uuid> for SqlValue {
    fn from(v: Uuid) -> Self {
        Self::Uuid(Some(v))
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        Self::Text(Some(v))
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        Self::Text(Some(v.to_string()))
    }
}

impl From<Option<String>> for SqlValue {
    fn from(v: Option<String>) -> Self {
        Self::Text(v)
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        Self::Bool(Some(v))
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Timestamp(Some(v))
    }
}

impl From<Option<DateTime<Utc>>> for SqlValue {
    fn from(v: Option<DateTime<Utc>>) -> Self {
        Self::Timestamp(v)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        Self::BigInt(Some(v))
    }
}

/// Final statement text with PostgreSQL `$n` placeholders and its parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// SQL text
    pub sql: String,
    /// Parameters, `params[0]` binds `$1`
    pub params: Vec<SqlValue>,
}

impl Statement {
    /// Create a statement
    pub fn new(sql: impl Into<String>, params: Vec<SqlValue>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -- {} param(s)", self.sql, self.params.len())
    }
}

/// Executes statements against the store
///
/// Implementations must be safe to share between concurrent callers.
pub trait Session: Send + Sync {
    /// Run a statement expected to yield zero or one row
    fn fetch_optional(
        &self,
        statement: Statement,
    ) -> impl Future<Output = Result<Option<UserRow>, DatabaseError>> + Send;

    /// Run a statement yielding any number of rows
    fn fetch_all(
        &self,
        statement: Statement,
    ) -> impl Future<Output = Result<Vec<UserRow>, DatabaseError>> + Send;
}

impl<S: Session> Session for &S {
    fn fetch_optional(
        &self,
        statement: Statement,
    ) -> impl Future<Output = Result<Option<UserRow>, DatabaseError>> + Send {
        (**self).fetch_optional(statement)
    }

    fn fetch_all(
        &self,
        statement: Statement,
    ) -> impl Future<Output = Result<Vec<UserRow>, DatabaseError>> + Send {
        (**self).fetch_all(statement)
    }
}

impl<S: Session> Session for std::sync::Arc<S> {
    fn fetch_optional(
        &self,
        statement: Statement,
    ) -> impl Future<Output = Result<Option<UserRow>, DatabaseError>> + Send {
        (**self).fetch_optional(statement)
    }

    fn fetch_all(
        &self,
        statement: Statement,
    ) -> impl Future<Output = Result<Vec<UserRow>, DatabaseError>> + Send {
        (**self).fetch_all(statement)
    }
}
