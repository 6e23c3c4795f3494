//! User repository: the capability, its building blocks and two backends
//!
//! Both backends implement [`UserRepository`] over the same [`Session`] and
//! produce identical results for identical inputs:
//!
//! - [`native::NativeUserRepository`] assembles SQL text from the predicates
//!   produced by [`predicate::translate`]
//! - [`schema::SchemaUserRepository`] builds statements from a typed
//!   description of the `users` table with `sea-query`
//!
//! Sort requests go through [`order::resolve`] in both cases, and rows are
//! mapped with [`row::from_storage`].

mod error;
pub mod native;
pub mod order;
pub mod predicate;
pub mod row;
pub mod schema;
pub mod session;
mod traits;

pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use order::{OrderBy, SortColumn};
pub use predicate::Predicate;
pub use row::UserRow;
pub use session::{Session, SqlValue, Statement};
pub use traits::{RepositoryResult, UserRepository};

use crate::error::{DatabaseError, DatabaseErrorKind};
use crate::models::User;

/// Entity name used in error context
pub(crate) const USER_ENTITY: &str = "User";

/// Map a session failure for `operation`
///
/// Unique violations on create carry the offending email as entity context.
pub(crate) fn store_error(
    operation: RepositoryOperation,
    error: DatabaseError,
    email: Option<&str>,
) -> RepositoryError {
    tracing::warn!(
        operation = %operation,
        kind = %error.kind,
        "store call failed: {}",
        error.message
    );

    let unique = error.kind == DatabaseErrorKind::UniqueViolation;
    let mapped = RepositoryError::from(error).with_operation(operation);
    match email {
        Some(email) if unique => mapped.with_entity(USER_ENTITY, email),
        _ => mapped,
    }
}

/// Turn the single-row result of a lookup into a user or `NotFound`
pub(crate) fn expect_user(
    operation: RepositoryOperation,
    row: Option<UserRow>,
    key: impl Into<String>,
) -> RepositoryResult<User> {
    match row {
        Some(row) => Ok(row::from_storage(row)),
        None => Err(RepositoryError::not_found(USER_ENTITY, key).with_operation(operation)),
    }
}

/// Normalize the email handed to `find_by_email`, rejecting blank input
pub(crate) fn lookup_email(email: &str) -> RepositoryResult<String> {
    let normalized = crate::models::normalize_email(email);
    if normalized.is_empty() {
        return Err(RepositoryError::invalid_argument(
            RepositoryOperation::FindByEmail,
            "email must not be empty",
        ));
    }
    Ok(normalized)
}
