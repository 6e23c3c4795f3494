//! The repository capability shared by every backend
//!
//! [`UserRepository`] uses RPITIT (Return Position Impl Trait In Traits) for
//! async methods, so backends are used through generics rather than trait
//! objects.
//!
//! # Example
//!
//! ```rust,ignore
//! use user_store::prelude::*;
//!
//! async fn count_active<R: UserRepository>(repo: &R) -> RepositoryResult<usize> {
//!     let filter = UserFilter::default().with_is_active(true);
//!     Ok(repo.search(&filter, &PaginationOptions::default()).await?.len())
//! }
//! ```

use std::future::Future;

use uuid::Uuid;

use super::error::RepositoryError;
use crate::models::{User, UserFilter};
use crate::pagination::PaginationOptions;

/// Result type for repository operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Store of [`User`] records
///
/// Each method is one request against the store. Implementations hold no
/// mutable state between calls and may be shared by concurrent callers.
///
/// Any method may also fail with `Timeout` when the session enforces a
/// statement deadline (`database.statement_timeout_ms`) and it expires.
pub trait UserRepository: Send + Sync {
    /// Insert a new user and return it as persisted
    ///
    /// The returned user carries any values assigned by the store (a generated
    /// id, the creation time).
    ///
    /// # Errors
    ///
    /// `AlreadyExists` when the id or the normalized email is already taken,
    /// `Timeout` when the statement deadline expires, `Unknown` for any other
    /// store failure.
    fn create(&self, user: &User) -> impl Future<Output = RepositoryResult<User>> + Send;

    /// Fetch the user with the given identity
    ///
    /// # Errors
    ///
    /// `NotFound` when no user has that id, `Timeout` when the statement
    /// deadline expires.
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = RepositoryResult<User>> + Send;

    /// Fetch the user with the given email, after normalization
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when the email is blank, `NotFound` when no user
    /// has it.
    fn find_by_email(&self, email: &str) -> impl Future<Output = RepositoryResult<User>> + Send;

    /// Filtered, ordered, paginated search
    ///
    /// Returns an empty list rather than `NotFound` when nothing matches.
    ///
    /// # Errors
    ///
    /// `Timeout` when the statement deadline expires, `Unknown` for any other
    /// store failure.
    fn search(
        &self,
        filter: &UserFilter,
        pagination: &PaginationOptions,
    ) -> impl Future<Output = RepositoryResult<Vec<User>>> + Send;
}
