//! # user-store
//!
//! A filtered, paginated repository of user records over PostgreSQL.
//!
//! One [`UserRepository`](repository::UserRepository) capability is served by
//! two interchangeable backends that return the same results for the same
//! inputs:
//!
//! - **native**: SQL assembled by hand from translated predicates
//! - **schema**: SQL generated by `sea-query` from a typed table description
//!
//! Both share the same filter rules, the same whitelist of sortable columns and
//! the same mapping between nullable columns and domain values.
//!
//! ## Example
//!
//! ```rust,no_run
//! use user_store::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let session = PgSession::connect(&config.database).await?;
//!     let store = UserStore::new(config.repository.backend, session);
//!
//!     let filter = UserFilter::default().with_is_active(true);
//!     let page = PaginationOptions::builder()
//!         .limit(10)
//!         .sort_by(SortField::desc("last_login"))
//!         .build();
//!
//!     for user in store.search(&filter, &page).await? {
//!         println!("{} <{}>", user.username, user.email);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod observability;
pub mod pagination;
pub mod repository;
pub mod store;

/// Commonly used types
pub mod prelude {
    pub use crate::config::{Backend, Config, DatabaseConfig};
    pub use crate::database::{create_pool, PgSession};
    pub use crate::error::{DatabaseError, DatabaseErrorKind, DatabaseOperation, Error, Result};
    pub use crate::models::{User, UserFilter, UNSET_TIMESTAMP};
    pub use crate::observability::init_tracing;
    pub use crate::pagination::{OrderDirection, PaginationOptions, SortField};
    pub use crate::repository::native::NativeUserRepository;
    pub use crate::repository::schema::SchemaUserRepository;
    pub use crate::repository::{
        RepositoryError, RepositoryErrorKind, RepositoryOperation, RepositoryResult, Session,
        UserRepository,
    };
    pub use crate::store::UserStore;
}
