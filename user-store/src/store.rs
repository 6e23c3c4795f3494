//! Runtime selection between the two repository backends

use uuid::Uuid;

use crate::config::Backend;
use crate::models::{User, UserFilter};
use crate::pagination::PaginationOptions;
use crate::repository::native::NativeUserRepository;
use crate::repository::schema::SchemaUserRepository;
use crate::repository::{RepositoryResult, Session, UserRepository};

/// A [`UserRepository`] whose backend is chosen from configuration
///
/// ```rust,ignore
/// let session = PgSession::connect(&config.database).await?;
/// let store = UserStore::new(config.repository.backend, session);
/// let user = store.find_by_email("someone@example.com").await?;
/// ```
#[derive(Debug, Clone)]
pub enum UserStore<S> {
    Native(NativeUserRepository<S>),
    Schema(SchemaUserRepository<S>),
}

impl<S: Session> UserStore<S> {
    /// Build the backend selected by `backend` over `session`
    pub fn new(backend: Backend, session: S) -> Self {
        match backend {
            Backend::Native => Self::Native(NativeUserRepository::new(session)),
            Backend::Schema => Self::Schema(SchemaUserRepository::new(session)),
        }
    }

    /// The backend in use
    pub fn backend(&self) -> Backend {
        match self {
            Self::Native(_) => Backend::Native,
            Self::Schema(_) => Backend::Schema,
        }
    }
}

impl<S: Session> UserRepository for UserStore<S> {
    async fn create(&self, user: &User) -> RepositoryResult<User> {
        match self {
            Self::Native(repo) => repo.create(user).await,
            Self::Schema(repo) => repo.create(user).await,
        }
    }

    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<User> {
        match self {
            Self::Native(repo) => repo.get_by_id(id).await,
            Self::Schema(repo) => repo.get_by_id(id).await,
        }
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<User> {
        match self {
            Self::Native(repo) => repo.find_by_email(email).await,
            Self::Schema(repo) => repo.find_by_email(email).await,
        }
    }

    async fn search(
        &self,
        filter: &UserFilter,
        pagination: &PaginationOptions,
    ) -> RepositoryResult<Vec<User>> {
        match self {
            Self::Native(repo) => repo.search(filter, pagination).await,
            Self::Schema(repo) => repo.search(filter, pagination).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::session::testing::RecordingSession;

    #[tokio::test]
    async fn test_dispatches_to_selected_backend() {
        for backend in [Backend::Native, Backend::Schema] {
            let session = RecordingSession::new();
            let store = UserStore::new(backend, &session);
            assert_eq!(store.backend(), backend);

            let error = store.get_by_id(Uuid::new_v4()).await.unwrap_err();
            assert!(error.is_not_found());

            let sql = session.last_statement().sql;
            let quoted = sql.contains(r#""users""#);
            assert_eq!(quoted, backend == Backend::Schema, "{sql}");
        }
    }
}
