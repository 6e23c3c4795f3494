//! Repository backend that assembles SQL text by hand
//!
//! Filters go through [`translate`] and ordering through [`resolve`]; the
//! builders in this module only glue the pieces together and renumber the
//! placeholders.

mod builder;

pub use builder::{to_dollar_placeholders, InsertBuilder, SelectBuilder};

use uuid::Uuid;

use super::order::resolve;
use super::predicate::{translate, Predicate};
use super::row::{columns, from_storage, to_storage, USERS_TABLE};
use super::session::{Session, Statement};
use super::{
    expect_user, lookup_email, store_error, RepositoryError, RepositoryOperation,
    RepositoryResult, UserRepository,
};
use crate::models::{User, UserFilter};
use crate::pagination::PaginationOptions;

const BACKEND: &str = "native";

/// [`UserRepository`] over hand-assembled statements
#[derive(Debug, Clone)]
pub struct NativeUserRepository<S> {
    session: S,
}

impl<S: Session> NativeUserRepository<S> {
    /// Create a repository executing through `session`
    pub fn new(session: S) -> Self {
        Self { session }
    }

    /// The underlying session
    pub fn session(&self) -> &S {
        &self.session
    }

    fn select() -> SelectBuilder {
        SelectBuilder::new(USERS_TABLE, &columns::ALL)
    }

    /// Statement inserting `user` and returning the stored row
    pub fn insert_statement(user: &User) -> Statement {
        InsertBuilder::into_table(USERS_TABLE)
            .values(to_storage(user).insert_values())
            .returning(&columns::ALL)
            .build()
    }

    /// Statement selecting the page of users matching `filter`
    pub fn search_statement(filter: &UserFilter, pagination: &PaginationOptions) -> Statement {
        Self::select()
            .filters(translate(filter))
            .order_by(resolve(pagination.sort_fields()))
            .limit(pagination.limit())
            .offset(pagination.offset())
            .build()
    }
}

impl<S: Session> UserRepository for NativeUserRepository<S> {
    async fn create(&self, user: &User) -> RepositoryResult<User> {
        let statement = Self::insert_statement(user);
        tracing::debug!(backend = BACKEND, sql = %statement.sql, "creating user");

        match self.session.fetch_optional(statement).await {
            Ok(Some(row)) => Ok(from_storage(row)),
            Ok(None) => Err(RepositoryError::unknown(
                RepositoryOperation::Create,
                "insert returned no row",
            )),
            Err(error) => Err(store_error(
                RepositoryOperation::Create,
                error,
                Some(&to_storage(user).email),
            )),
        }
    }

    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<User> {
        let statement = Self::select().filter(Predicate::eq(columns::ID, id)).build();
        tracing::debug!(backend = BACKEND, %id, "fetching user by id");

        let row = self
            .session
            .fetch_optional(statement)
            .await
            .map_err(|e| store_error(RepositoryOperation::GetById, e, None))?;
        expect_user(RepositoryOperation::GetById, row, id.to_string())
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<User> {
        let email = lookup_email(email)?;
        let statement = Self::select()
            .filter(Predicate::eq(columns::EMAIL, email.as_str()))
            .build();
        tracing::debug!(backend = BACKEND, "fetching user by email");

        let row = self
            .session
            .fetch_optional(statement)
            .await
            .map_err(|e| store_error(RepositoryOperation::FindByEmail, e, None))?;
        expect_user(RepositoryOperation::FindByEmail, row, email)
    }

    async fn search(
        &self,
        filter: &UserFilter,
        pagination: &PaginationOptions,
    ) -> RepositoryResult<Vec<User>> {
        let statement = Self::search_statement(filter, pagination);
        tracing::debug!(
            backend = BACKEND,
            sql = %statement.sql,
            params = statement.params.len(),
            "searching users"
        );

        let rows = self
            .session
            .fetch_all(statement)
            .await
            .map_err(|e| store_error(RepositoryOperation::Search, e, None))?;
        Ok(rows.into_iter().map(from_storage).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DatabaseError, DatabaseOperation};
    use crate::pagination::SortField;
    use crate::repository::session::testing::RecordingSession;
    use crate::repository::session::SqlValue;
    use crate::repository::{RepositoryErrorKind, UserRow};
    use chrono::{TimeZone, Utc};

    const SELECT_ALL: &str =
        "SELECT id, email, username, full_name, created_at, last_login, is_active FROM users";

    fn stored_row(email: &str) -> UserRow {
        UserRow {
            id: Uuid::new_v4(),
            email: email.to_string(),
            username: "stored".to_string(),
            full_name: None,
            created_at: Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap(),
            last_login: None,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_create_returns_stored_user() {
        let row = stored_row("new@example.com");
        let session = RecordingSession::new().reply_rows(vec![row.clone()]);
        let repo = NativeUserRepository::new(&session);

        let user = User::new(" New@Example.com ", "newbie").with_full_name("New Person");
        let created = repo.create(&user).await.unwrap();

        assert_eq!(created.id, row.id);
        assert_eq!(created.created_at, row.created_at);
        assert!(created.full_name.is_empty());

        let statement = session.last_statement();
        assert_eq!(
            statement.sql,
            "INSERT INTO users (id, email, username, full_name, last_login, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, email, username, full_name, created_at, last_login, is_active"
        );
        assert_eq!(statement.params[1], SqlValue::from("new@example.com"));
        assert_eq!(statement.params[3], SqlValue::from("New Person"));
        assert_eq!(statement.params[4], SqlValue::Timestamp(None));
    }

    #[tokio::test]
    async fn test_create_duplicate_is_already_exists() {
        let session = RecordingSession::new().reply_error(
            DatabaseError::unique_violation(DatabaseOperation::Query, "duplicate key")
                .add_context("constraint users_email_key"),
        );
        let repo = NativeUserRepository::new(&session);

        let error = repo
            .create(&User::new("Dup@Example.com", "dup"))
            .await
            .unwrap_err();
        assert_eq!(error.kind, RepositoryErrorKind::AlreadyExists);
        assert_eq!(error.operation, RepositoryOperation::Create);
        assert_eq!(error.entity_id.as_deref(), Some("dup@example.com"));
    }

    #[tokio::test]
    async fn test_create_without_returned_row_is_unknown() {
        let session = RecordingSession::new();
        let repo = NativeUserRepository::new(&session);
        let error = repo.create(&User::new("a@b.c", "a")).await.unwrap_err();
        assert_eq!(error.kind, RepositoryErrorKind::Unknown);
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let row = stored_row("a@b.c");
        let session = RecordingSession::new().reply_rows(vec![row.clone()]);
        let repo = NativeUserRepository::new(&session);

        let user = repo.get_by_id(row.id).await.unwrap();
        assert_eq!(user, from_storage(row.clone()));

        let statement = session.last_statement();
        assert_eq!(statement.sql, format!("{SELECT_ALL} WHERE id = $1"));
        assert_eq!(statement.params, vec![SqlValue::from(row.id)]);
    }

    #[tokio::test]
    async fn test_get_by_id_missing_is_not_found() {
        let session = RecordingSession::new();
        let repo = NativeUserRepository::new(&session);
        let id = Uuid::new_v4();

        let error = repo.get_by_id(id).await.unwrap_err();
        assert!(error.is_not_found());
        assert_eq!(error.entity_id, Some(id.to_string()));
    }

    #[tokio::test]
    async fn test_find_by_email_normalizes() {
        let session = RecordingSession::new().reply_rows(vec![stored_row("bob@example.com")]);
        let repo = NativeUserRepository::new(&session);

        let user = repo.find_by_email("  BOB@Example.COM").await.unwrap();
        assert_eq!(user.email, "bob@example.com");

        let statement = session.last_statement();
        assert_eq!(statement.sql, format!("{SELECT_ALL} WHERE email = $1"));
        assert_eq!(statement.params, vec![SqlValue::from("bob@example.com")]);
    }

    #[tokio::test]
    async fn test_find_by_blank_email_never_reaches_store() {
        let session = RecordingSession::new();
        let repo = NativeUserRepository::new(&session);

        let error = repo.find_by_email(" \t").await.unwrap_err();
        assert_eq!(error.kind, RepositoryErrorKind::InvalidArgument);
        assert!(session.statements().is_empty());
    }

    #[tokio::test]
    async fn test_find_by_email_missing_is_not_found() {
        let session = RecordingSession::new();
        let repo = NativeUserRepository::new(&session);
        let error = repo.find_by_email("ghost@example.com").await.unwrap_err();
        assert!(error.is_not_found());
        assert_eq!(error.operation, RepositoryOperation::FindByEmail);
    }

    #[tokio::test]
    async fn test_search_with_empty_filter_uses_default_order() {
        let session = RecordingSession::new();
        let repo = NativeUserRepository::new(&session);

        let users = repo
            .search(&UserFilter::default(), &PaginationOptions::default())
            .await
            .unwrap();
        assert!(users.is_empty());

        let statement = session.last_statement();
        assert_eq!(statement.sql, format!("{SELECT_ALL} ORDER BY created_at DESC"));
        assert!(statement.params.is_empty());
    }

    #[tokio::test]
    async fn test_search_full_statement() {
        let session = RecordingSession::new()
            .reply_rows(vec![stored_row("a@example.com"), stored_row("b@example.com")]);
        let repo = NativeUserRepository::new(&session);

        let filter = UserFilter::default()
            .with_username("an_")
            .with_full_text("ann lee")
            .with_is_active(true);
        let pagination = PaginationOptions::builder()
            .limit(10)
            .offset(20)
            .sort_by(SortField::asc("username"))
            .sort_by(SortField::desc("password"))
            .build();

        let users = repo.search(&filter, &pagination).await.unwrap();
        assert_eq!(users.len(), 2);

        let statement = session.last_statement();
        assert_eq!(
            statement.sql,
            format!(
                "{SELECT_ALL} WHERE username ILIKE $1 AND \
                 to_tsvector('simple', coalesce(full_name, '')) @@ plainto_tsquery('simple', $2) \
                 AND is_active = $3 ORDER BY username ASC LIMIT $4 OFFSET $5"
            )
        );
        assert_eq!(
            statement.params,
            vec![
                SqlValue::from("%an\\_%"),
                SqlValue::from("ann lee"),
                SqlValue::from(true),
                SqlValue::BigInt(Some(10)),
                SqlValue::BigInt(Some(20)),
            ]
        );
    }

    #[tokio::test]
    async fn test_search_without_limit_has_no_limit_clause() {
        let session = RecordingSession::new();
        let repo = NativeUserRepository::new(&session);
        let pagination = PaginationOptions::builder().limit(0).offset(-5).build();

        repo.search(&UserFilter::default(), &pagination).await.unwrap();
        let sql = session.last_statement().sql;
        assert!(!sql.contains("LIMIT"));
        assert!(!sql.contains("OFFSET"));
    }

    #[tokio::test]
    async fn test_search_store_failure_is_unknown() {
        let session = RecordingSession::new().reply_error(DatabaseError::query_failed("boom"));
        let repo = NativeUserRepository::new(&session);

        let error = repo
            .search(&UserFilter::default(), &PaginationOptions::default())
            .await
            .unwrap_err();
        assert_eq!(error.kind, RepositoryErrorKind::Unknown);
        assert_eq!(error.operation, RepositoryOperation::Search);
    }
}
