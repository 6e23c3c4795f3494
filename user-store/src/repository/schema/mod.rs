//! Repository backend built on a typed table description
//!
//! Statements are generated by `sea-query` from [`Users`], so column names and
//! value types come from one definition instead of string fragments. The
//! filter rules and ordering whitelist are the same as the native backend's.

mod table;

pub use table::{bind_values, conditions, Users};

use sea_query::{Expr, PostgresQueryBuilder, Query, SelectStatement, SimpleExpr, Value};
use uuid::Uuid;

use super::order::resolve;
use super::row::{from_storage, to_storage};
use super::session::{Session, Statement};
use super::{
    expect_user, lookup_email, store_error, RepositoryError, RepositoryOperation,
    RepositoryResult, UserRepository,
};
use crate::error::{DatabaseError, DatabaseErrorKind, DatabaseOperation};
use crate::models::{User, UserFilter};
use crate::pagination::PaginationOptions;

const BACKEND: &str = "schema";

/// [`UserRepository`] over statements generated from [`Users`]
#[derive(Debug, Clone)]
pub struct SchemaUserRepository<S> {
    session: S,
}

impl<S: Session> SchemaUserRepository<S> {
    /// Create a repository executing through `session`
    pub fn new(session: S) -> Self {
        Self { session }
    }

    /// The underlying session
    pub fn session(&self) -> &S {
        &self.session
    }

    fn select() -> SelectStatement {
        Query::select()
            .columns(Users::COLUMNS)
            .from(Users::Table)
            .to_owned()
    }

    fn finish(query: &SelectStatement) -> Result<Statement, DatabaseError> {
        let (sql, values) = query.build(PostgresQueryBuilder);
        Ok(Statement::new(sql, bind_values(values)?))
    }

    /// Statement selecting the single user matching `condition`
    fn lookup_statement(condition: SimpleExpr) -> Result<Statement, DatabaseError> {
        let mut query = Self::select();
        query.and_where(condition);
        Self::finish(&query)
    }

    /// Statement inserting `user` and returning the stored row
    pub fn insert_statement(user: &User) -> Result<Statement, DatabaseError> {
        let (names, values): (Vec<&str>, Vec<_>) =
            to_storage(user).insert_values().into_iter().unzip();

        let columns = names
            .into_iter()
            .map(|name| {
                Users::from_column(name).ok_or_else(|| {
                    DatabaseError::new(
                        DatabaseOperation::Insert,
                        DatabaseErrorKind::Configuration,
                        format!("column {} is not part of the users table", name),
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let exprs = values
            .into_iter()
            .map(|value| SimpleExpr::Value(Value::from(value)));

        let (sql, values) = Query::insert()
            .into_table(Users::Table)
            .columns(columns)
            .values(exprs)
            .map_err(|e| {
                DatabaseError::new(
                    DatabaseOperation::Insert,
                    DatabaseErrorKind::QueryFailed,
                    e.to_string(),
                )
            })?
            .returning(Query::returning().columns(Users::COLUMNS))
            .build(PostgresQueryBuilder);

        Ok(Statement::new(sql, bind_values(values)?))
    }

    /// Statement selecting the page of users matching `filter`
    pub fn search_statement(
        filter: &UserFilter,
        pagination: &PaginationOptions,
    ) -> Result<Statement, DatabaseError> {
        let mut query = Self::select();

        let condition = conditions(filter);
        if !condition.is_empty() {
            query.cond_where(condition);
        }

        for order in resolve(pagination.sort_fields()) {
            query.order_by(Users::from(order.column), table::sort_order(order.direction));
        }

        if let Some(limit) = pagination.limit() {
            query.limit(limit);
        }
        if let Some(offset) = pagination.offset() {
            query.offset(offset);
        }

        Self::finish(&query)
    }
}

impl<S: Session> UserRepository for SchemaUserRepository<S> {
    async fn create(&self, user: &User) -> RepositoryResult<User> {
        let email = to_storage(user).email;
        let statement = Self::insert_statement(user)
            .map_err(|e| store_error(RepositoryOperation::Create, e, None))?;
        tracing::debug!(backend = BACKEND, sql = %statement.sql, "creating user");

        match self.session.fetch_optional(statement).await {
            Ok(Some(row)) => Ok(from_storage(row)),
            Ok(None) => Err(RepositoryError::unknown(
                RepositoryOperation::Create,
                "insert returned no row",
            )),
            Err(error) => Err(store_error(RepositoryOperation::Create, error, Some(&email))),
        }
    }

    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<User> {
        let statement = Self::lookup_statement(Expr::col(Users::Id).eq(id))
            .map_err(|e| store_error(RepositoryOperation::GetById, e, None))?;
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
        let statement = Self::lookup_statement(Expr::col(Users::Email).eq(email.as_str()))
            .map_err(|e| store_error(RepositoryOperation::FindByEmail, e, None))?;
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
        let statement = Self::search_statement(filter, pagination)
            .map_err(|e| store_error(RepositoryOperation::Search, e, None))?;
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
    use crate::pagination::SortField;
    use crate::repository::native::NativeUserRepository;
    use crate::repository::session::testing::RecordingSession;
    use crate::repository::session::SqlValue;
    use crate::repository::{RepositoryErrorKind, UserRow};
    use chrono::{TimeZone, Utc};

    fn stored_row(email: &str) -> UserRow {
        UserRow {
            id: Uuid::new_v4(),
            email: email.to_string(),
            username: "stored".to_string(),
            full_name: Some("Stored User".to_string()),
            created_at: Utc.with_ymd_and_hms(2024, 3, 4, 5, 6, 7).unwrap(),
            last_login: None,
            is_active: false,
        }
    }

    #[tokio::test]
    async fn test_create_binds_normalized_row() {
        let row = stored_row("x@example.com");
        let session = RecordingSession::new().reply_rows(vec![row.clone()]);
        let repo = SchemaUserRepository::new(&session);

        let user = User::new("X@Example.com", "x");
        let created = repo.create(&user).await.unwrap();
        assert_eq!(created, from_storage(row));

        let statement = session.last_statement();
        assert!(statement.sql.starts_with(r#"INSERT INTO "users""#), "{}", statement.sql);
        let (insert, returning) = statement.sql.split_once("RETURNING").unwrap();
        assert!(!insert.contains("created_at"), "{insert}");
        assert!(returning.contains(r#""created_at""#), "{returning}");
        assert_eq!(
            statement.params,
            vec![
                SqlValue::from(user.id),
                SqlValue::from("x@example.com"),
                SqlValue::from("x"),
                SqlValue::Text(None),
                SqlValue::Timestamp(None),
                SqlValue::from(false),
            ]
        );
    }

    #[tokio::test]
    async fn test_create_duplicate_is_already_exists() {
        let session = RecordingSession::new().reply_error(DatabaseError::unique_violation(
            DatabaseOperation::Query,
            "duplicate key value violates unique constraint",
        ));
        let repo = SchemaUserRepository::new(&session);

        let error = repo.create(&User::new("dup@example.com", "d")).await.unwrap_err();
        assert!(error.is_already_exists());
        assert_eq!(error.entity_id.as_deref(), Some("dup@example.com"));
    }

    #[tokio::test]
    async fn test_get_by_id_missing_is_not_found() {
        let session = RecordingSession::new();
        let repo = SchemaUserRepository::new(&session);
        let id = Uuid::new_v4();

        let error = repo.get_by_id(id).await.unwrap_err();
        assert!(error.is_not_found());
        assert_eq!(session.last_statement().params, vec![SqlValue::from(id)]);
    }

    #[tokio::test]
    async fn test_find_by_email() {
        let session = RecordingSession::new().reply_rows(vec![stored_row("ann@example.com")]);
        let repo = SchemaUserRepository::new(&session);

        let user = repo.find_by_email(" Ann@Example.com").await.unwrap();
        assert_eq!(user.full_name, "Stored User");
        assert_eq!(
            session.last_statement().params,
            vec![SqlValue::from("ann@example.com")]
        );
    }

    #[tokio::test]
    async fn test_find_by_blank_email_is_invalid_argument() {
        let session = RecordingSession::new();
        let repo = SchemaUserRepository::new(&session);

        let error = repo.find_by_email("").await.unwrap_err();
        assert_eq!(error.kind, RepositoryErrorKind::InvalidArgument);
        assert!(session.statements().is_empty());
    }

    #[tokio::test]
    async fn test_search_default_order() {
        let session = RecordingSession::new().reply_rows(vec![stored_row("a@example.com")]);
        let repo = SchemaUserRepository::new(&session);

        let users = repo
            .search(&UserFilter::default(), &PaginationOptions::default())
            .await
            .unwrap();
        assert_eq!(users.len(), 1);

        let sql = session.last_statement().sql;
        assert!(!sql.contains("WHERE"), "{sql}");
        assert!(sql.ends_with(r#"ORDER BY "created_at" DESC"#), "{sql}");
    }

    #[tokio::test]
    async fn test_search_ignores_unknown_sort_fields() {
        let session = RecordingSession::new();
        let repo = SchemaUserRepository::new(&session);
        let pagination = PaginationOptions::builder()
            .sort_by(SortField::desc("password"))
            .sort_by(SortField::asc("Last_Login"))
            .build();

        repo.search(&UserFilter::default(), &pagination).await.unwrap();
        let sql = session.last_statement().sql;
        assert!(sql.contains(r#"ORDER BY "last_login" ASC"#), "{sql}");
        assert!(!sql.contains("password"), "{sql}");
    }

    #[test]
    fn test_backends_bind_identical_parameters() {
        let filter = UserFilter::default()
            .with_ids([Uuid::new_v4(), Uuid::new_v4()])
            .with_email(" Someone@Example.com ")
            .with_username("o_n")
            .with_full_text("some one")
            .with_is_active(true)
            .created_from(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap())
            .created_to(Utc.with_ymd_and_hms(2023, 12, 31, 0, 0, 0).unwrap());
        let pagination = PaginationOptions::builder()
            .page(3, 25)
            .sort_by(SortField::asc("email"))
            .build();

        let native = NativeUserRepository::<RecordingSession>::search_statement(&filter, &pagination);
        let schema =
            SchemaUserRepository::<RecordingSession>::search_statement(&filter, &pagination)
                .unwrap();

        assert_eq!(native.params, schema.params);
        assert_eq!(
            native.sql.matches('$').count(),
            schema.sql.matches('$').count()
        );
        assert!(schema.sql.contains("plainto_tsquery('simple', $5)"), "{}", schema.sql);
        assert!(!schema.sql.contains('?'), "{}", schema.sql);
    }

    fn assert_send<T: Send>(_: &T) {}

    #[test]
    fn test_repository_futures_are_send() {
        let session = RecordingSession::new();
        let repo = SchemaUserRepository::new(&session);
        let user = User::new("send@example.com", "send");
        let filter = UserFilter::default();
        let pagination = PaginationOptions::default();

        assert_send(&repo.create(&user));
        assert_send(&repo.get_by_id(Uuid::new_v4()));
        assert_send(&repo.find_by_email("send@example.com"));
        assert_send(&repo.search(&filter, &pagination));
        assert_send(&SchemaUserRepository::<RecordingSession>::select());
    }

    #[test]
    fn test_backends_insert_identical_parameters() {
        let user = User::new("Both@Example.com", "both")
            .with_full_name("Both Backends")
            .active(true);

        let native = NativeUserRepository::<RecordingSession>::insert_statement(&user);
        let schema = SchemaUserRepository::<RecordingSession>::insert_statement(&user).unwrap();
        assert_eq!(native.params, schema.params);
    }
}
