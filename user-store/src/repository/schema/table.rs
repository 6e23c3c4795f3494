//! Typed description of the `users` table for `sea-query`

use sea_query::extension::postgres::PgExpr;
use sea_query::{Condition, Expr, Iden, LikeExpr, Order, Value, Values};

use crate::error::{DatabaseError, DatabaseErrorKind, DatabaseOperation};
use crate::models::UserFilter;
use crate::pagination::OrderDirection;
use crate::repository::native::to_dollar_placeholders;
use crate::repository::order::SortColumn;
use crate::repository::predicate::FULL_TEXT_TEMPLATE;
use crate::repository::row::columns;
use crate::repository::session::SqlValue;

/// The `users` table and its columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Iden)]
pub enum Users {
    Table,
    Id,
    Email,
    Username,
    FullName,
    CreatedAt,
    LastLogin,
    IsActive,
}

impl Users {
    /// Every column, in select order
    pub const COLUMNS: [Users; 7] = [
        Users::Id,
        Users::Email,
        Users::Username,
        Users::FullName,
        Users::CreatedAt,
        Users::LastLogin,
        Users::IsActive,
    ];

    /// Column for a physical column name
    pub fn from_column(name: &str) -> Option<Self> {
        match name {
            columns::ID => Some(Self::Id),
            columns::EMAIL => Some(Self::Email),
            columns::USERNAME => Some(Self::Username),
            columns::FULL_NAME => Some(Self::FullName),
            columns::CREATED_AT => Some(Self::CreatedAt),
            columns::LAST_LOGIN => Some(Self::LastLogin),
            columns::IS_ACTIVE => Some(Self::IsActive),
            _ => None,
        }
    }
}

impl From<SortColumn> for Users {
    fn from(column: SortColumn) -> Self {
        match column {
            SortColumn::CreatedAt => Self::CreatedAt,
            SortColumn::Username => Self::Username,
            SortColumn::Email => Self::Email,
            SortColumn::LastLogin => Self::LastLogin,
        }
    }
}

pub(crate) fn sort_order(direction: OrderDirection) -> Order {
    match direction {
        OrderDirection::Ascending => Order::Asc,
        OrderDirection::Descending => Order::Desc,
    }
}

/// Build the `WHERE` condition for a filter
///
/// Mirrors the rules of [`translate`](crate::repository::predicate::translate)
/// one for one, in the same order.
pub fn conditions(filter: &UserFilter) -> Condition {
    let mut condition = Condition::all();

    if !filter.ids.is_empty() {
        condition = condition.add(Expr::col(Users::Id).is_in(filter.ids.iter().copied()));
    }

    if let Some(email) = filter.normalized_email() {
        condition = condition.add(Expr::col(Users::Email).eq(email));
    }

    if let Some(pattern) = filter.username_pattern() {
        condition =
            condition.add(Expr::col(Users::Username).ilike(LikeExpr::new(pattern).escape('\\')));
    }

    // Custom expressions only bind numbered `$n` marks on Postgres
    if let Some(text) = filter.full_text_query() {
        condition = condition.add(Expr::cust_with_values(
            to_dollar_placeholders(FULL_TEXT_TEMPLATE),
            [text.to_string()],
        ));
    }

    if let Some(is_active) = filter.is_active {
        condition = condition.add(Expr::col(Users::IsActive).eq(is_active));
    }

    if let Some(from) = filter.created_from {
        condition = condition.add(Expr::col(Users::CreatedAt).gte(from));
    }

    if let Some(to) = filter.created_to {
        condition = condition.add(Expr::col(Users::CreatedAt).lte(to));
    }

    condition
}

impl From<SqlValue> for Value {
    fn from(value: SqlValue) -> Self {
        match value {
            SqlValue::Uuid(v) => Value::Uuid(v.map(Box::new)),
            SqlValue::Text(v) => Value::String(v.map(Box::new)),
            SqlValue::Bool(v) => Value::Bool(v),
            SqlValue::Timestamp(v) => Value::ChronoDateTimeUtc(v.map(Box::new)),
            SqlValue::BigInt(v) => Value::BigInt(v),
        }
    }
}

fn bind_value(value: Value) -> Result<SqlValue, DatabaseError> {
    match value {
        Value::Uuid(v) => Ok(SqlValue::Uuid(v.map(|b| *b))),
        Value::String(v) => Ok(SqlValue::Text(v.map(|b| *b))),
        Value::Bool(v) => Ok(SqlValue::Bool(v)),
        Value::ChronoDateTimeUtc(v) => Ok(SqlValue::Timestamp(v.map(|b| *b))),
        Value::BigInt(v) => Ok(SqlValue::BigInt(v)),
        Value::BigUnsigned(v) => Ok(SqlValue::BigInt(
            v.map(|n| i64::try_from(n).unwrap_or(i64::MAX)),
        )),
        other => Err(DatabaseError::new(
            DatabaseOperation::Query,
            DatabaseErrorKind::TypeConversion,
            format!("unsupported parameter type: {:?}", other),
        )),
    }
}

/// Convert the values collected by a built query into session parameters
pub fn bind_values(values: Values) -> Result<Vec<SqlValue>, DatabaseError> {
    values.0.into_iter().map(bind_value).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use sea_query::{PostgresQueryBuilder, Query};
    use uuid::Uuid;

    fn where_clause(filter: &UserFilter) -> (String, Vec<SqlValue>) {
        let (sql, values) = Query::select()
            .column(Users::Id)
            .from(Users::Table)
            .cond_where(conditions(filter))
            .build(PostgresQueryBuilder);
        (sql, bind_values(values).unwrap())
    }

    #[test]
    fn test_iden_names_match_columns() {
        assert_eq!(Iden::to_string(&Users::Table), "users");
        for (iden, name) in Users::COLUMNS.iter().zip(columns::ALL) {
            assert_eq!(Iden::to_string(iden), name);
            assert_eq!(Users::from_column(name), Some(*iden));
        }
        assert_eq!(Users::from_column("password"), None);
    }

    #[test]
    fn test_empty_filter_has_no_conditions() {
        assert!(conditions(&UserFilter::default()).is_empty());
    }

    #[test]
    fn test_username_uses_escaped_ilike() {
        let (sql, params) = where_clause(&UserFilter::default().with_username("50%"));
        assert!(sql.contains(r#""username" ILIKE ($1 ESCAPE E'\\')"#), "{sql}");
        assert_eq!(params, vec![SqlValue::from("%50\\%%")]);
    }

    #[test]
    fn test_full_text_is_parameterized() {
        let (sql, params) = where_clause(&UserFilter::default().with_full_text("jane doe"));
        assert!(sql.contains("plainto_tsquery('simple', $1)"), "{sql}");
        assert!(!sql.contains('?'), "{sql}");
        assert_eq!(params, vec![SqlValue::from("jane doe")]);
    }

    #[test]
    fn test_full_text_numbers_after_earlier_params() {
        let filter = UserFilter::default()
            .with_email("a@b.c")
            .with_full_text("jane")
            .with_is_active(true);
        let (sql, params) = where_clause(&filter);
        assert!(sql.contains("plainto_tsquery('simple', $2)"), "{sql}");
        assert!(sql.contains(r#""is_active" = $3"#), "{sql}");
        assert_eq!(
            params,
            vec![
                SqlValue::from("a@b.c"),
                SqlValue::from("jane"),
                SqlValue::from(true),
            ]
        );
    }

    #[test]
    fn test_params_follow_rule_order() {
        let id = Uuid::new_v4();
        let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 6, 30, 0, 0, 0).unwrap();
        let filter = UserFilter::default()
            .with_ids([id])
            .with_email("A@B.C")
            .with_is_active(false)
            .created_from(from)
            .created_to(to);

        let (sql, params) = where_clause(&filter);
        assert!(sql.contains(r#""created_at" <= $5"#), "{sql}");
        assert_eq!(
            params,
            vec![
                SqlValue::from(id),
                SqlValue::from("a@b.c"),
                SqlValue::from(false),
                SqlValue::from(from),
                SqlValue::from(to),
            ]
        );
    }

    #[test]
    fn test_value_conversion_keeps_typed_nulls() {
        for value in [
            SqlValue::Text(None),
            SqlValue::Timestamp(None),
            SqlValue::from(Uuid::nil()),
            SqlValue::from(3_i64),
        ] {
            assert_eq!(bind_value(Value::from(value.clone())).unwrap(), value);
        }
    }

    #[test]
    fn test_unsupported_value_is_type_conversion_error() {
        let error = bind_value(Value::Double(Some(1.5))).unwrap_err();
        assert_eq!(error.kind, DatabaseErrorKind::TypeConversion);
    }
}
