//! Hand-assembled statement builders
//!
//! Statements are composed from column lists, [`Predicate`]s and resolved
//! ordering, written with `?` placeholders and renumbered to PostgreSQL's
//! `$n` form in a single final pass.

use crate::repository::order::OrderBy;
use crate::repository::predicate::Predicate;
use crate::repository::session::{SqlValue, Statement};

/// Rewrite `?` placeholders to `$1..$n`, leaving quoted literals alone
///
/// # Example
///
/// ```rust
/// use user_store::repository::native::to_dollar_placeholders;
///
/// assert_eq!(
///     to_dollar_placeholders("a = ? AND b = '?' AND c IN (?, ?)"),
///     "a = $1 AND b = '?' AND c IN ($2, $3)"
/// );
/// ```
pub fn to_dollar_placeholders(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len() + 8);
    let mut in_literal = false;
    let mut n = 0;

    for c in sql.chars() {
        match c {
            '\'' => {
                in_literal = !in_literal;
                out.push(c);
            }
            '?' if !in_literal => {
                n += 1;
                out.push('$');
                out.push_str(&n.to_string());
            }
            _ => out.push(c),
        }
    }
    out
}

fn bigint(value: u64) -> SqlValue {
    SqlValue::BigInt(Some(i64::try_from(value).unwrap_or(i64::MAX)))
}

/// `SELECT ... FROM ... [WHERE ...] [ORDER BY ...] [LIMIT ?] [OFFSET ?]`
#[derive(Debug, Clone)]
pub struct SelectBuilder {
    table: &'static str,
    columns: Vec<&'static str>,
    predicates: Vec<Predicate>,
    order_by: Vec<OrderBy>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl SelectBuilder {
    /// Select `columns` from `table`
    pub fn new(table: &'static str, columns: &[&'static str]) -> Self {
        Self {
            table,
            columns: columns.to_vec(),
            predicates: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// Add one predicate, combined with `AND`
    #[must_use]
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Add several predicates, combined with `AND`
    #[must_use]
    pub fn filters(mut self, predicates: impl IntoIterator<Item = Predicate>) -> Self {
        self.predicates.extend(predicates);
        self
    }

    /// Append ordering terms
    #[must_use]
    pub fn order_by(mut self, order: impl IntoIterator<Item = OrderBy>) -> Self {
        self.order_by.extend(order);
        self
    }

    /// Limit the number of rows
    #[must_use]
    pub fn limit(mut self, limit: Option<u64>) -> Self {
        self.limit = limit;
        self
    }

    /// Skip rows
    #[must_use]
    pub fn offset(mut self, offset: Option<u64>) -> Self {
        self.offset = offset;
        self
    }

    /// Assemble the statement
    pub fn build(self) -> Statement {
        let mut sql = format!("SELECT {} FROM {}", self.columns.join(", "), self.table);
        let mut params = Vec::new();

        if !self.predicates.is_empty() {
            let conditions: Vec<&str> = self
                .predicates
                .iter()
                .map(|predicate| predicate.template.as_str())
                .collect();
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
            for predicate in self.predicates {
                params.extend(predicate.params);
            }
        }

        if !self.order_by.is_empty() {
            let terms: Vec<String> = self.order_by.iter().map(ToString::to_string).collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&terms.join(", "));
        }

        if let Some(limit) = self.limit {
            sql.push_str(" LIMIT ?");
            params.push(bigint(limit));
        }

        if let Some(offset) = self.offset {
            sql.push_str(" OFFSET ?");
            params.push(bigint(offset));
        }

        Statement::new(to_dollar_placeholders(&sql), params)
    }
}

/// `INSERT INTO ... (...) VALUES (...) [RETURNING ...]`
#[derive(Debug, Clone)]
pub struct InsertBuilder {
    table: &'static str,
    values: Vec<(&'static str, SqlValue)>,
    returning: Vec<&'static str>,
}

impl InsertBuilder {
    /// Insert into `table`
    pub fn into_table(table: &'static str) -> Self {
        Self {
            table,
            values: Vec::new(),
            returning: Vec::new(),
        }
    }

    /// Column/value pairs to write
    #[must_use]
    pub fn values(mut self, values: impl IntoIterator<Item = (&'static str, SqlValue)>) -> Self {
        self.values.extend(values);
        self
    }

    /// Columns to return from the inserted row
    #[must_use]
    pub fn returning(mut self, columns: &[&'static str]) -> Self {
        self.returning = columns.to_vec();
        self
    }

    /// Assemble the statement
    pub fn build(self) -> Statement {
        let (columns, params): (Vec<&str>, Vec<SqlValue>) = self.values.into_iter().unzip();
        let placeholders = vec!["?"; columns.len()].join(", ");

        let mut sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            columns.join(", "),
            placeholders
        );
        if !self.returning.is_empty() {
            sql.push_str(" RETURNING ");
            sql.push_str(&self.returning.join(", "));
        }

        Statement::new(to_dollar_placeholders(&sql), params)
    }
}
