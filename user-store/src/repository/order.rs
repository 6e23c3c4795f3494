//! Resolution of requested sort fields against the sortable columns
//!
//! Only [`SortColumn`] values can ever reach an `ORDER BY` clause. Requested
//! names outside that set are dropped silently, and when nothing survives the
//! ordering falls back to `created_at DESC`.
//!
//! # Example
//!
//! ```rust
//! use user_store::pagination::SortField;
//! use user_store::repository::order::{resolve, SortColumn};
//!
//! let order = resolve(&[SortField::desc("Email"), SortField::asc("password")]);
//! assert_eq!(order.len(), 1);
//! assert_eq!(order[0].column, SortColumn::Email);
//! assert_eq!(order[0].to_string(), "email DESC");
//! ```

use std::fmt;

use super::row::columns;
use crate::pagination::{OrderDirection, SortField};

/// Columns a search may be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortColumn {
    /// `created_at`
    CreatedAt,
    /// `username`
    Username,
    /// `email`
    Email,
    /// `last_login`
    LastLogin,
}

impl SortColumn {
    /// Every sortable column
    pub const ALL: [SortColumn; 4] = [
        SortColumn::CreatedAt,
        SortColumn::Username,
        SortColumn::Email,
        SortColumn::LastLogin,
    ];

    /// Match a requested name, ignoring case and surrounding whitespace
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|column| column.as_str().eq_ignore_ascii_case(name))
    }

    /// Physical column name
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CreatedAt => columns::CREATED_AT,
            Self::Username => columns::USERNAME,
            Self::Email => columns::EMAIL,
            Self::LastLogin => columns::LAST_LOGIN,
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One resolved `ORDER BY` term
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub column: SortColumn,
    pub direction: OrderDirection,
}

impl OrderBy {
    /// Ordering used when no requested field resolves
    pub const DEFAULT: OrderBy = OrderBy {
        column: SortColumn::CreatedAt,
        direction: OrderDirection::Descending,
    };
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.column, self.direction.as_sql())
    }
}

/// Resolve requested sort fields, keeping caller order
///
/// A column requested more than once keeps its first direction. Never returns
/// an empty list.
pub fn resolve(fields: &[SortField]) -> Vec<OrderBy> {
    let mut resolved: Vec<OrderBy> = Vec::with_capacity(fields.len());

    for field in fields {
        let Some(column) = SortColumn::from_name(&field.name) else {
            tracing::debug!(field = %field.name, "ignoring unknown sort field");
            continue;
        };
        if resolved.iter().any(|order| order.column == column) {
            continue;
        }
        resolved.push(OrderBy {
            column,
            direction: field.direction,
        });
    }

    if resolved.is_empty() {
        resolved.push(OrderBy::DEFAULT);
    }
    resolved
}
