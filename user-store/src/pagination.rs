//! Pagination and ordering options for searches
//!
//! [`PaginationOptions`] is an immutable value built once per call through
//! [`PaginationOptionsBuilder`]. Sort requests are free-form names; they are
//! matched against the sortable columns only when the query is assembled.
//!
//! # Example
//!
//! ```rust
//! use user_store::pagination::{OrderDirection, PaginationOptions, SortField};
//!
//! let options = PaginationOptions::builder()
//!     .limit(10)
//!     .offset(0)
//!     .sort_by(SortField::desc("email"))
//!     .build();
//!
//! assert_eq!(options.limit(), Some(10));
//! assert_eq!(options.offset(), None);
//! assert_eq!(options.sort_fields()[0].direction, OrderDirection::Descending);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Direction for ordering results
///
/// # Example
///
/// ```rust
/// use user_store::pagination::OrderDirection;
///
/// assert_eq!(format!("{}", OrderDirection::Ascending), "asc");
/// assert_eq!(OrderDirection::Descending.as_sql(), "DESC");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    /// Sort in ascending order (A-Z, 0-9, oldest first)
    #[default]
    #[serde(alias = "asc")]
    Ascending,
    /// Sort in descending order (Z-A, 9-0, newest first)
    #[serde(alias = "desc")]
    Descending,
}

impl OrderDirection {
    /// SQL keyword for this direction
    #[must_use]
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }

    /// `true` for [`OrderDirection::Descending`]
    #[must_use]
    pub const fn is_descending(&self) -> bool {
        matches!(self, Self::Descending)
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

/// A requested sort key
///
/// The name is not validated here; unknown names are dropped when the
/// ordering is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortField {
    /// Requested field name, matched case-insensitively
    pub name: String,
    /// Sort direction
    #[serde(default)]
    pub direction: OrderDirection,
}

impl SortField {
    /// Create a sort request
    pub fn new(name: impl Into<String>, direction: OrderDirection) -> Self {
        Self {
            name: name.into(),
            direction,
        }
    }

    /// Ascending sort on `name`
    pub fn asc(name: impl Into<String>) -> Self {
        Self::new(name, OrderDirection::Ascending)
    }

    /// Descending sort on `name`
    pub fn desc(name: impl Into<String>) -> Self {
        Self::new(name, OrderDirection::Descending)
    }
}

/// Limit, offset and ordering for a search
///
/// A limit or offset of zero or less means "none". Sort fields keep the order
/// in which they were added; earlier fields take precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationOptions {
    limit: i64,
    offset: i64,
    sort: Vec<SortField>,
}

impl PaginationOptions {
    /// Start building options
    #[must_use]
    pub fn builder() -> PaginationOptionsBuilder {
        PaginationOptionsBuilder::default()
    }

    /// Maximum number of rows, `None` when unbounded
    pub fn limit(&self) -> Option<u64> {
        u64::try_from(self.limit).ok().filter(|limit| *limit > 0)
    }

    /// Number of rows to skip, `None` when no rows are skipped
    pub fn offset(&self) -> Option<u64> {
        u64::try_from(self.offset).ok().filter(|offset| *offset > 0)
    }

    /// Requested sort keys in precedence order
    pub fn sort_fields(&self) -> &[SortField] {
        &self.sort
    }
}

/// Builder for [`PaginationOptions`]
#[derive(Debug, Clone, Default)]
pub struct PaginationOptionsBuilder {
    limit: i64,
    offset: i64,
    sort: Vec<SortField>,
}

impl PaginationOptionsBuilder {
    /// Set the maximum number of rows (`<= 0` means unbounded)
    #[must_use]
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    /// Set the number of rows to skip (`<= 0` means none)
    #[must_use]
    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    /// Append one sort key
    #[must_use]
    pub fn sort_by(mut self, field: SortField) -> Self {
        self.sort.push(field);
        self
    }

    /// Replace all sort keys
    #[must_use]
    pub fn sort_fields(mut self, fields: impl IntoIterator<Item = SortField>) -> Self {
        self.sort = fields.into_iter().collect();
        self
    }

    /// Set limit and offset for a 1-indexed page
    ///
    /// Page 0 is treated as page 1.
    #[must_use]
    pub fn page(mut self, page_number: i64, page_size: i64) -> Self {
        let page_size = page_size.max(0);
        self.limit = page_size;
        self.offset = (page_number.max(1) - 1).saturating_mul(page_size);
        self
    }

    /// Finish building
    #[must_use]
    pub fn build(self) -> PaginationOptions {
        PaginationOptions {
            limit: self.limit,
            offset: self.offset,
            sort: self.sort,
        }
    }
}
