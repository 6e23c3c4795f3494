//! Translation of a [`UserFilter`] into SQL predicates
//!
//! Each [`Predicate`] is a self-contained condition template with `?`
//! placeholders and the values bound to them. The list returned by
//! [`translate`] is meant to be joined with `AND`; an empty list means
//! "no constraint". Caller values never appear in the template text.
//!
//! # Example
//!
//! ```rust
//! use user_store::models::UserFilter;
//! use user_store::repository::predicate::translate;
//!
//! let filter = UserFilter::default()
//!     .with_email(" Bob@Example.com")
//!     .with_is_active(true);
//!
//! let predicates = translate(&filter);
//! assert_eq!(predicates.len(), 2);
//! assert_eq!(predicates[0].template, "email = ?");
//! assert_eq!(predicates[1].template, "is_active = ?");
//! ```

use super::row::columns;
use super::session::SqlValue;
use crate::models::UserFilter;

/// Text-search condition on the full name, `?` binds a plain phrase
pub const FULL_TEXT_TEMPLATE: &str =
    "to_tsvector('simple', coalesce(full_name, '')) @@ plainto_tsquery('simple', ?)";

/// A single boolean condition with its bound parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    /// Condition text, one `?` per parameter
    pub template: String,
    /// Values for the placeholders, in order
    pub params: Vec<SqlValue>,
}

impl Predicate {
    /// Create a predicate
    pub fn new(template: impl Into<String>, params: Vec<SqlValue>) -> Self {
        Self {
            template: template.into(),
            params,
        }
    }

    /// `column = ?`
    pub fn eq(column: &str, value: impl Into<SqlValue>) -> Self {
        Self::new(format!("{} = ?", column), vec![value.into()])
    }

    /// `column >= ?`
    pub fn gte(column: &str, value: impl Into<SqlValue>) -> Self {
        Self::new(format!("{} >= ?", column), vec![value.into()])
    }

    /// `column <= ?`
    pub fn lte(column: &str, value: impl Into<SqlValue>) -> Self {
        Self::new(format!("{} <= ?", column), vec![value.into()])
    }

    /// `column ILIKE ?`
    pub fn ilike(column: &str, pattern: impl Into<SqlValue>) -> Self {
        Self::new(format!("{} ILIKE ?", column), vec![pattern.into()])
    }

    /// `column IN (?, ?, ...)`
    ///
    /// Callers must not pass an empty list.
    pub fn is_in<V: Into<SqlValue>>(column: &str, values: impl IntoIterator<Item = V>) -> Self {
        let params: Vec<SqlValue> = values.into_iter().map(Into::into).collect();
        let placeholders = vec!["?"; params.len()].join(", ");
        Self::new(format!("{} IN ({})", column, placeholders), params)
    }
}

/// Build the predicates for a filter
///
/// Rules are applied independently, in a fixed order: ids, email, username,
/// full text, active flag, creation lower bound, creation upper bound.
/// Absent or blank inputs produce no predicate.
pub fn translate(filter: &UserFilter) -> Vec<Predicate> {
    let mut predicates = Vec::new();

    if !filter.ids.is_empty() {
        predicates.push(Predicate::is_in(columns::ID, filter.ids.iter().copied()));
    }

    if let Some(email) = filter.normalized_email() {
        predicates.push(Predicate::eq(columns::EMAIL, email));
    }

    if let Some(pattern) = filter.username_pattern() {
        predicates.push(Predicate::ilike(columns::USERNAME, pattern));
    }

    if let Some(text) = filter.full_text_query() {
        predicates.push(Predicate::new(FULL_TEXT_TEMPLATE, vec![SqlValue::from(text)]));
    }

    if let Some(is_active) = filter.is_active {
        predicates.push(Predicate::eq(columns::IS_ACTIVE, is_active));
    }

    if let Some(from) = filter.created_from {
        predicates.push(Predicate::gte(columns::CREATED_AT, from));
    }

    if let Some(to) = filter.created_to {
        predicates.push(Predicate::lte(columns::CREATED_AT, to));
    }

    predicates
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn templates(predicates: &[Predicate]) -> Vec<&str> {
        predicates.iter().map(|p| p.template.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_has_no_predicates() {
        assert!(translate(&UserFilter::default()).is_empty());
    }

    #[test]
    fn test_ids_use_one_placeholder_per_value() {
        let ids = [Uuid::new_v4(), Uuid::new_v4()];
        let predicates = translate(&UserFilter::default().with_ids(ids));
        assert_eq!(predicates.len(), 1);
        assert_eq!(predicates[0].template, "id IN (?, ?)");
        assert_eq!(
            predicates[0].params,
            vec![SqlValue::from(ids[0]), SqlValue::from(ids[1])]
        );
    }

    #[test]
    fn test_empty_id_list_is_skipped() {
        assert!(translate(&UserFilter::default().with_ids(Vec::new())).is_empty());
    }

    #[test]
    fn test_email_is_normalized() {
        let predicates = translate(&UserFilter::default().with_email("  MiXed@Case.IO "));
        assert_eq!(predicates, vec![Predicate::eq("email", "mixed@case.io")]);
    }

    #[test]
    fn test_username_is_contains_pattern() {
        let predicates = translate(&UserFilter::default().with_username(" ann "));
        assert_eq!(templates(&predicates), ["username ILIKE ?"]);
        assert_eq!(predicates[0].params, vec![SqlValue::from("%ann%")]);
    }

    #[test]
    fn test_full_text_is_bound_not_inlined() {
        let phrase = "'); DROP TABLE users; --";
        let predicates = translate(&UserFilter::default().with_full_text(phrase));
        assert_eq!(templates(&predicates), [FULL_TEXT_TEMPLATE]);
        assert!(!predicates[0].template.contains("DROP"));
        assert_eq!(predicates[0].params, vec![SqlValue::from(phrase)]);
    }

    #[test]
    fn test_blank_strings_are_skipped() {
        let filter = UserFilter::default()
            .with_email(" ")
            .with_username("")
            .with_full_text("  ");
        assert!(translate(&filter).is_empty());
    }

    #[test]
    fn test_is_active_false_is_kept() {
        let predicates = translate(&UserFilter::default().with_is_active(false));
        assert_eq!(predicates, vec![Predicate::eq("is_active", false)]);
    }

    #[test]
    fn test_created_range_is_inclusive_on_both_ends() {
        let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
        let predicates = translate(&UserFilter::default().created_from(from).created_to(to));
        assert_eq!(templates(&predicates), ["created_at >= ?", "created_at <= ?"]);
        assert_eq!(predicates[0].params, vec![SqlValue::from(from)]);
        assert_eq!(predicates[1].params, vec![SqlValue::from(to)]);
    }

    #[test]
    fn test_all_rules_in_fixed_order() {
        let filter = UserFilter {
            ids: vec![Uuid::new_v4()],
            email: Some("a@b.c".into()),
            username: Some("a".into()),
            full_text: Some("a".into()),
            is_active: Some(true),
            created_from: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            created_to: Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()),
        };
        assert_eq!(
            templates(&translate(&filter)),
            [
                "id IN (?)",
                "email = ?",
                "username ILIKE ?",
                FULL_TEXT_TEMPLATE,
                "is_active = ?",
                "created_at >= ?",
                "created_at <= ?",
            ]
        );
    }

    #[test]
    fn test_placeholder_count_matches_params() {
        let filter = UserFilter::default()
            .with_ids([Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()])
            .with_username("x")
            .with_full_text("y");
        for predicate in translate(&filter) {
            assert_eq!(predicate.template.matches('?').count(), predicate.params.len());
        }
    }
}
