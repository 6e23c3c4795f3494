//! Repository error types
//!
//! Every repository operation that touches the store reports failures as a
//! [`RepositoryError`] whose [`kind`](RepositoryError::kind) tells callers what
//! happened without exposing the raw driver error.
//!
//! # Example
//!
//! ```rust
//! use user_store::repository::{RepositoryError, RepositoryErrorKind};
//!
//! let error = RepositoryError::not_found("User", "0b6f4c1e-0000-0000-0000-000000000000");
//! assert!(matches!(error.kind, RepositoryErrorKind::NotFound));
//! assert!(error.entity_id.is_some());
//! ```

use std::fmt;

/// Operation being performed when the repository error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryOperation {
    /// Creating a new user
    Create,
    /// Fetching a user by identity
    GetById,
    /// Fetching a user by normalized email
    FindByEmail,
    /// Filtered, paginated search
    Search,
}

impl fmt::Display for RepositoryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::GetById => write!(f, "get_by_id"),
            Self::FindByEmail => write!(f, "find_by_email"),
            Self::Search => write!(f, "search"),
        }
    }
}

/// Category of repository error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryErrorKind {
    /// No row matched a lookup that expects exactly one
    NotFound,
    /// A uniqueness constraint was violated on write
    AlreadyExists,
    /// Caller input failed a precondition before the store was called
    InvalidArgument,
    /// The statement did not finish before its deadline
    Timeout,
    /// Any other store failure
    Unknown,
}

impl fmt::Display for RepositoryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::AlreadyExists => write!(f, "already_exists"),
            Self::InvalidArgument => write!(f, "invalid_argument"),
            Self::Timeout => write!(f, "timeout"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Structured repository error with operation context
///
/// # Example
///
/// ```rust
/// use user_store::repository::{RepositoryError, RepositoryOperation};
///
/// let error = RepositoryError::already_exists("User", "duplicate@example.com");
/// assert_eq!(error.operation, RepositoryOperation::Create);
/// println!("{}", error); // "Repository already_exists error during create: ..."
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryError {
    /// The operation being performed when the error occurred
    pub operation: RepositoryOperation,
    /// The category of error
    pub kind: RepositoryErrorKind,
    /// Human-readable error message
    pub message: String,
    /// The type of entity involved
    pub entity_type: Option<String>,
    /// The identifier of the entity involved (id or email)
    pub entity_id: Option<String>,
}

impl RepositoryError {
    /// Create a new repository error
    pub fn new(
        operation: RepositoryOperation,
        kind: RepositoryErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            entity_type: None,
            entity_id: None,
        }
    }

    /// Create a "not found" error with entity context
    pub fn not_found(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self {
            operation: RepositoryOperation::GetById,
            kind: RepositoryErrorKind::NotFound,
            message: "Entity not found".to_string(),
            entity_type: Some(entity_type.into()),
            entity_id: Some(entity_id.into()),
        }
    }

    /// Create an "already exists" error with entity context
    pub fn already_exists(entity_type: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            operation: RepositoryOperation::Create,
            kind: RepositoryErrorKind::AlreadyExists,
            message: "Entity already exists".to_string(),
            entity_type: Some(entity_type.into()),
            entity_id: Some(identifier.into()),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::InvalidArgument, message)
    }

    /// Create an unknown error wrapping a store failure
    pub fn unknown(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::Unknown, message)
    }

    /// Add entity context to an existing error
    #[must_use]
    pub fn with_entity(
        mut self,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Set the operation that caused the error
    #[must_use]
    pub fn with_operation(mut self, operation: RepositoryOperation) -> Self {
        self.operation = operation;
        self
    }

    /// `true` for [`RepositoryErrorKind::NotFound`]
    pub fn is_not_found(&self) -> bool {
        self.kind == RepositoryErrorKind::NotFound
    }

    /// `true` for [`RepositoryErrorKind::AlreadyExists`]
    pub fn is_already_exists(&self) -> bool {
        self.kind == RepositoryErrorKind::AlreadyExists
    }
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Repository {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let (Some(ref entity_type), Some(ref entity_id)) = (&self.entity_type, &self.entity_id) {
            write!(f, " [{}: {}]", entity_type, entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for RepositoryError {}
