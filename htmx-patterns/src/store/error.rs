//! Store error types
//!
//! Structured errors for monster store operations, carrying the operation that
//! failed, a category, and the record involved.
//!
//! # Example
//!
//! ```rust
//! use htmx_patterns::store::{StoreError, StoreErrorKind};
//!
//! let error = StoreError::not_found(42);
//! assert_eq!(error.kind, StoreErrorKind::NotFound);
//! assert_eq!(error.monster_id, Some(42));
//! ```

use std::fmt;

/// Operation being performed when the store error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    /// Fetching a single monster
    Get,
    /// Listing monsters
    List,
    /// Counting monsters
    Count,
    /// Creating a monster
    Create,
    /// Persisting changes to an existing monster
    Save,
    /// Deleting a monster
    Delete,
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::List => write!(f, "list"),
            Self::Count => write!(f, "count"),
            Self::Create => write!(f, "create"),
            Self::Save => write!(f, "save"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Category of store error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreErrorKind {
    /// Monster does not exist
    NotFound,
    /// Backend is unavailable
    Unavailable,
    /// Other unclassified error
    Other,
}

impl fmt::Display for StoreErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::Unavailable => write!(f, "unavailable"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Structured store error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    /// The operation being performed when the error occurred
    pub operation: StoreOperation,
    /// The category of error
    pub kind: StoreErrorKind,
    /// Human-readable error message
    pub message: String,
    /// The monster involved, when known
    pub monster_id: Option<u64>,
}

impl StoreError {
    /// Create a new store error
    pub fn new(operation: StoreOperation, kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            monster_id: None,
        }
    }

    /// Monster with the given id does not exist
    pub fn not_found(monster_id: u64) -> Self {
        Self {
            operation: StoreOperation::Get,
            kind: StoreErrorKind::NotFound,
            message: "Monster not found".to_string(),
            monster_id: Some(monster_id),
        }
    }

    /// Backend could not serve the request
    pub fn unavailable(operation: StoreOperation, message: impl Into<String>) -> Self {
        Self::new(operation, StoreErrorKind::Unavailable, message)
    }

    /// Override the operation (e.g. a not-found raised while saving)
    #[must_use]
    pub fn during(mut self, operation: StoreOperation) -> Self {
        self.operation = operation;
        self
    }

    /// Whether the error means the record is missing
    pub fn is_not_found(&self) -> bool {
        self.kind == StoreErrorKind::NotFound
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Store {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let Some(id) = self.monster_id {
            write!(f, " [monster: {}]", id)?;
        }
        Ok(())
    }
}

impl std::error::Error for StoreError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found() {
        let err = StoreError::not_found(7);
        assert_eq!(err.operation, StoreOperation::Get);
        assert!(err.is_not_found());
        assert_eq!(err.monster_id, Some(7));
    }

    #[test]
    fn test_during_changes_operation() {
        let err = StoreError::not_found(7).during(StoreOperation::Save);
        assert_eq!(err.operation, StoreOperation::Save);
        assert!(err.is_not_found());
    }

    #[test]
    fn test_display_formatting() {
        let err = StoreError::not_found(3);
        assert_eq!(
            err.to_string(),
            "Store not_found error during get: Monster not found [monster: 3]"
        );

        let err = StoreError::unavailable(StoreOperation::List, "lock poisoned");
        assert_eq!(err.to_string(), "Store unavailable error during list: lock poisoned");
        assert!(!err.is_not_found());
    }
}
