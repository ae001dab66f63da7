use diesel::result::Error as DieselError;
use std::fmt::Display;
use thiserror::Error;

/// Error raised while bringing the database up (pool creation, migrations).
#[derive(Debug, Error)]
pub enum InitError {
    #[error("cannot init database pool : {0}")]
    Pool(String),
    #[error("cannot run database migrations : {0}")]
    Migration(String),
}

/// Unified database error type with context for runtime operations
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Failed to get connection from pool for operation '{operation}': {message}")]
    PoolError { operation: String, message: String },

    #[error("Database interaction failed for operation '{operation}': {message}")]
    InteractionError { operation: String, message: String },

    #[error("Record not found in operation '{operation}'")]
    NotFound { operation: String },

    #[error("Database query error in operation '{operation}': {message}")]
    QueryError { operation: String, message: String },

    #[error("Unique constraint violation in operation '{operation}': {message}")]
    UniqueViolation { operation: String, message: String },

    #[error("Stored journal data is malformed in operation '{operation}': {message}")]
    CorruptData { operation: String, message: String },
}

impl DatabaseError {
    /// Create a `NotFound` error with operation context
    pub fn not_found(operation: impl Display) -> Self {
        Self::NotFound {
            operation: operation.to_string(),
        }
    }

    pub fn corrupt_data(operation: impl Display, message: impl Display) -> Self {
        Self::CorruptData {
            operation: operation.to_string(),
            message: message.to_string(),
        }
    }

    /// Check if this error is a `NotFound` variant
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub const fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation { .. })
    }

    /// Replace the placeholder context set by `From<DieselError>`.
    #[must_use]
    pub fn with_operation(mut self, context: impl Display) -> Self {
        match &mut self {
            Self::PoolError { operation, .. }
            | Self::InteractionError { operation, .. }
            | Self::NotFound { operation }
            | Self::QueryError { operation, .. }
            | Self::UniqueViolation { operation, .. }
            | Self::CorruptData { operation, .. } => *operation = context.to_string(),
        }
        self
    }

    /// Extract the operation context from the error
    pub fn operation(&self) -> &str {
        match self {
            Self::PoolError { operation, .. }
            | Self::InteractionError { operation, .. }
            | Self::NotFound { operation }
            | Self::QueryError { operation, .. }
            | Self::UniqueViolation { operation, .. }
            | Self::CorruptData { operation, .. } => operation,
        }
    }
}

impl From<DieselError> for DatabaseError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => Self::NotFound {
                operation: "unknown".to_string(),
            },
            DieselError::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                info,
            ) => Self::UniqueViolation {
                operation: "unknown".to_string(),
                message: info.message().to_string(),
            },
            other => Self::QueryError {
                operation: "unknown".to_string(),
                message: other.to_string(),
            },
        }
    }
}

impl From<serde_json::Error> for DatabaseError {
    fn from(err: serde_json::Error) -> Self {
        Self::CorruptData {
            operation: "unknown".to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diesel_not_found_maps_to_not_found() {
        let err: DatabaseError = DieselError::NotFound.into();
        assert!(err.is_not_found());
        assert_eq!(err.operation(), "unknown");
    }

    #[test]
    fn test_with_operation_replaces_context() {
        let err = DatabaseError::from(DieselError::RollbackTransaction)
            .with_operation("record operation day 3");
        assert!(matches!(err, DatabaseError::QueryError { .. }));
        assert_eq!(err.operation(), "record operation day 3");
    }

    #[test]
    fn test_json_error_is_corrupt_data() {
        let json_err = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let err: DatabaseError = json_err.into();
        assert!(matches!(err, DatabaseError::CorruptData { .. }));
    }
}
