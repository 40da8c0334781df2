//! # Application Error Type
//!
//! Unified error type for the console flows.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Console                            │
//! │                                                                         │
//! │  Menu ──► flow (create customer, add order item, ...)                  │
//! │                 │                                                       │
//! │                 ├── field input wrong? ─── re-prompt in place          │
//! │                 │   (never reaches this type)                           │
//! │                 │                                                       │
//! │                 ├── Escape ─────────────── AppError::cancelled()  ──┐  │
//! │                 ├── DbError ────────────── AppError (code + text) ──┤  │
//! │                 └── io::Error ──────────── AppError::terminal    ──┤  │
//! │                                                                     │  │
//! │  Menu ◄── "Operation cancelled" / ⚠️ message, then back to menu ◄──┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use order_core::{CoreError, ValidationError};
use order_db::DbError;

/// Error returned from console flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppError {
    /// Category, used to pick how the menu reports it
    pub code: ErrorCode,

    /// Human-readable message for display
    pub message: String,
}

/// Error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// User pressed Escape inside a prompt
    Cancelled,

    /// Referenced record does not exist
    NotFound,

    /// Duplicate email, product name or address type
    Conflict,

    /// Delete refused because of dependent rows
    DeleteBlocked,

    /// Not enough stock for the requested quantity
    InsufficientStock,

    /// Input validation failed
    ValidationError,

    /// Business rule failed (status transition, item reference)
    BusinessLogic,

    /// Database operation failed
    DatabaseError,

    /// Reading keys or writing to the terminal failed
    Terminal,

    /// Anything else
    Internal,
}

impl AppError {
    /// Creates a new application error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    /// The user backed out of a prompt.
    pub fn cancelled() -> Self {
        AppError::new(ErrorCode::Cancelled, "Operation cancelled")
    }

    pub fn not_found(entity: &str, id: impl fmt::Display) -> Self {
        AppError::new(
            ErrorCode::NotFound,
            format!("{} with ID {} does not exist", entity, id),
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::Internal, message)
    }

    pub fn is_cancelled(&self) -> bool {
        self.code == ErrorCode::Cancelled
    }

    /// True when the session cannot continue (the terminal itself failed).
    pub fn is_fatal(&self) -> bool {
        self.code == ErrorCode::Terminal
    }
}

/// Converts database errors to application errors.
impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => AppError::not_found(&entity, id),
            DbError::Conflict { .. } => AppError::new(ErrorCode::Conflict, err.to_string()),
            DbError::DeleteBlocked { .. } => {
                AppError::new(ErrorCode::DeleteBlocked, err.to_string())
            }
            DbError::Rule(core) => AppError::from(core),
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                AppError::new(ErrorCode::DatabaseError, "Invalid reference")
            }
            DbError::ConnectionFailed(_) | DbError::PoolExhausted => {
                AppError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                AppError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but show a generic message
                tracing::error!("Database query failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to application errors.
impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::InsufficientStock { .. } | CoreError::OutOfStock { .. } => {
                ErrorCode::InsufficientStock
            }
            CoreError::Validation(_) => ErrorCode::ValidationError,
            CoreError::MissingItemReference | CoreError::InvalidStatusTransition { .. } => {
                ErrorCode::BusinessLogic
            }
        };
        AppError::new(code, err.to_string())
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::new(ErrorCode::ValidationError, err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::new(ErrorCode::Terminal, format!("Terminal error: {}", err))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}

/// Result type for console flows.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use order_core::OrderStatus;

    #[test]
    fn test_db_errors_keep_their_category() {
        let err = AppError::from(DbError::not_found("Customer", 4));
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Customer with ID 4 does not exist");

        let err = AppError::from(DbError::conflict("email", "a@b.se"));
        assert_eq!(err.code, ErrorCode::Conflict);

        let err = AppError::from(DbError::Rule(CoreError::InsufficientStock {
            product_id: 1,
            available: 2,
            requested: 3,
        }));
        assert_eq!(err.code, ErrorCode::InsufficientStock);
    }

    #[test]
    fn test_query_failures_are_generic() {
        let err = AppError::from(DbError::QueryFailed("CHECK constraint failed".into()));
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.message, "Database operation failed");
    }

    #[test]
    fn test_status_transition_is_business_logic() {
        let err = AppError::from(CoreError::InvalidStatusTransition {
            from: OrderStatus::Paid,
            to: OrderStatus::Created,
        });
        assert_eq!(err.code, ErrorCode::BusinessLogic);
        assert!(err.message.contains("Paid"));
    }

    #[test]
    fn test_io_errors_are_fatal() {
        let err = AppError::from(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone"));
        assert!(err.is_fatal());
        assert!(!AppError::cancelled().is_fatal());
        assert!(AppError::cancelled().is_cancelled());
    }
}
