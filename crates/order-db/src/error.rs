//! # Store Errors
//!
//! What can go wrong between a repository call and SQLite.
//!
//! ```text
//! repository pre-check ──► NotFound / Conflict / DeleteBlocked / Rule
//! sqlx::Error ───────────► Conflict (UNIQUE), ForeignKeyViolation,
//!                          PoolExhausted, ConnectionFailed, QueryFailed, Internal
//!                 │
//!                 ▼
//!        console AppError (printed inline, the menu carries on)
//! ```
//!
//! `Display` texts are shown to the operator, so they read as sentences.

use sqlx::error::ErrorKind;
use thiserror::Error;

use order_core::{CoreError, ValidationError};

#[derive(Debug, Error)]
pub enum DbError {
    /// An id typed by the operator matches no row.
    #[error("{entity} with ID {id} does not exist")]
    NotFound { entity: String, id: String },

    /// Duplicate email or product name (both case-insensitive), or a
    /// second address of the same type for one customer.
    #[error("{field} '{value}' is already taken")]
    Conflict { field: String, value: String },

    /// Dependent rows keep this one alive.
    #[error("Cannot delete {entity} {id}: {reason}")]
    DeleteBlocked {
        entity: String,
        id: i64,
        reason: String,
    },

    /// A business rule rejected the write (stock, status, item reference).
    #[error(transparent)]
    Rule(#[from] CoreError),

    /// SQLite refused a row pointing at a missing parent.
    #[error("Referenced row is missing: {message}")]
    ForeignKeyViolation { message: String },

    #[error("Could not open the database: {0}")]
    ConnectionFailed(String),

    #[error("Could not update the database schema: {0}")]
    MigrationFailed(String),

    /// Any other error SQLite reported for a statement.
    #[error("Statement rejected by SQLite: {0}")]
    QueryFailed(String),

    /// The single connection stayed busy past the acquire timeout.
    #[error("Timed out waiting for the database connection")]
    PoolExhausted,

    #[error("Unexpected database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub fn conflict(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::Conflict {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn delete_blocked(entity: impl Into<String>, id: i64, reason: impl Into<String>) -> Self {
        DbError::DeleteBlocked {
            entity: entity.into(),
            id,
            reason: reason.into(),
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, DbError::Conflict { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound { .. })
    }

    /// Replaces the placeholder value of a store-level conflict.
    ///
    /// SQLite's message names the column but not the value, so callers that
    /// know what they tried to insert fill it in.
    pub(crate) fn with_conflict_value(self, value: &str) -> Self {
        match self {
            DbError::Conflict { field, .. } => DbError::Conflict {
                field,
                value: value.to_string(),
            },
            other => other,
        }
    }
}

impl From<ValidationError> for DbError {
    fn from(err: ValidationError) -> Self {
        DbError::Rule(CoreError::Validation(err))
    }
}

/// Column named in `UNIQUE constraint failed: customers.email`, if any.
fn unique_column(message: &str) -> Option<&str> {
    let columns = message.strip_prefix("UNIQUE constraint failed: ")?;
    let first = columns.split(',').next()?.trim();
    Some(first.rsplit('.').next().unwrap_or(first))
}

/// Maps sqlx failures onto store errors.
///
/// Constraint failures are recognised through sqlx's `ErrorKind`; the
/// UNIQUE message is read once more for the column name.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => match db_err.kind() {
                ErrorKind::UniqueViolation => DbError::Conflict {
                    field: unique_column(db_err.message())
                        .unwrap_or("value")
                        .to_string(),
                    value: String::new(),
                },
                ErrorKind::ForeignKeyViolation => DbError::ForeignKeyViolation {
                    message: db_err.message().to_string(),
                },
                _ => DbError::QueryFailed(db_err.message().to_string()),
            },
            sqlx::Error::RowNotFound => DbError::not_found("Record", "?"),
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => {
                DbError::ConnectionFailed("the connection pool is closed".to_string())
            }
            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;
