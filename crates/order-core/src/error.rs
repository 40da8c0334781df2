//! # Error Types
//!
//! Domain-specific error types for order-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  order-core errors (this file)                                         │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  order-db errors (separate crate)                                      │
//! │  └── DbError          - Store failures, conflicts, blocked deletes     │
//! │                                                                         │
//! │  console errors (in app)                                               │
//! │  └── AppError         - What the menu loop reports inline              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → AppError → Terminal     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Messages are written to be shown to the operator as-is.

use thiserror::Error;

use crate::types::OrderStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations that span more than one field.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// An order item needs something to describe what was sold.
    #[error("You must provide either a product ID or a description (or both)")]
    MissingItemReference,

    /// Not enough stock to cover the requested quantity.
    ///
    /// ## User Workflow
    /// ```text
    /// Product ID: 4   (stock: 3)
    ///      │
    ///      ▼
    /// Quantity: 5
    ///      │
    ///      ▼
    /// InsufficientStock { product_id: 4, available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// Prompt shows the message and asks for the quantity again
    /// ```
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: i64,
        available: i64,
        requested: i64,
    },

    /// Product stock is zero.
    #[error("Product {product_id} is out of stock")]
    OutOfStock { product_id: i64 },

    /// Orders only move forward through their lifecycle.
    #[error("Order status cannot change from {from} to {to}")]
    InvalidStatusTransition { from: OrderStatus, to: OrderStatus },

    /// A field failed its input rule.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Why a typed value was refused.
///
/// Produced by [`crate::validation`] before anything reaches the store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Nothing (or only whitespace) was typed.
    #[error("{field} cannot be empty")]
    Required { field: String },

    /// Text length outside the allowed window.
    #[error("{field} must be between {min} and {max} characters")]
    Length {
        field: String,
        min: usize,
        max: usize,
    },

    /// Upper bound only, for optional text.
    #[error("{field} cannot exceed {max} characters")]
    TooLong { field: String, max: usize },

    /// Zero or below where a positive number is needed.
    #[error("{field} must be greater than 0")]
    MustBePositive { field: String },

    /// Above the largest amount an order line may carry.
    #[error("{field} cannot be more than {max}")]
    TooLarge { field: String, max: String },

    /// Value must not be negative.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Invalid format (e.g., not a number, not an email, bad date).
    #[error("{field} is not valid: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Not one of the listed names.
    #[error("{field} must be one of: {}", allowed.join(", "))]
    NotAllowed { field: String, allowed: Vec<String> },
}

impl ValidationError {
    pub(crate) fn required(field: &str) -> Self {
        ValidationError::Required {
            field: field.to_string(),
        }
    }

    pub(crate) fn length(field: &str, min: usize, max: usize) -> Self {
        ValidationError::Length {
            field: field.to_string(),
            min,
            max,
        }
    }

    pub(crate) fn too_large(field: &str, max: impl std::fmt::Display) -> Self {
        ValidationError::TooLarge {
            field: field.to_string(),
            max: max.to_string(),
        }
    }

    pub(crate) fn format(field: &str, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result of a domain rule check.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
