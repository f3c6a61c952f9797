//! # Error Types
//!
//! Domain-specific error types for voyage-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  voyage-core errors (this file)                                        │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  voyage-booking errors (separate crate)                                │
//! │  ├── BookingError     - Store operation failures                       │
//! │  └── GatewayError     - Supplier call failures                         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → BookingError → caller             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, value, status)
//! 3. Errors are enum variants, never String

use thiserror::Error;

use crate::types::BookingStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core booking logic errors.
///
/// These errors represent business rule violations or malformed supplier
/// data. They are translated to user-facing messages by the stores.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A supplier price could not be parsed as a decimal amount.
    ///
    /// ## When This Occurs
    /// - Flight offer `price.total` is not a decimal string ("245.50")
    /// - More than two fractional digits
    #[error("Invalid price '{value}': {reason}")]
    InvalidPrice { value: String, reason: String },

    /// Currency code is not one we price in.
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    /// A booking status change that the lifecycle does not allow.
    ///
    /// ## Allowed Transitions
    /// ```text
    /// Idle ──► Loading ──► Confirmed
    ///                  └─► Error
    /// ```
    #[error("Cannot move booking from {from} to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before store state changes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., malformed email, invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidPrice {
            value: "12,50".to_string(),
            reason: "not a decimal number".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid price '12,50': not a decimal number");

        let err = CoreError::InvalidTransition {
            from: BookingStatus::Confirmed,
            to: BookingStatus::Loading,
        };
        assert_eq!(err.to_string(), "Cannot move booking from confirmed to loading");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "Email".to_string(),
        };
        assert_eq!(err.to_string(), "Email is required");

        let err = ValidationError::TooShort {
            field: "password".to_string(),
            min: 6,
        };
        assert_eq!(err.to_string(), "password must be at least 6 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "nationality".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
