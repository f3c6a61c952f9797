//! # Booking Error Types
//!
//! Error types for store operations and supplier calls.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Booking Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Store rules    │  │    Supplier     │  │     Infrastructure      │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  NoSelection    │  │  GatewayError   │  │  Storage                │ │
//! │  │  TravellerIndex │  │  ├ Declined     │  │  Config                 │ │
//! │  │  InProgress     │  │  ├ Inventory    │  │                         │ │
//! │  │  Invalid-       │  │  ├ Unavailable  │  │                         │ │
//! │  │   Transition    │  │  ├ Timeout      │  │                         │ │
//! │  │  Superseded     │  │  └ InvalidReq   │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  CoreError (voyage-core) converts via From                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A gateway failure is also recorded on the store itself (`status = error`
//! plus `error_message`), so UIs that only read state still see it.

use thiserror::Error;
use voyage_core::{BookingStatus, CoreError, ProductKind, ValidationError};

/// Result type alias for booking operations.
pub type BookingResult<T> = Result<T, BookingError>;

/// Result type alias for supplier calls.
pub type GatewayResult<T> = Result<T, GatewayError>;

// =============================================================================
// Booking Error
// =============================================================================

#[derive(Debug, Error)]
pub enum BookingError {
    // =========================================================================
    // Store Rules
    // =========================================================================
    /// The operation needs a selected product first.
    #[error("No {kind} selected")]
    NoSelection { kind: ProductKind },

    /// A traveller index past the end of the seeded list.
    #[error("Traveller {index} does not exist (booking has {len})")]
    TravellerIndex { index: usize, len: usize },

    /// Selection changed while the supplier call is running.
    #[error("A {kind} booking is already in progress")]
    InProgress { kind: ProductKind },

    /// The booking lifecycle does not allow this status change.
    #[error("Cannot move booking from {from} to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    /// The store was reset while the supplier call was running; its result
    /// was discarded.
    #[error("The {kind} booking was reset before the supplier answered")]
    Superseded { kind: ProductKind },

    // =========================================================================
    // Supplier
    // =========================================================================
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    // =========================================================================
    // Infrastructure
    // =========================================================================
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Domain error from voyage-core.
    #[error(transparent)]
    Core(CoreError),
}

impl From<CoreError> for BookingError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidTransition { from, to } => BookingError::InvalidTransition { from, to },
            other => BookingError::Core(other),
        }
    }
}

impl From<ValidationError> for BookingError {
    fn from(err: ValidationError) -> Self {
        BookingError::Core(CoreError::Validation(err))
    }
}

impl From<serde_json::Error> for BookingError {
    fn from(err: serde_json::Error) -> Self {
        BookingError::Storage(err.to_string())
    }
}

impl From<std::io::Error> for BookingError {
    fn from(err: std::io::Error) -> Self {
        BookingError::Storage(err.to_string())
    }
}

impl From<toml::de::Error> for BookingError {
    fn from(err: toml::de::Error) -> Self {
        BookingError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for BookingError {
    fn from(err: toml::ser::Error) -> Self {
        BookingError::Config(err.to_string())
    }
}

// =============================================================================
// Gateway Error
// =============================================================================

/// Failures reported by a supplier.
///
/// The display text is what the store copies into `error_message`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Payment was declined: {reason}")]
    PaymentDeclined { reason: String },

    /// Seat, room or package sold out between selection and booking.
    #[error("The selected option is no longer available. Please choose another.")]
    InventoryChanged { product_id: String },

    #[error("{supplier} is temporarily unavailable. Please try again later.")]
    Unavailable { supplier: String },

    #[error("The supplier did not respond within {after_ms} ms")]
    Timeout { after_ms: u64 },

    #[error("{0}")]
    InvalidRequest(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_transition_maps_to_booking_transition() {
        let err: BookingError = CoreError::InvalidTransition {
            from: BookingStatus::Loading,
            to: BookingStatus::Loading,
        }
        .into();
        assert!(matches!(err, BookingError::InvalidTransition { .. }));
        assert_eq!(err.to_string(), "Cannot move booking from loading to loading");
    }

    #[test]
    fn test_validation_maps_to_core() {
        let err: BookingError = ValidationError::Required {
            field: "email".to_string(),
        }
        .into();
        assert!(matches!(err, BookingError::Core(CoreError::Validation(_))));
    }

    #[test]
    fn test_gateway_messages() {
        let err = GatewayError::PaymentDeclined {
            reason: "insufficient funds".to_string(),
        };
        assert_eq!(err.to_string(), "Payment was declined: insufficient funds");

        let err: BookingError = GatewayError::Timeout { after_ms: 30_000 }.into();
        assert_eq!(err.to_string(), "The supplier did not respond within 30000 ms");

        assert_eq!(
            BookingError::NoSelection { kind: ProductKind::Hotel }.to_string(),
            "No hotel selected"
        );
    }
}
