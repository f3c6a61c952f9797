//! # Booking Stores
//!
//! One store per booking flow, each owning its state behind a mutex.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Store Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────┐ ┌──────────────────┐ ┌──────────────────┐         │
//! │  │FlightBookingStore│ │HotelBookingStore │ │ TourBookingStore │         │
//! │  │ offer+passengers │ │ hotel+rooms+guest│ │ tour+pkg+lead    │         │
//! │  └────────┬─────────┘ └────────┬─────────┘ └────────┬─────────┘         │
//! │           │                    │                    │                   │
//! │           └──────────┬─────────┴──────────┬─────────┘                   │
//! │                      ▼                    ▼                             │
//! │          Arc<dyn BookingGateway>   Arc<dyn BookingEventEmitter>         │
//! │                                                                         │
//! │  ┌──────────────────┐ ┌──────────────────┐                              │
//! │  │    VisaStore     │ │    AuthStore     │──► Arc<dyn AuthGateway>      │
//! │  │ applicant + docs │ │  user + token    │──► Arc<dyn KeyValueStorage>  │
//! │  └──────────────────┘ └──────────────────┘                              │
//! │                                                                         │
//! │  LOCKING:                                                              │
//! │  • Every read and write goes through SharedState::with / with_mut       │
//! │  • The guard is dropped before any gateway await                        │
//! │  • Results of a call that raced a reset are discarded (epoch check)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod auth;
mod flight;
mod hotel;
mod tour;
mod visa;

pub use auth::{AuthState, AuthStore, AUTH_STORAGE_KEY};
pub use flight::{FlightBookingState, FlightBookingStore};
pub use hotel::{HotelBookingState, HotelBookingStore};
pub use tour::{TourBookingState, TourBookingStore};
pub use visa::{default_documents, VisaState, VisaStore};

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use voyage_core::reference::{invoice_date, invoice_number};
use voyage_core::{BookingStatus, ProductKind};

use crate::error::BookingResult;
use crate::events::BookingEventEmitter;

// =============================================================================
// Shared State
// =============================================================================

/// Store state behind `Arc<Mutex<T>>`.
///
/// A poisoned lock is recovered rather than propagated: every mutation
/// leaves the state consistent before it can panic.
#[derive(Debug)]
pub(crate) struct SharedState<S> {
    inner: Arc<Mutex<S>>,
}

impl<S> SharedState<S> {
    pub(crate) fn new(state: S) -> Self {
        SharedState {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    pub(crate) fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&S) -> R,
    {
        let state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    pub(crate) fn with_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut S) -> R,
    {
        let mut state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }
}

impl<S: Clone> SharedState<S> {
    pub(crate) fn snapshot(&self) -> S {
        self.with(S::clone)
    }
}

impl<S> Clone for SharedState<S> {
    fn clone(&self) -> Self {
        SharedState {
            inner: Arc::clone(&self.inner),
        }
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// Invoice number and display date of a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub number: String,
    pub date: String,
}

impl Invoice {
    /// `INV-`/`HTL-`/`TUR-` invoice with a `14 Oct 2026` date.
    pub fn issue(kind: ProductKind, issued_at: DateTime<Utc>) -> Self {
        Invoice {
            number: invoice_number(kind, issued_at),
            date: invoice_date(issued_at),
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Reports the end of a confirm once the lock is released.
pub(crate) fn emit_outcome(emitter: &dyn BookingEventEmitter, kind: ProductKind, outcome: &BookingResult<String>) {
    match outcome {
        Ok(reference) => {
            emitter.emit_status(kind, BookingStatus::Confirmed);
            emitter.emit_confirmed(kind, reference);
        }
        Err(crate::error::BookingError::Gateway(err)) => {
            emitter.emit_status(kind, BookingStatus::Error);
            emitter.emit_error(kind, &err.to_string());
        }
        // Superseded or rejected before loading: no status change to report.
        Err(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_invoice_issue() {
        let at = Utc.with_ymd_and_hms(2026, 10, 14, 9, 30, 0).unwrap();
        let invoice = Invoice::issue(ProductKind::Hotel, at);
        assert!(invoice.number.starts_with("HTL-"));
        assert_eq!(invoice.date, "14 Oct 2026");
    }

    #[test]
    fn test_shared_state_clones_share_data() {
        let a = SharedState::new(vec![1u32]);
        let b = a.clone();
        b.with_mut(|v| v.push(2));
        assert_eq!(a.snapshot(), vec![1, 2]);
    }
}
