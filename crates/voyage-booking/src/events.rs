//! # Booking Events
//!
//! Observers for booking status changes.
//!
//! Stores report every status change, successful confirmation and supplier
//! failure to a [`BookingEventEmitter`]. A desktop or web shell implements it
//! to push updates to the UI; the default [`NoOpEmitter`] drops them.

use voyage_core::{BookingStatus, ProductKind};

// =============================================================================
// Event Emitter Trait
// =============================================================================

pub trait BookingEventEmitter: Send + Sync {
    /// Emits a booking status change event.
    fn emit_status(&self, kind: ProductKind, status: BookingStatus);

    /// Emits a confirmed booking with its supplier reference.
    fn emit_confirmed(&self, kind: ProductKind, reference: &str);

    /// Emits a supplier failure.
    fn emit_error(&self, kind: ProductKind, message: &str);
}

/// No-op event emitter.
pub struct NoOpEmitter;

impl BookingEventEmitter for NoOpEmitter {
    fn emit_status(&self, _kind: ProductKind, _status: BookingStatus) {}
    fn emit_confirmed(&self, _kind: ProductKind, _reference: &str) {}
    fn emit_error(&self, _kind: ProductKind, _message: &str) {}
}

// =============================================================================
// Test Support
// =============================================================================

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Recorded {
        Status(ProductKind, BookingStatus),
        Confirmed(ProductKind, String),
        Error(ProductKind, String),
    }

    /// Keeps every event in order.
    #[derive(Default)]
    pub struct RecordingEmitter {
        events: Mutex<Vec<Recorded>>,
    }

    impl RecordingEmitter {
        pub fn events(&self) -> Vec<Recorded> {
            self.events.lock().unwrap().clone()
        }

        pub fn statuses(&self) -> Vec<BookingStatus> {
            self.events()
                .into_iter()
                .filter_map(|e| match e {
                    Recorded::Status(_, status) => Some(status),
                    _ => None,
                })
                .collect()
        }
    }

    impl BookingEventEmitter for RecordingEmitter {
        fn emit_status(&self, kind: ProductKind, status: BookingStatus) {
            self.events.lock().unwrap().push(Recorded::Status(kind, status));
        }

        fn emit_confirmed(&self, kind: ProductKind, reference: &str) {
            self.events
                .lock()
                .unwrap()
                .push(Recorded::Confirmed(kind, reference.to_string()));
        }

        fn emit_error(&self, kind: ProductKind, message: &str) {
            self.events.lock().unwrap().push(Recorded::Error(kind, message.to_string()));
        }
    }
}
