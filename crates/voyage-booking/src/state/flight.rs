//! # Flight Booking Store
//!
//! Holds the selected flight offer, its passengers and the booking result.
//!
//! ## Booking Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Flight Store Operations                              │
//! │                                                                         │
//! │  Caller Action            Store Method              State Change        │
//! │  ─────────────            ────────────              ────────────        │
//! │                                                                         │
//! │  Pick offer ─────────────► select_offer() ────────► offer, passengers  │
//! │                                                                         │
//! │  Change pax count ───────► set_passenger_count() ─► passengers resized │
//! │                                                                         │
//! │  Edit passenger ─────────► update_passenger(i) ───► passengers[i]      │
//! │                                                                         │
//! │  Agent login ────────────► apply_b2b_discount() ──► discount_rate      │
//! │                                                                         │
//! │  Pay ───────────────────► confirm_booking() ─────► loading → confirmed │
//! │                                                   reference, tickets,  │
//! │                                                   invoice              │
//! │                                                                         │
//! │  NOTE: Prices are never stored. price_breakdown() derives them from     │
//! │        base_price, passenger_count and the rates on every call.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};
use voyage_core::money::Money;
use voyage_core::pricing::{self, derive_price, PriceBreakdown};
use voyage_core::seeding::{reseed, seed, Traveller};
use voyage_core::validation::validate_passenger_count;
use voyage_core::{BookingStatus, ContactInfo, Currency, FlightOffer, Passenger, ProductKind, Rate, DEFAULT_CABIN_CLASS};

use super::{emit_outcome, Invoice, SharedState};
use crate::config::PricingContext;
use crate::error::{BookingError, BookingResult};
use crate::events::{BookingEventEmitter, NoOpEmitter};
use crate::gateway::{BookingGateway, FlightOrderRequest};

const KIND: ProductKind = ProductKind::Flight;

// =============================================================================
// State
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightBookingState {
    pub offer: Option<FlightOffer>,
    pub passenger_count: u32,
    pub cabin_class: String,
    pub passengers: Vec<Passenger>,
    pub contact: ContactInfo,

    pub is_logged_in: bool,
    pub is_b2b: bool,
    pub discount_rate: Rate,
    pub discount_code: String,

    /// Per-passenger fare parsed from the offer.
    pub base_price: Money,
    pub currency: Currency,
    pub payment_reference: Option<String>,

    pub invoice: Option<Invoice>,
    pub booking_reference: String,
    pub ticket_numbers: Vec<String>,
    pub status: BookingStatus,
    pub error_message: String,

    #[serde(skip)]
    epoch: u64,
}

impl Default for FlightBookingState {
    fn default() -> Self {
        FlightBookingState {
            offer: None,
            passenger_count: 1,
            cabin_class: DEFAULT_CABIN_CLASS.to_string(),
            passengers: Vec::new(),
            contact: ContactInfo::default(),
            is_logged_in: false,
            is_b2b: false,
            discount_rate: Rate::zero(),
            discount_code: String::new(),
            base_price: Money::zero(),
            currency: Currency::Usd,
            payment_reference: None,
            invoice: None,
            booking_reference: String::new(),
            ticket_numbers: Vec::new(),
            status: BookingStatus::Idle,
            error_message: String::new(),
            epoch: 0,
        }
    }
}

impl FlightBookingState {
    fn ensure_not_loading(&self) -> BookingResult<()> {
        if self.status == BookingStatus::Loading {
            return Err(BookingError::InProgress { kind: KIND });
        }
        Ok(())
    }

    fn clear_result(&mut self) {
        self.invoice = None;
        self.booking_reference.clear();
        self.ticket_numbers.clear();
        self.status = BookingStatus::Idle;
        self.error_message.clear();
    }
}

// =============================================================================
// Store
// =============================================================================

#[derive(Clone)]
pub struct FlightBookingStore {
    state: SharedState<FlightBookingState>,
    gateway: Arc<dyn BookingGateway>,
    emitter: Arc<dyn BookingEventEmitter>,
    pricing: PricingContext,
}

impl FlightBookingStore {
    pub fn new(gateway: Arc<dyn BookingGateway>, pricing: PricingContext) -> Self {
        FlightBookingStore {
            state: SharedState::new(FlightBookingState::default()),
            gateway,
            emitter: Arc::new(NoOpEmitter),
            pricing,
        }
    }

    pub fn with_emitter(mut self, emitter: Arc<dyn BookingEventEmitter>) -> Self {
        self.emitter = emitter;
        self
    }

    pub fn snapshot(&self) -> FlightBookingState {
        self.state.snapshot()
    }

    pub fn status(&self) -> BookingStatus {
        self.state.with(|s| s.status)
    }

    // =========================================================================
    // Selection & Passengers
    // =========================================================================

    /// Selects an offer and seeds one blank passenger per head.
    ///
    /// Starts a new booking: any previous result is cleared.
    pub fn select_offer(&self, offer: FlightOffer, passenger_count: u32) -> BookingResult<()> {
        validate_passenger_count(passenger_count)?;
        let base_price = offer.unit_price()?;
        let currency = offer.currency()?;
        let cabin_class = offer.cabin_class();

        self.state.with_mut(|s| {
            s.ensure_not_loading()?;
            debug!(offer_id = %offer.id, passenger_count, %cabin_class, "Flight offer selected");

            s.passengers = seed(passenger_count as usize, &s.contact);
            s.passenger_count = passenger_count;
            s.base_price = base_price;
            s.currency = currency;
            s.cabin_class = cabin_class;
            s.offer = Some(offer);
            s.clear_result();
            Ok(())
        })
    }

    /// Resizes the passenger list, keeping entered values where the index survives.
    pub fn set_passenger_count(&self, count: u32) -> BookingResult<()> {
        validate_passenger_count(count)?;
        self.state.with_mut(|s| {
            s.ensure_not_loading()?;
            s.passengers = reseed(&s.passengers, count as usize, &s.contact);
            s.passenger_count = count;
            Ok(())
        })
    }

    pub fn update_passenger<F>(&self, index: usize, edit: F) -> BookingResult<()>
    where
        F: FnOnce(&mut Passenger),
    {
        self.state.with_mut(|s| {
            let len = s.passengers.len();
            let passenger = s
                .passengers
                .get_mut(index)
                .ok_or(BookingError::TravellerIndex { index, len })?;
            edit(passenger);
            Ok(())
        })
    }

    /// Sets the booking contact and copies it onto the lead passenger.
    pub fn set_contact(&self, email: impl Into<String>, phone: impl Into<String>) {
        let contact = ContactInfo::new(email, phone);
        self.state.with_mut(|s| {
            if let Some(lead) = s.passengers.first_mut() {
                lead.set_contact(&contact);
            }
            s.contact = contact;
        });
    }

    pub fn set_logged_in(&self, logged_in: bool) {
        self.state.with_mut(|s| s.is_logged_in = logged_in);
    }

    pub fn set_payment_reference(&self, reference: Option<String>) {
        self.state.with_mut(|s| s.payment_reference = reference);
    }

    // =========================================================================
    // Discounts & Pricing
    // =========================================================================

    /// Rates above 100% are rejected and leave the current discount in place.
    pub fn apply_b2b_discount(&self, rate: Rate, code: impl Into<String>) -> BookingResult<()> {
        let rate = Rate::try_from_bps(rate.bps())?;
        let code = code.into();
        debug!(rate_bps = rate.bps(), %code, "B2B discount applied");
        self.state.with_mut(|s| {
            s.is_b2b = true;
            s.discount_rate = rate;
            s.discount_code = code;
        });
        Ok(())
    }

    pub fn clear_discount(&self) {
        self.state.with_mut(|s| {
            s.is_b2b = false;
            s.discount_rate = Rate::zero();
            s.discount_code.clear();
        });
    }

    pub fn price_breakdown(&self) -> PriceBreakdown {
        let tax_rate = self.pricing.tax_rate;
        self.state
            .with(|s| derive_price(s.base_price, s.passenger_count, tax_rate, s.discount_rate))
    }

    /// Formats a USD amount in naira at the configured rate.
    pub fn format_ngn(&self, usd: Money) -> String {
        pricing::format_ngn(usd, &self.pricing.ngn_rate)
    }

    pub fn generate_invoice(&self) -> Invoice {
        let invoice = Invoice::issue(KIND, Utc::now());
        self.state.with_mut(|s| s.invoice = Some(invoice.clone()));
        invoice
    }

    // =========================================================================
    // Confirmation
    // =========================================================================

    /// Places the flight order and returns the booking reference.
    ///
    /// Moves `idle → loading` before calling the supplier, then to
    /// `confirmed` or `error`. A reset during the call discards its result.
    pub async fn confirm_booking(&self) -> BookingResult<String> {
        let (request, epoch) = self.state.with_mut(|s| {
            let offer = s.offer.clone().ok_or(BookingError::NoSelection { kind: KIND })?;
            s.status = s.status.transition(BookingStatus::Loading)?;
            s.error_message.clear();

            let request = FlightOrderRequest {
                offer,
                travelers: s.passengers.clone(),
                contact: s.contact.clone(),
                payment_reference: s.payment_reference.clone(),
            };
            Ok::<_, BookingError>((request, s.epoch))
        })?;
        self.emitter.emit_status(KIND, BookingStatus::Loading);
        info!(offer_id = %request.offer.id, travelers = request.travelers.len(), "Creating flight order");

        let response = self.gateway.create_flight_order(&request).await;

        let outcome = self.state.with_mut(|s| {
            if s.epoch != epoch {
                return Err(BookingError::Superseded { kind: KIND });
            }
            match response {
                Ok(confirmation) => {
                    s.status = s.status.transition(BookingStatus::Confirmed)?;
                    s.booking_reference = confirmation.reference.clone();
                    s.ticket_numbers = confirmation.ticket_numbers;
                    s.invoice = Some(Invoice::issue(KIND, Utc::now()));
                    Ok(confirmation.reference)
                }
                Err(err) => {
                    s.status = s.status.transition(BookingStatus::Error)?;
                    s.error_message = err.to_string();
                    Err(err.into())
                }
            }
        });

        match &outcome {
            Ok(reference) => info!(%reference, "Flight booking confirmed"),
            Err(err) => warn!(error = %err, "Flight booking failed"),
        }
        emit_outcome(self.emitter.as_ref(), KIND, &outcome);
        outcome
    }

    /// Returns to the initial state. The login flag is a session property and survives.
    pub fn reset(&self) {
        self.state.with_mut(|s| {
            let next = FlightBookingState {
                is_logged_in: s.is_logged_in,
                epoch: s.epoch + 1,
                ..Default::default()
            };
            *s = next;
        });
        self.emitter.emit_status(KIND, BookingStatus::Idle);
    }
}
