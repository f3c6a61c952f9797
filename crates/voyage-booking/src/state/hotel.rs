//! # Hotel Booking Store
//!
//! Holds the selected hotel, its room options, the lead guest of each room
//! and the booking result.
//!
//! ```text
//!   set_hotel(hotel, params)     fetch_rooms()           select_room(room)
//!   ┌───────────────────┐       ┌──────────────────┐     ┌──────────────────┐
//!   │ hotel, params     │──────►│ rooms_loading    │────►│ selected_room    │
//!   │ rooms cleared     │       │ available_rooms  │     │ guests × rooms   │
//!   └───────────────────┘       └──────────────────┘     └────────┬─────────┘
//!                                                                 │
//!                      confirm_booking(): idle → loading → confirmed | error
//! ```
//!
//! Prices are in naira: the supplier's USD stay total is multiplied by the
//! room count and converted at the configured rate.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};
use voyage_core::money::Money;
use voyage_core::pricing::{self, hotel_price, HotelPriceBreakdown};
use voyage_core::seeding::{reseed, seed, Traveller};
use voyage_core::validation::validate_room_count;
use voyage_core::{
    BookingStatus, ContactInfo, Currency, GuestDetail, Hotel, HotelSearchParams, ProductKind, RoomOccupancy,
    RoomOffer,
};

use super::{emit_outcome, Invoice, SharedState};
use crate::config::PricingContext;
use crate::error::{BookingError, BookingResult};
use crate::events::{BookingEventEmitter, NoOpEmitter};
use crate::gateway::{BookingGateway, HotelAvailabilityRequest, HotelBookingRequest};

const KIND: ProductKind = ProductKind::Hotel;

// =============================================================================
// State
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelBookingState {
    pub hotel: Option<Hotel>,
    pub search_params: HotelSearchParams,

    pub available_rooms: Vec<RoomOffer>,
    pub rooms_loading: bool,
    pub rooms_error: String,
    pub selected_room: Option<RoomOffer>,

    /// One lead guest per requested room.
    pub guests: Vec<GuestDetail>,
    pub contact: ContactInfo,

    pub is_logged_in: bool,
    pub account_name: String,
    pub payment_reference: Option<String>,

    pub invoice: Option<Invoice>,
    pub booking_reference: String,
    pub voucher_url: String,
    pub status: BookingStatus,
    pub error_message: String,

    #[serde(skip)]
    epoch: u64,
}

impl HotelBookingState {
    fn ensure_not_loading(&self) -> BookingResult<()> {
        if self.status == BookingStatus::Loading {
            return Err(BookingError::InProgress { kind: KIND });
        }
        Ok(())
    }

    fn guest_slots(&self) -> usize {
        self.search_params.total_rooms as usize
    }

    fn clear_result(&mut self) {
        self.invoice = None;
        self.booking_reference.clear();
        self.voucher_url.clear();
        self.status = BookingStatus::Idle;
        self.error_message.clear();
    }
}

// =============================================================================
// Store
// =============================================================================

#[derive(Clone)]
pub struct HotelBookingStore {
    state: SharedState<HotelBookingState>,
    gateway: Arc<dyn BookingGateway>,
    emitter: Arc<dyn BookingEventEmitter>,
    pricing: PricingContext,
}

impl HotelBookingStore {
    pub fn new(gateway: Arc<dyn BookingGateway>, pricing: PricingContext) -> Self {
        HotelBookingStore {
            state: SharedState::new(HotelBookingState::default()),
            gateway,
            emitter: Arc::new(NoOpEmitter),
            pricing,
        }
    }

    pub fn with_emitter(mut self, emitter: Arc<dyn BookingEventEmitter>) -> Self {
        self.emitter = emitter;
        self
    }

    pub fn snapshot(&self) -> HotelBookingState {
        self.state.snapshot()
    }

    pub fn status(&self) -> BookingStatus {
        self.state.with(|s| s.status)
    }

    // =========================================================================
    // Selection & Guests
    // =========================================================================

    /// Sets the hotel from a search result. Room options and the room
    /// selection are cleared; a new booking starts and any room fetch still
    /// running for the previous hotel is superseded.
    ///
    /// A non-empty room list overrides the totals carried in `params`.
    pub fn set_hotel(&self, hotel: Hotel, mut params: HotelSearchParams) -> BookingResult<()> {
        if !params.rooms.is_empty() {
            let rooms = std::mem::take(&mut params.rooms);
            params.set_rooms(rooms);
        }
        validate_room_count(params.total_rooms)?;

        self.state.with_mut(|s| {
            s.ensure_not_loading()?;
            debug!(hotel_id = %hotel.id, rooms = params.total_rooms, "Hotel selected");

            s.epoch += 1;
            s.hotel = Some(hotel);
            s.search_params = params;
            s.selected_room = None;
            s.available_rooms.clear();
            s.rooms_loading = false;
            s.rooms_error.clear();
            s.guests.clear();
            s.clear_result();
            Ok(())
        })
    }

    /// Loads room options for the selected hotel.
    pub async fn fetch_rooms(&self) -> BookingResult<Vec<RoomOffer>> {
        let (request, epoch) = self.state.with_mut(|s| {
            let hotel = s.hotel.as_ref().ok_or(BookingError::NoSelection { kind: KIND })?;
            let request = HotelAvailabilityRequest {
                hotel_id: hotel.id.clone(),
                check_in: s.search_params.check_in_start,
                check_out: s.search_params.check_in_end,
                rooms: s.search_params.rooms.clone(),
                nationality: s.search_params.nationality.clone(),
                nights: pricing::nights(s.search_params.check_in_start, s.search_params.check_in_end),
            };
            s.rooms_loading = true;
            s.rooms_error.clear();
            Ok::<_, BookingError>((request, s.epoch))
        })?;

        let response = self.gateway.hotel_availability(&request).await;

        self.state.with_mut(|s| {
            if s.epoch != epoch {
                return Err(BookingError::Superseded { kind: KIND });
            }
            s.rooms_loading = false;
            match response {
                Ok(rooms) => {
                    debug!(hotel_id = %request.hotel_id, rooms = rooms.len(), "Room options loaded");
                    s.available_rooms = rooms.clone();
                    Ok(rooms)
                }
                Err(err) => {
                    warn!(error = %err, "Hotel availability failed");
                    s.rooms_error = err.to_string();
                    Err(err.into())
                }
            }
        })
    }

    /// Selects a room option and seeds one lead guest per requested room.
    pub fn select_room(&self, room: RoomOffer) -> BookingResult<()> {
        self.state.with_mut(|s| {
            s.ensure_not_loading()?;
            s.guests = seed(s.guest_slots(), &s.contact);
            s.selected_room = Some(room);
            Ok(())
        })
    }

    pub fn update_guest<F>(&self, index: usize, edit: F) -> BookingResult<()>
    where
        F: FnOnce(&mut GuestDetail),
    {
        self.state.with_mut(|s| {
            let len = s.guests.len();
            let guest = s.guests.get_mut(index).ok_or(BookingError::TravellerIndex { index, len })?;
            edit(guest);
            Ok(())
        })
    }

    /// Replaces the requested rooms and resizes the guest list to match.
    pub fn set_rooms(&self, rooms: Vec<RoomOccupancy>) -> BookingResult<()> {
        validate_room_count(rooms.len() as u32)?;
        self.state.with_mut(|s| {
            s.ensure_not_loading()?;
            s.search_params.set_rooms(rooms);
            if s.selected_room.is_some() {
                s.guests = reseed(&s.guests, s.guest_slots(), &s.contact);
            }
            Ok(())
        })
    }

    pub fn set_contact(&self, email: impl Into<String>, phone: impl Into<String>) {
        let contact = ContactInfo::new(email, phone);
        self.state.with_mut(|s| {
            if let Some(lead) = s.guests.first_mut() {
                lead.set_contact(&contact);
            }
            s.contact = contact;
        });
    }

    pub fn set_account(&self, logged_in: bool, account_name: impl Into<String>) {
        let account_name = account_name.into();
        self.state.with_mut(|s| {
            s.is_logged_in = logged_in;
            s.account_name = account_name;
        });
    }

    pub fn set_payment_reference(&self, reference: Option<String>) {
        self.state.with_mut(|s| s.payment_reference = reference);
    }

    // =========================================================================
    // Pricing
    // =========================================================================

    pub fn nights(&self) -> u32 {
        self.state
            .with(|s| pricing::nights(s.search_params.check_in_start, s.search_params.check_in_end))
    }

    pub fn price_breakdown(&self) -> HotelPriceBreakdown {
        let ctx = self.pricing;
        self.state.with(|s| {
            hotel_price(
                s.selected_room.as_ref().map(|r| r.total_price),
                s.search_params.total_rooms,
                &ctx.ngn_rate,
                ctx.tax_rate,
            )
        })
    }

    /// Formats a naira amount (`₦851,400`).
    pub fn format_ngn(&self, ngn: Money) -> String {
        ngn.format_whole(Currency::Ngn)
    }

    pub fn generate_invoice(&self) -> Invoice {
        let invoice = Invoice::issue(KIND, Utc::now());
        self.state.with_mut(|s| s.invoice = Some(invoice.clone()));
        invoice
    }

    // =========================================================================
    // Confirmation
    // =========================================================================

    /// Books the selected room and returns the booking reference.
    pub async fn confirm_booking(&self) -> BookingResult<String> {
        let (request, epoch) = self.state.with_mut(|s| {
            let room = s.selected_room.as_ref().ok_or(BookingError::NoSelection { kind: KIND })?;
            let request = HotelBookingRequest {
                room_id: room.room_id.clone(),
                guests: s.guests.clone(),
                contact_email: s.contact.email.clone(),
                check_in: s.search_params.check_in_start,
                check_out: s.search_params.check_in_end,
                payment_reference: s.payment_reference.clone(),
            };
            s.status = s.status.transition(BookingStatus::Loading)?;
            s.error_message.clear();
            Ok::<_, BookingError>((request, s.epoch))
        })?;
        self.emitter.emit_status(KIND, BookingStatus::Loading);
        info!(room_id = %request.room_id, guests = request.guests.len(), "Booking hotel room");

        let response = self.gateway.book_hotel(&request).await;

        let outcome = self.state.with_mut(|s| {
            if s.epoch != epoch {
                return Err(BookingError::Superseded { kind: KIND });
            }
            match response {
                Ok(confirmation) => {
                    s.status = s.status.transition(BookingStatus::Confirmed)?;
                    s.booking_reference = confirmation.reference.clone();
                    s.voucher_url = confirmation.voucher_url;
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
            Ok(reference) => info!(%reference, "Hotel booking confirmed"),
            Err(err) => warn!(error = %err, "Hotel booking failed"),
        }
        emit_outcome(self.emitter.as_ref(), KIND, &outcome);
        outcome
    }

    pub fn reset(&self) {
        self.state.with_mut(|s| {
            let next = HotelBookingState {
                epoch: s.epoch + 1,
                ..Default::default()
            };
            *s = next;
        });
        self.emitter.emit_status(KIND, BookingStatus::Idle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LatencyConfig;
    use crate::error::GatewayError;
    use crate::gateway::testing::FailingGateway;
    use crate::gateway::MockGateway;
    use chrono::NaiveDate;

    fn hotel() -> Hotel {
        Hotel {
            id: "HTL-LOS-001".to_string(),
            name: "Eko Hotel & Suites".to_string(),
            city: "Lagos".to_string(),
            ..Default::default()
        }
    }

    fn params(rooms: usize) -> HotelSearchParams {
        let mut params = HotelSearchParams {
            city: "Lagos".to_string(),
            check_in_start: NaiveDate::from_ymd_opt(2026, 11, 2),
            check_in_end: NaiveDate::from_ymd_opt(2026, 11, 5),
            nationality: "NG".to_string(),
            ..Default::default()
        };
        params.set_rooms(vec![
            RoomOccupancy {
                adults: 2,
                children: 0,
                infants: 0,
            };
            rooms
        ]);
        params
    }

    fn store() -> HotelBookingStore {
        HotelBookingStore::new(Arc::new(MockGateway::new(LatencyConfig::default())), PricingContext::default())
    }

    fn failing(error: GatewayError) -> HotelBookingStore {
        HotelBookingStore::new(Arc::new(FailingGateway::new(error)), PricingContext::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_rooms() {
        let store = store();
        store.set_hotel(hotel(), params(1)).unwrap();
        assert_eq!(store.nights(), 3);

        let handle = tokio::spawn({
            let store = store.clone();
            async move { store.fetch_rooms().await }
        });
        tokio::task::yield_now().await;
        assert!(store.snapshot().rooms_loading);

        let rooms = handle.await.unwrap().unwrap();
        let s = store.snapshot();
        assert!(!s.rooms_loading);
        assert_eq!(rooms.len(), 6);
        assert_eq!(s.available_rooms, rooms);
        assert_eq!(rooms[0].total_price, Money::from_major(240));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_rooms_requires_hotel() {
        let err = store().fetch_rooms().await.unwrap_err();
        assert!(matches!(err, BookingError::NoSelection { kind: ProductKind::Hotel }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_rooms_failure_sets_rooms_error() {
        let store = failing(GatewayError::Unavailable {
            supplier: "Rezlive".to_string(),
        });
        store.set_hotel(hotel(), params(1)).unwrap();

        assert!(store.fetch_rooms().await.is_err());
        let s = store.snapshot();
        assert!(!s.rooms_loading);
        assert_eq!(s.rooms_error, "Rezlive is temporarily unavailable. Please try again later.");
        assert_eq!(s.status, BookingStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_hotel_supersedes_room_fetch() {
        let store = store();
        store.set_hotel(hotel(), params(1)).unwrap();

        let handle = tokio::spawn({
            let store = store.clone();
            async move { store.fetch_rooms().await }
        });
        tokio::task::yield_now().await;
        assert!(store.snapshot().rooms_loading);

        let other = Hotel {
            id: "HTL-ABV-002".to_string(),
            name: "Transcorp Hilton".to_string(),
            city: "Abuja".to_string(),
            ..Default::default()
        };
        store.set_hotel(other, params(1)).unwrap();
        assert!(!store.snapshot().rooms_loading);

        let err = handle.await.unwrap().unwrap_err();
        assert!(matches!(err, BookingError::Superseded { kind: ProductKind::Hotel }));
        let s = store.snapshot();
        assert_eq!(s.hotel.unwrap().id, "HTL-ABV-002");
        assert!(s.available_rooms.is_empty());
        assert!(!s.rooms_loading);
    }

    #[test]
    fn test_set_hotel_validates_room_count() {
        let store = store();
        let mut empty = params(0);
        empty.total_rooms = 0;
        assert!(matches!(store.set_hotel(hotel(), empty), Err(BookingError::Core(_))));
        assert!(store.snapshot().hotel.is_none());

        let mut too_many = params(0);
        too_many.total_rooms = 10;
        assert!(store.set_hotel(hotel(), too_many).is_err());

        let mut mismatched = params(2);
        mismatched.total_rooms = 0;
        store.set_hotel(hotel(), mismatched).unwrap();
        assert_eq!(store.snapshot().search_params.total_rooms, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_room_seeds_guest_per_room() {
        let store = store();
        store.set_contact("ada@example.com", "0802");
        store.set_hotel(hotel(), params(2)).unwrap();
        let rooms = store.fetch_rooms().await.unwrap();
        store.select_room(rooms[0].clone()).unwrap();

        let s = store.snapshot();
        assert_eq!(s.guests.len(), 2);
        assert_eq!(s.guests[0].email, "ada@example.com");
        assert_eq!(s.guests[1].email, "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_price_breakdown() {
        let store = store();
        store.set_hotel(hotel(), params(2)).unwrap();
        assert_eq!(store.price_breakdown(), HotelPriceBreakdown::default());

        let rooms = store.fetch_rooms().await.unwrap();
        store.select_room(rooms[0].clone()).unwrap();

        let p = store.price_breakdown();
        assert_eq!(p.base_usd, Money::from_major(480));
        assert_eq!(p.base_ngn, Money::from_major(792_000));
        assert_eq!(p.tax, Money::from_major(59_400));
        assert_eq!(p.total, Money::from_major(851_400));
        assert_eq!(store.format_ngn(p.total), "₦851,400");
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_rooms_reseeds_guests() {
        let store = store();
        store.set_hotel(hotel(), params(2)).unwrap();
        let rooms = store.fetch_rooms().await.unwrap();
        store.select_room(rooms[1].clone()).unwrap();
        store.update_guest(0, |g| g.first_name = "Ada".to_string()).unwrap();

        let occupancy = RoomOccupancy {
            adults: 1,
            children: 1,
            infants: 0,
        };
        store.set_rooms(vec![occupancy; 3]).unwrap();
        let s = store.snapshot();
        assert_eq!(s.search_params.total_rooms, 3);
        assert_eq!(s.search_params.total_guests, 6);
        assert_eq!(s.guests.len(), 3);
        assert_eq!(s.guests[0].first_name, "Ada");

        assert!(store.set_rooms(vec![occupancy; 10]).is_err());
        assert!(store.set_rooms(Vec::new()).is_err());
        assert_eq!(store.snapshot().guests.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirm_booking() {
        let store = store();
        store.set_hotel(hotel(), params(1)).unwrap();
        let rooms = store.fetch_rooms().await.unwrap();
        store.select_room(rooms[0].clone()).unwrap();

        let handle = tokio::spawn({
            let store = store.clone();
            async move { store.confirm_booking().await }
        });
        tokio::task::yield_now().await;
        assert_eq!(store.status(), BookingStatus::Loading);

        let reference = handle.await.unwrap().unwrap();
        let s = store.snapshot();
        assert_eq!(s.status, BookingStatus::Confirmed);
        assert!(reference.starts_with("HTL"));
        assert_eq!(s.voucher_url, "#");
        assert!(s.invoice.unwrap().number.starts_with("HTL-"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirm_requires_room() {
        let store = store();
        store.set_hotel(hotel(), params(1)).unwrap();
        let err = store.confirm_booking().await.unwrap_err();
        assert!(matches!(err, BookingError::NoSelection { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_inventory_change_sets_error() {
        let store = failing(GatewayError::InventoryChanged {
            product_id: "RZ-ABC123".to_string(),
        });
        store.set_hotel(hotel(), params(1)).unwrap();
        store.select_room(MockGateway::mock_rooms(3).remove(0)).unwrap();

        assert!(store.confirm_booking().await.is_err());
        let s = store.snapshot();
        assert_eq!(s.status, BookingStatus::Error);
        assert_eq!(
            s.error_message,
            "The selected option is no longer available. Please choose another."
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset() {
        let store = store();
        store.set_account(true, "Bayo Travels");
        store.set_hotel(hotel(), params(2)).unwrap();
        let rooms = store.fetch_rooms().await.unwrap();
        store.select_room(rooms[0].clone()).unwrap();
        store.confirm_booking().await.unwrap();

        store.reset();
        let s = store.snapshot();
        assert_eq!(s.hotel, None);
        assert_eq!(s.search_params, HotelSearchParams::default());
        assert!(s.available_rooms.is_empty());
        assert!(s.guests.is_empty());
        assert!(!s.is_logged_in);
        assert_eq!(s.account_name, "");
        assert_eq!(s.status, BookingStatus::Idle);
        assert_eq!(s.voucher_url, "");
    }
}
