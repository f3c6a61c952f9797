//! # Supplier Gateway
//!
//! Traits for every outbound supplier call, plus the latency-simulating mock.
//!
//! ## Supplier Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BookingGateway                                                         │
//! │  ├── create_flight_order  POST /v1/booking/flight-orders    (Amadeus)   │
//! │  ├── hotel_availability   POST /hotel/availability          (Rezlive)   │
//! │  ├── book_hotel           POST /hotel/book                  (Rezlive)   │
//! │  ├── tour_packages        GET  /tours/packages              (Rayna)     │
//! │  └── book_tour            POST /bookings                    (Rayna)     │
//! │                                                                         │
//! │  AuthGateway                                                            │
//! │  ├── login / register / forgot_password                                 │
//! │  └── update_profile / change_password                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Requests carry the product id, the travellers and a payment reference;
//! responses carry the supplier reference and a voucher URL.
//!
//! [`MockGateway`] answers every call after the configured delay and never
//! fails. Stores hold an `Arc<dyn BookingGateway>` so tests can inject a
//! failing one.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use voyage_core::money::Money;
use voyage_core::pricing::PaxCounts;
use voyage_core::reference::{self, supplier_id, ProductKind};
use voyage_core::validation::validate_password;
use voyage_core::{
    AuthUser, ContactInfo, FlightOffer, GuestDetail, Participant, Passenger, RoomOccupancy, RoomOffer, Tour,
    TourPackage, UserRole,
};

use crate::config::LatencyConfig;
use crate::error::{GatewayError, GatewayResult};

/// Voucher link returned until suppliers issue real PDF vouchers.
pub const PLACEHOLDER_VOUCHER_URL: &str = "#";

// =============================================================================
// Requests & Responses
// =============================================================================

/// Body of `POST /v1/booking/flight-orders`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightOrderRequest {
    pub offer: FlightOffer,
    pub travelers: Vec<Passenger>,
    pub contact: ContactInfo,
    #[serde(default)]
    pub payment_reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightOrderConfirmation {
    pub reference: String,
    /// One per traveller, in request order.
    pub ticket_numbers: Vec<String>,
}

/// Body of `POST /hotel/availability`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelAvailabilityRequest {
    pub hotel_id: String,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub rooms: Vec<RoomOccupancy>,
    pub nationality: String,
    /// Stay length used to price `total_price` on each room.
    pub nights: u32,
}

/// Body of `POST /hotel/book`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelBookingRequest {
    pub room_id: String,
    pub guests: Vec<GuestDetail>,
    pub contact_email: String,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    #[serde(default)]
    pub payment_reference: Option<String>,
}

/// Query of `GET /tours/packages`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourPackagesRequest {
    pub tour: Tour,
    pub city: String,
    pub date: Option<NaiveDate>,
    pub counts: PaxCounts,
}

/// Body of `POST /bookings`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourBookingRequest {
    pub package_id: String,
    pub date: Option<NaiveDate>,
    pub counts: PaxCounts,
    pub lead_guest: Participant,
    #[serde(default)]
    pub payment_reference: Option<String>,
}

/// Supplier answer for hotel and tour bookings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmation {
    pub reference: String,
    pub voucher_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<UserRole>,
    #[serde(default)]
    pub agency_name: Option<String>,
}

/// Fields a profile update may change. `None` leaves the field alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub agency_name: Option<String>,
}

impl ProfileUpdate {
    pub fn apply_to(&self, user: &mut AuthUser) {
        if let Some(v) = &self.first_name {
            user.first_name.clone_from(v);
        }
        if let Some(v) = &self.last_name {
            user.last_name.clone_from(v);
        }
        if let Some(v) = &self.email {
            user.email.clone_from(v);
        }
        if let Some(v) = &self.phone {
            user.phone.clone_from(v);
        }
        if let Some(v) = &self.avatar {
            user.avatar.clone_from(v);
        }
        if let Some(v) = &self.agency_name {
            user.agency_name = Some(v.clone());
        }
    }
}

/// A signed-in user and their bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: AuthUser,
    pub token: String,
}

// =============================================================================
// Traits
// =============================================================================

#[async_trait]
pub trait BookingGateway: Send + Sync {
    /// `POST /v1/booking/flight-orders`
    ///
    /// Body: `{ data: { type: "flight-order", flightOffers: [offer], travelers } }`
    async fn create_flight_order(&self, request: &FlightOrderRequest) -> GatewayResult<FlightOrderConfirmation>;

    /// `POST /hotel/availability`
    ///
    /// Body: `{ hotelId, checkIn, checkOut, rooms, nationality }`
    async fn hotel_availability(&self, request: &HotelAvailabilityRequest) -> GatewayResult<Vec<RoomOffer>>;

    /// `POST /hotel/book`
    ///
    /// Body: `{ roomId, guests, contactEmail, checkIn, checkOut, paymentReference }`
    async fn book_hotel(&self, request: &HotelBookingRequest) -> GatewayResult<BookingConfirmation>;

    /// `GET /tours/packages`
    ///
    /// Params: `{ tourId, date, adults, children, infants, currency }`
    async fn tour_packages(&self, request: &TourPackagesRequest) -> GatewayResult<Vec<TourPackage>>;

    /// `POST /bookings`
    ///
    /// Body: `{ packageId, date, adults, children, infants, leadGuest, paymentReference }`
    async fn book_tour(&self, request: &TourBookingRequest) -> GatewayResult<BookingConfirmation>;
}

#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> GatewayResult<AuthSession>;

    async fn register(&self, request: &RegisterRequest) -> GatewayResult<AuthSession>;

    /// Returns whether a reset email was sent.
    async fn forgot_password(&self, email: &str) -> GatewayResult<bool>;

    async fn update_profile(&self, token: &str, changes: &ProfileUpdate) -> GatewayResult<()>;

    async fn change_password(&self, token: &str, old_password: &str, new_password: &str) -> GatewayResult<()>;
}

// =============================================================================
// Mock Gateway
// =============================================================================

const ROOM_NAMES: [&str; 6] = [
    "Standard Room",
    "Deluxe Room",
    "Superior Suite",
    "Executive Suite",
    "Junior Suite",
    "Presidential Suite",
];
const BOARD_TYPES: [&str; 4] = ["Room Only", "Bed & Breakfast", "Half Board", "Full Board"];
const ROOM_POLICIES: [&str; 3] = [
    "Free cancellation until 24h before check-in",
    "Non-refundable",
    "Free cancellation until 48h before check-in",
];
const ROOM_AMENITIES: [&str; 6] = [
    "Free WiFi",
    "Air conditioning",
    "Flat-screen TV",
    "Mini bar",
    "City view",
    "King bed",
];

const PACKAGE_TIERS: [&str; 5] = ["Standard", "Premium", "VIP", "Shared Group", "Private"];
const PACKAGE_DURATIONS: [&str; 5] = ["Half Day (4h)", "Full Day (8h)", "Half Day (5h)", "Full Day (9h)", "2 Days"];
const PACKAGE_POLICIES: [&str; 3] = [
    "Free cancellation up to 24h before departure",
    "Non-refundable",
    "Free cancellation up to 48h before departure",
];
const PACKAGE_INCLUDES: [&[&str]; 4] = [
    &["Hotel Pickup & Drop-off", "Professional Guide", "Entry Tickets"],
    &["Hotel Pickup & Drop-off", "Professional Guide", "Lunch Included"],
    &["Professional Guide", "Entry Tickets", "Bottled Water"],
    &["Hotel Pickup & Drop-off", "Professional Guide", "Entry Tickets", "Lunch Included"],
];
const DEPARTURE_TIMES: [&str; 4] = ["07:00 AM", "09:00 AM", "10:00 AM", "02:00 PM"];

/// In-process stand-in for every supplier.
#[derive(Debug, Clone, Default)]
pub struct MockGateway {
    latency: LatencyConfig,
}

impl MockGateway {
    pub fn new(latency: LatencyConfig) -> Self {
        MockGateway { latency }
    }

    async fn delay(&self, ms: u64) {
        if ms > 0 {
            tokio::time::sleep(LatencyConfig::duration(ms)).await;
        }
    }

    /// Six room options; `price_per_night = 80 + 35·i` USD.
    pub fn mock_rooms(nights: u32) -> Vec<RoomOffer> {
        ROOM_NAMES
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let per_night = Money::from_major(80 + 35 * i as i64);
                RoomOffer {
                    room_id: supplier_id("RZ"),
                    room_name: name.to_string(),
                    board_type: BOARD_TYPES[i % BOARD_TYPES.len()].to_string(),
                    price_per_night: per_night,
                    total_price: per_night * nights,
                    cancellation_policy: ROOM_POLICIES[i % ROOM_POLICIES.len()].to_string(),
                    amenities: ROOM_AMENITIES[..3 + i % 3].iter().map(|a| a.to_string()).collect(),
                }
            })
            .collect()
    }

    /// Five package tiers for `tour`; adult price `60 + 25·i` USD.
    pub fn mock_packages(tour: &Tour, city: &str) -> Vec<TourPackage> {
        PACKAGE_TIERS
            .iter()
            .enumerate()
            .map(|(i, tier)| {
                let step = i as i64;
                TourPackage {
                    package_id: supplier_id("RT"),
                    name: format!("{} Package", tier),
                    duration: PACKAGE_DURATIONS[i].to_string(),
                    tour_type: tour.tour_type.clone().unwrap_or_else(|| "City Tour".to_string()),
                    highlights: tour.highlights.clone(),
                    includes: PACKAGE_INCLUDES[i % PACKAGE_INCLUDES.len()]
                        .iter()
                        .map(|s| s.to_string())
                        .collect(),
                    image: tour.image.clone().unwrap_or_default(),
                    price_adult: Money::from_major(60 + 25 * step),
                    price_child: Money::from_major(35 + 12 * step),
                    price_infant: Money::from_major(if i < 2 { 0 } else { 10 }),
                    available_spots: 15 - 2 * i as u32,
                    cancellation_policy: PACKAGE_POLICIES[i % PACKAGE_POLICIES.len()].to_string(),
                    departure_time: DEPARTURE_TIMES[i % DEPARTURE_TIMES.len()].to_string(),
                    meeting_point: format!("{} City Centre Hotel Lobby", city),
                }
            })
            .collect()
    }

    fn mock_token() -> String {
        format!("mock-jwt-{}", Utc::now().timestamp_millis())
    }
}

#[async_trait]
impl BookingGateway for MockGateway {
    async fn create_flight_order(&self, request: &FlightOrderRequest) -> GatewayResult<FlightOrderConfirmation> {
        debug!(offer_id = %request.offer.id, travelers = request.travelers.len(), "Mock flight order");
        self.delay(self.latency.flight_order_ms).await;

        Ok(FlightOrderConfirmation {
            reference: reference::booking_reference(ProductKind::Flight),
            ticket_numbers: reference::ticket_numbers(request.travelers.len()),
        })
    }

    async fn hotel_availability(&self, request: &HotelAvailabilityRequest) -> GatewayResult<Vec<RoomOffer>> {
        debug!(hotel_id = %request.hotel_id, nights = request.nights, "Mock hotel availability");
        self.delay(self.latency.hotel_availability_ms).await;

        Ok(Self::mock_rooms(request.nights))
    }

    async fn book_hotel(&self, request: &HotelBookingRequest) -> GatewayResult<BookingConfirmation> {
        debug!(room_id = %request.room_id, guests = request.guests.len(), "Mock hotel booking");
        self.delay(self.latency.hotel_booking_ms).await;

        Ok(BookingConfirmation {
            reference: reference::booking_reference(ProductKind::Hotel),
            voucher_url: PLACEHOLDER_VOUCHER_URL.to_string(),
        })
    }

    async fn tour_packages(&self, request: &TourPackagesRequest) -> GatewayResult<Vec<TourPackage>> {
        debug!(tour_id = %request.tour.id, city = %request.city, "Mock tour packages");
        self.delay(self.latency.tour_packages_ms).await;

        Ok(Self::mock_packages(&request.tour, &request.city))
    }

    async fn book_tour(&self, request: &TourBookingRequest) -> GatewayResult<BookingConfirmation> {
        debug!(package_id = %request.package_id, participants = request.counts.total(), "Mock tour booking");
        self.delay(self.latency.tour_booking_ms).await;

        Ok(BookingConfirmation {
            reference: reference::booking_reference(ProductKind::Tour),
            voucher_url: PLACEHOLDER_VOUCHER_URL.to_string(),
        })
    }
}

#[async_trait]
impl AuthGateway for MockGateway {
    async fn login(&self, email: &str, password: &str) -> GatewayResult<AuthSession> {
        self.delay(self.latency.login_ms).await;

        if email.is_empty() || validate_password(password).is_err() {
            return Err(GatewayError::InvalidRequest("Invalid email or password.".to_string()));
        }

        Ok(AuthSession {
            user: AuthUser {
                id: "USR-001".to_string(),
                first_name: "Adaeze".to_string(),
                last_name: "Okafor".to_string(),
                email: email.to_string(),
                phone: "+234 802 000 0001".to_string(),
                avatar: String::new(),
                role: UserRole::User,
                agency_name: None,
                created_at: "2024-01-15".to_string(),
            },
            token: Self::mock_token(),
        })
    }

    async fn register(&self, request: &RegisterRequest) -> GatewayResult<AuthSession> {
        self.delay(self.latency.register_ms).await;

        if request.email.is_empty() || validate_password(&request.password).is_err() {
            return Err(GatewayError::InvalidRequest(
                "Registration failed. Please try again.".to_string(),
            ));
        }

        let now = Utc::now();
        Ok(AuthSession {
            user: AuthUser {
                id: format!("USR-{}", reference::to_base36(now.timestamp_millis().max(0) as u64)),
                first_name: request.first_name.clone(),
                last_name: request.last_name.clone(),
                email: request.email.clone(),
                phone: request.phone.clone(),
                avatar: String::new(),
                role: request.role.unwrap_or_default(),
                agency_name: request.agency_name.clone(),
                created_at: now.to_rfc3339(),
            },
            token: Self::mock_token(),
        })
    }

    async fn forgot_password(&self, email: &str) -> GatewayResult<bool> {
        self.delay(self.latency.forgot_password_ms).await;
        Ok(!email.is_empty())
    }

    async fn update_profile(&self, _token: &str, _changes: &ProfileUpdate) -> GatewayResult<()> {
        self.delay(self.latency.profile_ms).await;
        Ok(())
    }

    async fn change_password(&self, _token: &str, _old_password: &str, _new_password: &str) -> GatewayResult<()> {
        self.delay(self.latency.profile_ms).await;
        Ok(())
    }
}

// =============================================================================
// Test Support
// =============================================================================

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Serves listings like the mock but fails every booking call.
    pub struct FailingGateway {
        pub error: GatewayError,
    }

    impl FailingGateway {
        pub fn new(error: GatewayError) -> Self {
            FailingGateway { error }
        }
    }

    #[async_trait]
    impl BookingGateway for FailingGateway {
        async fn create_flight_order(&self, _request: &FlightOrderRequest) -> GatewayResult<FlightOrderConfirmation> {
            tokio::time::sleep(std::time::Duration::from_millis(500)).await;
            Err(self.error.clone())
        }

        async fn hotel_availability(&self, _request: &HotelAvailabilityRequest) -> GatewayResult<Vec<RoomOffer>> {
            Err(self.error.clone())
        }

        async fn book_hotel(&self, _request: &HotelBookingRequest) -> GatewayResult<BookingConfirmation> {
            tokio::time::sleep(std::time::Duration::from_millis(500)).await;
            Err(self.error.clone())
        }

        async fn tour_packages(&self, _request: &TourPackagesRequest) -> GatewayResult<Vec<TourPackage>> {
            Err(self.error.clone())
        }

        async fn book_tour(&self, _request: &TourBookingRequest) -> GatewayResult<BookingConfirmation> {
            tokio::time::sleep(std::time::Duration::from_millis(500)).await;
            Err(self.error.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_rooms() {
        let rooms = MockGateway::mock_rooms(3);
        assert_eq!(rooms.len(), 6);

        assert_eq!(rooms[0].room_name, "Standard Room");
        assert_eq!(rooms[0].price_per_night, Money::from_major(80));
        assert_eq!(rooms[0].total_price, Money::from_major(240));
        assert_eq!(rooms[0].amenities.len(), 3);

        assert_eq!(rooms[5].room_name, "Presidential Suite");
        assert_eq!(rooms[5].price_per_night, Money::from_major(255));
        assert_eq!(rooms[5].board_type, "Bed & Breakfast");
        assert_eq!(rooms[5].cancellation_policy, "Free cancellation until 48h before check-in");
        assert_eq!(rooms[5].amenities, vec!["Free WiFi", "Air conditioning", "Flat-screen TV", "Mini bar", "City view"]);

        assert!(rooms.iter().all(|r| r.room_id.starts_with("RZ-")));
    }

    #[test]
    fn test_mock_packages() {
        let tour = Tour {
            id: "T-1".to_string(),
            name: "Lagos Highlights".to_string(),
            tour_type: None,
            highlights: vec!["Lekki Conservation Centre".to_string()],
            image: None,
        };
        let packages = MockGateway::mock_packages(&tour, "Lagos");
        assert_eq!(packages.len(), 5);

        let vip = &packages[2];
        assert_eq!(vip.name, "VIP Package");
        assert_eq!(vip.duration, "Half Day (5h)");
        assert_eq!(vip.price_adult, Money::from_major(110));
        assert_eq!(vip.price_child, Money::from_major(59));
        assert_eq!(vip.price_infant, Money::from_major(10));
        assert_eq!(vip.available_spots, 11);
        assert_eq!(vip.tour_type, "City Tour");
        assert_eq!(vip.meeting_point, "Lagos City Centre Hotel Lobby");

        assert_eq!(packages[0].price_infant, Money::zero());
        assert_eq!(packages[4].departure_time, "07:00 AM");
        assert_eq!(packages[3].includes.len(), 4);
        assert!(packages.iter().all(|p| p.package_id.starts_with("RT-")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_login_rules() {
        let gateway = MockGateway::default();

        let session = gateway.login("ada@example.com", "secret").await.unwrap();
        assert_eq!(session.user.id, "USR-001");
        assert_eq!(session.user.email, "ada@example.com");
        assert!(session.token.starts_with("mock-jwt-"));

        assert!(gateway.login("", "secret").await.is_err());
        assert!(gateway.login("ada@example.com", "12345").await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_register_defaults_role() {
        let gateway = MockGateway::default();
        let request = RegisterRequest {
            first_name: "Bayo".to_string(),
            last_name: "Adeyemi".to_string(),
            email: "bayo@agency.ng".to_string(),
            phone: "+234 803 000 0002".to_string(),
            password: "hunter22".to_string(),
            role: None,
            agency_name: Some("Bayo Travels".to_string()),
        };

        let session = gateway.register(&request).await.unwrap();
        assert_eq!(session.user.role, UserRole::User);
        assert!(session.user.id.starts_with("USR-"));
        assert_eq!(session.user.agency_name.as_deref(), Some("Bayo Travels"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_flight_order_tickets() {
        let gateway = MockGateway::default();
        let request = FlightOrderRequest {
            offer: FlightOffer::default(),
            travelers: vec![Passenger::default(); 3],
            contact: ContactInfo::default(),
            payment_reference: None,
        };

        let started = tokio::time::Instant::now();
        let confirmation = gateway.create_flight_order(&request).await.unwrap();
        assert!(started.elapsed() >= LatencyConfig::duration(2200));
        assert!(confirmation.reference.starts_with("BK"));
        assert_eq!(confirmation.ticket_numbers.len(), 3);
    }

    #[test]
    fn test_profile_update_applies_only_set_fields() {
        let mut user = AuthUser {
            id: "USR-001".to_string(),
            first_name: "Adaeze".to_string(),
            last_name: "Okafor".to_string(),
            email: "ada@example.com".to_string(),
            phone: String::new(),
            avatar: String::new(),
            role: UserRole::Agent,
            agency_name: None,
            created_at: "2024-01-15".to_string(),
        };
        ProfileUpdate {
            phone: Some("+234 802 000 0001".to_string()),
            ..Default::default()
        }
        .apply_to(&mut user);

        assert_eq!(user.phone, "+234 802 000 0001");
        assert_eq!(user.first_name, "Adaeze");
        assert_eq!(user.role, UserRole::Agent);
    }
}
