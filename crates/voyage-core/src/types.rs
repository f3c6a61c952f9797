//! # Domain Types
//!
//! Core domain types shared by the flight, hotel, tour and visa flows.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  FlightOffer    │   │     Hotel       │   │      Tour       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  price.total    │   │  RoomOffer      │   │  TourPackage    │       │
//! │  │  itineraries    │   │  total_price    │   │  price_adult    │       │
//! │  │  cabin          │   │  board_type     │   │  price_child    │       │
//! │  └────────┬────────┘   └────────┬────────┘   └────────┬────────┘       │
//! │           ▼                     ▼                     ▼                 │
//! │      Passenger             GuestDetail           Participant            │
//! │   (one per head)        (one per room)        (one lead booker)         │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Rate       │   │ BookingStatus   │   │  VisaService    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  Idle           │   │  price (NGN)    │       │
//! │  │  750 = 7.5%     │   │  Loading        │   │  ApplicantForm  │       │
//! │  └─────────────────┘   │  Confirmed      │   │  UploadedDoc    │       │
//! │                        │  Error          │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Supplier Shapes
//! Supplier payloads (Amadeus offers, Rezlive rooms, Rayna packages) are
//! modelled as explicit structs. Fields a supplier may omit are `Option` or
//! `#[serde(default)]`, never a catch-all map.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::{Currency, Money};

/// Cabin class used when an offer does not name one.
pub const DEFAULT_CABIN_CLASS: &str = "ECONOMY";

// =============================================================================
// Rate
// =============================================================================

/// A rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 750 bps = 7.5% (Nigerian VAT), 500 bps = 5% (visa service fee)
///
/// Used for tax, B2B discount and service fee rates alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rate(u32);

impl Rate {
    /// Upper bound: 100%.
    pub const MAX_BPS: u32 = 10_000;

    /// Creates a rate from basis points without range checking. Meant for
    /// constants; runtime input goes through [`Rate::try_from_bps`].
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Creates a rate from basis points, rejecting anything above 100%.
    pub fn try_from_bps(bps: u32) -> CoreResult<Self> {
        if bps > Self::MAX_BPS {
            return Err(ValidationError::OutOfRange {
                field: "rate".to_string(),
                min: 0,
                max: Self::MAX_BPS as i64,
            }
            .into());
        }
        Ok(Rate(bps))
    }

    /// Creates a rate from a fraction (`0.075` → 750 bps).
    pub fn from_fraction(fraction: f64) -> CoreResult<Self> {
        if !fraction.is_finite() || fraction < 0.0 {
            return Err(ValidationError::OutOfRange {
                field: "rate".to_string(),
                min: 0,
                max: Self::MAX_BPS as i64,
            }
            .into());
        }
        Self::try_from_bps((fraction * 10_000.0).round() as u32)
    }

    /// Creates a rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> CoreResult<Self> {
        Self::from_fraction(pct / 100.0)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a fraction (for display only).
    #[inline]
    pub fn fraction(&self) -> f64 {
        self.0 as f64 / 10_000.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::zero()
    }
}

// =============================================================================
// Booking Status
// =============================================================================

/// Lifecycle of a flight, hotel or tour booking.
///
/// ## State Machine
/// ```text
///   ┌────────┐  confirm   ┌─────────┐  supplier ok   ┌───────────┐
///   │  Idle  │ ─────────► │ Loading │ ─────────────► │ Confirmed │
///   └────────┘            └────┬────┘                └───────────┘
///       ▲                      │ supplier failure    ┌───────────┐
///       │                      └───────────────────► │   Error   │
///       │                                            └───────────┘
///       └──────────────────── reset() ◄──────────────── (any)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Idle,
    Loading,
    Confirmed,
    Error,
}

impl BookingStatus {
    /// Whether the lifecycle allows moving from `self` to `next`.
    ///
    /// `reset()` is not a transition; stores return to `Idle` directly.
    pub const fn can_transition_to(&self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Idle, BookingStatus::Loading)
                | (BookingStatus::Loading, BookingStatus::Confirmed)
                | (BookingStatus::Loading, BookingStatus::Error)
        )
    }

    /// Checks a transition and returns the new status.
    pub fn transition(self, next: BookingStatus) -> CoreResult<BookingStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CoreError::InvalidTransition { from: self, to: next })
        }
    }

    /// Confirmed and Error end the lifecycle until a reset.
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Confirmed | BookingStatus::Error)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Idle => "idle",
            BookingStatus::Loading => "loading",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Error => "error",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a visa application.
///
/// `Idle → Submitted` happens when payment is verified; the remaining
/// steps are driven by back-office review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum VisaApplicationStatus {
    #[default]
    Idle,
    Submitted,
    Processing,
    Approved,
    Rejected,
}

impl fmt::Display for VisaApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VisaApplicationStatus::Idle => "idle",
            VisaApplicationStatus::Submitted => "submitted",
            VisaApplicationStatus::Processing => "processing",
            VisaApplicationStatus::Approved => "approved",
            VisaApplicationStatus::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

// =============================================================================
// Travellers
// =============================================================================

/// Passenger type as suppliers spell it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaxType {
    #[default]
    Adult,
    Child,
    Infant,
}

/// Shared contact details; copied onto the lead traveller when seeding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub email: String,
    pub phone: String,
}

impl ContactInfo {
    pub fn new(email: impl Into<String>, phone: impl Into<String>) -> Self {
        ContactInfo {
            email: email.into(),
            phone: phone.into(),
        }
    }
}

/// One flight passenger. Only the first passenger carries email and phone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Passenger {
    #[serde(rename = "type")]
    pub pax_type: PaxType,
    pub title: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub nationality: String,
    pub passport_number: String,
    pub passport_expiry: String,
    pub email: String,
    pub phone: String,
}

/// Lead guest for one hotel room.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct GuestDetail {
    pub title: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

/// Tour participant. Only the lead booker gets a form; the rest are counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    #[serde(rename = "type")]
    pub pax_type: PaxType,
    pub title: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

// =============================================================================
// Flight Offer (Amadeus shape)
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FlightEndpoint {
    pub iata_code: String,
    /// Local departure/arrival time as the supplier sends it.
    pub at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FlightSegment {
    pub carrier_code: String,
    #[serde(default)]
    pub number: Option<String>,
    pub departure: FlightEndpoint,
    pub arrival: FlightEndpoint,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FlightItinerary {
    /// ISO 8601 duration, e.g. `PT6H35M`.
    pub duration: String,
    pub segments: Vec<FlightSegment>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OfferPrice {
    /// Per-passenger fare as a decimal string (`"245.50"`).
    pub total: String,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FareDetail {
    #[serde(default)]
    pub cabin: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TravelerPricing {
    #[serde(default)]
    pub fare_details_by_segment: Vec<FareDetail>,
}

/// A priced flight offer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FlightOffer {
    #[serde(default)]
    pub id: String,
    pub price: OfferPrice,
    #[serde(default)]
    pub itineraries: Vec<FlightItinerary>,
    #[serde(default)]
    pub traveler_pricings: Vec<TravelerPricing>,
}

impl FlightOffer {
    /// Per-passenger fare parsed from `price.total`.
    pub fn unit_price(&self) -> CoreResult<Money> {
        Money::parse_decimal(&self.price.total)
    }

    /// Cabin of the first traveller's first segment, or `ECONOMY`.
    pub fn cabin_class(&self) -> String {
        self.traveler_pricings
            .first()
            .and_then(|tp| tp.fare_details_by_segment.first())
            .and_then(|fd| fd.cabin.clone())
            .unwrap_or_else(|| DEFAULT_CABIN_CLASS.to_string())
    }

    /// Offer currency, USD when absent.
    pub fn currency(&self) -> CoreResult<Currency> {
        match self.price.currency.as_deref() {
            Some(code) => code.parse(),
            None => Ok(Currency::Usd),
        }
    }
}

// =============================================================================
// Hotel
// =============================================================================

/// A hotel from search results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub star_rating: Option<u8>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Occupancy of one requested room.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RoomOccupancy {
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
}

impl RoomOccupancy {
    pub const fn guests(&self) -> u32 {
        self.adults + self.children + self.infants
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct HotelSearchParams {
    pub city: String,
    #[ts(as = "Option<String>")]
    pub check_in_start: Option<NaiveDate>,
    #[ts(as = "Option<String>")]
    pub check_in_end: Option<NaiveDate>,
    pub rooms: Vec<RoomOccupancy>,
    pub total_guests: u32,
    pub total_rooms: u32,
    pub nationality: String,
}

impl Default for HotelSearchParams {
    fn default() -> Self {
        HotelSearchParams {
            city: String::new(),
            check_in_start: None,
            check_in_end: None,
            rooms: Vec::new(),
            total_guests: 1,
            total_rooms: 1,
            nationality: String::new(),
        }
    }
}

impl HotelSearchParams {
    /// Replaces the room list and recomputes the totals from it.
    ///
    /// An empty list keeps a single room so there is always a lead guest.
    pub fn set_rooms(&mut self, rooms: Vec<RoomOccupancy>) {
        self.total_rooms = (rooms.len() as u32).max(1);
        self.total_guests = rooms.iter().map(RoomOccupancy::guests).sum::<u32>().max(1);
        self.rooms = rooms;
    }
}

/// A room option for the selected hotel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RoomOffer {
    /// Supplier room identifier (`RZ-XXXXXX`).
    pub room_id: String,
    pub room_name: String,
    /// e.g. "Bed & Breakfast", "Room Only".
    pub board_type: String,
    /// USD per night.
    pub price_per_night: Money,
    /// USD for the whole stay, priced by the supplier.
    pub total_price: Money,
    pub cancellation_policy: String,
    pub amenities: Vec<String>,
}

// =============================================================================
// Tour
// =============================================================================

/// A tour from search results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Tour {
    pub id: String,
    pub name: String,
    #[serde(default, rename = "type")]
    pub tour_type: Option<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TourSearchParams {
    pub city: String,
    pub country: String,
    #[ts(as = "Option<String>")]
    pub date: Option<NaiveDate>,
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
}

impl Default for TourSearchParams {
    fn default() -> Self {
        TourSearchParams {
            city: String::new(),
            country: String::new(),
            date: None,
            adults: 1,
            children: 0,
            infants: 0,
        }
    }
}

/// A bookable package option of a tour. Prices are USD per person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TourPackage {
    /// Supplier package identifier (`RT-XXXXXX`).
    pub package_id: String,
    pub name: String,
    pub duration: String,
    #[serde(rename = "type")]
    pub tour_type: String,
    pub highlights: Vec<String>,
    pub includes: Vec<String>,
    pub image: String,
    pub price_adult: Money,
    pub price_child: Money,
    pub price_infant: Money,
    pub available_spots: u32,
    pub cancellation_policy: String,
    pub departure_time: String,
    pub meeting_point: String,
}

// =============================================================================
// Visa
// =============================================================================

/// A visa product. `price` is NGN per applicant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct VisaService {
    pub id: u32,
    pub country: String,
    pub nationality: String,
    /// Tourist | Business | Transit | Student | Work
    pub visa_type: String,
    pub validity: String,
    pub entry_type: String,
    pub processing_time: String,
    pub price: Money,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub success_rate: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct VisaSearchParams {
    pub country: String,
    pub nationality: String,
    pub adults: u32,
    pub children: u32,
}

impl Default for VisaSearchParams {
    fn default() -> Self {
        VisaSearchParams {
            country: String::new(),
            nationality: String::new(),
            adults: 1,
            children: 0,
        }
    }
}

/// The visa applicant's personal, passport and travel details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantForm {
    // Personal
    pub title: String,
    pub first_name: String,
    pub last_name: String,
    #[ts(as = "Option<String>")]
    pub date_of_birth: Option<NaiveDate>,
    pub gender: String,
    pub marital_status: String,
    pub nationality: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,

    // Passport
    pub passport_number: String,
    #[ts(as = "Option<String>")]
    pub passport_issue_date: Option<NaiveDate>,
    #[ts(as = "Option<String>")]
    pub passport_expiry: Option<NaiveDate>,
    pub issuing_country: String,
    pub issuing_authority: String,

    // Travel
    pub purpose_of_visit: String,
    #[ts(as = "Option<String>")]
    pub departure_date: Option<NaiveDate>,
    #[ts(as = "Option<String>")]
    pub return_date: Option<NaiveDate>,
    pub accommodation_name: String,
    pub accommodation_addr: String,
    pub sponsor_name: String,
    pub sponsor_relation: String,
    pub previous_visa_refused: bool,
    pub refusal_details: String,
}

/// One entry of the visa document checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UploadedDoc {
    pub key: String,
    pub label: String,
    pub file_name: String,
    /// Human-readable size as shown in the upload list ("1.2 MB").
    pub size: String,
    pub required: bool,
    pub uploaded: bool,
}

impl UploadedDoc {
    pub fn pending(key: &str, label: &str, required: bool) -> Self {
        UploadedDoc {
            key: key.to_string(),
            label: label.to_string(),
            file_name: String::new(),
            size: String::new(),
            required,
            uploaded: false,
        }
    }
}

// =============================================================================
// Auth
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Agent,
    Admin,
}

/// The signed-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub avatar: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agency_name: Option<String>,
    /// ISO date or timestamp of account creation.
    pub created_at: String,
}

impl AuthUser {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// First letter of each name, uppercased. Empty names contribute nothing.
    pub fn initials(&self) -> String {
        self.first_name
            .chars()
            .take(1)
            .chain(self.last_name.chars().take(1))
            .flat_map(char::to_uppercase)
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
