//! # voyage-core: Pure Booking Logic for Voyage
//!
//! This crate holds the booking rules of the Voyage travel platform as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Voyage Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (booking UI)                        │   │
//! │  │   Search ──► Select ──► Traveller details ──► Pay ──► Invoice   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    voyage-booking (stores)                      │   │
//! │  │   FlightBookingStore, HotelBookingStore, TourBookingStore,      │   │
//! │  │   VisaStore, AuthStore, BookingGateway                          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ voyage-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │   │  money  │ │ pricing │ │ seeding │ │reference│ │  forms  │  │   │
//! │  │   │  Money  │ │ tax/fee │ │ leads & │ │ BK/INV  │ │ wizard  │  │   │
//! │  │   │  rates  │ │ NGN fmt │ │ reseed  │ │ numbers │ │ errors  │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO CLOCK READS IN PRICING               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (offers, rooms, packages, travellers, statuses)
//! - [`money`] - Money type with integer arithmetic, currencies, exchange rates
//! - [`pricing`] - Price breakdowns for every booking flow
//! - [`seeding`] - Traveller record seeding and re-seeding
//! - [`reference`] - Booking references, ticket and invoice numbers
//! - [`validation`] - Field-level rules
//! - [`forms`] - Whole-form validators and the visa application wizard
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use voyage_core::money::Money;
//! use voyage_core::pricing::derive_price;
//! use voyage_core::DEFAULT_TAX_RATE;
//!
//! let fare = Money::parse_decimal("100.00").unwrap();
//! let price = derive_price(fare, 2, DEFAULT_TAX_RATE, voyage_core::Rate::zero());
//!
//! assert_eq!(price.total, Money::from_major(215));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod forms;
pub mod money;
pub mod pricing;
pub mod reference;
pub mod seeding;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use forms::FieldErrors;
pub use money::{Currency, ExchangeRate, Money};
pub use reference::ProductKind;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum travellers on one booking (passengers or tour participants).
pub const MAX_TRAVELLERS: u32 = 9;

/// Maximum rooms on one hotel booking.
pub const MAX_ROOMS: u32 = 9;

/// Minimum password length accepted at login and registration.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Nigerian VAT, applied to every booking total.
pub const DEFAULT_TAX_RATE: Rate = Rate::from_bps(750);

/// Service fee charged on visa applications.
pub const VISA_SERVICE_FEE_RATE: Rate = Rate::from_bps(500);

/// Naira per US dollar used for display and settlement.
pub const DEFAULT_NGN_RATE: u32 = 1650;
