//! # voyage-booking: Booking Stores for Voyage
//!
//! Stateful booking flows on top of `voyage-core`: one store per product,
//! a supplier gateway seam, session persistence and configuration.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Booking Layer                                    │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                BookingServices (explicit container)              │  │
//! │  │  Built by the caller from BookingConfig; no global state         │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │         ┌─────────────────────┼─────────────────────┐                  │
//! │         ▼                     ▼                     ▼                   │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │ Booking stores │  │ BookingGateway │  │  AuthStore             │    │
//! │  │                │  │                │  │                        │    │
//! │  │ Flight, Hotel, │  │ Supplier calls │  │ user + token persisted │    │
//! │  │ Tour, Visa     │  │ (mock with     │  │ via KeyValueStorage    │    │
//! │  │ idle→loading→  │  │  latency)      │  │                        │    │
//! │  │ confirmed|error│  │                │  │                        │    │
//! │  └────────────────┘  └────────────────┘  └────────────────────────┘    │
//! │                                                                         │
//! │  Status changes flow out through BookingEventEmitter.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`] - Flight, hotel, tour, visa and auth stores
//! - [`gateway`] - Supplier traits and the mock gateway
//! - [`storage`] - Key/value persistence backends
//! - [`config`] - TOML + environment configuration
//! - [`events`] - Status observers
//! - [`services`] - The store container
//! - [`error`] - Booking and supplier errors
//!
//! ## Usage
//!
//! ```rust,ignore
//! use voyage_booking::{BookingConfig, BookingServices};
//!
//! let services = BookingServices::new(BookingConfig::load_or_default(None))?;
//!
//! services.flights.select_offer(offer, 2)?;
//! services.flights.set_contact("ada@example.com", "+234 802 000 0001");
//! let reference = services.flights.confirm_booking().await?;
//! println!("Booked {} for {}", reference, services.flights.price_breakdown().total);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod events;
pub mod gateway;
pub mod services;
pub mod state;
pub mod storage;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{BookingConfig, LatencyConfig, PricingConfig, PricingContext, StorageBackend, StorageConfig};
pub use error::{BookingError, BookingResult, GatewayError, GatewayResult};
pub use events::{BookingEventEmitter, NoOpEmitter};
pub use gateway::{AuthGateway, BookingGateway, MockGateway};
pub use services::BookingServices;
pub use state::{AuthStore, FlightBookingStore, HotelBookingStore, Invoice, TourBookingStore, VisaStore};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
