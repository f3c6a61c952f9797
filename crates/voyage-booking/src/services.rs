//! # Booking Services
//!
//! The explicitly constructed set of stores an application shell holds.
//!
//! ```text
//!   BookingConfig ──► BookingServices::new()
//!                       ├── PricingContext   (validated rates)
//!                       ├── MockGateway      (latency from config)
//!                       ├── KeyValueStorage  (memory | file)
//!                       └── stores: flights, hotels, tours, visas, auth
//! ```
//!
//! `with_parts` takes the gateways, storage and emitter directly so a shell
//! can plug in real suppliers or a UI event bridge.

use std::sync::Arc;

use tracing::info;

use crate::config::{BookingConfig, PricingContext};
use crate::error::BookingResult;
use crate::events::{BookingEventEmitter, NoOpEmitter};
use crate::gateway::{AuthGateway, BookingGateway, MockGateway};
use crate::state::{AuthStore, FlightBookingStore, HotelBookingStore, TourBookingStore, VisaStore};
use crate::storage::{self, KeyValueStorage};

pub struct BookingServices {
    pub config: BookingConfig,
    pub pricing: PricingContext,
    pub flights: FlightBookingStore,
    pub hotels: HotelBookingStore,
    pub tours: TourBookingStore,
    pub visas: VisaStore,
    pub auth: AuthStore,
}

impl BookingServices {
    /// Builds every store on the mock gateway and the configured storage.
    pub fn new(config: BookingConfig) -> BookingResult<Self> {
        let gateway = Arc::new(MockGateway::new(config.latency.clone()));
        let storage = storage::from_config(&config.storage)?;
        Self::with_parts(config, gateway.clone(), gateway, storage, Arc::new(NoOpEmitter))
    }

    pub fn with_parts(
        config: BookingConfig,
        booking_gateway: Arc<dyn BookingGateway>,
        auth_gateway: Arc<dyn AuthGateway>,
        storage: Arc<dyn KeyValueStorage>,
        emitter: Arc<dyn BookingEventEmitter>,
    ) -> BookingResult<Self> {
        config.validate()?;
        let pricing = config.pricing.context()?;

        let flights = FlightBookingStore::new(booking_gateway.clone(), pricing).with_emitter(emitter.clone());
        let hotels = HotelBookingStore::new(booking_gateway.clone(), pricing).with_emitter(emitter.clone());
        let tours = TourBookingStore::new(booking_gateway, pricing).with_emitter(emitter);
        let visas = VisaStore::new(pricing);
        let auth = AuthStore::new(auth_gateway, storage)?;

        info!(
            tax_rate_bps = pricing.tax_rate.bps(),
            ngn_rate = pricing.ngn_rate.rate(),
            storage = %config.storage.backend,
            "Booking services ready"
        );

        Ok(BookingServices {
            config,
            pricing,
            flights,
            hotels,
            tours,
            visas,
            auth,
        })
    }

    /// Carries the sign-in state into the flight, hotel and tour stores.
    pub fn sync_account(&self) {
        let logged_in = self.auth.is_logged_in();
        let name = if self.auth.is_agent() {
            self.auth
                .user()
                .and_then(|u| u.agency_name)
                .unwrap_or_else(|| self.auth.display_name())
        } else {
            self.auth.display_name()
        };
        self.flights.set_logged_in(logged_in);
        self.hotels.set_account(logged_in, name.clone());
        self.tours.set_account(logged_in, name);
    }
}
