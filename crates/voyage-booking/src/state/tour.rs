//! # Tour Booking Store
//!
//! Holds the selected tour, its package options, the head counts and the
//! lead booker.
//!
//! Only the lead booker gets a participant form; everyone else is tracked by
//! count. The lead keeps whatever was typed across count changes, and a blank
//! lead contact is refilled from the store's contact info.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};
use voyage_core::money::Money;
use voyage_core::pricing::{tour_price, PaxCounts, TourPriceBreakdown};
use voyage_core::seeding::{reseed, Traveller};
use voyage_core::validation::validate_tour_counts;
use voyage_core::{
    BookingStatus, ContactInfo, Currency, Participant, PaxType, ProductKind, Tour, TourPackage, TourSearchParams,
};

use super::{emit_outcome, Invoice, SharedState};
use crate::config::PricingContext;
use crate::error::{BookingError, BookingResult};
use crate::events::{BookingEventEmitter, NoOpEmitter};
use crate::gateway::{BookingGateway, TourBookingRequest, TourPackagesRequest};

const KIND: ProductKind = ProductKind::Tour;

// =============================================================================
// State
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TourBookingState {
    pub tour: Option<Tour>,
    pub search_params: TourSearchParams,

    pub available_packages: Vec<TourPackage>,
    pub packages_loading: bool,
    pub packages_error: String,
    pub selected_package: Option<TourPackage>,

    pub counts: PaxCounts,
    /// The lead booker only.
    pub participants: Vec<Participant>,
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

impl TourBookingState {
    fn ensure_not_loading(&self) -> BookingResult<()> {
        if self.status == BookingStatus::Loading {
            return Err(BookingError::InProgress { kind: KIND });
        }
        Ok(())
    }

    fn seed_lead(&mut self) {
        self.participants = reseed(&self.participants, 1, &self.contact);
        if let Some(lead) = self.participants.first_mut() {
            lead.pax_type = PaxType::Adult;
        }
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
pub struct TourBookingStore {
    state: SharedState<TourBookingState>,
    gateway: Arc<dyn BookingGateway>,
    emitter: Arc<dyn BookingEventEmitter>,
    pricing: PricingContext,
}

impl TourBookingStore {
    pub fn new(gateway: Arc<dyn BookingGateway>, pricing: PricingContext) -> Self {
        TourBookingStore {
            state: SharedState::new(TourBookingState::default()),
            gateway,
            emitter: Arc::new(NoOpEmitter),
            pricing,
        }
    }

    pub fn with_emitter(mut self, emitter: Arc<dyn BookingEventEmitter>) -> Self {
        self.emitter = emitter;
        self
    }

    pub fn snapshot(&self) -> TourBookingState {
        self.state.snapshot()
    }

    pub fn status(&self) -> BookingStatus {
        self.state.with(|s| s.status)
    }

    // =========================================================================
    // Selection & Participants
    // =========================================================================

    /// Sets the tour from a search result. A zero adult count becomes one,
    /// then the party must fit the tour limits. A package fetch still running
    /// for the previous tour is superseded.
    pub fn set_tour(&self, tour: Tour, params: TourSearchParams) -> BookingResult<()> {
        let counts = PaxCounts::new(params.adults.max(1), params.children, params.infants);
        validate_tour_counts(counts.adults, counts.children, counts.infants)?;

        self.state.with_mut(|s| {
            s.ensure_not_loading()?;
            debug!(tour_id = %tour.id, city = %params.city, "Tour selected");

            s.epoch += 1;
            s.counts = counts;
            s.tour = Some(tour);
            s.search_params = params;
            s.selected_package = None;
            s.available_packages.clear();
            s.packages_loading = false;
            s.packages_error.clear();
            s.clear_result();
            Ok(())
        })
    }

    /// Loads package options for the selected tour.
    pub async fn fetch_packages(&self) -> BookingResult<Vec<TourPackage>> {
        let (request, epoch) = self.state.with_mut(|s| {
            let tour = s.tour.clone().ok_or(BookingError::NoSelection { kind: KIND })?;
            let request = TourPackagesRequest {
                tour,
                city: s.search_params.city.clone(),
                date: s.search_params.date,
                counts: s.counts,
            };
            s.packages_loading = true;
            s.packages_error.clear();
            Ok::<_, BookingError>((request, s.epoch))
        })?;

        let response = self.gateway.tour_packages(&request).await;

        self.state.with_mut(|s| {
            if s.epoch != epoch {
                return Err(BookingError::Superseded { kind: KIND });
            }
            s.packages_loading = false;
            match response {
                Ok(packages) => {
                    debug!(tour_id = %request.tour.id, packages = packages.len(), "Tour packages loaded");
                    s.available_packages = packages.clone();
                    Ok(packages)
                }
                Err(err) => {
                    warn!(error = %err, "Tour package listing failed");
                    s.packages_error = err.to_string();
                    Err(err.into())
                }
            }
        })
    }

    pub fn select_package(&self, package: TourPackage) -> BookingResult<()> {
        self.state.with_mut(|s| {
            s.ensure_not_loading()?;
            s.selected_package = Some(package);
            s.seed_lead();
            Ok(())
        })
    }

    /// Adults at least one, nine people at most.
    pub fn update_counts(&self, adults: u32, children: u32, infants: u32) -> BookingResult<()> {
        validate_tour_counts(adults, children, infants)?;
        self.state.with_mut(|s| {
            s.ensure_not_loading()?;
            s.counts = PaxCounts::new(adults, children, infants);
            s.seed_lead();
            Ok(())
        })
    }

    pub fn update_lead<F>(&self, edit: F) -> BookingResult<()>
    where
        F: FnOnce(&mut Participant),
    {
        self.state.with_mut(|s| {
            let lead = s
                .participants
                .first_mut()
                .ok_or(BookingError::TravellerIndex { index: 0, len: 0 })?;
            edit(lead);
            Ok(())
        })
    }

    pub fn set_contact(&self, email: impl Into<String>, phone: impl Into<String>) {
        let contact = ContactInfo::new(email, phone);
        self.state.with_mut(|s| {
            if let Some(lead) = s.participants.first_mut() {
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

    pub fn total_participants(&self) -> u32 {
        self.state.with(|s| s.counts.total())
    }

    // =========================================================================
    // Pricing
    // =========================================================================

    pub fn price_breakdown(&self) -> TourPriceBreakdown {
        let ctx = self.pricing;
        self.state
            .with(|s| tour_price(s.selected_package.as_ref(), s.counts, &ctx.ngn_rate, ctx.tax_rate))
    }

    /// Formats a naira amount.
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

    /// Books the selected package and returns the booking reference.
    pub async fn confirm_booking(&self) -> BookingResult<String> {
        let (request, epoch) = self.state.with_mut(|s| {
            let package = s
                .selected_package
                .as_ref()
                .ok_or(BookingError::NoSelection { kind: KIND })?;
            let request = TourBookingRequest {
                package_id: package.package_id.clone(),
                date: s.search_params.date,
                counts: s.counts,
                lead_guest: s.participants.first().cloned().unwrap_or_default(),
                payment_reference: s.payment_reference.clone(),
            };
            s.status = s.status.transition(BookingStatus::Loading)?;
            s.error_message.clear();
            Ok::<_, BookingError>((request, s.epoch))
        })?;
        self.emitter.emit_status(KIND, BookingStatus::Loading);
        info!(package_id = %request.package_id, participants = request.counts.total(), "Booking tour package");

        let response = self.gateway.book_tour(&request).await;

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
            Ok(reference) => info!(%reference, "Tour booking confirmed"),
            Err(err) => warn!(error = %err, "Tour booking failed"),
        }
        emit_outcome(self.emitter.as_ref(), KIND, &outcome);
        outcome
    }

    pub fn reset(&self) {
        self.state.with_mut(|s| {
            let next = TourBookingState {
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
    use crate::events::testing::RecordingEmitter;
    use crate::gateway::testing::FailingGateway;
    use crate::gateway::MockGateway;
    use chrono::NaiveDate;

    fn tour() -> Tour {
        Tour {
            id: "TR-DXB-7".to_string(),
            name: "Desert Safari".to_string(),
            tour_type: Some("Adventure".to_string()),
            highlights: vec!["Dune bashing".to_string()],
            image: None,
        }
    }

    fn params(adults: u32, children: u32) -> TourSearchParams {
        TourSearchParams {
            city: "Dubai".to_string(),
            country: "United Arab Emirates".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 12, 20),
            adults,
            children,
            infants: 0,
        }
    }

    fn store() -> TourBookingStore {
        TourBookingStore::new(Arc::new(MockGateway::new(LatencyConfig::default())), PricingContext::default())
    }

    async fn with_package(store: &TourBookingStore) -> TourPackage {
        store.set_tour(tour(), params(2, 1)).unwrap();
        let packages = store.fetch_packages().await.unwrap();
        let standard = packages[0].clone();
        store.select_package(standard.clone()).unwrap();
        standard
    }

    #[test]
    fn test_set_tour_counts() {
        let store = store();
        store.set_tour(tour(), params(0, 2)).unwrap();
        let s = store.snapshot();
        assert_eq!(s.counts, PaxCounts::new(1, 2, 0));
        assert_eq!(store.total_participants(), 3);
        assert!(s.selected_package.is_none());
    }

    #[test]
    fn test_set_tour_rejects_large_party() {
        let store = store();
        let err = store.set_tour(tour(), params(40, 5)).unwrap_err();
        assert!(matches!(err, BookingError::Core(_)));
        assert!(store.snapshot().tour.is_none());

        store.set_tour(tour(), params(6, 3)).unwrap();
        assert_eq!(store.total_participants(), 9);
        assert!(store.set_tour(tour(), params(9, 1)).is_err());
        assert_eq!(store.total_participants(), 9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_tour_supersedes_package_fetch() {
        let store = store();
        store.set_tour(tour(), params(1, 0)).unwrap();

        let handle = tokio::spawn({
            let store = store.clone();
            async move { store.fetch_packages().await }
        });
        tokio::task::yield_now().await;
        assert!(store.snapshot().packages_loading);

        let other = Tour {
            id: "TR-DXB-9".to_string(),
            name: "Dhow Cruise".to_string(),
            ..Default::default()
        };
        store.set_tour(other, params(2, 0)).unwrap();
        assert!(!store.snapshot().packages_loading);

        let err = handle.await.unwrap().unwrap_err();
        assert!(matches!(err, BookingError::Superseded { kind: ProductKind::Tour }));
        let s = store.snapshot();
        assert_eq!(s.tour.unwrap().id, "TR-DXB-9");
        assert!(s.available_packages.is_empty());
        assert!(!s.packages_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_packages() {
        let store = store();
        store.set_tour(tour(), params(1, 0)).unwrap();

        let handle = tokio::spawn({
            let store = store.clone();
            async move { store.fetch_packages().await }
        });
        tokio::task::yield_now().await;
        assert!(store.snapshot().packages_loading);

        let packages = handle.await.unwrap().unwrap();
        assert_eq!(packages.len(), 5);
        assert_eq!(packages[0].tour_type, "Adventure");
        assert_eq!(packages[0].meeting_point, "Dubai City Centre Hotel Lobby");
        assert!(!store.snapshot().packages_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_packages_failure() {
        let store = TourBookingStore::new(
            Arc::new(FailingGateway::new(GatewayError::Timeout { after_ms: 30_000 })),
            PricingContext::default(),
        );
        store.set_tour(tour(), params(1, 0)).unwrap();

        assert!(store.fetch_packages().await.is_err());
        let s = store.snapshot();
        assert!(!s.packages_loading);
        assert_eq!(s.packages_error, "The supplier did not respond within 30000 ms");
    }

    #[tokio::test(start_paused = true)]
    async fn test_lead_survives_count_changes() {
        let store = store();
        store.set_contact("ada@example.com", "0802");
        with_package(&store).await;

        let s = store.snapshot();
        assert_eq!(s.participants.len(), 1);
        assert_eq!(s.participants[0].email, "ada@example.com");

        store
            .update_lead(|p| {
                p.first_name = "Ada".to_string();
                p.email = "lead@example.com".to_string();
            })
            .unwrap();
        store.update_counts(3, 2, 1).unwrap();

        let s = store.snapshot();
        assert_eq!(s.participants.len(), 1);
        assert_eq!(s.participants[0].first_name, "Ada");
        assert_eq!(s.participants[0].email, "lead@example.com");
        assert_eq!(s.participants[0].pax_type, PaxType::Adult);
        assert_eq!(store.total_participants(), 6);
    }

    #[test]
    fn test_update_counts_limits() {
        let store = store();
        assert!(store.update_counts(0, 1, 0).is_err());
        assert!(store.update_counts(5, 4, 1).is_err());
        assert!(store.update_counts(9, 0, 0).is_ok());
    }

    #[test]
    fn test_update_lead_without_lead() {
        let err = store().update_lead(|_| {}).unwrap_err();
        assert!(matches!(err, BookingError::TravellerIndex { index: 0, len: 0 }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_price_breakdown() {
        let store = store();
        assert_eq!(store.price_breakdown(), TourPriceBreakdown::default());
        with_package(&store).await;

        let p = store.price_breakdown();
        assert_eq!(p.adult_total, Money::from_major(198_000));
        assert_eq!(p.child_total, Money::from_major(57_750));
        assert_eq!(p.infant_total, Money::zero());
        assert_eq!(p.subtotal_usd, Money::from_major(155));
        assert_eq!(p.subtotal_ngn, Money::from_major(255_750));
        assert_eq!(p.tax, Money::from_major(19_181));
        assert_eq!(p.total, Money::from_major(274_931));
        assert_eq!(store.format_ngn(p.total), "₦274,931");
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirm_booking() {
        let emitter = Arc::new(RecordingEmitter::default());
        let store = store().with_emitter(emitter.clone());
        with_package(&store).await;

        let handle = tokio::spawn({
            let store = store.clone();
            async move { store.confirm_booking().await }
        });
        tokio::task::yield_now().await;
        assert_eq!(store.status(), BookingStatus::Loading);

        let reference = handle.await.unwrap().unwrap();
        let s = store.snapshot();
        assert!(reference.starts_with("TUR"));
        assert_eq!(s.status, BookingStatus::Confirmed);
        assert_eq!(s.voucher_url, "#");
        assert!(s.invoice.unwrap().number.starts_with("TUR-"));
        assert_eq!(emitter.statuses(), vec![BookingStatus::Loading, BookingStatus::Confirmed]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirm_failure() {
        let store = TourBookingStore::new(
            Arc::new(FailingGateway::new(GatewayError::Unavailable {
                supplier: "Rayna Tours".to_string(),
            })),
            PricingContext::default(),
        );
        store.set_tour(tour(), params(1, 0)).unwrap();
        store
            .select_package(MockGateway::mock_packages(&tour(), "Dubai").remove(1))
            .unwrap();

        assert!(store.confirm_booking().await.is_err());
        let s = store.snapshot();
        assert_eq!(s.status, BookingStatus::Error);
        assert_eq!(s.error_message, "Rayna Tours is temporarily unavailable. Please try again later.");
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset() {
        let store = store();
        with_package(&store).await;
        store.confirm_booking().await.unwrap();

        store.reset();
        let s = store.snapshot();
        assert!(s.tour.is_none());
        assert!(s.selected_package.is_none());
        assert!(s.available_packages.is_empty());
        assert!(s.participants.is_empty());
        assert_eq!(s.counts, PaxCounts::default());
        assert_eq!(s.search_params, TourSearchParams::default());
        assert_eq!(s.status, BookingStatus::Idle);
        assert!(s.booking_reference.is_empty());
    }
}
