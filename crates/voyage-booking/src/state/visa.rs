//! # Visa Store
//!
//! Holds the selected visa service, the applicant form, the document
//! checklist and the application status.
//!
//! ```text
//!  Idle ──confirm_application()──► Submitted ──► Processing ──► Approved
//!                                      │              │
//!                                      └──────────────┴───────► Rejected
//! ```
//!
//! Payment verification happens outside this store; it only records the
//! application reference once payment is confirmed. Review results are
//! recorded by the back office through [`VisaStore::record_review`].

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};
use voyage_core::forms::validate_applicant;
use voyage_core::money::Money;
use voyage_core::pricing::{visa_price, VisaPricing};
use voyage_core::reference::{invoice_number, long_invoice_date};
use voyage_core::{
    ApplicantForm, ContactInfo, Currency, FieldErrors, ProductKind, UploadedDoc, ValidationError,
    VisaApplicationStatus, VisaSearchParams, VisaService,
};

use super::{Invoice, SharedState};
use crate::config::PricingContext;
use crate::error::BookingResult;

/// The checklist every application starts with.
pub fn default_documents() -> Vec<UploadedDoc> {
    vec![
        UploadedDoc::pending("passportBio", "Passport Biodata Page (Scan/Photo)", true),
        UploadedDoc::pending("passportPhoto", "Passport Photograph (White Background)", true),
        UploadedDoc::pending("bankStatement", "Bank Statement (Last 6 Months)", true),
        UploadedDoc::pending("flightBooking", "Flight Booking / Itinerary", false),
        UploadedDoc::pending("hotelBooking", "Hotel / Accommodation Booking", false),
        UploadedDoc::pending("employmentLetter", "Employment / Sponsorship Letter", false),
    ]
}

// =============================================================================
// State
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisaState {
    pub selected_visa: Option<VisaService>,
    pub search_params: VisaSearchParams,

    pub applicant: ApplicantForm,
    pub applicant_errors: FieldErrors,
    pub documents: Vec<UploadedDoc>,

    pub invoice: Option<Invoice>,
    pub application_ref: String,
    pub status: VisaApplicationStatus,
    pub admin_note: String,

    /// Copied from the applicant when the invoice is generated.
    pub contact: ContactInfo,
}

impl Default for VisaState {
    fn default() -> Self {
        VisaState {
            selected_visa: None,
            search_params: VisaSearchParams::default(),
            applicant: ApplicantForm::default(),
            applicant_errors: FieldErrors::new(),
            documents: default_documents(),
            invoice: None,
            application_ref: String::new(),
            status: VisaApplicationStatus::Idle,
            admin_note: String::new(),
            contact: ContactInfo::default(),
        }
    }
}

// =============================================================================
// Store
// =============================================================================

#[derive(Clone)]
pub struct VisaStore {
    state: SharedState<VisaState>,
    pricing: PricingContext,
}

impl VisaStore {
    pub fn new(pricing: PricingContext) -> Self {
        VisaStore {
            state: SharedState::new(VisaState::default()),
            pricing,
        }
    }

    pub fn snapshot(&self) -> VisaState {
        self.state.snapshot()
    }

    /// Selects a visa service and starts a fresh application.
    ///
    /// The applicant's nationality is pre-filled from the search.
    pub fn set_visa(&self, visa: VisaService, params: VisaSearchParams) {
        debug!(visa_id = visa.id, country = %visa.country, "Visa selected");
        self.state.with_mut(|s| {
            s.applicant = ApplicantForm {
                nationality: params.nationality.clone(),
                ..Default::default()
            };
            s.applicant_errors.clear();
            s.documents = default_documents();
            s.invoice = None;
            s.application_ref.clear();
            s.status = VisaApplicationStatus::Idle;
            s.admin_note.clear();
            s.selected_visa = Some(visa);
            s.search_params = params;
        });
    }

    pub fn update_applicant<F>(&self, edit: F)
    where
        F: FnOnce(&mut ApplicantForm),
    {
        self.state.with_mut(|s| edit(&mut s.applicant));
    }

    /// Validates the applicant form and keeps the errors on the state.
    pub fn validate_applicant(&self) -> FieldErrors {
        self.state.with_mut(|s| {
            s.applicant_errors = validate_applicant(&s.applicant);
            s.applicant_errors.clone()
        })
    }

    // =========================================================================
    // Documents
    // =========================================================================

    /// Returns false when the checklist has no such key.
    pub fn mark_document_uploaded(&self, key: &str, file_name: &str, size: &str) -> bool {
        self.state.with_mut(|s| match s.documents.iter_mut().find(|d| d.key == key) {
            Some(doc) => {
                doc.uploaded = true;
                doc.file_name = file_name.to_string();
                doc.size = size.to_string();
                true
            }
            None => false,
        })
    }

    pub fn remove_document(&self, key: &str) -> bool {
        self.state.with_mut(|s| match s.documents.iter_mut().find(|d| d.key == key) {
            Some(doc) => {
                doc.uploaded = false;
                doc.file_name.clear();
                doc.size.clear();
                true
            }
            None => false,
        })
    }

    pub fn required_docs_uploaded(&self) -> bool {
        self.state
            .with(|s| s.documents.iter().filter(|d| d.required).all(|d| d.uploaded))
    }

    // =========================================================================
    // Pricing & Invoice
    // =========================================================================

    pub fn total_applicants(&self) -> u32 {
        self.state.with(|s| s.search_params.adults + s.search_params.children)
    }

    /// `None` until a visa is selected.
    pub fn pricing(&self) -> Option<VisaPricing> {
        let ctx = self.pricing;
        self.state.with(|s| {
            let visa = s.selected_visa.as_ref()?;
            let applicants = s.search_params.adults + s.search_params.children;
            Some(visa_price(visa.price, applicants, ctx.visa_service_fee, ctx.tax_rate))
        })
    }

    /// Formats a naira amount.
    pub fn format_ngn(&self, ngn: Money) -> String {
        ngn.format_whole(Currency::Ngn)
    }

    /// Issues the invoice once; later calls keep it and refresh the contact.
    pub fn generate_invoice(&self) -> Invoice {
        self.state.with_mut(|s| {
            s.contact = ContactInfo::new(s.applicant.email.clone(), s.applicant.phone.clone());
            s.invoice
                .get_or_insert_with(|| {
                    let now = Utc::now();
                    Invoice {
                        number: invoice_number(ProductKind::Visa, now),
                        date: long_invoice_date(now),
                    }
                })
                .clone()
        })
    }

    // =========================================================================
    // Application Lifecycle
    // =========================================================================

    /// Records the reference issued once payment is verified.
    pub fn confirm_application(&self, application_ref: impl Into<String>) {
        let application_ref = application_ref.into();
        info!(%application_ref, "Visa application submitted");
        self.state.with_mut(|s| {
            s.application_ref = application_ref;
            s.status = VisaApplicationStatus::Submitted;
        });
    }

    /// Moves a submitted application through review.
    pub fn record_review(&self, status: VisaApplicationStatus, admin_note: impl Into<String>) -> BookingResult<()> {
        let admin_note = admin_note.into();
        self.state.with_mut(|s| -> BookingResult<()> {
            let allowed = matches!(
                (s.status, status),
                (
                    VisaApplicationStatus::Submitted | VisaApplicationStatus::Processing,
                    VisaApplicationStatus::Processing | VisaApplicationStatus::Approved | VisaApplicationStatus::Rejected
                )
            ) && s.status != status;
            if !allowed {
                return Err(ValidationError::NotAllowed {
                    field: "status".to_string(),
                    allowed: review_targets(s.status),
                }
                .into());
            }
            info!(application_ref = %s.application_ref, from = %s.status, to = %status, "Visa review recorded");
            s.status = status;
            s.admin_note = admin_note;
            Ok(())
        })
    }

    pub fn reset(&self) {
        self.state.with_mut(|s| *s = VisaState::default());
    }
}

fn review_targets(current: VisaApplicationStatus) -> Vec<String> {
    match current {
        VisaApplicationStatus::Submitted => vec!["processing".into(), "approved".into(), "rejected".into()],
        VisaApplicationStatus::Processing => vec!["approved".into(), "rejected".into()],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BookingError;
    use chrono::NaiveDate;

    fn uk_tourist() -> VisaService {
        VisaService {
            id: 12,
            country: "United Kingdom".to_string(),
            nationality: "Nigerian".to_string(),
            visa_type: "Tourist".to_string(),
            validity: "6 Months".to_string(),
            entry_type: "Multiple".to_string(),
            processing_time: "15 working days".to_string(),
            price: Money::from_major(120_000),
            requirements: vec!["Bank statement".to_string()],
            success_rate: 92,
        }
    }

    fn search(adults: u32, children: u32) -> VisaSearchParams {
        VisaSearchParams {
            country: "United Kingdom".to_string(),
            nationality: "Nigerian".to_string(),
            adults,
            children,
        }
    }

    fn store() -> VisaStore {
        VisaStore::new(PricingContext::default())
    }

    #[test]
    fn test_pricing_example() {
        let store = store();
        assert_eq!(store.pricing(), None);

        store.set_visa(uk_tourist(), search(2, 0));
        let p = store.pricing().unwrap();
        assert_eq!(p.applicants, 2);
        assert_eq!(p.subtotal, Money::from_major(240_000));
        assert_eq!(p.service_fee, Money::from_major(12_000));
        assert_eq!(p.tax, Money::from_major(18_000));
        assert_eq!(p.total, Money::from_major(270_000));
        assert_eq!(store.format_ngn(p.total), "₦270,000");
    }

    #[test]
    fn test_set_visa_starts_fresh_application() {
        let store = store();
        store.set_visa(uk_tourist(), search(1, 1));
        store.update_applicant(|a| a.first_name = "Ada".to_string());
        store.mark_document_uploaded("passportBio", "bio.pdf", "1.2 MB");
        store.confirm_application("VIS-REF-1");

        store.set_visa(uk_tourist(), search(1, 0));
        let s = store.snapshot();
        assert_eq!(s.applicant.first_name, "");
        assert_eq!(s.applicant.nationality, "Nigerian");
        assert_eq!(s.documents, default_documents());
        assert_eq!(s.application_ref, "");
        assert_eq!(s.status, VisaApplicationStatus::Idle);
        assert_eq!(store.total_applicants(), 1);
    }

    #[test]
    fn test_document_checklist() {
        let store = store();
        assert!(!store.required_docs_uploaded());

        assert!(store.mark_document_uploaded("passportBio", "bio.jpg", "820 KB"));
        assert!(store.mark_document_uploaded("passportPhoto", "photo.jpg", "240 KB"));
        assert!(!store.required_docs_uploaded());
        assert!(store.mark_document_uploaded("bankStatement", "statement.pdf", "2.1 MB"));
        assert!(store.required_docs_uploaded());

        assert!(!store.mark_document_uploaded("visaForm", "x.pdf", "1 KB"));

        assert!(store.remove_document("passportPhoto"));
        assert!(!store.required_docs_uploaded());
        let s = store.snapshot();
        let photo = s.documents.iter().find(|d| d.key == "passportPhoto").unwrap();
        assert_eq!(photo.file_name, "");
        assert!(!photo.uploaded);
    }

    #[test]
    fn test_generate_invoice_once() {
        let store = store();
        store.set_visa(uk_tourist(), search(1, 0));
        store.update_applicant(|a| {
            a.email = "ada@example.com".to_string();
            a.phone = "0802".to_string();
        });

        let first = store.generate_invoice();
        assert!(first.number.starts_with("VIS-"));

        store.update_applicant(|a| a.email = "new@example.com".to_string());
        let second = store.generate_invoice();
        assert_eq!(first, second);
        assert_eq!(store.snapshot().contact.email, "new@example.com");
    }

    #[test]
    fn test_validate_applicant_keeps_errors() {
        let store = store();
        store.set_visa(uk_tourist(), search(1, 0));

        let errors = store.validate_applicant();
        assert!(!errors.is_valid());
        assert_eq!(errors.get("firstName"), Some("First name is required"));
        assert!(errors.get("nationality").is_none());
        assert_eq!(store.snapshot().applicant_errors, errors);

        store.update_applicant(|a| {
            a.first_name = "Ada".to_string();
            a.last_name = "Okafor".to_string();
            a.date_of_birth = NaiveDate::from_ymd_opt(1990, 4, 2);
            a.email = "ada@example.com".to_string();
            a.phone = "0802".to_string();
            a.passport_number = "A01234567".to_string();
            a.passport_expiry = NaiveDate::from_ymd_opt(2030, 1, 1);
            a.departure_date = NaiveDate::from_ymd_opt(2026, 12, 1);
            a.return_date = NaiveDate::from_ymd_opt(2026, 12, 15);
        });
        assert!(store.validate_applicant().is_valid());
    }

    #[test]
    fn test_review_lifecycle() {
        let store = store();
        assert!(store.record_review(VisaApplicationStatus::Approved, "").is_err());

        store.confirm_application("VIS-7QX2MA");
        store.record_review(VisaApplicationStatus::Processing, "Biometrics booked").unwrap();
        store.record_review(VisaApplicationStatus::Approved, "Visa issued").unwrap();

        let s = store.snapshot();
        assert_eq!(s.status, VisaApplicationStatus::Approved);
        assert_eq!(s.admin_note, "Visa issued");

        let err = store.record_review(VisaApplicationStatus::Rejected, "").unwrap_err();
        assert!(matches!(err, BookingError::Core(_)));
    }

    #[test]
    fn test_reset() {
        let store = store();
        store.set_visa(uk_tourist(), search(3, 1));
        store.mark_document_uploaded("passportBio", "bio.pdf", "1 MB");
        store.generate_invoice();
        store.confirm_application("VIS-1");

        store.reset();
        assert_eq!(store.snapshot(), VisaState::default());
    }
}
