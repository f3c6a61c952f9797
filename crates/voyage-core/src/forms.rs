//! # Form Validators
//!
//! Whole-form validation returning user-facing messages per field.
//!
//! ## Forms
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ContactForm          name, email, phone, subject, message              │
//! │  ApplicantForm        visa store applicant (personal/passport/travel)   │
//! │  GlobalVisaInquiry    full name, email, phone, nationality, destination │
//! │  VisaApplicationWizard                                                  │
//! │     step 1 nationality ─► step 2 visa type ─► step 3 documents          │
//! │                                             ─► step 4 applicant details │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field keys are the camelCase names the frontend binds to (`fullName`,
//! `passportNumber`), so a [`FieldErrors`] map can be rendered inline as-is.
//! Every validation pass starts from an empty map.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::types::ApplicantForm;
use crate::validation::is_email_shaped;

/// Last step of the visa application wizard.
pub const WIZARD_LAST_STEP: u8 = 4;

// =============================================================================
// Field Errors
// =============================================================================

/// Per-field error messages. Empty means the form is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        FieldErrors::default()
    }

    pub fn insert(&mut self, field: &str, message: &str) {
        self.0.insert(field.to_string(), message.to_string());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Clears one field's error (the user edited it).
    pub fn remove(&mut self, field: &str) {
        self.0.remove(field);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn require(&mut self, field: &str, value: &str, message: &str) {
        if value.trim().is_empty() {
            self.insert(field, message);
        }
    }

    fn require_email(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.insert(field, "Email is required");
        } else if !is_email_shaped(value) {
            self.insert(field, "Invalid email format");
        }
    }
}

// =============================================================================
// Contact Form
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    /// All five fields are required; email must be shaped `x@y.z`.
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.require("name", &self.name, "Name is required");
        errors.require_email("email", &self.email);
        errors.require("phone", &self.phone, "Phone number is required");
        errors.require("subject", &self.subject, "Subject is required");
        errors.require("message", &self.message, "Message is required");
        errors
    }
}

// =============================================================================
// Visa Applicant (visa store form)
// =============================================================================

/// Validates the visa store's applicant form.
///
/// ## Rules
/// - Names, date of birth, nationality, phone, passport number, passport
///   expiry and departure date are required
/// - Email is required and shaped
/// - Return date may not be before departure
/// - Passport must expire after departure
/// - Refusal details are required once a previous refusal is declared
pub fn validate_applicant(form: &ApplicantForm) -> FieldErrors {
    let mut errors = FieldErrors::new();

    errors.require("firstName", &form.first_name, "First name is required");
    errors.require("lastName", &form.last_name, "Last name is required");
    if form.date_of_birth.is_none() {
        errors.insert("dateOfBirth", "Date of birth is required");
    }
    errors.require("nationality", &form.nationality, "Nationality is required");
    errors.require_email("email", &form.email);
    errors.require("phone", &form.phone, "Phone number is required");
    errors.require("passportNumber", &form.passport_number, "Passport number is required");

    match form.passport_expiry {
        None => errors.insert("passportExpiry", "Passport expiry date is required"),
        Some(expiry) => {
            if let Some(departure) = form.departure_date {
                if expiry <= departure {
                    errors.insert("passportExpiry", "Passport must be valid beyond your departure date");
                }
            }
        }
    }

    match form.departure_date {
        None => errors.insert("departureDate", "Departure date is required"),
        Some(departure) => {
            if let Some(ret) = form.return_date {
                if ret < departure {
                    errors.insert("returnDate", "Return date cannot be before departure date");
                }
            }
        }
    }

    if form.previous_visa_refused {
        errors.require(
            "refusalDetails",
            &form.refusal_details,
            "Please provide details of the previous refusal",
        );
    }

    errors
}

// =============================================================================
// Global Visa Inquiry
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct GlobalVisaInquiry {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub nationality: String,
    pub destination: String,
    pub purpose: String,
    /// Optional free text.
    pub additional_info: String,
}

impl GlobalVisaInquiry {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.require("fullName", &self.full_name, "Full name is required");
        errors.require_email("email", &self.email);
        errors.require("phone", &self.phone, "Phone number is required");
        errors.require("nationality", &self.nationality, "Nationality is required");
        errors.require("destination", &self.destination, "Destination country is required");
        errors.require("purpose", &self.purpose, "Purpose of travel is required");
        errors
    }
}

// =============================================================================
// Visa Application Wizard
// =============================================================================

/// An uploaded file, represented by name and size only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DocumentFile {
    pub file_name: String,
    pub size_bytes: u64,
}

impl DocumentFile {
    pub fn new(file_name: impl Into<String>, size_bytes: u64) -> Self {
        DocumentFile {
            file_name: file_name.into(),
            size_bytes,
        }
    }
}

/// Upload slots of the wizard's document step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum WizardDocument {
    PassportCopy,
    Photo,
    FlightTicket,
    HotelBooking,
    EmploymentLetter,
    TravelInsurance,
}

impl WizardDocument {
    /// Always required regardless of visa type.
    pub const ALWAYS_REQUIRED: [WizardDocument; 2] = [WizardDocument::PassportCopy, WizardDocument::Photo];

    pub const fn key(&self) -> &'static str {
        match self {
            WizardDocument::PassportCopy => "passportCopy",
            WizardDocument::Photo => "photo",
            WizardDocument::FlightTicket => "flightTicket",
            WizardDocument::HotelBooking => "hotelBooking",
            WizardDocument::EmploymentLetter => "employmentLetter",
            WizardDocument::TravelInsurance => "travelInsurance",
        }
    }

    pub const fn missing_message(&self) -> &'static str {
        match self {
            WizardDocument::PassportCopy => "Passport copy is required",
            WizardDocument::Photo => "Passport size photo is required",
            WizardDocument::FlightTicket => "Flight ticket is required",
            WizardDocument::HotelBooking => "Hotel booking is required",
            WizardDocument::EmploymentLetter => "Employment letter is required",
            WizardDocument::TravelInsurance => "Travel insurance is required",
        }
    }

    /// Maps a visa type's requirement label to its upload slot.
    ///
    /// Labels without an upload slot (e.g. "Bank statements") return `None`.
    pub fn from_requirement(label: &str) -> Option<WizardDocument> {
        match label {
            "Confirmed flight tickets" => Some(WizardDocument::FlightTicket),
            "Hotel booking confirmation" => Some(WizardDocument::HotelBooking),
            "Employment letter" => Some(WizardDocument::EmploymentLetter),
            "Travel insurance" => Some(WizardDocument::TravelInsurance),
            _ => None,
        }
    }
}

/// Text fields of the wizard that have an inline error slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WizardField {
    Nationality,
    VisaType,
    FirstName,
    LastName,
    Email,
    Phone,
    PassportNumber,
    DateOfBirth,
}

impl WizardField {
    pub const fn key(&self) -> &'static str {
        match self {
            WizardField::Nationality => "nationality",
            WizardField::VisaType => "visaType",
            WizardField::FirstName => "firstName",
            WizardField::LastName => "lastName",
            WizardField::Email => "email",
            WizardField::Phone => "phone",
            WizardField::PassportNumber => "passportNumber",
            WizardField::DateOfBirth => "dateOfBirth",
        }
    }
}

/// Everything the wizard collects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct VisaApplicationForm {
    pub nationality: String,
    pub visa_type: String,
    pub passport_copy: Option<DocumentFile>,
    pub photo: Option<DocumentFile>,
    pub flight_ticket: Option<DocumentFile>,
    pub hotel_booking: Option<DocumentFile>,
    pub employment_letter: Option<DocumentFile>,
    pub travel_insurance: Option<DocumentFile>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub passport_number: String,
    pub date_of_birth: String,
    #[ts(as = "Option<String>")]
    pub travel_date: Option<NaiveDate>,
}

impl VisaApplicationForm {
    pub fn document(&self, doc: WizardDocument) -> Option<&DocumentFile> {
        self.document_slot(doc).as_ref()
    }

    fn document_slot(&self, doc: WizardDocument) -> &Option<DocumentFile> {
        match doc {
            WizardDocument::PassportCopy => &self.passport_copy,
            WizardDocument::Photo => &self.photo,
            WizardDocument::FlightTicket => &self.flight_ticket,
            WizardDocument::HotelBooking => &self.hotel_booking,
            WizardDocument::EmploymentLetter => &self.employment_letter,
            WizardDocument::TravelInsurance => &self.travel_insurance,
        }
    }

    fn document_slot_mut(&mut self, doc: WizardDocument) -> &mut Option<DocumentFile> {
        match doc {
            WizardDocument::PassportCopy => &mut self.passport_copy,
            WizardDocument::Photo => &mut self.photo,
            WizardDocument::FlightTicket => &mut self.flight_ticket,
            WizardDocument::HotelBooking => &mut self.hotel_booking,
            WizardDocument::EmploymentLetter => &mut self.employment_letter,
            WizardDocument::TravelInsurance => &mut self.travel_insurance,
        }
    }

    fn text_mut(&mut self, field: WizardField) -> &mut String {
        match field {
            WizardField::Nationality => &mut self.nationality,
            WizardField::VisaType => &mut self.visa_type,
            WizardField::FirstName => &mut self.first_name,
            WizardField::LastName => &mut self.last_name,
            WizardField::Email => &mut self.email,
            WizardField::Phone => &mut self.phone,
            WizardField::PassportNumber => &mut self.passport_number,
            WizardField::DateOfBirth => &mut self.date_of_birth,
        }
    }
}

/// Step 1: nationality.
pub fn validate_nationality_step(form: &VisaApplicationForm) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.require("nationality", &form.nationality, "Please select your nationality");
    errors
}

/// Step 2: visa type.
pub fn validate_visa_type_step(form: &VisaApplicationForm) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.require("visaType", &form.visa_type, "Please select a visa type");
    errors
}

/// Step 3: passport copy and photo, plus whatever `required_documents`
/// names. Every missing upload is reported, not only the first.
pub fn validate_documents_step<S: AsRef<str>>(form: &VisaApplicationForm, required_documents: &[S]) -> FieldErrors {
    let mut errors = FieldErrors::new();

    let conditional = required_documents
        .iter()
        .filter_map(|label| WizardDocument::from_requirement(label.as_ref()));

    for doc in WizardDocument::ALWAYS_REQUIRED.into_iter().chain(conditional) {
        if form.document(doc).is_none() {
            errors.insert(doc.key(), doc.missing_message());
        }
    }
    errors
}

/// Step 4: applicant details, travel date no earlier than `today`.
pub fn validate_details_step(form: &VisaApplicationForm, today: NaiveDate) -> FieldErrors {
    let mut errors = FieldErrors::new();

    errors.require("firstName", &form.first_name, "First name is required");
    errors.require("lastName", &form.last_name, "Last name is required");
    errors.require("phone", &form.phone, "Phone number is required");
    errors.require("passportNumber", &form.passport_number, "Passport number is required");
    errors.require("dateOfBirth", &form.date_of_birth, "Date of birth is required");
    errors.require_email("email", &form.email);

    match form.travel_date {
        None => errors.insert("travelDate", "Travel date is required"),
        Some(date) if date < today => errors.insert("travelDate", "Travel date must be in the future"),
        Some(_) => {}
    }

    errors
}

/// The four-step visa application form.
///
/// ```text
///   next_step ──► 1 ──► 2 ──► 3 ──► 4 ──► submit(today)
///   prev_step ◄── (clears errors)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisaApplicationWizard {
    step: u8,
    form: VisaApplicationForm,
    errors: FieldErrors,
}

impl Default for VisaApplicationWizard {
    fn default() -> Self {
        VisaApplicationWizard {
            step: 1,
            form: VisaApplicationForm::default(),
            errors: FieldErrors::new(),
        }
    }
}

impl VisaApplicationWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_step(&self) -> u8 {
        self.step
    }

    pub fn form(&self) -> &VisaApplicationForm {
        &self.form
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Edits a text field and clears its error.
    pub fn set_field(&mut self, field: WizardField, value: impl Into<String>) {
        *self.form.text_mut(field) = value.into();
        self.errors.remove(field.key());
    }

    pub fn set_travel_date(&mut self, date: Option<NaiveDate>) {
        self.form.travel_date = date;
        self.errors.remove("travelDate");
    }

    pub fn attach_document(&mut self, doc: WizardDocument, file: DocumentFile) {
        *self.form.document_slot_mut(doc) = Some(file);
        self.errors.remove(doc.key());
    }

    pub fn detach_document(&mut self, doc: WizardDocument) {
        *self.form.document_slot_mut(doc) = None;
        self.errors.remove(doc.key());
    }

    /// Validates the current step and advances when it passes.
    ///
    /// Step 4 has no further step; it is validated by [`submit`](Self::submit).
    /// Returns whether the current step is valid.
    pub fn next_step<S: AsRef<str>>(&mut self, required_documents: &[S]) -> bool {
        self.errors = match self.step {
            1 => validate_nationality_step(&self.form),
            2 => validate_visa_type_step(&self.form),
            3 => validate_documents_step(&self.form, required_documents),
            _ => FieldErrors::new(),
        };

        let valid = self.errors.is_valid();
        if valid && self.step < WIZARD_LAST_STEP {
            self.step += 1;
        }
        valid
    }

    pub fn prev_step(&mut self) {
        if self.step > 1 {
            self.step -= 1;
            self.errors.clear();
        }
    }

    /// Validates the details step. `today` is the caller's local date.
    pub fn submit(&mut self, today: NaiveDate) -> bool {
        self.errors = validate_details_step(&self.form, today);
        self.errors.is_valid()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
