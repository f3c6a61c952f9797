//! # Participant Seeding
//!
//! Expands a head/room count into editable traveller records.
//!
//! ```text
//!   seed(3, contact)                    reseed([A, B, C], 2, contact)
//!   ┌────────────────────┐              ┌────────────────────┐
//!   │ [0] blank + contact│              │ [0] A (kept)       │
//!   │ [1] blank          │              │ [1] B (kept)       │
//!   │ [2] blank          │              └────────────────────┘
//!   └────────────────────┘              reseed([A], 3, contact)
//!                                       ┌────────────────────┐
//!                                       │ [0] A (kept)       │
//!                                       │ [1] blank          │
//!                                       │ [2] blank          │
//!                                       └────────────────────┘
//! ```
//!
//! Only the lead record (index 0) carries the shared contact email and
//! phone. On re-seed a blank lead contact field is refilled from the store's
//! contact info; a field the user already typed is left alone.

use crate::types::{ContactInfo, GuestDetail, Participant, Passenger};

/// A per-person form record that can carry the booking contact.
pub trait Traveller: Default + Clone {
    fn contact(&self) -> (&str, &str);

    fn contact_mut(&mut self) -> (&mut String, &mut String);

    /// Overwrites email and phone.
    fn set_contact(&mut self, contact: &ContactInfo) {
        let (email, phone) = self.contact_mut();
        email.clone_from(&contact.email);
        phone.clone_from(&contact.phone);
    }

    /// Fills only the contact fields that are still empty.
    fn fill_missing_contact(&mut self, contact: &ContactInfo) {
        let (email, phone) = self.contact_mut();
        if email.is_empty() {
            email.clone_from(&contact.email);
        }
        if phone.is_empty() {
            phone.clone_from(&contact.phone);
        }
    }
}

macro_rules! impl_traveller {
    ($($ty:ty),*) => {
        $(
            impl Traveller for $ty {
                fn contact(&self) -> (&str, &str) {
                    (&self.email, &self.phone)
                }

                fn contact_mut(&mut self) -> (&mut String, &mut String) {
                    (&mut self.email, &mut self.phone)
                }
            }
        )*
    };
}

impl_traveller!(Passenger, GuestDetail, Participant);

/// Creates `count` blank records; the first carries `contact`.
pub fn seed<T: Traveller>(count: usize, contact: &ContactInfo) -> Vec<T> {
    let mut records = vec![T::default(); count];
    if let Some(lead) = records.first_mut() {
        lead.set_contact(contact);
    }
    records
}

/// Resizes `existing` to `count` records.
///
/// Records whose index survives are kept as entered, extra records are
/// dropped, and new slots are blank.
pub fn reseed<T: Traveller>(existing: &[T], count: usize, contact: &ContactInfo) -> Vec<T> {
    let mut records: Vec<T> = existing.iter().take(count).cloned().collect();
    records.resize_with(count, T::default);
    if let Some(lead) = records.first_mut() {
        lead.fill_missing_contact(contact);
    }
    records
}
