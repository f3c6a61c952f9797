//! # Reference Numbers
//!
//! Booking references, ticket numbers and invoice numbers.
//!
//! ## Formats
//! ```text
//! ┌──────────────────┬──────────────────────────┬─────────────────────────┐
//! │ Kind             │ Format                   │ Example                 │
//! ├──────────────────┼──────────────────────────┼─────────────────────────┤
//! │ Flight booking   │ BK + 6 base-36           │ BK7QX2MA                │
//! │ Hotel booking    │ HTL + 6 base-36          │ HTLZ01K9P               │
//! │ Tour booking     │ TUR + 6 base-36          │ TUR4FJ8QD               │
//! │ Ticket           │ TK + 8 base-36 + index   │ TK3KD92JQL0             │
//! │ Invoice          │ INV-/HTL-/TUR-/VIS- +    │ INV-MG9ZK0S0            │
//! │                  │ base-36 epoch millis     │                         │
//! └──────────────────┴──────────────────────────┴─────────────────────────┘
//! ```
//!
//! Random characters come from a v4 UUID; invoice numbers are derived from
//! the issue time so callers pass the clock in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;
use uuid::Uuid;

const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Base-36 digits one UUID can supply (36^24 < 2^122).
const DIGITS_PER_UUID: usize = 24;

/// Which booking flow a reference belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    Flight,
    Hotel,
    Tour,
    Visa,
}

impl ProductKind {
    pub const fn booking_prefix(&self) -> &'static str {
        match self {
            ProductKind::Flight => "BK",
            ProductKind::Hotel => "HTL",
            ProductKind::Tour => "TUR",
            ProductKind::Visa => "VIS",
        }
    }

    pub const fn invoice_prefix(&self) -> &'static str {
        match self {
            ProductKind::Flight => "INV-",
            ProductKind::Hotel => "HTL-",
            ProductKind::Tour => "TUR-",
            ProductKind::Visa => "VIS-",
        }
    }
}

impl fmt::Display for ProductKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProductKind::Flight => "flight",
            ProductKind::Hotel => "hotel",
            ProductKind::Tour => "tour",
            ProductKind::Visa => "visa",
        };
        f.write_str(s)
    }
}

/// Renders `value` in uppercase base 36.
pub fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::with_capacity(13);
    while value > 0 {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    digits.into_iter().map(char::from).collect()
}

/// `len` random uppercase base-36 characters.
pub fn random_code(len: usize) -> String {
    let mut out = String::with_capacity(len);
    while out.len() < len {
        let mut bits = Uuid::new_v4().as_u128();
        for _ in 0..DIGITS_PER_UUID.min(len - out.len()) {
            out.push(char::from(BASE36[(bits % 36) as usize]));
            bits /= 36;
        }
    }
    out
}

/// New booking reference, e.g. `BK7QX2MA`.
pub fn booking_reference(kind: ProductKind) -> String {
    format!("{}{}", kind.booking_prefix(), random_code(6))
}

/// One ticket number per passenger index, e.g. `TK3KD92JQL0`.
pub fn ticket_numbers(passengers: usize) -> Vec<String> {
    (0..passengers)
        .map(|i| format!("TK{}{}", random_code(8), i))
        .collect()
}

/// Supplier-style identifier for mock inventory, e.g. `RZ-4KD9QX`.
pub fn supplier_id(prefix: &str) -> String {
    format!("{}-{}", prefix, random_code(6))
}

/// Invoice number stamped from the issue time.
pub fn invoice_number(kind: ProductKind, issued_at: DateTime<Utc>) -> String {
    let millis = issued_at.timestamp_millis().max(0) as u64;
    format!("{}{}", kind.invoice_prefix(), to_base36(millis))
}

/// Short invoice date: `14 Oct 2026`.
pub fn invoice_date(issued_at: DateTime<Utc>) -> String {
    issued_at.format("%d %b %Y").to_string()
}

/// Long invoice date used on visa invoices: `14 October 2026`.
pub fn long_invoice_date(issued_at: DateTime<Utc>) -> String {
    issued_at.format("%d %B %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn is_base36(s: &str) -> bool {
        s.bytes().all(|b| BASE36.contains(&b))
    }

    fn issued() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 14, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_to_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "Z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_295), "ZZ");
    }

    #[test]
    fn test_random_code_shape() {
        for len in [0, 6, 8, 30] {
            let code = random_code(len);
            assert_eq!(code.len(), len);
            assert!(is_base36(&code));
        }
    }

    #[test]
    fn test_booking_reference_prefixes() {
        let flight = booking_reference(ProductKind::Flight);
        assert!(flight.starts_with("BK"));
        assert_eq!(flight.len(), 8);
        assert!(is_base36(&flight[2..]));

        assert!(booking_reference(ProductKind::Hotel).starts_with("HTL"));
        assert_eq!(booking_reference(ProductKind::Tour).len(), 9);
    }

    #[test]
    fn test_ticket_numbers_end_with_index() {
        let tickets = ticket_numbers(3);
        assert_eq!(tickets.len(), 3);
        for (i, ticket) in tickets.iter().enumerate() {
            assert!(ticket.starts_with("TK"));
            assert_eq!(ticket.len(), 11);
            assert!(ticket.ends_with(&i.to_string()));
        }
        assert!(ticket_numbers(0).is_empty());
    }

    #[test]
    fn test_invoice_number_is_time_derived() {
        let at = issued();
        let expected = format!("INV-{}", to_base36(at.timestamp_millis() as u64));
        assert_eq!(invoice_number(ProductKind::Flight, at), expected);
        assert!(invoice_number(ProductKind::Visa, at).starts_with("VIS-"));
        assert_eq!(
            invoice_number(ProductKind::Hotel, at)[4..],
            invoice_number(ProductKind::Tour, at)[4..]
        );
    }

    #[test]
    fn test_invoice_dates() {
        assert_eq!(invoice_date(issued()), "14 Oct 2026");
        assert_eq!(long_invoice_date(issued()), "14 October 2026");
    }

    #[test]
    fn test_supplier_id() {
        let id = supplier_id("RZ");
        assert!(id.starts_with("RZ-"));
        assert_eq!(id.len(), 9);
    }
}
