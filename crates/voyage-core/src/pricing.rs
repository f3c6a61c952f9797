//! # Pricing Module
//!
//! Pure price derivation for every booking flow.
//!
//! ## Derivation Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Price Derivation                                   │
//! │                                                                         │
//! │  Flight (USD):                                                          │
//! │    base     = unit × passengers                                         │
//! │    tax      = round(base × 7.5%)                                        │
//! │    discount = round(base × b2b rate)                                    │
//! │    total    = base + tax − discount                                     │
//! │                                                                         │
//! │  Hotel (USD → NGN):                                                     │
//! │    base_ngn = round(room.total × rooms × ngn_rate)                      │
//! │    total    = base_ngn + round(base_ngn × tax)                          │
//! │                                                                         │
//! │  Tour (USD → NGN):                                                      │
//! │    subtotal = round(Σ price_pax × count_pax × ngn_rate)                 │
//! │    total    = subtotal + round(subtotal × tax)                          │
//! │                                                                         │
//! │  Visa (NGN):                                                            │
//! │    subtotal = price × applicants                                        │
//! │    total    = subtotal + round(subtotal × 5%) + round(subtotal × 7.5%)  │
//! │                                                                         │
//! │  round() = half-up to whole major units                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Breakdowns are never stored. Stores call these functions on every read so
//! a total can never drift from its inputs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{Currency, ExchangeRate, Money};
use crate::types::{Rate, TourPackage};

// =============================================================================
// Flight
// =============================================================================

/// Base / tax / discount / total for a unit-priced booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub base: Money,
    pub tax: Money,
    pub discount: Money,
    pub total: Money,
}

/// Derives the price of `count` units at `unit_price`.
///
/// ## Example
/// ```rust
/// use voyage_core::money::Money;
/// use voyage_core::pricing::derive_price;
/// use voyage_core::types::Rate;
///
/// let p = derive_price(Money::from_major(100), 2, Rate::from_bps(750), Rate::zero());
/// assert_eq!(p.base, Money::from_major(200));
/// assert_eq!(p.tax, Money::from_major(15));
/// assert_eq!(p.total, Money::from_major(215));
/// ```
pub fn derive_price(unit_price: Money, count: u32, tax_rate: Rate, discount_rate: Rate) -> PriceBreakdown {
    let base = unit_price * count;
    let tax = base.percentage_whole(tax_rate);
    let discount = base.percentage_whole(discount_rate);

    PriceBreakdown {
        base,
        tax,
        discount,
        total: base + tax - discount,
    }
}

/// Converts a USD amount to naira and formats it (`₦354,750`).
pub fn format_ngn(amount: Money, rate: &ExchangeRate) -> String {
    rate.convert(amount).format_whole(Currency::Ngn)
}

// =============================================================================
// Hotel
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct HotelPriceBreakdown {
    pub base_usd: Money,
    pub base_ngn: Money,
    pub tax: Money,
    pub total: Money,
}

/// Derives the naira price of a stay. No room selected prices as zero.
pub fn hotel_price(
    room_total: Option<Money>,
    total_rooms: u32,
    rate: &ExchangeRate,
    tax_rate: Rate,
) -> HotelPriceBreakdown {
    let base_usd = room_total.unwrap_or_default() * total_rooms;
    let base_ngn = rate.convert(base_usd).round_to_major();
    let tax = base_ngn.percentage_whole(tax_rate);

    HotelPriceBreakdown {
        base_usd,
        base_ngn,
        tax,
        total: base_ngn + tax,
    }
}

/// Length of stay in nights.
///
/// Dates are whole days so the ceiling of the difference is the difference
/// itself. Missing dates, same-day or inverted ranges count as one night.
pub fn nights(check_in: Option<NaiveDate>, check_out: Option<NaiveDate>) -> u32 {
    match (check_in, check_out) {
        (Some(start), Some(end)) => {
            let days = (end - start).num_days();
            if days > 0 {
                days as u32
            } else {
                1
            }
        }
        _ => 1,
    }
}

// =============================================================================
// Tour
// =============================================================================

/// Head counts per passenger type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaxCounts {
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
}

impl PaxCounts {
    pub const fn new(adults: u32, children: u32, infants: u32) -> Self {
        PaxCounts {
            adults,
            children,
            infants,
        }
    }

    pub const fn total(&self) -> u32 {
        self.adults + self.children + self.infants
    }
}

impl Default for PaxCounts {
    fn default() -> Self {
        PaxCounts::new(1, 0, 0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TourPriceBreakdown {
    pub adult_total: Money,
    pub child_total: Money,
    pub infant_total: Money,
    pub subtotal_usd: Money,
    pub subtotal_ngn: Money,
    pub tax: Money,
    pub total: Money,
}

/// Derives the naira price of a tour package. No package prices as zero.
pub fn tour_price(
    package: Option<&TourPackage>,
    counts: PaxCounts,
    rate: &ExchangeRate,
    tax_rate: Rate,
) -> TourPriceBreakdown {
    let Some(pkg) = package else {
        return TourPriceBreakdown::default();
    };

    let adult_usd = pkg.price_adult * counts.adults;
    let child_usd = pkg.price_child * counts.children;
    let infant_usd = pkg.price_infant * counts.infants;

    let adult_ngn = rate.convert(adult_usd);
    let child_ngn = rate.convert(child_usd);
    let infant_ngn = rate.convert(infant_usd);

    // Rounded once over the sum, not per line.
    let subtotal_ngn = (adult_ngn + child_ngn + infant_ngn).round_to_major();
    let tax = subtotal_ngn.percentage_whole(tax_rate);

    TourPriceBreakdown {
        adult_total: adult_ngn.round_to_major(),
        child_total: child_ngn.round_to_major(),
        infant_total: infant_ngn.round_to_major(),
        subtotal_usd: adult_usd + child_usd + infant_usd,
        subtotal_ngn,
        tax,
        total: subtotal_ngn + tax,
    }
}

// =============================================================================
// Visa
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct VisaPricing {
    pub per_person: Money,
    pub applicants: u32,
    pub subtotal: Money,
    pub service_fee: Money,
    pub tax: Money,
    pub total: Money,
}

/// Derives the naira price of a visa application.
pub fn visa_price(per_person: Money, applicants: u32, service_fee_rate: Rate, tax_rate: Rate) -> VisaPricing {
    let subtotal = per_person * applicants;
    let service_fee = subtotal.percentage_whole(service_fee_rate);
    let tax = subtotal.percentage_whole(tax_rate);

    VisaPricing {
        per_person,
        applicants,
        subtotal,
        service_fee,
        tax,
        total: subtotal + service_fee + tax,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
