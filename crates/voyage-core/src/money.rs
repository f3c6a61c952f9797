//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely, plus the
//! currency and exchange-rate types used to display supplier prices in naira.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Supplier prices arrive as decimal strings ("245.50" USD) and are       │
//! │  multiplied by a naira rate (1650) and a VAT rate (7.5%).               │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    245.5 × 1650 × 0.075 = 30380.624999999996  ❌ rounds the wrong way   │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units (cents, kobo)                        │
//! │    24550 × 1650 = 40507500 kobo, tax computed in i128, rounded once     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use voyage_core::money::{Currency, ExchangeRate, Money};
//!
//! let fare = Money::parse_decimal("245.50").unwrap();
//! assert_eq!(fare.minor(), 24550);
//!
//! let usd_to_ngn = ExchangeRate::from_whole(Currency::Usd, Currency::Ngn, 1650);
//! let naira = usd_to_ngn.convert(fare);
//! assert_eq!(naira.format_whole(Currency::Ngn), "₦405,075");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::Rate;

/// Minor units per major unit. Every currency we price in has two decimals.
pub const MINOR_PER_MAJOR: i64 = 100;

/// Fixed-point scale of [`ExchangeRate`] (four decimal places).
pub const RATE_SCALE: i64 = 10_000;

/// Integer division rounding half away from zero.
pub(crate) fn div_round_half_up(numerator: i128, denominator: i128) -> i128 {
    let half = denominator / 2;
    if numerator >= 0 {
        (numerator + half) / denominator
    } else {
        (numerator - half) / denominator
    }
}

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents, kobo).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for discounts and refunds
/// - **No currency tag**: the owning record says which currency it is in,
///   the same way supplier payloads do
///
/// ## Where Money is Used
/// ```text
/// FlightOffer.price.total ──► unit price ──► PriceBreakdown.base
///                                                 │
///                          tax / discount ◄───────┤
///                                                 ▼
///                                    total ──► "₦354,750" in the UI
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units (cents, kobo).
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Creates a Money value from whole major units.
    ///
    /// ## Example
    /// ```rust
    /// use voyage_core::money::Money;
    ///
    /// let visa_fee = Money::from_major(120_000); // ₦120,000
    /// assert_eq!(visa_fee.minor(), 12_000_000);
    /// ```
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major * MINOR_PER_MAJOR)
    }

    /// Parses a supplier decimal string such as `"245.50"` or `"80"`.
    ///
    /// ## Rules
    /// - Optional leading `-`
    /// - At most two fractional digits
    /// - No grouping separators or currency symbols
    pub fn parse_decimal(value: &str) -> CoreResult<Money> {
        let invalid = |reason: &str| CoreError::InvalidPrice {
            value: value.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = value.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let (whole, frac) = match digits.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (digits, ""),
        };

        if whole.is_empty() && frac.is_empty() {
            return Err(invalid("empty amount"));
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("not a decimal number"));
        }
        if frac.len() > 2 {
            return Err(invalid("more than two decimal places"));
        }

        let whole_units: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("amount too large"))?
        };
        let frac_units: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid("not a decimal number"))? * 10,
            _ => frac.parse().map_err(|_| invalid("not a decimal number"))?,
        };

        let minor = whole_units
            .checked_mul(MINOR_PER_MAJOR)
            .and_then(|m| m.checked_add(frac_units))
            .ok_or_else(|| invalid("amount too large"))?;

        Ok(Money(if negative { -minor } else { minor }))
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the whole major-unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / MINOR_PER_MAJOR
    }

    /// Returns the minor-unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % MINOR_PER_MAJOR).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity (passengers, rooms, applicants).
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Applies a rate and rounds half-up to the nearest minor unit.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`, carried out in i128
    /// so large naira totals never overflow.
    pub fn percentage(&self, rate: Rate) -> Money {
        let value = div_round_half_up(self.0 as i128 * rate.bps() as i128, 10_000);
        Money(value as i64)
    }

    /// Applies a rate and rounds half-up to a whole major unit.
    ///
    /// This is the rounding booking totals use: VAT on a ₦405,075 fare is
    /// ₦30,381, never ₦30,380.63.
    ///
    /// ## Example
    /// ```rust
    /// use voyage_core::money::Money;
    /// use voyage_core::types::Rate;
    ///
    /// let base = Money::from_major(200);
    /// let vat = base.percentage_whole(Rate::from_bps(750));
    /// assert_eq!(vat, Money::from_major(15));
    /// ```
    pub fn percentage_whole(&self, rate: Rate) -> Money {
        let denominator = 10_000_i128 * MINOR_PER_MAJOR as i128;
        let whole = div_round_half_up(self.0 as i128 * rate.bps() as i128, denominator);
        Money(whole as i64 * MINOR_PER_MAJOR)
    }

    /// Rounds half-up to a whole major unit.
    pub fn round_to_major(&self) -> Money {
        let whole = div_round_half_up(self.0 as i128, MINOR_PER_MAJOR as i128);
        Money(whole as i64 * MINOR_PER_MAJOR)
    }

    /// Formats rounded to whole major units with thousands grouping.
    ///
    /// ## Example
    /// ```rust
    /// use voyage_core::money::{Currency, Money};
    ///
    /// assert_eq!(Money::from_minor(27_000_049).format_whole(Currency::Ngn), "₦270,000");
    /// ```
    pub fn format_whole(&self, currency: Currency) -> String {
        let rounded = self.round_to_major();
        let sign = if rounded.is_negative() { "-" } else { "" };
        format!(
            "{}{}{}",
            sign,
            currency.symbol(),
            group_thousands(rounded.major().unsigned_abs())
        )
    }

    /// Formats with grouping, showing decimals only when there is a
    /// fractional part (`$1,234.50`, `₦270,000`).
    pub fn format(&self, currency: Currency) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        let whole = group_thousands(self.major().unsigned_abs());
        if self.minor_part() == 0 {
            format!("{}{}{}", sign, currency.symbol(), whole)
        } else {
            format!("{}{}{}.{:02}", sign, currency.symbol(), whole, self.minor_part())
        }
    }
}

/// Inserts `,` between every group of three digits.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

// =============================================================================
// Currency
// =============================================================================

/// Currencies the booking flows price in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Supplier currency for flights, hotels and tours.
    #[default]
    Usd,
    /// Display and settlement currency.
    Ngn,
    Eur,
    Gbp,
    Aed,
}

impl Currency {
    /// ISO 4217 code.
    pub const fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Ngn => "NGN",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Aed => "AED",
        }
    }

    /// Display symbol used as a prefix.
    pub const fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Ngn => "₦",
            Currency::Eur => "€",
            Currency::Gbp => "£",
            Currency::Aed => "AED ",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "NGN" => Ok(Currency::Ngn),
            "EUR" => Ok(Currency::Eur),
            "GBP" => Ok(Currency::Gbp),
            "AED" => Ok(Currency::Aed),
            other => Err(CoreError::UnknownCurrency(other.to_string())),
        }
    }
}

// =============================================================================
// Exchange Rate
// =============================================================================

/// A fixed conversion rate: units of `to` per one unit of `from`.
///
/// Stored as a fixed-point integer with [`RATE_SCALE`] so conversions stay
/// in integer arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    pub from: Currency,
    pub to: Currency,
    scaled: i64,
}

impl ExchangeRate {
    /// Creates a rate from a whole number (1650 naira per dollar).
    pub const fn from_whole(from: Currency, to: Currency, rate: u32) -> Self {
        ExchangeRate {
            from,
            to,
            scaled: rate as i64 * RATE_SCALE,
        }
    }

    /// Creates a rate from a decimal value, rounded to four places.
    pub fn from_decimal(from: Currency, to: Currency, rate: f64) -> CoreResult<Self> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(ValidationError::MustBePositive {
                field: "exchange rate".to_string(),
            }
            .into());
        }
        Ok(ExchangeRate {
            from,
            to,
            scaled: (rate * RATE_SCALE as f64).round() as i64,
        })
    }

    /// Identity rate (no conversion).
    pub const fn identity(currency: Currency) -> Self {
        ExchangeRate {
            from: currency,
            to: currency,
            scaled: RATE_SCALE,
        }
    }

    /// Returns the rate as a decimal (for display only).
    pub fn rate(&self) -> f64 {
        self.scaled as f64 / RATE_SCALE as f64
    }

    /// Converts an amount in `from` to `to`, rounded to the minor unit.
    pub fn convert(&self, amount: Money) -> Money {
        let converted = div_round_half_up(amount.0 as i128 * self.scaled as i128, RATE_SCALE as i128);
        Money(converted as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal rendering (`245.50`). Use [`Money::format`] for display.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        Money(self.0 * qty as i64)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal() {
        assert_eq!(Money::parse_decimal("245.50").unwrap().minor(), 24550);
        assert_eq!(Money::parse_decimal("245.5").unwrap().minor(), 24550);
        assert_eq!(Money::parse_decimal("80").unwrap().minor(), 8000);
        assert_eq!(Money::parse_decimal(" 0.07 ").unwrap().minor(), 7);
        assert_eq!(Money::parse_decimal("-5.25").unwrap().minor(), -525);
    }

    #[test]
    fn test_parse_decimal_rejects_garbage() {
        assert!(Money::parse_decimal("").is_err());
        assert!(Money::parse_decimal(".").is_err());
        assert!(Money::parse_decimal("1,200.00").is_err());
        assert!(Money::parse_decimal("12.345").is_err());
        assert!(Money::parse_decimal("$12").is_err());
        assert!(Money::parse_decimal("99999999999999999999").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_minor(1099).to_string(), "10.99");
        assert_eq!(Money::from_minor(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_major(10);
        let b = Money::from_minor(550);

        assert_eq!((a + b).minor(), 1550);
        assert_eq!((a - b).minor(), 450);
        assert_eq!((a * 3u32).minor(), 3000);
        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.minor(), 2100);
    }

    #[test]
    fn test_percentage_rounds_half_up() {
        // $10.00 at 8.25% = $0.825 → $0.83
        let amount = Money::from_major(10);
        assert_eq!(amount.percentage(Rate::from_bps(825)).minor(), 83);
    }

    #[test]
    fn test_percentage_whole() {
        // 491.00 × 7.5% = 36.825 → 37
        let base = Money::from_minor(49_100);
        assert_eq!(base.percentage_whole(Rate::from_bps(750)), Money::from_major(37));

        // 30.00 × 5% = 1.50 → 2 (half rounds up)
        let base = Money::from_major(30);
        assert_eq!(base.percentage_whole(Rate::from_bps(500)), Money::from_major(2));

        // 29.00 × 5% = 1.45 → 1
        let base = Money::from_major(29);
        assert_eq!(base.percentage_whole(Rate::from_bps(500)), Money::from_major(1));
    }

    #[test]
    fn test_round_to_major() {
        assert_eq!(Money::from_minor(1049).round_to_major(), Money::from_major(10));
        assert_eq!(Money::from_minor(1050).round_to_major(), Money::from_major(11));
        assert_eq!(Money::from_minor(-1050).round_to_major(), Money::from_major(-11));
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(270_000), "270,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn test_format() {
        assert_eq!(Money::from_major(270_000).format(Currency::Ngn), "₦270,000");
        assert_eq!(Money::from_minor(123_450).format(Currency::Usd), "$1,234.50");
        assert_eq!(Money::from_minor(-550).format(Currency::Usd), "-$5.50");
        assert_eq!(Money::from_minor(123_450).format_whole(Currency::Usd), "$1,235");
    }

    #[test]
    fn test_exchange_rate_conversion() {
        let rate = ExchangeRate::from_whole(Currency::Usd, Currency::Ngn, 1650);
        assert_eq!(rate.convert(Money::from_major(215)), Money::from_major(354_750));
        assert_eq!(rate.convert(Money::from_minor(24550)).minor(), 40_507_500);
        assert!((rate.rate() - 1650.0).abs() < f64::EPSILON);

        let fractional = ExchangeRate::from_decimal(Currency::Usd, Currency::Ngn, 1650.25).unwrap();
        assert_eq!(fractional.convert(Money::from_major(2)), Money::from_minor(330_050));

        let same = ExchangeRate::identity(Currency::Ngn);
        assert_eq!(same.convert(Money::from_minor(777)), Money::from_minor(777));
    }

    #[test]
    fn test_exchange_rate_must_be_positive() {
        assert!(ExchangeRate::from_decimal(Currency::Usd, Currency::Ngn, 0.0).is_err());
        assert!(ExchangeRate::from_decimal(Currency::Usd, Currency::Ngn, -3.0).is_err());
        assert!(ExchangeRate::from_decimal(Currency::Usd, Currency::Ngn, f64::NAN).is_err());
    }

    #[test]
    fn test_currency_parsing() {
        assert_eq!("usd".parse::<Currency>().unwrap(), Currency::Usd);
        assert_eq!("NGN".parse::<Currency>().unwrap(), Currency::Ngn);
        assert!(matches!(
            "XYZ".parse::<Currency>(),
            Err(CoreError::UnknownCurrency(code)) if code == "XYZ"
        ));
        assert_eq!(Currency::Ngn.to_string(), "NGN");
    }
}
