//! # Validation Module
//!
//! Field-level validation used by the form validators and the stores.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: THIS MODULE                                                   │
//! │  ├── One rule per function (required, email shape, counts, dates)      │
//! │  └── Typed ValidationError                                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: forms.rs                                                      │
//! │  ├── Runs the rules for a whole form                                    │
//! │  └── Collects user-facing messages per field (FieldErrors)              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: voyage-booking stores                                         │
//! │  └── Reject out-of-range counts before re-seeding                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use voyage_core::validation::{validate_email, validate_passenger_count};
//!
//! validate_email("ada@example.com").unwrap();
//! assert!(validate_passenger_count(10).is_err());
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::{MAX_ROOMS, MAX_TRAVELLERS, MIN_PASSWORD_LENGTH};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Fails when `value` is empty after trimming.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Loose email shape check: something, `@`, something, `.`, something.
///
/// Matches anywhere in the string (no anchoring), so `"x ada@b.co y"` is
/// accepted. Whitespace may not appear inside the matched part.
pub fn is_email_shaped(value: &str) -> bool {
    let chars: Vec<char> = value.chars().collect();

    chars.iter().enumerate().any(|(at, &c)| {
        if c != '@' || at == 0 || chars[at - 1].is_whitespace() {
            return false;
        }
        // Domain part: the run of non-whitespace after '@'.
        let domain: Vec<char> = chars[at + 1..]
            .iter()
            .copied()
            .take_while(|c| !c.is_whitespace())
            .collect();
        domain
            .iter()
            .enumerate()
            .any(|(i, &d)| d == '.' && i >= 1 && i + 1 < domain.len())
    })
}

/// Validates an email address.
///
/// ## Rules
/// - Must not be empty
/// - Must contain `x@y.z` with no whitespace inside
///
/// ## Example
/// ```rust
/// use voyage_core::validation::validate_email;
///
/// assert!(validate_email("ada@example.com").is_ok());
/// assert!(validate_email("ada@example").is_err());
/// assert!(validate_email("").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    validate_required("email", email)?;

    if !is_email_shaped(email) {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "expected name@domain.tld".to_string(),
        });
    }
    Ok(())
}

/// Passwords need at least six characters.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

// =============================================================================
// Count Validators
// =============================================================================

fn validate_range(field: &str, value: u32, min: u32, max: u32) -> ValidationResult<()> {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: min as i64,
            max: max as i64,
        });
    }
    Ok(())
}

/// Flight passengers: 1 to 9.
pub fn validate_passenger_count(count: u32) -> ValidationResult<()> {
    validate_range("passengers", count, 1, MAX_TRAVELLERS)
}

/// Hotel rooms: 1 to 9.
pub fn validate_room_count(count: u32) -> ValidationResult<()> {
    validate_range("rooms", count, 1, MAX_ROOMS)
}

/// Tour party: at least one adult, at most nine people in total.
pub fn validate_tour_counts(adults: u32, children: u32, infants: u32) -> ValidationResult<()> {
    validate_range("adults", adults, 1, MAX_TRAVELLERS)?;
    validate_range("participants", adults + children + infants, 1, MAX_TRAVELLERS)
}

// =============================================================================
// Date Validators
// =============================================================================

/// Fails when `date` is earlier than `earliest`.
pub fn validate_not_before(field: &str, date: NaiveDate, earliest: NaiveDate) -> ValidationResult<()> {
    if date < earliest {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("must not be before {}", earliest),
        });
    }
    Ok(())
}

/// Parses an ISO `YYYY-MM-DD` date as the forms submit it.
pub fn parse_form_date(field: &str, value: &str) -> ValidationResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "expected YYYY-MM-DD".to_string(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required() {
        assert!(validate_required("name", "Ada").is_ok());
        assert_eq!(
            validate_required("name", "   "),
            Err(ValidationError::Required {
                field: "name".to_string()
            })
        );
    }

    #[test]
    fn test_email_shape() {
        assert!(is_email_shaped("ada@example.com"));
        assert!(is_email_shaped("a@b.c"));
        assert!(is_email_shaped("first.last@mail.example.ng"));
        // Unanchored: surrounding text is tolerated.
        assert!(is_email_shaped("contact: ada@example.com please"));

        assert!(!is_email_shaped("ada@example"));
        assert!(!is_email_shaped("@example.com"));
        assert!(!is_email_shaped("ada@.com"));
        assert!(!is_email_shaped("ada@example."));
        assert!(!is_email_shaped("ada @example.com"));
        assert!(!is_email_shaped("ada@exa mple.com"));
        assert!(!is_email_shaped(""));
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ada@example.com").is_ok());
        assert!(matches!(validate_email(""), Err(ValidationError::Required { .. })));
        assert!(matches!(
            validate_email("not-an-email"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret").is_ok());
        assert!(validate_password("12345").is_err());
    }

    #[test]
    fn test_count_limits() {
        assert!(validate_passenger_count(1).is_ok());
        assert!(validate_passenger_count(9).is_ok());
        assert!(validate_passenger_count(0).is_err());
        assert!(validate_passenger_count(10).is_err());

        assert!(validate_room_count(9).is_ok());
        assert!(validate_room_count(0).is_err());
    }

    #[test]
    fn test_tour_counts() {
        assert!(validate_tour_counts(1, 0, 0).is_ok());
        assert!(validate_tour_counts(2, 4, 3).is_ok());
        assert!(validate_tour_counts(0, 2, 0).is_err());
        assert!(validate_tour_counts(5, 4, 1).is_err());
    }

    #[test]
    fn test_dates() {
        let today = parse_form_date("date", "2026-10-14").unwrap();
        let tomorrow = parse_form_date("date", "2026-10-15").unwrap();

        assert!(validate_not_before("travel date", today, today).is_ok());
        assert!(validate_not_before("travel date", tomorrow, today).is_ok());
        assert!(validate_not_before("travel date", today, tomorrow).is_err());
        assert!(parse_form_date("date", "14/10/2026").is_err());
    }
}
