use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use super::field::Field;

/// Validation errors for form fields.
///
/// The `Display` text is the inline message shown under the field.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(Field),
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
    #[error("amount must be a number: {0}")]
    InvalidAmount(String),
    #[error("amount must be at least {minimum}")]
    AmountBelowMinimum { amount: f64, minimum: u64 },
}

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid hardcoded regex"));

/// Fails with [`ValidationError::Required`] when `value` is blank.
pub fn validate_required(field: Field, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Required(field))
    } else {
        Ok(())
    }
}

/// Validates an email address of the shape `local@domain.tld`.
///
/// Surrounding whitespace is ignored; a blank address is `Required`.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    validate_required(Field::Email, email)?;
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail(email.to_string()))
    }
}

/// Validates a requested amount: a finite number no smaller than `minimum`.
pub fn validate_amount(raw: &str, minimum: u64) -> Result<f64, ValidationError> {
    let raw = raw.trim();
    validate_required(Field::RequestedAmount, raw)?;
    let amount: f64 = raw
        .parse()
        .ok()
        .filter(|a: &f64| a.is_finite())
        .ok_or_else(|| ValidationError::InvalidAmount(raw.to_string()))?;
    if amount < minimum as f64 {
        return Err(ValidationError::AmountBelowMinimum { amount, minimum });
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use quickcheck_macros::quickcheck;

    use super::*;

    // --- validate_required ---

    #[test]
    fn required_accepts_text() {
        assert_eq!(validate_required(Field::Name, "Ada"), Ok(()));
    }

    #[test]
    fn required_rejects_empty_and_blank() {
        assert_eq!(
            validate_required(Field::Name, ""),
            Err(ValidationError::Required(Field::Name))
        );
        assert_eq!(
            validate_required(Field::FieldOfStudy, "   "),
            Err(ValidationError::Required(Field::FieldOfStudy))
        );
    }

    #[test]
    fn required_message_names_field() {
        assert_eq!(
            ValidationError::Required(Field::Name).to_string(),
            "Full Name is required"
        );
    }

    // --- validate_email ---

    #[test]
    fn email_simple() {
        assert_eq!(validate_email("foo@bar.com"), Ok(()));
    }

    #[test]
    fn email_with_subdomain_and_plus() {
        assert_eq!(validate_email("ada+medici@mail.example.org"), Ok(()));
    }

    #[test]
    fn email_surrounding_whitespace_ignored() {
        assert_eq!(validate_email("  foo@bar.com "), Ok(()));
    }

    #[test]
    fn email_empty_is_required() {
        assert_eq!(
            validate_email(""),
            Err(ValidationError::Required(Field::Email))
        );
    }

    #[test]
    fn email_malformed_shapes() {
        for bad in ["foo", "foo@", "foo@bar", "@bar.com", "foo@bar.", "fo o@bar.com"] {
            assert_eq!(
                validate_email(bad),
                Err(ValidationError::InvalidEmail(bad.to_string())),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn email_two_at_signs() {
        assert!(validate_email("foo@bar@baz.com").is_err());
    }

    #[quickcheck]
    fn email_alnum_parts_always_accepted(local: String, domain: String, tld: String) -> bool {
        let clean = |s: String| -> String {
            let s: String = s.chars().filter(char::is_ascii_alphanumeric).collect();
            if s.is_empty() { "x".to_string() } else { s }
        };
        let email = format!("{}@{}.{}", clean(local), clean(domain), clean(tld));
        validate_email(&email).is_ok()
    }

    #[quickcheck]
    fn email_without_at_always_rejected(s: String) -> bool {
        let s: String = s.chars().filter(|&c| c != '@').collect();
        validate_email(&s).is_err()
    }

    // --- validate_amount ---

    #[test]
    fn amount_at_minimum() {
        assert_eq!(validate_amount("1000", 1000), Ok(1000.0));
    }

    #[test]
    fn amount_fractional_above_minimum() {
        assert_eq!(validate_amount(" 2500.50 ", 1000), Ok(2500.5));
    }

    #[test]
    fn amount_below_minimum() {
        assert_eq!(
            validate_amount("999.99", 1000),
            Err(ValidationError::AmountBelowMinimum {
                amount: 999.99,
                minimum: 1000
            })
        );
    }

    #[test]
    fn amount_empty_is_required() {
        assert_eq!(
            validate_amount("", 1000),
            Err(ValidationError::Required(Field::RequestedAmount))
        );
    }

    #[test]
    fn amount_not_a_number() {
        assert_eq!(
            validate_amount("five thousand", 1000),
            Err(ValidationError::InvalidAmount("five thousand".to_string()))
        );
    }

    #[test]
    fn amount_non_finite_rejected() {
        assert!(matches!(
            validate_amount("inf", 1000),
            Err(ValidationError::InvalidAmount(_))
        ));
        assert!(matches!(
            validate_amount("NaN", 1000),
            Err(ValidationError::InvalidAmount(_))
        ));
    }

    #[quickcheck]
    fn amount_integer_accepted_iff_at_least_minimum(amount: u32, minimum: u16) -> bool {
        let result = validate_amount(&amount.to_string(), u64::from(minimum));
        result.is_ok() == (u64::from(amount) >= u64::from(minimum))
    }
}
