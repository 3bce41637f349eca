//! Form-level validation, applied before any store call.

use thiserror::Error;

use crate::models::PaymentMethod;

/// Validation errors, surfaced per field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Patient name is required")]
    EmptyName,

    #[error("Not a valid Bangladeshi mobile number: {0}")]
    InvalidPhone(String),

    #[error("Amount cannot be negative")]
    NegativeAmount,

    #[error("A positive amount requires a payment method")]
    MissingPaymentMethod,
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Normalize a Bangladeshi mobile number to its canonical 11-digit form.
///
/// Accepts an optional `+88`/`88` country prefix and tolerates spaces and
/// hyphens. The local part must be 11 digits starting `01`, operator digit
/// 3-9.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();

    let digits = compact.strip_prefix('+').unwrap_or(&compact);
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let local = if digits.len() == 13 {
        digits.strip_prefix("88")?
    } else {
        digits
    };

    if local.len() != 11 || !local.starts_with("01") {
        return None;
    }
    match local.as_bytes()[2] {
        b'3'..=b'9' => Some(local.to_string()),
        _ => None,
    }
}

/// Validate a registration form's required fields; returns the canonical
/// phone on success.
pub fn validate_patient_form(name: &str, phone: &str) -> ValidationResult<String> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    normalize_phone(phone).ok_or_else(|| ValidationError::InvalidPhone(phone.to_string()))
}

/// Validate a payment-slip form.
///
/// The store itself only rejects negative amounts; the positive-amount ⇒
/// payment-method rule lives here, at the form layer.
pub fn validate_slip_form(amount: f64, method: Option<PaymentMethod>) -> ValidationResult<()> {
    if amount < 0.0 {
        return Err(ValidationError::NegativeAmount);
    }
    if amount > 0.0 && method.is_none() {
        return Err(ValidationError::MissingPaymentMethod);
    }
    Ok(())
}
