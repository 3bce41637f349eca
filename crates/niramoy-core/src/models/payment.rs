//! Payment slip models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A payment receipt record, optionally tied to a visit.
///
/// Slips are created when payment is recorded and never edited.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentSlip {
    /// UUID
    pub id: String,
    /// Owning patient id
    pub patient_id: String,
    /// Visit the payment belongs to, if any
    pub visit_id: Option<String>,
    /// Printed slip number
    pub slip_number: String,
    /// Business date of the payment
    pub date: NaiveDate,
    /// Amount in BDT; non-negative
    pub amount: f64,
    /// Free text, e.g. "ভিজিট ফি"
    pub purpose: String,
    /// None for zero-amount slips; a positive amount requires a method
    pub payment_method: Option<PaymentMethod>,
    pub received_by: Option<String>,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}

impl PaymentSlip {
    /// Create a new payment slip.
    pub fn new(
        patient_id: String,
        slip_number: String,
        date: NaiveDate,
        amount: f64,
        purpose: String,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_id,
            visit_id: None,
            slip_number,
            date,
            amount,
            purpose,
            payment_method: None,
            received_by: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// How a payment was made.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Bkash,
    Nagad,
    Rocket,
    Other,
    /// Legacy value still present in old rows; no longer offered at issuance
    CourierMedicine,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Bkash => "bkash",
            PaymentMethod::Nagad => "nagad",
            PaymentMethod::Rocket => "rocket",
            PaymentMethod::Other => "other",
            PaymentMethod::CourierMedicine => "courier_medicine",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cash" => Some(PaymentMethod::Cash),
            "bkash" => Some(PaymentMethod::Bkash),
            "nagad" => Some(PaymentMethod::Nagad),
            "rocket" => Some(PaymentMethod::Rocket),
            "other" => Some(PaymentMethod::Other),
            "courier_medicine" => Some(PaymentMethod::CourierMedicine),
            _ => None,
        }
    }

    /// Bengali display label for slips and reports.
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "নগদ টাকা",
            PaymentMethod::Bkash => "বিকাশ",
            PaymentMethod::Nagad => "নগদ",
            PaymentMethod::Rocket => "রকেট",
            PaymentMethod::Other => "অন্যান্য",
            PaymentMethod::CourierMedicine => "কুরিয়ার ঔষধ",
        }
    }
}
