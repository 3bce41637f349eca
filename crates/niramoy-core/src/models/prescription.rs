//! Prescription models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A prescription authored for one visit.
///
/// At most one current prescription is kept per visit: the first save
/// creates it, later saves for the same visit replace its content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prescription {
    /// UUID
    pub id: String,
    /// Owning patient id
    pub patient_id: String,
    /// Visit this prescription belongs to
    pub visit_id: String,
    pub prescription_type: PrescriptionType,
    /// Ordered medicine lines
    pub items: Vec<PrescriptionItem>,
    /// Days until the recommended follow-up
    pub follow_up_days: Option<u32>,
    pub advice: Option<String>,
    pub diagnosis: Option<String>,
    pub doctor_name: String,
    /// Free-text serial printed on the sheet
    pub serial_number: Option<String>,
    /// Business date of the prescription
    pub date: NaiveDate,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}

impl Prescription {
    /// Create a new prescription for a visit, dated today.
    pub fn new(
        patient_id: String,
        visit_id: String,
        prescription_type: PrescriptionType,
        doctor_name: String,
    ) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_id,
            visit_id,
            prescription_type,
            items: Vec::new(),
            follow_up_days: None,
            advice: None,
            diagnosis: None,
            doctor_name,
            serial_number: None,
            date: now.date_naive(),
            created_at: now.to_rfc3339(),
        }
    }
}

/// One medicine line on a prescription.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrescriptionItem {
    pub medicine_name: String,
    /// Potency/dose, e.g. "৩০ শক্তি"
    pub dosage: String,
    /// e.g. "দিনে ৩ বার"
    pub frequency: String,
    /// e.g. "৭ দিন"
    pub duration: String,
    pub notes: Option<String>,
}

/// Adult or child dosing format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PrescriptionType {
    Adult,
    Child,
}

impl PrescriptionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrescriptionType::Adult => "adult",
            PrescriptionType::Child => "child",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "adult" => Some(PrescriptionType::Adult),
            "child" => Some(PrescriptionType::Child),
            _ => None,
        }
    }
}
