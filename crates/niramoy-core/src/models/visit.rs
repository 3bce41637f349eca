//! Visit models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One clinical encounter tied to a patient and a calendar date.
///
/// Visits are created when a patient is seen and never edited afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Visit {
    /// UUID
    pub id: String,
    /// Owning patient id. Enforced at write time; reads still tolerate
    /// dangling ids from rows written by other tools.
    pub patient_id: String,
    /// Business date of the encounter
    pub visit_date: NaiveDate,
    pub symptoms: Option<String>,
    pub diagnosis: Option<String>,
    pub notes: Option<String>,
    /// How medicine reaches the patient, if recorded
    pub delivery: Option<DeliveryMethod>,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}

impl Visit {
    /// Create a new visit for a patient.
    pub fn new(patient_id: String, visit_date: NaiveDate) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_id,
            visit_date,
            symptoms: None,
            diagnosis: None,
            notes: None,
            delivery: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Medicine delivery method for a visit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMethod {
    /// Handed over at the clinic
    Direct,
    /// Sent by courier
    Courier,
}

impl DeliveryMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryMethod::Direct => "direct",
            DeliveryMethod::Courier => "courier",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "direct" => Some(DeliveryMethod::Direct),
            "courier" => Some(DeliveryMethod::Courier),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_visit() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let visit = Visit::new("patient-1".into(), date);
        assert_eq!(visit.patient_id, "patient-1");
        assert_eq!(visit.visit_date, date);
        assert!(visit.delivery.is_none());
        assert_eq!(visit.id.len(), 36);
    }

    #[test]
    fn test_delivery_round_trip() {
        for d in [DeliveryMethod::Direct, DeliveryMethod::Courier] {
            assert_eq!(DeliveryMethod::parse(d.as_str()), Some(d));
        }
        assert_eq!(DeliveryMethod::parse("pigeon"), None);
    }
}
