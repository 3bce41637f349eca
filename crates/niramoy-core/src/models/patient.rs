//! Patient models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A registered clinic patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// UUID, generated at registration
    pub id: String,
    /// Clinic-assigned diary label; display only, not guaranteed unique
    pub diary_number: Option<String>,
    /// Patient name
    pub name: String,
    /// Primary external identifier; Bangladeshi mobile format
    pub phone: String,
    /// Age in years
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub occupation: Option<String>,
    /// Guardian name and relation (e.g. father, spouse)
    pub guardian_name: Option<String>,
    pub guardian_relation: Option<String>,
    pub district: Option<String>,
    /// Thana / upazila
    pub thana: Option<String>,
    /// Village / union
    pub village: Option<String>,
    /// Business registration date, distinct from the row timestamp
    pub registration_date: NaiveDate,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
    /// Last update timestamp (RFC 3339)
    pub updated_at: String,
}

impl Patient {
    /// Create a new patient with required fields, registered today.
    pub fn new(name: String, phone: String) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            diary_number: None,
            name,
            phone,
            age: None,
            gender: None,
            occupation: None,
            guardian_name: None,
            guardian_relation: None,
            district: None,
            thana: None,
            village: None,
            registration_date: now.date_naive(),
            created_at: now.to_rfc3339(),
            updated_at: now.to_rfc3339(),
        }
    }

    /// Touch the updated_at timestamp.
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}

/// Patient gender.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            "other" => Some(Gender::Other),
            _ => None,
        }
    }
}
