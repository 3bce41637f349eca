//! Clinic settings (singleton document).

use serde::{Deserialize, Serialize};

/// Clinic identity used on print headers, prescriptions, and slips.
///
/// Stored as a single row; reads fall back to [`ClinicSettings::default`]
/// until the settings form is first saved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClinicSettings {
    pub clinic_name: String,
    pub doctor_name: String,
    pub clinic_address: String,
    pub clinic_contact: String,
    /// Doctor's BM&DC registration number
    pub bm_reg_no: String,
}

impl Default for ClinicSettings {
    fn default() -> Self {
        Self {
            clinic_name: "নিরাময় হোমিও হল".into(),
            doctor_name: String::new(),
            clinic_address: String::new(),
            clinic_contact: String::new(),
            bm_reg_no: String::new(),
        }
    }
}
