//! Remedy suggestions for the prescription page.
//!
//! The suggestion panel shows a fixed starter list until a real model sits
//! behind the `model` feature; the doctor always makes the final call.

use serde::{Deserialize, Serialize};

/// One suggested remedy with its usual indication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Suggestion {
    pub remedy: String,
    /// Indication shown next to the remedy, in Bengali
    pub indication: String,
}

/// Canned starter suggestions, independent of the symptom text.
pub fn remedy_suggestions(_symptoms: &str) -> Vec<Suggestion> {
    [
        ("Belladonna", "আকস্মিক জ্বর ও মাথাব্যথা"),
        ("Nux Vomica", "হজমের সমস্যা ও অম্বল"),
        ("Arnica Montana", "আঘাত ও ব্যথা"),
        ("Rhus Tox", "গাঁটে ব্যথা ও শক্ত ভাব"),
        ("Pulsatilla", "সর্দি ও পরিবর্তনশীল উপসর্গ"),
    ]
    .into_iter()
    .map(|(remedy, indication)| Suggestion {
        remedy: remedy.into(),
        indication: indication.into(),
    })
    .collect()
}
