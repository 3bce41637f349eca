//! Patient search: exact phone, name prefix, then fuzzy ranking.

use std::cmp::Ordering;

use strsim::jaro_winkler;

use crate::db::{Database, DbResult};
use crate::models::Patient;
use crate::validate::normalize_phone;

/// Minimum similarity for a fuzzy match to be offered.
const MIN_SIMILARITY: f64 = 0.70;

/// Search patients by phone or name.
///
/// A query that normalizes to a valid mobile number is looked up exactly.
/// Otherwise prefix matches come first, topped up with Jaro-Winkler-ranked
/// fuzzy matches so a misspelled name still finds its patient.
pub fn search_patients(db: &Database, query: &str, limit: usize) -> DbResult<Vec<Patient>> {
    let query = query.trim();
    if query.is_empty() || limit == 0 {
        return Ok(Vec::new());
    }

    if let Some(phone) = normalize_phone(query) {
        if let Some(patient) = db.get_patient_by_phone(&phone)? {
            return Ok(vec![patient]);
        }
        return Ok(Vec::new());
    }

    let mut results = db.search_patients_by_name(query, limit)?;
    if results.len() < limit {
        let mut scored: Vec<(f64, Patient)> = db
            .list_patients()?
            .into_iter()
            .filter(|p| results.iter().all(|r| r.id != p.id))
            .map(|p| (jaro_winkler(&p.name, query), p))
            .filter(|(score, _)| *score >= MIN_SIMILARITY)
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
        results.extend(
            scored
                .into_iter()
                .map(|(_, p)| p)
                .take(limit - results.len()),
        );
    }

    Ok(results)
}
