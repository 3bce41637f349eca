//! Dashboard statistics over today's and this month's activity.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::PatientRef;
use crate::models::{Patient, PaymentSlip, Visit};

/// Headline numbers for the dashboard cards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClinicStats {
    /// All registered patients, ever
    pub total_patients: usize,
    /// Distinct patients with a visit today
    pub daily_active_patients: usize,
    /// Distinct patients with a visit this month
    pub monthly_patient_count: usize,
    /// Sum of today's slip amounts (by slip date, regardless of visit linkage)
    pub today_revenue: f64,
    /// Sum of this month's slip amounts
    pub monthly_income: f64,
    /// Patients registered today who did NOT also visit today
    pub daily_other_registered: usize,
    /// Patients whose row was created this month
    pub monthly_new_patients: usize,
    /// All-time registration count. The dashboard card has always shown the
    /// grand total under its "monthly" heading; kept as-is rather than
    /// silently re-scoped.
    pub monthly_total_registered: usize,
}

/// Compute the dashboard cards from pre-fetched windows of data.
pub fn compute_dashboard_stats(
    all_patients: &[Patient],
    today_visits: &[Visit],
    month_visits: &[Visit],
    today_slips: &[PaymentSlip],
    month_slips: &[PaymentSlip],
    patients_created_this_month: &[Patient],
    patients_registered_today: &[Patient],
) -> ClinicStats {
    let today_active: HashSet<&str> = today_visits
        .iter()
        .map(|v| v.patient_id.as_str())
        .collect();
    let month_active: HashSet<&str> = month_visits
        .iter()
        .map(|v| v.patient_id.as_str())
        .collect();

    // A patient who both registered and visited today counts once, as active.
    let daily_other_registered = patients_registered_today
        .iter()
        .filter(|p| !today_active.contains(p.id.as_str()))
        .count();

    ClinicStats {
        total_patients: all_patients.len(),
        daily_active_patients: today_active.len(),
        monthly_patient_count: month_active.len(),
        today_revenue: today_slips.iter().map(|s| s.amount).sum(),
        monthly_income: month_slips.iter().map(|s| s.amount).sum(),
        daily_other_registered,
        monthly_new_patients: patients_created_this_month.len(),
        monthly_total_registered: all_patients.len(),
    }
}

/// Everything the dashboard page renders for one day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardSnapshot {
    pub stats: ClinicStats,
    pub appointments: Vec<Appointment>,
}

/// Payment state of a day's appointment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AppointmentStatus {
    /// At least one same-day slip for the visit has a positive amount
    Completed,
    Pending,
}

/// One entry in the day's appointment list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub visit: Visit,
    /// None when the owning patient row is missing
    pub patient: Option<PatientRef>,
    pub status: AppointmentStatus,
}

/// Build today's appointment list from today's visits and slips,
/// ordered by visit creation time.
pub fn today_appointments(
    today_visits: &[Visit],
    patients: &[Patient],
    today_slips: &[PaymentSlip],
) -> Vec<Appointment> {
    let mut appointments: Vec<Appointment> = today_visits
        .iter()
        .map(|visit| {
            let patient = patients
                .iter()
                .find(|p| p.id == visit.patient_id)
                .map(PatientRef::from);
            let paid = today_slips.iter().any(|s| {
                s.visit_id.as_deref() == Some(visit.id.as_str()) && s.amount > 0.0
            });
            Appointment {
                visit: visit.clone(),
                patient,
                status: if paid {
                    AppointmentStatus::Completed
                } else {
                    AppointmentStatus::Pending
                },
            }
        })
        .collect();

    appointments.sort_by(|a, b| a.visit.created_at.cmp(&b.visit.created_at));
    appointments
}
