//! Niramoy Core Library
//!
//! Patient management core for a Bengali homeopathy clinic: registration,
//! visit logging, prescription authoring, payment-slip issuance, and
//! reporting over a local SQLite store.
//!
//! # Architecture
//!
//! ```text
//! UI page load ──► Clinic (service API)
//!                     │
//!            ┌────────┼─────────────┐
//!            ▼        ▼             ▼
//!        Database  report::     notify::ChangeBus
//!        (SQLite)  resolve_range    │
//!            │     generate_report  └─► subscribed views re-fetch
//!            │     dashboard stats
//!            ▼
//!        export::BackupExporter (full JSON dump)
//! ```
//!
//! Every successful mutation broadcasts one payload-free change
//! notification; views re-fetch their own working set in response.
//!
//! # Modules
//!
//! - [`db`]: SQLite database layer, one repo file per collection
//! - [`models`]: Domain types (Patient, Visit, Prescription, PaymentSlip, ClinicSettings)
//! - [`report`]: Date-range resolution, range-report aggregation, dashboard statistics
//! - [`search`]: Phone/prefix/fuzzy patient search
//! - [`validate`]: Form-level validation
//! - [`notify`]: In-process change notification
//! - [`export`]: Full-database backup export

pub mod db;
pub mod export;
pub mod models;
pub mod notify;
pub mod report;
pub mod search;
pub mod validate;

// Re-export commonly used types
pub use db::Database;
pub use export::{BackupExporter, ClinicBackup, ExportError};
pub use models::{
    ClinicSettings, DeliveryMethod, Gender, Patient, PaymentMethod, PaymentSlip, Prescription,
    PrescriptionItem, PrescriptionType, Visit,
};
pub use notify::{ChangeBus, Subscription};
pub use report::{
    Appointment, AppointmentStatus, ClinicStats, DashboardSnapshot, RangeReport, ReportFilters,
    ReportRange, ReportRow, ReportType,
};
pub use validate::ValidationError;

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use tracing::{debug, info};

use report::{ReportFilters as Filters, ReportType as RType};

// =========================================================================
// Error Type
// =========================================================================

#[derive(Debug, thiserror::Error)]
pub enum ClinicError {
    #[error("Database error: {0}")]
    Database(#[from] db::DbError),

    #[error("Validation error: {0}")]
    Validation(#[from] validate::ValidationError),

    #[error("Export error: {0}")]
    Export(#[from] export::ExportError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Lock poisoned: {0}")]
    Lock(String),
}

impl<T> From<std::sync::PoisonError<T>> for ClinicError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        ClinicError::Lock(e.to_string())
    }
}

pub type ClinicResult<T> = Result<T, ClinicError>;

// =========================================================================
// Form Inputs
// =========================================================================

/// Optional registration-form fields beyond name and phone.
#[derive(Debug, Clone, Default)]
pub struct PatientDetails {
    pub diary_number: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub occupation: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_relation: Option<String>,
    pub district: Option<String>,
    pub thana: Option<String>,
    pub village: Option<String>,
    /// Defaults to today when the form leaves it blank
    pub registration_date: Option<NaiveDate>,
}

/// Optional visit-form fields.
#[derive(Debug, Clone, Default)]
pub struct VisitDetails {
    pub symptoms: Option<String>,
    pub diagnosis: Option<String>,
    pub notes: Option<String>,
    pub delivery: Option<DeliveryMethod>,
}

/// Prescription form content; saving twice for the same visit updates in
/// place.
#[derive(Debug, Clone)]
pub struct PrescriptionForm {
    pub prescription_type: PrescriptionType,
    pub items: Vec<PrescriptionItem>,
    pub follow_up_days: Option<u32>,
    pub advice: Option<String>,
    pub diagnosis: Option<String>,
    pub doctor_name: String,
    pub serial_number: Option<String>,
    pub date: NaiveDate,
}

/// Payment-slip form content.
#[derive(Debug, Clone)]
pub struct SlipRequest {
    pub patient_id: String,
    pub visit_id: Option<String>,
    pub date: NaiveDate,
    pub amount: f64,
    pub purpose: String,
    pub payment_method: Option<PaymentMethod>,
    pub received_by: Option<String>,
    /// Assigned automatically (per-day sequence) when absent
    pub slip_number: Option<String>,
}

// =========================================================================
// Main Service Object
// =========================================================================

/// Thread-safe service facade over the clinic database.
pub struct Clinic {
    db: Arc<Mutex<Database>>,
    bus: Arc<ChangeBus>,
}

impl Clinic {
    /// Open or create a clinic database at the given path.
    pub fn open(path: &str) -> ClinicResult<Self> {
        let db = Database::open(path)?;
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
            bus: ChangeBus::new(),
        })
    }

    /// Create an in-memory clinic (for testing).
    pub fn open_in_memory() -> ClinicResult<Self> {
        let db = Database::open_in_memory()?;
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
            bus: ChangeBus::new(),
        })
    }

    /// Subscribe to change notifications.
    pub fn subscribe(&self) -> Subscription {
        self.bus.subscribe()
    }

    // =========================================================================
    // Patient Operations
    // =========================================================================

    /// Register a new patient. Validates the form and normalizes the phone.
    pub fn register_patient(
        &self,
        name: &str,
        phone: &str,
        details: PatientDetails,
    ) -> ClinicResult<Patient> {
        let phone = validate::validate_patient_form(name, phone)?;

        let mut patient = Patient::new(name.trim().to_string(), phone);
        patient.diary_number = details.diary_number;
        patient.age = details.age;
        patient.gender = details.gender;
        patient.occupation = details.occupation;
        patient.guardian_name = details.guardian_name;
        patient.guardian_relation = details.guardian_relation;
        patient.district = details.district;
        patient.thana = details.thana;
        patient.village = details.village;
        if let Some(date) = details.registration_date {
            patient.registration_date = date;
        }

        {
            let db = self.db.lock()?;
            db.insert_patient(&patient)?;
        }
        info!(patient_id = %patient.id, "patient registered");
        self.bus.notify();
        Ok(patient)
    }

    /// Save edits to an existing patient.
    pub fn update_patient(&self, mut patient: Patient) -> ClinicResult<Patient> {
        patient.phone = validate::validate_patient_form(&patient.name, &patient.phone)?;
        patient.touch();

        let updated = {
            let db = self.db.lock()?;
            db.update_patient(&patient)?
        };
        if !updated {
            return Err(ClinicError::NotFound(format!("patient {}", patient.id)));
        }
        self.bus.notify();
        Ok(patient)
    }

    /// Get a patient by id; missing is a valid empty result.
    pub fn get_patient(&self, id: &str) -> ClinicResult<Option<Patient>> {
        let db = self.db.lock()?;
        Ok(db.get_patient(id)?)
    }

    /// List all patients, newest first.
    pub fn list_patients(&self) -> ClinicResult<Vec<Patient>> {
        let db = self.db.lock()?;
        Ok(db.list_patients()?)
    }

    /// Search patients by name or phone.
    pub fn search_patients(&self, query: &str, limit: usize) -> ClinicResult<Vec<Patient>> {
        let db = self.db.lock()?;
        Ok(search::search_patients(&db, query, limit)?)
    }

    // =========================================================================
    // Visit Operations
    // =========================================================================

    /// Log a visit for a patient.
    pub fn add_visit(
        &self,
        patient_id: &str,
        visit_date: NaiveDate,
        details: VisitDetails,
    ) -> ClinicResult<Visit> {
        let mut visit = Visit::new(patient_id.to_string(), visit_date);
        visit.symptoms = details.symptoms;
        visit.diagnosis = details.diagnosis;
        visit.notes = details.notes;
        visit.delivery = details.delivery;

        {
            let db = self.db.lock()?;
            db.insert_visit(&visit)?;
        }
        info!(visit_id = %visit.id, patient_id = %patient_id, "visit logged");
        self.bus.notify();
        Ok(visit)
    }

    /// List a patient's visits, newest first.
    pub fn visits_for_patient(&self, patient_id: &str) -> ClinicResult<Vec<Visit>> {
        let db = self.db.lock()?;
        Ok(db.visits_for_patient(patient_id)?)
    }

    /// List all visits, newest first.
    pub fn list_visits(&self) -> ClinicResult<Vec<Visit>> {
        let db = self.db.lock()?;
        Ok(db.list_visits()?)
    }

    // =========================================================================
    // Prescription Operations
    // =========================================================================

    /// Save a prescription for a visit: the first save creates it, later
    /// saves replace its content in place.
    pub fn save_prescription(
        &self,
        patient_id: &str,
        visit_id: &str,
        form: PrescriptionForm,
    ) -> ClinicResult<Prescription> {
        let rx = {
            let db = self.db.lock()?;
            match db.prescription_for_visit(visit_id)? {
                Some(mut existing) => {
                    existing.prescription_type = form.prescription_type;
                    existing.items = form.items;
                    existing.follow_up_days = form.follow_up_days;
                    existing.advice = form.advice;
                    existing.diagnosis = form.diagnosis;
                    existing.doctor_name = form.doctor_name;
                    existing.serial_number = form.serial_number;
                    existing.date = form.date;
                    db.update_prescription(&existing)?;
                    existing
                }
                None => {
                    let mut rx = Prescription::new(
                        patient_id.to_string(),
                        visit_id.to_string(),
                        form.prescription_type,
                        form.doctor_name,
                    );
                    rx.items = form.items;
                    rx.follow_up_days = form.follow_up_days;
                    rx.advice = form.advice;
                    rx.diagnosis = form.diagnosis;
                    rx.serial_number = form.serial_number;
                    rx.date = form.date;
                    db.insert_prescription(&rx)?;
                    rx
                }
            }
        };
        info!(prescription_id = %rx.id, visit_id = %visit_id, "prescription saved");
        self.bus.notify();
        Ok(rx)
    }

    /// Get the current prescription for a visit, if any.
    pub fn prescription_for_visit(&self, visit_id: &str) -> ClinicResult<Option<Prescription>> {
        let db = self.db.lock()?;
        Ok(db.prescription_for_visit(visit_id)?)
    }

    /// A patient's prescription history, newest first.
    pub fn prescriptions_for_patient(&self, patient_id: &str) -> ClinicResult<Vec<Prescription>> {
        let db = self.db.lock()?;
        Ok(db.prescriptions_for_patient(patient_id)?)
    }

    // =========================================================================
    // Payment Operations
    // =========================================================================

    /// Record a payment and issue its slip.
    pub fn issue_slip(&self, request: SlipRequest) -> ClinicResult<PaymentSlip> {
        validate::validate_slip_form(request.amount, request.payment_method)?;

        let slip = {
            let db = self.db.lock()?;
            let slip_number = match request.slip_number {
                Some(number) => number,
                None => {
                    let seq = db.count_slips_on(request.date)? + 1;
                    format!("S-{}-{:03}", request.date.format("%Y%m%d"), seq)
                }
            };

            let mut slip = PaymentSlip::new(
                request.patient_id,
                slip_number,
                request.date,
                request.amount,
                request.purpose,
            );
            slip.visit_id = request.visit_id;
            slip.payment_method = request.payment_method;
            slip.received_by = request.received_by;
            db.insert_slip(&slip)?;
            slip
        };
        info!(slip_id = %slip.id, slip_number = %slip.slip_number, "payment slip issued");
        self.bus.notify();
        Ok(slip)
    }

    /// List all payment slips, newest first.
    pub fn list_slips(&self) -> ClinicResult<Vec<PaymentSlip>> {
        let db = self.db.lock()?;
        Ok(db.list_slips()?)
    }

    /// List the slips tied to a visit.
    pub fn slips_for_visit(&self, visit_id: &str) -> ClinicResult<Vec<PaymentSlip>> {
        let db = self.db.lock()?;
        Ok(db.slips_for_visit(visit_id)?)
    }

    /// A patient's payment history, newest first.
    pub fn slips_for_patient(&self, patient_id: &str) -> ClinicResult<Vec<PaymentSlip>> {
        let db = self.db.lock()?;
        Ok(db.slips_for_patient(patient_id)?)
    }

    // =========================================================================
    // Settings Operations
    // =========================================================================

    /// Clinic settings, falling back to defaults until first saved.
    pub fn settings(&self) -> ClinicResult<ClinicSettings> {
        let db = self.db.lock()?;
        Ok(db.get_settings()?.unwrap_or_default())
    }

    /// Save the clinic settings.
    pub fn update_settings(&self, settings: &ClinicSettings) -> ClinicResult<()> {
        {
            let db = self.db.lock()?;
            db.save_settings(settings)?;
        }
        self.bus.notify();
        Ok(())
    }

    // =========================================================================
    // Reports & Dashboard
    // =========================================================================

    /// Generate a range report. `Ok(None)` means no computable range
    /// (incomplete or inverted custom bounds); the UI shows a prompt state.
    pub fn range_report(
        &self,
        report_type: RType,
        reference: NaiveDate,
        custom_start: Option<NaiveDate>,
        custom_end: Option<NaiveDate>,
        filters: &Filters,
    ) -> ClinicResult<Option<RangeReport>> {
        let range = match report::resolve_range(report_type, reference, custom_start, custom_end) {
            Some(range) => range,
            None => return Ok(None),
        };

        let db = self.db.lock()?;
        let visits = db.visits_between(range.start_day(), range.end_day())?;
        let patients = db.list_patients()?;
        let slips = db.slips_between(range.start_day(), range.end_day())?;
        debug!(
            visits = visits.len(),
            slips = slips.len(),
            "generating range report"
        );

        Ok(Some(report::generate_report(
            &visits, &patients, &slips, &range, filters,
        )))
    }

    /// Compute the dashboard snapshot for a given day.
    pub fn dashboard(&self, today: NaiveDate) -> ClinicResult<DashboardSnapshot> {
        let month = report::resolve_range(RType::Monthly, today, None, None)
            .expect("monthly range always resolves");

        let db = self.db.lock()?;
        let all_patients = db.list_patients()?;
        let today_visits = db.visits_between(today, today)?;
        let month_visits = db.visits_between(month.start_day(), month.end_day())?;
        let today_slips = db.slips_between(today, today)?;
        let month_slips = db.slips_between(month.start_day(), month.end_day())?;

        let (month_start, month_end) = day_bounds_rfc3339(month.start_day(), month.end_day());
        let created_this_month = db.patients_created_between(&month_start, &month_end)?;
        let (today_start, today_end) = day_bounds_rfc3339(today, today);
        let registered_today = db.patients_created_between(&today_start, &today_end)?;

        let stats = report::compute_dashboard_stats(
            &all_patients,
            &today_visits,
            &month_visits,
            &today_slips,
            &month_slips,
            &created_this_month,
            &registered_today,
        );
        let appointments = report::today_appointments(&today_visits, &all_patients, &today_slips);

        Ok(DashboardSnapshot {
            stats,
            appointments,
        })
    }

    // =========================================================================
    // Export Operations
    // =========================================================================

    /// Dump all collections for download.
    pub fn export_backup(&self) -> ClinicResult<ClinicBackup> {
        let db = self.db.lock()?;
        Ok(BackupExporter::new(&db).export_all()?)
    }

    /// Dump all collections as pretty JSON.
    pub fn export_backup_json(&self) -> ClinicResult<String> {
        let backup = self.export_backup()?;
        backup
            .to_json()
            .map_err(|e| ClinicError::Export(ExportError::Json(e)))
    }

    /// Restore from a backup file — confirmed with the clinic but not built.
    pub fn import_backup(&self, json: &str) -> ClinicResult<()> {
        let db = self.db.lock()?;
        Ok(export::import_backup(&db, json)?)
    }
}

/// RFC 3339 bounds covering [start, end] whole days, for comparisons
/// against stored `created_at` timestamps.
fn day_bounds_rfc3339(start: NaiveDate, end: NaiveDate) -> (String, String) {
    (
        format!("{start}T00:00:00+00:00"),
        format!("{end}T23:59:59.999999999+00:00"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn setup() -> Clinic {
        Clinic::open_in_memory().unwrap()
    }

    #[test]
    fn test_register_validates_and_normalizes() {
        let clinic = setup();

        let patient = clinic
            .register_patient("করিম", "+88 01712345678", PatientDetails::default())
            .unwrap();
        assert_eq!(patient.phone, "01712345678");

        let err = clinic.register_patient("", "01712345678", PatientDetails::default());
        assert!(matches!(
            err,
            Err(ClinicError::Validation(ValidationError::EmptyName))
        ));
    }

    #[test]
    fn test_mutations_notify_subscribers() {
        let clinic = setup();
        let sub = clinic.subscribe();

        clinic
            .register_patient("করিম", "01712345678", PatientDetails::default())
            .unwrap();
        assert!(sub.changed());

        clinic.update_settings(&ClinicSettings::default()).unwrap();
        assert!(sub.changed());
    }

    #[test]
    fn test_issue_slip_assigns_sequential_numbers() {
        let clinic = setup();
        let patient = clinic
            .register_patient("করিম", "01712345678", PatientDetails::default())
            .unwrap();

        let request = |amount: f64| SlipRequest {
            patient_id: patient.id.clone(),
            visit_id: None,
            date: date(2024, 3, 10),
            amount,
            purpose: "ভিজিট ফি".into(),
            payment_method: Some(PaymentMethod::Cash),
            received_by: None,
            slip_number: None,
        };

        let first = clinic.issue_slip(request(500.0)).unwrap();
        let second = clinic.issue_slip(request(300.0)).unwrap();
        assert_eq!(first.slip_number, "S-20240310-001");
        assert_eq!(second.slip_number, "S-20240310-002");
    }

    #[test]
    fn test_issue_slip_enforces_method_invariant() {
        let clinic = setup();
        let patient = clinic
            .register_patient("করিম", "01712345678", PatientDetails::default())
            .unwrap();

        let result = clinic.issue_slip(SlipRequest {
            patient_id: patient.id,
            visit_id: None,
            date: date(2024, 3, 10),
            amount: 500.0,
            purpose: "ফি".into(),
            payment_method: None,
            received_by: None,
            slip_number: None,
        });
        assert!(matches!(
            result,
            Err(ClinicError::Validation(
                ValidationError::MissingPaymentMethod
            ))
        ));
    }

    #[test]
    fn test_update_missing_patient_is_not_found() {
        let clinic = setup();
        let ghost = Patient::new("কেউ না".into(), "01712345678".into());
        assert!(matches!(
            clinic.update_patient(ghost),
            Err(ClinicError::NotFound(_))
        ));
    }

    #[test]
    fn test_custom_report_without_bounds_is_none() {
        let clinic = setup();
        let report = clinic
            .range_report(
                RType::Custom,
                date(2024, 3, 13),
                None,
                None,
                &Filters::default(),
            )
            .unwrap();
        assert!(report.is_none());
    }

    #[test]
    fn test_settings_default_until_saved() {
        let clinic = setup();
        let settings = clinic.settings().unwrap();
        assert_eq!(settings, ClinicSettings::default());
    }
}
