//! Full-database backup export.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::{Database, DbError};
use crate::models::{ClinicSettings, Patient, PaymentSlip, Prescription, Visit};

/// Export errors.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Database error: {0}")]
    Db(#[from] DbError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Backup import is not implemented")]
    ImportNotSupported,
}

/// A full dump of every collection, downloadable as one JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicBackup {
    /// Export timestamp (RFC 3339)
    pub exported_at: String,
    pub patients: Vec<Patient>,
    pub visits: Vec<Visit>,
    pub prescriptions: Vec<Prescription>,
    pub payment_slips: Vec<PaymentSlip>,
    pub settings: Option<ClinicSettings>,
}

impl ClinicBackup {
    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Backup exporter.
pub struct BackupExporter<'a> {
    db: &'a Database,
}

impl<'a> BackupExporter<'a> {
    /// Create a new backup exporter.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Dump all five collections.
    pub fn export_all(&self) -> Result<ClinicBackup, ExportError> {
        Ok(ClinicBackup {
            exported_at: chrono::Utc::now().to_rfc3339(),
            patients: self.db.list_patients()?,
            visits: self.db.list_visits()?,
            prescriptions: self.db.list_prescriptions()?,
            payment_slips: self.db.list_slips()?,
            settings: self.db.get_settings()?,
        })
    }
}

/// Restore from a backup file.
///
/// The import path was confirmed with the clinic but never built; callers
/// get a stable error until it is.
pub fn import_backup(_db: &Database, _json: &str) -> Result<(), ExportError> {
    Err(ExportError::ImportNotSupported)
}
