//! Prescription database operations.

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{Prescription, PrescriptionItem, PrescriptionType};

const PRESCRIPTION_COLUMNS: &str = "id, patient_id, visit_id, prescription_type, items, \
     follow_up_days, advice, diagnosis, doctor_name, serial_number, date, created_at";

impl Database {
    /// Insert a new prescription.
    pub fn insert_prescription(&self, rx: &Prescription) -> DbResult<()> {
        let items_json = serde_json::to_string(&rx.items)?;

        self.conn.execute(
            r#"
            INSERT INTO prescriptions (
                id, patient_id, visit_id, prescription_type, items,
                follow_up_days, advice, diagnosis, doctor_name,
                serial_number, date, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                rx.id,
                rx.patient_id,
                rx.visit_id,
                rx.prescription_type.as_str(),
                items_json,
                rx.follow_up_days,
                rx.advice,
                rx.diagnosis,
                rx.doctor_name,
                rx.serial_number,
                rx.date,
                rx.created_at,
            ],
        )?;
        Ok(())
    }

    /// Update an existing prescription (content fields only).
    pub fn update_prescription(&self, rx: &Prescription) -> DbResult<bool> {
        let items_json = serde_json::to_string(&rx.items)?;

        let rows_affected = self.conn.execute(
            r#"
            UPDATE prescriptions SET
                prescription_type = ?2,
                items = ?3,
                follow_up_days = ?4,
                advice = ?5,
                diagnosis = ?6,
                doctor_name = ?7,
                serial_number = ?8,
                date = ?9
            WHERE id = ?1
            "#,
            params![
                rx.id,
                rx.prescription_type.as_str(),
                items_json,
                rx.follow_up_days,
                rx.advice,
                rx.diagnosis,
                rx.doctor_name,
                rx.serial_number,
                rx.date,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a prescription by ID.
    pub fn get_prescription(&self, id: &str) -> DbResult<Option<Prescription>> {
        self.conn
            .query_row(
                &format!("SELECT {PRESCRIPTION_COLUMNS} FROM prescriptions WHERE id = ?"),
                [id],
                prescription_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Get the current prescription for a visit.
    ///
    /// If duplicates exist, the most recently dated one wins.
    pub fn prescription_for_visit(&self, visit_id: &str) -> DbResult<Option<Prescription>> {
        self.conn
            .query_row(
                &format!(
                    "SELECT {PRESCRIPTION_COLUMNS} FROM prescriptions \
                     WHERE visit_id = ? \
                     ORDER BY date DESC, created_at DESC \
                     LIMIT 1"
                ),
                [visit_id],
                prescription_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List all prescriptions, newest first.
    pub fn list_prescriptions(&self) -> DbResult<Vec<Prescription>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PRESCRIPTION_COLUMNS} FROM prescriptions ORDER BY created_at DESC"
        ))?;
        let rows = stmt.query_map([], prescription_row)?;

        let mut prescriptions = Vec::new();
        for row in rows {
            prescriptions.push(row?.try_into()?);
        }
        Ok(prescriptions)
    }

    /// List all prescriptions for a patient, newest first.
    pub fn prescriptions_for_patient(&self, patient_id: &str) -> DbResult<Vec<Prescription>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PRESCRIPTION_COLUMNS} FROM prescriptions \
             WHERE patient_id = ? ORDER BY created_at DESC"
        ))?;
        let rows = stmt.query_map([patient_id], prescription_row)?;

        let mut prescriptions = Vec::new();
        for row in rows {
            prescriptions.push(row?.try_into()?);
        }
        Ok(prescriptions)
    }
}

/// Intermediate row struct for database mapping.
struct PrescriptionRow {
    id: String,
    patient_id: String,
    visit_id: String,
    prescription_type: String,
    items: String,
    follow_up_days: Option<u32>,
    advice: Option<String>,
    diagnosis: Option<String>,
    doctor_name: String,
    serial_number: Option<String>,
    date: NaiveDate,
    created_at: String,
}

fn prescription_row(row: &Row<'_>) -> rusqlite::Result<PrescriptionRow> {
    Ok(PrescriptionRow {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        visit_id: row.get(2)?,
        prescription_type: row.get(3)?,
        items: row.get(4)?,
        follow_up_days: row.get(5)?,
        advice: row.get(6)?,
        diagnosis: row.get(7)?,
        doctor_name: row.get(8)?,
        serial_number: row.get(9)?,
        date: row.get(10)?,
        created_at: row.get(11)?,
    })
}

impl TryFrom<PrescriptionRow> for Prescription {
    type Error = DbError;

    fn try_from(row: PrescriptionRow) -> Result<Self, Self::Error> {
        let items: Vec<PrescriptionItem> = serde_json::from_str(&row.items)?;
        let prescription_type = PrescriptionType::parse(&row.prescription_type).ok_or_else(|| {
            DbError::Constraint(format!(
                "Unknown prescription type: {}",
                row.prescription_type
            ))
        })?;

        Ok(Prescription {
            id: row.id,
            patient_id: row.patient_id,
            visit_id: row.visit_id,
            prescription_type,
            items,
            follow_up_days: row.follow_up_days,
            advice: row.advice,
            diagnosis: row.diagnosis,
            doctor_name: row.doctor_name,
            serial_number: row.serial_number,
            date: row.date,
            created_at: row.created_at,
        })
    }
}
