//! Patient database operations.

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{Gender, Patient};

const PATIENT_COLUMNS: &str = "id, diary_number, name, phone, age, gender, occupation, \
     guardian_name, guardian_relation, district, thana, village, \
     registration_date, created_at, updated_at";

impl Database {
    /// Insert a new patient.
    pub fn insert_patient(&self, patient: &Patient) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO patients (
                id, diary_number, name, phone, age, gender, occupation,
                guardian_name, guardian_relation, district, thana, village,
                registration_date, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
            "#,
            params![
                patient.id,
                patient.diary_number,
                patient.name,
                patient.phone,
                patient.age,
                patient.gender.map(|g| g.as_str()),
                patient.occupation,
                patient.guardian_name,
                patient.guardian_relation,
                patient.district,
                patient.thana,
                patient.village,
                patient.registration_date,
                patient.created_at,
                patient.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Update an existing patient (full row).
    pub fn update_patient(&self, patient: &Patient) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE patients SET
                diary_number = ?2,
                name = ?3,
                phone = ?4,
                age = ?5,
                gender = ?6,
                occupation = ?7,
                guardian_name = ?8,
                guardian_relation = ?9,
                district = ?10,
                thana = ?11,
                village = ?12,
                registration_date = ?13,
                updated_at = ?14
            WHERE id = ?1
            "#,
            params![
                patient.id,
                patient.diary_number,
                patient.name,
                patient.phone,
                patient.age,
                patient.gender.map(|g| g.as_str()),
                patient.occupation,
                patient.guardian_name,
                patient.guardian_relation,
                patient.district,
                patient.thana,
                patient.village,
                patient.registration_date,
                patient.updated_at,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a patient by ID.
    pub fn get_patient(&self, id: &str) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                &format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ?"),
                [id],
                patient_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Get a patient by exact phone number.
    pub fn get_patient_by_phone(&self, phone: &str) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                &format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE phone = ? LIMIT 1"),
                [phone],
                patient_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List all patients, newest registrations first.
    pub fn list_patients(&self) -> DbResult<Vec<Patient>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PATIENT_COLUMNS} FROM patients ORDER BY created_at DESC"
        ))?;
        let rows = stmt.query_map([], patient_row)?;

        let mut patients = Vec::new();
        for row in rows {
            patients.push(row?.try_into()?);
        }
        Ok(patients)
    }

    /// Search patients by name (prefix match).
    pub fn search_patients_by_name(&self, query: &str, limit: usize) -> DbResult<Vec<Patient>> {
        let pattern = format!("{}%", query);
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PATIENT_COLUMNS} FROM patients WHERE name LIKE ? ORDER BY name LIMIT ?"
        ))?;
        let rows = stmt.query_map(params![pattern, limit as i64], patient_row)?;

        let mut patients = Vec::new();
        for row in rows {
            patients.push(row?.try_into()?);
        }
        Ok(patients)
    }

    /// List patients created (by row timestamp) in [start, end] RFC 3339 bounds.
    pub fn patients_created_between(&self, start: &str, end: &str) -> DbResult<Vec<Patient>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PATIENT_COLUMNS} FROM patients \
             WHERE created_at >= ?1 AND created_at <= ?2 \
             ORDER BY created_at DESC"
        ))?;
        let rows = stmt.query_map(params![start, end], patient_row)?;

        let mut patients = Vec::new();
        for row in rows {
            patients.push(row?.try_into()?);
        }
        Ok(patients)
    }
}

/// Intermediate row struct for database mapping.
struct PatientRow {
    id: String,
    diary_number: Option<String>,
    name: String,
    phone: String,
    age: Option<u32>,
    gender: Option<String>,
    occupation: Option<String>,
    guardian_name: Option<String>,
    guardian_relation: Option<String>,
    district: Option<String>,
    thana: Option<String>,
    village: Option<String>,
    registration_date: NaiveDate,
    created_at: String,
    updated_at: String,
}

fn patient_row(row: &Row<'_>) -> rusqlite::Result<PatientRow> {
    Ok(PatientRow {
        id: row.get(0)?,
        diary_number: row.get(1)?,
        name: row.get(2)?,
        phone: row.get(3)?,
        age: row.get(4)?,
        gender: row.get(5)?,
        occupation: row.get(6)?,
        guardian_name: row.get(7)?,
        guardian_relation: row.get(8)?,
        district: row.get(9)?,
        thana: row.get(10)?,
        village: row.get(11)?,
        registration_date: row.get(12)?,
        created_at: row.get(13)?,
        updated_at: row.get(14)?,
    })
}

impl TryFrom<PatientRow> for Patient {
    type Error = DbError;

    fn try_from(row: PatientRow) -> Result<Self, Self::Error> {
        let gender = row
            .gender
            .map(|s| {
                Gender::parse(&s).ok_or_else(|| DbError::Constraint(format!("Unknown gender: {}", s)))
            })
            .transpose()?;

        Ok(Patient {
            id: row.id,
            diary_number: row.diary_number,
            name: row.name,
            phone: row.phone,
            age: row.age,
            gender,
            occupation: row.occupation,
            guardian_name: row.guardian_name,
            guardian_relation: row.guardian_relation,
            district: row.district,
            thana: row.thana,
            village: row.village,
            registration_date: row.registration_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
