//! Visit database operations.

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{DeliveryMethod, Visit};

const VISIT_COLUMNS: &str =
    "id, patient_id, visit_date, symptoms, diagnosis, notes, delivery, created_at";

impl Database {
    /// Insert a new visit.
    pub fn insert_visit(&self, visit: &Visit) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO visits (
                id, patient_id, visit_date, symptoms, diagnosis, notes,
                delivery, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                visit.id,
                visit.patient_id,
                visit.visit_date,
                visit.symptoms,
                visit.diagnosis,
                visit.notes,
                visit.delivery.map(|d| d.as_str()),
                visit.created_at,
            ],
        )?;
        Ok(())
    }

    /// Get a visit by ID.
    pub fn get_visit(&self, id: &str) -> DbResult<Option<Visit>> {
        self.conn
            .query_row(
                &format!("SELECT {VISIT_COLUMNS} FROM visits WHERE id = ?"),
                [id],
                visit_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List all visits, newest first.
    pub fn list_visits(&self) -> DbResult<Vec<Visit>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {VISIT_COLUMNS} FROM visits ORDER BY created_at DESC"
        ))?;
        let rows = stmt.query_map([], visit_row)?;

        let mut visits = Vec::new();
        for row in rows {
            visits.push(row?.try_into()?);
        }
        Ok(visits)
    }

    /// List all visits for a patient, newest first.
    pub fn visits_for_patient(&self, patient_id: &str) -> DbResult<Vec<Visit>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {VISIT_COLUMNS} FROM visits WHERE patient_id = ? ORDER BY created_at DESC"
        ))?;
        let rows = stmt.query_map([patient_id], visit_row)?;

        let mut visits = Vec::new();
        for row in rows {
            visits.push(row?.try_into()?);
        }
        Ok(visits)
    }

    /// List visits whose business date falls in [start, end].
    pub fn visits_between(&self, start: NaiveDate, end: NaiveDate) -> DbResult<Vec<Visit>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {VISIT_COLUMNS} FROM visits \
             WHERE visit_date >= ?1 AND visit_date <= ?2 \
             ORDER BY visit_date, created_at"
        ))?;
        let rows = stmt.query_map(params![start, end], visit_row)?;

        let mut visits = Vec::new();
        for row in rows {
            visits.push(row?.try_into()?);
        }
        Ok(visits)
    }
}

/// Intermediate row struct for database mapping.
struct VisitRow {
    id: String,
    patient_id: String,
    visit_date: NaiveDate,
    symptoms: Option<String>,
    diagnosis: Option<String>,
    notes: Option<String>,
    delivery: Option<String>,
    created_at: String,
}

fn visit_row(row: &Row<'_>) -> rusqlite::Result<VisitRow> {
    Ok(VisitRow {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        visit_date: row.get(2)?,
        symptoms: row.get(3)?,
        diagnosis: row.get(4)?,
        notes: row.get(5)?,
        delivery: row.get(6)?,
        created_at: row.get(7)?,
    })
}

impl TryFrom<VisitRow> for Visit {
    type Error = DbError;

    fn try_from(row: VisitRow) -> Result<Self, Self::Error> {
        let delivery = row
            .delivery
            .map(|s| {
                DeliveryMethod::parse(&s)
                    .ok_or_else(|| DbError::Constraint(format!("Unknown delivery method: {}", s)))
            })
            .transpose()?;

        Ok(Visit {
            id: row.id,
            patient_id: row.patient_id,
            visit_date: row.visit_date,
            symptoms: row.symptoms,
            diagnosis: row.diagnosis,
            notes: row.notes,
            delivery,
            created_at: row.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Patient;

    fn setup_db() -> (Database, Patient) {
        let db = Database::open_in_memory().unwrap();
        let patient = Patient::new("করিম".into(), "01712345678".into());
        db.insert_patient(&patient).unwrap();
        (db, patient)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_insert_and_get_visit() {
        let (db, patient) = setup_db();

        let mut visit = Visit::new(patient.id.clone(), date(2024, 3, 10));
        visit.symptoms = Some("জ্বর ও মাথাব্যথা".into());
        visit.delivery = Some(DeliveryMethod::Courier);
        db.insert_visit(&visit).unwrap();

        let retrieved = db.get_visit(&visit.id).unwrap().unwrap();
        assert_eq!(retrieved.symptoms, Some("জ্বর ও মাথাব্যথা".into()));
        assert_eq!(retrieved.delivery, Some(DeliveryMethod::Courier));
        assert_eq!(retrieved.visit_date, date(2024, 3, 10));
    }

    #[test]
    fn test_visit_without_delivery() {
        let (db, patient) = setup_db();

        let visit = Visit::new(patient.id.clone(), date(2024, 3, 10));
        db.insert_visit(&visit).unwrap();

        let retrieved = db.get_visit(&visit.id).unwrap().unwrap();
        assert!(retrieved.delivery.is_none());
    }

    #[test]
    fn test_visits_between_inclusive() {
        let (db, patient) = setup_db();

        for day in [9, 10, 16, 17] {
            db.insert_visit(&Visit::new(patient.id.clone(), date(2024, 3, day)))
                .unwrap();
        }

        let in_range = db
            .visits_between(date(2024, 3, 10), date(2024, 3, 16))
            .unwrap();
        assert_eq!(in_range.len(), 2);
        assert!(in_range
            .iter()
            .all(|v| v.visit_date >= date(2024, 3, 10) && v.visit_date <= date(2024, 3, 16)));
    }

    #[test]
    fn test_visits_for_patient() {
        let (db, patient) = setup_db();
        let other = Patient::new("সালমা".into(), "01812345678".into());
        db.insert_patient(&other).unwrap();

        db.insert_visit(&Visit::new(patient.id.clone(), date(2024, 3, 10)))
            .unwrap();
        db.insert_visit(&Visit::new(other.id.clone(), date(2024, 3, 10)))
            .unwrap();

        let visits = db.visits_for_patient(&patient.id).unwrap();
        assert_eq!(visits.len(), 1);
        assert_eq!(visits[0].patient_id, patient.id);
    }
}
