//! Payment slip database operations.

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{PaymentMethod, PaymentSlip};

const SLIP_COLUMNS: &str = "id, patient_id, visit_id, slip_number, date, amount, purpose, \
     payment_method, received_by, created_at";

impl Database {
    /// Insert a new payment slip.
    pub fn insert_slip(&self, slip: &PaymentSlip) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO payment_slips (
                id, patient_id, visit_id, slip_number, date, amount,
                purpose, payment_method, received_by, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                slip.id,
                slip.patient_id,
                slip.visit_id,
                slip.slip_number,
                slip.date,
                slip.amount,
                slip.purpose,
                slip.payment_method.map(|m| m.as_str()),
                slip.received_by,
                slip.created_at,
            ],
        )?;
        Ok(())
    }

    /// Get a payment slip by ID.
    pub fn get_slip(&self, id: &str) -> DbResult<Option<PaymentSlip>> {
        self.conn
            .query_row(
                &format!("SELECT {SLIP_COLUMNS} FROM payment_slips WHERE id = ?"),
                [id],
                slip_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List all payment slips, newest first.
    pub fn list_slips(&self) -> DbResult<Vec<PaymentSlip>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SLIP_COLUMNS} FROM payment_slips ORDER BY created_at DESC"
        ))?;
        let rows = stmt.query_map([], slip_row)?;

        let mut slips = Vec::new();
        for row in rows {
            slips.push(row?.try_into()?);
        }
        Ok(slips)
    }

    /// List all slips for a patient, newest first.
    pub fn slips_for_patient(&self, patient_id: &str) -> DbResult<Vec<PaymentSlip>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SLIP_COLUMNS} FROM payment_slips WHERE patient_id = ? ORDER BY created_at DESC"
        ))?;
        let rows = stmt.query_map([patient_id], slip_row)?;

        let mut slips = Vec::new();
        for row in rows {
            slips.push(row?.try_into()?);
        }
        Ok(slips)
    }

    /// List all slips tied to a visit.
    pub fn slips_for_visit(&self, visit_id: &str) -> DbResult<Vec<PaymentSlip>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SLIP_COLUMNS} FROM payment_slips WHERE visit_id = ? ORDER BY created_at"
        ))?;
        let rows = stmt.query_map([visit_id], slip_row)?;

        let mut slips = Vec::new();
        for row in rows {
            slips.push(row?.try_into()?);
        }
        Ok(slips)
    }

    /// List slips whose business date falls in [start, end].
    pub fn slips_between(&self, start: NaiveDate, end: NaiveDate) -> DbResult<Vec<PaymentSlip>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SLIP_COLUMNS} FROM payment_slips \
             WHERE date >= ?1 AND date <= ?2 \
             ORDER BY date, created_at"
        ))?;
        let rows = stmt.query_map(params![start, end], slip_row)?;

        let mut slips = Vec::new();
        for row in rows {
            slips.push(row?.try_into()?);
        }
        Ok(slips)
    }

    /// Count slips dated on a given day (for slip-number sequencing).
    pub fn count_slips_on(&self, date: NaiveDate) -> DbResult<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM payment_slips WHERE date = ?",
            [date],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

/// Intermediate row struct for database mapping.
struct SlipRow {
    id: String,
    patient_id: String,
    visit_id: Option<String>,
    slip_number: String,
    date: NaiveDate,
    amount: f64,
    purpose: String,
    payment_method: Option<String>,
    received_by: Option<String>,
    created_at: String,
}

fn slip_row(row: &Row<'_>) -> rusqlite::Result<SlipRow> {
    Ok(SlipRow {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        visit_id: row.get(2)?,
        slip_number: row.get(3)?,
        date: row.get(4)?,
        amount: row.get(5)?,
        purpose: row.get(6)?,
        payment_method: row.get(7)?,
        received_by: row.get(8)?,
        created_at: row.get(9)?,
    })
}

impl TryFrom<SlipRow> for PaymentSlip {
    type Error = DbError;

    fn try_from(row: SlipRow) -> Result<Self, Self::Error> {
        let payment_method = row
            .payment_method
            .map(|s| {
                PaymentMethod::parse(&s)
                    .ok_or_else(|| DbError::Constraint(format!("Unknown payment method: {}", s)))
            })
            .transpose()?;

        Ok(PaymentSlip {
            id: row.id,
            patient_id: row.patient_id,
            visit_id: row.visit_id,
            slip_number: row.slip_number,
            date: row.date,
            amount: row.amount,
            purpose: row.purpose,
            payment_method,
            received_by: row.received_by,
            created_at: row.created_at,
        })
    }
}
