//! Clinic settings database operations (singleton row).

use rusqlite::{params, OptionalExtension};

use super::{Database, DbResult};
use crate::models::ClinicSettings;

impl Database {
    /// Get the clinic settings, if the form has ever been saved.
    pub fn get_settings(&self) -> DbResult<Option<ClinicSettings>> {
        self.conn
            .query_row(
                "SELECT clinic_name, doctor_name, clinic_address, clinic_contact, bm_reg_no \
                 FROM clinic_settings WHERE id = 1",
                [],
                |row| {
                    Ok(ClinicSettings {
                        clinic_name: row.get(0)?,
                        doctor_name: row.get(1)?,
                        clinic_address: row.get(2)?,
                        clinic_contact: row.get(3)?,
                        bm_reg_no: row.get(4)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    /// Create or replace the singleton settings row.
    pub fn save_settings(&self, settings: &ClinicSettings) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO clinic_settings (
                id, clinic_name, doctor_name, clinic_address, clinic_contact, bm_reg_no, updated_at
            ) VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                clinic_name = excluded.clinic_name,
                doctor_name = excluded.doctor_name,
                clinic_address = excluded.clinic_address,
                clinic_contact = excluded.clinic_contact,
                bm_reg_no = excluded.bm_reg_no,
                updated_at = excluded.updated_at
            "#,
            params![
                settings.clinic_name,
                settings.doctor_name,
                settings.clinic_address,
                settings.clinic_contact,
                settings.bm_reg_no,
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_absent_until_saved() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.get_settings().unwrap().is_none());
    }

    #[test]
    fn test_save_and_update_settings() {
        let db = Database::open_in_memory().unwrap();

        let mut settings = ClinicSettings {
            clinic_name: "নিরাময় হোমিও হল".into(),
            doctor_name: "ডাঃ রহমান".into(),
            clinic_address: "স্টেশন রোড, কুমিল্লা".into(),
            clinic_contact: "01712345678".into(),
            bm_reg_no: "বি-১২৩৪".into(),
        };
        db.save_settings(&settings).unwrap();

        let loaded = db.get_settings().unwrap().unwrap();
        assert_eq!(loaded, settings);

        // A second save replaces, never duplicates
        settings.doctor_name = "ডাঃ করিম".into();
        db.save_settings(&settings).unwrap();

        let loaded = db.get_settings().unwrap().unwrap();
        assert_eq!(loaded.doctor_name, "ডাঃ করিম");
    }
}
