//! SQLite schema definition.

/// Complete database schema for niramoy.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Patients
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    id TEXT PRIMARY KEY,
    diary_number TEXT,                           -- display label, not unique
    name TEXT NOT NULL,
    phone TEXT NOT NULL,
    age INTEGER,
    gender TEXT,
    occupation TEXT,
    guardian_name TEXT,
    guardian_relation TEXT,
    district TEXT,
    thana TEXT,
    village TEXT,
    registration_date TEXT NOT NULL,             -- business date, YYYY-MM-DD
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_patients_name ON patients(name);
CREATE INDEX IF NOT EXISTS idx_patients_phone ON patients(phone);
CREATE INDEX IF NOT EXISTS idx_patients_created ON patients(created_at);

-- ============================================================================
-- Visits (create-only)
-- ============================================================================

CREATE TABLE IF NOT EXISTS visits (
    id TEXT PRIMARY KEY,
    patient_id TEXT NOT NULL REFERENCES patients(id),
    visit_date TEXT NOT NULL,                    -- business date, YYYY-MM-DD
    symptoms TEXT,
    diagnosis TEXT,
    notes TEXT,
    delivery TEXT,                               -- direct, courier; NULL when unrecorded
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_visits_patient ON visits(patient_id);
CREATE INDEX IF NOT EXISTS idx_visits_date ON visits(visit_date);

-- ============================================================================
-- Prescriptions (one current row per visit)
-- ============================================================================

CREATE TABLE IF NOT EXISTS prescriptions (
    id TEXT PRIMARY KEY,
    patient_id TEXT NOT NULL REFERENCES patients(id),
    visit_id TEXT NOT NULL REFERENCES visits(id),
    prescription_type TEXT NOT NULL,             -- adult, child
    items TEXT NOT NULL DEFAULT '[]',            -- JSON array of PrescriptionItem
    follow_up_days INTEGER,
    advice TEXT,
    diagnosis TEXT,
    doctor_name TEXT NOT NULL,
    serial_number TEXT,
    date TEXT NOT NULL,                          -- business date, YYYY-MM-DD
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_prescriptions_visit ON prescriptions(visit_id);
CREATE INDEX IF NOT EXISTS idx_prescriptions_patient ON prescriptions(patient_id);

-- ============================================================================
-- Payment Slips (create-only)
-- ============================================================================

CREATE TABLE IF NOT EXISTS payment_slips (
    id TEXT PRIMARY KEY,
    patient_id TEXT NOT NULL REFERENCES patients(id),
    visit_id TEXT REFERENCES visits(id),
    slip_number TEXT NOT NULL,
    date TEXT NOT NULL,                          -- business date, YYYY-MM-DD
    amount REAL NOT NULL CHECK (amount >= 0),
    purpose TEXT NOT NULL DEFAULT '',
    payment_method TEXT,                         -- cash, bkash, nagad, rocket, other, courier_medicine
    received_by TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_slips_patient ON payment_slips(patient_id);
CREATE INDEX IF NOT EXISTS idx_slips_visit ON payment_slips(visit_id);
CREATE INDEX IF NOT EXISTS idx_slips_date ON payment_slips(date);

-- ============================================================================
-- Clinic Settings (single row, updated atomically)
-- ============================================================================

CREATE TABLE IF NOT EXISTS clinic_settings (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    clinic_name TEXT NOT NULL DEFAULT '',
    doctor_name TEXT NOT NULL DEFAULT '',
    clinic_address TEXT NOT NULL DEFAULT '',
    clinic_contact TEXT NOT NULL DEFAULT '',
    bm_reg_no TEXT NOT NULL DEFAULT '',
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;
