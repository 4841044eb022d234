//! SQLite schema definition.

/// Complete database schema for livestock records.
///
/// References between records are plain columns: deleting an animal or drug
/// leaves its treatments and reports in place.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Users
-- ============================================================================

CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,                      -- plaintext
    role TEXT NOT NULL CHECK (role IN ('Manager', 'Staff', 'Veterinarian'))
);

-- ============================================================================
-- Animals
-- ============================================================================

CREATE TABLE IF NOT EXISTS animals (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    animal_tag TEXT NOT NULL,                    -- external ear tag
    species TEXT NOT NULL,
    breed TEXT NOT NULL DEFAULT '',
    date_of_birth TEXT NOT NULL DEFAULT '',
    owner_id TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_animals_owner ON animals(owner_id);
CREATE INDEX IF NOT EXISTS idx_animals_species ON animals(species);

-- ============================================================================
-- Drugs
-- ============================================================================

CREATE TABLE IF NOT EXISTS drugs (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    milk_withdrawal_hours INTEGER NOT NULL CHECK (milk_withdrawal_hours >= 0),
    meat_withdrawal_days INTEGER NOT NULL CHECK (meat_withdrawal_days >= 0)
);

CREATE INDEX IF NOT EXISTS idx_drugs_name ON drugs(name);

-- ============================================================================
-- Symptom Reports
-- ============================================================================

CREATE TABLE IF NOT EXISTS symptom_reports (
    id TEXT PRIMARY KEY,
    animal_id TEXT NOT NULL,
    reported_by_id TEXT NOT NULL,
    description TEXT NOT NULL,
    created_at TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'OPEN' CHECK (status IN ('OPEN', 'TREATED')),
    assigned_vet_id TEXT
);

CREATE INDEX IF NOT EXISTS idx_reports_animal ON symptom_reports(animal_id);
CREATE INDEX IF NOT EXISTS idx_reports_status ON symptom_reports(status);

-- ============================================================================
-- Treatments (withdrawal window fixed at insert)
-- ============================================================================

CREATE TABLE IF NOT EXISTS treatments (
    id TEXT PRIMARY KEY,
    animal_id TEXT NOT NULL,
    drug_id TEXT NOT NULL,
    administered_by_id TEXT NOT NULL,
    diagnosis TEXT NOT NULL,
    dosage TEXT NOT NULL,
    treatment_date TEXT NOT NULL,
    withdrawal_end_date TEXT NOT NULL,
    linked_report_id TEXT
);

CREATE INDEX IF NOT EXISTS idx_treatments_animal ON treatments(animal_id);
CREATE INDEX IF NOT EXISTS idx_treatments_report ON treatments(linked_report_id);

-- Reject any change to a recorded window
CREATE TRIGGER IF NOT EXISTS treatments_window_immutable BEFORE UPDATE ON treatments
WHEN new.treatment_date IS NOT old.treatment_date
  OR new.withdrawal_end_date IS NOT old.withdrawal_end_date
BEGIN
    SELECT RAISE(ABORT, 'Withdrawal window is immutable');
END;
"#;
