use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Formulary entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medication {
    pub id: Uuid,
    pub name: String,
    pub generic_name: Option<String>,
    pub strength: Option<String>,
    pub dosage_form: Option<String>,
}

/// A prescription of a formulary medication to one student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentMedication {
    pub id: Uuid,
    pub student_id: Uuid,
    pub medication_id: Uuid,
    pub dosage: String,
    pub frequency: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

/// A single administration of a prescription.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicationLog {
    pub id: Uuid,
    pub student_medication_id: Uuid,
    pub nurse_id: Option<Uuid>,
    pub dosage_given: String,
    pub administered_at: NaiveDateTime,
    pub notes: Option<String>,
}
