use rusqlite::{params, Connection};

use crate::db::{to_sql_timestamp, DatabaseError, DATE_FORMAT};
use crate::models::*;

pub fn insert_medication(conn: &Connection, medication: &Medication) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO medications (id, name, generic_name, strength, dosage_form)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            medication.id.to_string(),
            medication.name,
            medication.generic_name,
            medication.strength,
            medication.dosage_form,
        ],
    )?;
    Ok(())
}

pub fn insert_student_medication(
    conn: &Connection,
    prescription: &StudentMedication,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO student_medications (id, student_id, medication_id, dosage, frequency,
                                          start_date, end_date, is_active, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            prescription.id.to_string(),
            prescription.student_id.to_string(),
            prescription.medication_id.to_string(),
            prescription.dosage,
            prescription.frequency,
            prescription.start_date.format(DATE_FORMAT).to_string(),
            prescription.end_date.map(|d| d.format(DATE_FORMAT).to_string()),
            prescription.is_active as i32,
            to_sql_timestamp(&prescription.created_at),
        ],
    )?;
    Ok(())
}

pub fn insert_medication_log(conn: &Connection, log: &MedicationLog) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO medication_logs (id, student_medication_id, nurse_id, dosage_given,
                                      administered_at, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            log.id.to_string(),
            log.student_medication_id.to_string(),
            log.nurse_id.map(|id| id.to_string()),
            log.dosage_given,
            to_sql_timestamp(&log.administered_at),
            log.notes,
        ],
    )?;
    Ok(())
}
