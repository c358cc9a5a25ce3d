use rusqlite::{params, Connection};

use crate::db::{to_sql_timestamp, DatabaseError};
use crate::models::Appointment;

pub fn insert_appointment(
    conn: &Connection,
    appointment: &Appointment,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO appointments (id, student_id, nurse_id, appointment_type, status, reason,
                                   scheduled_at, duration_minutes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            appointment.id.to_string(),
            appointment.student_id.to_string(),
            appointment.nurse_id.map(|id| id.to_string()),
            appointment.appointment_type.as_str(),
            appointment.status.as_str(),
            appointment.reason,
            to_sql_timestamp(&appointment.scheduled_at),
            appointment.duration_minutes,
        ],
    )?;
    Ok(())
}
