use rusqlite::{params, Connection};

use crate::db::{to_sql_timestamp, DatabaseError};
use crate::models::IncidentReport;

pub fn insert_incident(conn: &Connection, incident: &IncidentReport) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO incident_reports (id, student_id, reported_by, incident_type, severity,
                                       status, description, occurred_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            incident.id.to_string(),
            incident.student_id.to_string(),
            incident.reported_by.map(|id| id.to_string()),
            incident.incident_type,
            incident.severity.as_str(),
            incident.status.as_str(),
            incident.description,
            to_sql_timestamp(&incident.occurred_at),
        ],
    )?;
    Ok(())
}
