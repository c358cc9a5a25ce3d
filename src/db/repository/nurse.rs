use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::Nurse;

pub fn insert_nurse(conn: &Connection, nurse: &Nurse) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO nurses (id, first_name, last_name, email) VALUES (?1, ?2, ?3, ?4)",
        params![
            nurse.id.to_string(),
            nurse.first_name,
            nurse.last_name,
            nurse.email,
        ],
    )?;
    Ok(())
}
