use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::Allergy;

pub fn insert_allergy(conn: &Connection, allergy: &Allergy) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO allergies (id, student_id, allergen, severity, reaction, is_active)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            allergy.id.to_string(),
            allergy.student_id.to_string(),
            allergy.allergen,
            allergy.severity.as_str(),
            allergy.reaction,
            allergy.is_active as i32,
        ],
    )?;
    Ok(())
}
