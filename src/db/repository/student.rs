use rusqlite::{params, Connection};

use crate::db::{to_sql_timestamp, DatabaseError, DATE_FORMAT};
use crate::models::*;

pub fn insert_student(conn: &Connection, student: &Student) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO students (id, student_number, first_name, last_name, grade, date_of_birth,
                               school_id, district_id, enrollment_date, is_active, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            student.id.to_string(),
            student.student_number,
            student.first_name,
            student.last_name,
            student.grade,
            student.date_of_birth.map(|d| d.format(DATE_FORMAT).to_string()),
            student.school_id,
            student.district_id,
            to_sql_timestamp(&student.enrollment_date),
            student.is_active as i32,
            to_sql_timestamp(&student.created_at),
        ],
    )?;
    Ok(())
}
