use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: Uuid,
    pub student_number: String,
    pub first_name: String,
    pub last_name: String,
    pub grade: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub school_id: Option<String>,
    pub district_id: Option<String>,
    pub enrollment_date: NaiveDateTime,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}
