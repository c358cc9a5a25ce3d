use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{IncidentSeverity, IncidentStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentReport {
    pub id: Uuid,
    pub student_id: Uuid,
    pub reported_by: Option<Uuid>,
    pub incident_type: String,
    pub severity: IncidentSeverity,
    pub status: IncidentStatus,
    pub description: String,
    pub occurred_at: NaiveDateTime,
}
