use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::AllergySeverity;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Allergy {
    pub id: Uuid,
    pub student_id: Uuid,
    pub allergen: String,
    pub severity: AllergySeverity,
    pub reaction: Option<String>,
    pub is_active: bool,
}
