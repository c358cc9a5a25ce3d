//! Builders for test rows. Times are relative to the real clock so that
//! queries bounded by "now" see them.

use chrono::{Duration, NaiveDateTime, Timelike, Utc};
use uuid::Uuid;

use crate::models::enums::*;
use crate::models::*;

/// Current UTC time truncated to whole seconds, matching stored precision.
pub fn now() -> NaiveDateTime {
    let now = Utc::now().naive_utc();
    now.with_nanosecond(0).unwrap_or(now)
}

pub fn days_ago(days: i64) -> NaiveDateTime {
    now() - Duration::days(days)
}

/// Negative values land in the future.
pub fn hours_ago(hours: i64) -> NaiveDateTime {
    now() - Duration::hours(hours)
}

pub fn student_named(first: &str, last: &str) -> Student {
    let id = Uuid::new_v4();
    Student {
        id,
        student_number: format!("S-{}", &id.simple().to_string()[..8]),
        first_name: first.into(),
        last_name: last.into(),
        grade: Some("5".into()),
        date_of_birth: None,
        school_id: None,
        district_id: None,
        enrollment_date: days_ago(400),
        is_active: true,
        created_at: days_ago(400),
    }
}

pub fn nurse_named(first: &str, last: &str) -> Nurse {
    Nurse {
        id: Uuid::new_v4(),
        first_name: first.into(),
        last_name: last.into(),
        email: None,
    }
}

pub fn medication_named(name: &str) -> Medication {
    Medication {
        id: Uuid::new_v4(),
        name: name.into(),
        generic_name: None,
        strength: Some("10mg".into()),
        dosage_form: Some("tablet".into()),
    }
}

pub fn prescription_for(
    student_id: Uuid,
    medication_id: Uuid,
    created_at: NaiveDateTime,
) -> StudentMedication {
    StudentMedication {
        id: Uuid::new_v4(),
        student_id,
        medication_id,
        dosage: "10mg".into(),
        frequency: "daily".into(),
        start_date: created_at.date(),
        end_date: None,
        is_active: true,
        created_at,
    }
}

pub fn administration_of(
    student_medication_id: Uuid,
    nurse_id: Option<Uuid>,
    administered_at: NaiveDateTime,
) -> MedicationLog {
    MedicationLog {
        id: Uuid::new_v4(),
        student_medication_id,
        nurse_id,
        dosage_given: "10mg".into(),
        administered_at,
        notes: None,
    }
}

pub fn incident_for(
    student_id: Uuid,
    severity: IncidentSeverity,
    status: IncidentStatus,
    occurred_at: NaiveDateTime,
) -> IncidentReport {
    IncidentReport {
        id: Uuid::new_v4(),
        student_id,
        reported_by: None,
        incident_type: "Injury".into(),
        severity,
        status,
        description: "Fell on the playground".into(),
        occurred_at,
    }
}

pub fn appointment_for(
    student_id: Uuid,
    nurse_id: Option<Uuid>,
    appointment_type: AppointmentType,
    scheduled_at: NaiveDateTime,
) -> Appointment {
    Appointment {
        id: Uuid::new_v4(),
        student_id,
        nurse_id,
        appointment_type,
        status: AppointmentStatus::Scheduled,
        reason: None,
        scheduled_at,
        duration_minutes: 30,
    }
}

pub fn allergy_for(student_id: Uuid, severity: AllergySeverity) -> Allergy {
    Allergy {
        id: Uuid::new_v4(),
        student_id,
        allergen: "Peanuts".into(),
        severity,
        reaction: Some("Anaphylaxis".into()),
        is_active: true,
    }
}
