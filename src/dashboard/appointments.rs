use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

use super::activity::format_relative_time;
use super::store::ScheduledAppointment;
use crate::models::enums::AppointmentType;

pub const DEFAULT_UPCOMING_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentPriority {
    High,
    Medium,
    Low,
}

/// Emergencies and anything within the hour are high; within a day, medium.
pub fn classify_priority(
    appointment_type: AppointmentType,
    scheduled_at: NaiveDateTime,
    now: NaiveDateTime,
) -> AppointmentPriority {
    let until = scheduled_at - now;
    if appointment_type == AppointmentType::Emergency || until <= Duration::minutes(60) {
        AppointmentPriority::High
    } else if until <= Duration::hours(24) {
        AppointmentPriority::Medium
    } else {
        AppointmentPriority::Low
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingAppointment {
    pub id: String,
    pub student_id: String,
    pub student: String,
    #[serde(rename = "type")]
    pub appointment_type: String,
    pub scheduled_at: String,
    pub time: String,
    pub nurse: Option<String>,
    pub reason: Option<String>,
    pub priority: AppointmentPriority,
}

/// `None` when the student row is gone.
pub fn to_upcoming(
    record: &ScheduledAppointment,
    now: NaiveDateTime,
) -> Option<UpcomingAppointment> {
    let student_id = record.student_id.clone()?;
    let student = record.student_name.clone()?;

    Some(UpcomingAppointment {
        id: record.id.clone(),
        student_id,
        student,
        appointment_type: record.appointment_type.label().to_string(),
        scheduled_at: record.scheduled_at.and_utc().to_rfc3339(),
        time: format_relative_time(record.scheduled_at, now),
        nurse: record.nurse_name.clone(),
        reason: record.reason.clone(),
        priority: classify_priority(record.appointment_type, record.scheduled_at, now),
    })
}
