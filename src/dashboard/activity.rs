//! Recent-activity feed: medication administrations, incidents and the
//! next appointments, rendered as display-ready items.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::store::{RecentAdministration, RecentIncident, ScheduledAppointment};

/// Rows fetched per stream. The feed is the concatenation of the three
/// streams in this order, truncated to the requested limit.
pub const MEDICATION_STREAM_LIMIT: u32 = 3;
pub const INCIDENT_STREAM_LIMIT: u32 = 2;
pub const APPOINTMENT_STREAM_LIMIT: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Medication,
    Incident,
    Appointment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    Completed,
    Pending,
    Warning,
    Upcoming,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub message: String,
    pub time: String,
    pub status: ActivityStatus,
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

/// Human-friendly distance between `ts` and `now`, e.g. `"3 hours ago"`
/// or `"in 2 days"`. Uses the largest whole unit.
pub fn format_relative_time(ts: NaiveDateTime, now: NaiveDateTime) -> String {
    let (delta, future) = if ts > now {
        (ts - now, true)
    } else {
        (now - ts, false)
    };

    let amount = if delta.num_days() > 0 {
        Some(plural(delta.num_days(), "day"))
    } else if delta.num_hours() > 0 {
        Some(plural(delta.num_hours(), "hour"))
    } else if delta.num_minutes() > 0 {
        Some(plural(delta.num_minutes(), "minute"))
    } else {
        None
    };

    match (amount, future) {
        (Some(amount), true) => format!("in {amount}"),
        (Some(amount), false) => format!("{amount} ago"),
        (None, true) => "Now".to_string(),
        (None, false) => "Just now".to_string(),
    }
}

/// `None` when the student or medication row is gone.
pub fn medication_activity(
    record: &RecentAdministration,
    now: NaiveDateTime,
) -> Option<ActivityItem> {
    let student = record.student_name.as_deref()?;
    let medication = record.medication_name.as_deref()?;
    let dose = &record.dosage_given;
    let message = match &record.nurse_name {
        Some(nurse) => format!("{medication} ({dose}) administered to {student} by {nurse}"),
        None => format!("{medication} ({dose}) administered to {student}"),
    };

    Some(ActivityItem {
        id: record.id.clone(),
        kind: ActivityKind::Medication,
        message,
        time: format_relative_time(record.administered_at, now),
        status: ActivityStatus::Completed,
    })
}

pub fn incident_activity(record: &RecentIncident, now: NaiveDateTime) -> Option<ActivityItem> {
    let student = record.student_name.as_deref()?;
    let status = if record.severity.is_elevated() {
        ActivityStatus::Warning
    } else {
        ActivityStatus::Pending
    };

    Some(ActivityItem {
        id: record.id.clone(),
        kind: ActivityKind::Incident,
        message: format!(
            "{} incident reported for {student} ({} severity)",
            record.incident_type,
            record.severity.as_str()
        ),
        time: format_relative_time(record.occurred_at, now),
        status,
    })
}

pub fn appointment_activity(
    record: &ScheduledAppointment,
    now: NaiveDateTime,
) -> Option<ActivityItem> {
    let student = record.student_name.as_deref()?;

    Some(ActivityItem {
        id: record.id.clone(),
        kind: ActivityKind::Appointment,
        message: format!("{} scheduled for {student}", record.appointment_type.label()),
        time: format_relative_time(record.scheduled_at, now),
        status: ActivityStatus::Upcoming,
    })
}

/// Concatenate the three streams in order, skipping orphaned records, and
/// cut to `limit`.
pub fn build_feed(
    administrations: &[RecentAdministration],
    incidents: &[RecentIncident],
    appointments: &[ScheduledAppointment],
    limit: usize,
    now: NaiveDateTime,
) -> Vec<ActivityItem> {
    administrations
        .iter()
        .filter_map(|r| medication_activity(r, now))
        .chain(incidents.iter().filter_map(|r| incident_activity(r, now)))
        .chain(appointments.iter().filter_map(|r| appointment_activity(r, now)))
        .take(limit)
        .collect()
}
