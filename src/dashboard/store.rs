//! Read-side queries behind the dashboard.
//!
//! `DashboardStore` is the seam between the aggregation logic and SQLite:
//! the service fans calls out onto blocking tasks, so implementations must
//! be `Send + Sync` and open their own connections. The free functions
//! take a `&Connection` and carry the actual SQL.

use std::str::FromStr;

use chrono::{Duration, Months, NaiveDate, NaiveDateTime};
use rusqlite::{params, params_from_iter, Connection};
use serde::Serialize;

use crate::db::{parse_sql_timestamp, to_sql_timestamp, Database, DatabaseError, DATE_FORMAT};
use crate::models::enums::{AppointmentType, IncidentSeverity};

// ── Types ──────────────────────────────────────────────────────────────────

/// The nine counts behind a stats snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StatsMetric {
    ActiveStudents,
    ActiveMedications,
    TodaysAppointments,
    PendingIncidents,
    MedicationsDueToday,
    HealthAlerts,
    StudentsLastMonth,
    MedicationsLastMonth,
    AppointmentsLastMonth,
}

impl StatsMetric {
    pub const ALL: [StatsMetric; 9] = [
        StatsMetric::ActiveStudents,
        StatsMetric::ActiveMedications,
        StatsMetric::TodaysAppointments,
        StatsMetric::PendingIncidents,
        StatsMetric::MedicationsDueToday,
        StatsMetric::HealthAlerts,
        StatsMetric::StudentsLastMonth,
        StatsMetric::MedicationsLastMonth,
        StatsMetric::AppointmentsLastMonth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ActiveStudents => "active_students",
            Self::ActiveMedications => "active_medications",
            Self::TodaysAppointments => "todays_appointments",
            Self::PendingIncidents => "pending_incidents",
            Self::MedicationsDueToday => "medications_due_today",
            Self::HealthAlerts => "health_alerts",
            Self::StudentsLastMonth => "students_last_month",
            Self::MedicationsLastMonth => "medications_last_month",
            Self::AppointmentsLastMonth => "appointments_last_month",
        }
    }
}

/// The four per-day chart series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartSeries {
    Enrollment,
    MedicationAdministration,
    Incidents,
    Appointments,
}

impl ChartSeries {
    fn table_and_column(&self) -> (&'static str, &'static str) {
        match self {
            Self::Enrollment => ("students", "enrollment_date"),
            Self::MedicationAdministration => ("medication_logs", "administered_at"),
            Self::Incidents => ("incident_reports", "occurred_at"),
            Self::Appointments => ("appointments", "scheduled_at"),
        }
    }
}

/// One row of a `GROUP BY DATE(...)` aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: u64,
}

/// A medication administration with its joined context. Joined names are
/// `None` when the related row is missing.
#[derive(Debug, Clone)]
pub struct RecentAdministration {
    pub id: String,
    pub administered_at: NaiveDateTime,
    pub dosage_given: String,
    pub student_name: Option<String>,
    pub medication_name: Option<String>,
    pub nurse_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RecentIncident {
    pub id: String,
    pub occurred_at: NaiveDateTime,
    pub incident_type: String,
    pub severity: IncidentSeverity,
    pub student_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ScheduledAppointment {
    pub id: String,
    pub scheduled_at: NaiveDateTime,
    pub appointment_type: AppointmentType,
    pub reason: Option<String>,
    pub student_id: Option<String>,
    pub student_name: Option<String>,
    pub nurse_name: Option<String>,
}

// ── Store trait ────────────────────────────────────────────────────────────

/// Data source for the dashboard service.
pub trait DashboardStore: Send + Sync {
    /// Evaluate one stats metric relative to `now` (UTC).
    fn count(&self, metric: StatsMetric, now: NaiveDateTime) -> Result<u64, DatabaseError>;

    /// Most recent medication administrations, newest first.
    fn recent_administrations(
        &self,
        limit: u32,
    ) -> Result<Vec<RecentAdministration>, DatabaseError>;

    /// Most recent incident reports, newest first.
    fn recent_incidents(&self, limit: u32) -> Result<Vec<RecentIncident>, DatabaseError>;

    /// Scheduled appointments strictly after `now`, soonest first.
    fn upcoming_appointments(
        &self,
        now: NaiveDateTime,
        limit: u32,
    ) -> Result<Vec<ScheduledAppointment>, DatabaseError>;

    /// Per-day counts of `series` within `[since, until]`, oldest day first.
    fn daily_counts(
        &self,
        series: ChartSeries,
        since: NaiveDateTime,
        until: NaiveDateTime,
    ) -> Result<Vec<DailyCount>, DatabaseError>;
}

/// `DashboardStore` over the on-disk database; one connection per call.
pub struct SqliteDashboardStore {
    db: Database,
}

impl SqliteDashboardStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl DashboardStore for SqliteDashboardStore {
    fn count(&self, metric: StatsMetric, now: NaiveDateTime) -> Result<u64, DatabaseError> {
        count_metric(&self.db.connect()?, metric, now)
    }

    fn recent_administrations(
        &self,
        limit: u32,
    ) -> Result<Vec<RecentAdministration>, DatabaseError> {
        fetch_recent_administrations(&self.db.connect()?, limit)
    }

    fn recent_incidents(&self, limit: u32) -> Result<Vec<RecentIncident>, DatabaseError> {
        fetch_recent_incidents(&self.db.connect()?, limit)
    }

    fn upcoming_appointments(
        &self,
        now: NaiveDateTime,
        limit: u32,
    ) -> Result<Vec<ScheduledAppointment>, DatabaseError> {
        fetch_upcoming_appointments(&self.db.connect()?, now, limit)
    }

    fn daily_counts(
        &self,
        series: ChartSeries,
        since: NaiveDateTime,
        until: NaiveDateTime,
    ) -> Result<Vec<DailyCount>, DatabaseError> {
        fetch_daily_counts(&self.db.connect()?, series, since, until)
    }
}

// ── Counting queries ───────────────────────────────────────────────────────

/// The same instant one calendar month earlier (clamped to month end).
pub fn one_month_before(now: NaiveDateTime) -> NaiveDateTime {
    now.checked_sub_months(Months::new(1))
        .unwrap_or(now - Duration::days(30))
}

/// `[start, end)` of the UTC day containing `ts`, as stored text.
fn day_bounds(ts: NaiveDateTime) -> (String, String) {
    let start = ts.date().and_time(chrono::NaiveTime::MIN);
    let end = start + Duration::days(1);
    (to_sql_timestamp(&start), to_sql_timestamp(&end))
}

/// SQL plus positional parameters for one metric.
fn metric_query(metric: StatsMetric, now: NaiveDateTime) -> (&'static str, Vec<String>) {
    match metric {
        StatsMetric::ActiveStudents => (
            "SELECT COUNT(*) FROM students WHERE is_active = 1",
            vec![],
        ),
        StatsMetric::ActiveMedications => (
            "SELECT COUNT(*) FROM student_medications sm
             JOIN students s ON s.id = sm.student_id
             WHERE sm.is_active = 1 AND s.is_active = 1",
            vec![],
        ),
        StatsMetric::TodaysAppointments => {
            let (start, end) = day_bounds(now);
            (
                "SELECT COUNT(*) FROM appointments
                 WHERE scheduled_at >= ?1 AND scheduled_at < ?2 AND status != 'cancelled'",
                vec![start, end],
            )
        }
        StatsMetric::PendingIncidents => (
            "SELECT COUNT(*) FROM incident_reports WHERE status IN ('pending', 'under_review')",
            vec![],
        ),
        StatsMetric::MedicationsDueToday => {
            let (start, end) = day_bounds(now);
            (
                "SELECT COUNT(*) FROM student_medications sm
                 JOIN students s ON s.id = sm.student_id
                 WHERE sm.is_active = 1 AND s.is_active = 1
                   AND sm.start_date <= ?1
                   AND (sm.end_date IS NULL OR sm.end_date >= ?1)
                   AND NOT EXISTS (
                       SELECT 1 FROM medication_logs ml
                       WHERE ml.student_medication_id = sm.id
                         AND ml.administered_at >= ?2 AND ml.administered_at < ?3
                   )",
                vec![now.date().format(DATE_FORMAT).to_string(), start, end],
            )
        }
        StatsMetric::HealthAlerts => (
            "SELECT COUNT(*) FROM allergies a
             JOIN students s ON s.id = a.student_id
             WHERE a.is_active = 1 AND s.is_active = 1
               AND a.severity IN ('severe', 'life_threatening')",
            vec![],
        ),
        StatsMetric::StudentsLastMonth => (
            "SELECT COUNT(*) FROM students WHERE is_active = 1 AND created_at <= ?1",
            vec![to_sql_timestamp(&one_month_before(now))],
        ),
        StatsMetric::MedicationsLastMonth => (
            "SELECT COUNT(*) FROM student_medications sm
             JOIN students s ON s.id = sm.student_id
             WHERE sm.is_active = 1 AND s.is_active = 1 AND sm.created_at <= ?1",
            vec![to_sql_timestamp(&one_month_before(now))],
        ),
        StatsMetric::AppointmentsLastMonth => {
            let (start, end) = day_bounds(one_month_before(now));
            (
                "SELECT COUNT(*) FROM appointments
                 WHERE scheduled_at >= ?1 AND scheduled_at < ?2 AND status != 'cancelled'",
                vec![start, end],
            )
        }
    }
}

/// Evaluate one stats metric.
pub fn count_metric(
    conn: &Connection,
    metric: StatsMetric,
    now: NaiveDateTime,
) -> Result<u64, DatabaseError> {
    let (sql, args) = metric_query(metric, now);
    let count: i64 = conn.query_row(sql, params_from_iter(args.iter()), |row| row.get(0))?;
    Ok(count.max(0) as u64)
}

// ── Activity queries ───────────────────────────────────────────────────────

fn join_name(first: Option<String>, last: Option<String>) -> Option<String> {
    match (first, last) {
        (Some(first), Some(last)) => Some(format!("{first} {last}")),
        _ => None,
    }
}

pub fn fetch_recent_administrations(
    conn: &Connection,
    limit: u32,
) -> Result<Vec<RecentAdministration>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT ml.id, ml.administered_at, ml.dosage_given,
                s.first_name, s.last_name, m.name,
                n.first_name, n.last_name
         FROM medication_logs ml
         LEFT JOIN student_medications sm ON sm.id = ml.student_medication_id
         LEFT JOIN students s ON s.id = sm.student_id
         LEFT JOIN medications m ON m.id = sm.medication_id
         LEFT JOIN nurses n ON n.id = ml.nurse_id
         ORDER BY ml.administered_at DESC
         LIMIT ?1",
    )?;

    let rows = stmt.query_map(params![limit], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, Option<String>>(3)?,
            row.get::<_, Option<String>>(4)?,
            row.get::<_, Option<String>>(5)?,
            row.get::<_, Option<String>>(6)?,
            row.get::<_, Option<String>>(7)?,
        ))
    })?;

    let mut records = Vec::new();
    for row in rows {
        let (id, administered_at, dosage_given, s_first, s_last, medication, n_first, n_last) =
            row?;
        records.push(RecentAdministration {
            id,
            administered_at: parse_sql_timestamp(&administered_at)?,
            dosage_given,
            student_name: join_name(s_first, s_last),
            medication_name: medication,
            nurse_name: join_name(n_first, n_last),
        });
    }
    Ok(records)
}

pub fn fetch_recent_incidents(
    conn: &Connection,
    limit: u32,
) -> Result<Vec<RecentIncident>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT ir.id, ir.occurred_at, ir.incident_type, ir.severity,
                s.first_name, s.last_name
         FROM incident_reports ir
         LEFT JOIN students s ON s.id = ir.student_id
         ORDER BY ir.occurred_at DESC
         LIMIT ?1",
    )?;

    let rows = stmt.query_map(params![limit], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, Option<String>>(4)?,
            row.get::<_, Option<String>>(5)?,
        ))
    })?;

    let mut records = Vec::new();
    for row in rows {
        let (id, occurred_at, incident_type, severity, first, last) = row?;
        records.push(RecentIncident {
            id,
            occurred_at: parse_sql_timestamp(&occurred_at)?,
            incident_type,
            severity: IncidentSeverity::from_str(&severity)?,
            student_name: join_name(first, last),
        });
    }
    Ok(records)
}

pub fn fetch_upcoming_appointments(
    conn: &Connection,
    now: NaiveDateTime,
    limit: u32,
) -> Result<Vec<ScheduledAppointment>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT a.id, a.scheduled_at, a.appointment_type, a.reason,
                s.id, s.first_name, s.last_name,
                n.first_name, n.last_name
         FROM appointments a
         LEFT JOIN students s ON s.id = a.student_id
         LEFT JOIN nurses n ON n.id = a.nurse_id
         WHERE a.status = 'scheduled' AND a.scheduled_at > ?1
         ORDER BY a.scheduled_at ASC
         LIMIT ?2",
    )?;

    let rows = stmt.query_map(params![to_sql_timestamp(&now), limit], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, Option<String>>(3)?,
            row.get::<_, Option<String>>(4)?,
            row.get::<_, Option<String>>(5)?,
            row.get::<_, Option<String>>(6)?,
            row.get::<_, Option<String>>(7)?,
            row.get::<_, Option<String>>(8)?,
        ))
    })?;

    let mut records = Vec::new();
    for row in rows {
        let (
            id,
            scheduled_at,
            appointment_type,
            reason,
            student_id,
            s_first,
            s_last,
            n_first,
            n_last,
        ) = row?;
        records.push(ScheduledAppointment {
            id,
            scheduled_at: parse_sql_timestamp(&scheduled_at)?,
            appointment_type: AppointmentType::from_str(&appointment_type)?,
            reason,
            student_id,
            student_name: join_name(s_first, s_last),
            nurse_name: join_name(n_first, n_last),
        });
    }
    Ok(records)
}

// ── Chart queries ──────────────────────────────────────────────────────────

pub fn fetch_daily_counts(
    conn: &Connection,
    series: ChartSeries,
    since: NaiveDateTime,
    until: NaiveDateTime,
) -> Result<Vec<DailyCount>, DatabaseError> {
    let (table, column) = series.table_and_column();
    let sql = format!(
        "SELECT DATE({column}) AS day, COUNT(*) FROM {table}
         WHERE {column} >= ?1 AND {column} <= ?2
         GROUP BY DATE({column})
         ORDER BY day ASC"
    );
    let mut stmt = conn.prepare(&sql)?;

    let rows = stmt.query_map(
        params![to_sql_timestamp(&since), to_sql_timestamp(&until)],
        |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)),
    )?;

    let mut counts = Vec::new();
    for row in rows {
        let (day, count) = row?;
        let date = NaiveDate::parse_from_str(&day, DATE_FORMAT)
            .map_err(|e| DatabaseError::ConstraintViolation(format!("bad date '{day}': {e}")))?;
        counts.push(DailyCount {
            date,
            count: count.max(0) as u64,
        });
    }
    Ok(counts)
}

// ── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::fixtures::*;
    use crate::db::repository::*;
    use crate::db::sqlite::open_memory_database;
    use crate::models::enums::*;

    fn seeded_student(conn: &Connection, first: &str) -> crate::models::Student {
        let student = student_named(first, "Test");
        insert_student(conn, &student).unwrap();
        student
    }

    #[test]
    fn empty_database_counts_zero() {
        let conn = open_memory_database().unwrap();
        for metric in StatsMetric::ALL {
            assert_eq!(count_metric(&conn, metric, now()).unwrap(), 0, "{}", metric.as_str());
        }
    }

    #[test]
    fn active_students_excludes_inactive() {
        let conn = open_memory_database().unwrap();
        seeded_student(&conn, "A");
        let mut inactive = student_named("B", "Test");
        inactive.is_active = false;
        insert_student(&conn, &inactive).unwrap();

        assert_eq!(count_metric(&conn, StatsMetric::ActiveStudents, now()).unwrap(), 1);
    }

    #[test]
    fn student_baseline_counts_only_older_rows() {
        let conn = open_memory_database().unwrap();
        seeded_student(&conn, "Old");
        let mut fresh = student_named("New", "Test");
        fresh.created_at = days_ago(3);
        insert_student(&conn, &fresh).unwrap();

        assert_eq!(count_metric(&conn, StatsMetric::ActiveStudents, now()).unwrap(), 2);
        assert_eq!(count_metric(&conn, StatsMetric::StudentsLastMonth, now()).unwrap(), 1);
    }

    #[test]
    fn medication_counts_and_due_today() {
        let conn = open_memory_database().unwrap();
        let student = seeded_student(&conn, "A");
        let medication = medication_named("Insulin");
        insert_medication(&conn, &medication).unwrap();

        let given = prescription_for(student.id, medication.id, days_ago(60));
        let pending = prescription_for(student.id, medication.id, days_ago(2));
        let mut stopped = prescription_for(student.id, medication.id, days_ago(90));
        stopped.is_active = false;
        for p in [&given, &pending, &stopped] {
            insert_student_medication(&conn, p).unwrap();
        }
        insert_medication_log(&conn, &administration_of(given.id, None, now())).unwrap();

        let at = now();
        assert_eq!(count_metric(&conn, StatsMetric::ActiveMedications, at).unwrap(), 2);
        assert_eq!(count_metric(&conn, StatsMetric::MedicationsLastMonth, at).unwrap(), 1);
        assert_eq!(count_metric(&conn, StatsMetric::MedicationsDueToday, at).unwrap(), 1);
    }

    #[test]
    fn due_today_respects_end_date() {
        let conn = open_memory_database().unwrap();
        let student = seeded_student(&conn, "A");
        let medication = medication_named("Amoxicillin");
        insert_medication(&conn, &medication).unwrap();

        let mut finished = prescription_for(student.id, medication.id, days_ago(20));
        finished.end_date = Some(days_ago(5).date());
        insert_student_medication(&conn, &finished).unwrap();

        assert_eq!(count_metric(&conn, StatsMetric::MedicationsDueToday, now()).unwrap(), 0);
    }

    #[test]
    fn todays_appointments_skip_cancelled_and_other_days() {
        let conn = open_memory_database().unwrap();
        let student = seeded_student(&conn, "A");
        let today_noon = now().date().and_hms_opt(12, 0, 0).unwrap();

        insert_appointment(
            &conn,
            &appointment_for(student.id, None, AppointmentType::Screening, today_noon),
        )
        .unwrap();
        let mut cancelled =
            appointment_for(student.id, None, AppointmentType::Screening, today_noon);
        cancelled.status = AppointmentStatus::Cancelled;
        insert_appointment(&conn, &cancelled).unwrap();
        insert_appointment(
            &conn,
            &appointment_for(
                student.id,
                None,
                AppointmentType::Screening,
                today_noon + Duration::days(1),
            ),
        )
        .unwrap();
        insert_appointment(
            &conn,
            &appointment_for(
                student.id,
                None,
                AppointmentType::FollowUp,
                one_month_before(today_noon),
            ),
        )
        .unwrap();

        let at = today_noon;
        assert_eq!(count_metric(&conn, StatsMetric::TodaysAppointments, at).unwrap(), 1);
        assert_eq!(count_metric(&conn, StatsMetric::AppointmentsLastMonth, at).unwrap(), 1);
    }

    #[test]
    fn pending_incidents_include_under_review() {
        let conn = open_memory_database().unwrap();
        let student = seeded_student(&conn, "A");
        for status in [
            IncidentStatus::Pending,
            IncidentStatus::UnderReview,
            IncidentStatus::Resolved,
            IncidentStatus::Closed,
        ] {
            insert_incident(
                &conn,
                &incident_for(student.id, IncidentSeverity::Low, status, hours_ago(1)),
            )
            .unwrap();
        }
        assert_eq!(count_metric(&conn, StatsMetric::PendingIncidents, now()).unwrap(), 2);
    }

    #[test]
    fn health_alerts_require_severe_active_allergy_of_active_student() {
        let conn = open_memory_database().unwrap();
        let active = seeded_student(&conn, "A");
        let mut withdrawn = student_named("B", "Test");
        withdrawn.is_active = false;
        insert_student(&conn, &withdrawn).unwrap();

        insert_allergy(&conn, &allergy_for(active.id, AllergySeverity::LifeThreatening)).unwrap();
        insert_allergy(&conn, &allergy_for(active.id, AllergySeverity::Severe)).unwrap();
        insert_allergy(&conn, &allergy_for(active.id, AllergySeverity::Mild)).unwrap();
        insert_allergy(&conn, &allergy_for(withdrawn.id, AllergySeverity::Severe)).unwrap();
        let mut resolved = allergy_for(active.id, AllergySeverity::Severe);
        resolved.is_active = false;
        insert_allergy(&conn, &resolved).unwrap();

        assert_eq!(count_metric(&conn, StatsMetric::HealthAlerts, now()).unwrap(), 2);
    }

    #[test]
    fn recent_administrations_newest_first_with_joins() {
        let conn = open_memory_database().unwrap();
        let student = seeded_student(&conn, "Ada");
        let nurse = nurse_named("Mary", "Seacole");
        insert_nurse(&conn, &nurse).unwrap();
        let medication = medication_named("Albuterol");
        insert_medication(&conn, &medication).unwrap();
        let prescription = prescription_for(student.id, medication.id, days_ago(5));
        insert_student_medication(&conn, &prescription).unwrap();

        let unattended = administration_of(prescription.id, None, hours_ago(5));
        insert_medication_log(&conn, &unattended).unwrap();
        let attended = administration_of(prescription.id, Some(nurse.id), hours_ago(1));
        insert_medication_log(&conn, &attended).unwrap();

        let records = fetch_recent_administrations(&conn, 3).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].administered_at > records[1].administered_at);
        assert_eq!(records[0].student_name.as_deref(), Some("Ada Test"));
        assert_eq!(records[0].medication_name.as_deref(), Some("Albuterol"));
        assert_eq!(records[0].nurse_name.as_deref(), Some("Mary Seacole"));
        assert!(records[1].nurse_name.is_none());
    }

    #[test]
    fn upcoming_appointments_only_future_scheduled() {
        let conn = open_memory_database().unwrap();
        let student = seeded_student(&conn, "A");
        let later = appointment_for(student.id, None, AppointmentType::FollowUp, hours_ago(-5));
        let sooner = appointment_for(student.id, None, AppointmentType::Screening, hours_ago(-1));
        let past = appointment_for(student.id, None, AppointmentType::Screening, hours_ago(2));
        let mut done = appointment_for(student.id, None, AppointmentType::Screening, hours_ago(-2));
        done.status = AppointmentStatus::Completed;
        for a in [&later, &sooner, &past, &done] {
            insert_appointment(&conn, a).unwrap();
        }

        let records = fetch_upcoming_appointments(&conn, now(), 10).unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids, vec![sooner.id.to_string(), later.id.to_string()]);
        assert_eq!(records[0].student_id.as_deref(), Some(student.id.to_string().as_str()));
    }

    #[test]
    fn daily_counts_group_by_day_within_window() {
        let conn = open_memory_database().unwrap();
        let student = seeded_student(&conn, "A");
        let base = now().date().and_hms_opt(9, 0, 0).unwrap() - Duration::days(1);

        for offset in [0, 1] {
            insert_incident(
                &conn,
                &incident_for(
                    student.id,
                    IncidentSeverity::Low,
                    IncidentStatus::Resolved,
                    base + Duration::hours(offset),
                ),
            )
            .unwrap();
        }
        insert_incident(
            &conn,
            &incident_for(
                student.id,
                IncidentSeverity::Low,
                IncidentStatus::Resolved,
                base - Duration::days(3),
            ),
        )
        .unwrap();
        // Outside the window
        insert_incident(
            &conn,
            &incident_for(
                student.id,
                IncidentSeverity::Low,
                IncidentStatus::Resolved,
                base - Duration::days(30),
            ),
        )
        .unwrap();

        let counts =
            fetch_daily_counts(&conn, ChartSeries::Incidents, now() - Duration::days(7), now())
                .unwrap();
        assert_eq!(
            counts,
            vec![
                DailyCount { date: (base - Duration::days(3)).date(), count: 1 },
                DailyCount { date: base.date(), count: 2 },
            ]
        );
    }

    #[test]
    fn one_month_before_clamps_to_month_end() {
        let march_31 = NaiveDate::from_ymd_opt(2025, 3, 31)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let expected = NaiveDate::from_ymd_opt(2025, 2, 28)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        assert_eq!(one_month_before(march_31), expected);
    }
}
