//! Dashboard service: cached stats, activity feed, upcoming appointments
//! and chart series over the clinic database.

pub mod activity;
pub mod appointments;
pub mod cache;
pub mod chart;
pub mod stats;
pub mod store;

pub use activity::{ActivityItem, ActivityKind, ActivityStatus};
pub use appointments::{AppointmentPriority, UpcomingAppointment};
pub use cache::StatsCache;
pub use chart::{ChartData, ChartPeriod, ChartPoint};
pub use stats::{ChangeType, StatsSnapshot, TrendMetric};
pub use store::{DashboardStore, SqliteDashboardStore, StatsMetric};

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDateTime, Utc};
use thiserror::Error;

use crate::db::DatabaseError;
use activity::{APPOINTMENT_STREAM_LIMIT, INCIDENT_STREAM_LIMIT, MEDICATION_STREAM_LIMIT};
use store::ChartSeries;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Background task failed: {0}")]
    Task(String),
}

/// Entry point for every dashboard read.
pub struct DashboardService {
    store: Arc<dyn DashboardStore>,
    cache: StatsCache,
}

impl DashboardService {
    pub fn new(store: Arc<dyn DashboardStore>, cache_ttl: Duration) -> Self {
        Self {
            store,
            cache: StatsCache::new(cache_ttl),
        }
    }

    pub fn cache(&self) -> &StatsCache {
        &self.cache
    }

    /// Cached snapshot when fresh, otherwise a new one from nine parallel
    /// counting queries. Individual query failures read as zero, so this
    /// never fails.
    pub async fn get_dashboard_stats(&self) -> Arc<StatsSnapshot> {
        if let Some(cached) = self.cache.get() {
            tracing::debug!("Stats cache hit");
            return cached;
        }
        tracing::debug!("Stats cache miss, querying");

        let generated_at = Utc::now();
        let counts =
            stats::collect_metric_counts(Arc::clone(&self.store), generated_at.naive_utc()).await;
        if counts.evaluated() < StatsMetric::ALL.len() {
            tracing::warn!(
                evaluated = counts.evaluated(),
                total = StatsMetric::ALL.len(),
                "Stats snapshot built with degraded metrics"
            );
        }

        let snapshot = Arc::new(stats::assemble_snapshot(&counts, generated_at));
        self.cache.store(Arc::clone(&snapshot));
        snapshot
    }

    /// Scope filtering is not applied yet: both parameters are recorded
    /// and the unscoped snapshot is returned.
    pub async fn get_dashboard_stats_by_scope(
        &self,
        school_id: Option<&str>,
        district_id: Option<&str>,
    ) -> Arc<StatsSnapshot> {
        tracing::info!(
            ?school_id,
            ?district_id,
            "Scoped stats requested, returning unscoped snapshot"
        );
        self.get_dashboard_stats().await
    }

    pub async fn get_recent_activities(
        &self,
        limit: usize,
    ) -> Result<Vec<ActivityItem>, DashboardError> {
        let now = Utc::now().naive_utc();
        let (administrations, incidents, appointments) = tokio::try_join!(
            self.run_blocking(|s| s.recent_administrations(MEDICATION_STREAM_LIMIT)),
            self.run_blocking(|s| s.recent_incidents(INCIDENT_STREAM_LIMIT)),
            self.run_blocking(move |s| s.upcoming_appointments(now, APPOINTMENT_STREAM_LIMIT)),
        )?;

        Ok(activity::build_feed(&administrations, &incidents, &appointments, limit, now))
    }

    pub async fn get_upcoming_appointments(
        &self,
        limit: usize,
    ) -> Result<Vec<UpcomingAppointment>, DashboardError> {
        let now = Utc::now().naive_utc();
        let fetch_limit = u32::try_from(limit).unwrap_or(u32::MAX);
        let records = self
            .run_blocking(move |s| s.upcoming_appointments(now, fetch_limit))
            .await?;

        Ok(records
            .iter()
            .filter_map(|r| appointments::to_upcoming(r, now))
            .collect())
    }

    pub async fn get_chart_data(&self, period: ChartPeriod) -> Result<ChartData, DashboardError> {
        let now = Utc::now().naive_utc();
        let since = period.window_start(now);

        let (enrollment, administration, incidents, appointments) = tokio::try_join!(
            self.series(ChartSeries::Enrollment, since, now),
            self.series(ChartSeries::MedicationAdministration, since, now),
            self.series(ChartSeries::Incidents, since, now),
            self.series(ChartSeries::Appointments, since, now),
        )?;

        Ok(ChartData {
            enrollment_trend: chart::to_points(&enrollment, period),
            medication_administration: chart::to_points(&administration, period),
            incident_frequency: chart::to_points(&incidents, period),
            appointment_trends: chart::to_points(&appointments, period),
        })
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
        tracing::info!("Dashboard stats cache cleared");
    }

    async fn series(
        &self,
        series: ChartSeries,
        since: NaiveDateTime,
        until: NaiveDateTime,
    ) -> Result<Vec<store::DailyCount>, DashboardError> {
        self.run_blocking(move |s| s.daily_counts(series, since, until))
            .await
    }

    /// Run a store call on the blocking pool.
    async fn run_blocking<T, F>(&self, f: F) -> Result<T, DashboardError>
    where
        F: FnOnce(&dyn DashboardStore) -> Result<T, DatabaseError> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || f(store.as_ref()))
            .await
            .map_err(|e| DashboardError::Task(e.to_string()))?
            .map_err(DashboardError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::fixtures::*;
    use crate::db::repository::*;
    use crate::db::Database;
    use crate::models::enums::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use super::store::{DailyCount, RecentAdministration, RecentIncident, ScheduledAppointment};

    fn temp_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("dashboard.db")).unwrap();
        (dir, db)
    }

    fn service_over(db: &Database) -> DashboardService {
        DashboardService::new(
            Arc::new(SqliteDashboardStore::new(db.clone())),
            Duration::from_secs(300),
        )
    }

    /// Delegates to SQLite but fails (or panics on) the chosen metric and
    /// counts calls.
    struct FlakyStore {
        inner: SqliteDashboardStore,
        failing: Option<StatsMetric>,
        panicking: Option<StatsMetric>,
        count_calls: AtomicUsize,
    }

    impl FlakyStore {
        fn new(db: &Database, failing: Option<StatsMetric>) -> Self {
            Self {
                inner: SqliteDashboardStore::new(db.clone()),
                failing,
                panicking: None,
                count_calls: AtomicUsize::new(0),
            }
        }

        fn panicking_on(db: &Database, metric: StatsMetric) -> Self {
            Self {
                panicking: Some(metric),
                ..Self::new(db, None)
            }
        }
    }

    impl DashboardStore for FlakyStore {
        fn count(&self, metric: StatsMetric, now: NaiveDateTime) -> Result<u64, DatabaseError> {
            self.count_calls.fetch_add(1, Ordering::SeqCst);
            if self.failing == Some(metric) {
                return Err(DatabaseError::ConstraintViolation("no such table: allergies".into()));
            }
            if self.panicking == Some(metric) {
                panic!("allergy join blew up");
            }
            self.inner.count(metric, now)
        }

        fn recent_administrations(
            &self,
            limit: u32,
        ) -> Result<Vec<RecentAdministration>, DatabaseError> {
            self.inner.recent_administrations(limit)
        }

        fn recent_incidents(&self, limit: u32) -> Result<Vec<RecentIncident>, DatabaseError> {
            self.inner.recent_incidents(limit)
        }

        fn upcoming_appointments(
            &self,
            now: NaiveDateTime,
            limit: u32,
        ) -> Result<Vec<ScheduledAppointment>, DatabaseError> {
            self.inner.upcoming_appointments(now, limit)
        }

        fn daily_counts(
            &self,
            series: ChartSeries,
            since: NaiveDateTime,
            until: NaiveDateTime,
        ) -> Result<Vec<DailyCount>, DatabaseError> {
            Err(DatabaseError::NotFound {
                entity_type: "chart series".into(),
                id: format!("{series:?} {since}..{until}"),
            })
        }
    }

    fn seed_clinic(db: &Database) {
        let conn = db.connect().unwrap();
        let nurse = nurse_named("Mary", "Seacole");
        insert_nurse(&conn, &nurse).unwrap();
        let medication = medication_named("Albuterol");
        insert_medication(&conn, &medication).unwrap();

        for name in ["Ada", "Ben", "Cleo"] {
            let student = student_named(name, "Park");
            insert_student(&conn, &student).unwrap();
            let prescription = prescription_for(student.id, medication.id, days_ago(60));
            insert_student_medication(&conn, &prescription).unwrap();
            insert_medication_log(
                &conn,
                &administration_of(prescription.id, Some(nurse.id), now()),
            )
            .unwrap();
            insert_allergy(&conn, &allergy_for(student.id, AllergySeverity::Severe)).unwrap();
            let incident = incident_for(
                student.id,
                IncidentSeverity::High,
                IncidentStatus::Pending,
                hours_ago(3),
            );
            insert_incident(&conn, &incident).unwrap();
            let appointment = appointment_for(
                student.id,
                Some(nurse.id),
                AppointmentType::Screening,
                hours_ago(-4),
            );
            insert_appointment(&conn, &appointment).unwrap();
        }
    }

    #[tokio::test]
    async fn empty_database_yields_zero_snapshot() {
        let (_dir, db) = temp_db();
        let stats = service_over(&db).get_dashboard_stats().await;

        assert_eq!(stats.total_students, 0);
        assert_eq!(stats.health_alerts, 0);
        for trend in [&stats.student_trend, &stats.medication_trend, &stats.appointment_trend] {
            assert_eq!(trend.change, "0%");
            assert_eq!(trend.change_type, ChangeType::Neutral);
        }
    }

    #[tokio::test]
    async fn stats_reflect_seeded_rows() {
        let (_dir, db) = temp_db();
        seed_clinic(&db);
        let stats = service_over(&db).get_dashboard_stats().await;

        assert_eq!(stats.total_students, 3);
        assert_eq!(stats.active_medications, 3);
        assert_eq!(stats.pending_incidents, 3);
        assert_eq!(stats.health_alerts, 3);
        assert_eq!(stats.medications_due_today, 0);
        assert_eq!(stats.student_trend.change_type, ChangeType::Neutral);
    }

    #[tokio::test]
    async fn one_failing_metric_degrades_to_zero() {
        let (_dir, db) = temp_db();
        seed_clinic(&db);
        let store = Arc::new(FlakyStore::new(&db, Some(StatsMetric::HealthAlerts)));
        let service = DashboardService::new(store, Duration::from_secs(300));

        let stats = service.get_dashboard_stats().await;
        assert_eq!(stats.health_alerts, 0);
        assert_eq!(stats.total_students, 3);
        assert_eq!(stats.pending_incidents, 3);
    }

    #[tokio::test]
    async fn panicking_metric_task_degrades_to_zero() {
        let (_dir, db) = temp_db();
        seed_clinic(&db);
        let store = Arc::new(FlakyStore::panicking_on(&db, StatsMetric::HealthAlerts));
        let service = DashboardService::new(store.clone(), Duration::from_secs(300));

        let stats = service.get_dashboard_stats().await;
        assert_eq!(stats.health_alerts, 0);
        assert_eq!(stats.total_students, 3);
        assert_eq!(stats.active_medications, 3);
        assert_eq!(store.count_calls.load(Ordering::SeqCst), StatsMetric::ALL.len());
    }

    #[tokio::test]
    async fn second_call_within_ttl_is_cached() {
        let (_dir, db) = temp_db();
        let store = Arc::new(FlakyStore::new(&db, None));
        let service = DashboardService::new(store.clone(), Duration::from_secs(300));

        let first = service.get_dashboard_stats().await;
        let second = service.get_dashboard_stats().await;
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.last_updated, second.last_updated);
        assert_eq!(store.count_calls.load(Ordering::SeqCst), StatsMetric::ALL.len());
    }

    #[tokio::test]
    async fn clear_and_expiry_force_requery() {
        let (_dir, db) = temp_db();
        let store = Arc::new(FlakyStore::new(&db, None));
        let service = DashboardService::new(store.clone(), Duration::from_millis(50));
        let per_refresh = StatsMetric::ALL.len();

        service.get_dashboard_stats().await;
        service.clear_cache();
        service.get_dashboard_stats().await;
        assert_eq!(store.count_calls.load(Ordering::SeqCst), 2 * per_refresh);

        tokio::time::sleep(Duration::from_millis(80)).await;
        service.get_dashboard_stats().await;
        assert_eq!(store.count_calls.load(Ordering::SeqCst), 3 * per_refresh);
    }

    #[tokio::test]
    async fn scoped_stats_match_unscoped() {
        let (_dir, db) = temp_db();
        seed_clinic(&db);
        let service = service_over(&db);

        let scoped = service
            .get_dashboard_stats_by_scope(Some("school-1"), Some("district-9"))
            .await;
        let unscoped = service.get_dashboard_stats().await;
        assert!(Arc::ptr_eq(&scoped, &unscoped));
    }

    #[tokio::test]
    async fn activity_feed_respects_limit_and_order() {
        let (_dir, db) = temp_db();
        seed_clinic(&db);
        let service = service_over(&db);

        let feed = service.get_recent_activities(10).await.unwrap();
        let kinds: Vec<_> = feed.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ActivityKind::Medication,
                ActivityKind::Medication,
                ActivityKind::Medication,
                ActivityKind::Incident,
                ActivityKind::Incident,
                ActivityKind::Appointment,
                ActivityKind::Appointment,
            ]
        );
        assert!(feed[0].message.contains("by Mary Seacole"));
        assert_eq!(feed[3].status, ActivityStatus::Warning);

        for limit in 1..=7 {
            assert!(service.get_recent_activities(limit).await.unwrap().len() <= limit);
        }
    }

    #[tokio::test]
    async fn upcoming_appointments_carry_priority() {
        let (_dir, db) = temp_db();
        seed_clinic(&db);
        let upcoming = service_over(&db).get_upcoming_appointments(2).await.unwrap();

        assert_eq!(upcoming.len(), 2);
        assert!(upcoming.iter().all(|a| a.priority == AppointmentPriority::Medium));
        assert_eq!(upcoming[0].nurse.as_deref(), Some("Mary Seacole"));
    }

    #[tokio::test]
    async fn chart_data_has_four_series() {
        let (_dir, db) = temp_db();
        seed_clinic(&db);
        let data = service_over(&db).get_chart_data(ChartPeriod::Week).await.unwrap();

        assert_eq!(data.medication_administration.len(), 1);
        assert_eq!(data.medication_administration[0].value, 3);
        assert_eq!(data.incident_frequency[0].value, 3);
        // Students enrolled 400 days ago fall outside the week window
        assert!(data.enrollment_trend.is_empty());
        // Appointments are in the future, past the window end
        assert!(data.appointment_trends.is_empty());
    }

    #[tokio::test]
    async fn chart_failure_surfaces_as_error() {
        let (_dir, db) = temp_db();
        let service = DashboardService::new(
            Arc::new(FlakyStore::new(&db, None)),
            Duration::from_secs(300),
        );
        let err = service.get_chart_data(ChartPeriod::Month).await.unwrap_err();
        assert!(matches!(err, DashboardError::Database(DatabaseError::NotFound { .. })));
    }
}
