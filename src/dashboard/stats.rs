//! Headline counts and month-over-month trends.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, Utc};
use futures_util::future::join_all;
use serde::Serialize;

use super::store::{DashboardStore, StatsMetric};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Positive,
    Negative,
    Neutral,
}

/// A count next to its percentage change against a baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendMetric {
    pub value: String,
    pub change: String,
    pub change_type: ChangeType,
}

impl TrendMetric {
    pub fn compute(current: u64, baseline: u64) -> Self {
        let change = percentage_change(current, baseline);
        Self {
            value: current.to_string(),
            change: format_change(change),
            change_type: classify_change(change),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub total_students: u64,
    pub active_medications: u64,
    pub todays_appointments: u64,
    pub pending_incidents: u64,
    pub medications_due_today: u64,
    pub health_alerts: u64,
    pub student_trend: TrendMetric,
    pub medication_trend: TrendMetric,
    pub appointment_trend: TrendMetric,
    /// RFC 3339 time the snapshot was computed.
    pub last_updated: String,
}

/// Percentage change rounded to one decimal. A zero baseline yields 0.
pub fn percentage_change(current: u64, baseline: u64) -> f64 {
    if baseline == 0 {
        return 0.0;
    }
    let raw = (current as f64 - baseline as f64) / baseline as f64 * 100.0;
    (raw * 10.0).round() / 10.0
}

pub fn classify_change(change: f64) -> ChangeType {
    if change > 0.0 {
        ChangeType::Positive
    } else if change < 0.0 {
        ChangeType::Negative
    } else {
        ChangeType::Neutral
    }
}

/// `"0%"`, `"+12.5%"` or `"-3.3%"`.
pub fn format_change(change: f64) -> String {
    if change == 0.0 {
        "0%".to_string()
    } else {
        format!("{change:+.1}%")
    }
}

/// Outcome of the nine-way fan-out. Metrics whose query failed are absent
/// and read as zero.
#[derive(Debug, Default, Clone)]
pub struct MetricCounts {
    values: HashMap<StatsMetric, u64>,
}

impl MetricCounts {
    pub fn get(&self, metric: StatsMetric) -> u64 {
        self.values.get(&metric).copied().unwrap_or(0)
    }

    pub fn insert(&mut self, metric: StatsMetric, value: u64) {
        self.values.insert(metric, value);
    }

    /// Number of metrics that were actually evaluated.
    pub fn evaluated(&self) -> usize {
        self.values.len()
    }
}

/// Run every metric on its own blocking task and wait for all of them.
/// A failure only zeroes the metric it belongs to.
pub async fn collect_metric_counts(
    store: Arc<dyn DashboardStore>,
    now: NaiveDateTime,
) -> MetricCounts {
    let tasks = StatsMetric::ALL.iter().map(|&metric| {
        let store = Arc::clone(&store);
        async move {
            let outcome = tokio::task::spawn_blocking(move || store.count(metric, now)).await;
            (metric, outcome)
        }
    });

    let mut counts = MetricCounts::default();
    for (metric, outcome) in join_all(tasks).await {
        match outcome {
            Ok(Ok(value)) => counts.insert(metric, value),
            Ok(Err(e)) => {
                tracing::warn!(
                    metric = metric.as_str(),
                    error = %e,
                    "Stats query failed, reporting 0"
                );
            }
            Err(e) => {
                tracing::warn!(
                    metric = metric.as_str(),
                    error = %e,
                    "Stats task aborted, reporting 0"
                );
            }
        }
    }
    counts
}

pub fn assemble_snapshot(counts: &MetricCounts, generated_at: DateTime<Utc>) -> StatsSnapshot {
    let students = counts.get(StatsMetric::ActiveStudents);
    let medications = counts.get(StatsMetric::ActiveMedications);
    let appointments = counts.get(StatsMetric::TodaysAppointments);

    StatsSnapshot {
        total_students: students,
        active_medications: medications,
        todays_appointments: appointments,
        pending_incidents: counts.get(StatsMetric::PendingIncidents),
        medications_due_today: counts.get(StatsMetric::MedicationsDueToday),
        health_alerts: counts.get(StatsMetric::HealthAlerts),
        student_trend: TrendMetric::compute(students, counts.get(StatsMetric::StudentsLastMonth)),
        medication_trend: TrendMetric::compute(
            medications,
            counts.get(StatsMetric::MedicationsLastMonth),
        ),
        appointment_trend: TrendMetric::compute(
            appointments,
            counts.get(StatsMetric::AppointmentsLastMonth),
        ),
        last_updated: generated_at.to_rfc3339(),
    }
}
