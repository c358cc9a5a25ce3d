//! Per-day time series for the dashboard charts.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::store::DailyCount;
use crate::db::DATE_FORMAT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartPeriod {
    #[default]
    Week,
    Month,
    Year,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid chart period '{0}': expected week, month or year")]
pub struct InvalidPeriod(pub String);

impl FromStr for ChartPeriod {
    type Err = InvalidPeriod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            other => Err(InvalidPeriod(other.to_string())),
        }
    }
}

impl fmt::Display for ChartPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        })
    }
}

impl ChartPeriod {
    /// Lower bound of the window ending at `now`.
    pub fn window_start(&self, now: NaiveDateTime) -> NaiveDateTime {
        match self {
            Self::Week => now - Duration::days(7),
            Self::Month => now
                .checked_sub_months(Months::new(1))
                .unwrap_or(now - Duration::days(30)),
            Self::Year => now
                .checked_sub_months(Months::new(12))
                .unwrap_or(now - Duration::days(365)),
        }
    }

    /// `"Oct 16"` for week and month charts, `"Oct"` for the year chart.
    pub fn label(&self, date: NaiveDate) -> String {
        match self {
            Self::Week | Self::Month => date.format("%b %-d").to_string(),
            Self::Year => date.format("%b").to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    pub date: String,
    pub value: u64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub enrollment_trend: Vec<ChartPoint>,
    pub medication_administration: Vec<ChartPoint>,
    pub incident_frequency: Vec<ChartPoint>,
    pub appointment_trends: Vec<ChartPoint>,
}

/// Days with no rows stay absent; the series is not zero-filled.
pub fn to_points(counts: &[DailyCount], period: ChartPeriod) -> Vec<ChartPoint> {
    counts
        .iter()
        .map(|c| ChartPoint {
            date: c.date.format(DATE_FORMAT).to_string(),
            value: c.count,
            label: period.label(c.date),
        })
        .collect()
}
