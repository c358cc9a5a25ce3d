//! Dashboard endpoints.
//!
//! `GET /api/dashboard/stats`, `/recent-activities`, `/upcoming-appointments`,
//! `/chart-data`, `/stats-by-scope` and `DELETE /api/dashboard/cache`.
//! Query parameters are validated here; the service never sees an
//! out-of-range limit or unknown period.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::dashboard::appointments::DEFAULT_UPCOMING_LIMIT;
use crate::dashboard::{ActivityItem, ChartData, ChartPeriod, StatsSnapshot, UpcomingAppointment};

/// Largest accepted `limit`.
pub const MAX_LIMIT: usize = 50;
const DEFAULT_ACTIVITY_LIMIT: usize = 5;

#[derive(Deserialize)]
pub struct LimitQuery {
    pub limit: Option<String>,
}

#[derive(Deserialize)]
pub struct ChartQuery {
    pub period: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeQuery {
    pub school_id: Option<String>,
    pub district_id: Option<String>,
}

#[derive(Serialize)]
pub struct CacheClearedResponse {
    pub cleared: bool,
}

/// Parse `limit`, falling back to `default` when absent.
pub fn parse_limit(raw: Option<&str>, default: usize) -> Result<usize, ApiError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    let limit: usize = raw
        .trim()
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("limit must be an integer, got '{raw}'")))?;
    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(ApiError::BadRequest(format!(
            "limit must be between 1 and {MAX_LIMIT}, got {limit}"
        )));
    }
    Ok(limit)
}

/// `GET /api/dashboard/stats`
pub async fn stats(State(ctx): State<ApiContext>) -> Result<Json<StatsSnapshot>, ApiError> {
    let snapshot = ctx.dashboard.get_dashboard_stats().await;
    Ok(Json(snapshot.as_ref().clone()))
}

/// `GET /api/dashboard/stats-by-scope?schoolId=&districtId=`
pub async fn stats_by_scope(
    State(ctx): State<ApiContext>,
    Query(query): Query<ScopeQuery>,
) -> Result<Json<StatsSnapshot>, ApiError> {
    let snapshot = ctx
        .dashboard
        .get_dashboard_stats_by_scope(query.school_id.as_deref(), query.district_id.as_deref())
        .await;
    Ok(Json(snapshot.as_ref().clone()))
}

/// `GET /api/dashboard/recent-activities?limit=N`
pub async fn recent_activities(
    State(ctx): State<ApiContext>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<ActivityItem>>, ApiError> {
    let limit = parse_limit(query.limit.as_deref(), DEFAULT_ACTIVITY_LIMIT)?;
    let items = ctx.dashboard.get_recent_activities(limit).await?;
    Ok(Json(items))
}

/// `GET /api/dashboard/upcoming-appointments?limit=N`
pub async fn upcoming_appointments(
    State(ctx): State<ApiContext>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<UpcomingAppointment>>, ApiError> {
    let limit = parse_limit(query.limit.as_deref(), DEFAULT_UPCOMING_LIMIT)?;
    let items = ctx.dashboard.get_upcoming_appointments(limit).await?;
    Ok(Json(items))
}

/// `GET /api/dashboard/chart-data?period=week|month|year`
pub async fn chart_data(
    State(ctx): State<ApiContext>,
    Query(query): Query<ChartQuery>,
) -> Result<Json<ChartData>, ApiError> {
    let period = match query.period.as_deref() {
        Some(raw) => raw.parse::<ChartPeriod>()?,
        None => ChartPeriod::default(),
    };
    let data = ctx.dashboard.get_chart_data(period).await?;
    Ok(Json(data))
}

/// `DELETE /api/dashboard/cache`
pub async fn clear_cache(State(ctx): State<ApiContext>) -> Json<CacheClearedResponse> {
    ctx.dashboard.clear_cache();
    Json(CacheClearedResponse { cleared: true })
}
