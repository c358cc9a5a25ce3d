//! `GET /api/medications/safety-check?names=a,b`: LASA and interaction
//! lookups for a comma-separated medication list.

use axum::extract::Query;
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::safety::{check_medications, SafetyReport};

/// Upper bound on names per request.
const MAX_NAMES: usize = 20;

#[derive(Deserialize)]
pub struct SafetyQuery {
    pub names: Option<String>,
}

fn split_names(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect()
}

pub async fn safety_check(
    Query(query): Query<SafetyQuery>,
) -> Result<Json<SafetyReport>, ApiError> {
    let names = split_names(query.names.as_deref().unwrap_or_default());
    if names.is_empty() {
        return Err(ApiError::BadRequest("names must list at least one medication".into()));
    }
    if names.len() > MAX_NAMES {
        return Err(ApiError::BadRequest(format!(
            "at most {MAX_NAMES} medications per check, got {}",
            names.len()
        )));
    }
    Ok(Json(check_medications(&names)))
}
