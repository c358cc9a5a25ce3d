//! Audit logging middleware.
//!
//! Records every authenticated request (actor, method, path, status) in
//! the `audit_log` table and as a tracing event. Runs innermost, after
//! auth has injected `CallerContext`.
//!
//! Nested routers see the path with the `/api` prefix stripped, so the
//! recorded path comes from `OriginalUri`.

use axum::extract::{OriginalUri, Request};
use axum::middleware::Next;
use axum::response::Response;

use crate::api::types::{ApiContext, CallerContext};
use crate::db::repository::insert_audit_entry;

pub async fn log_access(req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req
        .extensions()
        .get::<OriginalUri>()
        .map(|original| original.path().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let ctx = req.extensions().get::<ApiContext>().cloned();
    let actor = req
        .extensions()
        .get::<CallerContext>()
        .map(|c| c.actor.clone())
        .unwrap_or_else(|| "anonymous".to_string());

    let response = next.run(req).await;
    let status = response.status().as_u16();
    let action = format!("{method} {path}");

    tracing::info!(target: "audit", actor = %actor, action = %action, status, "API access");

    if let Some(ctx) = ctx {
        let db = ctx.db.clone();
        let written = tokio::task::spawn_blocking(move || {
            let conn = db.connect()?;
            insert_audit_entry(&conn, &actor, &action, status)
        })
        .await;

        match written {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!(error = %e, "Failed to write audit entry"),
            Err(e) => tracing::warn!(error = %e, "Audit task aborted"),
        }
    }

    response
}
