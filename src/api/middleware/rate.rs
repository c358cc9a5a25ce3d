//! Request rate limiting, applied before authentication.
//!
//! Callers are bucketed by the fingerprint of the bearer token they
//! present, the same identifier the audit log records. Requests without a
//! token share the anonymous bucket. The token hash is attached to the
//! request as `PresentedToken` so auth does not hash it again.

use std::sync::PoisonError;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;
use crate::api::types::{bearer_token, hash_token, token_fingerprint, ApiContext, PresentedToken};

const ANONYMOUS_BUCKET: &str = "anonymous";

fn bucket_name(presented: Option<&PresentedToken>) -> String {
    match presented {
        Some(token) => format!("caller:{}", token_fingerprint(&token.hash)),
        None => ANONYMOUS_BUCKET.to_string(),
    }
}

/// Returns 429 with `Retry-After` once the caller's window is full.
pub async fn limit(mut req: Request, next: Next) -> Response {
    let Some(ctx) = req.extensions().get::<ApiContext>().cloned() else {
        return ApiError::Internal("missing API context".into()).into_response();
    };

    let presented = bearer_token(req.headers()).map(|token| PresentedToken {
        hash: hash_token(token),
    });
    let bucket = bucket_name(presented.as_ref());

    let admitted = ctx
        .rate_limiter
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .check(&bucket);
    if let Err(retry_after) = admitted {
        tracing::warn!(bucket = %bucket, retry_after, "Rate limit exceeded");
        return ApiError::RateLimited { retry_after }.into_response();
    }

    if let Some(token) = presented {
        req.extensions_mut().insert(token);
    }
    next.run(req).await
}
