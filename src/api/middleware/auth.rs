//! Bearer token authentication middleware.
//!
//! Extracts `Authorization: Bearer <token>`, compares its SHA-256 hash
//! against the configured tokens in constant time, and injects
//! `CallerContext` for the audit logger. With no tokens configured every
//! request passes as `anonymous`.

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use subtle::ConstantTimeEq;

use crate::api::error::ApiError;
use crate::api::types::{
    bearer_token, hash_token, token_fingerprint, ApiContext, CallerContext, PresentedToken,
};

pub async fn require_auth(req: Request, next: Next) -> Response {
    match require_auth_inner(req, next).await {
        Ok(resp) => resp,
        Err(err) => err.into_response(),
    }
}

/// True if `candidate` matches any accepted hash. Every entry is compared.
fn matches_any(accepted: &[[u8; 32]], candidate: &[u8; 32]) -> bool {
    accepted
        .iter()
        .fold(subtle::Choice::from(0u8), |found, hash| {
            found | hash.as_slice().ct_eq(candidate.as_slice())
        })
        .into()
}

async fn require_auth_inner(mut req: Request, next: Next) -> Result<Response, ApiError> {
    let ctx: ApiContext = req
        .extensions()
        .get::<ApiContext>()
        .cloned()
        .ok_or(ApiError::Internal("missing API context".into()))?;

    let caller = if ctx.auth_enabled() {
        let hash = match req.extensions().get::<PresentedToken>() {
            Some(presented) => presented.hash,
            None => hash_token(bearer_token(req.headers()).ok_or(ApiError::Unauthorized)?),
        };
        if !matches_any(&ctx.token_hashes, &hash) {
            tracing::warn!(path = %req.uri().path(), "Rejected request with unknown token");
            return Err(ApiError::Unauthorized);
        }
        CallerContext {
            actor: format!("token:{}", token_fingerprint(&hash)),
        }
    } else {
        CallerContext {
            actor: "anonymous".to_string(),
        }
    };

    req.extensions_mut().insert(caller);

    let mut response = next.run(req).await;
    response
        .headers_mut()
        .insert("Cache-Control", HeaderValue::from_static("no-store"));

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_only_configured_hashes() {
        let accepted = vec![hash_token("alpha"), hash_token("bravo")];
        assert!(matches_any(&accepted, &hash_token("bravo")));
        assert!(!matches_any(&accepted, &hash_token("charlie")));
        assert!(!matches_any(&[], &hash_token("alpha")));
    }
}
