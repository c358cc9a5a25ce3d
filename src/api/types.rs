//! Shared types for the HTTP layer.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::http::HeaderMap;

use crate::config::AppConfig;
use crate::dashboard::DashboardService;
use crate::db::Database;

// ═══════════════════════════════════════════════════════════
// API context: shared state for the router
// ═══════════════════════════════════════════════════════════

/// Shared context for all API routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub dashboard: Arc<DashboardService>,
    pub db: Database,
    pub rate_limiter: Arc<Mutex<RateLimiter>>,
    /// SHA-256 hashes of accepted bearer tokens. Empty disables auth.
    pub token_hashes: Arc<Vec<[u8; 32]>>,
}

impl ApiContext {
    pub fn new(dashboard: Arc<DashboardService>, db: Database, config: &AppConfig) -> Self {
        Self {
            dashboard,
            db,
            rate_limiter: Arc::new(Mutex::new(RateLimiter::with_limits(
                config.rate_limit.per_minute,
                config.rate_limit.per_hour,
            ))),
            token_hashes: Arc::new(
                config
                    .auth
                    .api_tokens
                    .iter()
                    .map(|t| hash_token(t))
                    .collect(),
            ),
        }
    }

    pub fn auth_enabled(&self) -> bool {
        !self.token_hashes.is_empty()
    }
}

// ═══════════════════════════════════════════════════════════
// Caller identity: injected by auth middleware
// ═══════════════════════════════════════════════════════════

/// Who made the request, as recorded in the audit log.
#[derive(Debug, Clone)]
pub struct CallerContext {
    /// Short, non-secret fingerprint of the bearer token.
    pub actor: String,
}

/// Hash of the bearer token a request presented, attached by the rate
/// limiter and reused by auth.
#[derive(Debug, Clone, Copy)]
pub struct PresentedToken {
    pub hash: [u8; 32],
}

/// The token from `Authorization: Bearer <token>`, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

/// Hash a bearer token string using SHA-256.
pub fn hash_token(token: &str) -> [u8; 32] {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().into()
}

/// First 8 hex chars of the token hash, safe to log.
pub fn token_fingerprint(hash: &[u8; 32]) -> String {
    hash.iter().take(4).map(|b| format!("{b:02x}")).collect()
}

// ═══════════════════════════════════════════════════════════
// Rate limiter: per-caller sliding window
// ═══════════════════════════════════════════════════════════

const MINUTE: Duration = Duration::from_secs(60);
const HOUR: Duration = Duration::from_secs(3600);

/// Most caller windows kept at once. Unseen callers beyond this share
/// [`OVERFLOW_BUCKET`].
pub const MAX_TRACKED_CALLERS: usize = 4096;
pub const OVERFLOW_BUCKET: &str = "overflow";

/// Per-caller rate limiter with per-minute and per-hour limits.
///
/// Holds at most `max_callers` windows plus the overflow bucket. Windows
/// with no request in the last hour are swept when the map is full.
pub struct RateLimiter {
    windows: HashMap<String, Vec<Instant>>,
    per_minute: u32,
    per_hour: u32,
    max_callers: usize,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::with_limits(100, 1000)
    }

    pub fn with_limits(per_minute: u32, per_hour: u32) -> Self {
        Self {
            windows: HashMap::new(),
            per_minute,
            per_hour,
            max_callers: MAX_TRACKED_CALLERS,
        }
    }

    pub fn max_callers(mut self, max_callers: usize) -> Self {
        self.max_callers = max_callers;
        self
    }

    /// Number of caller windows currently held.
    pub fn tracked_callers(&self) -> usize {
        self.windows.len()
    }

    /// Record a request from `caller`. `Err` carries the retry-after
    /// seconds when a window is full.
    pub fn check(&mut self, caller: &str) -> Result<(), u64> {
        self.check_at(caller, Instant::now())
    }

    fn check_at(&mut self, caller: &str, now: Instant) -> Result<(), u64> {
        let bucket = self.bucket_for(caller, now);
        let entries = self.windows.entry(bucket).or_default();
        entries.retain(|ts| now.duration_since(*ts) < HOUR);

        let last_minute = entries
            .iter()
            .filter(|ts| now.duration_since(**ts) < MINUTE)
            .count();
        if last_minute >= self.per_minute as usize {
            return Err(MINUTE.as_secs());
        }
        if entries.len() >= self.per_hour as usize {
            return Err(HOUR.as_secs());
        }

        entries.push(now);
        Ok(())
    }

    fn bucket_for(&mut self, caller: &str, now: Instant) -> String {
        if self.windows.contains_key(caller) || self.windows.len() < self.max_callers {
            return caller.to_string();
        }
        self.sweep(now);
        if self.windows.len() < self.max_callers {
            caller.to_string()
        } else {
            OVERFLOW_BUCKET.to_string()
        }
    }

    fn sweep(&mut self, now: Instant) {
        self.windows.retain(|_, entries| {
            entries.retain(|ts| now.duration_since(*ts) < HOUR);
            !entries.is_empty()
        });
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
