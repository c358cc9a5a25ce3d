//! HTTP API for the dashboard.
//!
//! Routes are nested under `/api/` and protected by a middleware stack:
//! Rate Limit → Auth → Audit → Handler. `/api/health` is rate-limited
//! only.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::api_router;
pub use server::{start_server, DashboardServer, ServerError, ServerSession};
pub use types::ApiContext;
