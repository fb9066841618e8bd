//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Liveness check
//! GET  /health/ready               - Readiness check (store reachable)
//!
//! # Voting
//! POST /vote                       - Record a vote
//! POST /coupon-email               - Register for a coupon
//!
//! # Results
//! GET  /metrics                    - Metrics snapshot
//! GET  /results                    - Same snapshot, for the results screen
//! GET  /projects                   - Projects with vote counts (oldest first)
//!
//! # Admin
//! GET  /admin/projects             - Projects with vote counts (newest first)
//! POST /admin/projects             - Create a project
//! GET  /admin/emails               - Coupon registrations (newest first)
//! GET  /admin/emails/export        - CSV download with fresh coupon codes
//! GET  /admin/emails/{id}/coupon   - Plain-text coupon letter
//! ```

pub mod admin;
pub mod coupon_email;
pub mod metrics;
pub mod projects;
pub mod vote;

use axum::{
    Router,
    routing::{get, post},
};
use serde::Serialize;

use crate::state::AppState;

/// Success body for write endpoints that return no resource.
#[derive(Debug, Serialize)]
pub struct Acknowledgement {
    pub success: bool,
    pub message: &'static str,
}

impl Acknowledgement {
    #[must_use]
    pub const fn new(message: &'static str) -> Self {
        Self {
            success: true,
            message,
        }
    }
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/vote", post(vote::cast))
        .route("/coupon-email", post(coupon_email::register))
        .route("/metrics", get(metrics::snapshot))
        .route("/results", get(metrics::snapshot))
        .route("/projects", get(projects::index))
        .nest("/admin", admin::routes())
}
