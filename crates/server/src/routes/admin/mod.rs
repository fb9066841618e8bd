//! Admin route handlers.
//!
//! These routes are unauthenticated; deployments are expected to restrict
//! `/admin` at the proxy.

pub mod emails;
pub mod projects;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create the admin routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/projects", get(projects::index).post(projects::create))
        .route("/emails", get(emails::index))
        .route("/emails/export", get(emails::export))
        .route("/emails/{id}/coupon", get(emails::coupon_letter))
}
