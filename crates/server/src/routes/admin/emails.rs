//! Coupon registration administration.
//!
//! Coupon codes are drawn fresh for every export and every letter; nothing
//! about them is stored.

use axum::{
    Json,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use chrono::Utc;
use serde::Serialize;
use tracing::instrument;

use hackvote_core::CouponEmailId;

use crate::error::{AppError, Result};
use crate::models::CouponEmail;
use crate::services::coupon;
use crate::state::AppState;

/// Response body for the registration listing.
#[derive(Debug, Serialize)]
pub struct EmailList {
    pub emails: Vec<CouponEmail>,
}

/// List coupon registrations, newest first.
pub async fn index(State(state): State<AppState>) -> Result<Json<EmailList>> {
    let emails = state.store().list_emails().await?;
    Ok(Json(EmailList { emails }))
}

/// Download every registration as CSV with a fresh coupon code per row.
#[instrument(skip_all)]
pub async fn export(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let emails = state.store().list_emails().await?;
    let csv = coupon::export_csv(&emails, &mut rand::rng());

    let filename = format!("coupon-emails-{}.csv", Utc::now().format("%Y-%m-%d"));
    tracing::info!(rows = emails.len(), %filename, "Exported coupon registrations");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        csv,
    ))
}

/// Render the coupon letter for one registration.
#[instrument(skip(state))]
pub async fn coupon_letter(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let not_found = || AppError::NotFound("Registration".to_owned());

    let id: CouponEmailId = id.parse().map_err(|_| not_found())?;
    let registration = state.store().find_email(id).await?.ok_or_else(not_found)?;

    let code = coupon::generate_code(&mut rand::rng());
    let letter = coupon::coupon_letter(&registration, &code, Utc::now());

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        letter,
    ))
}
