//! Coupon email registration.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::routes::Acknowledgement;
use crate::services::{RegistrationRequest, RegistrationService};
use crate::state::AppState;

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegistrationBody {
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Register an email for the coupon program.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RegistrationBody>, JsonRejection>,
) -> Result<Json<Acknowledgement>> {
    let Json(body) = payload?;

    RegistrationService::new(state.store())
        .register(RegistrationRequest {
            email: body.email,
            name: body.name,
        })
        .await?;

    Ok(Json(Acknowledgement::new("Email registered successfully")))
}
