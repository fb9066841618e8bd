//! Vote submission.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::ClientInfo;
use crate::routes::Acknowledgement;
use crate::services::{VoteRequest, VotingService};
use crate::state::AppState;

/// Vote request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteBody {
    pub project_id: Option<String>,
    pub user_agent: Option<String>,
}

/// Record a vote for a project.
///
/// The voter is identified by proxy headers. A `userAgent` in the body wins
/// over the `User-Agent` header.
#[instrument(skip_all, fields(voter_ip = %client.voter_ip))]
pub async fn cast(
    State(state): State<AppState>,
    client: ClientInfo,
    payload: std::result::Result<Json<VoteBody>, JsonRejection>,
) -> Result<Json<Acknowledgement>> {
    let Json(body) = payload?;

    let request = VoteRequest {
        project_id: body.project_id,
        user_agent: body.user_agent.or(client.user_agent),
        voter_ip: client.voter_ip,
    };

    VotingService::new(state.store(), state.policy())
        .cast(request)
        .await?;

    Ok(Json(Acknowledgement::new("Vote recorded successfully")))
}
