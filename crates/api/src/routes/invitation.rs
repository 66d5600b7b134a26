use axum::{Json, extract::State};
use serde::Serialize;

use crate::{error::ApiError, extractors::auth::CurrentCaller, state::AppState};

#[derive(Debug, Serialize)]
pub struct AcceptInvitationResponse {
    /// The agency the caller belongs to afterwards; `null` when the caller
    /// is unknown to the system.
    pub agency_id: Option<String>,
}

pub async fn accept(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
) -> Result<Json<AcceptInvitationResponse>, ApiError> {
    let agency_id = state.onboarding.accept_invitation(&caller).await?;

    Ok(Json(AcceptInvitationResponse {
        agency_id: agency_id.map(|id| id.to_hex()),
    }))
}
