use axum::{Json, extract::State, http::StatusCode};
use bson::oid::ObjectId;
use serde::Deserialize;

use crate::{error::ApiError, extractors::auth::CurrentCaller, state::AppState};

#[derive(Debug, Deserialize)]
pub struct LogActivityRequest {
    pub description: String,
    pub agency_id: Option<String>,
    pub sub_account_id: Option<String>,
}

/// Records an activity-log notification. Best-effort by design: a caller
/// that cannot be resolved to a user is skipped silently, while a request
/// carrying neither scope id is rejected as malformed.
pub async fn log(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Json(body): Json<LogActivityRequest>,
) -> Result<StatusCode, ApiError> {
    let agency_id = body
        .agency_id
        .as_deref()
        .map(ObjectId::parse_str)
        .transpose()
        .map_err(|_| ApiError::BadRequest("Invalid agency_id".to_string()))?;
    let sub_account_id = body
        .sub_account_id
        .as_deref()
        .map(ObjectId::parse_str)
        .transpose()
        .map_err(|_| ApiError::BadRequest("Invalid sub_account_id".to_string()))?;

    state
        .activity
        .log_activity(Some(&caller), &body.description, agency_id, sub_account_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
