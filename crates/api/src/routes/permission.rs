use axum::{Json, extract::State};
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::Validate;
use agencyhub_db::models::Permission;

use crate::{error::ApiError, extractors::auth::CurrentCaller, state::AppState};

#[derive(Debug, Serialize)]
pub struct PermissionResponse {
    pub id: String,
    pub email: String,
    pub sub_account_id: String,
    pub access: bool,
}

impl PermissionResponse {
    pub fn from_permission(permission: &Permission) -> Self {
        Self {
            id: permission.id.map(|id| id.to_hex()).unwrap_or_default(),
            email: permission.email.clone(),
            sub_account_id: permission.sub_account_id.to_hex(),
            access: permission.access,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChangePermissionRequest {
    pub permission_id: Option<String>,
    #[validate(email)]
    pub email: String,
    pub sub_account_id: String,
    pub access: bool,
}

/// Grants or revokes a user's access to a sub-account. Revocation keeps
/// the row with the flag lowered.
pub async fn change(
    State(state): State<AppState>,
    CurrentCaller(_caller): CurrentCaller,
    Json(body): Json<ChangePermissionRequest>,
) -> Result<Json<PermissionResponse>, ApiError> {
    body.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let permission_id = body
        .permission_id
        .as_deref()
        .map(ObjectId::parse_str)
        .transpose()
        .map_err(|_| ApiError::BadRequest("Invalid permission_id".to_string()))?;
    let sid = ObjectId::parse_str(&body.sub_account_id)
        .map_err(|_| ApiError::BadRequest("Invalid sub_account_id".to_string()))?;

    let permission = state
        .permissions
        .change(permission_id, &body.email, sid, body.access)
        .await?;

    Ok(Json(PermissionResponse::from_permission(&permission)))
}
