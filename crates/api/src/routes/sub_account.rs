use axum::{
    Json,
    extract::{Path, State},
};
use bson::oid::ObjectId;
use serde::Serialize;
use tracing::warn;
use agencyhub_db::models::SubAccount;

use crate::{error::ApiError, extractors::auth::CurrentCaller, state::AppState};

#[derive(Debug, Serialize)]
pub struct SubAccountResponse {
    pub id: String,
    pub agency_id: String,
    pub name: String,
    pub company_email: String,
    pub company_phone: Option<String>,
    pub sub_account_logo: Option<String>,
    pub goal: u32,
}

impl SubAccountResponse {
    pub fn from_sub_account(sub_account: &SubAccount) -> Self {
        Self {
            id: sub_account.id.map(|id| id.to_hex()).unwrap_or_default(),
            agency_id: sub_account.agency_id.to_hex(),
            name: sub_account.name.clone(),
            company_email: sub_account.company_email.clone(),
            company_phone: sub_account.company_phone.clone(),
            sub_account_logo: sub_account.sub_account_logo.clone(),
            goal: sub_account.goal,
        }
    }
}

pub async fn get(
    State(state): State<AppState>,
    CurrentCaller(_caller): CurrentCaller,
    Path(sub_account_id): Path<String>,
) -> Result<Json<SubAccountResponse>, ApiError> {
    let sid = ObjectId::parse_str(&sub_account_id)
        .map_err(|_| ApiError::BadRequest("Invalid sub_account_id".to_string()))?;

    let sub_account = state.sub_accounts.find(sid).await?;
    Ok(Json(SubAccountResponse::from_sub_account(&sub_account)))
}

/// Records the deletion in the activity log, then removes the sub-account
/// and its seeded children.
pub async fn delete(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Path(sub_account_id): Path<String>,
) -> Result<Json<SubAccountResponse>, ApiError> {
    let sid = ObjectId::parse_str(&sub_account_id)
        .map_err(|_| ApiError::BadRequest("Invalid sub_account_id".to_string()))?;

    let sub_account = state.sub_accounts.find(sid).await?;

    if let Err(error) = state
        .activity
        .log_activity(
            Some(&caller),
            &format!("Deleted a subaccount | {}", sub_account.name),
            None,
            Some(sid),
        )
        .await
    {
        warn!(%error, "Failed to record sub-account deletion activity");
    }

    let deleted = state.sub_accounts.delete(sid).await?;
    Ok(Json(SubAccountResponse::from_sub_account(&deleted)))
}
