use axum::{
    Json,
    extract::{Path, State},
};
use bson::{doc, oid::ObjectId};
use serde::{Deserialize, Serialize};
use tracing::warn;
use agencyhub_db::models::{Role, User};
use agencyhub_services::dao::user::{NewUser, UserUpdate};

use crate::{error::ApiError, extractors::auth::CurrentCaller, state::AppState};

use super::agency::AgencyResponse;
use super::permission::PermissionResponse;
use super::sub_account::SubAccountResponse;

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub subject: String,
    pub email: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub role: Role,
    pub agency_id: Option<String>,
}

impl UserResponse {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            subject: user.subject.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            avatar_url: user.avatar_url.clone(),
            role: user.role,
            agency_id: user.agency_id.map(|id| id.to_hex()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserResponse,
    pub permissions: Vec<PermissionResponse>,
    pub agency: Option<AgencyResponse>,
    pub sub_accounts: Vec<SubAccountResponse>,
}

/// The caller's record with everything the navigation shell needs.
pub async fn me(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
) -> Result<Json<MeResponse>, ApiError> {
    let details = state
        .access
        .auth_user_details(&caller)
        .await?
        .ok_or_else(|| ApiError::NotFound("No user record for caller".to_string()))?;

    Ok(Json(MeResponse {
        user: UserResponse::from_user(&details.user),
        permissions: details
            .permissions
            .iter()
            .map(PermissionResponse::from_permission)
            .collect(),
        agency: details.agency.as_ref().map(AgencyResponse::from_agency),
        sub_accounts: details
            .sub_accounts
            .iter()
            .map(SubAccountResponse::from_sub_account)
            .collect(),
    }))
}

#[derive(Debug, Deserialize, Default)]
pub struct InitUserRequest {
    pub role: Option<Role>,
}

/// Upserts the caller's user record and mirrors the role into the identity
/// provider's metadata.
pub async fn init(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    body: Option<Json<InitUserRequest>>,
) -> Result<Json<UserResponse>, ApiError> {
    let role = body.and_then(|b| b.0.role).unwrap_or_default();

    let user = state
        .users
        .init(NewUser {
            subject: caller.subject.clone(),
            email: caller.email.clone(),
            name: caller.display_name(),
            avatar_url: caller.avatar_url.clone(),
            role,
        })
        .await?;

    if let Err(error) = state
        .identity
        .sync_role_metadata(&caller.subject, Some(user.role))
        .await
    {
        warn!(%error, "Failed to sync role metadata after init");
    }

    Ok(Json(UserResponse::from_user(&user)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub email: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub role: Option<Role>,
}

pub async fn update(
    State(state): State<AppState>,
    CurrentCaller(_caller): CurrentCaller,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .users
        .update_by_email(
            &body.email,
            UserUpdate {
                name: body.name,
                avatar_url: body.avatar_url,
                role: body.role,
            },
        )
        .await?;

    if let Err(error) = state
        .identity
        .sync_role_metadata(&user.subject, Some(user.role))
        .await
    {
        warn!(%error, "Failed to sync role metadata after update");
    }

    Ok(Json(UserResponse::from_user(&user)))
}

pub async fn delete(
    State(state): State<AppState>,
    CurrentCaller(_caller): CurrentCaller,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let uid = ObjectId::parse_str(&user_id)
        .map_err(|_| ApiError::BadRequest("Invalid user_id".to_string()))?;

    let user = state.users.base.find_by_id(uid).await?;

    // Clear the provider-side role before the record goes away
    if let Err(error) = state.identity.sync_role_metadata(&user.subject, None).await {
        warn!(%error, "Failed to clear role metadata before delete");
    }

    let deleted = state.users.delete(uid).await?;
    Ok(Json(UserResponse::from_user(&deleted)))
}

#[derive(Debug, Serialize)]
pub struct UserPermissionResponse {
    #[serde(flatten)]
    pub permission: PermissionResponse,
    pub sub_account: Option<SubAccountResponse>,
}

/// The user's permission rows with the sub-accounts they point at.
pub async fn permissions(
    State(state): State<AppState>,
    CurrentCaller(_caller): CurrentCaller,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<UserPermissionResponse>>, ApiError> {
    let uid = ObjectId::parse_str(&user_id)
        .map_err(|_| ApiError::BadRequest("Invalid user_id".to_string()))?;

    let user = state.users.base.find_by_id(uid).await?;
    let permissions = state.permissions.for_email(&user.email).await?;

    let sub_account_ids: Vec<ObjectId> = permissions.iter().map(|p| p.sub_account_id).collect();
    let sub_accounts = if sub_account_ids.is_empty() {
        Vec::new()
    } else {
        state
            .sub_accounts
            .base
            .find_many(doc! { "_id": { "$in": sub_account_ids } }, None)
            .await?
    };

    let response = permissions
        .iter()
        .map(|p| UserPermissionResponse {
            permission: PermissionResponse::from_permission(p),
            sub_account: sub_accounts
                .iter()
                .find(|s| s.id == Some(p.sub_account_id))
                .map(SubAccountResponse::from_sub_account),
        })
        .collect();

    Ok(Json(response))
}
