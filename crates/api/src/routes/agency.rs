use axum::{
    Json,
    extract::{Path, State},
};
use bson::{doc, oid::ObjectId};
use serde::{Deserialize, Serialize};
use tracing::warn;
use validator::Validate;
use agencyhub_db::models::{Agency, Plan, Role};
use agencyhub_services::dao::agency::{AgencyInput, AgencyUpdate};
use agencyhub_services::dao::sub_account::SubAccountInput;

use crate::{error::ApiError, extractors::auth::CurrentCaller, state::AppState};

use super::permission::PermissionResponse;
use super::sub_account::SubAccountResponse;
use super::user::UserResponse;

#[derive(Debug, Serialize)]
pub struct AgencyResponse {
    pub id: String,
    pub name: String,
    pub company_email: String,
    pub company_phone: Option<String>,
    pub agency_logo: Option<String>,
    pub white_label: bool,
    pub plan: Plan,
    pub goal: u32,
}

impl AgencyResponse {
    pub fn from_agency(agency: &Agency) -> Self {
        Self {
            id: agency.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: agency.name.clone(),
            company_email: agency.company_email.clone(),
            company_phone: agency.company_phone.clone(),
            agency_logo: agency.agency_logo.clone(),
            white_label: agency.white_label,
            plan: agency.plan,
            goal: agency.goal,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpsertAgencyRequest {
    pub id: Option<String>,
    #[validate(length(min = 2))]
    pub name: String,
    pub company_email: String,
    pub company_phone: Option<String>,
    pub agency_logo: Option<String>,
    #[serde(default)]
    pub white_label: bool,
    pub plan: Option<Plan>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub goal: Option<u32>,
}

pub async fn upsert(
    State(state): State<AppState>,
    CurrentCaller(_caller): CurrentCaller,
    Json(body): Json<UpsertAgencyRequest>,
) -> Result<Json<AgencyResponse>, ApiError> {
    body.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let id = body
        .id
        .as_deref()
        .map(ObjectId::parse_str)
        .transpose()
        .map_err(|_| ApiError::BadRequest("Invalid agency id".to_string()))?;

    let agency = state
        .agencies
        .upsert(AgencyInput {
            id,
            name: body.name,
            company_email: body.company_email,
            company_phone: body.company_phone,
            agency_logo: body.agency_logo,
            white_label: body.white_label,
            plan: body.plan,
            address: body.address,
            city: body.city,
            zip_code: body.zip_code,
            state: body.state,
            country: body.country,
            goal: body.goal,
        })
        .await?
        .ok_or_else(|| ApiError::Validation("A company email is required".to_string()))?;

    Ok(Json(AgencyResponse::from_agency(&agency)))
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateAgencyRequest {
    pub name: Option<String>,
    pub company_email: Option<String>,
    pub company_phone: Option<String>,
    pub agency_logo: Option<String>,
    pub white_label: Option<bool>,
    pub plan: Option<Plan>,
    pub goal: Option<u32>,
}

pub async fn update(
    State(state): State<AppState>,
    CurrentCaller(_caller): CurrentCaller,
    Path(agency_id): Path<String>,
    Json(body): Json<UpdateAgencyRequest>,
) -> Result<Json<AgencyResponse>, ApiError> {
    let aid = ObjectId::parse_str(&agency_id)
        .map_err(|_| ApiError::BadRequest("Invalid agency_id".to_string()))?;

    let agency = state
        .agencies
        .update_details(
            aid,
            AgencyUpdate {
                name: body.name,
                company_email: body.company_email,
                company_phone: body.company_phone,
                agency_logo: body.agency_logo,
                white_label: body.white_label,
                plan: body.plan,
                goal: body.goal,
            },
        )
        .await?;

    Ok(Json(AgencyResponse::from_agency(&agency)))
}

pub async fn delete(
    State(state): State<AppState>,
    CurrentCaller(_caller): CurrentCaller,
    Path(agency_id): Path<String>,
) -> Result<Json<AgencyResponse>, ApiError> {
    let aid = ObjectId::parse_str(&agency_id)
        .map_err(|_| ApiError::BadRequest("Invalid agency_id".to_string()))?;

    let deleted = state.agencies.delete(aid).await?;
    Ok(Json(AgencyResponse::from_agency(&deleted)))
}

#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub id: String,
    pub message: String,
    pub sub_account_id: Option<String>,
    pub created_at: String,
    pub user: Option<UserResponse>,
}

/// Newest-first activity feed for the agency.
pub async fn notifications(
    State(state): State<AppState>,
    CurrentCaller(_caller): CurrentCaller,
    Path(agency_id): Path<String>,
) -> Result<Json<Vec<NotificationResponse>>, ApiError> {
    let aid = ObjectId::parse_str(&agency_id)
        .map_err(|_| ApiError::BadRequest("Invalid agency_id".to_string()))?;

    let entries = state.notifications.list_for_agency(aid).await?;

    let response = entries
        .into_iter()
        .map(|(n, user)| NotificationResponse {
            id: n.id.map(|id| id.to_hex()).unwrap_or_default(),
            message: n.message,
            sub_account_id: n.sub_account_id.map(|id| id.to_hex()),
            created_at: n.created_at.try_to_rfc3339_string().unwrap_or_default(),
            user: user.as_ref().map(UserResponse::from_user),
        })
        .collect();

    Ok(Json(response))
}

#[derive(Debug, Serialize)]
pub struct TeamMemberResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub permissions: Vec<PermissionResponse>,
}

/// The agency's users with their permission rows.
pub async fn team(
    State(state): State<AppState>,
    CurrentCaller(_caller): CurrentCaller,
    Path(agency_id): Path<String>,
) -> Result<Json<Vec<TeamMemberResponse>>, ApiError> {
    let aid = ObjectId::parse_str(&agency_id)
        .map_err(|_| ApiError::BadRequest("Invalid agency_id".to_string()))?;

    let members = state.users.list_by_agency(aid).await?;

    let emails: Vec<&str> = members.iter().map(|u| u.email.as_str()).collect();
    let permissions = if emails.is_empty() {
        Vec::new()
    } else {
        state
            .permissions
            .base
            .find_many(doc! { "email": { "$in": emails } }, None)
            .await?
    };

    let response = members
        .iter()
        .map(|user| TeamMemberResponse {
            user: UserResponse::from_user(user),
            permissions: permissions
                .iter()
                .filter(|p| p.email == user.email)
                .map(PermissionResponse::from_permission)
                .collect(),
        })
        .collect();

    Ok(Json(response))
}

#[derive(Debug, Deserialize, Validate)]
pub struct SendInvitationRequest {
    #[validate(email)]
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct InvitationResponse {
    pub id: String,
    pub email: String,
    pub agency_id: String,
    pub role: Role,
}

/// Creates a pending invitation and records the action.
pub async fn send_invitation(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Path(agency_id): Path<String>,
    Json(body): Json<SendInvitationRequest>,
) -> Result<Json<InvitationResponse>, ApiError> {
    body.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let aid = ObjectId::parse_str(&agency_id)
        .map_err(|_| ApiError::BadRequest("Invalid agency_id".to_string()))?;

    let invitation = state
        .invitations
        .create(body.email.clone(), aid, body.role)
        .await?;

    if let Err(error) = state
        .activity
        .log_activity(
            Some(&caller),
            &format!("Invited {}", body.email),
            Some(aid),
            None,
        )
        .await
    {
        warn!(%error, "Failed to record invitation activity");
    }

    Ok(Json(InvitationResponse {
        id: invitation.id.map(|id| id.to_hex()).unwrap_or_default(),
        email: invitation.email,
        agency_id: invitation.agency_id.to_hex(),
        role: invitation.role,
    }))
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpsertSubAccountRequest {
    pub id: Option<String>,
    #[validate(length(min = 2))]
    pub name: String,
    pub company_email: String,
    pub company_phone: Option<String>,
    pub sub_account_logo: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub goal: Option<u32>,
}

pub async fn upsert_sub_account(
    State(state): State<AppState>,
    CurrentCaller(_caller): CurrentCaller,
    Path(agency_id): Path<String>,
    Json(body): Json<UpsertSubAccountRequest>,
) -> Result<Json<SubAccountResponse>, ApiError> {
    body.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let aid = ObjectId::parse_str(&agency_id)
        .map_err(|_| ApiError::BadRequest("Invalid agency_id".to_string()))?;
    let id = body
        .id
        .as_deref()
        .map(ObjectId::parse_str)
        .transpose()
        .map_err(|_| ApiError::BadRequest("Invalid sub-account id".to_string()))?;

    let sub_account = state
        .sub_accounts
        .upsert(SubAccountInput {
            id,
            agency_id: aid,
            name: body.name,
            company_email: body.company_email,
            company_phone: body.company_phone,
            sub_account_logo: body.sub_account_logo,
            address: body.address,
            city: body.city,
            zip_code: body.zip_code,
            state: body.state,
            country: body.country,
            goal: body.goal,
        })
        .await?
        .ok_or_else(|| ApiError::Validation("A company email is required".to_string()))?;

    Ok(Json(SubAccountResponse::from_sub_account(&sub_account)))
}
