use axum::{
    Json,
    extract::{Path, State},
};
use bson::oid::ObjectId;
use serde::Serialize;
use agencyhub_db::models::SidebarOption;
use agencyhub_services::{SidebarOwner, resolve_sidebar_logo};

use crate::{error::ApiError, extractors::auth::CurrentCaller, state::AppState};

use super::sub_account::SubAccountResponse;

#[derive(Debug, Serialize)]
pub struct SidebarOptionResponse {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub link: String,
}

impl SidebarOptionResponse {
    fn from_option(option: &SidebarOption) -> Self {
        Self {
            id: option.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: option.name.clone(),
            icon: option.icon.clone(),
            link: option.link.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SidebarResponse {
    pub logo: String,
    pub options: Vec<SidebarOptionResponse>,
    /// Sub-accounts the caller holds a granted permission for.
    pub sub_accounts: Vec<SubAccountResponse>,
}

/// Everything the navigation shell renders for one scope: the resolved
/// logo, the scope's own option set, and the caller's visible sub-accounts.
pub async fn get(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Json<SidebarResponse>, ApiError> {
    let details = state
        .access
        .auth_user_details(&caller)
        .await?
        .ok_or_else(|| ApiError::NotFound("No user record for caller".to_string()))?;

    let Some(agency) = details.agency.as_ref() else {
        return Err(ApiError::NotFound("Caller has no agency".to_string()));
    };

    let owner = match kind.as_str() {
        "agency" => {
            let aid = ObjectId::parse_str(&id)
                .map_err(|_| ApiError::BadRequest("Invalid agency id".to_string()))?;
            if agency.id != Some(aid) {
                return Err(ApiError::Forbidden("Not a member of this agency".to_string()));
            }
            SidebarOwner::Agency(aid)
        }
        "subaccount" => {
            let sid = ObjectId::parse_str(&id)
                .map_err(|_| ApiError::BadRequest("Invalid sub-account id".to_string()))?;
            if !details.sub_accounts.iter().any(|s| s.id == Some(sid)) {
                return Err(ApiError::Forbidden(
                    "Sub-account does not belong to the caller's agency".to_string(),
                ));
            }
            SidebarOwner::SubAccount(sid)
        }
        _ => return Err(ApiError::BadRequest("Unknown sidebar type".to_string())),
    };

    let scope = match owner {
        SidebarOwner::SubAccount(sid) => {
            details.sub_accounts.iter().find(|s| s.id == Some(sid))
        }
        SidebarOwner::Agency(_) => None,
    };

    let logo = resolve_sidebar_logo(agency, scope);
    let options = state.access.sidebar_options(owner).await?;
    let visible = state.access.visible_sub_accounts(&details.user).await?;

    Ok(Json(SidebarResponse {
        logo,
        options: options.iter().map(SidebarOptionResponse::from_option).collect(),
        sub_accounts: visible
            .iter()
            .map(SubAccountResponse::from_sub_account)
            .collect(),
    }))
}
