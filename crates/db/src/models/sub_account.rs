use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// A workspace owned by exactly one agency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubAccount {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub agency_id: ObjectId,
    pub name: String,
    pub company_email: String,
    pub company_phone: Option<String>,
    pub sub_account_logo: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    #[serde(default = "default_goal")]
    pub goal: u32,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

fn default_goal() -> u32 {
    5
}

impl SubAccount {
    pub const COLLECTION: &'static str = "sub_accounts";
}
