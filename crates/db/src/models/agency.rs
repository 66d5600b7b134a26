use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// Root tenant. Owns sub-accounts and agency-level sidebar options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agency {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub company_email: String,
    pub company_phone: Option<String>,
    pub agency_logo: Option<String>,
    #[serde(default)]
    pub white_label: bool,
    #[serde(default)]
    pub plan: Plan,
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

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    #[default]
    Free,
    Basic,
    Unlimited,
}

fn default_goal() -> u32 {
    5
}

impl Agency {
    pub const COLLECTION: &'static str = "agencies";
}
