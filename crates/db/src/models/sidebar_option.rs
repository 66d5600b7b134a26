use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// Navigation entry owned by either an agency or a sub-account, never both.
/// Seeded atomically with its owner's creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SidebarOption {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub icon: String,
    pub link: String,
    pub agency_id: Option<ObjectId>,
    pub sub_account_id: Option<ObjectId>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl SidebarOption {
    pub const COLLECTION: &'static str = "sidebar_options";
}
