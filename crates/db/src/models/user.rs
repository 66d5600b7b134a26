use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// Subject claim of the external identity provider.
    pub subject: String,
    pub email: String,
    pub name: String,
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub role: Role,
    /// Unset until the user is bound to an agency (sign-up precedes
    /// agency creation and invitation acceptance).
    pub agency_id: Option<ObjectId>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// Wire format matches the role values the identity provider stores in its
/// side-channel metadata.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    AgencyOwner,
    AgencyAdmin,
    #[default]
    SubaccountUser,
    SubaccountGuest,
}

impl User {
    pub const COLLECTION: &'static str = "users";
}
