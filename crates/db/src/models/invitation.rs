use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

use super::user::Role;

/// Single-use pending grant binding an email to a future user and role
/// within an agency. Acceptance creates the user and deletes this record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invitation {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    pub agency_id: ObjectId,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub status: InvitationStatus,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvitationStatus {
    #[default]
    Pending,
    Accepted,
}

impl Invitation {
    pub const COLLECTION: &'static str = "invitations";
}
