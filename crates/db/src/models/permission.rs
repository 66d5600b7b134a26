use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// Grant record controlling a user's visibility into a sub-account.
///
/// Keyed by email rather than a user reference so access can be granted
/// before the user record exists (invitations precede accounts). At most one
/// row per (email, sub_account_id); revocation flips `access` instead of
/// deleting the row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permission {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    pub sub_account_id: ObjectId,
    pub access: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Permission {
    pub const COLLECTION: &'static str = "permissions";
}
