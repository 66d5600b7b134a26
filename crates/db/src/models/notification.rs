use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// Immutable activity-log entry. Always scoped to an agency; the sub-account
/// reference is present only for sub-account-scoped actions and always
/// belongs to that agency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// `"<user display name> | <description>"`
    pub message: String,
    pub user_id: ObjectId,
    pub agency_id: ObjectId,
    pub sub_account_id: Option<ObjectId>,
    pub created_at: DateTime,
}

impl Notification {
    pub const COLLECTION: &'static str = "notifications";
}
