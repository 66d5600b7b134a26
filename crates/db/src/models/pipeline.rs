use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipeline {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub sub_account_id: ObjectId,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Pipeline {
    pub const COLLECTION: &'static str = "pipelines";
}
