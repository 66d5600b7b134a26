use bson::{DateTime, doc, oid::ObjectId};
use mongodb::Database;
use agencyhub_db::models::Permission;

use super::base::{BaseDao, DaoError, DaoResult};

pub struct PermissionDao {
    pub base: BaseDao<Permission>,
}

impl PermissionDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Permission::COLLECTION),
        }
    }

    /// Grant or revoke access. Updates the known row when an id is given,
    /// otherwise upserts on the (email, sub_account_id) key. Revocation
    /// keeps the row with `access = false`.
    pub async fn change(
        &self,
        permission_id: Option<ObjectId>,
        email: &str,
        sub_account_id: ObjectId,
        access: bool,
    ) -> DaoResult<Permission> {
        if let Some(id) = permission_id {
            self.base
                .update_by_id(id, doc! { "$set": { "access": access } })
                .await?;
            return self.base.find_by_id(id).await;
        }

        let filter = doc! { "email": email, "sub_account_id": sub_account_id };
        self.base
            .upsert_one(
                filter.clone(),
                doc! {
                    "$set": { "access": access, "updated_at": DateTime::now() },
                    "$setOnInsert": {
                        "email": email,
                        "sub_account_id": sub_account_id,
                        "created_at": DateTime::now(),
                    },
                },
            )
            .await?;

        self.base.find_one(filter).await?.ok_or(DaoError::NotFound)
    }

    pub async fn for_email(&self, email: &str) -> DaoResult<Vec<Permission>> {
        self.base.find_many(doc! { "email": email }, None).await
    }

    pub async fn granted_for_email(&self, email: &str) -> DaoResult<Vec<Permission>> {
        self.base
            .find_many(doc! { "email": email, "access": true }, None)
            .await
    }
}
