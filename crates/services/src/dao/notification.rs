use bson::{DateTime, doc, oid::ObjectId};
use mongodb::Database;
use std::collections::HashMap;
use agencyhub_db::models::{Notification, User};

use super::base::{BaseDao, DaoResult};

pub struct NotificationDao {
    pub base: BaseDao<Notification>,
    users: BaseDao<User>,
}

impl NotificationDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Notification::COLLECTION),
            users: BaseDao::new(db, User::COLLECTION),
        }
    }

    pub async fn create(
        &self,
        message: String,
        user_id: ObjectId,
        agency_id: ObjectId,
        sub_account_id: Option<ObjectId>,
    ) -> DaoResult<ObjectId> {
        let notification = Notification {
            id: None,
            message,
            user_id,
            agency_id,
            sub_account_id,
            created_at: DateTime::now(),
        };
        self.base.insert_one(&notification).await
    }

    /// Newest-first activity feed for an agency, with the acting user
    /// attached where the record still exists.
    pub async fn list_for_agency(
        &self,
        agency_id: ObjectId,
    ) -> DaoResult<Vec<(Notification, Option<User>)>> {
        let notifications = self
            .base
            .find_many(
                doc! { "agency_id": agency_id },
                Some(doc! { "created_at": -1 }),
            )
            .await?;

        let user_ids: Vec<ObjectId> = notifications.iter().map(|n| n.user_id).collect();
        let users = if user_ids.is_empty() {
            Vec::new()
        } else {
            self.users
                .find_many(doc! { "_id": { "$in": user_ids } }, None)
                .await?
        };
        let by_id: HashMap<ObjectId, User> = users
            .into_iter()
            .filter_map(|u| u.id.map(|id| (id, u)))
            .collect();

        Ok(notifications
            .into_iter()
            .map(|n| {
                let user = by_id.get(&n.user_id).cloned();
                (n, user)
            })
            .collect())
    }
}
