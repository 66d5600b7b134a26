use bson::{DateTime, doc, oid::ObjectId};
use mongodb::Database;
use agencyhub_db::models::{Role, User};

use super::base::{BaseDao, DaoResult};

#[derive(Debug, Clone)]
pub struct NewUser {
    pub subject: String,
    pub email: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub role: Role,
}

#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub role: Option<Role>,
}

pub struct UserDao {
    pub base: BaseDao<User>,
}

impl UserDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, User::COLLECTION),
        }
    }

    /// Upsert keyed by email, used when an authenticated caller first
    /// reaches the backend. An existing record only has its role refreshed;
    /// a new record starts without an agency binding.
    pub async fn init(&self, new_user: NewUser) -> DaoResult<User> {
        if let Some(existing) = self.find_by_email(&new_user.email).await? {
            let id = existing.id.expect("stored user has an id");
            self.base
                .update_by_id(
                    id,
                    doc! { "$set": { "role": bson::to_bson(&new_user.role)? } },
                )
                .await?;
            return self.base.find_by_id(id).await;
        }

        let now = DateTime::now();
        let user = User {
            id: None,
            subject: new_user.subject,
            email: new_user.email,
            name: new_user.name,
            avatar_url: new_user.avatar_url,
            role: new_user.role,
            agency_id: None,
            created_at: now,
            updated_at: now,
        };
        let id = self.base.insert_one(&user).await?;
        self.base.find_by_id(id).await
    }

    /// Adds a team member to an agency. The owner role is never granted
    /// through this path; such a call is a no-op.
    pub async fn create_team_user(
        &self,
        agency_id: ObjectId,
        new_user: NewUser,
    ) -> DaoResult<Option<User>> {
        if new_user.role == Role::AgencyOwner {
            return Ok(None);
        }

        let now = DateTime::now();
        let user = User {
            id: None,
            subject: new_user.subject,
            email: new_user.email,
            name: new_user.name,
            avatar_url: new_user.avatar_url,
            role: new_user.role,
            agency_id: Some(agency_id),
            created_at: now,
            updated_at: now,
        };
        let id = self.base.insert_one(&user).await?;
        self.base.find_by_id(id).await.map(Some)
    }

    pub async fn find_by_email(&self, email: &str) -> DaoResult<Option<User>> {
        self.base.find_one(doc! { "email": email }).await
    }

    pub async fn list_by_agency(&self, agency_id: ObjectId) -> DaoResult<Vec<User>> {
        self.base
            .find_many(doc! { "agency_id": agency_id }, None)
            .await
    }

    pub async fn update_by_email(&self, email: &str, update: UserUpdate) -> DaoResult<User> {
        let mut set = bson::Document::new();
        if let Some(name) = update.name {
            set.insert("name", name);
        }
        if let Some(avatar_url) = update.avatar_url {
            set.insert("avatar_url", avatar_url);
        }
        if let Some(role) = update.role {
            set.insert("role", bson::to_bson(&role)?);
        }

        if !set.is_empty() {
            self.base
                .update_one(doc! { "email": email }, doc! { "$set": set })
                .await?;
        }
        self.base
            .find_one(doc! { "email": email })
            .await?
            .ok_or(super::base::DaoError::NotFound)
    }

    pub async fn delete(&self, user_id: ObjectId) -> DaoResult<User> {
        let user = self.base.find_by_id(user_id).await?;
        self.base.hard_delete(doc! { "_id": user_id }).await?;
        Ok(user)
    }
}
