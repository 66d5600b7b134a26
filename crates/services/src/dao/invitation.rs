use bson::{DateTime, doc, oid::ObjectId};
use mongodb::Database;
use agencyhub_db::models::{Invitation, InvitationStatus, Role};

use super::base::{BaseDao, DaoError, DaoResult};

pub struct InvitationDao {
    pub base: BaseDao<Invitation>,
}

impl InvitationDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Invitation::COLLECTION),
        }
    }

    /// Creates a pending invitation. The owner role is assigned at agency
    /// creation and can never arrive through an invitation.
    pub async fn create(
        &self,
        email: String,
        agency_id: ObjectId,
        role: Role,
    ) -> DaoResult<Invitation> {
        if role == Role::AgencyOwner {
            return Err(DaoError::Validation(
                "an invitation cannot grant the agency owner role".to_string(),
            ));
        }

        let now = DateTime::now();
        let invitation = Invitation {
            id: None,
            email,
            agency_id,
            role,
            status: InvitationStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        let id = self.base.insert_one(&invitation).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find_pending(&self, email: &str) -> DaoResult<Option<Invitation>> {
        self.base
            .find_one(doc! {
                "email": email,
                "status": bson::to_bson(&InvitationStatus::Pending)?,
            })
            .await
    }

    /// Deletion is keyed by email (not a held reference) so a partially
    /// failed acceptance can be re-driven.
    pub async fn delete_by_email(&self, email: &str) -> DaoResult<u64> {
        self.base.hard_delete(doc! { "email": email }).await
    }
}
