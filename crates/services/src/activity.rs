use bson::{DateTime, doc, oid::ObjectId};
use mongodb::Database;
use agencyhub_db::models::{Notification, SubAccount, User};
use thiserror::Error;
use tracing::warn;

use crate::dao::base::{BaseDao, DaoError, DaoResult};
use crate::identity::Caller;

#[derive(Debug, Error)]
pub enum ActivityError {
    #[error("an agency id or sub-account id is required")]
    MissingScope,
    #[error(transparent)]
    Dao(#[from] DaoError),
}

/// Resolves who acted and which agency owns the action, and records the
/// result as a notification.
pub struct ActivityService {
    users: BaseDao<User>,
    sub_accounts: BaseDao<SubAccount>,
    notifications: BaseDao<Notification>,
}

impl ActivityService {
    pub fn new(db: &Database) -> Self {
        Self {
            users: BaseDao::new(db, User::COLLECTION),
            sub_accounts: BaseDao::new(db, SubAccount::COLLECTION),
            notifications: BaseDao::new(db, Notification::COLLECTION),
        }
    }

    /// Determines the acting user for a partially known context.
    ///
    /// An authenticated caller is looked up by verified email (exact,
    /// case-sensitive). Without a caller, the first user of the agency
    /// owning `sub_account_id` stands in — "first" by store order, a
    /// deterministic but arbitrary pick when the agency has several users.
    /// `None` means no actor is available; that is a skip condition for the
    /// caller, not an error.
    pub async fn resolve_acting_user(
        &self,
        caller: Option<&Caller>,
        sub_account_id: Option<ObjectId>,
    ) -> DaoResult<Option<User>> {
        if let Some(caller) = caller {
            return self.users.find_one(doc! { "email": &caller.email }).await;
        }

        let Some(sub_account_id) = sub_account_id else {
            return Ok(None);
        };
        let Some(sub_account) = self
            .sub_accounts
            .find_one(doc! { "_id": sub_account_id })
            .await?
        else {
            return Ok(None);
        };

        self.users
            .find_one(doc! { "agency_id": sub_account.agency_id })
            .await
    }

    /// A given agency id is taken at face value; existence is enforced by
    /// the store at write time. Without one, the sub-account's owner is
    /// looked up. With neither, the call itself is malformed.
    pub async fn resolve_owning_agency(
        &self,
        agency_id: Option<ObjectId>,
        sub_account_id: Option<ObjectId>,
    ) -> Result<ObjectId, ActivityError> {
        if let Some(agency_id) = agency_id {
            return Ok(agency_id);
        }

        let sub_account_id = sub_account_id.ok_or(ActivityError::MissingScope)?;
        let sub_account = self
            .sub_accounts
            .find_one(doc! { "_id": sub_account_id })
            .await
            .map_err(ActivityError::Dao)?
            .ok_or(ActivityError::Dao(DaoError::NotFound))?;

        Ok(sub_account.agency_id)
    }

    /// Records `"<actor display name> | <description>"` scoped to the
    /// resolved agency, and to the sub-account when one was supplied.
    ///
    /// An unresolvable actor skips the write with a diagnostic — logging
    /// must never block the action it accompanies. `MissingScope` is the
    /// one hard failure: it flags a malformed call, not a runtime state.
    pub async fn log_activity(
        &self,
        caller: Option<&Caller>,
        description: &str,
        agency_id: Option<ObjectId>,
        sub_account_id: Option<ObjectId>,
    ) -> Result<(), ActivityError> {
        let Some(actor) = self.resolve_acting_user(caller, sub_account_id).await? else {
            warn!(description, "Could not resolve an acting user, skipping activity log");
            return Ok(());
        };

        let agency_id = self.resolve_owning_agency(agency_id, sub_account_id).await?;

        let notification = Notification {
            id: None,
            message: format!("{} | {}", actor.name, description),
            user_id: actor.id.expect("stored user has an id"),
            agency_id,
            sub_account_id,
            created_at: DateTime::now(),
        };
        self.notifications.insert_one(&notification).await?;
        Ok(())
    }
}
