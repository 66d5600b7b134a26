use bson::{DateTime, doc, oid::ObjectId};
use mongodb::Database;
use agencyhub_db::models::{
    Permission, Pipeline, Role, SidebarOption, SubAccount, User,
};
use tracing::debug;

use super::base::{BaseDao, DaoError, DaoResult};

#[derive(Debug, Clone)]
pub struct SubAccountInput {
    pub id: Option<ObjectId>,
    pub agency_id: ObjectId,
    pub name: String,
    pub company_email: String,
    pub company_phone: Option<String>,
    pub sub_account_logo: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub goal: Option<u32>,
}

pub struct SubAccountDao {
    pub base: BaseDao<SubAccount>,
    pub sidebar_options: BaseDao<SidebarOption>,
    pub pipelines: BaseDao<Pipeline>,
    pub permissions: BaseDao<Permission>,
    users: BaseDao<User>,
}

impl SubAccountDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, SubAccount::COLLECTION),
            sidebar_options: BaseDao::new(db, SidebarOption::COLLECTION),
            pipelines: BaseDao::new(db, Pipeline::COLLECTION),
            permissions: BaseDao::new(db, Permission::COLLECTION),
            users: BaseDao::new(db, User::COLLECTION),
        }
    }

    /// Upsert keyed by id. First creation seeds one "Lead Cycle" pipeline,
    /// a permission granting the owning agency's owner access, and the
    /// default sub-account sidebar. An input without a company email is a
    /// no-op.
    pub async fn upsert(&self, input: SubAccountInput) -> DaoResult<Option<SubAccount>> {
        if input.company_email.is_empty() {
            return Ok(None);
        }

        let existing = match input.id {
            Some(id) => self.base.find_one(doc! { "_id": id }).await?,
            None => None,
        };

        if let Some(sub_account) = existing {
            let id = sub_account.id.expect("stored sub-account has an id");
            self.base
                .update_by_id(
                    id,
                    doc! { "$set": {
                        "name": &input.name,
                        "company_email": &input.company_email,
                        "company_phone": input.company_phone.as_deref(),
                        "sub_account_logo": input.sub_account_logo.as_deref(),
                        "address": input.address.as_deref(),
                        "city": input.city.as_deref(),
                        "zip_code": input.zip_code.as_deref(),
                        "state": input.state.as_deref(),
                        "country": input.country.as_deref(),
                    } },
                )
                .await?;
            return self.base.find_by_id(id).await.map(Some);
        }

        // The first permission holder must be the agency's owner
        let agency_owner = self
            .users
            .find_one(doc! {
                "agency_id": input.agency_id,
                "role": bson::to_bson(&Role::AgencyOwner)?,
            })
            .await?
            .ok_or_else(|| DaoError::Validation("agency has no owner".to_string()))?;

        let now = DateTime::now();
        let sub_account = SubAccount {
            id: input.id,
            agency_id: input.agency_id,
            name: input.name,
            company_email: input.company_email,
            company_phone: input.company_phone,
            sub_account_logo: input.sub_account_logo,
            address: input.address,
            city: input.city,
            zip_code: input.zip_code,
            state: input.state,
            country: input.country,
            goal: input.goal.unwrap_or(5),
            created_at: now,
            updated_at: now,
        };

        let sub_account_id = self.base.insert_one(&sub_account).await?;

        self.permissions
            .insert_one(&Permission {
                id: None,
                email: agency_owner.email.clone(),
                sub_account_id,
                access: true,
                created_at: now,
                updated_at: now,
            })
            .await?;

        self.pipelines
            .insert_one(&Pipeline {
                id: None,
                name: "Lead Cycle".to_string(),
                sub_account_id,
                created_at: now,
                updated_at: now,
            })
            .await?;

        self.seed_sidebar_options(sub_account_id).await?;

        debug!(%sub_account_id, "Created sub-account with seeded defaults");
        self.base.find_by_id(sub_account_id).await.map(Some)
    }

    async fn seed_sidebar_options(&self, sub_account_id: ObjectId) -> DaoResult<()> {
        let id = sub_account_id.to_hex();
        let entries = [
            ("Launchpad", "clipboardIcon", format!("/subaccount/{id}/launchpad")),
            ("Settings", "settings", format!("/subaccount/{id}/settings")),
            ("Funnels", "pipelines", format!("/subaccount/{id}/funnels")),
            ("Media", "database", format!("/subaccount/{id}/media")),
            ("Automations", "chip", format!("/subaccount/{id}/automations")),
            ("Pipelines", "flag", format!("/subaccount/{id}/pipelines")),
            ("Contacts", "person", format!("/subaccount/{id}/contacts")),
            ("Dashboard", "category", format!("/subaccount/{id}")),
        ];

        let now = DateTime::now();
        for (name, icon, link) in entries {
            let option = SidebarOption {
                id: None,
                name: name.to_string(),
                icon: icon.to_string(),
                link,
                agency_id: None,
                sub_account_id: Some(sub_account_id),
                created_at: now,
                updated_at: now,
            };
            self.sidebar_options.insert_one(&option).await?;
        }
        Ok(())
    }

    pub async fn find(&self, sub_account_id: ObjectId) -> DaoResult<SubAccount> {
        self.base.find_by_id(sub_account_id).await
    }

    /// Deletes the sub-account and its seeded children. Notifications that
    /// reference it are kept; they remain part of the agency's immutable
    /// activity history.
    pub async fn delete(&self, sub_account_id: ObjectId) -> DaoResult<SubAccount> {
        let sub_account = self.base.find_by_id(sub_account_id).await?;

        self.pipelines
            .hard_delete(doc! { "sub_account_id": sub_account_id })
            .await?;
        self.permissions
            .hard_delete(doc! { "sub_account_id": sub_account_id })
            .await?;
        self.sidebar_options
            .hard_delete(doc! { "sub_account_id": sub_account_id })
            .await?;
        self.base.hard_delete(doc! { "_id": sub_account_id }).await?;

        Ok(sub_account)
    }
}
