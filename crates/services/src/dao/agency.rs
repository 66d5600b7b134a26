use bson::{DateTime, doc, oid::ObjectId};
use mongodb::Database;
use agencyhub_db::models::{
    Agency, Invitation, Notification, Permission, Pipeline, Plan, Role, SidebarOption,
    SubAccount, User,
};
use tracing::debug;

use super::base::{BaseDao, DaoError, DaoResult};

#[derive(Debug, Clone)]
pub struct AgencyInput {
    pub id: Option<ObjectId>,
    pub name: String,
    pub company_email: String,
    pub company_phone: Option<String>,
    pub agency_logo: Option<String>,
    pub white_label: bool,
    pub plan: Option<Plan>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub goal: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct AgencyUpdate {
    pub name: Option<String>,
    pub company_email: Option<String>,
    pub company_phone: Option<String>,
    pub agency_logo: Option<String>,
    pub white_label: Option<bool>,
    pub plan: Option<Plan>,
    pub goal: Option<u32>,
}

pub struct AgencyDao {
    pub base: BaseDao<Agency>,
    pub sidebar_options: BaseDao<SidebarOption>,
    users: BaseDao<User>,
    sub_accounts: BaseDao<SubAccount>,
    permissions: BaseDao<Permission>,
    pipelines: BaseDao<Pipeline>,
    notifications: BaseDao<Notification>,
    invitations: BaseDao<Invitation>,
}

impl AgencyDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Agency::COLLECTION),
            sidebar_options: BaseDao::new(db, SidebarOption::COLLECTION),
            users: BaseDao::new(db, User::COLLECTION),
            sub_accounts: BaseDao::new(db, SubAccount::COLLECTION),
            permissions: BaseDao::new(db, Permission::COLLECTION),
            pipelines: BaseDao::new(db, Pipeline::COLLECTION),
            notifications: BaseDao::new(db, Notification::COLLECTION),
            invitations: BaseDao::new(db, Invitation::COLLECTION),
        }
    }

    /// Upsert keyed by id. First creation binds the user holding the company
    /// email as AGENCY_OWNER and seeds the default agency sidebar. An input
    /// without a company email is a no-op.
    pub async fn upsert(&self, input: AgencyInput) -> DaoResult<Option<Agency>> {
        if input.company_email.is_empty() {
            return Ok(None);
        }

        let existing = match input.id {
            Some(id) => self.base.find_one(doc! { "_id": id }).await?,
            None => None,
        };

        if let Some(agency) = existing {
            let id = agency.id.expect("stored agency has an id");
            let mut set = doc! {
                "name": &input.name,
                "company_email": &input.company_email,
                "company_phone": input.company_phone.as_deref(),
                "agency_logo": input.agency_logo.as_deref(),
                "white_label": input.white_label,
                "address": input.address.as_deref(),
                "city": input.city.as_deref(),
                "zip_code": input.zip_code.as_deref(),
                "state": input.state.as_deref(),
                "country": input.country.as_deref(),
            };
            if let Some(plan) = input.plan {
                set.insert("plan", bson::to_bson(&plan)?);
            }
            if let Some(goal) = input.goal {
                set.insert("goal", goal);
            }
            self.base.update_by_id(id, doc! { "$set": set }).await?;
            return self.base.find_by_id(id).await.map(Some);
        }

        // The creating owner must already exist (provisioned at sign-in)
        let owner = self
            .users
            .find_one(doc! { "email": &input.company_email })
            .await?
            .ok_or_else(|| {
                DaoError::Validation(format!(
                    "no user matches the agency company email {}",
                    input.company_email
                ))
            })?;

        let now = DateTime::now();
        let agency = Agency {
            id: input.id,
            name: input.name,
            company_email: input.company_email,
            company_phone: input.company_phone,
            agency_logo: input.agency_logo,
            white_label: input.white_label,
            plan: input.plan.unwrap_or_default(),
            address: input.address,
            city: input.city,
            zip_code: input.zip_code,
            state: input.state,
            country: input.country,
            goal: input.goal.unwrap_or(5),
            created_at: now,
            updated_at: now,
        };

        let agency_id = self.base.insert_one(&agency).await?;

        self.users
            .update_by_id(
                owner.id.expect("stored user has an id"),
                doc! { "$set": {
                    "agency_id": agency_id,
                    "role": bson::to_bson(&Role::AgencyOwner)?,
                } },
            )
            .await?;

        self.seed_sidebar_options(agency_id).await?;

        self.base.find_by_id(agency_id).await.map(Some)
    }

    async fn seed_sidebar_options(&self, agency_id: ObjectId) -> DaoResult<()> {
        let id = agency_id.to_hex();
        let entries = [
            ("Dashboard", "category", format!("/agency/{id}")),
            ("Launchpad", "clipboardIcon", format!("/agency/{id}/launchpad")),
            ("Billing", "payment", format!("/agency/{id}/billing")),
            ("Settings", "settings", format!("/agency/{id}/settings")),
            ("Sub Accounts", "person", format!("/agency/{id}/all-subaccounts")),
            ("Team", "shield", format!("/agency/{id}/team")),
        ];

        let now = DateTime::now();
        for (name, icon, link) in entries {
            let option = SidebarOption {
                id: None,
                name: name.to_string(),
                icon: icon.to_string(),
                link,
                agency_id: Some(agency_id),
                sub_account_id: None,
                created_at: now,
                updated_at: now,
            };
            self.sidebar_options.insert_one(&option).await?;
        }
        Ok(())
    }

    pub async fn find(&self, agency_id: ObjectId) -> DaoResult<Agency> {
        self.base.find_by_id(agency_id).await
    }

    pub async fn update_details(
        &self,
        agency_id: ObjectId,
        update: AgencyUpdate,
    ) -> DaoResult<Agency> {
        let mut set = bson::Document::new();
        if let Some(name) = update.name {
            set.insert("name", name);
        }
        if let Some(email) = update.company_email {
            set.insert("company_email", email);
        }
        if let Some(phone) = update.company_phone {
            set.insert("company_phone", phone);
        }
        if let Some(logo) = update.agency_logo {
            set.insert("agency_logo", logo);
        }
        if let Some(white_label) = update.white_label {
            set.insert("white_label", white_label);
        }
        if let Some(plan) = update.plan {
            set.insert("plan", bson::to_bson(&plan)?);
        }
        if let Some(goal) = update.goal {
            set.insert("goal", goal);
        }

        if !set.is_empty() {
            self.base.update_by_id(agency_id, doc! { "$set": set }).await?;
        }
        self.base.find_by_id(agency_id).await
    }

    /// Deletes the agency and everything it exclusively owns: sub-accounts
    /// with their seeded children, users, sidebar options, notifications and
    /// open invitations. The store has no referential actions, so the
    /// cascade is spelled out here.
    pub async fn delete(&self, agency_id: ObjectId) -> DaoResult<Agency> {
        let agency = self.base.find_by_id(agency_id).await?;

        let sub_accounts = self
            .sub_accounts
            .find_many(doc! { "agency_id": agency_id }, None)
            .await?;
        let sub_account_ids: Vec<ObjectId> = sub_accounts
            .iter()
            .filter_map(|s| s.id)
            .collect();

        if !sub_account_ids.is_empty() {
            self.pipelines
                .hard_delete(doc! { "sub_account_id": { "$in": &sub_account_ids } })
                .await?;
            self.permissions
                .hard_delete(doc! { "sub_account_id": { "$in": &sub_account_ids } })
                .await?;
            self.sidebar_options
                .hard_delete(doc! { "sub_account_id": { "$in": &sub_account_ids } })
                .await?;
            self.sub_accounts
                .hard_delete(doc! { "agency_id": agency_id })
                .await?;
        }

        self.sidebar_options
            .hard_delete(doc! { "agency_id": agency_id })
            .await?;
        self.notifications
            .hard_delete(doc! { "agency_id": agency_id })
            .await?;
        self.invitations
            .hard_delete(doc! { "agency_id": agency_id })
            .await?;
        self.users
            .hard_delete(doc! { "agency_id": agency_id })
            .await?;
        self.base.hard_delete(doc! { "_id": agency_id }).await?;

        debug!(%agency_id, "Deleted agency and owned records");
        Ok(agency)
    }
}
