use bson::{doc, oid::ObjectId};
use mongodb::Database;
use std::collections::HashSet;
use agencyhub_db::models::{Agency, Permission, SidebarOption, SubAccount, User};

use crate::dao::base::{BaseDao, DaoResult};
use crate::identity::Caller;

pub const DEFAULT_SIDEBAR_LOGO: &str = "/assets/agencyhub-logo.svg";

/// Everything the navigation shell needs about the caller.
#[derive(Debug, Clone)]
pub struct AuthUserDetails {
    pub user: User,
    pub permissions: Vec<Permission>,
    pub agency: Option<Agency>,
    pub sub_accounts: Vec<SubAccount>,
}

#[derive(Debug, Clone, Copy)]
pub enum SidebarOwner {
    Agency(ObjectId),
    SubAccount(ObjectId),
}

/// Permission-gated visibility over sub-accounts and navigation entries.
pub struct AccessService {
    users: BaseDao<User>,
    agencies: BaseDao<Agency>,
    sub_accounts: BaseDao<SubAccount>,
    permissions: BaseDao<Permission>,
    sidebar_options: BaseDao<SidebarOption>,
}

impl AccessService {
    pub fn new(db: &Database) -> Self {
        Self {
            users: BaseDao::new(db, User::COLLECTION),
            agencies: BaseDao::new(db, Agency::COLLECTION),
            sub_accounts: BaseDao::new(db, SubAccount::COLLECTION),
            permissions: BaseDao::new(db, Permission::COLLECTION),
            sidebar_options: BaseDao::new(db, SidebarOption::COLLECTION),
        }
    }

    pub async fn auth_user_details(
        &self,
        caller: &Caller,
    ) -> DaoResult<Option<AuthUserDetails>> {
        let Some(user) = self.users.find_one(doc! { "email": &caller.email }).await? else {
            return Ok(None);
        };

        let permissions = self
            .permissions
            .find_many(doc! { "email": &user.email }, None)
            .await?;

        let (agency, sub_accounts) = match user.agency_id {
            Some(agency_id) => {
                let agency = self.agencies.find_one(doc! { "_id": agency_id }).await?;
                let sub_accounts = self
                    .sub_accounts
                    .find_many(doc! { "agency_id": agency_id }, None)
                    .await?;
                (agency, sub_accounts)
            }
            None => (None, Vec::new()),
        };

        Ok(Some(AuthUserDetails {
            user,
            permissions,
            agency,
            sub_accounts,
        }))
    }

    /// The user's agency's sub-accounts, in store order, restricted to
    /// those with a granted permission row. Recomputed on every call.
    pub async fn visible_sub_accounts(&self, user: &User) -> DaoResult<Vec<SubAccount>> {
        let Some(agency_id) = user.agency_id else {
            return Ok(Vec::new());
        };

        let sub_accounts = self
            .sub_accounts
            .find_many(doc! { "agency_id": agency_id }, None)
            .await?;

        let granted: HashSet<ObjectId> = self
            .permissions
            .find_many(doc! { "email": &user.email, "access": true }, None)
            .await?
            .into_iter()
            .map(|p| p.sub_account_id)
            .collect();

        Ok(sub_accounts
            .into_iter()
            .filter(|s| s.id.is_some_and(|id| granted.contains(&id)))
            .collect())
    }

    /// The owner's own option set; agency-level and sub-account-level
    /// entries are never merged.
    pub async fn sidebar_options(&self, owner: SidebarOwner) -> DaoResult<Vec<SidebarOption>> {
        let filter = match owner {
            SidebarOwner::Agency(id) => doc! { "agency_id": id },
            SidebarOwner::SubAccount(id) => doc! { "sub_account_id": id },
        };
        self.sidebar_options.find_many(filter, None).await
    }
}

/// White-label short-circuit first, then the sub-account's own logo, then
/// the agency default. User-visible branding behaviour; the order matters.
pub fn resolve_sidebar_logo(agency: &Agency, scope: Option<&SubAccount>) -> String {
    let agency_logo = agency
        .agency_logo
        .clone()
        .unwrap_or_else(|| DEFAULT_SIDEBAR_LOGO.to_string());

    if agency.white_label {
        return agency_logo;
    }

    if let Some(sub_account) = scope {
        if let Some(logo) = &sub_account.sub_account_logo {
            return logo.clone();
        }
    }

    agency_logo
}
