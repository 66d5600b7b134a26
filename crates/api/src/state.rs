use mongodb::Database;
use agencyhub_config::Settings;
use agencyhub_services::{
    AccessService, ActivityService, IdentityService, OnboardingService,
    dao::{
        agency::AgencyDao, invitation::InvitationDao, notification::NotificationDao,
        permission::PermissionDao, sub_account::SubAccountDao, user::UserDao,
    },
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub settings: Settings,
    pub identity: Arc<IdentityService>,
    pub users: Arc<UserDao>,
    pub agencies: Arc<AgencyDao>,
    pub sub_accounts: Arc<SubAccountDao>,
    pub permissions: Arc<PermissionDao>,
    pub notifications: Arc<NotificationDao>,
    pub invitations: Arc<InvitationDao>,
    pub activity: Arc<ActivityService>,
    pub access: Arc<AccessService>,
    pub onboarding: Arc<OnboardingService>,
}

impl AppState {
    pub fn new(db: Database, settings: Settings) -> Self {
        let identity = Arc::new(IdentityService::new(&settings.identity));
        let users = Arc::new(UserDao::new(&db));
        let agencies = Arc::new(AgencyDao::new(&db));
        let sub_accounts = Arc::new(SubAccountDao::new(&db));
        let permissions = Arc::new(PermissionDao::new(&db));
        let notifications = Arc::new(NotificationDao::new(&db));
        let invitations = Arc::new(InvitationDao::new(&db));
        let activity = Arc::new(ActivityService::new(&db));
        let access = Arc::new(AccessService::new(&db));
        let onboarding = Arc::new(OnboardingService::new(&db, identity.clone()));

        Self {
            db,
            settings,
            identity,
            users,
            agencies,
            sub_accounts,
            permissions,
            notifications,
            invitations,
            activity,
            access,
            onboarding,
        }
    }
}
