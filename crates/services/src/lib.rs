pub mod access;
pub mod activity;
pub mod dao;
pub mod identity;
pub mod onboarding;

pub use access::{AccessService, AuthUserDetails, SidebarOwner, resolve_sidebar_logo};
pub use activity::{ActivityError, ActivityService};
pub use dao::*;
pub use identity::{Caller, IdentityError, IdentityService};
pub use onboarding::OnboardingService;
