use bson::oid::ObjectId;
use mongodb::Database;
use std::sync::Arc;
use tracing::warn;

use crate::activity::ActivityService;
use crate::dao::base::DaoResult;
use crate::dao::invitation::InvitationDao;
use crate::dao::user::{NewUser, UserDao};
use crate::identity::{Caller, IdentityService};

/// Reconciles a pending invitation against the authenticated caller:
/// NoInvitation → PendingInvitation → Consumed.
pub struct OnboardingService {
    users: UserDao,
    invitations: InvitationDao,
    activity: ActivityService,
    identity: Arc<IdentityService>,
}

impl OnboardingService {
    pub fn new(db: &Database, identity: Arc<IdentityService>) -> Self {
        Self {
            users: UserDao::new(db),
            invitations: InvitationDao::new(db),
            activity: ActivityService::new(db),
            identity,
        }
    }

    /// Consumes the caller's pending invitation, provisioning a user bound
    /// to the invitation's agency and role. Returns the agency the caller
    /// belongs to afterwards, or `None` when the caller is unknown to the
    /// system entirely.
    ///
    /// The steps are not transactional; each is written to be re-driveable.
    /// User creation is the sole gate: when it yields no record, role sync
    /// and invitation deletion are both skipped.
    pub async fn accept_invitation(&self, caller: &Caller) -> DaoResult<Option<ObjectId>> {
        let Some(invitation) = self.invitations.find_pending(&caller.email).await? else {
            // No invitation: the caller may already be provisioned
            let user = self.users.find_by_email(&caller.email).await?;
            return Ok(user.and_then(|u| u.agency_id));
        };

        // A previous partially failed acceptance may have created the user
        // already; re-driving picks it up instead of colliding on email.
        let created = match self.users.find_by_email(&invitation.email).await? {
            Some(existing) => Some(existing),
            None => {
                self.users
                    .create_team_user(
                        invitation.agency_id,
                        NewUser {
                            subject: caller.subject.clone(),
                            email: invitation.email.clone(),
                            name: caller.display_name(),
                            avatar_url: caller.avatar_url.clone(),
                            role: invitation.role,
                        },
                    )
                    .await?
            }
        };

        if let Err(error) = self
            .activity
            .log_activity(Some(caller), "Joined", Some(invitation.agency_id), None)
            .await
        {
            warn!(%error, "Failed to record join activity");
        }

        match created {
            Some(user) => {
                if let Err(error) = self
                    .identity
                    .sync_role_metadata(&caller.subject, Some(user.role))
                    .await
                {
                    warn!(%error, "Failed to sync role metadata after join");
                }

                self.invitations.delete_by_email(&user.email).await?;
                Ok(user.agency_id)
            }
            None => Ok(None),
        }
    }
}
