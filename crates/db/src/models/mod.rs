pub mod agency;
pub mod invitation;
pub mod notification;
pub mod permission;
pub mod pipeline;
pub mod sidebar_option;
pub mod sub_account;
pub mod user;

pub use agency::{Agency, Plan};
pub use invitation::{Invitation, InvitationStatus};
pub use notification::Notification;
pub use permission::Permission;
pub use pipeline::Pipeline;
pub use sidebar_option::SidebarOption;
pub use sub_account::SubAccount;
pub use user::{Role, User};
