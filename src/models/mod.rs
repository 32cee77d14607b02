pub mod group;
pub mod project;
pub mod resolution;
pub mod snooze;
pub mod subscription;
pub mod user;

pub use group::{log_level_name, Group, GroupStatus};
pub use project::Project;
pub use resolution::{GroupResolution, ResolutionKind};
pub use snooze::{GroupSnooze, SnoozeState};
pub use subscription::{GroupSubscription, NotificationPreference, SubscriptionReason};
pub use user::{User, Viewer};
