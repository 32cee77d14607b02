use uuid::Uuid;

/// Why a user is subscribed to a group's activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionReason {
    Commented,
    Assigned,
    Bookmarked,
    ChangedStatus,
    Mentioned,
}

impl SubscriptionReason {
    /// API label for the reason.
    pub fn label(self) -> &'static str {
        match self {
            SubscriptionReason::Commented => "commented",
            SubscriptionReason::Assigned => "assigned",
            SubscriptionReason::Bookmarked => "bookmarked",
            SubscriptionReason::ChangedStatus => "changed_status",
            SubscriptionReason::Mentioned => "mentioned",
        }
    }
}

/// Explicit per-user subscription record for one group. Absence of a record
/// means the project or global notification preference decides.
#[derive(Debug, Clone)]
pub struct GroupSubscription {
    pub group_id: Uuid,
    pub user_id: i32,
    pub is_active: bool,
    pub reason: SubscriptionReason,
}

/// Stored value of the `workflow:notifications` preference. The convention
/// for users without a stored global preference is "all conversations".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationPreference {
    #[default]
    AllConversations,
    ParticipatingOnly,
}
