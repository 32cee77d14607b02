use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::Group;

/// Occurrence counters captured when the snooze was created.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnoozeState {
    pub times_seen: i64,
    pub users_seen: i64,
}

/// A temporary suppression rule silencing a group's unresolved state until a
/// count, user-count, or time threshold is crossed. One-to-one with a group.
#[derive(Debug, Clone)]
pub struct GroupSnooze {
    pub group_id: Uuid,
    pub until: Option<DateTime<Utc>>,
    pub count: Option<i64>,
    /// Rolling window in minutes for `count`; absent means the count bound
    /// is absolute since snooze time.
    pub window: Option<i64>,
    pub user_count: Option<i64>,
    /// Rolling window in minutes for `user_count`.
    pub user_window: Option<i64>,
    pub state: SnoozeState,
    pub actor_id: Option<i32>,
}

impl GroupSnooze {
    /// Whether the snooze still suppresses the unresolved state.
    ///
    /// An elapsed `until` deadline or a crossed absolute count threshold
    /// invalidates the snooze. Rolling-window bounds are only bounded by
    /// `until` here: evaluating them needs a time-series read, which is the
    /// ignore processor's job, not the serializer's.
    pub fn is_valid(&self, group: &Group, users_seen: i64, now: DateTime<Utc>) -> bool {
        if let Some(until) = self.until {
            if until <= now {
                return false;
            }
        }
        if self.window.is_none() {
            if let Some(count) = self.count {
                if group.times_seen - self.state.times_seen >= count {
                    return false;
                }
            }
        }
        if self.user_window.is_none() {
            if let Some(count) = self.user_count {
                if users_seen - self.state.users_seen >= count {
                    return false;
                }
            }
        }
        true
    }

    /// Remaining occurrences before the snooze lifts. Echoes the stored
    /// bound when a rolling window applies.
    pub fn remaining_count(&self, group: &Group) -> Option<i64> {
        match (self.count, self.window) {
            (Some(count), None) => Some(count - (group.times_seen - self.state.times_seen)),
            (count, _) => count,
        }
    }

    /// Remaining distinct users before the snooze lifts.
    pub fn remaining_user_count(&self, users_seen: i64) -> Option<i64> {
        match (self.user_count, self.user_window) {
            (Some(count), None) => Some(count - (users_seen - self.state.users_seen)),
            (count, _) => count,
        }
    }
}
