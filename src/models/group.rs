use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::models::Project;

/// Lifecycle status as persisted on the group. The serializer derives the
/// user-facing label from this plus snooze and auto-resolve state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupStatus {
    Unresolved,
    Resolved,
    Ignored,
    PendingDeletion,
    DeletionInProgress,
    PendingMerge,
}

/// Group model - a deduplicated aggregate of one recurring error signature
#[derive(Debug, Clone)]
pub struct Group {
    pub id: Uuid,
    pub project_id: i32,
    pub digest_order: i32,
    pub times_seen: i64,
    pub num_comments: i32,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    /// When the group (re)entered the unresolved state; unset for groups
    /// that never left it.
    pub active_at: Option<DateTime<Utc>>,
    pub status: GroupStatus,
    pub title: String,
    pub culprit: String,
    /// Empty string renders as null in the API.
    pub logger: String,
    pub level: i16,
    pub event_type: String,
    pub metadata: Value,
}

impl Group {
    /// Generates the short_id (e.g., "PROJECT-1")
    pub fn short_id(&self, project_slug: &str) -> String {
        format!("{}-{}", project_slug.to_uppercase(), self.digest_order)
    }

    /// The baseline timestamp "has seen" comparisons are made against.
    pub fn active_date(&self) -> DateTime<Utc> {
        self.active_at.unwrap_or(self.first_seen)
    }

    /// True when the project's auto-resolve window has elapsed since the
    /// group was last seen.
    pub fn is_over_resolve_age(&self, project: &Project, now: DateTime<Utc>) -> bool {
        match project.resolve_age_hours {
            Some(hours) if hours > 0 => self.last_seen < now - Duration::hours(hours),
            _ => false,
        }
    }
}

/// Maps a stored numeric log level to its API name.
pub fn log_level_name(level: i16) -> &'static str {
    match level {
        10 => "debug",
        20 => "info",
        30 => "warning",
        40 => "error",
        50 => "fatal",
        _ => "unknown",
    }
}
