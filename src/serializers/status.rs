//! Status derivation.
//!
//! Pure decision table from (group, attribute bag) to the user-facing status
//! label and detail payload. Order matters: a lapsed snooze reverts the
//! stored status to unresolved before the auto-resolve check, and the
//! auto-resolve check runs before the stored status is mapped to a label.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{Group, GroupStatus, ResolutionKind};
use crate::serializers::group::GroupAttrs;
use crate::serializers::user::UserView;

/// User-facing status label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusLabel {
    Resolved,
    Ignored,
    PendingDeletion,
    PendingMerge,
    Unresolved,
}

/// Snooze bounds echoed while the snooze is still valid. The whole key block
/// is emitted together, null members included.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IgnoreDetails {
    pub ignore_count: Option<i64>,
    pub ignore_until: Option<DateTime<Utc>>,
    pub ignore_user_count: Option<i64>,
    pub ignore_user_window: Option<i64>,
    pub ignore_window: Option<i64>,
}

/// `statusDetails` payload; only keys that were actually set are serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusDetails {
    #[serde(flatten)]
    pub ignore: Option<IgnoreDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_resolved: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_next_release: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_release: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<UserView>,
}

/// Derives the status label and details for one group.
pub fn derive_status(group: &Group, attrs: &GroupAttrs, now: DateTime<Utc>) -> (StatusLabel, StatusDetails) {
    let mut status = group.status;
    let mut details = StatusDetails::default();

    if let Some(snooze) = &attrs.snooze {
        if snooze.is_valid(group, attrs.user_count, now) {
            details.ignore = Some(IgnoreDetails {
                ignore_count: snooze.remaining_count(group),
                ignore_until: snooze.until,
                ignore_user_count: snooze.remaining_user_count(attrs.user_count),
                ignore_user_window: snooze.user_window,
                ignore_window: snooze.window,
            });
            details.actor = attrs.snooze_actor.clone();
        } else {
            // A lapsed snooze must never present as ignored.
            status = GroupStatus::Unresolved;
        }
    }

    if status == GroupStatus::Unresolved && group.is_over_resolve_age(&attrs.project, now) {
        status = GroupStatus::Resolved;
        details.auto_resolved = Some(true);
    }

    let label = match status {
        GroupStatus::Resolved => {
            if let Some(resolution) = &attrs.resolution {
                match resolution.kind {
                    Some(ResolutionKind::InNextRelease) | None => {
                        details.in_next_release = Some(true);
                    }
                    Some(ResolutionKind::InRelease) => {
                        details.in_release = resolution.release_version.clone();
                    }
                }
                // The resolving actor wins over a snooze actor.
                details.actor = attrs.resolution_actor.clone();
            }
            StatusLabel::Resolved
        }
        GroupStatus::Ignored => StatusLabel::Ignored,
        GroupStatus::PendingDeletion | GroupStatus::DeletionInProgress => {
            StatusLabel::PendingDeletion
        }
        GroupStatus::PendingMerge => StatusLabel::PendingMerge,
        GroupStatus::Unresolved => StatusLabel::Unresolved,
    };

    (label, details)
}
