//! Collaborator store contracts.
//!
//! Every upstream the serializers read from is abstracted behind a trait and
//! passed in explicitly: the relational side tables, the per-user preference
//! store, the tag-value store, and the time-series store. Each method takes
//! the whole batch of ids and is called at most once per serialization call;
//! absence of a record is a normal state and surfaces as a missing map entry,
//! never as an error.

pub mod memory;

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{
    GroupResolution, GroupSnooze, GroupSubscription, NotificationPreference, Project, User,
};

pub use memory::{
    MemoryPreferenceStore, MemorySideStore, MemoryTagCountStore, MemoryTimeSeriesStore,
};

pub type StoreResult<T> = Result<T, StoreError>;

/// Batched lookups against the relational side tables that hang off groups
/// (bookmarks, seen state, subscriptions, assignment, snoozes, resolutions,
/// shares) plus project and user resolution.
#[async_trait]
pub trait GroupSideStore: Send + Sync {
    async fn projects(&self, project_ids: &[i32]) -> StoreResult<HashMap<i32, Project>>;

    async fn bookmarked_group_ids(
        &self,
        user_id: i32,
        group_ids: &[Uuid],
    ) -> StoreResult<HashSet<Uuid>>;

    /// The user's last-viewed timestamp per group.
    async fn seen_timestamps(
        &self,
        user_id: i32,
        group_ids: &[Uuid],
    ) -> StoreResult<HashMap<Uuid, DateTime<Utc>>>;

    /// Explicit subscription records for (these groups, this user).
    async fn subscriptions(
        &self,
        user_id: i32,
        group_ids: &[Uuid],
    ) -> StoreResult<Vec<GroupSubscription>>;

    async fn assignees(&self, group_ids: &[Uuid]) -> StoreResult<HashMap<Uuid, User>>;

    async fn snoozes(&self, group_ids: &[Uuid]) -> StoreResult<HashMap<Uuid, GroupSnooze>>;

    async fn resolutions(&self, group_ids: &[Uuid])
        -> StoreResult<HashMap<Uuid, GroupResolution>>;

    /// Public share tokens; presence means the group is publicly viewable.
    async fn share_ids(&self, group_ids: &[Uuid]) -> StoreResult<HashMap<Uuid, String>>;

    /// Resolves actor ids to users; inactive accounts are dropped.
    async fn active_users(&self, user_ids: &[i32]) -> StoreResult<Vec<User>>;
}

/// Per-user preference store for the `workflow:notifications` key.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Stored preference per project, plus the global scope under `None`.
    async fn workflow_notifications(
        &self,
        user_id: i32,
        project_ids: &[i32],
    ) -> StoreResult<HashMap<Option<i32>, NotificationPreference>>;
}

/// Tag-value store; the serializer only needs distinct-user counts.
#[async_trait]
pub trait TagCountStore: Send + Sync {
    async fn distinct_user_counts(&self, group_ids: &[Uuid]) -> StoreResult<HashMap<Uuid, i64>>;
}

/// Time-series store backing the stream stats windows.
#[async_trait]
pub trait TimeSeriesStore: Send + Sync {
    /// Bucketed occurrence counts per group as ordered (unix ts, count)
    /// pairs covering [start, end] at the given rollup.
    async fn range(
        &self,
        group_ids: &[Uuid],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        rollup_secs: i64,
    ) -> StoreResult<HashMap<Uuid, Vec<(i64, i64)>>>;
}
