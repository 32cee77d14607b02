//! In-memory store backends.
//!
//! Reference implementations of the store contracts, backed by plain maps.
//! Tests populate the public fields directly; every implementation records
//! which methods were called so the one-query-per-concern batching contract
//! stays checkable.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{
    GroupResolution, GroupSnooze, GroupSubscription, NotificationPreference, Project, User,
};
use crate::stores::{
    GroupSideStore, PreferenceStore, StoreResult, TagCountStore, TimeSeriesStore,
};

/// In-memory relational side tables.
#[derive(Default)]
pub struct MemorySideStore {
    pub projects: HashMap<i32, Project>,
    /// user id -> bookmarked group ids
    pub bookmarks: HashMap<i32, HashSet<Uuid>>,
    /// (user id, group id) -> last viewed
    pub seen: HashMap<(i32, Uuid), DateTime<Utc>>,
    pub subscriptions: Vec<GroupSubscription>,
    pub assignees: HashMap<Uuid, User>,
    pub snoozes: HashMap<Uuid, GroupSnooze>,
    pub resolutions: HashMap<Uuid, GroupResolution>,
    pub shares: HashMap<Uuid, String>,
    pub users: HashMap<i32, User>,
    calls: Mutex<Vec<&'static str>>,
}

impl MemorySideStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Method names in call order, for batching assertions.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().expect("call log poisoned").clone()
    }

    fn record(&self, name: &'static str) {
        self.calls.lock().expect("call log poisoned").push(name);
    }
}

#[async_trait]
impl GroupSideStore for MemorySideStore {
    async fn projects(&self, project_ids: &[i32]) -> StoreResult<HashMap<i32, Project>> {
        self.record("projects");
        Ok(project_ids
            .iter()
            .filter_map(|id| self.projects.get(id).map(|p| (*id, p.clone())))
            .collect())
    }

    async fn bookmarked_group_ids(
        &self,
        user_id: i32,
        group_ids: &[Uuid],
    ) -> StoreResult<HashSet<Uuid>> {
        self.record("bookmarked_group_ids");
        let bookmarked = self.bookmarks.get(&user_id);
        Ok(group_ids
            .iter()
            .filter(|id| bookmarked.is_some_and(|set| set.contains(*id)))
            .copied()
            .collect())
    }

    async fn seen_timestamps(
        &self,
        user_id: i32,
        group_ids: &[Uuid],
    ) -> StoreResult<HashMap<Uuid, DateTime<Utc>>> {
        self.record("seen_timestamps");
        Ok(group_ids
            .iter()
            .filter_map(|id| self.seen.get(&(user_id, *id)).map(|ts| (*id, *ts)))
            .collect())
    }

    async fn subscriptions(
        &self,
        user_id: i32,
        group_ids: &[Uuid],
    ) -> StoreResult<Vec<GroupSubscription>> {
        self.record("subscriptions");
        Ok(self
            .subscriptions
            .iter()
            .filter(|s| s.user_id == user_id && group_ids.contains(&s.group_id))
            .cloned()
            .collect())
    }

    async fn assignees(&self, group_ids: &[Uuid]) -> StoreResult<HashMap<Uuid, User>> {
        self.record("assignees");
        Ok(group_ids
            .iter()
            .filter_map(|id| self.assignees.get(id).map(|u| (*id, u.clone())))
            .collect())
    }

    async fn snoozes(&self, group_ids: &[Uuid]) -> StoreResult<HashMap<Uuid, GroupSnooze>> {
        self.record("snoozes");
        Ok(group_ids
            .iter()
            .filter_map(|id| self.snoozes.get(id).map(|s| (*id, s.clone())))
            .collect())
    }

    async fn resolutions(
        &self,
        group_ids: &[Uuid],
    ) -> StoreResult<HashMap<Uuid, GroupResolution>> {
        self.record("resolutions");
        Ok(group_ids
            .iter()
            .filter_map(|id| self.resolutions.get(id).map(|r| (*id, r.clone())))
            .collect())
    }

    async fn share_ids(&self, group_ids: &[Uuid]) -> StoreResult<HashMap<Uuid, String>> {
        self.record("share_ids");
        Ok(group_ids
            .iter()
            .filter_map(|id| self.shares.get(id).map(|token| (*id, token.clone())))
            .collect())
    }

    async fn active_users(&self, user_ids: &[i32]) -> StoreResult<Vec<User>> {
        self.record("active_users");
        Ok(user_ids
            .iter()
            .filter_map(|id| self.users.get(id))
            .filter(|u| u.is_active)
            .cloned()
            .collect())
    }
}

/// In-memory `workflow:notifications` preferences.
#[derive(Default)]
pub struct MemoryPreferenceStore {
    /// (user id, project id or global) -> stored preference
    pub preferences: HashMap<(i32, Option<i32>), NotificationPreference>,
    calls: Mutex<Vec<&'static str>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().expect("call log poisoned").clone()
    }
}

#[async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn workflow_notifications(
        &self,
        user_id: i32,
        project_ids: &[i32],
    ) -> StoreResult<HashMap<Option<i32>, NotificationPreference>> {
        self.calls
            .lock()
            .expect("call log poisoned")
            .push("workflow_notifications");
        let mut result = HashMap::new();
        if let Some(pref) = self.preferences.get(&(user_id, None)) {
            result.insert(None, *pref);
        }
        for project_id in project_ids {
            if let Some(pref) = self.preferences.get(&(user_id, Some(*project_id))) {
                result.insert(Some(*project_id), *pref);
            }
        }
        Ok(result)
    }
}

/// In-memory tag-value counts.
#[derive(Default)]
pub struct MemoryTagCountStore {
    pub user_counts: HashMap<Uuid, i64>,
    calls: Mutex<Vec<&'static str>>,
}

impl MemoryTagCountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().expect("call log poisoned").clone()
    }
}

#[async_trait]
impl TagCountStore for MemoryTagCountStore {
    async fn distinct_user_counts(
        &self,
        group_ids: &[Uuid],
    ) -> StoreResult<HashMap<Uuid, i64>> {
        self.calls
            .lock()
            .expect("call log poisoned")
            .push("distinct_user_counts");
        Ok(group_ids
            .iter()
            .filter_map(|id| self.user_counts.get(id).map(|count| (*id, *count)))
            .collect())
    }
}

/// In-memory time-series buckets, keyed by group id.
#[derive(Default)]
pub struct MemoryTimeSeriesStore {
    pub series: HashMap<Uuid, Vec<(i64, i64)>>,
    last_query: Mutex<Option<RangeQuery>>,
}

/// Parameters of the last `range` call, for window-math assertions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeQuery {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub rollup_secs: i64,
}

impl MemoryTimeSeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_query(&self) -> Option<RangeQuery> {
        *self.last_query.lock().expect("query log poisoned")
    }
}

#[async_trait]
impl TimeSeriesStore for MemoryTimeSeriesStore {
    async fn range(
        &self,
        group_ids: &[Uuid],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        rollup_secs: i64,
    ) -> StoreResult<HashMap<Uuid, Vec<(i64, i64)>>> {
        *self.last_query.lock().expect("query log poisoned") = Some(RangeQuery {
            start,
            end,
            rollup_secs,
        });
        Ok(group_ids
            .iter()
            .map(|id| (*id, self.series.get(id).cloned().unwrap_or_default()))
            .collect())
    }
}
