//! Group serialization: batched attribute collection plus view composition.
//!
//! `collect` issues each auxiliary lookup exactly once for the whole batch
//! and joins the results into one [`GroupAttrs`] bag per group; `serialize`
//! is a pure function from (group, bag, viewer) to the output record.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::config::UrlConfig;
use crate::error::{AppError, AppResult};
use crate::models::{
    log_level_name, Group, GroupResolution, GroupSnooze, GroupSubscription,
    NotificationPreference, Project, Viewer,
};
use crate::plugins::{Annotation, PluginRegistry};
use crate::serializers::status::{derive_status, StatusDetails, StatusLabel};
use crate::serializers::user::UserView;
use crate::stores::{GroupSideStore, PreferenceStore, TagCountStore};

/// Subscription state resolved for one group: the explicit record when one
/// exists, otherwise the project/global preference fallback.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionState {
    pub is_subscribed: bool,
    pub record: Option<GroupSubscription>,
}

/// Precomputed side data for one group, produced by the collector and
/// consumed read-only by the composers.
#[derive(Debug, Clone)]
pub struct GroupAttrs {
    pub project: Project,
    pub assigned_to: Option<UserView>,
    pub is_bookmarked: bool,
    pub subscription: SubscriptionState,
    pub has_seen: bool,
    pub annotations: Vec<Annotation>,
    pub user_count: i64,
    pub snooze: Option<GroupSnooze>,
    pub snooze_actor: Option<UserView>,
    pub resolution: Option<GroupResolution>,
    pub resolution_actor: Option<UserView>,
    pub share_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectView {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionDetails {
    pub reason: String,
}

/// JSON-ready view of one group. Field names are the API compatibility
/// contract; the trailing optional fields are filled in by the stream and
/// tag decorators and omitted otherwise.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupView {
    pub id: String,
    pub share_id: Option<String>,
    pub short_id: String,
    /// Occurrence count, rendered as text.
    pub count: String,
    pub user_count: i64,
    pub title: String,
    pub culprit: String,
    pub permalink: Option<String>,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub logger: Option<String>,
    pub level: String,
    pub status: StatusLabel,
    pub status_details: StatusDetails,
    pub is_public: bool,
    pub project: ProjectView,
    #[serde(rename = "type")]
    pub event_type: String,
    pub metadata: Value,
    pub num_comments: i32,
    pub assigned_to: Option<UserView>,
    pub is_bookmarked: bool,
    pub is_subscribed: bool,
    pub subscription_details: Option<SubscriptionDetails>,
    pub has_seen: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Vec<Annotation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<HashMap<String, Vec<(i64, i64)>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matching_event_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_first_seen: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_last_seen: Option<DateTime<Utc>>,
}

/// Base group serializer. Holds the injected collaborator stores for one
/// request-scoped serialization call.
pub struct GroupSerializer<'a> {
    side: &'a dyn GroupSideStore,
    preferences: &'a dyn PreferenceStore,
    tag_counts: &'a dyn TagCountStore,
    registry: &'a PluginRegistry,
    urls: &'a UrlConfig,
}

impl<'a> GroupSerializer<'a> {
    pub fn new(
        side: &'a dyn GroupSideStore,
        preferences: &'a dyn PreferenceStore,
        tag_counts: &'a dyn TagCountStore,
        registry: &'a PluginRegistry,
        urls: &'a UrlConfig,
    ) -> Self {
        Self {
            side,
            preferences,
            tag_counts,
            registry,
            urls,
        }
    }

    /// Resolves subscription state for every group in two batched reads:
    /// explicit records first, then the `workflow:notifications` preference
    /// for the projects of the groups still unknown (global scope included).
    async fn subscriptions(
        &self,
        groups: &[Group],
        user_id: i32,
    ) -> AppResult<HashMap<Uuid, SubscriptionState>> {
        let group_ids: Vec<Uuid> = groups.iter().map(|g| g.id).collect();
        let mut results: HashMap<Uuid, Option<SubscriptionState>> =
            group_ids.iter().map(|id| (*id, None)).collect();

        for record in self.side.subscriptions(user_id, &group_ids).await? {
            results.insert(
                record.group_id,
                Some(SubscriptionState {
                    is_subscribed: record.is_active,
                    record: Some(record),
                }),
            );
        }

        // Groups without an explicit record fall back to the per-project
        // preference. The common case is a single project for the whole
        // batch.
        let mut leftover: HashMap<i32, Vec<Uuid>> = HashMap::new();
        for group in groups {
            if matches!(results.get(&group.id), Some(None)) {
                leftover.entry(group.project_id).or_default().push(group.id);
            }
        }

        if !leftover.is_empty() {
            let project_ids: Vec<i32> = leftover.keys().copied().collect();
            let options = self
                .preferences
                .workflow_notifications(user_id, &project_ids)
                .await?;
            // Global scope decides for projects with no stored preference;
            // "all conversations" is the convention when nothing is stored.
            let default = options.get(&None).copied().unwrap_or_default();
            for (project_id, group_ids) in leftover {
                let is_subscribed = options.get(&Some(project_id)).copied().unwrap_or(default)
                    == NotificationPreference::AllConversations;
                for group_id in group_ids {
                    results.insert(
                        group_id,
                        Some(SubscriptionState {
                            is_subscribed,
                            record: None,
                        }),
                    );
                }
            }
        }

        Ok(results
            .into_iter()
            .map(|(id, state)| (id, state.unwrap_or_default()))
            .collect())
    }

    /// Batched attribute collection: one store call per auxiliary concern
    /// for the whole group list, then a pure in-memory join.
    pub async fn collect(
        &self,
        groups: &[Group],
        viewer: &Viewer,
    ) -> AppResult<HashMap<Uuid, GroupAttrs>> {
        let group_ids: Vec<Uuid> = groups.iter().map(|g| g.id).collect();
        let mut project_ids: Vec<i32> = groups.iter().map(|g| g.project_id).collect();
        project_ids.sort_unstable();
        project_ids.dedup();

        let projects = self.side.projects(&project_ids).await?;

        // Anonymous viewers take the fast path: no user-scoped lookups.
        let (bookmarks, seen, subscriptions) = match viewer.user_id() {
            Some(user_id) if !groups.is_empty() => (
                self.side.bookmarked_group_ids(user_id, &group_ids).await?,
                self.side.seen_timestamps(user_id, &group_ids).await?,
                self.subscriptions(groups, user_id).await?,
            ),
            _ => (HashSet::new(), HashMap::new(), HashMap::new()),
        };

        let assignees = self.side.assignees(&group_ids).await?;
        let user_counts = self.tag_counts.distinct_user_counts(&group_ids).await?;
        let snoozes = self.side.snoozes(&group_ids).await?;
        let resolutions = self.side.resolutions(&group_ids).await?;
        let share_ids = self.side.share_ids(&group_ids).await?;

        // Actor cache, scoped to this call: one batch for every user
        // referenced by a snooze or resolution.
        let mut actor_ids: Vec<i32> = resolutions
            .values()
            .filter_map(|r| r.actor_id)
            .chain(snoozes.values().filter_map(|s| s.actor_id))
            .collect();
        actor_ids.sort_unstable();
        actor_ids.dedup();
        let actors: HashMap<i32, UserView> = if actor_ids.is_empty() {
            HashMap::new()
        } else {
            self.side
                .active_users(&actor_ids)
                .await?
                .iter()
                .map(|u| (u.id, UserView::from_user(u)))
                .collect()
        };

        let mut result = HashMap::with_capacity(groups.len());
        for group in groups {
            let project = projects.get(&group.project_id).ok_or_else(|| {
                AppError::NotFound(format!("Project {} not found", group.project_id))
            })?;

            let annotations = self.annotations(group, project);

            let snooze = snoozes.get(&group.id).cloned();
            let snooze_actor = snooze
                .as_ref()
                .and_then(|s| s.actor_id)
                .and_then(|id| actors.get(&id).cloned());
            let resolution = resolutions.get(&group.id).cloned();
            let resolution_actor = resolution
                .as_ref()
                .and_then(|r| r.actor_id)
                .and_then(|id| actors.get(&id).cloned());

            let active_date = group.active_date();
            let has_seen = seen
                .get(&group.id)
                .map(|last| *last > active_date)
                .unwrap_or(false);

            result.insert(
                group.id,
                GroupAttrs {
                    project: project.clone(),
                    assigned_to: assignees.get(&group.id).map(UserView::from_user),
                    is_bookmarked: bookmarks.contains(&group.id),
                    subscription: subscriptions.get(&group.id).cloned().unwrap_or_default(),
                    has_seen,
                    annotations,
                    user_count: user_counts.get(&group.id).copied().unwrap_or(0),
                    snooze,
                    snooze_actor,
                    resolution,
                    resolution_actor,
                    share_id: share_ids.get(&group.id).cloned(),
                },
            );
        }

        Ok(result)
    }

    /// Runs both annotation phases for one group, dropping individual hook
    /// failures so one broken plugin cannot take down the batch.
    fn annotations(&self, group: &Group, project: &Project) -> Vec<Annotation> {
        let mut annotations = Vec::new();
        for plugin in self.registry.for_project(project) {
            if let Some(hook) = plugin.tag_annotator() {
                match hook.tags(group) {
                    Ok(mut tags) => annotations.append(&mut tags),
                    Err(err) => {
                        log::warn!("plugin {} tag hook failed: {}", plugin.slug(), err);
                    }
                }
            }
        }
        for plugin in self.registry.for_project(project) {
            if let Some(hook) = plugin.annotation_provider() {
                match hook.annotations(group) {
                    Ok(mut items) => annotations.append(&mut items),
                    Err(err) => {
                        log::warn!("plugin {} annotation hook failed: {}", plugin.slug(), err);
                    }
                }
            }
        }
        annotations
    }

    /// Composes the view for one group from its precomputed attributes.
    pub fn serialize(&self, group: &Group, attrs: &GroupAttrs, viewer: &Viewer) -> GroupView {
        self.serialize_at(group, attrs, viewer, Utc::now())
    }

    /// Composer with an explicit clock, so status derivation is
    /// deterministic across a batch (and in tests).
    pub fn serialize_at(
        &self,
        group: &Group,
        attrs: &GroupAttrs,
        viewer: &Viewer,
        now: DateTime<Utc>,
    ) -> GroupView {
        let (status, status_details) = derive_status(group, attrs, now);

        // The permalink embeds the organization slug; only authenticated
        // members of that organization get one.
        let permalink = if viewer.is_authenticated()
            && viewer.is_org_member(attrs.project.organization_id)
        {
            Some(self.urls.group_permalink(
                &attrs.project.organization_slug,
                &attrs.project.slug,
                group.id,
            ))
        } else {
            None
        };

        // Implicit (preference-derived) subscriptions carry no details.
        let subscription_details = match (&attrs.subscription.record, attrs.subscription.is_subscribed) {
            (Some(record), true) => Some(SubscriptionDetails {
                reason: record.reason.label().to_string(),
            }),
            _ => None,
        };

        GroupView {
            id: group.id.to_string(),
            share_id: attrs.share_id.clone(),
            short_id: group.short_id(&attrs.project.slug),
            count: group.times_seen.to_string(),
            user_count: attrs.user_count,
            title: group.title.clone(),
            culprit: group.culprit.clone(),
            permalink,
            first_seen: group.first_seen,
            last_seen: group.last_seen,
            logger: if group.logger.is_empty() {
                None
            } else {
                Some(group.logger.clone())
            },
            level: log_level_name(group.level).to_string(),
            status,
            status_details,
            is_public: attrs.share_id.is_some(),
            project: ProjectView {
                name: attrs.project.name.clone(),
                slug: attrs.project.slug.clone(),
            },
            event_type: group.event_type.clone(),
            metadata: group.metadata.clone(),
            num_comments: group.num_comments,
            assigned_to: attrs.assigned_to.clone(),
            is_bookmarked: attrs.is_bookmarked,
            is_subscribed: attrs.subscription.is_subscribed,
            subscription_details,
            has_seen: attrs.has_seen,
            annotations: Some(attrs.annotations.clone()),
            stats: None,
            matching_event_id: None,
            tag_first_seen: None,
            tag_last_seen: None,
        }
    }

    /// Collects attributes and composes views for the whole batch, in input
    /// order.
    pub async fn serialize_many(
        &self,
        groups: &[Group],
        viewer: &Viewer,
    ) -> AppResult<Vec<GroupView>> {
        let now = Utc::now();
        let attrs = self.collect(groups, viewer).await?;
        groups
            .iter()
            .map(|group| {
                let attrs = attrs.get(&group.id).ok_or_else(|| {
                    AppError::Internal(format!("missing attributes for group {}", group.id))
                })?;
                Ok(self.serialize_at(group, attrs, viewer, now))
            })
            .collect()
    }
}
