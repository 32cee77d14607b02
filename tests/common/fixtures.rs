//! Test fixtures and data builders
//!
//! Provides reusable groups, projects, users, plugins, and a pre-wired
//! bundle of in-memory stores.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};
use url::Url;
use uuid::Uuid;

use faultview::config::UrlConfig;
use faultview::models::{Group, GroupStatus, Project, User, Viewer};
use faultview::plugins::{
    Annotation, AnnotationProvider, ConfigField, ConfigurableFields, ContextProvider, Plugin,
    PluginError, PluginRegistry, ReleaseDocRenderer, TagAnnotator, Testable,
};
use faultview::serializers::{GroupAttrs, GroupSerializer, StreamGroupSerializer};
use faultview::stores::{
    MemoryPreferenceStore, MemorySideStore, MemoryTagCountStore, MemoryTimeSeriesStore,
};

pub const ORG_ID: i32 = 1;
pub const PROJECT_ID: i32 = 1;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A stable timestamp well in the past, so "now" comparisons are predictable.
pub fn epoch() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-01-09T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

pub fn project() -> Project {
    Project {
        id: PROJECT_ID,
        slug: "backend".to_string(),
        name: "Backend".to_string(),
        organization_id: ORG_ID,
        organization_slug: "acme".to_string(),
        resolve_age_hours: None,
        release_token: None,
    }
}

pub fn user(id: i32, name: &str) -> User {
    User {
        id,
        name: name.to_string(),
        username: name.to_lowercase(),
        email: format!("{}@acme.test", name.to_lowercase()),
        is_active: true,
    }
}

/// Authenticated member of the fixture organization.
pub fn member_viewer(user_id: i32) -> Viewer {
    Viewer::user(user_id, [ORG_ID])
}

/// Authenticated user outside the fixture organization.
pub fn outsider_viewer(user_id: i32) -> Viewer {
    Viewer::user(user_id, [])
}

pub fn urls() -> UrlConfig {
    UrlConfig::new(Url::parse("https://faultview.example.com").unwrap())
}

/// Builds test groups with sensible defaults
pub struct GroupBuilder {
    group: Group,
}

impl Default for GroupBuilder {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            group: Group {
                id: Uuid::new_v4(),
                project_id: PROJECT_ID,
                digest_order: 1,
                times_seen: 1,
                num_comments: 0,
                first_seen: now - Duration::hours(2),
                last_seen: now,
                active_at: None,
                status: GroupStatus::Unresolved,
                title: "TypeError: cannot read 'x'".to_string(),
                culprit: "api.users.detail".to_string(),
                logger: String::new(),
                level: 40,
                event_type: "error".to_string(),
                metadata: json!({"type": "TypeError", "value": "cannot read 'x'"}),
            },
        }
    }
}

impl GroupBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: Uuid) -> Self {
        self.group.id = id;
        self
    }

    pub fn digest_order(mut self, order: i32) -> Self {
        self.group.digest_order = order;
        self
    }

    pub fn times_seen(mut self, times_seen: i64) -> Self {
        self.group.times_seen = times_seen;
        self
    }

    pub fn num_comments(mut self, num_comments: i32) -> Self {
        self.group.num_comments = num_comments;
        self
    }

    pub fn status(mut self, status: GroupStatus) -> Self {
        self.group.status = status;
        self
    }

    pub fn level(mut self, level: i16) -> Self {
        self.group.level = level;
        self
    }

    pub fn logger(mut self, logger: &str) -> Self {
        self.group.logger = logger.to_string();
        self
    }

    pub fn first_seen(mut self, first_seen: DateTime<Utc>) -> Self {
        self.group.first_seen = first_seen;
        self
    }

    pub fn last_seen(mut self, last_seen: DateTime<Utc>) -> Self {
        self.group.last_seen = last_seen;
        self
    }

    pub fn active_at(mut self, active_at: DateTime<Utc>) -> Self {
        self.group.active_at = Some(active_at);
        self
    }

    pub fn build(self) -> Group {
        self.group
    }
}

/// An attribute bag with everything absent, for direct status-derivation
/// tests.
pub fn empty_attrs(project: Project) -> GroupAttrs {
    GroupAttrs {
        project,
        assigned_to: None,
        is_bookmarked: false,
        subscription: Default::default(),
        has_seen: false,
        annotations: Vec::new(),
        user_count: 0,
        snooze: None,
        snooze_actor: None,
        resolution: None,
        resolution_actor: None,
        share_id: None,
    }
}

/// Pre-wired in-memory store bundle. Tests populate the public store fields
/// and then borrow a serializer from it.
pub struct TestStores {
    pub side: MemorySideStore,
    pub preferences: MemoryPreferenceStore,
    pub tag_counts: MemoryTagCountStore,
    pub time_series: MemoryTimeSeriesStore,
    pub registry: PluginRegistry,
    pub urls: UrlConfig,
}

impl Default for TestStores {
    fn default() -> Self {
        let mut side = MemorySideStore::new();
        side.projects.insert(PROJECT_ID, project());
        Self {
            side,
            preferences: MemoryPreferenceStore::new(),
            tag_counts: MemoryTagCountStore::new(),
            time_series: MemoryTimeSeriesStore::new(),
            registry: PluginRegistry::new(),
            urls: urls(),
        }
    }
}

impl TestStores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serializer(&self) -> GroupSerializer<'_> {
        GroupSerializer::new(
            &self.side,
            &self.preferences,
            &self.tag_counts,
            &self.registry,
            &self.urls,
        )
    }

    pub fn stream_serializer(&self) -> StreamGroupSerializer<'_> {
        StreamGroupSerializer::new(self.serializer(), &self.time_series)
    }
}

/// Configurable fake plugin. Capabilities are exposed only when the
/// corresponding fixture data is set.
#[derive(Default)]
pub struct TestPlugin {
    pub slug: String,
    pub enabled: bool,
    pub legacy_tags: Vec<Annotation>,
    pub annotations: Vec<Annotation>,
    /// Makes every fallible hook return `PluginError::Failed`.
    pub fail_hooks: bool,
    pub contexts: Vec<String>,
    pub testable: bool,
    pub release_doc: Option<String>,
    pub doc_not_implemented: bool,
    pub config: Vec<ConfigField>,
    pub options: HashMap<String, Value>,
    pub asset_paths: Vec<String>,
}

impl TestPlugin {
    pub fn named(slug: &str) -> Self {
        Self {
            slug: slug.to_string(),
            enabled: true,
            ..Default::default()
        }
    }
}

pub fn annotation(label: &str) -> Annotation {
    Annotation {
        label: label.to_string(),
        url: None,
    }
}

impl Plugin for TestPlugin {
    fn slug(&self) -> &str {
        &self.slug
    }

    fn title(&self) -> String {
        let mut chars = self.slug.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    fn metadata(&self) -> Value {
        json!({"author": "Faultview Team"})
    }

    fn assets(&self) -> Vec<String> {
        self.asset_paths.clone()
    }

    fn is_enabled(&self, _project: &Project) -> bool {
        self.enabled
    }

    fn tag_annotator(&self) -> Option<&dyn TagAnnotator> {
        (!self.legacy_tags.is_empty()).then_some(self as &dyn TagAnnotator)
    }

    fn annotation_provider(&self) -> Option<&dyn AnnotationProvider> {
        (!self.annotations.is_empty() || self.fail_hooks)
            .then_some(self as &dyn AnnotationProvider)
    }

    fn context_provider(&self) -> Option<&dyn ContextProvider> {
        (!self.contexts.is_empty()).then_some(self as &dyn ContextProvider)
    }

    fn testable(&self) -> Option<&dyn Testable> {
        self.testable.then_some(self as &dyn Testable)
    }

    fn release_doc_renderer(&self) -> Option<&dyn ReleaseDocRenderer> {
        (self.release_doc.is_some() || self.doc_not_implemented)
            .then_some(self as &dyn ReleaseDocRenderer)
    }

    fn configurable_fields(&self) -> Option<&dyn ConfigurableFields> {
        (!self.config.is_empty()).then_some(self as &dyn ConfigurableFields)
    }
}

impl TagAnnotator for TestPlugin {
    fn tags(&self, _group: &Group) -> Result<Vec<Annotation>, PluginError> {
        if self.fail_hooks {
            return Err(PluginError::Failed("tag hook exploded".to_string()));
        }
        Ok(self.legacy_tags.clone())
    }
}

impl AnnotationProvider for TestPlugin {
    fn annotations(&self, _group: &Group) -> Result<Vec<Annotation>, PluginError> {
        if self.fail_hooks {
            return Err(PluginError::Failed("annotation hook exploded".to_string()));
        }
        Ok(self.annotations.clone())
    }
}

impl ContextProvider for TestPlugin {
    fn custom_context_types(&self) -> Vec<String> {
        self.contexts.clone()
    }
}

impl Testable for TestPlugin {}

impl ReleaseDocRenderer for TestPlugin {
    fn release_doc_html(&self, webhook_url: &str) -> Result<String, PluginError> {
        if self.doc_not_implemented {
            return Err(PluginError::NotImplemented);
        }
        match &self.release_doc {
            Some(doc) => Ok(format!("{} webhook={}", doc, webhook_url)),
            None => Err(PluginError::NotImplemented),
        }
    }
}

impl ConfigurableFields for TestPlugin {
    fn config_fields(
        &self,
        _project: Option<&Project>,
        _viewer: &Viewer,
    ) -> Result<Vec<ConfigField>, PluginError> {
        Ok(self.config.clone())
    }

    fn option(&self, name: &str, _project: Option<&Project>) -> Option<Value> {
        self.options.get(name).cloned()
    }
}
