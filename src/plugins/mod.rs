//! Plugin capability system.
//!
//! Installed plugins expose a small required surface (slug, titles, status)
//! plus optional capabilities modeled as explicit accessor methods returning
//! trait objects. A plugin that cannot annotate groups simply returns `None`
//! from [`Plugin::annotation_provider`]; there is no runtime probing of
//! loosely-typed objects. The registry is an explicitly constructed value
//! passed into serializers, never process-global state.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::models::{Group, Project, Viewer};

/// Failure signals from plugin hooks. Hook call sites catch these and
/// contribute an empty result; they never abort a batch.
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    #[error("capability not implemented")]
    NotImplemented,

    #[error("plugin hook failed: {0}")]
    Failed(String),
}

/// An annotation a plugin contributes to a group view, e.g. a linked ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A raw configurable-field descriptor as returned by a plugin. Unset
/// members fall back to defaults during serialization.
#[derive(Debug, Clone, Default)]
pub struct ConfigField {
    pub name: String,
    pub label: Option<String>,
    pub field_type: Option<String>,
    pub required: Option<bool>,
    pub help: Option<String>,
    pub placeholder: Option<String>,
    pub choices: Option<Value>,
    pub readonly: Option<bool>,
    pub default: Option<Value>,
    /// Secret fields only: whether a value is stored at all.
    pub has_saved_value: Option<bool>,
    /// Secret fields only: non-sensitive prefix of the stored value.
    pub prefix: Option<String>,
}

/// Second-generation annotation hook returning a list per group.
pub trait AnnotationProvider: Send + Sync {
    fn annotations(&self, group: &Group) -> Result<Vec<Annotation>, PluginError>;
}

/// First-generation annotation hook. Runs before [`AnnotationProvider`]
/// contributions, kept for plugins that predate it.
pub trait TagAnnotator: Send + Sync {
    fn tags(&self, group: &Group) -> Result<Vec<Annotation>, PluginError>;
}

/// Contributes custom event context type names.
pub trait ContextProvider: Send + Sync {
    fn custom_context_types(&self) -> Vec<String>;
}

/// Marks a plugin whose configuration can be test-fired.
pub trait Testable: Send + Sync {
    fn is_testable(&self) -> bool {
        true
    }
}

/// Renders the HTML snippet documenting the release webhook integration.
pub trait ReleaseDocRenderer: Send + Sync {
    fn release_doc_html(&self, webhook_url: &str) -> Result<String, PluginError>;
}

/// Exposes the plugin's configurable field schema and stored option values.
pub trait ConfigurableFields: Send + Sync {
    fn config_fields(
        &self,
        project: Option<&Project>,
        viewer: &Viewer,
    ) -> Result<Vec<ConfigField>, PluginError>;

    /// Currently stored option value for a field. Never called for
    /// secret-typed fields.
    fn option(&self, name: &str, project: Option<&Project>) -> Option<Value>;
}

/// An installable extension.
pub trait Plugin: Send + Sync {
    fn slug(&self) -> &str;

    fn title(&self) -> String;

    fn short_title(&self) -> String {
        self.title()
    }

    fn plugin_type(&self) -> &str {
        "default"
    }

    fn can_disable(&self) -> bool {
        true
    }

    fn metadata(&self) -> Value {
        Value::Object(Default::default())
    }

    fn status(&self) -> &str {
        "unknown"
    }

    /// Key under which the plugin's static assets are served; defaults to
    /// the slug.
    fn asset_key(&self) -> Option<&str> {
        None
    }

    /// Relative paths of bundled static assets.
    fn assets(&self) -> Vec<String> {
        Vec::new()
    }

    fn is_enabled(&self, project: &Project) -> bool;

    fn tag_annotator(&self) -> Option<&dyn TagAnnotator> {
        None
    }

    fn annotation_provider(&self) -> Option<&dyn AnnotationProvider> {
        None
    }

    fn context_provider(&self) -> Option<&dyn ContextProvider> {
        None
    }

    fn testable(&self) -> Option<&dyn Testable> {
        None
    }

    fn release_doc_renderer(&self) -> Option<&dyn ReleaseDocRenderer> {
        None
    }

    fn configurable_fields(&self) -> Option<&dyn ConfigurableFields> {
        None
    }
}

/// Registry of installed plugins, passed into serializers by reference.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: Vec<Arc<dyn Plugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, plugin: Arc<dyn Plugin>) {
        self.plugins.push(plugin);
    }

    pub fn all(&self) -> &[Arc<dyn Plugin>] {
        &self.plugins
    }

    /// Plugins enabled for the given project, in registration order.
    pub fn for_project<'a>(
        &'a self,
        project: &'a Project,
    ) -> impl Iterator<Item = &'a Arc<dyn Plugin>> {
        self.plugins.iter().filter(move |p| p.is_enabled(project))
    }
}
