//! Plugin view serialization.
//!
//! Independent of the group pipeline: composes a plugin's descriptive
//! metadata, optionally scoped to a project (enabled flag, release doc), and
//! in the config-aware variant the normalized configurable-field schema.
//! Secret-typed fields never expose their stored value.

use serde::Serialize;
use serde_json::Value;

use crate::config::UrlConfig;
use crate::models::{Project, Viewer};
use crate::plugins::{ConfigField, ConfigurableFields, Plugin, PluginError};

const SECRET_FIELD_TYPE: &str = "secret";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetView {
    pub url: String,
}

/// JSON-ready view of one installed plugin.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginView {
    pub id: String,
    pub name: String,
    pub short_name: String,
    #[serde(rename = "type")]
    pub plugin_type: String,
    pub can_disable: bool,
    pub is_testable: bool,
    pub metadata: Value,
    pub contexts: Vec<String>,
    pub status: String,
    pub assets: Vec<AssetView>,
    pub doc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<Vec<ConfigFieldView>>,
}

/// Normalized configurable-field descriptor. Non-secret fields always carry
/// a `value` key (null when nothing is stored); secret fields carry
/// `has_saved_value`/`prefix` instead and never a value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFieldView {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub required: bool,
    pub help: Option<String>,
    pub placeholder: Option<String>,
    pub choices: Option<Value>,
    pub readonly: bool,
    pub default_value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(rename = "has_saved_value", skip_serializing_if = "Option::is_none")]
    pub has_saved_value: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

/// Composes the metadata view of one plugin, optionally scoped to a project.
pub fn serialize_plugin(
    plugin: &dyn Plugin,
    project: Option<&Project>,
    urls: &UrlConfig,
) -> PluginView {
    let doc = render_release_doc(plugin, project, urls);
    let asset_key = plugin.asset_key().unwrap_or(plugin.slug());

    PluginView {
        id: plugin.slug().to_string(),
        name: plugin.title(),
        short_name: plugin.short_title(),
        plugin_type: plugin.plugin_type().to_string(),
        can_disable: plugin.can_disable(),
        is_testable: plugin.testable().map(|t| t.is_testable()).unwrap_or(false),
        metadata: plugin.metadata(),
        contexts: plugin
            .context_provider()
            .map(|p| p.custom_context_types())
            .unwrap_or_default(),
        status: plugin.status().to_string(),
        assets: plugin
            .assets()
            .iter()
            .map(|asset| AssetView {
                url: urls.asset_url(asset_key, asset),
            })
            .collect(),
        doc,
        enabled: project.map(|p| plugin.is_enabled(p)),
        config: None,
    }
}

/// Adds the normalized config field list to the plugin view.
pub fn serialize_plugin_with_config(
    plugin: &dyn Plugin,
    project: Option<&Project>,
    viewer: &Viewer,
    urls: &UrlConfig,
) -> PluginView {
    let mut view = serialize_plugin(plugin, project, urls);
    let fields = match plugin.configurable_fields() {
        Some(source) => match source.config_fields(project, viewer) {
            Ok(fields) => fields
                .iter()
                .map(|field| serialize_config_field(source, project, field))
                .collect(),
            Err(err) => {
                log::warn!("plugin {} config hook failed: {}", plugin.slug(), err);
                Vec::new()
            }
        },
        None => Vec::new(),
    };
    view.config = Some(fields);
    view
}

/// Normalizes one raw field descriptor, applying defaults and the secret
/// redaction rule.
fn serialize_config_field(
    source: &dyn ConfigurableFields,
    project: Option<&Project>,
    field: &ConfigField,
) -> ConfigFieldView {
    let field_type = field
        .field_type
        .clone()
        .unwrap_or_else(|| "text".to_string());
    let secret = field_type == SECRET_FIELD_TYPE;

    ConfigFieldView {
        name: field.name.clone(),
        label: field
            .label
            .clone()
            .unwrap_or_else(|| title_case(&field.name)),
        required: field.required.unwrap_or(true),
        help: field.help.clone(),
        placeholder: field.placeholder.clone(),
        choices: field.choices.clone(),
        readonly: field.readonly.unwrap_or(false),
        default_value: field.default.clone(),
        value: if secret {
            None
        } else {
            Some(source.option(&field.name, project).unwrap_or(Value::Null))
        },
        has_saved_value: secret.then(|| field.has_saved_value.unwrap_or(false)),
        prefix: secret.then(|| field.prefix.clone().unwrap_or_default()),
        field_type,
    }
}

/// Renders the release-integration doc when the project carries a webhook
/// token and the plugin can render one. A missing token, an unimplemented
/// capability, or a hook failure all yield an empty doc.
fn render_release_doc(
    plugin: &dyn Plugin,
    project: Option<&Project>,
    urls: &UrlConfig,
) -> String {
    let Some(project) = project else {
        return String::new();
    };
    let Some(token) = project.release_token.as_deref() else {
        return String::new();
    };
    let Some(renderer) = plugin.release_doc_renderer() else {
        return String::new();
    };

    let webhook_url = urls.release_webhook_url(
        &project.organization_slug,
        &project.slug,
        plugin.slug(),
        token,
    );
    match renderer.release_doc_html(&webhook_url) {
        Ok(doc) => doc,
        Err(PluginError::NotImplemented) => String::new(),
        Err(err) => {
            log::warn!("plugin {} release doc hook failed: {}", plugin.slug(), err);
            String::new()
        }
    }
}

/// "api_key" -> "Api Key"
fn title_case(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(|c| c.to_lowercase()))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("api_key"), "Api Key");
        assert_eq!(title_case("URL"), "Url");
        assert_eq!(title_case("endpoint"), "Endpoint");
    }
}
