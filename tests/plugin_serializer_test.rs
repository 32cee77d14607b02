//! Plugin serializer tests
//!
//! Capability-driven metadata, release doc rendering, and config field
//! normalization with the secret redaction rule.

mod common;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use common::fixtures::{member_viewer, project, urls, TestPlugin};
use faultview::plugins::ConfigField;
use faultview::serializers::{serialize_plugin, serialize_plugin_with_config};

#[test]
fn bare_plugin_serializes_defaults() {
    let plugin = TestPlugin::named("webhooks");
    let view = serialize_plugin(&plugin, None, &urls());

    assert_eq!(view.id, "webhooks");
    assert_eq!(view.name, "Webhooks");
    assert_eq!(view.short_name, "Webhooks");
    assert_eq!(view.plugin_type, "default");
    assert!(view.can_disable);
    assert!(!view.is_testable);
    assert!(view.contexts.is_empty());
    assert_eq!(view.status, "unknown");
    assert_eq!(view.doc, "");
    // no project scope: no enabled flag at all
    assert_eq!(view.enabled, None);
    let json = serde_json::to_value(&view).unwrap();
    assert!(json.get("enabled").is_none());
    assert!(json.get("config").is_none());
}

#[test]
fn capabilities_surface_in_the_view() {
    let mut plugin = TestPlugin::named("pagerduty");
    plugin.testable = true;
    plugin.contexts = vec!["incident".to_string()];
    plugin.asset_paths = vec!["dist/widget.js".to_string()];

    let view = serialize_plugin(&plugin, Some(&project()), &urls());

    assert!(view.is_testable);
    assert_eq!(view.contexts, vec!["incident"]);
    assert_eq!(view.enabled, Some(true));
    assert_eq!(
        view.assets[0].url,
        "https://faultview.example.com/_static/pagerduty/dist/widget.js"
    );
}

#[test]
fn release_doc_renders_only_with_a_token() {
    let mut plugin = TestPlugin::named("heroku");
    plugin.release_doc = Some("<p>Deploy hook</p>".to_string());

    // no token: doc rendering is suppressed entirely
    let view = serialize_plugin(&plugin, Some(&project()), &urls());
    assert_eq!(view.doc, "");

    let mut project = project();
    project.release_token = Some("sekrit".to_string());
    let view = serialize_plugin(&plugin, Some(&project), &urls());
    assert_eq!(
        view.doc,
        "<p>Deploy hook</p> webhook=https://faultview.example.com/api/0/projects/acme/backend/releases/webhook/heroku/sekrit/"
    );
}

#[test]
fn unimplemented_doc_renderer_falls_back_to_empty() {
    let mut plugin = TestPlugin::named("heroku");
    plugin.doc_not_implemented = true;
    let mut project = project();
    project.release_token = Some("sekrit".to_string());

    let view = serialize_plugin(&plugin, Some(&project), &urls());
    assert_eq!(view.doc, "");
}

#[test]
fn config_fields_normalize_defaults_and_values() {
    let mut plugin = TestPlugin::named("tracker");
    plugin.config = vec![ConfigField {
        name: "instance_url".to_string(),
        help: Some("Base URL of your instance".to_string()),
        ..Default::default()
    }];
    plugin
        .options
        .insert("instance_url".to_string(), json!("https://tracker.test"));

    let view = serialize_plugin_with_config(&plugin, Some(&project()), &member_viewer(7), &urls());
    let config = view.config.as_ref().unwrap();

    assert_eq!(config[0].name, "instance_url");
    assert_eq!(config[0].label, "Instance Url");
    assert_eq!(config[0].field_type, "text");
    assert!(config[0].required);
    assert!(!config[0].readonly);
    assert_eq!(config[0].value, Some(json!("https://tracker.test")));
    assert_eq!(config[0].has_saved_value, None);
}

#[test]
fn unset_option_still_emits_a_null_value_key() {
    let mut plugin = TestPlugin::named("tracker");
    plugin.config = vec![ConfigField {
        name: "endpoint".to_string(),
        ..Default::default()
    }];

    let view = serialize_plugin_with_config(&plugin, None, &member_viewer(7), &urls());
    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["config"][0]["value"], Value::Null);
}

#[test]
fn secret_fields_never_expose_the_stored_value() {
    let mut plugin = TestPlugin::named("tracker");
    plugin.config = vec![ConfigField {
        name: "api_key".to_string(),
        field_type: Some("secret".to_string()),
        has_saved_value: Some(true),
        prefix: Some("fk_live_".to_string()),
        ..Default::default()
    }];
    // a stored option exists, but must never be read for a secret field
    plugin
        .options
        .insert("api_key".to_string(), json!("fk_live_1234567890"));

    let view = serialize_plugin_with_config(&plugin, Some(&project()), &member_viewer(7), &urls());
    let config = view.config.as_ref().unwrap();

    assert_eq!(config[0].label, "Api Key");
    assert_eq!(config[0].value, None);
    assert_eq!(config[0].has_saved_value, Some(true));
    assert_eq!(config[0].prefix.as_deref(), Some("fk_live_"));

    let json = serde_json::to_value(&view).unwrap();
    let field = &json["config"][0];
    assert!(field.get("value").is_none());
    assert_eq!(field["has_saved_value"], json!(true));
    assert_eq!(field["prefix"], json!("fk_live_"));
}

#[test]
fn secret_flags_default_when_unset() {
    let mut plugin = TestPlugin::named("tracker");
    plugin.config = vec![ConfigField {
        name: "token".to_string(),
        field_type: Some("secret".to_string()),
        ..Default::default()
    }];

    let view = serialize_plugin_with_config(&plugin, None, &member_viewer(7), &urls());
    let config = view.config.as_ref().unwrap();
    assert_eq!(config[0].has_saved_value, Some(false));
    assert_eq!(config[0].prefix.as_deref(), Some(""));
}

#[test]
fn plugin_without_config_capability_gets_an_empty_list() {
    let plugin = TestPlugin::named("webhooks");
    let view = serialize_plugin_with_config(&plugin, None, &member_viewer(7), &urls());
    assert_eq!(view.config, Some(Vec::new()));
}
