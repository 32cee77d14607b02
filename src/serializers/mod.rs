//! View serializers.
//!
//! `group` holds the batched attribute collector and the base composer,
//! `status` the pure status-derivation table, `stream` the stats/tag/shared
//! decorators, and `plugin` the independent plugin pipeline.

pub mod group;
pub mod plugin;
pub mod status;
pub mod stream;
pub mod user;

pub use group::{GroupAttrs, GroupSerializer, GroupView, ProjectView, SubscriptionState};
pub use plugin::{serialize_plugin, serialize_plugin_with_config, ConfigFieldView, PluginView};
pub use status::{derive_status, IgnoreDetails, StatusDetails, StatusLabel};
pub use stream::{
    attach_tag_window, redact_shared, StatsPeriod, StreamGroupSerializer, TagValueWindow,
};
pub use user::UserView;
