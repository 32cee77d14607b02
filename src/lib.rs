//! Faultview serialization layer
//!
//! Converts persisted issue groups and installed plugins into the JSON-ready
//! view records served by the HTTP API. The group pipeline is split into a
//! batched attribute collector (one store query per auxiliary concern for the
//! whole batch) and pure view composers; backing stores are injected as
//! traits so the web layer can wire real backends and tests can use the
//! in-memory ones.

pub mod config;
pub mod error;
pub mod models;
pub mod plugins;
pub mod serializers;
pub mod stores;
