use std::env;

use url::Url;
use uuid::Uuid;

/// Base-URL configuration used to render absolute links (group permalinks,
/// plugin assets, release webhook endpoints).
#[derive(Debug, Clone)]
pub struct UrlConfig {
    base_url: Url,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("BASE_URL is not set")]
    MissingBaseUrl,

    #[error("BASE_URL is not a valid URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
}

impl UrlConfig {
    pub fn new(base_url: Url) -> Self {
        Self { base_url }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = env::var("BASE_URL").map_err(|_| ConfigError::MissingBaseUrl)?;
        Ok(Self {
            base_url: Url::parse(&raw)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute link to a group's detail page. Embeds the organization slug,
    /// so callers must gate it on organization membership.
    pub fn group_permalink(&self, org_slug: &str, project_slug: &str, group_id: Uuid) -> String {
        let mut url = self.base_url.clone();
        url.set_path(&format!("/{}/{}/issues/{}/", org_slug, project_slug, group_id));
        url.to_string()
    }

    /// Absolute URL for a plugin-bundled static asset.
    pub fn asset_url(&self, asset_key: &str, asset: &str) -> String {
        let mut url = self.base_url.clone();
        url.set_path(&format!("/_static/{}/{}", asset_key, asset));
        url.to_string()
    }

    /// Release webhook endpoint handed to plugins that render integration
    /// docs. The token authenticates the posting release system.
    pub fn release_webhook_url(
        &self,
        org_slug: &str,
        project_slug: &str,
        plugin_slug: &str,
        token: &str,
    ) -> String {
        let mut url = self.base_url.clone();
        url.set_path(&format!(
            "/api/0/projects/{}/{}/releases/webhook/{}/{}/",
            org_slug, project_slug, plugin_slug, token
        ));
        url.to_string()
    }
}
