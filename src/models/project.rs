/// Project read model, denormalized with its owning organization so view
/// composers can build permalinks without another lookup.
#[derive(Debug, Clone)]
pub struct Project {
    pub id: i32,
    pub slug: String,
    pub name: String,
    pub organization_id: i32,
    pub organization_slug: String,
    /// Auto-resolve window in hours; unset or zero disables auto-resolve.
    pub resolve_age_hours: Option<i64>,
    /// Token authenticating the release webhook endpoint; unset suppresses
    /// plugin release-doc rendering for this project.
    pub release_token: Option<String>,
}
