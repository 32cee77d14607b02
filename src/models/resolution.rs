use uuid::Uuid;

/// How a group was declared fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionKind {
    InNextRelease,
    InRelease,
}

/// Resolution record, one-to-one with a group. A missing `kind` is a legacy
/// explicit resolution and renders like `InNextRelease`.
#[derive(Debug, Clone)]
pub struct GroupResolution {
    pub group_id: Uuid,
    pub kind: Option<ResolutionKind>,
    pub release_version: Option<String>,
    pub actor_id: Option<i32>,
}
