use std::collections::HashSet;

/// User read model, referenced as assignee or as the actor behind a snooze
/// or resolution.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub username: String,
    pub email: String,
    pub is_active: bool,
}

/// The user a serialization call renders for. Organization membership is
/// resolved by the caller's auth layer and carried here so composers stay
/// pure.
#[derive(Debug, Clone)]
pub enum Viewer {
    Anonymous,
    User {
        user_id: i32,
        org_ids: HashSet<i32>,
    },
}

impl Viewer {
    pub fn user(user_id: i32, org_ids: impl IntoIterator<Item = i32>) -> Self {
        Viewer::User {
            user_id,
            org_ids: org_ids.into_iter().collect(),
        }
    }

    pub fn user_id(&self) -> Option<i32> {
        match self {
            Viewer::Anonymous => None,
            Viewer::User { user_id, .. } => Some(*user_id),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id().is_some()
    }

    pub fn is_org_member(&self, org_id: i32) -> bool {
        match self {
            Viewer::Anonymous => false,
            Viewer::User { org_ids, .. } => org_ids.contains(&org_id),
        }
    }
}
