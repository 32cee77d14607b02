use serde::Serialize;

use crate::models::User;

/// Compact user record embedded in group views (assignee, status actors).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
}

impl UserView {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}
