//! User information records

use serde::{Deserialize, Serialize};

/// Profile fields kept by the user information service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInformation {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub user_image: Option<String>,
}

impl UserInformation {
    /// Keep only the fields `permissions` marks as visible
    pub fn visible_under(&self, permissions: &FieldPermissions) -> Self {
        UserInformation {
            first_name: self.first_name.clone().filter(|_| permissions.first_name),
            last_name: self.last_name.clone().filter(|_| permissions.last_name),
            user_image: self.user_image.clone().filter(|_| permissions.user_image),
        }
    }
}

/// Per-field visibility of a user's information to other users
///
/// Everything is private until the owner opts in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPermissions {
    pub first_name: bool,
    pub last_name: bool,
    pub user_image: bool,
}
