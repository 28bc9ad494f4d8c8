use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub sub: String,
    /// Capabilities granted by the identity provider (e.g. "add:location")
    pub permissions: Vec<String>,
}

impl AuthenticatedUser {
    /// Check if user holds a specific permission
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }

    /// Permissions from `required` that this user lacks, in the given order
    pub fn missing_permissions<'a>(&self, required: &[&'a str]) -> Vec<&'a str> {
        required
            .iter()
            .copied()
            .filter(|p| !self.has_permission(p))
            .collect()
    }
}
