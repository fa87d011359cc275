//! Principal entity as seen by the token core.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity subject that tokens are issued for.
///
/// Owned by the principal directory; the token core only reads it and embeds
/// the roles into access tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: Uuid,

    /// Unique email, used as the canonical subject claim
    pub email: String,

    pub display_name: String,

    pub roles: Vec<String>,
}

impl Principal {
    pub fn new(email: impl Into<String>, display_name: impl Into<String>, roles: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            display_name: display_name.into(),
            roles,
        }
    }

    /// The value written into the `sub` claim
    pub fn subject(&self) -> &str {
        &self.email
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}
