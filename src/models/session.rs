use serde::{Deserialize, Serialize};

/// Verified identity attached to a request.
///
/// Produced only after the session token's signature and expiry have been
/// checked; an anonymous request carries no `SessionToken` at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionToken {
    /// Identity-provider user id
    pub subject: String,
    pub email: Option<String>,
    pub is_admin: bool,
}

impl SessionToken {
    pub fn user(subject: impl Into<String>, email: Option<String>) -> Self {
        Self {
            subject: subject.into(),
            email,
            is_admin: false,
        }
    }

    pub fn admin(subject: impl Into<String>, email: Option<String>) -> Self {
        Self {
            subject: subject.into(),
            email,
            is_admin: true,
        }
    }
}
