//! Session and user types shared across the workspace.

use serde::{Deserialize, Serialize};

/// The signed-in user, as reported by the auth service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    /// Unique user id; every product row is scoped to this value.
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl UserInfo {
    /// Something presentable: the mailbox part of the email, or the id.
    pub fn display_name(&self) -> String {
        match &self.email {
            Some(email) => email.split('@').next().unwrap_or(email).to_string(),
            None => self.id.clone(),
        }
    }
}

/// An authenticated session: the bearer token plus the user it belongs to.
///
/// A session is either absent or present; it is only ever written by
/// [`crate::Auth`] in response to sign-in/sign-out outcomes, never by UI
/// code directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    pub user: UserInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_prefers_email_mailbox() {
        let user = UserInfo {
            id: "8c9f1a2b".to_string(),
            email: Some("ada@example.com".to_string()),
        };
        assert_eq!(user.display_name(), "ada");

        let user = UserInfo {
            id: "8c9f1a2b".to_string(),
            email: None,
        };
        assert_eq!(user.display_name(), "8c9f1a2b");
    }

    #[test]
    fn test_session_decodes_token_grant_response() {
        let body = serde_json::json!({
            "access_token": "jwt-token",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "refresh",
            "user": { "id": "user-1", "email": "ada@example.com", "role": "authenticated" }
        });
        let session: Session = serde_json::from_value(body).unwrap();
        assert_eq!(session.access_token, "jwt-token");
        assert_eq!(session.expires_in, Some(3600));
        assert_eq!(session.user.id, "user-1");
        assert_eq!(session.user.email.as_deref(), Some("ada@example.com"));
    }
}
