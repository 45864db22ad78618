use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Account role; gates the user-management surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

/// JWT payload carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // username
    pub role: Role,
    pub iat: usize, // issued at (unix timestamp)
    pub exp: usize, // expires at (unix timestamp)
}

/// The authenticated caller, derived from a verified session token.
#[derive(Debug, Clone)]
pub struct Identity {
    pub username: String,
    pub role: Role,
}

impl Identity {
    pub fn require_role(&self, role: Role) -> Result<(), ApiError> {
        if self.role == role {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.sub,
            role: claims.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::from_str::<Role>("\"admin\"").unwrap(), Role::Admin);
        assert_eq!(serde_json::from_str::<Role>("\"user\"").unwrap(), Role::User);
    }

    #[test]
    fn require_role_gates_non_admins() {
        let admin = Identity {
            username: "admin".into(),
            role: Role::Admin,
        };
        let user = Identity {
            username: "testuser".into(),
            role: Role::User,
        };
        assert!(admin.require_role(Role::Admin).is_ok());
        let err = user.require_role(Role::Admin).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden));
    }
}
