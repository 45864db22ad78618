use serde::Deserialize;

use crate::auth::claims::Role;

/// Request body for creating an account.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub role: Role,
}

/// Request body for updating an account. An absent or empty password keeps
/// the stored hash.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub username: String,
    #[serde(default)]
    pub password: Option<String>,
    pub role: Role,
}
