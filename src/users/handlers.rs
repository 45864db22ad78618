use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{jwt::AdminUser, password::hash_password},
    error::ApiError,
    state::AppState,
    users::{
        dto::{CreateUserRequest, UpdateUserRequest},
        repo::UserAccount,
    },
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/:id", put(update_user).delete(delete_user))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> Result<Json<Vec<UserAccount>>, ApiError> {
    let users = UserAccount::list(&state.db).await?;
    Ok(Json(users))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Json<Value>, ApiError> {
    if UserAccount::find_by_username(&state.db, &payload.username)
        .await?
        .is_some()
    {
        warn!(username = %payload.username, "username already taken");
        return Err(ApiError::Conflict(format!(
            "Username '{}' already exists",
            payload.username
        )));
    }

    let hash = hash_password(&payload.password)?;
    let user =
        UserAccount::insert(&state.db, &payload.username, &hash, payload.role, Some(&admin.username))
            .await?;

    info!(username = %user.username, role = ?user.role, created_by = %admin.username, "user created");
    Ok(Json(json!({
        "id": user.id,
        "message": "User created successfully"
    })))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<Value>, ApiError> {
    let existing = UserAccount::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    // A renamed account must not collide with another account.
    if payload.username != existing.username {
        if let Some(other) = UserAccount::find_by_username(&state.db, &payload.username).await? {
            if other.id != id {
                warn!(username = %payload.username, "username already taken");
                return Err(ApiError::Conflict(format!(
                    "Username '{}' already exists",
                    payload.username
                )));
            }
        }
    }

    // Keep the stored hash unless a new, non-empty password was supplied.
    let password_hash = match payload.password.as_deref() {
        Some(p) if !p.is_empty() => hash_password(p)?,
        _ => existing.password_hash,
    };

    UserAccount::update(
        &state.db,
        id,
        &payload.username,
        &password_hash,
        payload.role,
        &admin.username,
    )
    .await?;

    info!(user_id = %id, updated_by = %admin.username, "user updated");
    Ok(Json(json!({ "message": "User updated successfully" })))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let target = UserAccount::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    if target.username == admin.username {
        warn!(username = %admin.username, "admin attempted self-deletion");
        return Err(ApiError::SelfDeletion);
    }

    UserAccount::delete(&state.db, id).await?;

    info!(username = %target.username, deleted_by = %admin.username, "user deleted");
    Ok(Json(json!({ "message": "User deleted successfully" })))
}
