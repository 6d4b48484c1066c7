// handlers/users.rs - /users handlers

use axum::extract::{Path, State};
use serde_json::{json, Value};

use crate::database::models::{NewUser, UserUpdate};
use crate::database::UserStore;
use crate::middleware::{ApiResponse, ApiResult, JsonBody};
use crate::policy::{authorize, Action, Caller};
use crate::services::UserService;
use crate::state::AppState;
use crate::validation::{require_changes, schemas, validate_into};

/// POST /users - admin only
///
/// Unlike `/auth/register`, an admin may create other admins here.
/// Returns `201 { user, token }` with a token for the new account.
pub async fn create(State(state): State<AppState>, caller: Caller, JsonBody(body): JsonBody) -> ApiResult<Value> {
    authorize(&caller, Action::CreateUser)?;
    let new_user: NewUser = validate_into(&schemas::user_new(), &body)?;

    let service = UserService::new(&state);
    let user = service.create(new_user).await?;
    let token = service.token_for(&user)?;
    Ok(ApiResponse::created(json!({ "user": user, "token": token })))
}

/// GET /users - admin only
pub async fn list(State(state): State<AppState>, caller: Caller) -> ApiResult<Value> {
    authorize(&caller, Action::ListUsers)?;
    let users = state.store.find_users().await?;
    Ok(ApiResponse::success(json!({ "users": users })))
}

/// GET /users/:username - admin or the user themself
pub async fn get(State(state): State<AppState>, caller: Caller, Path(username): Path<String>) -> ApiResult<Value> {
    authorize(&caller, Action::ReadUser(&username))?;
    let user = state.store.get_user(&username).await?;
    Ok(ApiResponse::success(json!({ "user": user })))
}

/// PATCH /users/:username - admin or the user themself
///
/// Only admins may change `isAdmin`.
pub async fn update(
    State(state): State<AppState>,
    caller: Caller,
    Path(username): Path<String>,
    JsonBody(body): JsonBody,
) -> ApiResult<Value> {
    authorize(&caller, Action::UpdateUser(&username))?;
    if body.get("isAdmin").is_some() {
        authorize(&caller, Action::UpdateUserRole(&username))?;
    }
    let changes: UserUpdate = validate_into(&schemas::user_update(), &body)?;
    require_changes(&body)?;

    let user = UserService::new(&state).update(&username, changes).await?;
    tracing::info!(username = %user.username, "User updated");
    Ok(ApiResponse::success(json!({ "user": user })))
}

/// DELETE /users/:username - admin or the user themself
pub async fn delete(State(state): State<AppState>, caller: Caller, Path(username): Path<String>) -> ApiResult<Value> {
    authorize(&caller, Action::DeleteUser(&username))?;
    state.store.remove_user(&username).await?;
    tracing::info!(username = %username, "User deleted");
    Ok(ApiResponse::success(json!({ "deleted": username })))
}
