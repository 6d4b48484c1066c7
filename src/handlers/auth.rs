// handlers/auth.rs - Token acquisition (no bearer token required)

use axum::extract::State;
use serde_json::{json, Value};

use crate::database::models::{Credentials, NewUser};
use crate::middleware::{ApiResponse, ApiResult, JsonBody};
use crate::policy::{authorize, Action, Caller};
use crate::services::UserService;
use crate::state::AppState;
use crate::validation::{schemas, validate_into};

/// POST /auth/token
///
/// Body: `{ username, password }`. Returns `{ token }`, or 401 for an unknown
/// user or a wrong password.
pub async fn token(State(state): State<AppState>, caller: Caller, JsonBody(body): JsonBody) -> ApiResult<Value> {
    authorize(&caller, Action::Authenticate)?;
    let credentials: Credentials = validate_into(&schemas::user_auth(), &body)?;

    let service = UserService::new(&state);
    let user = service.authenticate(credentials).await?;
    let token = service.token_for(&user)?;
    tracing::info!(username = %user.username, "Issued token");
    Ok(ApiResponse::success(json!({ "token": token })))
}

/// POST /auth/register
///
/// Self sign-up. The schema has no `isAdmin`, so new accounts are never
/// admins. Returns `201 { token }`.
pub async fn register(State(state): State<AppState>, caller: Caller, JsonBody(body): JsonBody) -> ApiResult<Value> {
    authorize(&caller, Action::Register)?;
    let new_user: NewUser = validate_into(&schemas::user_register(), &body)?;

    let service = UserService::new(&state);
    let user = service.create(new_user).await?;
    let token = service.token_for(&user)?;
    Ok(ApiResponse::created(json!({ "token": token })))
}
