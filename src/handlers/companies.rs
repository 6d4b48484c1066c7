// handlers/companies.rs - /companies handlers

use axum::extract::{Path, State};
use serde_json::{json, Value};

use crate::database::models::{CompanyFilter, CompanyUpdate, NewCompany};
use crate::database::CompanyStore;
use crate::middleware::{ApiResponse, ApiResult, JsonBody, QueryParams};
use crate::policy::{authorize, Action, Caller};
use crate::services::CompanyService;
use crate::state::AppState;
use crate::validation::{require_changes, schemas, validate_into};

/// POST /companies - admin only
///
/// Body: `{ handle, name, description?, numEmployees?, logoUrl? }`
/// Returns `201 { company }`.
pub async fn create(State(state): State<AppState>, caller: Caller, JsonBody(body): JsonBody) -> ApiResult<Value> {
    authorize(&caller, Action::CreateCompany)?;
    let new_company: NewCompany = validate_into(&schemas::company_new(), &body)?;

    let company = state.store.insert_company(new_company).await?;
    tracing::info!(handle = %company.handle, "Company created");
    Ok(ApiResponse::created(json!({ "company": company })))
}

/// GET /companies - public
///
/// Optional query filters: `name` (case-insensitive substring),
/// `minEmployees`, `maxEmployees`. Returns `{ companies: [...] }`.
pub async fn list(State(state): State<AppState>, caller: Caller, QueryParams(params): QueryParams) -> ApiResult<Value> {
    authorize(&caller, Action::ListCompanies)?;
    let schema = schemas::company_search();
    let filter: CompanyFilter = validate_into(&schema, &schema.coerce_query(params))?;

    let companies = CompanyService::new(&state).search(&filter).await?;
    Ok(ApiResponse::success(json!({ "companies": companies })))
}

/// GET /companies/:handle - public
pub async fn get(State(state): State<AppState>, caller: Caller, Path(handle): Path<String>) -> ApiResult<Value> {
    authorize(&caller, Action::ReadCompany)?;
    let company = state.store.get_company(&handle).await?;
    Ok(ApiResponse::success(json!({ "company": company })))
}

/// PATCH /companies/:handle - admin only
///
/// Accepts any subset of `{ name, description, numEmployees, logoUrl }`.
pub async fn update(
    State(state): State<AppState>,
    caller: Caller,
    Path(handle): Path<String>,
    JsonBody(body): JsonBody,
) -> ApiResult<Value> {
    authorize(&caller, Action::UpdateCompany)?;
    let changes: CompanyUpdate = validate_into(&schemas::company_update(), &body)?;
    require_changes(&body)?;

    let company = state.store.update_company(&handle, changes).await?;
    tracing::info!(handle = %company.handle, "Company updated");
    Ok(ApiResponse::success(json!({ "company": company })))
}

/// DELETE /companies/:handle - admin only
pub async fn delete(State(state): State<AppState>, caller: Caller, Path(handle): Path<String>) -> ApiResult<Value> {
    authorize(&caller, Action::DeleteCompany)?;
    state.store.remove_company(&handle).await?;
    tracing::info!(handle = %handle, "Company deleted");
    Ok(ApiResponse::success(json!({ "deleted": handle })))
}
