use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use platform_api::{ApiError, ApiResult};
use retainiq_hr::{
    DashboardSummary, EmployeeFilter, EmployeePatch, HrError, NewEmployee, RiskOutcome,
    RiskScoreUpdate, employees, enrich,
};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::http::AppState;

#[derive(Debug, Serialize)]
pub struct EmployeeResponse {
    pub message: &'static str,
    pub employee: employees::Model,
    pub risk: RiskOutcome,
}

#[derive(Debug, Serialize)]
pub struct RiskResponse {
    pub message: &'static str,
    pub employee: employees::Model,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

pub(crate) fn hr_error(err: HrError) -> ApiError {
    match err {
        HrError::Validation(msg) => ApiError::bad_request(msg),
        HrError::NotFound(_) => ApiError::not_found("Employee not found"),
        other => ApiError::internal(other),
    }
}

fn parse_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::bad_request("Invalid employee ID"))
}

#[instrument(name = "http.employees.list", skip_all)]
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<EmployeeFilter>, QueryRejection>,
) -> ApiResult<Json<Vec<employees::Model>>> {
    let Query(filter) = query?;
    let records = state.employees.list(&filter).await.map_err(hr_error)?;
    Ok(Json(records))
}

#[instrument(name = "http.employees.create", skip_all)]
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<NewEmployee>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<EmployeeResponse>)> {
    let Json(input) = body?;
    let created = state.employees.create(input).await.map_err(hr_error)?;
    let (employee, risk) = enrich(&state.employees, state.risk.as_deref(), created).await;
    Ok((
        StatusCode::CREATED,
        Json(EmployeeResponse {
            message: "Employee added successfully",
            employee,
            risk,
        }),
    ))
}

#[instrument(name = "http.employees.get", skip_all)]
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<employees::Model>> {
    let id = parse_id(&id)?;
    let record = state.employees.get(id).await.map_err(hr_error)?;
    Ok(Json(record))
}

#[instrument(name = "http.employees.update", skip_all)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<EmployeePatch>, JsonRejection>,
) -> ApiResult<Json<EmployeeResponse>> {
    let id = parse_id(&id)?;
    let Json(patch) = body?;
    let updated = state.employees.update(id, patch).await.map_err(hr_error)?;
    let (employee, risk) = enrich(&state.employees, state.risk.as_deref(), updated).await;
    Ok(Json(EmployeeResponse {
        message: "Employee updated successfully",
        employee,
        risk,
    }))
}

#[instrument(name = "http.employees.delete", skip_all)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_id(&id)?;
    state.employees.delete(id).await.map_err(hr_error)?;
    Ok(Json(MessageResponse {
        message: "Employee deleted successfully",
    }))
}

/// `PUT`/`DELETE` on the collection path without an identifier.
pub async fn missing_id() -> ApiError {
    ApiError::bad_request("Missing employee ID")
}

/// Write-back used by external scoring jobs.
#[instrument(name = "http.employees.set_risk", skip_all)]
pub async fn set_risk(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<RiskScoreUpdate>, JsonRejection>,
) -> ApiResult<Json<RiskResponse>> {
    let id = parse_id(&id)?;
    let Json(update) = body?;
    let employee = state
        .employees
        .set_risk_score(id, update.risk_score)
        .await
        .map_err(hr_error)?;
    Ok(Json(RiskResponse {
        message: "Risk score updated",
        employee,
    }))
}

#[instrument(name = "http.employees.managers", skip_all)]
pub async fn managers(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    let names = state.employees.managers().await.map_err(hr_error)?;
    Ok(Json(names))
}

#[instrument(name = "http.dashboard.summary", skip_all)]
pub async fn summary(State(state): State<AppState>) -> ApiResult<Json<DashboardSummary>> {
    let records = state.employees.list_all().await.map_err(hr_error)?;
    Ok(Json(DashboardSummary::from_employees(&records)))
}
