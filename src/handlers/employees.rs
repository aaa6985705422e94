// src/handlers/employees.rs

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    common::{
        error::{ApiError, AppError},
        extract::json_body,
    },
    config::AppState,
    middleware::i18n::Locale,
    models::{
        auth::{CreatedResponse, MessageResponse},
        employee::{CreateEmployeePayload, EmployeeProfile, EmployeeSummary, UpdateEmployeePayload},
    },
};

#[utoipa::path(
    post,
    path = "/createEmployee",
    tag = "Employees",
    request_body = CreateEmployeePayload,
    responses(
        (status = 201, description = "Funcionário criado", body = CreatedResponse),
        (status = 409, description = "Código já existe")
    )
)]
pub async fn create_employee(
    State(app_state): State<AppState>,
    locale: Locale,
    payload: Result<Json<CreateEmployeePayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    let payload = json_body(payload).map_err(to_api)?;
    let employee = app_state
        .employee_service
        .create(payload)
        .await
        .map_err(to_api)?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: app_state.i18n_store.translate(&locale.0, "messages.employee_created"),
            id: employee.id,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/getEmployee/{code}",
    tag = "Employees",
    params(("code" = String, Path, description = "Código do funcionário")),
    responses(
        (status = 200, description = "Dados do funcionário", body = EmployeeProfile),
        (status = 404, description = "Funcionário não encontrado")
    )
)]
pub async fn get_employee(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(code): Path<String>,
) -> Result<Json<EmployeeProfile>, ApiError> {
    let employee = app_state
        .employee_service
        .get(&code)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(employee.into()))
}

#[utoipa::path(
    get,
    path = "/getAllEmployees",
    tag = "Employees",
    responses((status = 200, description = "Lista de funcionários", body = Vec<EmployeeSummary>))
)]
pub async fn get_all_employees(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<Json<Vec<EmployeeSummary>>, ApiError> {
    let employees = app_state
        .employee_service
        .list()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(employees.into_iter().map(EmployeeSummary::from).collect()))
}

#[utoipa::path(
    put,
    path = "/updateEmployee/{code}",
    tag = "Employees",
    request_body = UpdateEmployeePayload,
    params(("code" = String, Path, description = "Código do funcionário")),
    responses(
        (status = 200, description = "Funcionário atualizado", body = MessageResponse),
        (status = 404, description = "Funcionário não encontrado")
    )
)]
pub async fn update_employee(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(code): Path<String>,
    payload: Result<Json<UpdateEmployeePayload>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    let payload = json_body(payload).map_err(to_api)?;
    app_state
        .employee_service
        .update(&code, payload)
        .await
        .map_err(to_api)?;

    Ok(Json(MessageResponse {
        message: app_state.i18n_store.translate(&locale.0, "messages.employee_updated"),
    }))
}
