// src/handlers/auth.rs

use axum::{Json, extract::State, extract::rejection::JsonRejection, response::IntoResponse};
use validator::Validate;

use crate::{
    common::{error::ApiError, error::AppError, extract::json_body},
    config::AppState,
    middleware::i18n::Locale,
    models::auth::{LoginPayload, LoginResponse},
};

#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Login realizado", body = LoginResponse),
        (status = 401, description = "Senha incorreta"),
        (status = 404, description = "Código de usuário desconhecido")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    locale: Locale,
    payload: Result<Json<LoginPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    let payload = json_body(payload).map_err(to_api)?;
    payload.validate().map_err(|e| to_api(AppError::ValidationError(e)))?;

    let employee = app_state
        .auth_service
        .login(&payload.code, &payload.password)
        .await
        .map_err(to_api)?;

    Ok(Json(LoginResponse {
        message: app_state.i18n_store.translate(&locale.0, "messages.login_ok"),
        name: employee.name,
        code: employee.code,
        is_admin: employee.is_admin,
    }))
}
