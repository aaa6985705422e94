// src/handlers/health.rs

use axum::{extract::State, http::StatusCode};

use crate::config::AppState;

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "Servidor e banco respondendo", body = String),
        (status = 503, description = "Banco indisponível", body = String)
    )
)]
pub async fn health(State(app_state): State<AppState>) -> (StatusCode, &'static str) {
    match sqlx::query("SELECT 1").execute(&app_state.db_pool).await {
        Ok(_) => (StatusCode::OK, "OK"),
        Err(e) => {
            tracing::error!("Banco indisponível no health check: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "DB UNAVAILABLE")
        }
    }
}
