// src/lib.rs

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod printing;
pub mod services;

use axum::{
    Json, Router,
    routing::{delete, get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;

use crate::config::AppState;
use crate::docs::ApiDoc;

/// Monta o router completo. Usado pelo servidor e pelos testes (oneshot).
pub fn create_router(app_state: AppState) -> Router {
    // Rotas de funcionários
    let employee_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/createEmployee", post(handlers::employees::create_employee))
        .route("/getEmployee/{code}", get(handlers::employees::get_employee))
        .route("/getAllEmployees", get(handlers::employees::get_all_employees))
        .route("/updateEmployee/{code}", put(handlers::employees::update_employee));

    // Rotas de ordens (os caminhos seguem o contrato do frontend)
    let order_routes = Router::new()
        .route("/submitData", post(handlers::orders::submit_order))
        .route("/getOrders", get(handlers::orders::get_orders))
        .route("/deleteOrder/{id}", delete(handlers::orders::delete_order))
        .route("/updateOrder/{id}", put(handlers::orders::update_order))
        .route("/reprintOrder/{id}", post(handlers::orders::reprint_order));

    Router::new()
        .route("/api/health", get(handlers::health::health))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .merge(employee_routes)
        .merge(order_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
