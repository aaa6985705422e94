// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,

        // --- Auth ---
        handlers::auth::login,

        // --- Employees ---
        handlers::employees::create_employee,
        handlers::employees::get_employee,
        handlers::employees::get_all_employees,
        handlers::employees::update_employee,

        // --- Orders ---
        handlers::orders::submit_order,
        handlers::orders::get_orders,
        handlers::orders::delete_order,
        handlers::orders::update_order,
        handlers::orders::reprint_order,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::LoginPayload,
            models::auth::LoginResponse,
            models::auth::MessageResponse,
            models::auth::CreatedResponse,

            // --- Employees ---
            models::employee::CreateEmployeePayload,
            models::employee::UpdateEmployeePayload,
            models::employee::EmployeeProfile,
            models::employee::EmployeeSummary,

            // --- Orders ---
            models::order::Order,
            models::order::SubmitOrderPayload,
            models::order::SubmitOrderResponse,
            models::order::UpdateOrderPayload,
            models::order::ReprintPayload,
        )
    ),
    tags(
        (name = "Health", description = "Servidor e banco de dados"),
        (name = "Auth", description = "Login de funcionários"),
        (name = "Employees", description = "Cadastro de funcionários"),
        (name = "Orders", description = "Ordens de conserto e impressão de recibos")
    )
)]
pub struct ApiDoc;
