pub mod auth;
pub mod employee_service;
pub mod order_service;
pub mod receipt_service;
pub mod validation;
