pub mod auth;
pub mod employees;
pub mod health;
pub mod orders;
