pub mod auth;
pub mod employee;
pub mod order;
