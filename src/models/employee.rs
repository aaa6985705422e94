// src/models/employee.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

// Representa um funcionário vindo do banco de dados
#[derive(Debug, Clone, FromRow)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub code: String,
    // Hash bcrypt, nunca a senha em texto puro
    pub password_hash: String,
    pub is_admin: bool,
}

// Dados para cadastrar um funcionário
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEmployeePayload {
    #[serde(rename = "nombre")]
    #[validate(length(min = 1, max = 100, message = "validation.employee_name"))]
    #[schema(example = "Laura Gómez")]
    pub name: String,

    #[serde(rename = "telefono")]
    #[validate(length(min = 1, max = 16, message = "validation.employee_phone"))]
    #[schema(example = "3009876543")]
    pub phone: String,

    #[serde(rename = "codigo")]
    #[validate(length(min = 1, max = 50, message = "validation.employee_code"))]
    #[schema(example = "LG01")]
    pub code: String,

    #[serde(rename = "contrasena")]
    #[validate(length(min = 1, message = "validation.employee_password"))]
    pub password: String,

    #[serde(rename = "administrador")]
    pub is_admin: bool,
}

impl CreateEmployeePayload {
    /// Remove espaços nas pontas, como o frontend espera.
    pub fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            code: self.code.trim().to_string(),
            password: self.password.trim().to_string(),
            is_admin: self.is_admin,
        }
    }
}

// Atualização parcial: só os campos presentes são alterados
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateEmployeePayload {
    #[serde(rename = "nombre")]
    #[validate(length(min = 1, max = 100, message = "validation.employee_name"))]
    pub name: Option<String>,

    #[serde(rename = "telefono")]
    #[validate(length(min = 1, max = 16, message = "validation.employee_phone"))]
    pub phone: Option<String>,

    // Senha vazia é ignorada
    #[serde(rename = "contrasena")]
    pub password: Option<String>,

    #[serde(rename = "administrador")]
    pub is_admin: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EmployeeProfile {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "administrador")]
    pub is_admin: bool,
}

impl From<Employee> for EmployeeProfile {
    fn from(employee: Employee) -> Self {
        Self {
            name: employee.name,
            phone: employee.phone,
            code: employee.code,
            is_admin: employee.is_admin,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EmployeeSummary {
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "nombre")]
    pub name: String,
}

impl From<Employee> for EmployeeSummary {
    fn from(employee: Employee) -> Self {
        Self {
            code: employee.code,
            name: employee.name,
        }
    }
}
