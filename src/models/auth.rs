// src/models/auth.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[serde(rename = "codigo")]
    #[validate(length(min = 1, message = "validation.login_code"))]
    #[schema(example = "ADMIN")]
    pub code: String,

    #[serde(rename = "contrasena")]
    #[validate(length(min = 1, message = "validation.login_password"))]
    pub password: String,
}

// Resposta de login bem-sucedido (o frontend guarda esses dados na sessão)
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "administrador")]
    pub is_admin: bool,
}

/// Resposta genérica com mensagem.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Resposta de criação com o ID gerado.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedResponse {
    pub message: String,
    pub id: i64,
}
