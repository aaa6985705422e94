use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::{
    common::i18n::I18nStore,
    middleware::i18n::Locale,
    printing::PrintError,
    services::validation::ValidationFailure,
};

// Nosso tipo de erro de domínio. A tradução para HTTP acontece em `to_api_error`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Dado inválido: {0}")]
    InvalidInput(#[from] ValidationFailure),

    #[error("Faltam dados obrigatórios")]
    MissingFields,

    #[error("Código de funcionário já existe")]
    EmployeeCodeExists,

    #[error("Código de usuário desconhecido")]
    UnknownLoginCode,

    #[error("Senha incorreta")]
    WrongPassword,

    #[error("Funcionário não encontrado")]
    EmployeeNotFound,

    #[error("Vendedor não encontrado")]
    SalespersonNotFound,

    #[error("Ordem não encontrada")]
    OrderNotFound,

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de impressão: {0}")]
    PrintError(#[from] PrintError),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::InvalidInput(_) | AppError::MissingFields => {
                StatusCode::BAD_REQUEST
            }
            AppError::EmployeeCodeExists => StatusCode::CONFLICT,
            AppError::WrongPassword => StatusCode::UNAUTHORIZED,
            AppError::UnknownLoginCode
            | AppError::EmployeeNotFound
            | AppError::SalespersonNotFound
            | AppError::OrderNotFound => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_)
            | AppError::BcryptError(_)
            | AppError::PrintError(_)
            | AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message_key(&self) -> String {
        let key = match self {
            AppError::ValidationError(errors) => return first_validation_message(errors),
            AppError::InvalidInput(failure) => failure.message_key(),
            AppError::MissingFields => "errors.missing_fields",
            AppError::EmployeeCodeExists => "errors.employee_code_exists",
            AppError::UnknownLoginCode => "errors.unknown_login_code",
            AppError::WrongPassword => "errors.wrong_password",
            AppError::EmployeeNotFound => "errors.employee_not_found",
            AppError::SalespersonNotFound => "errors.salesperson_not_found",
            AppError::OrderNotFound => "errors.order_not_found",
            AppError::PrintError(_) => "errors.print_failed",
            AppError::DatabaseError(_)
            | AppError::BcryptError(_)
            | AppError::InternalServerError(_) => "errors.internal",
        };
        key.to_string()
    }

    /// Converte para a resposta HTTP no idioma do cliente.
    ///
    /// Erros 500 só levam uma mensagem genérica; o detalhe fica no log.
    pub fn to_api_error(self, locale: &Locale, store: &I18nStore) -> ApiError {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        ApiError {
            status,
            message: store.translate(&locale.0, &self.message_key()),
        }
    }
}

// Os payloads usam a própria chave de tradução como `message` do validator.
fn first_validation_message(errors: &validator::ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .iter()
        .flat_map(|(_, field_errors)| field_errors.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "errors.invalid_payload".to_string())
}

/// Erro pronto para sair pela API: `{"error": "..."}` com o status correspondente.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}
