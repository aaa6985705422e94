// src/common/extract.rs

use axum::{
    Json,
    extract::{
        Path,
        rejection::{JsonRejection, PathRejection},
    },
};

use crate::{common::error::AppError, services::validation::ValidationFailure};

/// Corpo JSON ausente, malformado ou sem campos obrigatórios vira 400 ("Faltan datos requeridos"),
/// em vez do 415/422 padrão do axum.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            tracing::debug!("Corpo da requisição rejeitado: {}", rejection.body_text());
            Err(AppError::MissingFields)
        }
    }
}

/// ID de ordem fora do formato inteiro vira 400 no mesmo formato `{"error": ...}`.
pub fn order_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    match path {
        Ok(Path(id)) => Ok(id),
        Err(rejection) => {
            tracing::debug!("ID de ordem rejeitado: {}", rejection.body_text());
            Err(ValidationFailure::InvalidOrderId.into())
        }
    }
}
