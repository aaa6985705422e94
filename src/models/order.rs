// src/models/order.rs

use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Row, sqlite::SqliteRow};
use utoipa::ToSchema;

use crate::services::validation::{ValidationFailure, WIRE_DATETIME_FORMAT};

pub const DEFAULT_PAYMENT_METHOD: &str = "efectivo";

// --- Entidade ---

/// Uma ordem de conserto, como está no banco.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Order {
    #[schema(example = 1024)]
    pub id: i64,

    #[serde(rename = "nombreCliente")]
    #[schema(example = "María Restrepo")]
    pub client_name: String,

    #[serde(rename = "fechaEntrega", with = "wire_datetime")]
    #[schema(value_type = String, example = "2025-03-14 17:30")]
    pub delivery_at: NaiveDateTime,

    // Sempre em UTC
    #[serde(rename = "fechaCreacion", with = "wire_datetime")]
    #[schema(value_type = String, example = "2025-03-10 15:02")]
    pub created_at: NaiveDateTime,

    #[serde(rename = "valorTotal")]
    #[schema(value_type = f64, example = 50000)]
    pub total: Decimal,

    #[serde(rename = "abono")]
    #[schema(value_type = f64, example = 20000)]
    pub advance: Decimal,

    #[serde(rename = "saldo")]
    #[schema(value_type = f64, example = 30000)]
    pub balance: Decimal,

    #[serde(rename = "celular")]
    #[schema(example = "3001234567")]
    pub mobile: String,

    #[serde(rename = "telefono")]
    pub phone: Option<String>,

    #[serde(rename = "observaciones")]
    #[schema(example = "Reparar cierre")]
    pub notes: String,

    #[serde(rename = "vendedor")]
    #[schema(example = "ADMIN")]
    pub salesperson: String,

    #[serde(rename = "finalizada")]
    pub completed: bool,

    #[serde(rename = "medioPago")]
    #[schema(example = "efectivo")]
    pub payment_method: String,
}

// Os valores monetários ficam em TEXT, então o FromRow é manual.
impl<'r> FromRow<'r, SqliteRow> for Order {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            client_name: row.try_get("client_name")?,
            delivery_at: row.try_get("delivery_at")?,
            created_at: row.try_get("created_at")?,
            total: decimal_column(row, "total")?,
            advance: decimal_column(row, "advance")?,
            balance: decimal_column(row, "balance")?,
            mobile: row.try_get("mobile")?,
            phone: row.try_get("phone")?,
            notes: row.try_get("notes")?,
            salesperson: row.try_get("salesperson")?,
            completed: row.try_get("completed")?,
            payment_method: row.try_get("payment_method")?,
        })
    }
}

fn decimal_column(row: &SqliteRow, column: &str) -> Result<Decimal, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    Decimal::from_str(&raw).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

/// Dados validados para inserir uma ordem nova.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub client_name: String,
    pub delivery_at: NaiveDateTime,
    pub total: Decimal,
    pub advance: Decimal,
    pub balance: Decimal,
    pub mobile: String,
    pub phone: Option<String>,
    pub notes: String,
    pub salesperson: String,
    pub payment_method: String,
}

/// Estado editável de uma ordem, usado no UPDATE depois de mesclar e validar.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderChanges {
    pub client_name: String,
    pub delivery_at: NaiveDateTime,
    pub total: Decimal,
    pub advance: Decimal,
    pub balance: Decimal,
    pub mobile: String,
    pub phone: Option<String>,
    pub notes: String,
    pub completed: bool,
    pub payment_method: String,
}

impl From<&Order> for OrderChanges {
    fn from(order: &Order) -> Self {
        Self {
            client_name: order.client_name.clone(),
            delivery_at: order.delivery_at,
            total: order.total,
            advance: order.advance,
            balance: order.balance,
            mobile: order.mobile.clone(),
            phone: order.phone.clone(),
            notes: order.notes.clone(),
            completed: order.completed,
            payment_method: order.payment_method.clone(),
        }
    }
}

// --- Entrada numérica ---

/// Valor numérico vindo do frontend: aceita número JSON ou string numérica.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(serde_json::Number),
    Text(String),
}

impl NumericInput {
    pub fn to_decimal(&self) -> Result<Decimal, ValidationFailure> {
        let raw = match self {
            NumericInput::Number(n) => n.to_string(),
            NumericInput::Text(s) => s.trim().to_string(),
        };

        Decimal::from_str(&raw)
            .or_else(|_| Decimal::from_scientific(&raw))
            .map_err(|_| ValidationFailure::InvalidNumber)
    }
}

// --- Payloads ---

/// Corpo de `POST /submitData`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SubmitOrderPayload {
    #[serde(rename = "nombreCliente")]
    #[schema(example = "María Restrepo")]
    pub client_name: String,

    #[serde(rename = "fechaEntrega")]
    #[schema(example = "2025-03-14 17:30")]
    pub delivery_at: String,

    #[serde(rename = "valorTotal")]
    #[schema(value_type = f64, example = 50000)]
    pub total: NumericInput,

    #[serde(rename = "abono")]
    #[schema(value_type = f64, example = 20000)]
    pub advance: NumericInput,

    #[serde(rename = "saldo")]
    #[schema(value_type = f64, example = 30000)]
    pub balance: NumericInput,

    #[serde(rename = "celular")]
    #[schema(example = "3001234567")]
    pub mobile: String,

    #[serde(rename = "telefono", default)]
    pub phone: Option<String>,

    #[serde(rename = "observaciones")]
    #[schema(example = "Reparar cierre")]
    pub notes: String,

    #[serde(rename = "vendedor")]
    #[schema(example = "ADMIN")]
    pub salesperson: String,

    #[serde(rename = "medioPago", default)]
    #[schema(example = "efectivo")]
    pub payment_method: Option<String>,

    /// Quantidade de vias do negócio (1 a 20); número ou string numérica
    #[serde(rename = "cantidadObjetos", default)]
    #[schema(value_type = Option<i64>, example = 1)]
    pub business_copies: Option<NumericInput>,

    /// Cliente recebe o comprovante por WhatsApp: só imprime a via do negócio
    #[serde(rename = "tieneWhatsapp", default)]
    pub business_only: Option<bool>,
}

/// Corpo de `PUT /updateOrder/{id}`: só os campos presentes mudam.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateOrderPayload {
    #[serde(rename = "nombreCliente")]
    pub client_name: Option<String>,

    #[serde(rename = "fechaEntrega")]
    pub delivery_at: Option<String>,

    #[serde(rename = "valorTotal")]
    #[schema(value_type = Option<f64>)]
    pub total: Option<NumericInput>,

    #[serde(rename = "abono")]
    #[schema(value_type = Option<f64>)]
    pub advance: Option<NumericInput>,

    #[serde(rename = "saldo")]
    #[schema(value_type = Option<f64>)]
    pub balance: Option<NumericInput>,

    #[serde(rename = "celular")]
    pub mobile: Option<String>,

    // String vazia apaga o telefone adicional
    #[serde(rename = "telefono")]
    pub phone: Option<String>,

    #[serde(rename = "observaciones")]
    pub notes: Option<String>,

    #[serde(rename = "finalizada")]
    pub completed: Option<bool>,

    #[serde(rename = "medioPago")]
    pub payment_method: Option<String>,
}

/// Corpo de `POST /reprintOrder/{id}`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ReprintPayload {
    // "1" quando ausente
    #[serde(rename = "reprintType")]
    #[schema(example = "1")]
    pub reprint_type: Option<String>,
}

/// Resposta de `POST /submitData`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubmitOrderResponse {
    pub message: String,
    pub id: i64,
    #[serde(rename = "impreso")]
    pub printed: bool,
    #[serde(rename = "errorImpresion", skip_serializing_if = "Option::is_none")]
    pub print_error: Option<String>,
}

// --- Impressão ---

/// Quais vias imprimir.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintRequest {
    pub customer_copy: bool,
    pub business_copies: u32,
    // Via do cliente com o cabeçalho de reimpressão
    pub reprint_header: bool,
}

impl PrintRequest {
    pub fn new(business_only: bool, business_copies: u32) -> Self {
        Self {
            customer_copy: !business_only,
            business_copies,
            reprint_header: false,
        }
    }

    pub fn customer_reprint() -> Self {
        Self {
            customer_copy: true,
            business_copies: 0,
            reprint_header: true,
        }
    }
}

/// Tipos de reimpressão aceitos pelo frontend ("1", "2", "3").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReprintKind {
    CustomerAndBusiness,
    CustomerOnly,
    BusinessOnly,
}

impl ReprintKind {
    pub fn print_request(&self) -> PrintRequest {
        match self {
            ReprintKind::CustomerAndBusiness => PrintRequest::new(false, 1),
            ReprintKind::CustomerOnly => PrintRequest::customer_reprint(),
            ReprintKind::BusinessOnly => PrintRequest::new(true, 1),
        }
    }

    pub fn message_key(&self) -> &'static str {
        match self {
            ReprintKind::CustomerAndBusiness => "reprint.customer_and_business",
            ReprintKind::CustomerOnly => "reprint.customer_only",
            ReprintKind::BusinessOnly => "reprint.business_only",
        }
    }
}

impl FromStr for ReprintKind {
    type Err = ValidationFailure;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(ReprintKind::CustomerAndBusiness),
            "2" => Ok(ReprintKind::CustomerOnly),
            "3" => Ok(ReprintKind::BusinessOnly),
            _ => Err(ValidationFailure::InvalidReprintType),
        }
    }
}

// Datas no formato "YYYY-MM-DD HH:MM" usado pelo frontend
pub mod wire_datetime {
    use super::WIRE_DATETIME_FORMAT;
    use chrono::NaiveDateTime;
    use serde::Serializer;

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(WIRE_DATETIME_FORMAT))
    }
}
