// src/services/validation.rs

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::order::NumericInput;

/// Diferença máxima aceita entre o saldo informado e `total - abono`.
pub const BALANCE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

pub const CLIENT_NAME_MIN_CHARS: usize = 3;
pub const NOTES_MIN_CHARS: usize = 5;
pub const NOTES_MAX_CHARS: usize = 500;
pub const PHONE_DIGITS: usize = 10;

/// Formato de data usado pelo frontend (ex: "2025-03-14 17:30").
pub const WIRE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

// Regras de negócio violadas. Cada variante vira um 400 com mensagem traduzida.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("numeric values are invalid")]
    InvalidNumber,

    #[error("total must be greater than zero")]
    TotalNotPositive,

    #[error("advance cannot be negative")]
    NegativeAdvance,

    #[error("balance cannot be negative")]
    NegativeBalance,

    #[error("balance must equal total minus advance")]
    BalanceMismatch,

    #[error("client name must have at least {CLIENT_NAME_MIN_CHARS} characters")]
    ClientNameTooShort,

    #[error("phone must have exactly {PHONE_DIGITS} digits")]
    InvalidPhone,

    #[error("notes must have at least {NOTES_MIN_CHARS} characters")]
    NotesTooShort,

    #[error("notes cannot exceed {NOTES_MAX_CHARS} characters")]
    NotesTooLong,

    #[error("delivery date must use the YYYY-MM-DD HH:MM format")]
    InvalidDeliveryDate,

    #[error("invalid reprint type")]
    InvalidReprintType,

    #[error("order id must be an integer")]
    InvalidOrderId,
}

impl ValidationFailure {
    /// Chave da mensagem no catálogo de traduções.
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::InvalidNumber => "validation.invalid_number",
            Self::TotalNotPositive => "validation.total_not_positive",
            Self::NegativeAdvance => "validation.negative_advance",
            Self::NegativeBalance => "validation.negative_balance",
            Self::BalanceMismatch => "validation.balance_mismatch",
            Self::ClientNameTooShort => "validation.client_name_too_short",
            Self::InvalidPhone => "validation.invalid_phone",
            Self::NotesTooShort => "validation.notes_too_short",
            Self::NotesTooLong => "validation.notes_too_long",
            Self::InvalidDeliveryDate => "validation.invalid_delivery_date",
            Self::InvalidReprintType => "validation.invalid_reprint_type",
            Self::InvalidOrderId => "validation.invalid_order_id",
        }
    }
}

/// Os três valores monetários de uma ordem, já convertidos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Amounts {
    pub total: Decimal,
    pub advance: Decimal,
    pub balance: Decimal,
}

impl Amounts {
    pub fn parse(
        total: &NumericInput,
        advance: &NumericInput,
        balance: &NumericInput,
    ) -> Result<Self, ValidationFailure> {
        Ok(Self {
            total: total.to_decimal()?,
            advance: advance.to_decimal()?,
            balance: balance.to_decimal()?,
        })
    }
}

/// total > 0, abono >= 0, saldo >= 0 e saldo == total - abono (tolerância de 0.01).
pub fn validate_amounts(amounts: &Amounts) -> Result<(), ValidationFailure> {
    if amounts.total <= Decimal::ZERO {
        return Err(ValidationFailure::TotalNotPositive);
    }
    if amounts.advance < Decimal::ZERO {
        return Err(ValidationFailure::NegativeAdvance);
    }
    if amounts.balance < Decimal::ZERO {
        return Err(ValidationFailure::NegativeBalance);
    }

    // Valores no limite do Decimal não podem estourar a subtração
    let diff = amounts
        .total
        .checked_sub(amounts.advance)
        .and_then(|expected| amounts.balance.checked_sub(expected))
        .ok_or(ValidationFailure::BalanceMismatch)?;
    if diff.abs() > BALANCE_TOLERANCE {
        return Err(ValidationFailure::BalanceMismatch);
    }

    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<(), ValidationFailure> {
    if phone.len() == PHONE_DIGITS && phone.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationFailure::InvalidPhone)
    }
}

/// Retorna o nome já sem espaços nas pontas.
pub fn validate_client_name(name: &str) -> Result<&str, ValidationFailure> {
    let trimmed = name.trim();
    if trimmed.chars().count() < CLIENT_NAME_MIN_CHARS {
        return Err(ValidationFailure::ClientNameTooShort);
    }
    Ok(trimmed)
}

/// Retorna as observações já sem espaços nas pontas.
pub fn validate_notes(notes: &str) -> Result<&str, ValidationFailure> {
    let trimmed = notes.trim();
    let len = trimmed.chars().count();

    if len < NOTES_MIN_CHARS {
        return Err(ValidationFailure::NotesTooShort);
    }
    if len > NOTES_MAX_CHARS {
        return Err(ValidationFailure::NotesTooLong);
    }

    Ok(trimmed)
}

pub fn parse_delivery_date(raw: &str) -> Result<NaiveDateTime, ValidationFailure> {
    NaiveDateTime::parse_from_str(raw.trim(), WIRE_DATETIME_FORMAT)
        .map_err(|_| ValidationFailure::InvalidDeliveryDate)
}
