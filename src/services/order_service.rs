// src/services/order_service.rs

use rust_decimal::{Decimal, prelude::ToPrimitive};
use sqlx::SqlitePool;

use crate::{
    common::error::AppError,
    db::{EmployeeRepository, OrderRepository},
    models::order::{
        DEFAULT_PAYMENT_METHOD, NewOrder, NumericInput, Order, OrderChanges, PrintRequest,
        ReprintKind, SubmitOrderPayload, UpdateOrderPayload,
    },
    printing::PrintError,
    services::{
        receipt_service::ReceiptService,
        validation::{
            Amounts, parse_delivery_date, validate_amounts, validate_client_name, validate_notes,
            ValidationFailure, validate_phone,
        },
    },
};

/// Limite de vias do negócio por pedido de impressão.
pub const MAX_BUSINESS_COPIES: u32 = 20;

// Um salto de 1 no ID é tolerado; acima disso o contador é reposicionado.
const TOLERATED_ID_SKIP: i64 = 2;

// Trava de escrita já no início: uma transação DEFERRED que lê e depois
// escreve recebe SQLITE_BUSY na hora quando outra escrita está em curso.
const BEGIN_WRITE: &str = "BEGIN IMMEDIATE";

/// Resultado de um envio: a ordem já está gravada, a impressão pode ter falhado.
#[derive(Debug)]
pub struct SubmitOutcome {
    pub order: Order,
    pub print_error: Option<PrintError>,
}

#[derive(Clone)]
pub struct OrderService {
    order_repo: OrderRepository,
    employee_repo: EmployeeRepository,
    receipts: ReceiptService,
    pool: SqlitePool,
}

impl OrderService {
    pub fn new(
        order_repo: OrderRepository,
        employee_repo: EmployeeRepository,
        receipts: ReceiptService,
        pool: SqlitePool,
    ) -> Self {
        Self {
            order_repo,
            employee_repo,
            receipts,
            pool,
        }
    }

    /// Valida, grava e depois imprime.
    ///
    /// A gravação é definitiva: falha de impressão não desfaz a ordem.
    pub async fn submit(&self, payload: SubmitOrderPayload) -> Result<SubmitOutcome, AppError> {
        let client_name = validate_client_name(&payload.client_name)?.to_string();
        validate_phone(&payload.mobile)?;
        let amounts = Amounts::parse(&payload.total, &payload.advance, &payload.balance)?;
        validate_amounts(&amounts)?;
        let notes = validate_notes(&payload.notes)?.to_string();
        let delivery_at = parse_delivery_date(&payload.delivery_at)?;
        let request =
            submit_print_request(payload.business_only, payload.business_copies.as_ref())?;

        let salesperson = payload.salesperson.trim().to_string();
        if self
            .employee_repo
            .find_by_code(&self.pool, &salesperson)
            .await?
            .is_none()
        {
            return Err(AppError::SalespersonNotFound);
        }

        let new_order = NewOrder {
            client_name,
            delivery_at,
            total: amounts.total,
            advance: amounts.advance,
            balance: amounts.balance,
            mobile: payload.mobile.clone(),
            phone: normalize_optional(payload.phone.as_deref()),
            notes,
            salesperson,
            payment_method: normalize_optional(payload.payment_method.as_deref())
                .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_string()),
        };

        let order = self.persist(&new_order).await?;
        tracing::info!(order_id = order.id, salesperson = %order.salesperson, "Ordem gravada");

        let print_error = match self.receipts.print_order(&order, request).await {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!(order_id = order.id, error = %e, "Ordem gravada, mas a impressão falhou");
                Some(e)
            }
        };

        Ok(SubmitOutcome { order, print_error })
    }

    // Insere numa transação; se o ID pular mais que o tolerado, desfaz,
    // reposiciona o contador e tenta de novo uma única vez.
    async fn persist(&self, new_order: &NewOrder) -> Result<Order, AppError> {
        let mut retried = false;

        loop {
            let mut tx = self.pool.begin_with(BEGIN_WRITE).await?;

            let last_id = self.order_repo.max_id(&mut *tx).await?;
            let order = self.order_repo.insert(&mut *tx, new_order).await?;

            if order.id > last_id + TOLERATED_ID_SKIP {
                if retried {
                    tracing::warn!(
                        last_id,
                        new_id = order.id,
                        "Salto de ID persiste após reposicionar o contador; aceitando"
                    );
                } else {
                    tracing::warn!(last_id, new_id = order.id, "Salto de ID detectado, reposicionando contador");
                    tx.rollback().await?;
                    self.order_repo.reseed_sequence(&self.pool, last_id).await?;
                    retried = true;
                    continue;
                }
            }

            tx.commit().await?;
            return Ok(order);
        }
    }

    pub async fn list(&self) -> Result<Vec<Order>, AppError> {
        self.order_repo.list().await
    }

    pub async fn update(&self, id: i64, payload: UpdateOrderPayload) -> Result<Order, AppError> {
        let mut tx = self.pool.begin_with(BEGIN_WRITE).await?;

        let current = self
            .order_repo
            .find(&mut *tx, id)
            .await?
            .ok_or(AppError::OrderNotFound)?;

        let changes = merge_changes(&current, &payload)?;
        let updated = self
            .order_repo
            .update(&mut *tx, id, &changes)
            .await?
            .ok_or(AppError::OrderNotFound)?;

        tx.commit().await?;
        tracing::info!(order_id = id, "Ordem atualizada");
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let deleted = self.order_repo.delete(&self.pool, id).await?;
        if deleted == 0 {
            return Err(AppError::OrderNotFound);
        }

        tracing::info!(order_id = id, "Ordem apagada");
        Ok(())
    }

    /// Tipo inválido só é checado depois de confirmar que a ordem existe.
    pub async fn reprint(&self, id: i64, reprint_type: Option<&str>) -> Result<ReprintKind, AppError> {
        let order = self
            .order_repo
            .find(&self.pool, id)
            .await?
            .ok_or(AppError::OrderNotFound)?;

        let kind: ReprintKind = reprint_type.unwrap_or("1").parse()?;
        self.receipts.print_order(&order, kind.print_request()).await?;

        Ok(kind)
    }
}

// Parte fracionária é descartada; o resultado fica entre 1 e MAX_BUSINESS_COPIES
fn submit_print_request(
    business_only: Option<bool>,
    copies: Option<&NumericInput>,
) -> Result<PrintRequest, ValidationFailure> {
    let copies = match copies {
        Some(raw) => raw
            .to_decimal()?
            .trunc()
            .clamp(Decimal::ONE, Decimal::from(MAX_BUSINESS_COPIES))
            .to_u32()
            .ok_or(ValidationFailure::InvalidNumber)?,
        None => 1,
    };
    Ok(PrintRequest::new(business_only.unwrap_or(false), copies))
}

fn normalize_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// Mescla o payload parcial com a ordem atual e valida o resultado
fn merge_changes(current: &Order, payload: &UpdateOrderPayload) -> Result<OrderChanges, AppError> {
    let mut changes = OrderChanges::from(current);

    if payload.total.is_some() || payload.advance.is_some() || payload.balance.is_some() {
        let amounts = Amounts {
            total: match &payload.total {
                Some(v) => v.to_decimal()?,
                None => current.total,
            },
            advance: match &payload.advance {
                Some(v) => v.to_decimal()?,
                None => current.advance,
            },
            balance: match &payload.balance {
                Some(v) => v.to_decimal()?,
                None => current.balance,
            },
        };
        validate_amounts(&amounts)?;
        changes.total = amounts.total;
        changes.advance = amounts.advance;
        changes.balance = amounts.balance;
    }

    if let Some(name) = &payload.client_name {
        changes.client_name = validate_client_name(name)?.to_string();
    }
    if let Some(raw) = &payload.delivery_at {
        changes.delivery_at = parse_delivery_date(raw)?;
    }
    if let Some(mobile) = &payload.mobile {
        validate_phone(mobile)?;
        changes.mobile = mobile.clone();
    }
    if let Some(phone) = &payload.phone {
        changes.phone = normalize_optional(Some(phone));
    }
    if let Some(notes) = &payload.notes {
        changes.notes = validate_notes(notes)?.to_string();
    }
    if let Some(completed) = payload.completed {
        changes.completed = completed;
    }
    if let Some(method) = normalize_optional(payload.payment_method.as_deref()) {
        changes.payment_method = method;
    }

    Ok(changes)
}
