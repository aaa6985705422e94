// src/db/order_repo.rs

use chrono::{NaiveDateTime, Utc};
use sqlx::{Executor, Sqlite, SqlitePool};

use crate::{
    common::error::AppError,
    models::order::{NewOrder, Order, OrderChanges},
};

const ORDER_COLUMNS: &str = "id, client_name, delivery_at, created_at, total, advance, balance, \
     mobile, phone, notes, salesperson, completed, payment_method";

// Repositório de ordens de conserto (tabela 'orders')
#[derive(Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // Maior ID existente (0 com a tabela vazia)
    pub async fn max_id<'e, E>(&self, executor: E) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let max: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(id), 0) FROM orders")
            .fetch_one(executor)
            .await?;
        Ok(max)
    }

    pub async fn insert<'e, E>(&self, executor: E, order: &NewOrder) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let created_at: NaiveDateTime = Utc::now().naive_utc();

        let sql = format!(
            r#"
            INSERT INTO orders (
                client_name, delivery_at, created_at, total, advance, balance,
                mobile, phone, notes, salesperson, completed, payment_method
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?)
            RETURNING {ORDER_COLUMNS}
            "#
        );

        let inserted = sqlx::query_as::<_, Order>(&sql)
            .bind(&order.client_name)
            .bind(order.delivery_at)
            .bind(created_at)
            .bind(order.total.to_string())
            .bind(order.advance.to_string())
            .bind(order.balance.to_string())
            .bind(&order.mobile)
            .bind(&order.phone)
            .bind(&order.notes)
            .bind(&order.salesperson)
            .bind(&order.payment_method)
            .fetch_one(executor)
            .await?;

        Ok(inserted)
    }

    /// Volta o contador AUTOINCREMENT para `last_id` (o próximo insert recebe `last_id + 1`).
    pub async fn reseed_sequence<'e, E>(&self, executor: E, last_id: i64) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query("UPDATE sqlite_sequence SET seq = ? WHERE name = 'orders'")
            .bind(last_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn find<'e, E>(&self, executor: E, id: i64) -> Result<Option<Order>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?");
        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(order)
    }

    // Mais recentes primeiro
    pub async fn list(&self) -> Result<Vec<Order>, AppError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC, id DESC");
        let orders = sqlx::query_as::<_, Order>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(orders)
    }

    // Grava o estado completo já mesclado e validado
    pub async fn update<'e, E>(&self, executor: E, id: i64, changes: &OrderChanges) -> Result<Option<Order>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!(
            r#"
            UPDATE orders SET
                client_name    = ?,
                delivery_at    = ?,
                total          = ?,
                advance        = ?,
                balance        = ?,
                mobile         = ?,
                phone          = ?,
                notes          = ?,
                completed      = ?,
                payment_method = ?
            WHERE id = ?
            RETURNING {ORDER_COLUMNS}
            "#
        );

        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(&changes.client_name)
            .bind(changes.delivery_at)
            .bind(changes.total.to_string())
            .bind(changes.advance.to_string())
            .bind(changes.balance.to_string())
            .bind(&changes.mobile)
            .bind(&changes.phone)
            .bind(&changes.notes)
            .bind(changes.completed)
            .bind(&changes.payment_method)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(order)
    }

    // Retorna quantas linhas foram apagadas (0 = não existia)
    pub async fn delete<'e, E>(&self, executor: E, id: i64) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM orders WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
