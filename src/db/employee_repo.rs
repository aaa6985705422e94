// src/db/employee_repo.rs

use sqlx::{Executor, Sqlite, SqlitePool};

use crate::{common::error::AppError, models::employee::Employee};

// Repositório de funcionários: todas as interações com a tabela 'employees'
#[derive(Clone)]
pub struct EmployeeRepository {
    pool: SqlitePool,
}

impl EmployeeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // Busca um funcionário pelo código de login
    pub async fn find_by_code<'e, E>(&self, executor: E, code: &str) -> Result<Option<Employee>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, name, phone, code, password_hash, is_admin
            FROM employees
            WHERE code = ?
            "#,
        )
        .bind(code)
        .fetch_optional(executor)
        .await?;

        Ok(employee)
    }

    pub async fn list(&self) -> Result<Vec<Employee>, AppError> {
        let employees = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, name, phone, code, password_hash, is_admin
            FROM employees
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(employees)
    }

    // Cria um funcionário. Código repetido vira EmployeeCodeExists (409).
    pub async fn create<'e, E>(
        &self,
        executor: E,
        name: &str,
        phone: &str,
        code: &str,
        password_hash: &str,
        is_admin: bool,
    ) -> Result<Employee, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            INSERT INTO employees (name, phone, code, password_hash, is_admin)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, name, phone, code, password_hash, is_admin
            "#,
        )
        .bind(name)
        .bind(phone)
        .bind(code)
        .bind(password_hash)
        .bind(is_admin)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::EmployeeCodeExists;
                }
            }
            e.into()
        })?;

        Ok(employee)
    }

    // Atualização parcial: campos `None` mantêm o valor atual
    pub async fn update<'e, E>(
        &self,
        executor: E,
        code: &str,
        name: Option<&str>,
        phone: Option<&str>,
        password_hash: Option<&str>,
        is_admin: Option<bool>,
    ) -> Result<Option<Employee>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            UPDATE employees SET
                name          = COALESCE(?, name),
                phone         = COALESCE(?, phone),
                password_hash = COALESCE(?, password_hash),
                is_admin      = COALESCE(?, is_admin)
            WHERE code = ?
            RETURNING id, name, phone, code, password_hash, is_admin
            "#,
        )
        .bind(name)
        .bind(phone)
        .bind(password_hash)
        .bind(is_admin)
        .bind(code)
        .fetch_optional(executor)
        .await?;

        Ok(employee)
    }
}
