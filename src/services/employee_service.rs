// src/services/employee_service.rs

use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::EmployeeRepository,
    models::employee::{CreateEmployeePayload, Employee, UpdateEmployeePayload},
    services::auth::hash_password,
};

/// Administrador criado na primeira execução.
#[derive(Debug, Clone)]
pub struct DefaultAdmin {
    pub code: String,
    pub password: String,
}

impl Default for DefaultAdmin {
    fn default() -> Self {
        Self {
            code: "ADMIN".to_string(),
            password: "0000".to_string(),
        }
    }
}

const DEFAULT_ADMIN_NAME: &str = "ADMINISTRADOR";
const DEFAULT_ADMIN_PHONE: &str = "0000000000";

#[derive(Clone)]
pub struct EmployeeService {
    employee_repo: EmployeeRepository,
    pool: SqlitePool,
    password_cost: u32,
}

impl EmployeeService {
    pub fn new(employee_repo: EmployeeRepository, pool: SqlitePool, password_cost: u32) -> Self {
        Self {
            employee_repo,
            pool,
            password_cost,
        }
    }

    pub async fn create(&self, payload: CreateEmployeePayload) -> Result<Employee, AppError> {
        let payload = payload.trimmed();
        payload.validate()?;

        // Hash fora da transação, não toca no banco
        let password_hash = hash_password(&payload.password, self.password_cost).await?;

        let employee = self
            .employee_repo
            .create(
                &self.pool,
                &payload.name,
                &payload.phone,
                &payload.code,
                &password_hash,
                payload.is_admin,
            )
            .await?;

        tracing::info!(code = %employee.code, "Funcionário criado");
        Ok(employee)
    }

    pub async fn get(&self, code: &str) -> Result<Employee, AppError> {
        self.employee_repo
            .find_by_code(&self.pool, code)
            .await?
            .ok_or(AppError::EmployeeNotFound)
    }

    pub async fn list(&self) -> Result<Vec<Employee>, AppError> {
        self.employee_repo.list().await
    }

    pub async fn update(
        &self,
        code: &str,
        payload: UpdateEmployeePayload,
    ) -> Result<Employee, AppError> {
        let payload = UpdateEmployeePayload {
            name: payload.name.map(|n| n.trim().to_string()),
            phone: payload.phone.map(|p| p.trim().to_string()),
            password: payload
                .password
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
            is_admin: payload.is_admin,
        };
        payload.validate()?;

        let password_hash = match &payload.password {
            Some(password) => Some(hash_password(password, self.password_cost).await?),
            None => None,
        };

        let employee = self
            .employee_repo
            .update(
                &self.pool,
                code,
                payload.name.as_deref(),
                payload.phone.as_deref(),
                password_hash.as_deref(),
                payload.is_admin,
            )
            .await?
            .ok_or(AppError::EmployeeNotFound)?;

        tracing::info!(code = %employee.code, "Funcionário atualizado");
        Ok(employee)
    }

    /// Garante que exista o administrador padrão. Não altera um já existente.
    pub async fn ensure_default_admin(&self, admin: &DefaultAdmin) -> Result<(), AppError> {
        if self
            .employee_repo
            .find_by_code(&self.pool, &admin.code)
            .await?
            .is_some()
        {
            return Ok(());
        }

        let password_hash = hash_password(&admin.password, self.password_cost).await?;
        match self
            .employee_repo
            .create(
                &self.pool,
                DEFAULT_ADMIN_NAME,
                DEFAULT_ADMIN_PHONE,
                &admin.code,
                &password_hash,
                true,
            )
            .await
        {
            // Outra instância pode ter criado no meio tempo
            Ok(_) | Err(AppError::EmployeeCodeExists) => {
                tracing::info!(code = %admin.code, "Administrador padrão criado");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
