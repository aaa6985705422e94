// src/services/auth.rs

use bcrypt::{hash, verify};

use crate::{
    common::error::AppError,
    db::EmployeeRepository,
    models::employee::Employee,
};

#[derive(Clone)]
pub struct AuthService {
    employee_repo: EmployeeRepository,
    pool: sqlx::SqlitePool,
}

impl AuthService {
    pub fn new(employee_repo: EmployeeRepository, pool: sqlx::SqlitePool) -> Self {
        Self { employee_repo, pool }
    }

    /// Código desconhecido -> 404; senha errada -> 401.
    pub async fn login(&self, code: &str, password: &str) -> Result<Employee, AppError> {
        let employee = self
            .employee_repo
            .find_by_code(&self.pool, code.trim())
            .await?
            .ok_or(AppError::UnknownLoginCode)?;

        if !verify_password(password.trim(), &employee.password_hash).await? {
            tracing::info!(code = %employee.code, "Tentativa de login com senha incorreta");
            return Err(AppError::WrongPassword);
        }

        tracing::info!(code = %employee.code, "Login realizado");
        Ok(employee)
    }
}

// bcrypt é custoso: roda fora das threads do runtime
pub async fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    let password = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password, cost))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

pub async fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let password = password.to_owned();
    let password_hash = password_hash.to_owned();
    let valid = tokio::task::spawn_blocking(move || verify(&password, &password_hash))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;
    Ok(valid)
}
