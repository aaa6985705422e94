pub mod employee_repo;
pub use employee_repo::EmployeeRepository;
pub mod order_repo;
pub use order_repo::OrderRepository;

use std::{str::FromStr, time::Duration};

use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

/// Abre o pool (criando o arquivo se preciso) e aplica as migrações.
pub async fn connect(database_url: &str) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect_with(options)
        .await?;

    tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

    migrate(&pool).await?;
    Ok(pool)
}

pub async fn migrate(pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::migrate!().run(pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");
    Ok(())
}
