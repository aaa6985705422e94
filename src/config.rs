// src/config.rs

use std::{env, path::PathBuf, sync::Arc, time::Duration};

use sqlx::SqlitePool;

use crate::{
    common::i18n::I18nStore,
    db::{self, EmployeeRepository, OrderRepository},
    printing::{LogoBlock, PrinterTarget, ReceiptRenderer, ShopProfile},
    services::{
        auth::AuthService,
        employee_service::{DefaultAdmin, EmployeeService},
        order_service::OrderService,
        receipt_service::ReceiptService,
    },
};

const DEFAULT_DATABASE_URL: &str = "sqlite://orders.db?mode=rwc";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_LOGO_PATH: &str = "img/logo.png";
const DEFAULT_PRINT_DELAY_MS: u64 = 500;

/// Configuração lida do ambiente (e do `.env`) uma única vez na inicialização.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub printer: PrinterTarget,
    pub logo_path: PathBuf,
    pub print_delay: Duration,
    pub password_cost: u32,
    pub default_admin: DefaultAdmin,
    pub shop: ShopProfile,
    pub reprint_shop: ShopProfile,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let printer: PrinterTarget = env_or("PRINTER_TARGET", "default").parse()?;

        let print_delay_ms = match env::var("PRINT_DELAY_MS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|e| anyhow::anyhow!("PRINT_DELAY_MS inválido ({}): {}", raw, e))?,
            Err(_) => DEFAULT_PRINT_DELAY_MS,
        };

        let password_cost = match env::var("BCRYPT_COST") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|e| anyhow::anyhow!("BCRYPT_COST inválido ({}): {}", raw, e))?,
            Err(_) => bcrypt::DEFAULT_COST,
        };

        let admin_defaults = DefaultAdmin::default();
        let shop_defaults = ShopProfile::default();
        let reprint_defaults = ShopProfile::customer_reprint();
        let shop = ShopProfile {
            name: env_or("SHOP_NAME", &shop_defaults.name),
            branch: env_or("SHOP_BRANCH", &shop_defaults.branch),
            owner: env_or("SHOP_OWNER", &shop_defaults.owner),
            tax_line: env_or("SHOP_TAX_LINE", &shop_defaults.tax_line),
            address: env_or("SHOP_ADDRESS", &shop_defaults.address),
            phone_line: env_or("SHOP_PHONE_LINE", &shop_defaults.phone_line),
        };
        // Reimpressão da via do cliente: mesmo nome e sede, outro titular
        let reprint_shop = ShopProfile {
            owner: env_or("REPRINT_OWNER", &reprint_defaults.owner),
            tax_line: env_or("REPRINT_TAX_LINE", &reprint_defaults.tax_line),
            address: env_or("REPRINT_ADDRESS", &reprint_defaults.address),
            phone_line: env_or("REPRINT_PHONE_LINE", &reprint_defaults.phone_line),
            ..shop.clone()
        };

        Ok(Self {
            database_url: env_or("DATABASE_URL", DEFAULT_DATABASE_URL),
            bind_addr: env_or("BIND_ADDR", DEFAULT_BIND_ADDR),
            printer,
            logo_path: PathBuf::from(env_or("LOGO_PATH", DEFAULT_LOGO_PATH)),
            print_delay: Duration::from_millis(print_delay_ms),
            password_cost,
            default_admin: DefaultAdmin {
                code: env_or("ADMIN_CODE", &admin_defaults.code),
                password: env_or("ADMIN_PASSWORD", &admin_defaults.password),
            },
            shop,
            reprint_shop,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub i18n_store: Arc<I18nStore>,
    pub auth_service: AuthService,
    pub employee_service: EmployeeService,
    pub order_service: OrderService,
}

impl AppState {
    /// Conecta ao banco, roda as migrações e monta o estado.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let db_pool = db::connect(&config.database_url).await?;
        Self::with_pool(db_pool, config).await
    }

    /// Monta o estado sobre um pool já migrado (os testes usam SQLite em memória).
    pub async fn with_pool(db_pool: SqlitePool, config: &AppConfig) -> anyhow::Result<Self> {
        let i18n_store = Arc::new(I18nStore::load_embedded()?);

        // O logo é convertido uma vez; na falha fica o banner de texto até o fim do processo
        let logo = LogoBlock::load(&config.logo_path);
        let receipts = ReceiptService::new(
            ReceiptRenderer::new(config.shop.clone(), logo)
                .with_reprint_shop(config.reprint_shop.clone()),
            config.printer.clone(),
            config.print_delay,
        );

        // --- Monta o gráfico de dependências ---
        let employee_repo = EmployeeRepository::new(db_pool.clone());
        let order_repo = OrderRepository::new(db_pool.clone());

        let auth_service = AuthService::new(employee_repo.clone(), db_pool.clone());
        let employee_service =
            EmployeeService::new(employee_repo.clone(), db_pool.clone(), config.password_cost);
        let order_service = OrderService::new(order_repo, employee_repo, receipts, db_pool.clone());

        employee_service
            .ensure_default_admin(&config.default_admin)
            .await
            .map_err(|e| anyhow::anyhow!("Falha ao criar o administrador padrão: {}", e))?;

        tracing::info!(printer = %config.printer, "✅ Estado da aplicação pronto");

        Ok(Self {
            db_pool,
            i18n_store,
            auth_service,
            employee_service,
            order_service,
        })
    }
}
