//! Receipt layouts for repair orders
//!
//! Two tickets per order: the full customer copy (shop header, amounts and
//! legal footer) and the compact business copy attached to the item.

use std::path::Path;

use chrono::{Local, NaiveDateTime, TimeZone};
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{info, warn};

use crate::models::order::Order;
use crate::printing::escpos::{EscPosBuilder, FontSize, LOGO_WIDTH_DOTS, load_logo};

const RECEIPT_DATETIME_FORMAT: &str = "%d/%m/%Y %H:%M";
const RULE: &str = "====================";
const BANNER_RULE: &str = "========================";
const TRAILING_FEEDS: usize = 4;

/// Dados da loja impressos no cabeçalho
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopProfile {
    pub name: String,
    pub branch: String,
    pub owner: String,
    pub tax_line: String,
    pub address: String,
    pub phone_line: String,
}

impl Default for ShopProfile {
    fn default() -> Self {
        Self {
            name: "EL IMPERIO DE LOS BOLSOS".to_string(),
            branch: "BELEN".to_string(),
            owner: "Carmen Teresa Bustamante Rua".to_string(),
            tax_line: "NIT 21945345-8 Regimen Simplificado".to_string(),
            address: "CR 76 # 32 - 105 BELEN".to_string(),
            phone_line: "Telefono: 3005665208".to_string(),
        }
    }
}

impl ShopProfile {
    /// Titular que assina a via do cliente reimpressa sozinha
    pub fn customer_reprint() -> Self {
        Self {
            owner: "Jirlesa Maria Agudelo Correa".to_string(),
            tax_line: "NIT 1152445775 Regimen Simplificado".to_string(),
            address: "CLL 46 N 49-01 BELEN".to_string(),
            phone_line: "Telefono: 3506878318 - 3106503062".to_string(),
            ..Self::default()
        }
    }
}

/// Cabeçalho gráfico da via do cliente
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogoBlock {
    /// Comando `GS v 0` já gerado
    Raster(Vec<u8>),
    /// Texto de reserva quando a imagem não pôde ser convertida
    Banner,
}

impl LogoBlock {
    /// Converte o logo uma única vez; se falhar, fica o banner de texto.
    pub fn load(path: &Path) -> Self {
        match load_logo(path, LOGO_WIDTH_DOTS) {
            Ok(raster) => {
                info!(path = %path.display(), bytes = raster.len(), "Logo loaded");
                LogoBlock::Raster(raster)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Logo unavailable, using text banner");
                LogoBlock::Banner
            }
        }
    }
}

/// Monta os bytes ESC/POS de cada via
#[derive(Debug, Clone)]
pub struct ReceiptRenderer {
    shop: ShopProfile,
    reprint_shop: ShopProfile,
    logo: LogoBlock,
}

impl ReceiptRenderer {
    /// A reimpressão usa o mesmo cabeçalho até `with_reprint_shop`.
    pub fn new(shop: ShopProfile, logo: LogoBlock) -> Self {
        Self {
            reprint_shop: shop.clone(),
            shop,
            logo,
        }
    }

    pub fn with_reprint_shop(mut self, reprint_shop: ShopProfile) -> Self {
        self.reprint_shop = reprint_shop;
        self
    }

    /// Via interna: número da ordem, cliente, entrega, celular e artigo
    pub fn business_copy(&self, order: &Order) -> Vec<u8> {
        let mut b = EscPosBuilder::new();

        b.center()
            .bold()
            .line(RULE)
            .line("COPIA INTERNA")
            .line("NEGOCIO")
            .line(&self.shop.branch)
            .line(RULE)
            .bold_off()
            .font(FontSize::Small)
            .center()
            .line(&format!("ORDEN #:  {}", order.id))
            .line(&format!("Cliente:  {}", order.client_name))
            .line(&format!(
                "Entrega:  {}",
                order.delivery_at.format("%d/%m/%Y  %H:%M")
            ))
            .line(&format!("Celular:  {}", order.mobile))
            .line("Articulo para:")
            .line(&format!("  {}", order.notes))
            .feed(TRAILING_FEEDS)
            .cut();

        b.build()
    }

    /// Via do cliente: cabeçalho da loja, valores e condições
    pub fn customer_copy(&self, order: &Order) -> Vec<u8> {
        self.customer_ticket(&self.shop, order)
    }

    /// Via do cliente reimpressa sozinha, com o cabeçalho do outro titular
    pub fn customer_reprint(&self, order: &Order) -> Vec<u8> {
        self.customer_ticket(&self.reprint_shop, order)
    }

    fn customer_ticket(&self, shop: &ShopProfile, order: &Order) -> Vec<u8> {
        let mut b = EscPosBuilder::new();

        b.center();
        match &self.logo {
            LogoBlock::Raster(raster) => {
                b.raw(raster).feed(1);
            }
            LogoBlock::Banner => {
                b.line(BANNER_RULE)
                    .line(&shop.name)
                    .line(&shop.branch)
                    .line(BANNER_RULE);
            }
        }

        b.font(FontSize::Large)
            .bold()
            .line(&shop.name)
            .line(&shop.branch)
            .feed(1)
            .font(FontSize::Normal)
            .line(&shop.owner)
            .line(&shop.tax_line)
            .line(&shop.address)
            .line(&shop.phone_line)
            .feed(1)
            .font(FontSize::Large)
            .line(&format!("ORDEN DE ARREGLO N: {}", order.id))
            .line(&format!("Fecha: {}", format_created_at(&order.created_at)))
            .feed(1)
            .bold_off()
            .font(FontSize::Normal)
            .line(&labeled("Cliente:", &order.client_name))
            .line(&labeled("Cel:", &order.mobile))
            .line(&labeled(
                "Entrega:",
                &order.delivery_at.format(RECEIPT_DATETIME_FORMAT).to_string(),
            ))
            .line(&labeled("Valor:", &format_money(order.total)))
            .line(&labeled("Abono:", &format_money(order.advance)))
            .line(&labeled("Saldo:", &format_money(order.balance)))
            .line(&labeled(
                "Telefono adicional:",
                order.phone.as_deref().filter(|p| !p.is_empty()).unwrap_or("N/A"),
            ))
            .line("Articulo para:")
            .line(&order.notes)
            .feed(2)
            .bold()
            .line("* PASADOS 30 DIAS ")
            .line(" NO SE RESPONDE POR ARTICULO *")
            .feed(1)
            .line("* NO SE HACE DEVOLUCION DE DINERO *")
            .feed(TRAILING_FEEDS)
            .cut();

        b.build()
    }
}

// Rótulo alinhado em 12 colunas
fn labeled(label: &str, value: &str) -> String {
    format!("{:<12}{}", label, value)
}

// created_at fica em UTC; o recibo mostra a hora local
fn format_created_at(created_at: &NaiveDateTime) -> String {
    Local
        .from_utc_datetime(created_at)
        .format(RECEIPT_DATETIME_FORMAT)
        .to_string()
}

/// Pesos sem decimais, ponto como separador de milhar: 50000 -> "$50.000"
pub fn format_money(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}
