// src/services/receipt_service.rs

use std::{sync::Arc, time::Duration};

use crate::{
    models::order::{Order, PrintRequest},
    printing::{PrintResult, Printer, PrinterTarget, ReceiptRenderer},
};

#[derive(Clone)]
pub struct ReceiptService {
    renderer: Arc<ReceiptRenderer>,
    printer: PrinterTarget,
    delay: Duration,
}

impl ReceiptService {
    pub fn new(renderer: ReceiptRenderer, printer: PrinterTarget, delay: Duration) -> Self {
        Self {
            renderer: Arc::new(renderer),
            printer,
            delay,
        }
    }

    /// Trabalhos na ordem de impressão: via do cliente primeiro, depois as do negócio.
    pub fn render_jobs(&self, order: &Order, request: PrintRequest) -> Vec<Vec<u8>> {
        let mut jobs = Vec::with_capacity(request.business_copies as usize + 1);
        if request.customer_copy {
            jobs.push(if request.reprint_header {
                self.renderer.customer_reprint(order)
            } else {
                self.renderer.customer_copy(order)
            });
        }
        if request.business_copies > 0 {
            let business = self.renderer.business_copy(order);
            jobs.extend(std::iter::repeat_n(business, request.business_copies as usize));
        }
        jobs
    }

    /// Envia as vias para a impressora, com pausa entre trabalhos (não depois do último).
    pub async fn print_order(&self, order: &Order, request: PrintRequest) -> PrintResult<()> {
        let jobs = self.render_jobs(order, request);
        let total = jobs.len();

        for (i, job) in jobs.iter().enumerate() {
            self.printer.print(job).await?;
            if i + 1 < total && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        tracing::info!(order_id = order.id, jobs = total, printer = %self.printer, "Ordem impressa");
        Ok(())
    }
}
