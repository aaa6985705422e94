//! Thermal receipt printing
//!
//! - `escpos`: command builder and raster logo conversion
//! - `receipt`: customer and business ticket layouts
//! - `printer`: where the bytes go (OS queue, TCP, device file)

pub mod encoding;
pub mod error;
pub mod escpos;
pub mod printer;
pub mod receipt;

pub use error::{PrintError, PrintResult};
pub use printer::{Printer, PrinterTarget};
pub use receipt::{LogoBlock, ReceiptRenderer, ShopProfile};
