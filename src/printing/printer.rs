//! Printer adapters for sending ESC/POS data
//!
//! Supports:
//! - The OS default print queue (Win32 spooler on Windows, `lp` elsewhere)
//! - Network printers (raw TCP, usually port 9100)
//! - Device nodes / files (e.g. `/dev/usb/lp0`)

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{info, instrument};

use crate::printing::error::{PrintError, PrintResult};

const DEFAULT_RAW_PORT: u16 = 9100;
const JOB_NAME: &str = "Ticket";

/// Trait for printer adapters
#[allow(async_fn_in_trait)]
pub trait Printer {
    /// Send one raw ESC/POS job to the printer
    async fn print(&self, data: &[u8]) -> PrintResult<()>;
}

// ============================================================================
// Target selection
// ============================================================================

/// Where print jobs go, parsed from `PRINTER_TARGET`:
/// `default`, `tcp://host[:port]` or `file:<path>`.
#[derive(Debug, Clone)]
pub enum PrinterTarget {
    SystemDefault(SystemPrinter),
    Network(NetworkPrinter),
    File(FilePrinter),
}

impl FromStr for PrinterTarget {
    type Err = PrintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("default") {
            return Ok(PrinterTarget::SystemDefault(SystemPrinter));
        }
        if let Some(addr) = s.strip_prefix("tcp://") {
            return Ok(PrinterTarget::Network(NetworkPrinter::from_addr(addr)?));
        }
        if let Some(path) = s.strip_prefix("file:") {
            if path.is_empty() {
                return Err(PrintError::InvalidConfig("Empty file path".to_string()));
            }
            return Ok(PrinterTarget::File(FilePrinter::new(path)));
        }

        Err(PrintError::InvalidConfig(format!(
            "Unknown printer target: {}",
            s
        )))
    }
}

impl fmt::Display for PrinterTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrinterTarget::SystemDefault(_) => write!(f, "default"),
            PrinterTarget::Network(p) => write!(f, "tcp://{}", p.addr),
            PrinterTarget::File(p) => write!(f, "file:{}", p.path.display()),
        }
    }
}

impl Printer for PrinterTarget {
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        match self {
            PrinterTarget::SystemDefault(p) => p.print(data).await,
            PrinterTarget::Network(p) => p.print(data).await,
            PrinterTarget::File(p) => p.print(data).await,
        }
    }
}

// ============================================================================
// Network
// ============================================================================

/// Network printer (raw TCP)
#[derive(Debug, Clone)]
pub struct NetworkPrinter {
    addr: String,
    timeout: Duration,
}

impl NetworkPrinter {
    /// Create from "host:port"; the port defaults to 9100
    pub fn from_addr(addr: &str) -> PrintResult<Self> {
        let addr = addr.trim_end_matches('/');
        let addr = match addr.rsplit_once(':') {
            Some((host, port)) if !host.is_empty() => {
                port.parse::<u16>()
                    .map_err(|_| PrintError::InvalidConfig(format!("Invalid port: {}", addr)))?;
                addr.to_string()
            }
            Some(_) => {
                return Err(PrintError::InvalidConfig(format!("Invalid address: {}", addr)));
            }
            None if !addr.is_empty() => format!("{}:{}", addr, DEFAULT_RAW_PORT),
            None => return Err(PrintError::InvalidConfig("Empty address".to_string())),
        };

        Ok(Self {
            addr,
            timeout: Duration::from_secs(5),
        })
    }
}

impl Printer for NetworkPrinter {
    #[instrument(skip(self, data), fields(addr = %self.addr, data_len = data.len()))]
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        let mut stream = tokio::time::timeout(self.timeout, TcpStream::connect(self.addr.as_str()))
            .await
            .map_err(|_| PrintError::Timeout(format!("Connection timeout: {}", self.addr)))?
            .map_err(|e| PrintError::Connection(format!("{}: {}", self.addr, e)))?;

        stream.write_all(data).await?;
        stream.flush().await?;

        info!("Print job sent");
        Ok(())
    }
}

// ============================================================================
// File / device node
// ============================================================================

/// Writes jobs straight to a path (USB device node, or a plain file for testing)
#[derive(Debug, Clone)]
pub struct FilePrinter {
    path: PathBuf,
}

impl FilePrinter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Printer for FilePrinter {
    #[instrument(skip(self, data), fields(path = %self.path.display(), data_len = data.len()))]
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        file.write_all(data).await?;
        file.flush().await?;

        info!("Print job written");
        Ok(())
    }
}

// ============================================================================
// OS default queue
// ============================================================================

/// Whatever printer the host OS currently designates as default
#[derive(Debug, Clone, Copy)]
pub struct SystemPrinter;

#[cfg(not(windows))]
impl Printer for SystemPrinter {
    #[instrument(skip(self, data), fields(data_len = data.len()))]
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        use std::process::Stdio;
        use tokio::process::Command;

        // CUPS: sem `-d`, o lp usa o destino padrão
        let mut child = Command::new("lp")
            .args(["-o", "raw", "-t", JOB_NAME])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(data).await?;
            stdin.shutdown().await?;
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(PrintError::Spooler(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        info!("Print job queued");
        Ok(())
    }
}

#[cfg(windows)]
impl Printer for SystemPrinter {
    #[instrument(skip(self, data), fields(data_len = data.len()))]
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        // Windows printing is synchronous, run in blocking task
        let data = data.to_vec();

        tokio::task::spawn_blocking(move || {
            let name = windows_spooler::default_printer()?;
            windows_spooler::write_raw(&name, &data)
        })
        .await
        .map_err(|e| PrintError::WindowsPrinter(format!("Task join failed: {}", e)))??;

        info!("Print job queued");
        Ok(())
    }
}

#[cfg(windows)]
mod windows_spooler {
    use core::ffi::c_void;

    use windows::Win32::Graphics::Printing::{
        ClosePrinter, DOC_INFO_1W, EndDocPrinter, EndPagePrinter, GetDefaultPrinterW,
        OpenPrinterW, PRINTER_HANDLE, StartDocPrinterW, StartPagePrinter, WritePrinter,
    };
    use windows::core::{PCWSTR, PWSTR};

    use super::JOB_NAME;
    use crate::printing::error::{PrintError, PrintResult};

    fn spooler_error(step: &str) -> PrintError {
        PrintError::WindowsPrinter(format!("{} failed", step))
    }

    fn wide(s: &str) -> Vec<u16> {
        s.encode_utf16().chain(std::iter::once(0)).collect()
    }

    // Handle aberto; o Drop fecha o documento (se iniciado) e a impressora
    struct Spool {
        handle: PRINTER_HANDLE,
        doc_open: bool,
        page_open: bool,
    }

    impl Spool {
        fn open(printer_name: &str) -> PrintResult<Self> {
            let name = wide(printer_name);
            let mut handle = PRINTER_HANDLE::default();
            unsafe { OpenPrinterW(PCWSTR::from_raw(name.as_ptr()), &mut handle, None) }
                .map_err(|_| spooler_error("OpenPrinterW"))?;

            Ok(Self {
                handle,
                doc_open: false,
                page_open: false,
            })
        }

        fn start_raw_page(&mut self) -> PrintResult<()> {
            let mut doc_name = wide(JOB_NAME);
            let mut datatype = wide("RAW");
            let doc_info = DOC_INFO_1W {
                pDocName: PWSTR(doc_name.as_mut_ptr()),
                pOutputFile: PWSTR::null(),
                pDatatype: PWSTR(datatype.as_mut_ptr()),
            };

            if unsafe { StartDocPrinterW(self.handle, 1, &doc_info as *const DOC_INFO_1W) } == 0 {
                return Err(spooler_error("StartDocPrinter"));
            }
            self.doc_open = true;

            if !unsafe { StartPagePrinter(self.handle) }.as_bool() {
                return Err(spooler_error("StartPagePrinter"));
            }
            self.page_open = true;
            Ok(())
        }

        fn write(&mut self, data: &[u8]) -> PrintResult<()> {
            let len = u32::try_from(data.len())
                .map_err(|_| PrintError::WindowsPrinter("Job too large".to_string()))?;
            let mut written = 0u32;

            let ok = unsafe {
                WritePrinter(self.handle, data.as_ptr() as *const c_void, len, &mut written)
            };
            if !ok.as_bool() {
                return Err(spooler_error("WritePrinter"));
            }
            if written != len {
                return Err(PrintError::WindowsPrinter(format!(
                    "Incomplete write: {}/{} bytes",
                    written, len
                )));
            }
            Ok(())
        }
    }

    impl Drop for Spool {
        fn drop(&mut self) {
            unsafe {
                if self.page_open {
                    let _ = EndPagePrinter(self.handle);
                }
                if self.doc_open {
                    let _ = EndDocPrinter(self.handle);
                }
                let _ = ClosePrinter(self.handle);
            }
        }
    }

    /// Nome da impressora padrão do Windows
    pub fn default_printer() -> PrintResult<String> {
        let mut needed = 0u32;
        let _ = unsafe { GetDefaultPrinterW(None, &mut needed) };
        if needed == 0 {
            return Err(PrintError::WindowsPrinter("No default printer".to_string()));
        }

        let mut buf = vec![0u16; needed as usize];
        if !unsafe { GetDefaultPrinterW(Some(PWSTR(buf.as_mut_ptr())), &mut needed) }.as_bool() {
            return Err(spooler_error("GetDefaultPrinterW"));
        }

        let len = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
        String::from_utf16(&buf[..len])
            .map_err(|e| PrintError::WindowsPrinter(format!("UTF-16 decode failed: {}", e)))
    }

    /// Um documento RAW com uma página
    pub fn write_raw(printer_name: &str, data: &[u8]) -> PrintResult<()> {
        let mut spool = Spool::open(printer_name)?;
        spool.start_raw_page()?;
        spool.write(data)
    }
}
