//! ESC/POS command builder
//!
//! Provides a fluent API for building ESC/POS print data, plus the
//! `GS v 0` raster conversion used for the shop logo.

use std::path::Path;

use image::{GrayImage, ImageReader, Luma, imageops};
use tracing::instrument;

use crate::printing::encoding::{CODE_PAGE_WPC1252, encode_single_byte};
use crate::printing::error::{PrintError, PrintResult};

/// Printable width of the 58mm/80mm heads this shop uses, in dots
pub const LOGO_WIDTH_DOTS: u32 = 384;

/// `ESC !` print modes used by the receipts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSize {
    Normal = 0x00,
    Small = 0x01,
    Large = 0x10,
}

/// ESC/POS command builder
///
/// Text is encoded one byte per character (WPC1252); commands are raw bytes.
pub struct EscPosBuilder {
    buf: Vec<u8>,
}

impl EscPosBuilder {
    /// Start a job: `ESC @` (initialize) then `ESC t 16` (WPC1252 code page)
    pub fn new() -> Self {
        let mut buf = Vec::with_capacity(1024);
        buf.extend_from_slice(&[0x1B, 0x40]);
        buf.extend_from_slice(&[0x1B, 0x74, CODE_PAGE_WPC1252]);
        Self { buf }
    }

    // === Text Output ===

    /// Write text (single-byte encoded)
    pub fn text(&mut self, s: &str) -> &mut Self {
        self.buf.extend_from_slice(&encode_single_byte(s));
        self
    }

    /// Write text followed by newline
    pub fn line(&mut self, s: &str) -> &mut Self {
        self.text(s);
        self.buf.push(b'\n');
        self
    }

    /// Write `lines` bare line feeds
    pub fn feed(&mut self, lines: usize) -> &mut Self {
        self.buf.extend(std::iter::repeat_n(b'\n', lines));
        self
    }

    // === Alignment ===

    pub fn center(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x61, 0x01]);
        self
    }

    // === Text Style ===

    /// Select print mode (`ESC ! n`)
    pub fn font(&mut self, size: FontSize) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x21, size as u8]);
        self
    }

    pub fn bold(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x45, 0x01]);
        self
    }

    pub fn bold_off(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x45, 0x00]);
        self
    }

    // === Paper Control ===

    /// Full cut after feeding to the cutter (`GS V 66 0`)
    pub fn cut(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x56, 0x42, 0x00]);
        self
    }

    // === Raw Commands ===

    /// Write raw bytes directly (pre-rendered raster blocks)
    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}

impl Default for EscPosBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Image Processing
// ============================================================================

/// Load an image file and convert it to a `GS v 0` raster command.
///
/// The image is resized to `width` dots (aspect ratio kept, Lanczos3),
/// flattened onto white, dithered to 1 bit (Floyd-Steinberg) and packed.
#[instrument]
pub fn load_logo(path: &Path, width: u32) -> PrintResult<Vec<u8>> {
    let img = ImageReader::open(path)?.with_guessed_format()?.decode()?;

    let (w, h) = (img.width(), img.height());
    if w == 0 || h == 0 {
        return Err(PrintError::InvalidConfig(format!(
            "Empty logo image: {}",
            path.display()
        )));
    }

    let height = ((h as f64 * width as f64 / w as f64) as u32).max(1);
    let resized = img.resize_exact(width, height, imageops::FilterType::Lanczos3);

    let rgba = resized.to_rgba8();
    let mut gray = GrayImage::new(width, height);
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
        // Transparent = white paper
        let alpha = a as f32 / 255.0;
        let value = luma * alpha + 255.0 * (1.0 - alpha);
        gray.put_pixel(x, y, Luma([value.round().clamp(0.0, 255.0) as u8]));
    }

    imageops::dither(&mut gray, &imageops::BiLevel);

    Ok(raster_command(&gray))
}

/// Pack a monochrome image into `GS v 0 m xL xH yL yH d1...dk`.
///
/// Dark pixels (value < 128) print; bits are MSB first, rows padded to whole bytes.
pub fn raster_command(img: &GrayImage) -> Vec<u8> {
    let (width, height) = img.dimensions();
    let x_bytes = width.div_ceil(8);

    let mut data = Vec::with_capacity(8 + (x_bytes * height) as usize);
    data.extend_from_slice(&[0x1D, 0x76, 0x30, 0x00]);
    data.push((x_bytes & 0xFF) as u8);
    data.push((x_bytes >> 8) as u8);
    data.push((height & 0xFF) as u8);
    data.push((height >> 8) as u8);

    for y in 0..height {
        for x_byte in 0..x_bytes {
            let mut byte = 0u8;
            for bit in 0..8 {
                let x = x_byte * 8 + bit;
                if x < width && img.get_pixel(x, y)[0] < 128 {
                    byte |= 1 << (7 - bit);
                }
            }
            data.push(byte);
        }
    }

    data
}
