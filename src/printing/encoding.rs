//! Single-byte text encoding for the thermal printer
//!
//! The printer runs on the WPC1252 code page (selected with `ESC t 16`), so
//! every character must become exactly one byte. ASCII passes through
//! untouched; anything Windows-1252 cannot represent becomes `?`.

use encoding_rs::WINDOWS_1252;

/// ESC/POS code page number for WPC1252
pub const CODE_PAGE_WPC1252: u8 = 16;

/// Encode text as one byte per character.
///
/// Control characters other than `\n` are replaced by spaces so user text
/// (client names, notes) can never smuggle printer commands.
pub fn encode_single_byte(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    let mut utf8 = [0u8; 4];

    for ch in text.chars() {
        if ch == '\n' {
            out.push(b'\n');
        } else if ch.is_control() {
            out.push(b' ');
        } else if ch.is_ascii() {
            out.push(ch as u8);
        } else {
            let (bytes, _, had_errors) = WINDOWS_1252.encode(ch.encode_utf8(&mut utf8));
            match bytes.as_ref() {
                [b] if !had_errors => out.push(*b),
                _ => out.push(b'?'),
            }
        }
    }

    out
}
