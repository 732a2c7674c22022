//! Hex text input.
//!
//! Frames reach the decoder as bytes; captures and fixtures usually carry
//! them as hex dumps. This module turns such text into a byte buffer and
//! does nothing else.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HexInputError {
    #[error("no hex digits in input")]
    Empty,
    #[error("invalid hex input: {0}")]
    Hex(#[from] hex::FromHexError),
}

/// Parses a hex dump into bytes.
///
/// Accepts `0x` prefixes, whitespace, commas, `:` and `-` between bytes, and
/// `#` line comments. Digits may be grouped arbitrarily as long as the total
/// count is even.
///
/// # Examples
/// ```
/// use radarframe_core::parse_hex_dump;
///
/// let bytes = parse_hex_dump("0xAB, 0xCD\n00b3 # total length")?;
/// assert_eq!(bytes, vec![0xab, 0xcd, 0x00, 0xb3]);
/// # Ok::<(), radarframe_core::HexInputError>(())
/// ```
pub fn parse_hex_dump(text: &str) -> Result<Vec<u8>, HexInputError> {
    let mut digits = String::with_capacity(text.len());
    for line in text.lines() {
        let line = line.split('#').next().unwrap_or_default();
        for token in line.split(|c: char| c.is_whitespace() || matches!(c, ',' | ':' | '-')) {
            let token = token
                .strip_prefix("0x")
                .or_else(|| token.strip_prefix("0X"))
                .unwrap_or(token);
            digits.push_str(token);
        }
    }
    if digits.is_empty() {
        return Err(HexInputError::Empty);
    }
    Ok(hex::decode(digits)?)
}
