use crate::error::KeyError;

/// Decode a hex string of any length, ignoring surrounding whitespace.
pub fn parse_hex(hex_str: &str) -> Result<Vec<u8>, KeyError> {
    hex::decode(hex_str.trim()).map_err(|e| KeyError::Malformed(format!("invalid hex: {e}")))
}
